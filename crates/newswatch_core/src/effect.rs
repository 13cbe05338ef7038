use crate::SourceEntry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start crawling the given enabled sources for the keyword.
    StartCrawl {
        keyword: String,
        sources: Vec<SourceEntry>,
    },
    /// Ask the active crawl to stop claiming new sources.
    CancelCrawl,
    /// Arm the reschedule timer. The executor applies the ±20% jitter and
    /// eventually feeds back [`crate::Msg::TimerFired`].
    ScheduleNext { interval_minutes: u32 },
    /// Disarm a pending reschedule timer.
    CancelTimer,
    /// Surface a completion notification for a timed run.
    Notify { title: String, body: String },
}
