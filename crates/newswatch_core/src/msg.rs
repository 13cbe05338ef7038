use crate::{CrawlProgress, ResultRecord, SourceEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User requested a manual crawl with the given keyword and source list.
    StartClicked {
        keyword: String,
        sources: Vec<SourceEntry>,
    },
    /// User toggled timed crawling. Turning it on validates the inputs and
    /// fires the first run immediately; turning it off cancels any pending
    /// timer and lets an in-flight run drain.
    TimedToggled {
        keyword: String,
        sources: Vec<SourceEntry>,
        interval_minutes: u32,
    },
    /// The jittered reschedule timer elapsed.
    TimerFired,
    /// User requested the active crawl to stop claiming new sources.
    StopClicked,
    /// Engine finished one source and delivered its records.
    BatchReceived {
        website: String,
        records: Vec<ResultRecord>,
    },
    /// Engine claim/completion transition.
    ProgressUpdated(CrawlProgress),
    /// Engine drained the queue or observed the stop request.
    CrawlFinished { was_stopped: bool },
    /// User cleared all results (also resets the novelty baseline).
    ClearResultsRequested,
    /// User deleted a single result row.
    ResultDeleted { id: u64 },
    /// User deleted every record of one website.
    WebsiteResultsDeleted { website: String },
    /// Fallback for placeholder wiring.
    NoOp,
}
