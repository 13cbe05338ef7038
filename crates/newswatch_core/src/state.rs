use std::collections::HashSet;

use crate::view_model::{AppViewModel, ResultRowView, WebsiteGroupView};

/// Fallback used when the configured interval is missing or zero.
pub const DEFAULT_INTERVAL_MINUTES: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Manual,
    Timed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Running(RunMode),
    /// Timed mode is on and the next run is awaiting its timer.
    Scheduled,
}

/// One configured source, as snapshotted from the external registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub name: String,
    /// URL or URL template; may contain the `%%KEYWORD%%` placeholder.
    pub url: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStatus {
    Success,
    NoMatch,
    Error,
}

/// A displayable outcome for one matched item or one source-level status.
///
/// Invariant: `url` is non-empty and absolute iff `status` is `Success`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub id: u64,
    pub website: String,
    pub title: String,
    pub url: String,
    pub status: ResultStatus,
    pub error: Option<String>,
}

/// Why a start or toggle request was refused without any state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    EmptyKeyword,
    NoSourcesSelected,
    AlreadyRunning,
    TimedModeActive,
    ManualRunActive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlProgress {
    pub active: usize,
    pub completed: usize,
    pub total: usize,
    pub active_sources: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub success_count: usize,
    pub distinct_site_count: usize,
    pub was_stopped: bool,
}

impl RunSummary {
    /// One-line description used for the status bar and notifications.
    pub fn describe(&self) -> String {
        if self.was_stopped {
            format!(
                "stopped ({} found, {} sites searched)",
                self.success_count, self.distinct_site_count
            )
        } else {
            format!(
                "finished ({} found, {} sites searched)",
                self.success_count, self.distinct_site_count
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    session: SessionState,
    timed_enabled: bool,
    stop_requested: bool,
    /// Mode of the most recently started run; gates novelty badges.
    last_run_mode: Option<RunMode>,
    keyword: String,
    interval_minutes: u32,
    /// Source snapshot taken when the session began; timed reruns reuse it.
    sources: Vec<SourceEntry>,
    /// Enabled-source names in registry order; drives display ordering.
    source_order: Vec<String>,
    current_results: Vec<ResultRecord>,
    previous_results: Vec<ResultRecord>,
    progress: Option<CrawlProgress>,
    summary: Option<RunSummary>,
    rejection: Option<RejectReason>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn is_running(&self) -> bool {
        matches!(self.session, SessionState::Running(_))
    }

    pub fn timed_enabled(&self) -> bool {
        self.timed_enabled
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn interval_minutes(&self) -> u32 {
        self.interval_minutes
    }

    /// Returns whether a re-render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> AppViewModel {
        let previous_urls: HashSet<&str> = self
            .previous_results
            .iter()
            .filter(|r| r.status == ResultStatus::Success)
            .map(|r| r.url.as_str())
            .collect();
        let badge_novelty = self.last_run_mode == Some(RunMode::Timed);

        let groups = self
            .source_order
            .iter()
            .filter_map(|website| {
                let rows: Vec<ResultRowView> = self
                    .current_results
                    .iter()
                    .filter(|r| &r.website == website)
                    .map(|r| ResultRowView {
                        id: r.id,
                        title: r.title.clone(),
                        url: r.url.clone(),
                        status: r.status,
                        error: r.error.clone(),
                        is_new: badge_novelty
                            && r.status == ResultStatus::Success
                            && !previous_urls.contains(r.url.as_str()),
                    })
                    .collect();
                if rows.is_empty() {
                    return None;
                }
                Some(WebsiteGroupView {
                    has_success: rows.iter().any(|r| r.status == ResultStatus::Success),
                    has_error: rows.iter().any(|r| r.status == ResultStatus::Error),
                    all_no_match: rows.iter().all(|r| r.status == ResultStatus::NoMatch),
                    website: website.clone(),
                    rows,
                })
            })
            .collect();

        AppViewModel {
            session: self.session,
            timed_enabled: self.timed_enabled,
            stop_requested: self.stop_requested,
            rejection: self.rejection,
            progress: self.progress.clone(),
            summary: self.summary,
            success_count: self.count_success(),
            searched_site_count: self.count_distinct_sites(),
            groups,
        }
    }

    pub(crate) fn set_rejection(&mut self, reason: RejectReason) {
        self.rejection = Some(reason);
        self.dirty = true;
    }

    pub(crate) fn clear_rejection(&mut self) {
        if self.rejection.take().is_some() {
            self.dirty = true;
        }
    }

    pub(crate) fn set_timed_enabled(&mut self, enabled: bool) {
        self.timed_enabled = enabled;
        self.dirty = true;
    }

    pub(crate) fn set_interval_minutes(&mut self, minutes: u32) {
        self.interval_minutes = minutes;
    }

    pub(crate) fn set_session(&mut self, session: SessionState) {
        self.session = session;
        self.dirty = true;
    }

    pub(crate) fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    pub(crate) fn request_stop(&mut self) {
        self.stop_requested = true;
        self.dirty = true;
    }

    /// Snapshot of the session's enabled sources, for timed reruns.
    pub(crate) fn enabled_sources(&self) -> Vec<SourceEntry> {
        self.sources.iter().filter(|s| s.enabled).cloned().collect()
    }

    /// Transition into a run: rotate the novelty baseline, clear the working
    /// set, and snapshot the display order.
    pub(crate) fn begin_run(&mut self, mode: RunMode, keyword: String, sources: Vec<SourceEntry>) {
        match mode {
            RunMode::Timed => {
                self.previous_results = std::mem::take(&mut self.current_results);
            }
            RunMode::Manual => {
                self.previous_results.clear();
                self.current_results.clear();
            }
        }
        self.source_order = sources
            .iter()
            .filter(|s| s.enabled)
            .map(|s| s.name.clone())
            .collect();
        self.keyword = keyword;
        self.sources = sources;
        self.session = SessionState::Running(mode);
        self.last_run_mode = Some(mode);
        self.stop_requested = false;
        self.progress = None;
        self.summary = None;
        self.dirty = true;
    }

    pub(crate) fn append_results(&mut self, records: Vec<ResultRecord>) {
        self.current_results.extend(records);
        self.dirty = true;
    }

    pub(crate) fn set_progress(&mut self, progress: CrawlProgress) {
        self.progress = Some(progress);
        self.dirty = true;
    }

    /// Close out the active run and produce its summary.
    pub(crate) fn finish_run(&mut self, was_stopped: bool) -> RunSummary {
        let summary = RunSummary {
            success_count: self.count_success(),
            distinct_site_count: self.count_distinct_sites(),
            was_stopped,
        };
        self.summary = Some(summary);
        self.progress = None;
        self.stop_requested = false;
        self.dirty = true;
        summary
    }

    pub(crate) fn clear_results(&mut self) {
        self.current_results.clear();
        self.previous_results.clear();
        self.summary = None;
        self.dirty = true;
    }

    pub(crate) fn delete_result(&mut self, id: u64) {
        let before = self.current_results.len();
        self.current_results.retain(|r| r.id != id);
        if self.current_results.len() != before {
            self.dirty = true;
        }
    }

    pub(crate) fn delete_website_results(&mut self, website: &str) {
        let before = self.current_results.len();
        self.current_results.retain(|r| r.website != website);
        if self.current_results.len() != before {
            self.dirty = true;
        }
    }

    fn count_success(&self) -> usize {
        self.current_results
            .iter()
            .filter(|r| r.status == ResultStatus::Success)
            .count()
    }

    fn count_distinct_sites(&self) -> usize {
        self.current_results
            .iter()
            .map(|r| r.website.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}
