use crate::{CrawlProgress, RejectReason, ResultStatus, RunSummary, SessionState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session: SessionState,
    pub timed_enabled: bool,
    pub stop_requested: bool,
    pub rejection: Option<RejectReason>,
    pub progress: Option<CrawlProgress>,
    pub summary: Option<RunSummary>,
    /// Success records currently held.
    pub success_count: usize,
    /// Distinct websites represented in the result set.
    pub searched_site_count: usize,
    /// Website groups in original source-list order, restricted to websites
    /// that produced at least one record.
    pub groups: Vec<WebsiteGroupView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebsiteGroupView {
    pub website: String,
    pub has_success: bool,
    pub has_error: bool,
    pub all_no_match: bool,
    pub rows: Vec<ResultRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRowView {
    pub id: u64,
    pub title: String,
    pub url: String,
    pub status: ResultStatus,
    pub error: Option<String>,
    /// Set for timed runs whose URL was absent from the previous run's
    /// successes; manual runs never carry the badge.
    pub is_new: bool,
}
