use std::fmt;

/// One source handed to the engine. Disabled entries are filtered out by the
/// caller before a crawl starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub name: String,
    /// URL, or a template containing the `%%KEYWORD%%` placeholder.
    pub url_template: String,
}

/// A raw {title, url} candidate extracted from a fetched page, before
/// keyword filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    Success,
    NoMatch,
    Error,
}

/// Final outcome for one matched item or one source-level status.
///
/// `url` is non-empty and absolute iff `status` is `Success`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRecord {
    pub id: u64,
    pub website: String,
    pub title: String,
    pub url: String,
    pub status: RecordStatus,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub body: String,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Short, user-facing description recorded on error results.
    pub fn user_message(&self) -> String {
        match self.kind {
            FailureKind::Forbidden => "site refused access (403 Forbidden)".to_owned(),
            FailureKind::HttpStatus(code) => format!("connection error: HTTP {code}"),
            FailureKind::Protocol => "HTTP/2 protocol error".to_owned(),
            FailureKind::Timeout => "connection timed out".to_owned(),
            FailureKind::Network => format!("connection error: {}", self.message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Response status ≥ 400, other than 403.
    HttpStatus(u16),
    Forbidden,
    Protocol,
    Timeout,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Forbidden => write!(f, "forbidden"),
            FailureKind::Protocol => write!(f, "protocol error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlProgress {
    pub active: usize,
    pub completed: usize,
    pub total: usize,
    pub active_sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlEvent {
    /// Claim/completion transition inside the worker pool.
    Progress(CrawlProgress),
    /// One source finished; fired in completion order, exactly once per
    /// source. `raw_body` carries the fetched text (or failure detail) when
    /// debug capture is on.
    SourceCompleted {
        website: String,
        records: Vec<CrawlRecord>,
        raw_body: Option<String>,
    },
    /// The queue drained or every worker observed the stop request.
    RunFinished { was_stopped: bool },
}
