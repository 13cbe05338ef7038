//! Newswatch core: pure crawl-scheduling state machine and view-model helpers.
//!
//! The core owns the run lifecycle (manual and timed crawls, stop requests,
//! reschedule decisions, result accumulation and novelty diffing) as a pure
//! `update` function over messages. All IO (fetching, timers, notification
//! delivery, rendering) is expressed as [`Effect`]s executed by the caller.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    AppState, CrawlProgress, RejectReason, ResultRecord, ResultStatus, RunMode, RunSummary,
    SessionState, SourceEntry, DEFAULT_INTERVAL_MINUTES,
};
pub use update::update;
pub use view_model::{AppViewModel, ResultRowView, WebsiteGroupView};
