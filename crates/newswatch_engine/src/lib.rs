//! Newswatch engine: the crawl-and-match pipeline.
//!
//! Fetches each configured source over plain HTTP, selects a content parser
//! per source (RSS/XML, generic HTML, or a bespoke site extractor), filters
//! the extracted items against the keyword, and streams per-source result
//! batches back over an event channel while a bounded worker pool drains the
//! source queue.
mod engine;
mod fetch;
mod matcher;
mod parse;
mod pool;
mod types;

pub use engine::EngineHandle;
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use matcher::{error_record, match_items};
pub use parse::{
    parse_generic_html, parse_items, parse_life_tw, parse_owlting, parse_rss, select_strategy,
    ParseStrategy,
};
pub use pool::{
    resolve_target_url, run_crawl, ChannelEventSink, CrawlSettings, EventSink,
    DEFAULT_CONCURRENCY, KEYWORD_PLACEHOLDER,
};
pub use types::{
    CrawlEvent, CrawlProgress, CrawlRecord, FailureKind, FetchError, FetchOutput, Item,
    RecordStatus, SourceSpec,
};
