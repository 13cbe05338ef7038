use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{mpsc, Mutex};
use std::time::Duration;

use futures_util::future::join_all;
use futures_util::FutureExt;

use crate::matcher::{error_record, match_items};
use crate::parse::{parse_items, select_strategy};
use crate::{CrawlEvent, CrawlProgress, CrawlRecord, Fetcher, SourceSpec};

pub const DEFAULT_CONCURRENCY: usize = 4;

/// Placeholder substituted with the percent-encoded keyword.
pub const KEYWORD_PLACEHOLDER: &str = "%%KEYWORD%%";

#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Worker count; at most this many fetches are in flight at once.
    pub concurrency: usize,
    /// Inter-request pacing delay bounds per worker, in milliseconds.
    pub pacing_min_ms: u64,
    pub pacing_max_ms: u64,
    /// Retain raw fetched text on completion events for inspection.
    pub debug: bool,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            pacing_min_ms: 500,
            pacing_max_ms: 1500,
            debug: false,
        }
    }
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: CrawlEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<CrawlEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<CrawlEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: CrawlEvent) {
        let _ = self.tx.send(event);
    }
}

/// Substitute the keyword placeholder, percent-encoded, into a URL template.
pub fn resolve_target_url(template: &str, keyword: &str) -> String {
    if template.contains(KEYWORD_PLACEHOLDER) {
        template.replace(KEYWORD_PLACEHOLDER, &urlencoding::encode(keyword))
    } else {
        template.to_owned()
    }
}

/// Drain the source queue with a bounded pool of cooperative workers.
///
/// Sources are claimed in their original order. Each completed source emits
/// one `SourceCompleted` batch immediately; progress events fire on every
/// claim/completion transition. Cancellation is observed before claiming;
/// an already-claimed source always completes and is recorded.
pub async fn run_crawl(
    fetcher: &dyn Fetcher,
    sources: Vec<SourceSpec>,
    keyword: &str,
    settings: &CrawlSettings,
    cancel: &AtomicBool,
    ids: &AtomicU64,
    sink: &dyn EventSink,
) {
    let total = sources.len();
    let queue = Mutex::new(VecDeque::from(sources));
    let active = Mutex::new(Vec::<String>::new());
    let completed = AtomicUsize::new(0);

    let workers = settings.concurrency.max(1).min(total.max(1));
    let worker_futures = (0..workers).map(|_| {
        worker_loop(
            fetcher, keyword, settings, cancel, ids, sink, &queue, &active, &completed, total,
        )
    });
    join_all(worker_futures).await;

    sink.emit(CrawlEvent::RunFinished {
        was_stopped: cancel.load(Ordering::Relaxed),
    });
}

#[allow(clippy::too_many_arguments)]
async fn worker_loop(
    fetcher: &dyn Fetcher,
    keyword: &str,
    settings: &CrawlSettings,
    cancel: &AtomicBool,
    ids: &AtomicU64,
    sink: &dyn EventSink,
    queue: &Mutex<VecDeque<SourceSpec>>,
    active: &Mutex<Vec<String>>,
    completed: &AtomicUsize,
    total: usize,
) {
    loop {
        if cancel.load(Ordering::Relaxed) {
            break;
        }
        let source = match queue.lock().expect("queue lock").pop_front() {
            Some(source) => source,
            None => break,
        };

        {
            let mut active_guard = active.lock().expect("active lock");
            active_guard.push(source.name.clone());
            emit_progress(sink, &active_guard, completed, total);
        }

        // A panicking parser must not take the pool down with it; the
        // offending source is recorded as an error and the worker moves on.
        let outcome = AssertUnwindSafe(process_source(
            fetcher,
            &source,
            keyword,
            settings.debug,
            ids,
        ))
        .catch_unwind()
        .await;
        let (records, raw_body) = match outcome {
            Ok(result) => result,
            Err(_) => {
                log::error!("{}: source task panicked", source.name);
                (
                    vec![error_record(
                        &source.name,
                        "unexpected internal error".to_owned(),
                        ids,
                    )],
                    None,
                )
            }
        };

        {
            let mut active_guard = active.lock().expect("active lock");
            if let Some(pos) = active_guard.iter().position(|name| name == &source.name) {
                active_guard.remove(pos);
            }
            completed.fetch_add(1, Ordering::Relaxed);
            emit_progress(sink, &active_guard, completed, total);
        }
        sink.emit(CrawlEvent::SourceCompleted {
            website: source.name,
            records,
            raw_body,
        });

        let queue_drained = queue.lock().expect("queue lock").is_empty();
        if !queue_drained {
            tokio::time::sleep(pacing_delay(settings)).await;
        }
    }
}

async fn process_source(
    fetcher: &dyn Fetcher,
    source: &SourceSpec,
    keyword: &str,
    debug: bool,
    ids: &AtomicU64,
) -> (Vec<CrawlRecord>, Option<String>) {
    let target_url = resolve_target_url(&source.url_template, keyword);
    log::debug!("{}: fetching {}", source.name, target_url);

    match fetcher.fetch(&target_url).await {
        Ok(output) => {
            let strategy = select_strategy(&target_url, output.content_type.as_deref());
            let items = parse_items(strategy, &output.body, &target_url);
            log::debug!(
                "{}: {:?} extracted {} candidate items",
                source.name,
                strategy,
                items.len()
            );
            let records = match_items(&items, keyword, &source.name, ids);
            let raw_body = debug.then_some(output.body);
            (records, raw_body)
        }
        Err(err) => {
            log::warn!("{}: fetch failed: {} ({})", source.name, err.kind, err.message);
            let raw_body = debug.then(|| {
                format!("fetch failed\n\nkind: {}\ndetail: {}", err.kind, err.message)
            });
            (
                vec![error_record(&source.name, err.user_message(), ids)],
                raw_body,
            )
        }
    }
}

fn emit_progress(sink: &dyn EventSink, active: &[String], completed: &AtomicUsize, total: usize) {
    sink.emit(CrawlEvent::Progress(CrawlProgress {
        active: active.len(),
        completed: completed.load(Ordering::Relaxed),
        total,
        active_sources: active.to_vec(),
    }));
}

fn pacing_delay(settings: &CrawlSettings) -> Duration {
    if settings.pacing_max_ms <= settings.pacing_min_ms {
        return Duration::from_millis(settings.pacing_min_ms);
    }
    Duration::from_millis(rand::random_range(
        settings.pacing_min_ms..settings.pacing_max_ms,
    ))
}
