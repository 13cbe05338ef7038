use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use newswatch_engine::{
    run_crawl, ChannelEventSink, CrawlEvent, CrawlSettings, EventSink, FetchSettings,
    RecordStatus, ReqwestFetcher, SourceSpec,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NEWS_PAGE: &str =
    r#"<html><body><a href="/story/1"><h3>big news tonight</h3></a></body></html>"#;
const BORING_PAGE: &str =
    r#"<html><body><a href="/story/2"><h3>weather report</h3></a></body></html>"#;

/// Collects events; optionally raises the cancel flag on the first batch.
struct TestSink {
    events: Mutex<Vec<CrawlEvent>>,
    cancel_on_first_batch: Option<Arc<AtomicBool>>,
}

impl TestSink {
    fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            cancel_on_first_batch: None,
        }
    }

    fn cancelling(cancel: Arc<AtomicBool>) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            cancel_on_first_batch: Some(cancel),
        }
    }

    fn take(&self) -> Vec<CrawlEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for TestSink {
    fn emit(&self, event: CrawlEvent) {
        if let (CrawlEvent::SourceCompleted { .. }, Some(cancel)) =
            (&event, &self.cancel_on_first_batch)
        {
            cancel.store(true, Ordering::Relaxed);
        }
        self.events.lock().unwrap().push(event);
    }
}

fn quick_settings(concurrency: usize) -> CrawlSettings {
    CrawlSettings {
        concurrency,
        pacing_min_ms: 0,
        pacing_max_ms: 0,
        debug: false,
    }
}

fn source(name: &str, url: String) -> SourceSpec {
    SourceSpec {
        name: name.to_owned(),
        url_template: url,
    }
}

fn batches(events: &[CrawlEvent]) -> Vec<(&str, &[newswatch_engine::CrawlRecord])> {
    events
        .iter()
        .filter_map(|event| match event {
            CrawlEvent::SourceCompleted {
                website, records, ..
            } => Some((website.as_str(), records.as_slice())),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn delivers_exactly_one_batch_per_source_even_when_sources_fail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(NEWS_PAGE, "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/boring"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(BORING_PAGE, "text/html"))
        .mount(&server)
        .await;

    let sources = vec![
        source("ok-site", format!("{}/ok", server.uri())),
        source("missing-site", format!("{}/missing", server.uri())),
        source("boring-site", format!("{}/boring", server.uri())),
    ];

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).expect("fetcher");
    let sink = TestSink::new();
    let cancel = AtomicBool::new(false);
    let ids = AtomicU64::new(0);

    run_crawl(
        &fetcher,
        sources,
        "news",
        &quick_settings(4),
        &cancel,
        &ids,
        &sink,
    )
    .await;

    let events = sink.take();
    let batches = batches(&events);
    assert_eq!(batches.len(), 3);

    let status_of = |name: &str| {
        batches
            .iter()
            .find(|(website, _)| *website == name)
            .map(|(_, records)| records[0].status)
            .expect("batch present")
    };
    assert_eq!(status_of("ok-site"), RecordStatus::Success);
    assert_eq!(status_of("missing-site"), RecordStatus::Error);
    assert_eq!(status_of("boring-site"), RecordStatus::NoMatch);

    match events.last() {
        Some(CrawlEvent::RunFinished { was_stopped }) => assert!(!was_stopped),
        other => panic!("expected RunFinished last, got {other:?}"),
    }

    // The final progress transition accounts for every source.
    let last_progress = events
        .iter()
        .rev()
        .find_map(|event| match event {
            CrawlEvent::Progress(progress) => Some(progress),
            _ => None,
        })
        .expect("progress events");
    assert_eq!(last_progress.completed, 3);
    assert_eq!(last_progress.total, 3);
    assert!(last_progress.active_sources.is_empty());
}

#[tokio::test]
async fn concurrency_cap_bounds_in_flight_fetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(100))
                .set_body_raw(NEWS_PAGE, "text/html"),
        )
        .mount(&server)
        .await;

    let sources = (0..10)
        .map(|i| source(&format!("site-{i}"), format!("{}/slow", server.uri())))
        .collect();

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).expect("fetcher");
    let sink = TestSink::new();
    let cancel = AtomicBool::new(false);
    let ids = AtomicU64::new(0);

    run_crawl(
        &fetcher,
        sources,
        "news",
        &quick_settings(4),
        &cancel,
        &ids,
        &sink,
    )
    .await;

    let events = sink.take();
    let max_active = events
        .iter()
        .filter_map(|event| match event {
            CrawlEvent::Progress(progress) => Some(progress.active),
            _ => None,
        })
        .max()
        .expect("progress events");
    assert!(max_active <= 4, "cap exceeded: {max_active} in flight");
    assert_eq!(batches(&events).len(), 10);
}

#[tokio::test]
async fn stop_lets_claimed_sources_finish_and_claims_no_more() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(100))
                .set_body_raw(NEWS_PAGE, "text/html"),
        )
        .mount(&server)
        .await;

    let sources: Vec<SourceSpec> = (0..6)
        .map(|i| source(&format!("site-{i}"), format!("{}/slow", server.uri())))
        .collect();

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).expect("fetcher");
    let cancel = Arc::new(AtomicBool::new(false));
    let sink = TestSink::cancelling(cancel.clone());
    let ids = AtomicU64::new(0);

    run_crawl(
        &fetcher,
        sources,
        "news",
        &quick_settings(2),
        &cancel,
        &ids,
        &sink,
    )
    .await;

    let events = sink.take();
    let batches = batches(&events);
    // Both claimed sources complete and are recorded; the rest of the queue
    // is never touched.
    assert_eq!(batches.len(), 2);
    match events.last() {
        Some(CrawlEvent::RunFinished { was_stopped }) => assert!(was_stopped),
        other => panic!("expected RunFinished last, got {other:?}"),
    }
}

#[tokio::test]
async fn keyword_placeholder_is_percent_encoded_into_the_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "rust news"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><body><a href="/hit"><h2>all about rust news</h2></a></body></html>"#,
            "text/html",
        ))
        .mount(&server)
        .await;

    let sources = vec![source(
        "search-site",
        format!("{}/search?q=%%KEYWORD%%", server.uri()),
    )];

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).expect("fetcher");
    let sink = TestSink::new();
    let cancel = AtomicBool::new(false);
    let ids = AtomicU64::new(0);

    run_crawl(
        &fetcher,
        sources,
        "rust news",
        &quick_settings(1),
        &cancel,
        &ids,
        &sink,
    )
    .await;

    let events = sink.take();
    let batches = batches(&events);
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].1[0].status, RecordStatus::Success);
    assert_eq!(batches[0].1[0].title, "all about rust news");
}

#[tokio::test]
async fn debug_mode_retains_raw_text_for_success_and_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(NEWS_PAGE, "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let sources = vec![
        source("ok-site", format!("{}/ok", server.uri())),
        source("missing-site", format!("{}/missing", server.uri())),
    ];

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).expect("fetcher");
    let sink = TestSink::new();
    let cancel = AtomicBool::new(false);
    let ids = AtomicU64::new(0);
    let settings = CrawlSettings {
        debug: true,
        ..quick_settings(1)
    };

    run_crawl(&fetcher, sources, "news", &settings, &cancel, &ids, &sink).await;

    let events = sink.take();
    for event in &events {
        if let CrawlEvent::SourceCompleted {
            website, raw_body, ..
        } = event
        {
            let raw = raw_body.as_deref().expect("raw body captured");
            if website == "ok-site" {
                assert_eq!(raw, NEWS_PAGE);
            } else {
                assert!(raw.contains("fetch failed"), "raw: {raw}");
            }
        }
    }
    assert_eq!(batches(&events).len(), 2);
}

#[tokio::test]
async fn channel_sink_forwards_events() {
    let (tx, rx) = std::sync::mpsc::channel();
    let sink = ChannelEventSink::new(tx);
    sink.emit(CrawlEvent::RunFinished { was_stopped: false });
    assert_eq!(
        rx.try_recv().ok(),
        Some(CrawlEvent::RunFinished { was_stopped: false })
    );
}
