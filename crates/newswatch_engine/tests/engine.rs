use std::time::{Duration, Instant};

use newswatch_engine::{
    CrawlEvent, CrawlSettings, EngineHandle, FetchSettings, RecordStatus, SourceSpec,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn engine_handle_runs_a_crawl_and_streams_events() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/doc"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><body><a href="/story"><h2>late night news</h2></a></body></html>"#,
            "text/html",
        ))
        .mount(&server)
        .await;

    let handle = EngineHandle::new(
        FetchSettings::default(),
        CrawlSettings {
            concurrency: 2,
            pacing_min_ms: 0,
            pacing_max_ms: 0,
            debug: false,
        },
    );
    handle.start_crawl(
        "news",
        vec![SourceSpec {
            name: "doc-site".to_owned(),
            url_template: format!("{}/doc", server.uri()),
        }],
    );

    let mut batch_statuses = Vec::new();
    let mut finished = false;
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        match handle.try_recv() {
            Some(CrawlEvent::SourceCompleted { records, .. }) => {
                batch_statuses.extend(records.iter().map(|record| record.status));
            }
            Some(CrawlEvent::RunFinished { was_stopped }) => {
                assert!(!was_stopped);
                finished = true;
                break;
            }
            Some(CrawlEvent::Progress(_)) => {}
            None => tokio::time::sleep(Duration::from_millis(10)).await,
        }
    }

    assert!(finished, "crawl did not finish in time");
    assert_eq!(batch_statuses, vec![RecordStatus::Success]);
}
