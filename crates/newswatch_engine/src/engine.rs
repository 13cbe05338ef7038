use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::fetch::{FetchSettings, ReqwestFetcher};
use crate::pool::{run_crawl, ChannelEventSink, CrawlSettings};
use crate::{CrawlEvent, SourceSpec};

enum EngineCommand {
    StartCrawl {
        keyword: String,
        sources: Vec<SourceSpec>,
    },
}

/// Runs crawls on a dedicated thread with its own single-threaded runtime.
/// Commands go in over a channel; events are polled back out.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Mutex<mpsc::Receiver<CrawlEvent>>,
    cancel: Arc<AtomicBool>,
}

impl EngineHandle {
    pub fn new(fetch_settings: FetchSettings, crawl_settings: CrawlSettings) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>();
        let (event_tx, event_rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let crawl_cancel = cancel.clone();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    log::error!("failed to build crawl runtime: {err}");
                    return;
                }
            };
            let fetcher = match ReqwestFetcher::new(fetch_settings) {
                Ok(fetcher) => fetcher,
                Err(err) => {
                    log::error!("failed to build HTTP client: {}", err.message);
                    return;
                }
            };
            let ids = AtomicU64::new(0);

            while let Ok(EngineCommand::StartCrawl { keyword, sources }) = cmd_rx.recv() {
                let sink = ChannelEventSink::new(event_tx.clone());
                runtime.block_on(run_crawl(
                    &fetcher,
                    sources,
                    &keyword,
                    &crawl_settings,
                    &crawl_cancel,
                    &ids,
                    &sink,
                ));
            }
        });

        Self {
            cmd_tx,
            event_rx: Mutex::new(event_rx),
            cancel,
        }
    }

    /// Queue a crawl; the cooperative stop flag is reset first. Mutual
    /// exclusion of runs is the caller's concern.
    pub fn start_crawl(&self, keyword: impl Into<String>, sources: Vec<SourceSpec>) {
        self.cancel.store(false, Ordering::Relaxed);
        let _ = self.cmd_tx.send(EngineCommand::StartCrawl {
            keyword: keyword.into(),
            sources,
        });
    }

    /// Ask the active crawl to stop claiming new sources. Already-claimed
    /// sources still complete and deliver their batches.
    pub fn stop(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn try_recv(&self) -> Option<CrawlEvent> {
        self.event_rx.lock().ok().and_then(|rx| rx.try_recv().ok())
    }

    /// Block briefly for the next event; `None` on timeout or disconnect.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<CrawlEvent> {
        self.event_rx
            .lock()
            .ok()
            .and_then(|rx| rx.recv_timeout(timeout).ok())
    }
}
