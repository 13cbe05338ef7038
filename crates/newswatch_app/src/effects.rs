//! Executes core effects: engine wiring, the jittered reschedule timer, and
//! notification surfacing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use newswatch_core::{
    CrawlProgress, Effect, Msg, ResultRecord, ResultStatus, SourceEntry,
};
use newswatch_engine::{
    CrawlEvent, CrawlRecord, CrawlSettings, EngineHandle, FetchSettings, RecordStatus, SourceSpec,
};

use crate::app::Input;

/// Raw fetched text per website, kept only in debug mode.
pub type RawBodyCache = Arc<Mutex<HashMap<String, String>>>;

pub struct EffectRunner {
    engine: Arc<EngineHandle>,
    input_tx: mpsc::Sender<Input>,
    /// Bumped to invalidate a pending reschedule timer.
    timer_generation: Arc<AtomicU64>,
}

impl EffectRunner {
    pub fn new(
        input_tx: mpsc::Sender<Input>,
        crawl_settings: CrawlSettings,
        raw_bodies: RawBodyCache,
    ) -> Self {
        let engine = Arc::new(EngineHandle::new(FetchSettings::default(), crawl_settings));
        let runner = Self {
            engine,
            input_tx,
            timer_generation: Arc::new(AtomicU64::new(0)),
        };
        runner.spawn_event_loop(raw_bodies);
        runner
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartCrawl { keyword, sources } => {
                    log::info!(
                        "starting crawl: keyword='{}' sources={}",
                        keyword,
                        sources.len()
                    );
                    self.engine.start_crawl(keyword, map_sources(sources));
                }
                Effect::CancelCrawl => {
                    log::info!("stop requested; letting claimed sources finish");
                    self.engine.stop();
                }
                Effect::ScheduleNext { interval_minutes } => self.schedule(interval_minutes),
                Effect::CancelTimer => {
                    self.timer_generation.fetch_add(1, Ordering::Relaxed);
                }
                Effect::Notify { title, body } => {
                    // Notification delivery in a terminal is a printed line.
                    println!("\n*** {title}: {body}");
                    log::info!("notification: {title}: {body}");
                }
            }
        }
    }

    fn schedule(&self, interval_minutes: u32) {
        // Invalidate any earlier timer before arming the new one.
        let generation = self.timer_generation.fetch_add(1, Ordering::Relaxed) + 1;
        let delay = jittered_delay(interval_minutes);
        let fire_at = chrono::Local::now()
            + chrono::Duration::milliseconds(delay.as_millis() as i64);
        println!(
            "next crawl scheduled for {} (in {}s)",
            fire_at.format("%H:%M:%S"),
            delay.as_secs()
        );

        let timer_generation = self.timer_generation.clone();
        let input_tx = self.input_tx.clone();
        thread::spawn(move || {
            thread::sleep(delay);
            if timer_generation.load(Ordering::Relaxed) == generation {
                let _ = input_tx.send(Input::Core(Msg::TimerFired));
            }
        });
    }

    fn spawn_event_loop(&self, raw_bodies: RawBodyCache) {
        let engine = self.engine.clone();
        let input_tx = self.input_tx.clone();
        thread::spawn(move || loop {
            if let Some(event) = engine.recv_timeout(Duration::from_millis(50)) {
                let msg = map_event(event, &raw_bodies);
                if input_tx.send(Input::Core(msg)).is_err() {
                    break;
                }
            }
        });
    }
}

fn map_event(event: CrawlEvent, raw_bodies: &RawBodyCache) -> Msg {
    match event {
        CrawlEvent::Progress(progress) => Msg::ProgressUpdated(CrawlProgress {
            active: progress.active,
            completed: progress.completed,
            total: progress.total,
            active_sources: progress.active_sources,
        }),
        CrawlEvent::SourceCompleted {
            website,
            records,
            raw_body,
        } => {
            if let Some(raw) = raw_body {
                if let Ok(mut cache) = raw_bodies.lock() {
                    cache.insert(website.clone(), raw);
                }
            }
            Msg::BatchReceived {
                website,
                records: records.into_iter().map(map_record).collect(),
            }
        }
        CrawlEvent::RunFinished { was_stopped } => Msg::CrawlFinished { was_stopped },
    }
}

fn map_sources(sources: Vec<SourceEntry>) -> Vec<SourceSpec> {
    sources
        .into_iter()
        .map(|source| SourceSpec {
            name: source.name,
            url_template: source.url,
        })
        .collect()
}

fn map_record(record: CrawlRecord) -> ResultRecord {
    ResultRecord {
        id: record.id,
        website: record.website,
        title: record.title,
        url: record.url,
        status: match record.status {
            RecordStatus::Success => ResultStatus::Success,
            RecordStatus::NoMatch => ResultStatus::NoMatch,
            RecordStatus::Error => ResultStatus::Error,
        },
        error: record.error,
    }
}

/// Jittered reschedule delay: ±20% around the configured interval.
fn jittered_delay(interval_minutes: u32) -> Duration {
    let factor = 0.8 + rand::random::<f64>() * 0.4;
    let millis = f64::from(interval_minutes) * factor * 60_000.0;
    Duration::from_millis(millis as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jittered_delay_stays_within_twenty_percent() {
        for _ in 0..200 {
            let delay = jittered_delay(30);
            assert!(delay >= Duration::from_secs(30 * 60 * 8 / 10));
            assert!(delay <= Duration::from_secs(30 * 60 * 12 / 10));
        }
    }
}
