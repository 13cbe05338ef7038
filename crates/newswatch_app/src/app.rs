//! Terminal frontend run loop: multiplexes engine events, the reschedule
//! timer, and interactive stdin commands into the core state machine.

use std::collections::HashMap;
use std::io::BufRead;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use newswatch_core::{update, AppState, Msg, ResultStatus, SessionState, SourceEntry};
use newswatch_engine::CrawlSettings;

use crate::cli::Cli;
use crate::effects::{EffectRunner, RawBodyCache};
use crate::persistence;
use crate::render;

/// Inputs multiplexed into the main loop.
pub enum Input {
    Core(Msg),
    ToggleTimed,
    ShowRaw(String),
    Quit,
}

pub fn run(args: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let sources = persistence::load_or_seed(&args.sources)?;
    println!(
        "loaded {} sources from {}",
        sources.len(),
        args.sources.display()
    );

    let (input_tx, input_rx) = mpsc::channel::<Input>();
    let raw_bodies: RawBodyCache = Arc::new(Mutex::new(HashMap::new()));
    let crawl_settings = CrawlSettings {
        concurrency: args.concurrency,
        debug: args.debug,
        ..CrawlSettings::default()
    };
    let runner = EffectRunner::new(input_tx.clone(), crawl_settings, raw_bodies.clone());
    spawn_stdin_loop(input_tx);

    let mut state = AppState::new();
    dispatch(&mut state, initial_msg(&args, sources.clone()), &runner);
    if let Some(reason) = state.view().rejection {
        return Err(render::describe_rejection(reason).into());
    }

    loop {
        let input = match input_rx.recv_timeout(Duration::from_millis(200)) {
            Ok(input) => input,
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        };

        match input {
            Input::Core(msg) => {
                announce(&msg);
                let run_finished = matches!(msg, Msg::CrawlFinished { .. });
                let cleared = matches!(msg, Msg::ClearResultsRequested);
                dispatch(&mut state, msg, &runner);
                if cleared {
                    if let Ok(mut cache) = raw_bodies.lock() {
                        cache.clear();
                    }
                    println!("results cleared");
                }
                if run_finished {
                    render::render_results(&state.view());
                }
            }
            Input::ToggleTimed => {
                dispatch(
                    &mut state,
                    Msg::TimedToggled {
                        keyword: args.keyword.clone(),
                        sources: sources.clone(),
                        interval_minutes: args.interval,
                    },
                    &runner,
                );
                match state.view().rejection {
                    Some(reason) => println!("{}", render::describe_rejection(reason)),
                    None if state.timed_enabled() => println!("timed crawling on"),
                    None => println!("timed crawling off"),
                }
            }
            Input::ShowRaw(website) => {
                let cached = raw_bodies
                    .lock()
                    .ok()
                    .and_then(|cache| cache.get(&website).cloned());
                match cached {
                    Some(body) => println!("{body}"),
                    None => println!(
                        "no raw text cached for '{website}' (crawl with --debug first)"
                    ),
                }
            }
            Input::Quit => break,
        }

        // A finished manual session (or a drained timed session that was
        // toggled off) leaves nothing to wait for.
        if state.session() == SessionState::Idle && !state.timed_enabled() {
            break;
        }
    }

    Ok(())
}

fn initial_msg(args: &Cli, sources: Vec<SourceEntry>) -> Msg {
    if args.timed {
        Msg::TimedToggled {
            keyword: args.keyword.clone(),
            sources,
            interval_minutes: args.interval,
        }
    } else {
        Msg::StartClicked {
            keyword: args.keyword.clone(),
            sources,
        }
    }
}

fn dispatch(state: &mut AppState, msg: Msg, runner: &EffectRunner) {
    let current = std::mem::take(state);
    let (next, effects) = update(current, msg);
    *state = next;
    runner.run(effects);
}

/// Incremental, per-event lines printed while a crawl is running.
fn announce(msg: &Msg) {
    match msg {
        Msg::ProgressUpdated(progress) => render::render_progress(progress),
        Msg::BatchReceived { website, records } => {
            let successes = records
                .iter()
                .filter(|r| r.status == ResultStatus::Success)
                .count();
            let line = if successes > 0 {
                format!("{website}: {successes} matching link(s)")
            } else if records.iter().any(|r| r.status == ResultStatus::Error) {
                format!("{website}: crawl failed")
            } else {
                format!("{website}: no matches")
            };
            // Overwrite the in-place progress line.
            println!("\r  {line:<78}");
        }
        _ => {}
    }
}

fn spawn_stdin_loop(input_tx: mpsc::Sender<Input>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(_) => break,
            };
            let line = line.trim();
            let input = match line {
                "" => continue,
                "q" | "quit" => Input::Quit,
                "s" | "stop" => Input::Core(Msg::StopClicked),
                "t" | "timed" => Input::ToggleTimed,
                "c" | "clear" => Input::Core(Msg::ClearResultsRequested),
                _ => {
                    if let Some(website) = line.strip_prefix("raw ") {
                        Input::ShowRaw(website.trim().to_owned())
                    } else if let Some(id) = line.strip_prefix("del ") {
                        match id.trim().parse() {
                            Ok(id) => Input::Core(Msg::ResultDeleted { id }),
                            Err(_) => {
                                println!("usage: del <result id>");
                                continue;
                            }
                        }
                    } else if let Some(website) = line.strip_prefix("delsite ") {
                        Input::Core(Msg::WebsiteResultsDeleted {
                            website: website.trim().to_owned(),
                        })
                    } else {
                        println!(
                            "commands: s(top), t(imed), c(lear), raw <site>, del <id>, delsite <site>, q(uit)"
                        );
                        continue;
                    }
                }
            };
            let quit = matches!(input, Input::Quit);
            if input_tx.send(input).is_err() || quit {
                break;
            }
        }
    });
}
