use crate::{
    AppState, Effect, Msg, RejectReason, RunMode, SessionState, SourceEntry,
    DEFAULT_INTERVAL_MINUTES,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::StartClicked { keyword, sources } => start_manual(&mut state, keyword, sources),
        Msg::TimedToggled {
            keyword,
            sources,
            interval_minutes,
        } => toggle_timed(&mut state, keyword, sources, interval_minutes),
        Msg::TimerFired => timer_fired(&mut state),
        Msg::StopClicked => {
            if state.is_running() && !state.stop_requested() {
                state.request_stop();
                vec![Effect::CancelCrawl]
            } else {
                Vec::new()
            }
        }
        Msg::BatchReceived { records, .. } => {
            state.append_results(records);
            Vec::new()
        }
        Msg::ProgressUpdated(progress) => {
            state.set_progress(progress);
            Vec::new()
        }
        Msg::CrawlFinished { was_stopped } => crawl_finished(&mut state, was_stopped),
        Msg::ClearResultsRequested => {
            state.clear_results();
            Vec::new()
        }
        Msg::ResultDeleted { id } => {
            state.delete_result(id);
            Vec::new()
        }
        Msg::WebsiteResultsDeleted { website } => {
            state.delete_website_results(&website);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn start_manual(
    state: &mut AppState,
    keyword: String,
    sources: Vec<SourceEntry>,
) -> Vec<Effect> {
    state.clear_rejection();
    if state.is_running() {
        state.set_rejection(RejectReason::AlreadyRunning);
        return Vec::new();
    }
    if state.timed_enabled() {
        state.set_rejection(RejectReason::TimedModeActive);
        return Vec::new();
    }
    let keyword = keyword.trim().to_owned();
    if let Err(reason) = validate(&keyword, &sources) {
        state.set_rejection(reason);
        return Vec::new();
    }

    state.begin_run(RunMode::Manual, keyword.clone(), sources);
    vec![Effect::StartCrawl {
        keyword,
        sources: state.enabled_sources(),
    }]
}

fn toggle_timed(
    state: &mut AppState,
    keyword: String,
    sources: Vec<SourceEntry>,
    interval_minutes: u32,
) -> Vec<Effect> {
    state.clear_rejection();
    if state.timed_enabled() {
        // Toggle off: a pending timer is disarmed; an in-flight run drains
        // into Idle without rescheduling.
        state.set_timed_enabled(false);
        if state.session() == SessionState::Scheduled {
            state.set_session(SessionState::Idle);
            return vec![Effect::CancelTimer];
        }
        return Vec::new();
    }

    if state.session() == SessionState::Running(RunMode::Manual) {
        state.set_rejection(RejectReason::ManualRunActive);
        return Vec::new();
    }
    let keyword = keyword.trim().to_owned();
    if let Err(reason) = validate(&keyword, &sources) {
        state.set_rejection(reason);
        return Vec::new();
    }

    let interval = if interval_minutes == 0 {
        DEFAULT_INTERVAL_MINUTES
    } else {
        interval_minutes
    };
    state.set_interval_minutes(interval);
    state.set_timed_enabled(true);
    // First execution fires immediately; later cycles go through Scheduled.
    state.begin_run(RunMode::Timed, keyword.clone(), sources);
    vec![Effect::StartCrawl {
        keyword,
        sources: state.enabled_sources(),
    }]
}

fn timer_fired(state: &mut AppState) -> Vec<Effect> {
    // A timer tick that raced a toggle-off is stale and ignored.
    if state.session() != SessionState::Scheduled || !state.timed_enabled() {
        return Vec::new();
    }
    let keyword = state.keyword().to_owned();
    let sources = state.enabled_sources();
    state.begin_run(RunMode::Timed, keyword.clone(), sources.clone());
    vec![Effect::StartCrawl { keyword, sources }]
}

fn crawl_finished(state: &mut AppState, was_stopped: bool) -> Vec<Effect> {
    let mode = match state.session() {
        SessionState::Running(mode) => mode,
        _ => return Vec::new(),
    };
    let summary = state.finish_run(was_stopped);

    match mode {
        RunMode::Manual => {
            state.set_session(SessionState::Idle);
            Vec::new()
        }
        RunMode::Timed => {
            let mut effects = vec![Effect::Notify {
                title: "Timed crawl complete".to_owned(),
                body: format!("keyword '{}': {}", state.keyword(), summary.describe()),
            }];
            if state.timed_enabled() {
                state.set_session(SessionState::Scheduled);
                effects.push(Effect::ScheduleNext {
                    interval_minutes: state.interval_minutes(),
                });
            } else {
                state.set_session(SessionState::Idle);
            }
            effects
        }
    }
}

fn validate(keyword: &str, sources: &[SourceEntry]) -> Result<(), RejectReason> {
    if keyword.is_empty() {
        return Err(RejectReason::EmptyKeyword);
    }
    if !sources.iter().any(|s| s.enabled) {
        return Err(RejectReason::NoSourcesSelected);
    }
    Ok(())
}
