use newswatch_core::{
    update, AppState, Msg, ResultRecord, ResultStatus, SourceEntry,
};

fn sources(names: &[&str]) -> Vec<SourceEntry> {
    names
        .iter()
        .map(|name| SourceEntry {
            name: (*name).to_owned(),
            url: format!("https://{name}.example.com"),
            enabled: true,
        })
        .collect()
}

fn record(id: u64, website: &str, status: ResultStatus) -> ResultRecord {
    let success = status == ResultStatus::Success;
    ResultRecord {
        id,
        website: website.to_owned(),
        title: if success { format!("news {id}") } else { String::new() },
        url: if success {
            format!("https://{website}.example.com/{id}")
        } else {
            String::new()
        },
        status,
        error: (status == ResultStatus::Error).then(|| "connection timed out".to_owned()),
    }
}

fn batch(state: AppState, website: &str, records: Vec<ResultRecord>) -> AppState {
    let (state, _) = update(
        state,
        Msg::BatchReceived {
            website: website.to_owned(),
            records,
        },
    );
    state
}

fn running_state(names: &[&str]) -> AppState {
    let (state, _) = update(
        AppState::new(),
        Msg::StartClicked {
            keyword: "news".to_owned(),
            sources: sources(names),
        },
    );
    state
}

#[test]
fn display_order_follows_source_list_not_completion_order() {
    let state = running_state(&["alpha", "beta", "gamma"]);

    // Batches arrive out of order; beta never reports.
    let state = batch(state, "gamma", vec![record(0, "gamma", ResultStatus::Success)]);
    let state = batch(state, "alpha", vec![record(1, "alpha", ResultStatus::Success)]);

    let view = state.view();
    let names: Vec<&str> = view
        .groups
        .iter()
        .map(|group| group.website.as_str())
        .collect();
    assert_eq!(names, vec!["alpha", "gamma"]);
}

#[test]
fn group_markers_reflect_statuses() {
    let state = running_state(&["alpha", "beta", "gamma"]);
    let state = batch(
        state,
        "alpha",
        vec![
            record(0, "alpha", ResultStatus::Success),
            record(1, "alpha", ResultStatus::Success),
        ],
    );
    let state = batch(state, "beta", vec![record(2, "beta", ResultStatus::NoMatch)]);
    let state = batch(state, "gamma", vec![record(3, "gamma", ResultStatus::Error)]);

    let view = state.view();
    assert_eq!(view.success_count, 2);
    assert_eq!(view.searched_site_count, 3);

    let alpha = &view.groups[0];
    assert!(alpha.has_success && !alpha.has_error && !alpha.all_no_match);

    let beta = &view.groups[1];
    assert!(!beta.has_success && beta.all_no_match);

    let gamma = &view.groups[2];
    assert!(gamma.has_error && !gamma.has_success);
    assert_eq!(
        gamma.rows[0].error.as_deref(),
        Some("connection timed out")
    );
}

#[test]
fn deleting_a_result_removes_only_that_row() {
    let state = running_state(&["alpha"]);
    let state = batch(
        state,
        "alpha",
        vec![
            record(0, "alpha", ResultStatus::Success),
            record(1, "alpha", ResultStatus::Success),
        ],
    );

    let (state, effects) = update(state, Msg::ResultDeleted { id: 0 });
    assert!(effects.is_empty());

    let view = state.view();
    assert_eq!(view.groups[0].rows.len(), 1);
    assert_eq!(view.groups[0].rows[0].id, 1);
}

#[test]
fn deleting_a_website_removes_its_group() {
    let state = running_state(&["alpha", "beta"]);
    let state = batch(state, "alpha", vec![record(0, "alpha", ResultStatus::Success)]);
    let state = batch(state, "beta", vec![record(1, "beta", ResultStatus::Error)]);

    let (state, _) = update(
        state,
        Msg::WebsiteResultsDeleted {
            website: "beta".to_owned(),
        },
    );

    let view = state.view();
    assert_eq!(view.groups.len(), 1);
    assert_eq!(view.groups[0].website, "alpha");
}
