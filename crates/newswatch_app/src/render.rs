//! Terminal rendering of crawl results and progress.

use std::io::Write;

use newswatch_core::{AppViewModel, CrawlProgress, RejectReason, ResultStatus};

pub fn describe_rejection(reason: RejectReason) -> &'static str {
    match reason {
        RejectReason::EmptyKeyword => "a keyword is required",
        RejectReason::NoSourcesSelected => "at least one enabled source is required",
        RejectReason::AlreadyRunning => "a crawl is already running",
        RejectReason::TimedModeActive => "timed crawling is active; stop it first",
        RejectReason::ManualRunActive => "wait for the current manual crawl to finish",
    }
}

/// One-line, in-place progress indicator.
pub fn render_progress(progress: &CrawlProgress) {
    let label = if progress.active_sources.is_empty() {
        if progress.completed < progress.total {
            "waiting".to_owned()
        } else {
            "done".to_owned()
        }
    } else {
        format!("searching {}", progress.active_sources.join(", "))
    };
    print!(
        "\r[{}/{}] {:<70}",
        progress.completed.min(progress.total),
        progress.total,
        label
    );
    let _ = std::io::stdout().flush();
}

/// Full result listing: website groups in original source order, each group
/// with its status markers and rows.
pub fn render_results(view: &AppViewModel) {
    println!();
    if view.groups.is_empty() {
        println!("no results");
        return;
    }

    for group in &view.groups {
        let marker = if group.has_success {
            "+"
        } else if group.has_error {
            "!"
        } else {
            "-"
        };
        println!("[{marker}] {}", group.website);
        for row in &group.rows {
            match row.status {
                ResultStatus::Success => {
                    let badge = if row.is_new { "[NEW] " } else { "" };
                    println!("    #{} {badge}{}", row.id, row.title);
                    println!("        {}", row.url);
                }
                ResultStatus::Error => {
                    println!(
                        "    crawl failed: {}",
                        row.error.as_deref().unwrap_or("unknown error")
                    );
                }
                ResultStatus::NoMatch => {}
            }
        }
        if group.all_no_match {
            println!("    no matching articles");
        }
    }

    if let Some(summary) = view.summary {
        println!("\n{}", summary.describe());
    }
}
