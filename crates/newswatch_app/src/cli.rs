//! Command-line interface for the newswatch terminal frontend.

use std::path::PathBuf;

use clap::Parser;

/// Crawl configured news sources for a keyword and print matching links.
///
/// With `--timed`, the crawl repeats unattended on a jittered interval and
/// links that were absent from the previous cycle are flagged as new.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Keyword to match against article titles
    #[arg(short, long)]
    pub keyword: String,

    /// Source list file, one `Name：URL` line per source
    /// (created with the built-in defaults when missing)
    #[arg(short, long, default_value = "sources.txt")]
    pub sources: PathBuf,

    /// Maximum number of sources fetched concurrently
    #[arg(short = 'n', long, default_value_t = newswatch_engine::DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Re-run automatically with a jittered interval
    #[arg(short, long)]
    pub timed: bool,

    /// Minutes between timed runs, before jitter
    #[arg(short, long, default_value_t = 30)]
    pub interval: u32,

    /// Retain raw fetched text per source (inspect with the `raw` command)
    #[arg(short, long)]
    pub debug: bool,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs to this file instead of the terminal
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_invocation() {
        let cli = Cli::parse_from(["newswatch", "--keyword", "storm"]);
        assert_eq!(cli.keyword, "storm");
        assert_eq!(cli.concurrency, 4);
        assert_eq!(cli.interval, 30);
        assert!(!cli.timed);
        assert!(!cli.debug);
    }

    #[test]
    fn parses_timed_flags() {
        let cli = Cli::parse_from([
            "newswatch", "-k", "storm", "-t", "-i", "10", "-n", "2", "--debug",
        ]);
        assert!(cli.timed);
        assert_eq!(cli.interval, 10);
        assert_eq!(cli.concurrency, 2);
        assert!(cli.debug);
    }
}
