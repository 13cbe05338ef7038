mod app;
mod cli;
mod effects;
mod persistence;
mod render;

use std::process::ExitCode;

use clap::Parser;
use crawl_logging::LogDestination;
use log::LevelFilter;

fn main() -> ExitCode {
    let args = cli::Cli::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    match args.log_file.as_deref() {
        Some(path) => crawl_logging::initialize(LogDestination::File(path), level),
        None => crawl_logging::initialize(LogDestination::Terminal, level),
    }

    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
