//! Logger setup for the console binary.
//!
//! Progress frames own stdout, so the log is written to `./console.log` and,
//! with `--verbose`, mirrored to stderr. The level comes from `LEVEE_LOG`
//! (error, warn, info, debug, trace) and defaults to info.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILE: &str = "console.log";

/// Installs the global logger. Safe to call once per process; a failure to
/// create the log file degrades to stderr-only (or no logging at all).
pub fn initialize(verbose: bool) {
    let level = level_from_env();
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    match File::create(Path::new(LOG_FILE)) {
        Ok(file) => loggers.push(WriteLogger::new(level, config.clone(), file)),
        Err(err) => eprintln!("Warning: could not create {}: {}", LOG_FILE, err),
    }
    if verbose {
        loggers.push(TermLogger::new(
            level,
            config,
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if loggers.is_empty() {
        return;
    }
    let _ = CombinedLogger::init(loggers);
}

fn level_from_env() -> LevelFilter {
    let raw = std::env::var("LEVEE_LOG").map(|value| value.to_ascii_lowercase());
    match raw.as_deref() {
        Ok("error") => LevelFilter::Error,
        Ok("warn") => LevelFilter::Warn,
        Ok("debug") => LevelFilter::Debug,
        Ok("trace") => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}
