#![deny(missing_docs)]
//! Shared logging utilities for the console workspace.
//!
//! This crate provides the `console_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. The macros stamp each
//! line with the poll cycle the dispatch loop last published, so a log read
//! after the fact can be lined up with the tracker's progress snapshots.

use std::cell::Cell;

thread_local! {
    /// Thread-local storage for the current poll cycle count.
    static POLL_CYCLE: Cell<u64> = const { Cell::new(0) };
}

/// Sets the poll cycle count for the current thread.
/// This should be called by the dispatch loop once per completed poll cycle.
pub fn set_poll_cycle(cycle: u64) {
    POLL_CYCLE.with(|v| v.set(cycle));
}

/// Retrieves the poll cycle count for the current thread.
/// Returns 0 if no cycle has been recorded; messages logged outside an
/// active job carry no cycle prefix.
pub fn get_poll_cycle() -> u64 {
    POLL_CYCLE.with(|v| v.get())
}

/// Logs through the global facade at the given level, prefixed with the
/// current poll cycle when one is set. Used by the level-named macros below;
/// call those instead.
#[macro_export]
macro_rules! console_log_at {
    ($level:ident, $($arg:tt)*) => {{
        match $crate::get_poll_cycle() {
            0 => log::$level!($($arg)*),
            cycle => log::$level!("[cycle {}] {}", cycle, format_args!($($arg)*)),
        }
    }};
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! console_trace {
    ($($arg:tt)*) => { $crate::console_log_at!(trace, $($arg)*) };
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! console_info {
    ($($arg:tt)*) => { $crate::console_log_at!(info, $($arg)*) };
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! console_debug {
    ($($arg:tt)*) => { $crate::console_log_at!(debug, $($arg)*) };
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! console_warn {
    ($($arg:tt)*) => { $crate::console_log_at!(warn, $($arg)*) };
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! console_error {
    ($($arg:tt)*) => { $crate::console_log_at!(error, $($arg)*) };
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
