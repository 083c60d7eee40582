//! Reformatting for server log tails.
//!
//! The extraction worker logs through loguru, so raw lines look like
//! `2024-01-15 10:30:45.123 | INFO     | module:function:42 - message`.
//! The console shows them as `[INFO] message`. Lines that do not match the
//! loguru shape pass through untouched.

use std::sync::OnceLock;

use regex::Regex;

/// A parsed loguru line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub timestamp: String,
    pub level: String,
    pub text: String,
}

fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{4}-\d{2}-\d{2}\s\d{2}:\d{2}:\d{2}\.\d+)\s+\|\s+(\w+)\s+\|\s+(.+)$")
            .expect("static pattern")
    })
}

fn source_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\S+:\S+:\d+\s*-\s*").expect("static pattern"))
}

/// Splits a raw loguru line into timestamp, level and message text, dropping
/// the `module:function:line -` source prefix. Returns `None` for lines in
/// any other format.
pub fn parse_log_line(raw: &str) -> Option<LogLine> {
    let captures = line_pattern().captures(raw.trim_end())?;
    let body = captures.get(3)?.as_str();
    let text = source_pattern().replace(body, "").trim().to_string();
    Some(LogLine {
        timestamp: captures.get(1)?.as_str().to_string(),
        level: captures.get(2)?.as_str().to_string(),
        text,
    })
}

/// Renders a raw server line for display. Loguru lines become
/// `[LEVEL] message`; anything else is returned as-is.
pub fn format_log_line(raw: &str) -> String {
    match parse_log_line(raw) {
        Some(line) => format!("[{}] {}", line.level, line.text),
        None => raw.to_string(),
    }
}
