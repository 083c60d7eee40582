//! Report export: saves generated report markdown under a deterministic,
//! filesystem-safe name derived from the query.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::storage::{AtomicFileWriter, StorageError};

/// Writes `markdown` to `{dir}/{stem}--{hash}.md` and returns the path.
pub fn export_report(dir: &Path, query: &str, markdown: &str) -> Result<PathBuf, StorageError> {
    let writer = AtomicFileWriter::new(dir.to_path_buf());
    writer.write(&report_filename(query), markdown)
}

/// Deterministic filename for a report: sanitized query stem plus a short
/// hash of the full query, so distinct queries with the same stem do not
/// collide.
pub fn report_filename(query: &str) -> String {
    format!("{}--{}.md", sanitize_stem(query), short_hash(query))
}

fn sanitize_stem(input: &str) -> String {
    let mut cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]).to_string();
    if cleaned.is_empty() {
        cleaned = "report".to_string();
    }
    // Collapse runs of underscores left by replacement.
    let mut compacted = String::with_capacity(cleaned.len());
    let mut prev_underscore = false;
    for c in cleaned.chars() {
        if c == '_' {
            if !prev_underscore {
                compacted.push(c);
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }
    // Truncate by characters, not bytes; queries are frequently Chinese.
    let mut stem: String = compacted.chars().take(60).collect();
    if is_reserved_windows_name(&stem) {
        stem.push('_');
    }
    stem
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

fn short_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
