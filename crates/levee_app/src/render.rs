//! Terminal frame rendering. Pure string building so the layout is testable
//! without a terminal.

use levee_core::{TrackerPhase, TrackerView, UrlStatus};

const TAIL_LINES: usize = 5;

pub fn render(view: &TrackerView) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "kb: {} | phase: {}{}",
        view.kb_id,
        phase_label(view.phase),
        thinking_dots(view.dots)
    ));
    if view.poll_cycles > 0 {
        out.push_str(&format!(" | cycle {}", view.poll_cycles));
    }
    out.push('\n');

    if let Some(task_id) = &view.task_id {
        match &view.created_at {
            Some(created_at) => {
                out.push_str(&format!("task: {} (created {})\n", task_id, created_at))
            }
            None => out.push_str(&format!("task: {}\n", task_id)),
        }
    }
    if let Some(stats) = &view.last_submit {
        out.push_str(&format!(
            "submitted: accepted {}, rejected {}\n",
            stats.accepted, stats.rejected
        ));
    }
    if view.total > 0 {
        out.push_str(&format!("progress: {}/{}", view.cursor, view.total));
        if !view.current_url.is_empty() {
            out.push_str(&format!("  current: {}", view.current_url));
        }
        out.push('\n');
    }

    for (index, row) in view.rows.iter().enumerate() {
        out.push_str(&format_url_row(index + 1, row));
        out.push('\n');
    }

    push_tail(&mut out, "activity", &view.activity);
    push_tail(&mut out, "server log", &view.server_logs);

    if let Some(notice) = &view.notice {
        out.push_str(&format!("notice: {}\n", notice));
    }
    if let Some(error) = &view.error {
        out.push_str(&format!("error: {}\n", error));
    }

    out
}

fn format_url_row(position: usize, row: &levee_core::UrlRowView) -> String {
    let status = status_label(row.status);
    let mut line = format!("  [{:>2}] {:<4} {}", position, status, row.url);
    if row.status == UrlStatus::Extracting && row.progress > 0 {
        line.push_str(&format!(" ({}%)", row.progress));
    }
    if !row.message.is_empty() {
        line.push_str(&format!(" - {}", row.message));
    }
    line
}

fn push_tail(out: &mut String, heading: &str, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    out.push_str(heading);
    out.push_str(":\n");
    let start = lines.len().saturating_sub(TAIL_LINES);
    for line in &lines[start..] {
        out.push_str(&format!("  {}\n", line));
    }
}

fn phase_label(phase: TrackerPhase) -> &'static str {
    match phase {
        TrackerPhase::Idle => "idle",
        TrackerPhase::Submitting => "submitting",
        TrackerPhase::Polling => "extracting",
        TrackerPhase::Completed => "completed",
        TrackerPhase::Failed => "failed",
    }
}

fn status_label(status: UrlStatus) -> &'static str {
    match status {
        UrlStatus::Pending => "WAIT",
        UrlStatus::Extracting => "RUN",
        UrlStatus::Completed => "OK",
        UrlStatus::Failed => "ERR",
    }
}

fn thinking_dots(dots: u8) -> String {
    ".".repeat(dots as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use levee_core::{SubmitStats, UrlRowView};
    use pretty_assertions::assert_eq;

    fn base_view() -> TrackerView {
        TrackerView {
            kb_id: "kb_flood".to_string(),
            ..TrackerView::default()
        }
    }

    #[test]
    fn idle_frame_is_a_single_header_line() {
        let frame = render(&base_view());
        assert_eq!(frame, "kb: kb_flood | phase: idle\n");
    }

    #[test]
    fn active_frame_shows_task_progress_and_rows() {
        let mut view = base_view();
        view.phase = TrackerPhase::Polling;
        view.task_id = Some("1699999".to_string());
        view.created_at = Some("2026-08-25T08:00:00Z".to_string());
        view.cursor = 2;
        view.total = 3;
        view.current_url = "https://b.example/flood".to_string();
        view.dots = 2;
        view.poll_cycles = 4;
        view.last_submit = Some(SubmitStats {
            accepted: 3,
            rejected: 1,
        });
        view.rows = vec![
            UrlRowView {
                url: "https://a.example".to_string(),
                status: UrlStatus::Completed,
                progress: 100,
                message: String::new(),
            },
            UrlRowView {
                url: "https://b.example/flood".to_string(),
                status: UrlStatus::Extracting,
                progress: 45,
                message: String::new(),
            },
            UrlRowView {
                url: "https://c.example".to_string(),
                status: UrlStatus::Pending,
                progress: 0,
                message: String::new(),
            },
        ];

        let frame = render(&view);
        assert!(frame.starts_with("kb: kb_flood | phase: extracting.. | cycle 4\n"));
        assert!(frame.contains("task: 1699999 (created 2026-08-25T08:00:00Z)\n"));
        assert!(frame.contains("submitted: accepted 3, rejected 1\n"));
        assert!(frame.contains("progress: 2/3  current: https://b.example/flood\n"));
        assert!(frame.contains("[ 1] OK   https://a.example\n"));
        assert!(frame.contains("[ 2] RUN  https://b.example/flood (45%)\n"));
        assert!(frame.contains("[ 3] WAIT https://c.example\n"));
    }

    #[test]
    fn failed_rows_carry_their_message() {
        let mut view = base_view();
        view.phase = TrackerPhase::Failed;
        view.rows = vec![UrlRowView {
            url: "https://a.example".to_string(),
            status: UrlStatus::Failed,
            progress: 0,
            message: "timeout".to_string(),
        }];
        view.error = Some("extraction failed".to_string());

        let frame = render(&view);
        assert!(frame.contains("[ 1] ERR  https://a.example - timeout\n"));
        assert!(frame.ends_with("error: extraction failed\n"));
    }

    #[test]
    fn log_tails_keep_only_the_last_five_lines() {
        let mut view = base_view();
        view.server_logs = (1..=8).map(|n| format!("[INFO] line {}", n)).collect();

        let frame = render(&view);
        assert!(!frame.contains("line 3"));
        assert!(frame.contains("line 4"));
        assert!(frame.contains("line 8"));
    }

    #[test]
    fn empty_tails_render_no_heading() {
        let frame = render(&base_view());
        assert!(!frame.contains("activity:"));
        assert!(!frame.contains("server log:"));
    }
}
