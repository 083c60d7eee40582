//! Terminal-status normalization for extraction tasks.
//!
//! The server reports task status as free-form text and is bilingual about
//! it: Chinese deployments say 完成 or 失败, English ones use a handful of
//! synonyms in whatever casing the worker happened to log. Callers should
//! branch on [`JobPhase`], never on the raw string.

/// Coarse lifecycle phase of a server-side extraction task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    Running,
    Completed,
    Failed,
}

const COMPLETED_WORDS: [&str; 3] = ["completed", "finished", "complete"];
const FAILED_WORDS: [&str; 2] = ["failed", "error"];

impl JobPhase {
    /// Classifies a raw status string. Unknown values mean the task is still
    /// in flight, so anything unrecognized maps to `Running`.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed == "完成" {
            return JobPhase::Completed;
        }
        if trimmed == "失败" {
            return JobPhase::Failed;
        }
        if COMPLETED_WORDS.iter().any(|w| trimmed.eq_ignore_ascii_case(w)) {
            return JobPhase::Completed;
        }
        if FAILED_WORDS.iter().any(|w| trimmed.eq_ignore_ascii_case(w)) {
            return JobPhase::Failed;
        }
        JobPhase::Running
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobPhase::Completed | JobPhase::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chinese_terminal_statuses() {
        assert_eq!(JobPhase::from_raw("完成"), JobPhase::Completed);
        assert_eq!(JobPhase::from_raw("失败"), JobPhase::Failed);
    }

    #[test]
    fn english_synonyms_ignore_ascii_case() {
        for raw in ["completed", "COMPLETED", "Finished", "complete", "CompletE"] {
            assert_eq!(JobPhase::from_raw(raw), JobPhase::Completed, "{raw}");
        }
        for raw in ["failed", "FAILED", "Error", "error"] {
            assert_eq!(JobPhase::from_raw(raw), JobPhase::Failed, "{raw}");
        }
    }

    #[test]
    fn whitespace_is_trimmed() {
        assert_eq!(JobPhase::from_raw("  完成\n"), JobPhase::Completed);
        assert_eq!(JobPhase::from_raw(" failed "), JobPhase::Failed);
    }

    #[test]
    fn anything_else_is_running() {
        for raw in ["进行中", "running", "pending", "", "完成了", "fail"] {
            assert_eq!(JobPhase::from_raw(raw), JobPhase::Running, "{raw:?}");
        }
    }

    #[test]
    fn terminal_predicate() {
        assert!(JobPhase::Completed.is_terminal());
        assert!(JobPhase::Failed.is_terminal());
        assert!(!JobPhase::Running.is_terminal());
    }
}
