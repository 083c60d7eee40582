use crate::{TrackerPhase, UrlStatus};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmitStats {
    pub accepted: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackerView {
    pub phase: TrackerPhase,
    pub kb_id: String,
    pub input: String,
    pub task_id: Option<String>,
    pub created_at: Option<String>,
    pub cursor: usize,
    pub total: usize,
    pub current_url: String,
    pub rows: Vec<UrlRowView>,
    pub activity: Vec<String>,
    pub server_logs: Vec<String>,
    pub dots: u8,
    pub poll_cycles: u64,
    pub last_submit: Option<SubmitStats>,
    pub notice: Option<String>,
    pub error: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRowView {
    pub url: String,
    pub status: UrlStatus,
    pub progress: u8,
    pub message: String,
}
