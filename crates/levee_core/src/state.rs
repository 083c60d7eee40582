use crate::view_model::{SubmitStats, TrackerView, UrlRowView};

/// Generation counter for extraction jobs.
///
/// Every submission and every teardown bumps the epoch. Asynchronous results
/// and timer messages carry the epoch they were issued under, and `update`
/// discards anything stale.
pub type JobEpoch = u64;

/// Lifecycle of the tracker as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackerPhase {
    #[default]
    Idle,
    Submitting,
    Polling,
    Completed,
    Failed,
}

impl TrackerPhase {
    /// True while a job owns the poll and indicator timers.
    pub fn is_active(self) -> bool {
        matches!(self, TrackerPhase::Submitting | TrackerPhase::Polling)
    }
}

/// Per-URL status. Monotonic within one job: an entry never leaves a
/// terminal status except when the whole job is resubmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlStatus {
    Pending,
    Extracting,
    Completed,
    Failed,
}

impl UrlStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, UrlStatus::Completed | UrlStatus::Failed)
    }
}

/// Job phase as reported by the server, normalized from the raw status
/// strings before it reaches the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportedPhase {
    Running,
    Completed,
    Failed,
}

/// One poll cycle's worth of task progress. `current` is a 1-based cursor
/// over the submitted URLs: everything before it has been processed, the
/// entry at `current - 1` is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub current: usize,
    pub total: usize,
    pub current_url: String,
    pub phase: ReportedPhase,
    pub error: Option<String>,
}

/// An accepted extraction task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionJob {
    pub task_id: String,
    pub urls: Vec<String>,
    pub created_at: String,
}

/// Tunables for the poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Upper bound on progress fetches per job; exhausting it fails the job.
    pub max_poll_cycles: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_poll_cycles: 600,
        }
    }
}

const MSG_QUEUED: &str = "queued";
const MSG_EXTRACTING: &str = "extracting";
const MSG_DONE: &str = "extraction complete";
const MSG_FAILED: &str = "extraction failed";

#[derive(Debug, Clone, PartialEq, Eq)]
struct UrlEntry {
    url: String,
    status: UrlStatus,
    progress: u8,
    message: String,
}

impl UrlEntry {
    fn queued(url: String) -> Self {
        Self {
            url,
            status: UrlStatus::Pending,
            progress: 0,
            message: MSG_QUEUED.to_owned(),
        }
    }

    fn complete(&mut self) {
        self.status = UrlStatus::Completed;
        self.progress = 100;
        self.message = MSG_DONE.to_owned();
    }

    fn fail(&mut self) {
        self.status = UrlStatus::Failed;
        self.progress = 0;
        self.message = MSG_FAILED.to_owned();
    }
}

/// State for one extraction tracker, bound to a knowledge base at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerState {
    kb_id: String,
    config: TrackerConfig,
    phase: TrackerPhase,
    epoch: JobEpoch,
    input: String,
    job: Option<ExtractionJob>,
    entries: Vec<UrlEntry>,
    cursor: usize,
    total: usize,
    current_url: String,
    activity: Vec<String>,
    server_logs: Vec<String>,
    dots: u8,
    poll_cycles: u64,
    last_submit: Option<SubmitStats>,
    notice: Option<String>,
    error: Option<String>,
    dirty: bool,
}

impl TrackerState {
    pub fn new(kb_id: impl Into<String>) -> Self {
        Self::with_config(kb_id, TrackerConfig::default())
    }

    pub fn with_config(kb_id: impl Into<String>, config: TrackerConfig) -> Self {
        Self {
            kb_id: kb_id.into(),
            config,
            phase: TrackerPhase::Idle,
            epoch: 0,
            input: String::new(),
            job: None,
            entries: Vec::new(),
            cursor: 0,
            total: 0,
            current_url: String::new(),
            activity: Vec::new(),
            server_logs: Vec::new(),
            dots: 0,
            poll_cycles: 0,
            last_submit: None,
            notice: None,
            error: None,
            dirty: false,
        }
    }

    pub fn view(&self) -> TrackerView {
        TrackerView {
            phase: self.phase,
            kb_id: self.kb_id.clone(),
            input: self.input.clone(),
            task_id: self.job.as_ref().map(|job| job.task_id.clone()),
            created_at: self.job.as_ref().map(|job| job.created_at.clone()),
            cursor: self.cursor,
            total: self.total,
            current_url: self.current_url.clone(),
            rows: self
                .entries
                .iter()
                .map(|entry| UrlRowView {
                    url: entry.url.clone(),
                    status: entry.status,
                    progress: entry.progress,
                    message: entry.message.clone(),
                })
                .collect(),
            activity: self.activity.clone(),
            server_logs: self.server_logs.clone(),
            dots: self.dots,
            poll_cycles: self.poll_cycles,
            last_submit: self.last_submit.clone(),
            notice: self.notice.clone(),
            error: self.error.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns the dirty flag and clears it. The renderer calls this once
    /// per frame to decide whether anything needs redrawing.
    pub fn consume_dirty(&mut self) -> bool {
        let was_dirty = self.dirty;
        self.dirty = false;
        was_dirty
    }

    pub fn phase(&self) -> TrackerPhase {
        self.phase
    }

    pub fn epoch(&self) -> JobEpoch {
        self.epoch
    }

    pub fn kb_id(&self) -> &str {
        &self.kb_id
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn job(&self) -> Option<&ExtractionJob> {
        self.job.as_ref()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn poll_cycles(&self) -> u64 {
        self.poll_cycles
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_input(&mut self, text: String) {
        self.input = text;
        self.mark_dirty();
    }

    pub(crate) fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.mark_dirty();
    }

    /// Resets all per-job state and registers a fresh submission under a new
    /// epoch. Returns the new epoch for tagging the outgoing effects.
    pub(crate) fn begin_submission(&mut self, urls: Vec<String>, rejected: usize) -> JobEpoch {
        self.epoch += 1;
        self.phase = TrackerPhase::Submitting;
        self.job = None;
        self.total = urls.len();
        self.cursor = 0;
        self.current_url.clear();
        self.entries = urls.into_iter().map(UrlEntry::queued).collect();
        self.activity.clear();
        self.server_logs.clear();
        self.dots = 0;
        self.poll_cycles = 0;
        self.last_submit = Some(SubmitStats {
            accepted: self.entries.len(),
            rejected,
        });
        self.notice = None;
        self.error = None;
        self.activity
            .push(format!("Submitting {} links for extraction", self.entries.len()));
        self.mark_dirty();
        self.epoch
    }

    pub(crate) fn start_polling(&mut self, task_id: String, created_at: String) {
        self.activity.push(format!("Task started (id: {task_id})"));
        self.notice = Some("Extraction task started".to_owned());
        let urls = self.entries.iter().map(|entry| entry.url.clone()).collect();
        self.job = Some(ExtractionJob {
            task_id,
            urls,
            created_at,
        });
        self.phase = TrackerPhase::Polling;
        // The immediate first fetch counts against the poll budget.
        self.poll_cycles = 1;
        self.mark_dirty();
    }

    /// Counts one poll cycle against the budget. Returns false once the
    /// budget is exhausted; the caller then fails the job instead of polling.
    pub(crate) fn begin_poll_cycle(&mut self) -> bool {
        if self.poll_cycles >= self.config.max_poll_cycles {
            return false;
        }
        self.poll_cycles += 1;
        true
    }

    /// Reconciles a non-terminal snapshot against the URL entries.
    ///
    /// Entries before the cursor become Completed, the entry at the cursor
    /// moves Pending -> Extracting. Terminal entries are never touched, so
    /// re-applying the same snapshot changes nothing and emits no lines.
    pub(crate) fn apply_running(&mut self, snapshot: &ProgressSnapshot) {
        self.cursor = snapshot.current.min(self.entries.len());
        self.total = snapshot.total;
        self.current_url = snapshot.current_url.clone();
        if snapshot.current >= 1 && snapshot.current <= self.entries.len() {
            self.complete_prefix(snapshot.current - 1);
            self.promote_current(snapshot.current - 1);
        }
        self.mark_dirty();
    }

    /// Terminal success: every entry ends Completed regardless of how far the
    /// cursor got.
    pub(crate) fn apply_terminal_success(&mut self) {
        self.force_complete_entries();
        self.phase = TrackerPhase::Completed;
        self.dots = 0;
        self.input.clear();
        self.activity.push("All links extracted".to_owned());
        self.activity
            .push("Build the index manually to enable vector search".to_owned());
        self.notice = Some("Extraction completed".to_owned());
        self.mark_dirty();
    }

    /// Terminal failure: completed work before the cursor is kept, everything
    /// unfinished (the in-flight entry included) is marked Failed.
    pub(crate) fn apply_terminal_failure(&mut self, current: usize, error: Option<&str>) {
        if current >= 1 && current <= self.entries.len() {
            self.complete_prefix(current - 1);
        }
        for idx in 0..self.entries.len() {
            if self.entries[idx].status != UrlStatus::Completed {
                self.entries[idx].fail();
                let line = format!("Extraction failed for {}", self.entries[idx].url);
                self.activity.push(line);
            }
        }
        let reason = error.unwrap_or("unknown error").to_owned();
        self.activity.push(format!("Task failed: {reason}"));
        self.error = Some(format!("Extraction failed: {reason}"));
        self.cursor = current.min(self.entries.len());
        self.current_url.clear();
        self.phase = TrackerPhase::Failed;
        self.dots = 0;
        self.mark_dirty();
    }

    /// Poll budget ran out before the server reported a terminal state.
    pub(crate) fn exhaust_poll_budget(&mut self) {
        let limit = self.config.max_poll_cycles;
        for entry in &mut self.entries {
            if entry.status != UrlStatus::Completed {
                entry.fail();
            }
        }
        self.activity
            .push(format!("Task timed out after {limit} poll cycles"));
        self.error = Some(format!("Extraction timed out after {limit} poll cycles"));
        self.current_url.clear();
        self.phase = TrackerPhase::Failed;
        self.dots = 0;
        self.mark_dirty();
    }

    /// Legacy servers finish the extraction inside the submit request and
    /// return no task id; there is nothing to poll.
    pub(crate) fn finish_inline(&mut self, message: Option<String>) {
        self.force_complete_entries();
        self.phase = TrackerPhase::Completed;
        self.dots = 0;
        self.input.clear();
        self.activity
            .push("Extraction completed without a task id".to_owned());
        self.activity
            .push("Build the index manually to enable vector search".to_owned());
        self.notice = Some(message.unwrap_or_else(|| "Extraction completed".to_owned()));
        self.mark_dirty();
    }

    /// The submit request itself failed; no job exists, so per-job state is
    /// dropped and only the error survives.
    pub(crate) fn fail_submission(&mut self, error: &str) {
        self.entries.clear();
        self.job = None;
        self.cursor = 0;
        self.total = 0;
        self.current_url.clear();
        self.phase = TrackerPhase::Idle;
        self.dots = 0;
        self.activity.push(format!("Submission failed: {error}"));
        self.error = Some(format!("Extraction request failed: {error}"));
        self.mark_dirty();
    }

    pub(crate) fn replace_server_logs(&mut self, lines: Vec<String>) {
        self.server_logs = lines;
        self.mark_dirty();
    }

    pub(crate) fn tick_indicator(&mut self) {
        self.dots = (self.dots + 1) % 4;
        self.mark_dirty();
    }

    /// Tears the current job down. The epoch bump makes every in-flight
    /// message for the old job stale.
    pub(crate) fn reset_job(&mut self) {
        self.epoch += 1;
        self.phase = TrackerPhase::Idle;
        self.job = None;
        self.entries.clear();
        self.cursor = 0;
        self.total = 0;
        self.current_url.clear();
        self.activity.clear();
        self.server_logs.clear();
        self.dots = 0;
        self.poll_cycles = 0;
        self.last_submit = None;
        self.notice = None;
        self.error = None;
        self.mark_dirty();
    }

    fn force_complete_entries(&mut self) {
        for entry in &mut self.entries {
            entry.complete();
        }
        self.cursor = self.entries.len();
        self.total = self.entries.len();
        self.current_url.clear();
    }

    fn complete_prefix(&mut self, end: usize) {
        for idx in 0..end.min(self.entries.len()) {
            if !self.entries[idx].status.is_terminal() {
                self.entries[idx].complete();
                let line = format!("Extraction complete for {}", self.entries[idx].url);
                self.activity.push(line);
            }
        }
    }

    fn promote_current(&mut self, idx: usize) {
        if idx >= self.entries.len() {
            return;
        }
        if self.entries[idx].status == UrlStatus::Pending {
            self.entries[idx].status = UrlStatus::Extracting;
            self.entries[idx].message = MSG_EXTRACTING.to_owned();
            let line = format!("Extracting {}", self.entries[idx].url);
            self.activity.push(line);
        }
        // No finer progress signal exists for the in-flight URL; hold it at
        // the halfway mark until the cursor moves past it.
        if self.entries[idx].status == UrlStatus::Extracting {
            self.entries[idx].progress = 50;
        }
    }
}

impl Default for TrackerState {
    fn default() -> Self {
        Self::new("")
    }
}
