#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the URL input box (debounced text).
    InputChanged(String),
    /// User asked for the current URL input to be submitted for extraction.
    ExtractClicked,
    /// Server accepted the submission and returned a task id.
    SubmitSucceeded {
        epoch: crate::JobEpoch,
        task_id: String,
        created_at: String,
    },
    /// Server handled the submission synchronously and returned no task id.
    SubmitCompletedInline {
        epoch: crate::JobEpoch,
        message: Option<String>,
    },
    /// Submission request failed (transport error or error envelope).
    SubmitFailed {
        epoch: crate::JobEpoch,
        error: String,
    },
    /// Poll timer fired; time to fetch progress and logs again.
    PollDue { epoch: crate::JobEpoch },
    /// A progress snapshot arrived for the current task.
    ProgressFetched {
        epoch: crate::JobEpoch,
        snapshot: crate::ProgressSnapshot,
    },
    /// The progress fetch failed; the loop retries with a longer delay.
    ProgressFetchFailed {
        epoch: crate::JobEpoch,
        error: String,
    },
    /// A fresh copy of the server-side task log arrived.
    LogsFetched {
        epoch: crate::JobEpoch,
        lines: Vec<String>,
    },
    /// Thinking-indicator timer fired.
    IndicatorTick { epoch: crate::JobEpoch },
    /// User dismissed the tracker or the session is being torn down.
    CancelRequested,
}
