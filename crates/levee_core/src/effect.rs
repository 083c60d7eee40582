#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitExtraction {
        epoch: crate::JobEpoch,
        kb_id: String,
        urls: Vec<String>,
    },
    FetchProgress {
        epoch: crate::JobEpoch,
        task_id: String,
    },
    FetchLogs {
        epoch: crate::JobEpoch,
        task_id: String,
    },
    SchedulePoll {
        epoch: crate::JobEpoch,
        delay: PollDelay,
    },
    StartIndicator { epoch: crate::JobEpoch },
    CancelTimers,
    RefreshContents { kb_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDelay {
    Normal,
    Backoff,
}
