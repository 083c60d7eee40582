//! Levee core: pure extraction-tracker state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, PollDelay};
pub use msg::Msg;
pub use state::{
    ExtractionJob, JobEpoch, ProgressSnapshot, ReportedPhase, TrackerConfig, TrackerPhase,
    TrackerState, UrlStatus,
};
pub use update::update;
pub use view_model::{SubmitStats, TrackerView, UrlRowView};
