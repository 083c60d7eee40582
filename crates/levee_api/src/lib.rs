//! Levee API: typed HTTP client for the knowledge-base console service.
mod auth;
mod chat;
mod client;
mod extract;
mod knowledge_base;
mod logline;
mod reports;
mod settings;
mod status;
mod types;

pub use client::{ApiClient, ApiError, ApiSettings, RequestContext};
pub use extract::{ExtractApi, SubmitOutcome};
pub use logline::{format_log_line, parse_log_line, LogLine};
pub use status::JobPhase;
pub use types::{
    BuildIndexRequest, ChatHistoryEntry, ChatMessage, ChatReply, ChatRequest, ContentItem,
    GeneratedReport, KnowledgeBase, LoginResponse, ModelEndpointSettings, ModelSettings,
    ModelSettingsResponse, ProfileUpdate, ReportRequest, ReportSummary, SystemInfo, SystemStats,
    SystemStatus, TaskProgress, UserProfile,
};
