use serde::{Deserialize, Serialize};

/// Progress record the server keeps per extraction task. `current` is a
/// 1-based cursor over the submitted URLs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskProgress {
    pub task_id: String,
    pub db_name: String,
    pub total: usize,
    pub current: usize,
    #[serde(default)]
    pub current_url: String,
    pub status: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ExtractRequest {
    pub urls: Vec<String>,
    pub db_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SubmitResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

/// Knowledge base record. The server serializes timestamps in camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KnowledgeBase {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct KnowledgeBaseInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One extracted document in a knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContentItem {
    pub url: String,
    pub title: String,
    pub content: String,
    pub extracted_time: String,
    #[serde(default)]
    pub structured_data: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct DeleteContentRequest {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildIndexRequest {
    pub kb_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuing_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedReport {
    pub report: String,
    pub id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ReportResponse {
    pub status: String,
    #[serde(default)]
    pub report: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

/// A saved report history entry. Older servers stored the body under
/// `report`, newer ones under `content`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportSummary {
    pub id: String,
    pub query: String,
    #[serde(default)]
    pub issuing_unit: Option<String>,
    #[serde(default)]
    pub report_date: Option<String>,
    pub created_at: String,
    #[serde(default, alias = "report")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub query: String,
    pub kb_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k: Option<u32>,
    pub chat_history: Vec<ChatMessage>,
}

/// Answer to a chat query. `is_report` flags answers that are full generated
/// reports rather than conversational replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub text: String,
    pub is_report: bool,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatResponse {
    pub status: String,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub is_report: Option<bool>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistoryEntry {
    pub id: String,
    pub title: String,
    pub messages: Vec<ChatMessage>,
    pub created_at: String,
    pub updated_at: String,
    pub kb_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SavedChatId {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PasswordUpdate {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEndpointSettings {
    pub provider: String,
    pub api_key: String,
    pub model_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSettings {
    pub understanding: ModelEndpointSettings,
    pub embedding: ModelEndpointSettings,
    pub generation: ModelEndpointSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSettingsResponse {
    pub settings: ModelSettings,
    pub use_custom_keys: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub version: String,
    pub architecture: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SystemStats {
    #[serde(rename = "knowledgeBaseCount")]
    pub knowledge_base_count: u64,
    #[serde(rename = "textCount")]
    pub text_count: u64,
    #[serde(rename = "systemInfo")]
    pub system_info: SystemInfo,
    #[serde(rename = "lastUpdate")]
    pub last_update: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SystemStatus {
    pub stats: SystemStats,
    pub logs: Vec<String>,
}
