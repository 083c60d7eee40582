//! Chat over a knowledge base, plus saved conversation history.

use crate::client::{Ack, ApiClient, ApiError, Envelope, RequestContext};
use crate::types::{ChatHistoryEntry, ChatReply, ChatRequest, ChatResponse, SavedChatId};

impl ApiClient {
    /// Asks a question against a knowledge base. Errors from the answering
    /// pipeline come back with `status: "error"` and the explanation in the
    /// `data` field, so that is what surfaces as [`ApiError::Api`].
    pub async fn chat(
        &self,
        ctx: &RequestContext,
        request: &ChatRequest,
    ) -> Result<ChatReply, ApiError> {
        let kb_id = &request.kb_id;
        let response: ChatResponse = self
            .post_json(ctx, &format!("api/knowledge-base/{kb_id}/chat"), request)
            .await?;
        if response.status != "success" {
            let detail = response
                .data
                .or(response.detail)
                .unwrap_or_else(|| "chat request failed".to_string());
            return Err(ApiError::Api(detail));
        }
        let text = response
            .data
            .ok_or_else(|| ApiError::Decode("missing data field".to_string()))?;
        Ok(ChatReply {
            text,
            is_report: response.is_report.unwrap_or(false),
            timestamp: response.timestamp,
        })
    }

    pub async fn chat_history(
        &self,
        ctx: &RequestContext,
        kb_id: &str,
    ) -> Result<Vec<ChatHistoryEntry>, ApiError> {
        let envelope: Envelope<Vec<ChatHistoryEntry>> = self
            .get_json(ctx, &format!("api/knowledge-base/{kb_id}/chat-history"))
            .await?;
        envelope.into_data()
    }

    pub async fn get_chat(
        &self,
        ctx: &RequestContext,
        kb_id: &str,
        chat_id: &str,
    ) -> Result<ChatHistoryEntry, ApiError> {
        let envelope: Envelope<ChatHistoryEntry> = self
            .get_json(ctx, &format!("api/knowledge-base/{kb_id}/chat-history/{chat_id}"))
            .await?;
        envelope.into_data()
    }

    /// Saves (or overwrites) a conversation and returns its id.
    pub async fn save_chat(
        &self,
        ctx: &RequestContext,
        entry: &ChatHistoryEntry,
    ) -> Result<String, ApiError> {
        let kb_id = &entry.kb_id;
        let envelope: Envelope<SavedChatId> = self
            .post_json(ctx, &format!("api/knowledge-base/{kb_id}/chat-history"), entry)
            .await?;
        Ok(envelope.into_data()?.id)
    }

    pub async fn delete_chat(
        &self,
        ctx: &RequestContext,
        kb_id: &str,
        chat_id: &str,
    ) -> Result<String, ApiError> {
        let ack: Ack = self
            .delete_json(ctx, &format!("api/knowledge-base/{kb_id}/chat-history/{chat_id}"))
            .await?;
        ack.into_message()
    }
}
