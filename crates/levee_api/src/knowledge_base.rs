//! Knowledge-base CRUD, stored contents and index building.

use crate::client::{Ack, ApiClient, ApiError, Envelope, RequestContext};
use crate::types::{
    BuildIndexRequest, ContentItem, DeleteContentRequest, KnowledgeBase, KnowledgeBaseInput,
};

impl ApiClient {
    pub async fn list_knowledge_bases(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<KnowledgeBase>, ApiError> {
        self.get_json(ctx, "api/knowledge-base").await
    }

    pub async fn create_knowledge_base(
        &self,
        ctx: &RequestContext,
        name: &str,
        description: Option<&str>,
    ) -> Result<KnowledgeBase, ApiError> {
        let input = KnowledgeBaseInput {
            name: name.to_string(),
            description: description.map(str::to_string),
        };
        self.post_json(ctx, "api/knowledge-base", &input).await
    }

    pub async fn get_knowledge_base(
        &self,
        ctx: &RequestContext,
        kb_id: &str,
    ) -> Result<KnowledgeBase, ApiError> {
        self.get_json(ctx, &format!("api/knowledge-base/{kb_id}"))
            .await
    }

    pub async fn update_knowledge_base(
        &self,
        ctx: &RequestContext,
        kb_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<KnowledgeBase, ApiError> {
        let input = KnowledgeBaseInput {
            name: name.to_string(),
            description: description.map(str::to_string),
        };
        self.put_json(ctx, &format!("api/knowledge-base/{kb_id}"), &input)
            .await
    }

    pub async fn delete_knowledge_base(
        &self,
        ctx: &RequestContext,
        kb_id: &str,
    ) -> Result<String, ApiError> {
        let ack: Ack = self
            .delete_json(ctx, &format!("api/knowledge-base/{kb_id}"))
            .await?;
        ack.into_message()
    }

    /// Lists the extracted documents stored in a knowledge base, newest
    /// first.
    pub async fn knowledge_base_contents(
        &self,
        ctx: &RequestContext,
        kb_id: &str,
    ) -> Result<Vec<ContentItem>, ApiError> {
        let envelope: Envelope<Vec<ContentItem>> = self
            .get_json(ctx, &format!("api/knowledge-base/{kb_id}/contents"))
            .await?;
        envelope.into_data()
    }

    /// Removes one document, addressed by its source URL, from a knowledge
    /// base along with its index entries.
    pub async fn delete_content(
        &self,
        ctx: &RequestContext,
        kb_id: &str,
        url: &str,
    ) -> Result<String, ApiError> {
        let request = DeleteContentRequest {
            url: url.to_string(),
        };
        let ack: Ack = self
            .delete_json_with_body(ctx, &format!("api/knowledge-base/{kb_id}/contents"), &request)
            .await?;
        ack.into_message()
    }

    /// Builds (or, when `index_id` is given, activates) the vector index for
    /// a knowledge base. A `warning` status means the server skipped the
    /// build because no texts were loaded; the message says so.
    pub async fn build_index(
        &self,
        ctx: &RequestContext,
        request: &BuildIndexRequest,
    ) -> Result<String, ApiError> {
        let kb_id = &request.kb_id;
        let ack: Ack = self
            .post_json(ctx, &format!("api/knowledge-base/{kb_id}/build-index"), request)
            .await?;
        ack.into_message()
    }
}
