//! Extraction endpoints: submit a batch of URLs, then poll progress and logs.

use async_trait::async_trait;

use crate::client::{ApiClient, ApiError, Envelope, RequestContext};
use crate::types::{ExtractRequest, SubmitResponse, TaskProgress};

/// Server's answer to a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The job was queued; progress is reported under `task_id`.
    Started {
        task_id: String,
        message: Option<String>,
    },
    /// Legacy servers extract synchronously and answer only once everything
    /// is done, without a task id to poll.
    CompletedInline { message: Option<String> },
}

/// Extraction API surface. The poll loop is driven through this trait so
/// tests can substitute a scripted double for the HTTP client.
#[async_trait]
pub trait ExtractApi: Send + Sync {
    /// Submits `urls` for extraction into the knowledge base `kb_id`.
    async fn submit(
        &self,
        ctx: &RequestContext,
        kb_id: &str,
        urls: Vec<String>,
    ) -> Result<SubmitOutcome, ApiError>;

    /// Fetches the current progress record for a running task.
    async fn progress(&self, ctx: &RequestContext, task_id: &str)
        -> Result<TaskProgress, ApiError>;

    /// Fetches the server-side log tail for a task. Each call returns the
    /// full current tail, not a delta.
    async fn logs(&self, ctx: &RequestContext, task_id: &str) -> Result<Vec<String>, ApiError>;
}

#[async_trait]
impl ExtractApi for ApiClient {
    async fn submit(
        &self,
        ctx: &RequestContext,
        kb_id: &str,
        urls: Vec<String>,
    ) -> Result<SubmitOutcome, ApiError> {
        let request = ExtractRequest {
            urls,
            db_name: kb_id.to_string(),
        };
        let response: SubmitResponse = self.post_json(ctx, "extract", &request).await?;
        if response.status != "success" {
            let detail = response
                .detail
                .or(response.message)
                .unwrap_or_else(|| response.status.clone());
            return Err(ApiError::Api(detail));
        }
        Ok(match response.task_id {
            Some(task_id) => SubmitOutcome::Started {
                task_id,
                message: response.message,
            },
            None => SubmitOutcome::CompletedInline {
                message: response.message,
            },
        })
    }

    async fn progress(
        &self,
        ctx: &RequestContext,
        task_id: &str,
    ) -> Result<TaskProgress, ApiError> {
        self.get_json(ctx, &format!("extract/progress/{task_id}"))
            .await
    }

    async fn logs(&self, ctx: &RequestContext, task_id: &str) -> Result<Vec<String>, ApiError> {
        let envelope: Envelope<Vec<String>> =
            self.get_json(ctx, &format!("extract/logs/{task_id}")).await?;
        envelope.into_data()
    }
}

impl ApiClient {
    /// Lists recently submitted extraction tasks, newest first.
    pub async fn recent_tasks(
        &self,
        ctx: &RequestContext,
        limit: usize,
    ) -> Result<Vec<TaskProgress>, ApiError> {
        let envelope: Envelope<Vec<TaskProgress>> = self
            .get_json(ctx, &format!("extract/tasks?limit={limit}"))
            .await?;
        envelope.into_data()
    }
}
