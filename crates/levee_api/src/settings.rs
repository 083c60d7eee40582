//! Per-user model endpoint settings and the system status board.

use crate::client::{Ack, ApiClient, ApiError, RequestContext};
use crate::types::{ModelSettingsResponse, SystemStatus};

impl ApiClient {
    /// Reads the caller's model API settings. Servers fall back to their
    /// built-in defaults when the user never saved custom keys.
    pub async fn model_settings(
        &self,
        ctx: &RequestContext,
    ) -> Result<ModelSettingsResponse, ApiError> {
        self.get_json(ctx, "system/model-settings").await
    }

    pub async fn update_model_settings(
        &self,
        ctx: &RequestContext,
        settings: &ModelSettingsResponse,
    ) -> Result<String, ApiError> {
        let ack: Ack = self.post_json(ctx, "system/model-settings", settings).await?;
        ack.into_message()
    }

    /// Fetches the dashboard snapshot: aggregate counts, host info and the
    /// recent server log tail.
    pub async fn system_status(&self, ctx: &RequestContext) -> Result<SystemStatus, ApiError> {
        self.get_json(ctx, "system/system-status").await
    }
}
