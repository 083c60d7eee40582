//! Account endpoints. Login is the one anonymous call; everything else
//! takes the caller's [`RequestContext`] like the rest of the client.

use serde::Deserialize;

use crate::client::{ApiClient, ApiError, RequestContext};
use crate::types::{LoginResponse, PasswordUpdate, ProfileUpdate, UserProfile};

#[derive(Debug, Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: String,
}

impl ApiClient {
    /// Exchanges credentials for a bearer token. The server speaks the
    /// OAuth2 password flow, so the body goes out form-encoded.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let form = [("username", username), ("password", password)];
        self.post_form(&RequestContext::anonymous(), "api/auth/login", &form)
            .await
    }

    pub async fn current_user(&self, ctx: &RequestContext) -> Result<UserProfile, ApiError> {
        self.get_json(ctx, "api/auth/me").await
    }

    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, ApiError> {
        self.put_json(ctx, "api/auth/me", update).await
    }

    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        current_password: &str,
        new_password: &str,
    ) -> Result<String, ApiError> {
        let body = PasswordUpdate {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        };
        let reply: MessageBody = self.put_json(ctx, "api/auth/me/password", &body).await?;
        Ok(reply.message)
    }

    /// Server-side logout is advisory; the token simply stops being sent
    /// once the caller drops its session.
    pub async fn logout(&self, ctx: &RequestContext) -> Result<(), ApiError> {
        let _: MessageBody = self.post_json(ctx, "api/auth/logout", &()).await?;
        Ok(())
    }
}
