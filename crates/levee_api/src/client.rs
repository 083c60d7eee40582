use std::time::Duration;

use console_logging::{console_trace, console_warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("http status {status}: {detail}")]
    HttpStatus { status: u16, detail: String },
    #[error("server error: {0}")]
    Api(String),
    #[error("response decode failed: {0}")]
    Decode(String),
}

impl ApiError {
    /// True if retrying after a delay could help (server unreachable or
    /// answering with an error status, as opposed to rejecting the request).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::Timeout | ApiError::Transport(_) | ApiError::HttpStatus { .. }
        )
    }
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl ApiSettings {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Per-request authentication. Endpoints take the context explicitly; there
/// is no client-wide mutable token to race against.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    bearer_token: Option<String>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            bearer_token: Some(token.into()),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.settings
            .base_url
            .join(path)
            .map_err(|err| ApiError::InvalidUrl(err.to_string()))
    }

    fn apply_context(
        builder: reqwest::RequestBuilder,
        context: &RequestContext,
    ) -> reqwest::RequestBuilder {
        match context.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        context: &RequestContext,
        path: &str,
    ) -> Result<T, ApiError> {
        console_trace!("GET {}", path);
        let builder = self.client.get(self.endpoint(path)?);
        let response = Self::apply_context(builder, context)
            .send()
            .await
            .map_err(map_transport_error)?;
        decode_response(response).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        context: &RequestContext,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        console_trace!("POST {}", path);
        let builder = self.client.post(self.endpoint(path)?).json(body);
        let response = Self::apply_context(builder, context)
            .send()
            .await
            .map_err(map_transport_error)?;
        decode_response(response).await
    }

    pub(crate) async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        context: &RequestContext,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        console_trace!("PUT {}", path);
        let builder = self.client.put(self.endpoint(path)?).json(body);
        let response = Self::apply_context(builder, context)
            .send()
            .await
            .map_err(map_transport_error)?;
        decode_response(response).await
    }

    pub(crate) async fn delete_json<T: DeserializeOwned>(
        &self,
        context: &RequestContext,
        path: &str,
    ) -> Result<T, ApiError> {
        console_trace!("DELETE {}", path);
        let builder = self.client.delete(self.endpoint(path)?);
        let response = Self::apply_context(builder, context)
            .send()
            .await
            .map_err(map_transport_error)?;
        decode_response(response).await
    }

    pub(crate) async fn delete_json_with_body<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        context: &RequestContext,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        console_trace!("DELETE {}", path);
        let builder = self.client.delete(self.endpoint(path)?).json(body);
        let response = Self::apply_context(builder, context)
            .send()
            .await
            .map_err(map_transport_error)?;
        decode_response(response).await
    }

    pub(crate) async fn post_form<T: DeserializeOwned>(
        &self,
        context: &RequestContext,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        console_trace!("POST {} (form)", path);
        let builder = self.client.post(self.endpoint(path)?).form(form);
        let response = Self::apply_context(builder, context)
            .send()
            .await
            .map_err(map_transport_error)?;
        decode_response(response).await
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

async fn decode_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail)
            .unwrap_or_else(|| status.to_string());
        console_warn!("http status {} detail={}", status.as_u16(), detail);
        return Err(ApiError::HttpStatus {
            status: status.as_u16(),
            detail,
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))
}

fn map_transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        console_warn!("request timed out");
        return ApiError::Timeout;
    }
    console_warn!("transport error: {}", err);
    ApiError::Transport(err.to_string())
}

/// The `{status, data}` envelope most list endpoints use.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct Envelope<T> {
    pub status: String,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub(crate) fn into_data(self) -> Result<T, ApiError> {
        if self.status == "success" {
            self.data
                .ok_or_else(|| ApiError::Decode("missing data field".to_owned()))
        } else {
            Err(ApiError::Api(
                self.detail
                    .or(self.message)
                    .unwrap_or_else(|| "unknown server error".to_owned()),
            ))
        }
    }
}

/// The `{status, message}` acknowledgement shape. A `warning` status still
/// counts as success (the index builder uses it for empty knowledge bases).
#[derive(Debug, Deserialize)]
pub(crate) struct Ack {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl Ack {
    pub(crate) fn into_message(self) -> Result<String, ApiError> {
        if self.status == "error" {
            Err(ApiError::Api(
                self.detail
                    .or(self.message)
                    .unwrap_or_else(|| "unknown server error".to_owned()),
            ))
        } else {
            Ok(self.message.unwrap_or_default())
        }
    }
}
