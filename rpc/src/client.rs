//! HTTP client used by scanners to reach a running rollcall server.

use std::time::Duration;

use axum::http::StatusCode;
use rollcall_presence::{IssuedToken, Presentation};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ClientError, ErrorBody};
use crate::handlers::{IssueRequest, VerifyResponse};
use crate::session::Submit;

/// Default timeout for a single request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the issue and verify endpoints.
pub struct VerifyClient {
    base_url: String,
    /// Reusable connection pool.
    http_client: reqwest::Client,
}

impl VerifyClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST /api/tokens/issue`.
    pub async fn issue(
        &self,
        holder_key: &str,
        event_key: &str,
    ) -> Result<IssuedToken, ClientError> {
        let request = IssueRequest {
            holder_key: holder_key.to_string(),
            event_key: event_key.to_string(),
        };
        let response = self
            .http_client
            .post(self.url("/api/tokens/issue"))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return parse(response).await;
        }
        let body: ErrorBody = parse(response).await?;
        if status == StatusCode::SERVICE_UNAVAILABLE {
            Err(ClientError::ServiceUnavailable(body.reason))
        } else {
            Err(ClientError::RequestFailed(format!("{}: {}", body.error, body.reason)))
        }
    }

    /// `POST /api/tokens/verify`.
    ///
    /// Rejections come back as `Ok` with `accepted == false`; only a server
    /// that could not judge the attempt yields an error.
    pub async fn verify(&self, presentation: &Presentation) -> Result<VerifyResponse, ClientError> {
        let response = self
            .http_client
            .post(self.url("/api/tokens/verify"))
            .json(presentation)
            .send()
            .await?;

        let status = response.status();
        debug!(%status, "verify response");
        match status {
            StatusCode::OK | StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => {
                parse(response).await
            }
            StatusCode::SERVICE_UNAVAILABLE => {
                let body: ErrorBody = parse(response).await?;
                Err(ClientError::ServiceUnavailable(body.reason))
            }
            other => Err(ClientError::RequestFailed(format!("HTTP status {other}"))),
        }
    }
}

impl Submit for VerifyClient {
    async fn submit(&self, presentation: &Presentation) -> Result<VerifyResponse, ClientError> {
        self.verify(presentation).await
    }
}

async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    response
        .json()
        .await
        .map_err(|e| ClientError::InvalidResponse(e.to_string()))
}
