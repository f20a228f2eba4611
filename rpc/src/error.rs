//! RPC error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rollcall_presence::{IssueError, PresenceError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A request the server could not complete.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Issue(#[from] IssueError),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("server error: {0}")]
    Server(String),
}

impl From<PresenceError> for RpcError {
    fn from(e: PresenceError) -> Self {
        match e {
            PresenceError::StoreUnavailable(msg) => RpcError::StoreUnavailable(msg),
        }
    }
}

/// JSON body sent with every non-2xx response from the issue endpoint and
/// with fatal verify failures.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub reason: String,
}

impl RpcError {
    pub fn status(&self) -> StatusCode {
        match self {
            RpcError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RpcError::Issue(e) => match e {
                IssueError::HolderNotFound(_) | IssueError::EventNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                IssueError::OutsideEventWindow(_) => StatusCode::CONFLICT,
                IssueError::Random(_) | IssueError::StoreUnavailable(_) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
            },
            RpcError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            RpcError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            RpcError::InvalidRequest(_) => "InvalidRequest",
            RpcError::Issue(IssueError::HolderNotFound(_)) => "HolderNotFound",
            RpcError::Issue(IssueError::EventNotFound(_)) => "EventNotFound",
            RpcError::Issue(IssueError::OutsideEventWindow(_)) => "OutsideEventWindow",
            RpcError::Issue(IssueError::Random(_)) => "RandomUnavailable",
            RpcError::Issue(IssueError::StoreUnavailable(_)) | RpcError::StoreUnavailable(_) => {
                "StoreUnavailable"
            }
            RpcError::Server(_) => "ServerError",
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.code().to_string(),
            reason: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Failures seen by the scanner-side HTTP client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("server unreachable: {0}")]
    Unreachable(String),

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("server could not judge the attempt: {0}")]
    ServiceUnavailable(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Unreachable(format!("request timed out: {e}"))
        } else if e.is_connect() {
            ClientError::Unreachable(format!("connection failed: {e}"))
        } else if e.is_decode() {
            ClientError::InvalidResponse(e.to_string())
        } else {
            ClientError::RequestFailed(e.to_string())
        }
    }
}
