//! RPC request handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use rollcall_presence::{IssueError, IssuedToken, Presentation, VerifyOutcome};
use rollcall_types::{AttendanceStatus, EventKey, HolderKey, RejectionReason};
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::error::RpcError;
use crate::server::{stat, AppState};

// ── Issue ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRequest {
    pub holder_key: String,
    pub event_key: String,
}

pub async fn issue(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IssueRequest>,
) -> Result<Json<IssuedToken>, RpcError> {
    issue_token(state, req)
        .instrument(rollcall_utils::spans::rpc_span("/api/tokens/issue"))
        .await
}

async fn issue_token(
    state: Arc<AppState>,
    req: IssueRequest,
) -> Result<Json<IssuedToken>, RpcError> {
    let holder =
        HolderKey::parse(&req.holder_key).map_err(|e| RpcError::InvalidRequest(e.to_string()))?;
    let event =
        EventKey::parse(&req.event_key).map_err(|e| RpcError::InvalidRequest(e.to_string()))?;

    let issuer = state.issuer.clone();
    let result = tokio::task::spawn_blocking(move || issuer.issue(&holder, &event))
        .await
        .map_err(|e| RpcError::Server(e.to_string()))?;

    match result {
        Ok(token) => {
            state.stats.increment(stat::ISSUED);
            Ok(Json(token))
        }
        Err(e) => {
            if matches!(e, IssueError::StoreUnavailable(_)) {
                state.stats.increment(stat::STORE_ERRORS);
            }
            Err(e.into())
        }
    }
}

// ── Verify ───────────────────────────────────────────────────────────────

/// Verification verdict. `status` is present only when accepted, `reason`
/// only when rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub accepted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AttendanceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectionReason>,
}

impl From<VerifyOutcome> for VerifyResponse {
    fn from(outcome: VerifyOutcome) -> Self {
        Self {
            accepted: outcome.is_accepted(),
            status: outcome.is_accepted().then(|| outcome.status()),
            reason: outcome.reason(),
        }
    }
}

impl VerifyResponse {
    pub fn http_status(&self) -> StatusCode {
        match self.reason {
            None => StatusCode::OK,
            Some(reason) if reason.is_not_found() => StatusCode::NOT_FOUND,
            Some(_) => StatusCode::BAD_REQUEST,
        }
    }
}

pub async fn verify(
    State(state): State<Arc<AppState>>,
    Json(presentation): Json<Presentation>,
) -> Result<(StatusCode, Json<VerifyResponse>), RpcError> {
    verify_presentation(state, presentation)
        .instrument(rollcall_utils::spans::rpc_span("/api/tokens/verify"))
        .await
}

async fn verify_presentation(
    state: Arc<AppState>,
    presentation: Presentation,
) -> Result<(StatusCode, Json<VerifyResponse>), RpcError> {
    let verifier = state.verifier.clone();
    let result = tokio::task::spawn_blocking(move || verifier.verify(&presentation))
        .await
        .map_err(|e| RpcError::Server(e.to_string()))?;

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            state.stats.increment(stat::STORE_ERRORS);
            return Err(e.into());
        }
    };

    state.stats.increment(match outcome {
        VerifyOutcome::Accepted { status: AttendanceStatus::Late } => stat::ACCEPTED_LATE,
        VerifyOutcome::Accepted { .. } => stat::ACCEPTED_ON_TIME,
        VerifyOutcome::Rejected { .. } => stat::REJECTED,
    });

    let body = VerifyResponse::from(outcome);
    Ok((body.http_status(), Json(body)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_carries_reason_but_no_status() {
        let body = VerifyResponse::from(VerifyOutcome::Rejected {
            reason: RejectionReason::TokenAlreadyUsed,
        });
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"accepted": false, "reason": "TokenAlreadyUsed"})
        );
        assert_eq!(body.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn acceptance_carries_status_but_no_reason() {
        let body = VerifyResponse::from(VerifyOutcome::Accepted {
            status: AttendanceStatus::OnTime,
        });
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"accepted": true, "status": "on-time"})
        );
    }
}

// ── Health & telemetry ───────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TelemetryResponse {
    pub uptime_secs: u64,
    pub uptime: String,
    pub issued: u64,
    pub accepted_on_time: u64,
    pub accepted_late: u64,
    pub rejected: u64,
    pub store_errors: u64,
    pub validity_secs: u64,
    pub grace_secs: u64,
}

pub async fn telemetry(State(state): State<Arc<AppState>>) -> Json<TelemetryResponse> {
    let uptime = state.started_at.elapsed();
    let config = state.verifier.config();
    Json(TelemetryResponse {
        uptime_secs: uptime.as_secs(),
        uptime: rollcall_utils::format_duration(uptime.as_secs()),
        issued: state.stats.get(stat::ISSUED),
        accepted_on_time: state.stats.get(stat::ACCEPTED_ON_TIME),
        accepted_late: state.stats.get(stat::ACCEPTED_LATE),
        rejected: state.stats.get(stat::REJECTED),
        store_errors: state.stats.get(stat::STORE_ERRORS),
        validity_secs: config.validity_secs,
        grace_secs: config.grace_secs,
    })
}
