//! HTTP surface for rollcall.
//!
//! Provides endpoints for:
//! - Token issuance (`POST /api/tokens/issue`)
//! - Token verification (`POST /api/tokens/verify`)
//! - Liveness (`GET /health`)
//! - Outcome counters (`GET /api/telemetry`)
//!
//! Also carries the scanner side: [`VerifyClient`] talks to a running server
//! and [`ScanSession`] applies per-session duplicate and retry policy.

pub mod client;
pub mod error;
pub mod handlers;
pub mod server;
pub mod session;

pub use client::VerifyClient;
pub use error::{ClientError, RpcError};
pub use server::{AppState, RpcServer};
pub use session::{ScanResult, ScanSession, Submit};
