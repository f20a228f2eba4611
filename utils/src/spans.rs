//! Pre-built [`tracing::Span`] constructors for common rollcall operations.
//!
//! Using consistent span names and field sets makes it easy to filter and
//! correlate one issuance or verification across log lines.

use tracing::{info_span, Span};

/// Span covering one token issuance.
pub fn issue_span(holder: &str, event: &str) -> Span {
    info_span!("issue", holder = %holder, event = %event)
}

/// Span covering one verification attempt.
pub fn verify_span(holder: &str, event: &str, nonce: &str) -> Span {
    info_span!("verify", holder = %holder, event = %event, nonce = %nonce)
}

/// Span covering a single HTTP route handled by the RPC server.
pub fn rpc_span(route: &str) -> Span {
    info_span!("rpc", route = %route)
}
