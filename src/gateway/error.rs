//! Error taxonomy for outbound provider calls.
//!
//! Every failure a provider can produce is normalised into [`GatewayError`]
//! before it leaves the gateway. The raw HTTP status and response body are
//! captured where available so the log line is enough to diagnose a broken
//! key or an exhausted quota without a packet capture.

use thiserror::Error;

// ---------------------------------------------------------------------------
// GatewayError
// ---------------------------------------------------------------------------

/// Errors that can occur during a chat or translation call.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport failure, timeout, or a non-auth/non-rate-limit HTTP error.
    #[error("request failed: {0}")]
    Network(String),

    /// The provider rejected the credential (HTTP 401/403).
    #[error("authentication rejected (HTTP {status}): {body}")]
    Auth { status: u16, body: String },

    /// The provider throttled the request (HTTP 429).
    #[error("rate limited (HTTP {status}): {body}")]
    RateLimited { status: u16, body: String },

    /// The response decoded, but the expected field was absent or empty.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl GatewayError {
    /// Map a non-success HTTP status (plus the raw body) to an error variant.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => GatewayError::Auth { status, body },
            429 => GatewayError::RateLimited { status, body },
            _ => GatewayError::Network(format!("HTTP {status}: {body}")),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::Network(format!("request timed out: {e}"))
        } else {
            GatewayError::Network(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
