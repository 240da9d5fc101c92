//! Error taxonomy for backend communication.

use thiserror::Error;

/// A failed exchange with the backend.
///
/// Both kinds are handled identically by the engine: logged, surfaced as an
/// event, never retried before the next scheduled poll.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level failure: unreachable host, timeout, interrupted body.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success HTTP status.
    #[error("backend returned HTTP {status}")]
    Protocol { status: u16 },

    /// The body did not match the declared schema.
    #[error("schema mismatch: {0}")]
    Schema(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_status() {
        let err = ApiError::Protocol { status: 503 };
        assert_eq!(err.to_string(), "backend returned HTTP 503");
    }

    #[test]
    fn display_transport_detail() {
        let err = ApiError::Transport("connection refused".into());
        assert!(err.to_string().contains("connection refused"));
    }
}
