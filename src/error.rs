//! Crate-wide error types.

use thiserror::Error;

use crate::policy::PolicyViolation;
use crate::spec::SessionStatus;

/// Errors raised by the session policy engine and its trait boundaries.
///
/// All of these are discovered locally and synchronously, before anything is
/// signed or submitted; none are retried automatically.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Pre-flight validation rejected the candidate operation.
    #[error(transparent)]
    Policy(#[from] PolicyViolation),

    /// The session's expiry timestamp is in the past.
    #[error("session expired at {expires_at} (now {now})")]
    SessionExpired { expires_at: u64, now: u64 },

    /// The on-chain session record is not in the `Active` state.
    #[error("session is not active (status: {0:?})")]
    SessionNotActive(SessionStatus),

    /// Batched calls, raw message signing and typed-data signing are not
    /// available under session-governed signing.
    #[error("unsupported operation for session signing: {0}")]
    UnsupportedOperation(&'static str),

    /// Canonical JSON encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The out-of-process signing backend reported a failure.
    #[error("signing backend error: {0}")]
    Backend(String),

    /// Fetching the live session state snapshot failed.
    #[error("session state fetch failed: {0}")]
    StateFetch(String),

    /// Token acquisition in the surrounding auth flow failed.
    #[error("auth error: {0}")]
    Auth(String),
}

impl SessionError {
    /// Check whether this error is a policy rejection (as opposed to a
    /// transport or backend failure).
    pub fn is_policy_rejection(&self) -> bool {
        matches!(
            self,
            SessionError::Policy(_)
                | SessionError::SessionExpired { .. }
                | SessionError::SessionNotActive(_)
                | SessionError::UnsupportedOperation(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
