//! Expiry and budget-exhaustion monitoring.
//!
//! Strictly advisory: warnings inform the caller that a session is close to
//! expiring or to exhausting its fee budget, ahead of the hard failure the
//! on-chain validator would produce. Nothing here ever blocks an operation.

use alloy_primitives::{U256, U512};
use chrono::Utc;
use tracing::warn;

use crate::spec::{SessionSpec, SessionState};

/// When to start warning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WarnThresholds {
    /// Warn when the session expires within this many seconds.
    pub expiration_warning_threshold_secs: u64,
    /// Warn when at least this percentage of the fee budget is spent.
    pub fee_limit_warning_percent: u8,
}

impl Default for WarnThresholds {
    fn default() -> Self {
        Self {
            expiration_warning_threshold_secs: 3_600,
            fee_limit_warning_percent: 80,
        }
    }
}

/// Outcome of a monitor pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionWarning {
    pub should_warn: bool,
    /// Human-readable description of the condition(s) that fired, derived
    /// deterministically from the triggers.
    pub reason: Option<String>,
}

impl SessionWarning {
    fn none() -> Self {
        Self {
            should_warn: false,
            reason: None,
        }
    }
}

/// Evaluate both triggers against the current wall clock.
pub fn evaluate(spec: &SessionSpec, state: &SessionState, thresholds: &WarnThresholds) -> SessionWarning {
    evaluate_at(spec, state, thresholds, Utc::now().timestamp().max(0) as u64)
}

/// Evaluate both triggers at an explicit unix timestamp.
///
/// The two triggers are independent and non-exclusive:
///
/// - expiry fires when `0 <= expires_at - now <= threshold`; a session that
///   is already past `expires_at` is past the warning window, not within it;
/// - the fee trigger is skipped entirely for an `Unlimited` fee limit, and
///   otherwise fires when the exhausted percentage of the budget reaches the
///   configured threshold (a zero limit counts as fully exhausted).
pub fn evaluate_at(
    spec: &SessionSpec,
    state: &SessionState,
    thresholds: &WarnThresholds,
    now: u64,
) -> SessionWarning {
    let mut reasons: Vec<String> = Vec::new();

    if spec.expires_at >= now {
        let remaining = spec.expires_at - now;
        if remaining <= thresholds.expiration_warning_threshold_secs {
            reasons.push(format!("session expires in {remaining} seconds"));
        }
    }

    if !spec.fee_limit.is_unlimited() {
        let exhausted = exhausted_percent(state.fees_remaining, spec.fee_limit.limit);
        if exhausted >= U256::from(thresholds.fee_limit_warning_percent) {
            reasons.push(format!("Fee limit {exhausted}% exhausted"));
        }
    }

    if reasons.is_empty() {
        return SessionWarning::none();
    }

    let reason = reasons.join("; ");
    warn!(%reason, "session warning");
    SessionWarning {
        should_warn: true,
        reason: Some(reason),
    }
}

/// `100 - remaining / limit * 100`, saturating in both directions.
///
/// `remaining` above `limit` clamps to 0% exhausted; a zero limit is already
/// fully spent by definition.
fn exhausted_percent(remaining: U256, limit: U256) -> U256 {
    if limit.is_zero() {
        return U256::from(100);
    }
    let remaining = remaining.min(limit);
    // Widened so the multiply cannot overflow for limits near 2^256 - 1.
    let kept = U512::from(remaining) * U512::from(100) / U512::from(limit);
    U256::from(100) - U256::from(kept.to::<u64>())
}
