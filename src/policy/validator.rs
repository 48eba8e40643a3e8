//! Pre-flight transaction validation.
//!
//! A stateless, synchronous check run before paying for signature generation
//! and network submission. It covers exactly what can be decided without
//! chain state: policy existence and the single-use value ceiling. Cumulative
//! periodic and lifetime totals live in on-chain counters and are enforced
//! there; callers who need budget accuracy pair this with a freshly fetched
//! [`crate::spec::SessionState`] (see [`crate::client`]).

use alloy_primitives::{Address, Bytes, FixedBytes, U256};
use thiserror::Error;
use tracing::debug;

use crate::spec::SessionSpec;

use super::find_matching_policy;

/// A local policy rejection, raised before any signing or submission.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("no session policy found for target {target}{}", fmt_selector(.selector))]
    NoPolicyFound {
        target: Address,
        selector: Option<FixedBytes<4>>,
    },

    #[error("value {value} exceeds the per-use maximum {max_value_per_use}")]
    ValueExceedsMaxPerUse {
        value: U256,
        max_value_per_use: U256,
    },
}

fn fmt_selector(selector: &Option<FixedBytes<4>>) -> String {
    match selector {
        Some(sel) => format!(" and selector {sel}"),
        None => String::new(),
    }
}

/// Extract the 4-byte function selector from call data, if there is one.
///
/// Call data shorter than a selector (a bare or malformed payload) yields
/// `None` and the operation is treated as selector-less.
pub fn extract_selector(call_data: &Bytes) -> Option<FixedBytes<4>> {
    (call_data.len() >= 4).then(|| FixedBytes::from_slice(&call_data[..4]))
}

/// Validate a candidate operation against the session spec.
///
/// Returns `Ok(())` iff a policy governs `(target, selector)` and `value`
/// does not exceed its per-use ceiling.
pub fn validate(
    spec: &SessionSpec,
    target: Address,
    value: U256,
    call_data: Option<&Bytes>,
) -> Result<(), PolicyViolation> {
    let selector = call_data.and_then(extract_selector);

    let Some(matched) = find_matching_policy(spec, target, selector) else {
        debug!(%target, ?selector, "rejecting: no matching policy");
        return Err(PolicyViolation::NoPolicyFound { target, selector });
    };

    let max = matched.max_value_per_use();
    if value > max {
        debug!(%target, %value, %max, "rejecting: value above per-use ceiling");
        return Err(PolicyViolation::ValueExceedsMaxPerUse {
            value,
            max_value_per_use: max,
        });
    }

    Ok(())
}
