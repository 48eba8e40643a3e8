//! Resolution of a (target, selector) pair to the single governing policy.

use alloy_primitives::{Address, FixedBytes, U256};
use tracing::debug;

use crate::limits::UsageLimit;
use crate::spec::{CallPolicy, SessionSpec, TransferPolicy};

/// The policy governing a candidate operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolicyMatch<'a> {
    Call(&'a CallPolicy),
    Transfer(&'a TransferPolicy),
}

impl<'a> PolicyMatch<'a> {
    pub fn is_call(&self) -> bool {
        matches!(self, PolicyMatch::Call(_))
    }

    pub fn max_value_per_use(&self) -> U256 {
        match self {
            PolicyMatch::Call(p) => p.max_value_per_use,
            PolicyMatch::Transfer(p) => p.max_value_per_use,
        }
    }

    pub fn value_limit(&self) -> &'a UsageLimit {
        match self {
            PolicyMatch::Call(p) => &p.value_limit,
            PolicyMatch::Transfer(p) => &p.value_limit,
        }
    }
}

/// Find the first policy governing `(target, selector)`.
///
/// Two passes in priority order. When a selector is present, call policies
/// are scanned first for an entry matching both target and selector; a call
/// with data never silently falls back onto a transfer policy unless no call
/// policy matched. The transfer pass then scans by target alone. First match
/// in list order wins in each pass.
///
/// Addresses and selectors compare as raw bytes, so the hex casing of
/// whatever textual form they were parsed from cannot affect the result.
pub fn find_matching_policy<'a>(
    spec: &'a SessionSpec,
    target: Address,
    selector: Option<FixedBytes<4>>,
) -> Option<PolicyMatch<'a>> {
    if let Some(selector) = selector
        && let Some(policy) = spec
            .call_policies
            .iter()
            .find(|p| p.target == target && p.selector == selector)
    {
        debug!(%target, %selector, "matched call policy");
        return Some(PolicyMatch::Call(policy));
    }

    let matched = spec
        .transfer_policies
        .iter()
        .find(|p| p.target == target)
        .map(PolicyMatch::Transfer);
    if matched.is_some() {
        debug!(%target, "matched transfer policy");
    }
    matched
}
