//! Session spec aggregate and its policy types.

use alloy_primitives::{Address, B256, FixedBytes, U256};
use serde::{Deserialize, Serialize};

use crate::encoding::{u64_dec, u256_dec};
use crate::limits::UsageLimit;

use super::SessionSpecBuilder;

/// Comparison applied to a call argument by the on-chain validator.
///
/// The client never evaluates constraints; it only carries their shape
/// through the canonical encodings. Discriminants (declaration order) are
/// part of the published binary schema.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintCondition {
    #[default]
    Unconstrained,
    Equal,
    Greater,
    Less,
    GreaterEqual,
    LessEqual,
    NotEqual,
}

impl ConstraintCondition {
    pub const fn discriminant(self) -> u8 {
        self as u8
    }
}

/// A per-parameter guard on call arguments, with its own tracked budget.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
    pub condition: ConstraintCondition,
    /// Byte offset into the call arguments (after the selector).
    #[serde(with = "u64_dec")]
    pub index: u64,
    pub ref_value: B256,
    pub limit: UsageLimit,
}

/// Governs calls with non-empty call data to `target` matching `selector`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallPolicy {
    pub target: Address,
    pub selector: FixedBytes<4>,
    #[serde(with = "u256_dec")]
    pub max_value_per_use: U256,
    pub value_limit: UsageLimit,
    pub constraints: Vec<Constraint>,
}

/// Governs plain value transfers (no call data) to `target`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferPolicy {
    pub target: Address,
    #[serde(with = "u256_dec")]
    pub max_value_per_use: U256,
    pub value_limit: UsageLimit,
}

/// The complete authorization envelope for one session key.
///
/// Immutable once constructed; built once by the account owner's tooling,
/// installed on-chain via its canonical encodings, then used read-only for
/// every validation and monitor call. Policy lists are ordered and need not
/// be deduplicated; the first structural match wins.
///
/// Identity for hashing purposes is the full structural content, `signer`
/// included (see [`crate::encoding::session_hash`]).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSpec {
    pub signer: Address,
    /// Unix seconds after which the session no longer validates.
    #[serde(with = "u64_dec")]
    pub expires_at: u64,
    /// Budget for gas fees paid by the account on behalf of the session.
    pub fee_limit: UsageLimit,
    pub call_policies: Vec<CallPolicy>,
    pub transfer_policies: Vec<TransferPolicy>,
}

impl SessionSpec {
    pub fn builder() -> SessionSpecBuilder {
        SessionSpecBuilder::new()
    }

    /// Whether `expires_at` is strictly in the past relative to `now`.
    pub fn is_expired_at(&self, now: u64) -> bool {
        now > self.expires_at
    }
}
