//! Live session state snapshot.
//!
//! Fetched from the chain by a [`crate::backend::SessionStateProvider`]
//! before each signing attempt; the core never fetches it itself and only the
//! monitor and client orchestration consume it. Counters here are the
//! authoritative remainders tracked by the on-chain validator.

use alloy_primitives::{Address, FixedBytes, U256};
use serde::{Deserialize, Serialize};

use crate::encoding::{u64_dec, u256_dec};

/// On-chain lifecycle state of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    /// The session hash is unknown to the validator contract.
    #[default]
    NotInitialized,
    Active,
    /// Revoked by the account owner.
    Closed,
}

impl SessionStatus {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::NotInitialized),
            1 => Some(Self::Active),
            2 => Some(Self::Closed),
            _ => None,
        }
    }

    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

/// Remaining budget of one tracked limit (a transfer value, call value, or
/// constrained call parameter).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitState {
    #[serde(with = "u256_dec")]
    pub remaining: U256,
    pub target: Address,
    pub selector: FixedBytes<4>,
    #[serde(with = "u64_dec")]
    pub index: u64,
}

/// Read-only snapshot of a session's on-chain counters.
///
/// Re-fetched before every signing attempt rather than cached: counters can
/// move between attempts through other operations under the same session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub status: SessionStatus,
    #[serde(with = "u256_dec")]
    pub fees_remaining: U256,
    pub transfer_value: Vec<LimitState>,
    pub call_value: Vec<LimitState>,
    pub call_params: Vec<LimitState>,
}

impl SessionState {
    /// A fresh `Active` snapshot with the given fee remainder and no tracked
    /// per-policy limits. Mostly useful in tests and examples.
    pub fn active(fees_remaining: U256) -> Self {
        Self {
            status: SessionStatus::Active,
            fees_remaining,
            transfer_value: Vec::new(),
            call_value: Vec::new(),
            call_params: Vec::new(),
        }
    }
}
