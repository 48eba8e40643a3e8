//! Usage limit model: unlimited, lifetime, and periodic allowances.
//!
//! A [`UsageLimit`] is a budget with a kind and, for periodic kinds, a fixed
//! window length in seconds. Periods are never set independently of the kind;
//! the period table here is the single source of truth.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::encoding::{u64_dec, u256_dec};

pub const PERIOD_HOURLY: u64 = 3_600;
pub const PERIOD_DAILY: u64 = 86_400;
pub const PERIOD_WEEKLY: u64 = 604_800;
pub const PERIOD_MONTHLY: u64 = 2_592_000;
pub const PERIOD_YEARLY: u64 = 31_536_000;

/// Kind of a usage limit.
///
/// Closed sum type so the matcher, serializer and monitor can be checked
/// exhaustively. Discriminants (declaration order, 0-based) are part of the
/// published binary schema in [`crate::encoding`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LimitType {
    Unlimited,
    Lifetime,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl LimitType {
    /// Window length in seconds; zero for non-periodic kinds.
    pub const fn period(self) -> u64 {
        match self {
            LimitType::Unlimited | LimitType::Lifetime => 0,
            LimitType::Hourly => PERIOD_HOURLY,
            LimitType::Daily => PERIOD_DAILY,
            LimitType::Weekly => PERIOD_WEEKLY,
            LimitType::Monthly => PERIOD_MONTHLY,
            LimitType::Yearly => PERIOD_YEARLY,
        }
    }

    pub const fn is_periodic(self) -> bool {
        !matches!(self, LimitType::Unlimited | LimitType::Lifetime)
    }

    /// Stable wire discriminant used by the binary encoding.
    pub const fn discriminant(self) -> u8 {
        self as u8
    }
}

/// A spending/usage budget attached to a policy or to the session fee.
///
/// Invariant: `period == 0` iff the kind is `Unlimited` or `Lifetime`; for
/// periodic kinds the period comes from [`LimitType::period`]. Construct via
/// the associated functions to keep that invariant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageLimit {
    pub limit_type: LimitType,
    #[serde(with = "u256_dec")]
    pub limit: U256,
    #[serde(with = "u64_dec")]
    pub period: u64,
}

impl UsageLimit {
    /// No limit at all: the governed value is unrestricted.
    pub const fn unlimited() -> Self {
        Self {
            limit_type: LimitType::Unlimited,
            limit: U256::ZERO,
            period: 0,
        }
    }

    /// A lifetime limit of zero, fully disabling the governed policy.
    pub const fn zero() -> Self {
        Self {
            limit_type: LimitType::Lifetime,
            limit: U256::ZERO,
            period: 0,
        }
    }

    /// A total budget over the whole life of the session.
    pub const fn lifetime(limit: U256) -> Self {
        Self {
            limit_type: LimitType::Lifetime,
            limit,
            period: 0,
        }
    }

    /// A budget renewed every fixed window.
    ///
    /// # Panics
    ///
    /// Panics if `kind` is not periodic. Passing `Unlimited` or `Lifetime`
    /// here is a programming error, not a runtime condition.
    pub fn allowance(kind: LimitType, limit: U256) -> Self {
        assert!(
            kind.is_periodic(),
            "UsageLimit::allowance requires a periodic kind, got {kind:?}"
        );
        Self {
            limit_type: kind,
            limit,
            period: kind.period(),
        }
    }

    pub fn is_unlimited(&self) -> bool {
        self.limit_type == LimitType::Unlimited
    }

    /// Whether this is the disabled (`Lifetime`, limit 0) limit.
    pub fn is_zero(&self) -> bool {
        self.limit_type == LimitType::Lifetime && self.limit.is_zero()
    }
}

impl Default for UsageLimit {
    fn default() -> Self {
        Self::zero()
    }
}
