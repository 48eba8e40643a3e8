//! # session-kit
//!
//! Client-side session key policy engine for smart-contract accounts.
//!
//! A session key is a secondary credential the account owner delegates
//! limited signing authority to: time-boxed, restricted to pre-authorized
//! contract calls and value transfers, and budgeted over configurable
//! windows. The authoritative enforcement point is the on-chain validator
//! contract; this crate is the advisory client-side copy that rejects
//! obviously invalid operations before paying for signature generation and
//! submission, and warns when a session is close to expiring or exhausting
//! its fee budget.
//!
//! ## Quick start
//!
//! ```rust
//! use alloy_primitives::{U256, address, fixed_bytes};
//! use session_kit::{LimitType, SessionSpec, UsageLimit, policy};
//!
//! let spec = SessionSpec::builder()
//!     .signer(address!("0x9bbc92a33f193174bf6cc09c4b4055500d972479"))
//!     .expires_at(1_780_000_000)
//!     .fee_limit(UsageLimit::lifetime(U256::from(100_000_000_000_000_000u64)))
//!     .allow_call(
//!         address!("0x5fc8d32690cc91d4c39d9d3abcbd16989f875707"),
//!         fixed_bytes!("0xa9059cbb"),
//!         U256::ZERO,
//!         UsageLimit::allowance(LimitType::Daily, U256::from(1_000)),
//!     )
//!     .build();
//!
//! // Pre-flight a candidate operation before signing.
//! let target = address!("0x5fc8d32690cc91d4c39d9d3abcbd16989f875707");
//! let call_data = alloy_primitives::Bytes::from(vec![0xa9, 0x05, 0x9c, 0xbb, 0x00]);
//! assert!(policy::validate(&spec, target, U256::ZERO, Some(&call_data)).is_ok());
//!
//! // The digest a session key signs over to bind itself to this spec.
//! let digest = session_kit::encoding::session_hash(&spec);
//! assert_ne!(digest, alloy_primitives::B256::ZERO);
//! ```
//!
//! The engine itself is synchronous, pure and stateless aside from the
//! immutable [`SessionSpec`] and a caller-supplied [`SessionState`] snapshot.
//! The async surface ([`SessionClient`], the [`backend`] traits, the
//! [`auth::TokenCache`]) is the protocol around it.

#![deny(rustdoc::broken_intra_doc_links)]

pub mod auth;
pub mod backend;
pub mod client;
pub mod encoding;
pub mod error;
pub mod limits;
pub mod monitor;
pub mod policy;
pub mod spec;

// Re-exports for convenience
pub use auth::{AuthToken, TokenCache, TokenProvider};
pub use backend::{SessionStateProvider, SigningBackend};
pub use client::{PreparedCall, SessionClient};
pub use encoding::{from_canonical_json, session_hash, to_canonical_json};
pub use error::{Result, SessionError};
pub use limits::{LimitType, UsageLimit};
pub use monitor::{SessionWarning, WarnThresholds};
pub use policy::{PolicyMatch, PolicyViolation, find_matching_policy, validate};
pub use spec::{
    CallPolicy, Constraint, ConstraintCondition, LimitState, SessionSpec, SessionSpecBuilder,
    SessionState, SessionStatus, TransferPolicy,
};
