//! Binding digest of a session spec.
//!
//! The published binary schema mirrors the spec's struct shape field for
//! field: enums as uint8 discriminants in declaration order, the limit window
//! as uint48 seconds, constraint byte-offsets as uint64, and nested dynamic
//! arrays for policies and constraints. The digest is keccak256 over the ABI
//! encoding of that schema. Any field change, `signer` included, changes the
//! digest.

use alloy_primitives::aliases::U48;
use alloy_primitives::{B256, U256, keccak256};
use alloy_sol_types::{SolValue, sol};

use crate::limits::UsageLimit;
use crate::spec::{CallPolicy, Constraint, SessionSpec, TransferPolicy};

sol! {
    struct SolUsageLimit {
        uint8 limitType;
        uint256 limit;
        uint48 period;
    }

    struct SolConstraint {
        uint8 condition;
        uint64 index;
        bytes32 refValue;
        SolUsageLimit limit;
    }

    struct SolCallPolicy {
        address target;
        bytes4 selector;
        uint256 maxValuePerUse;
        SolUsageLimit valueLimit;
        SolConstraint[] constraints;
    }

    struct SolTransferPolicy {
        address target;
        uint256 maxValuePerUse;
        SolUsageLimit valueLimit;
    }

    struct SolSessionSpec {
        address signer;
        uint256 expiresAt;
        SolUsageLimit feeLimit;
        SolCallPolicy[] callPolicies;
        SolTransferPolicy[] transferPolicies;
    }
}

impl From<&UsageLimit> for SolUsageLimit {
    fn from(limit: &UsageLimit) -> Self {
        Self {
            limitType: limit.limit_type.discriminant(),
            limit: limit.limit,
            period: U48::from(limit.period),
        }
    }
}

impl From<&Constraint> for SolConstraint {
    fn from(constraint: &Constraint) -> Self {
        Self {
            condition: constraint.condition.discriminant(),
            index: constraint.index,
            refValue: constraint.ref_value,
            limit: (&constraint.limit).into(),
        }
    }
}

impl From<&CallPolicy> for SolCallPolicy {
    fn from(policy: &CallPolicy) -> Self {
        Self {
            target: policy.target,
            selector: policy.selector,
            maxValuePerUse: policy.max_value_per_use,
            valueLimit: (&policy.value_limit).into(),
            constraints: policy.constraints.iter().map(Into::into).collect(),
        }
    }
}

impl From<&TransferPolicy> for SolTransferPolicy {
    fn from(policy: &TransferPolicy) -> Self {
        Self {
            target: policy.target,
            maxValuePerUse: policy.max_value_per_use,
            valueLimit: (&policy.value_limit).into(),
        }
    }
}

impl From<&SessionSpec> for SolSessionSpec {
    fn from(spec: &SessionSpec) -> Self {
        Self {
            signer: spec.signer,
            expiresAt: U256::from(spec.expires_at),
            feeLimit: (&spec.fee_limit).into(),
            callPolicies: spec.call_policies.iter().map(Into::into).collect(),
            transferPolicies: spec.transfer_policies.iter().map(Into::into).collect(),
        }
    }
}

/// The 32-byte digest the out-of-process signer is asked to sign to bind a
/// session key to its authorization envelope.
pub fn session_hash(spec: &SessionSpec) -> B256 {
    keccak256(SolSessionSpec::from(spec).abi_encode())
}
