//! Fluent construction of session specs.

use alloy_primitives::{Address, FixedBytes, U256};

use crate::limits::UsageLimit;

use super::{CallPolicy, Constraint, SessionSpec, TransferPolicy};

/// Builder for [`SessionSpec`].
///
/// Construction never fails; an empty builder yields a spec that authorizes
/// nothing (no policies, zero fee limit, already-expired).
#[derive(Clone, Debug, Default)]
pub struct SessionSpecBuilder {
    signer: Address,
    expires_at: u64,
    fee_limit: UsageLimit,
    call_policies: Vec<CallPolicy>,
    transfer_policies: Vec<TransferPolicy>,
}

impl SessionSpecBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signer(mut self, signer: Address) -> Self {
        self.signer = signer;
        self
    }

    pub fn expires_at(mut self, expires_at: u64) -> Self {
        self.expires_at = expires_at;
        self
    }

    pub fn fee_limit(mut self, fee_limit: UsageLimit) -> Self {
        self.fee_limit = fee_limit;
        self
    }

    pub fn call_policy(mut self, policy: CallPolicy) -> Self {
        self.call_policies.push(policy);
        self
    }

    /// Shorthand for a constraint-free call policy.
    pub fn allow_call(
        mut self,
        target: Address,
        selector: FixedBytes<4>,
        max_value_per_use: U256,
        value_limit: UsageLimit,
    ) -> Self {
        self.call_policies.push(CallPolicy {
            target,
            selector,
            max_value_per_use,
            value_limit,
            constraints: Vec::new(),
        });
        self
    }

    pub fn transfer_policy(mut self, policy: TransferPolicy) -> Self {
        self.transfer_policies.push(policy);
        self
    }

    /// Shorthand for a transfer policy.
    pub fn allow_transfer(
        mut self,
        target: Address,
        max_value_per_use: U256,
        value_limit: UsageLimit,
    ) -> Self {
        self.transfer_policies.push(TransferPolicy {
            target,
            max_value_per_use,
            value_limit,
        });
        self
    }

    /// Attach a constraint to the most recently added call policy.
    ///
    /// # Panics
    ///
    /// Panics if no call policy has been added yet; attaching a constraint
    /// without a policy is a programming error.
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.call_policies
            .last_mut()
            .expect("constraint() requires a preceding call_policy()")
            .constraints
            .push(constraint);
        self
    }

    pub fn build(self) -> SessionSpec {
        SessionSpec {
            signer: self.signer,
            expires_at: self.expires_at,
            fee_limit: self.fee_limit,
            call_policies: self.call_policies,
            transfer_policies: self.transfer_policies,
        }
    }
}
