//! External dependency boundaries.
//!
//! The engine never signs, encodes call data, or touches the network itself.
//! It hands its canonical encodings to a [`SigningBackend`] and receives live
//! session state from a [`SessionStateProvider`]; both are narrow async
//! traits the surrounding application implements (FFI binding to a native
//! signer module, JSON-RPC client, or an in-process test double).

use alloy_primitives::aliases::U192;
use alloy_primitives::{Address, B256, Bytes, U256};
use async_trait::async_trait;
use secrecy::SecretString;

use crate::Result;
use crate::spec::SessionState;

/// The out-of-process signing/encoding backend.
///
/// The engine assumes nothing about the backend beyond these four
/// operations. Key material crosses the boundary as [`SecretString`] and is
/// never held by the engine itself.
#[async_trait]
pub trait SigningBackend: Send + Sync {
    /// Encode a single session-governed call into account-execute call data.
    async fn encode_session_execute_call_data(
        &self,
        target: Address,
        value: U256,
        data: Bytes,
    ) -> Result<Bytes>;

    /// Produce a cheap placeholder signature for gas estimation.
    async fn generate_session_stub_signature(
        &self,
        validator: Address,
        spec_json: &str,
        timestamp: Option<u64>,
    ) -> Result<Bytes>;

    /// Sign an operation hash with the session key, wrapped for the given
    /// validator module.
    async fn sign_session_user_operation(
        &self,
        session_key: &SecretString,
        validator: Address,
        spec_json: &str,
        operation_hash: B256,
        timestamp: Option<u64>,
    ) -> Result<Bytes>;

    /// Derive the per-signer nonce key partitioning the account's operation
    /// ordering. Must be consulted before every nonce fetch so session
    /// operations never contend with the owner's own sequence or with other
    /// sessions.
    async fn derive_keyed_nonce(&self, signer: Address) -> Result<U192>;
}

/// Read access to the on-chain session record.
///
/// Implementations report lookup failures as
/// [`SessionError::StateFetch`](crate::SessionError::StateFetch), which keeps
/// RPC trouble distinguishable from signing-backend failures at call sites.
#[async_trait]
pub trait SessionStateProvider: Send + Sync {
    /// Fetch a fresh [`SessionState`] snapshot for `(account, session_hash)`.
    async fn fetch_state(&self, account: Address, session_hash: B256) -> Result<SessionState>;
}
