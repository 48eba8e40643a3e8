//! Per-attempt signing orchestration.
//!
//! [`SessionClient`] composes the policy engine with the two external
//! boundaries and enforces the per-attempt ordering: fetch a fresh state
//! snapshot, run the monitor (advisory), check expiry and status, run the
//! validator, and only then involve the signing backend. Nothing is cached
//! between attempts; on-chain counters can move under other operations of
//! the same session, and final enforcement is on-chain regardless of what
//! the client approved.

use alloy_primitives::aliases::U192;
use alloy_primitives::{Address, B256, Bytes, U256};
use chrono::Utc;
use secrecy::SecretString;
use tracing::debug;

use crate::backend::{SessionStateProvider, SigningBackend};
use crate::encoding::{session_hash, to_canonical_json};
use crate::monitor::{self, WarnThresholds};
use crate::spec::{SessionSpec, SessionState};
use crate::{Result, SessionError, policy};

/// Everything needed to build and estimate a session-governed operation.
#[derive(Clone, Debug)]
pub struct PreparedCall {
    /// Account-execute call data wrapping the target call.
    pub call_data: Bytes,
    /// Per-signer nonce key; use it for the nonce fetch of this operation.
    pub nonce_key: U192,
    /// Placeholder signature for gas estimation.
    pub stub_signature: Bytes,
    /// Monitor output, if a warning fired. Advisory only.
    pub warning: Option<String>,
    /// The snapshot this attempt was checked against.
    pub state: SessionState,
}

/// Client-side gate in front of the signing backend for one session.
pub struct SessionClient<B, S> {
    spec: SessionSpec,
    spec_json: String,
    hash: B256,
    session_key: SecretString,
    account: Address,
    validator: Address,
    backend: B,
    state_provider: S,
    thresholds: WarnThresholds,
}

impl<B: SigningBackend, S: SessionStateProvider> SessionClient<B, S> {
    /// Build a client for an installed session.
    ///
    /// The canonical JSON and binding hash are computed once here; the spec
    /// is immutable for the life of the session.
    pub fn new(
        spec: SessionSpec,
        session_key: SecretString,
        account: Address,
        validator: Address,
        backend: B,
        state_provider: S,
    ) -> Result<Self> {
        let spec_json = to_canonical_json(&spec)?;
        let hash = session_hash(&spec);
        Ok(Self {
            spec,
            spec_json,
            hash,
            session_key,
            account,
            validator,
            backend,
            state_provider,
            thresholds: WarnThresholds::default(),
        })
    }

    pub fn with_thresholds(mut self, thresholds: WarnThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn spec(&self) -> &SessionSpec {
        &self.spec
    }

    /// The digest binding the session key to its spec.
    pub fn session_hash(&self) -> B256 {
        self.hash
    }

    /// Canonical JSON form of the spec, as handed to the backend.
    pub fn spec_json(&self) -> &str {
        &self.spec_json
    }

    /// Run the full pre-flight sequence for one candidate call and, if it
    /// passes, ask the backend for call data, nonce key and stub signature.
    pub async fn prepare_call(
        &self,
        target: Address,
        value: U256,
        call_data: Option<Bytes>,
    ) -> Result<PreparedCall> {
        let state = self
            .state_provider
            .fetch_state(self.account, self.hash)
            .await?;

        let warning = monitor::evaluate(&self.spec, &state, &self.thresholds);

        self.check_expiry()?;
        if !state.status.is_active() {
            return Err(SessionError::SessionNotActive(state.status));
        }
        policy::validate(&self.spec, target, value, call_data.as_ref())?;

        debug!(%target, %value, "pre-flight passed, encoding operation");

        let call_data = self
            .backend
            .encode_session_execute_call_data(target, value, call_data.unwrap_or_default())
            .await?;
        let nonce_key = self.backend.derive_keyed_nonce(self.spec.signer).await?;
        let stub_signature = self
            .backend
            .generate_session_stub_signature(self.validator, &self.spec_json, None)
            .await?;

        Ok(PreparedCall {
            call_data,
            nonce_key,
            stub_signature,
            warning: warning.reason,
            state,
        })
    }

    /// Sign a prepared operation's hash with the session key.
    pub async fn sign_user_operation(&self, operation_hash: B256) -> Result<Bytes> {
        self.check_expiry()?;
        self.backend
            .sign_session_user_operation(
                &self.session_key,
                self.validator,
                &self.spec_json,
                operation_hash,
                None,
            )
            .await
    }

    /// Batched multi-call execution is not available under session signing.
    pub fn prepare_batch(&self, _calls: &[(Address, U256, Bytes)]) -> Result<PreparedCall> {
        Err(SessionError::UnsupportedOperation(
            "batched multi-call execution",
        ))
    }

    /// Raw message signing is not available under session signing.
    pub fn sign_message(&self, _message: &[u8]) -> Result<Bytes> {
        Err(SessionError::UnsupportedOperation("raw message signing"))
    }

    /// Typed-data signing is not available under session signing.
    pub fn sign_typed_data(&self, _payload: &serde_json::Value) -> Result<Bytes> {
        Err(SessionError::UnsupportedOperation("typed-data signing"))
    }

    fn check_expiry(&self) -> Result<()> {
        let now = Utc::now().timestamp().max(0) as u64;
        if self.spec.is_expired_at(now) {
            return Err(SessionError::SessionExpired {
                expires_at: self.spec.expires_at,
                now,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::limits::UsageLimit;
    use crate::spec::SessionStatus;

    struct StubBackend;

    #[async_trait]
    impl SigningBackend for StubBackend {
        async fn encode_session_execute_call_data(
            &self,
            _target: Address,
            _value: U256,
            _data: Bytes,
        ) -> Result<Bytes> {
            Ok(Bytes::from_static(&[0xca, 0x11]))
        }

        async fn generate_session_stub_signature(
            &self,
            _validator: Address,
            _spec_json: &str,
            _timestamp: Option<u64>,
        ) -> Result<Bytes> {
            Ok(Bytes::from_static(&[0x57]))
        }

        async fn sign_session_user_operation(
            &self,
            _session_key: &SecretString,
            _validator: Address,
            _spec_json: &str,
            _operation_hash: B256,
            _timestamp: Option<u64>,
        ) -> Result<Bytes> {
            Ok(Bytes::from_static(&[0x51, 0x67]))
        }

        async fn derive_keyed_nonce(&self, _signer: Address) -> Result<U192> {
            Ok(U192::from(7))
        }
    }

    struct FixedStateProvider {
        state: SessionState,
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl SessionStateProvider for FixedStateProvider {
        async fn fetch_state(&self, _account: Address, _session_hash: B256) -> Result<SessionState> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.state.clone())
        }
    }

    fn far_future() -> u64 {
        (Utc::now().timestamp() as u64) + 86_400
    }

    fn client_with_state(state: SessionState) -> SessionClient<StubBackend, FixedStateProvider> {
        let spec = SessionSpec::builder()
            .signer(Address::with_last_byte(0x11))
            .expires_at(far_future())
            .fee_limit(UsageLimit::unlimited())
            .allow_transfer(
                Address::with_last_byte(0xbb),
                U256::from(100),
                UsageLimit::unlimited(),
            )
            .build();
        SessionClient::new(
            spec,
            SecretString::from("0xdeadbeef"),
            Address::with_last_byte(0x01),
            Address::with_last_byte(0x02),
            StubBackend,
            FixedStateProvider {
                state,
                fetches: AtomicUsize::new(0),
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_prepare_call_happy_path() {
        let client = client_with_state(SessionState::active(U256::from(1_000)));
        let prepared = client
            .prepare_call(Address::with_last_byte(0xbb), U256::from(50), None)
            .await
            .unwrap();
        assert_eq!(prepared.nonce_key, U192::from(7));
        assert_eq!(prepared.call_data, Bytes::from_static(&[0xca, 0x11]));
        assert!(prepared.warning.is_none());
    }

    #[tokio::test]
    async fn test_state_is_fetched_per_attempt() {
        let client = client_with_state(SessionState::active(U256::from(1_000)));
        for _ in 0..3 {
            client
                .prepare_call(Address::with_last_byte(0xbb), U256::ZERO, None)
                .await
                .unwrap();
        }
        assert_eq!(client.state_provider.fetches.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_closed_session_cannot_sign() {
        let mut state = SessionState::active(U256::from(1_000));
        state.status = SessionStatus::Closed;
        let client = client_with_state(state);
        let err = client
            .prepare_call(Address::with_last_byte(0xbb), U256::ZERO, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::SessionNotActive(SessionStatus::Closed)
        ));
    }

    #[tokio::test]
    async fn test_policy_rejection_blocks_backend() {
        let client = client_with_state(SessionState::active(U256::from(1_000)));
        let err = client
            .prepare_call(Address::with_last_byte(0xcc), U256::ZERO, None)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Policy(_)));
    }

    #[tokio::test]
    async fn test_expired_session_rejected() {
        let spec = SessionSpec::builder()
            .expires_at(1) // 1970, long past
            .fee_limit(UsageLimit::unlimited())
            .allow_transfer(Address::with_last_byte(0xbb), U256::MAX, UsageLimit::unlimited())
            .build();
        let client = SessionClient::new(
            spec,
            SecretString::from("0x00"),
            Address::ZERO,
            Address::ZERO,
            StubBackend,
            FixedStateProvider {
                state: SessionState::active(U256::MAX),
                fetches: AtomicUsize::new(0),
            },
        )
        .unwrap();

        let err = client
            .prepare_call(Address::with_last_byte(0xbb), U256::ZERO, None)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::SessionExpired { .. }));

        let err = client.sign_user_operation(B256::ZERO).await.unwrap_err();
        assert!(matches!(err, SessionError::SessionExpired { .. }));
    }

    #[tokio::test]
    async fn test_state_fetch_failure_is_surfaced() {
        struct FailingStateProvider;

        #[async_trait]
        impl SessionStateProvider for FailingStateProvider {
            async fn fetch_state(
                &self,
                _account: Address,
                _session_hash: B256,
            ) -> Result<SessionState> {
                Err(SessionError::StateFetch("rpc timeout".into()))
            }
        }

        let spec = SessionSpec::builder()
            .expires_at(far_future())
            .fee_limit(UsageLimit::unlimited())
            .allow_transfer(
                Address::with_last_byte(0xbb),
                U256::from(100),
                UsageLimit::unlimited(),
            )
            .build();
        let client = SessionClient::new(
            spec,
            SecretString::from("0x00"),
            Address::ZERO,
            Address::ZERO,
            StubBackend,
            FailingStateProvider,
        )
        .unwrap();

        let err = client
            .prepare_call(Address::with_last_byte(0xbb), U256::ZERO, None)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::StateFetch(_)));
        assert!(!err.is_policy_rejection());
    }

    #[tokio::test]
    async fn test_unsupported_operations_fail_fast() {
        let client = client_with_state(SessionState::active(U256::ZERO));

        assert!(matches!(
            client.sign_message(b"hello").unwrap_err(),
            SessionError::UnsupportedOperation(_)
        ));
        assert!(matches!(
            client.sign_typed_data(&serde_json::json!({})).unwrap_err(),
            SessionError::UnsupportedOperation(_)
        ));
        assert!(matches!(
            client.prepare_batch(&[]).unwrap_err(),
            SessionError::UnsupportedOperation(_)
        ));
    }

    #[tokio::test]
    async fn test_warning_is_surfaced_but_not_blocking() {
        // Fee budget fully exhausted, but the per-use check still passes:
        // the warning is advisory and the call is prepared.
        let spec = SessionSpec::builder()
            .expires_at(far_future())
            .fee_limit(UsageLimit::lifetime(U256::from(1_000)))
            .allow_transfer(
                Address::with_last_byte(0xbb),
                U256::from(100),
                UsageLimit::unlimited(),
            )
            .build();
        let client = SessionClient::new(
            spec,
            SecretString::from("0x00"),
            Address::ZERO,
            Address::ZERO,
            StubBackend,
            FixedStateProvider {
                state: SessionState::active(U256::ZERO),
                fetches: AtomicUsize::new(0),
            },
        )
        .unwrap();

        let prepared = client
            .prepare_call(Address::with_last_byte(0xbb), U256::ZERO, None)
            .await
            .unwrap();
        assert!(prepared.warning.unwrap().contains("exhausted"));
    }
}
