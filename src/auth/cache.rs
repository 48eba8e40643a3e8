//! Single-flight token cache.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use secrecy::SecretString;
use tokio::sync::Mutex;

use crate::{Result, SessionError};

/// Default slack subtracted from a token's lifetime so callers never hold a
/// token that expires mid-request.
const DEFAULT_REFRESH_SKEW_SECS: u64 = 30;

/// A bearer token with an optional expiry.
#[derive(Clone, Debug)]
pub struct AuthToken {
    pub token: SecretString,
    /// Unix seconds; `None` means the token does not expire.
    pub expires_at: Option<u64>,
}

impl AuthToken {
    pub fn new(token: impl Into<String>, expires_at: Option<u64>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            expires_at,
        }
    }

    pub fn is_expired_at(&self, now: u64) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Source of fresh tokens.
#[async_trait]
pub trait TokenProvider: Send + Sync + 'static {
    async fn fetch_token(&self) -> Result<AuthToken>;
}

type RefreshFuture = Shared<BoxFuture<'static, std::result::Result<AuthToken, Arc<SessionError>>>>;

struct CacheState {
    cached: Option<AuthToken>,
    inflight: Option<RefreshFuture>,
}

/// A caching wrapper around any [`TokenProvider`] that coalesces concurrent
/// refreshes.
///
/// When the cache is cold or stale, the first caller starts a refresh and
/// every concurrent caller awaits the same shared future; the provider is
/// hit exactly once per refresh. Cheap to clone and share.
pub struct TokenCache<P> {
    provider: Arc<P>,
    state: Arc<Mutex<CacheState>>,
    refresh_skew_secs: u64,
}

impl<P> Clone for TokenCache<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            state: Arc::clone(&self.state),
            refresh_skew_secs: self.refresh_skew_secs,
        }
    }
}

impl<P: TokenProvider> TokenCache<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider: Arc::new(provider),
            state: Arc::new(Mutex::new(CacheState {
                cached: None,
                inflight: None,
            })),
            refresh_skew_secs: DEFAULT_REFRESH_SKEW_SECS,
        }
    }

    pub fn with_refresh_skew(mut self, skew_secs: u64) -> Self {
        self.refresh_skew_secs = skew_secs;
        self
    }

    /// Return the cached token, or fetch one (joining an in-flight refresh
    /// if another caller already started it).
    pub async fn token(&self) -> Result<AuthToken> {
        let now = Utc::now().timestamp().max(0) as u64;

        let refresh = {
            let mut state = self.state.lock().await;

            if let Some(token) = &state.cached
                && !token.is_expired_at(now.saturating_add(self.refresh_skew_secs))
            {
                return Ok(token.clone());
            }

            match &state.inflight {
                Some(inflight) => inflight.clone(),
                None => {
                    let provider = Arc::clone(&self.provider);
                    let shared_state = Arc::clone(&self.state);
                    let refresh: RefreshFuture = async move {
                        let result = provider.fetch_token().await.map_err(Arc::new);
                        let mut state = shared_state.lock().await;
                        state.inflight = None;
                        if let Ok(token) = &result {
                            state.cached = Some(token.clone());
                        }
                        result
                    }
                    .boxed()
                    .shared();
                    state.inflight = Some(refresh.clone());
                    refresh
                }
            }
        };

        refresh
            .await
            .map_err(|err| SessionError::Auth(err.to_string()))
    }

    /// Drop the cached token; the next caller triggers a refresh.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        state.cached = None;
    }
}
