//! Token acquisition for the surrounding auth flow.
//!
//! The policy engine itself needs no authentication; the services around it
//! (state queries, bundler submission) often do. [`TokenCache`] owns its
//! cached token and a single in-flight refresh explicitly, so it can be
//! injected where needed instead of living in module-global state.

mod cache;

pub use cache::{AuthToken, TokenCache, TokenProvider};
