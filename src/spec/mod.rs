//! Session spec model: the authorization envelope a session key signs over,
//! plus the live state snapshot fetched from the chain.

mod builder;
mod state;
mod types;

pub use builder::SessionSpecBuilder;
pub use state::{LimitState, SessionState, SessionStatus};
pub use types::{CallPolicy, Constraint, ConstraintCondition, SessionSpec, TransferPolicy};
