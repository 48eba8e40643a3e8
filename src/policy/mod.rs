//! Policy matching and pre-flight transaction validation.

mod matcher;
mod validator;

pub use matcher::{PolicyMatch, find_matching_policy};
pub use validator::{PolicyViolation, extract_selector, validate};
