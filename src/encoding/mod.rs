//! Canonical encodings of a session spec.
//!
//! Two deterministic encodings, used at the boundary with the out-of-process
//! signing backend:
//!
//! - [`to_canonical_json`] — the string form handed to the backend when the
//!   session is installed. Field names are camelCase, field order is struct
//!   declaration order, and every unsigned-integer field is rendered as a
//!   base-10 string so that 256-bit values survive any further serialization
//!   hop without precision loss.
//! - [`session_hash`] — the 32-byte digest a session key signs over to bind
//!   itself to its spec: ABI encoding of the spec under the published
//!   type-and-offset schema, then keccak256.

mod canonical;
mod hash;

pub use canonical::{from_canonical_json, to_canonical_json};
pub(crate) use canonical::{u64_dec, u256_dec};
pub use hash::session_hash;
