//! `freshtrack-auth` — access-token boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage.
//!
//! **Trust boundary:** tokens issued by the upstream identity provider are
//! *decoded, not verified*. The capability exposed here is "extract claims,
//! no signature verification" — callers must only hand it tokens that arrived
//! over a channel they already trust.

pub mod claims;

pub use claims::{decode_unverified, AccessClaims, AuthError};
