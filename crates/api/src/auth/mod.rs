//! Authentication primitives.
//!
//! - [`credentials`] -- admin credential validation.
//! - [`jwt`] -- session token issuance and verification.

pub mod credentials;
pub mod jwt;
