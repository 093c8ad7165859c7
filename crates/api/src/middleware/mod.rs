//! Bearer-token extractors guarding API routes.
//!
//! - [`auth::AuthUser`] -- any request carrying a valid, unexpired token.
//! - [`rbac::RequireAdmin`] -- additionally requires the `admin` role.

pub mod auth;
pub mod rbac;
