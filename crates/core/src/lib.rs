//! Domain types shared by the Evendiona API server and its clients.

pub mod error;
pub mod identity;
pub mod roles;
