//! Client-side half of the Evendiona session flow.
//!
//! - [`storage`] -- key-value persistence capability (browser-local storage
//!   stand-in) with an in-memory implementation and a file-backed one for
//!   headless clients.
//! - [`session`] -- the observable session store.
//! - [`api`] -- HTTP client for the auth endpoints, with a bearer interceptor.
//! - [`guard`] -- route guard that re-validates a session before rendering.

pub mod api;
pub mod config;
pub mod error;
pub mod guard;
pub mod session;
pub mod storage;
