//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /admin/login   -> admin_login
/// GET  /me            -> me (requires auth)
/// GET  /admin/verify  -> verify_admin (requires admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/login", post(auth::admin_login))
        .route("/me", get(auth::me))
        .route("/admin/verify", get(auth::verify_admin))
}
