pub mod auth;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /auth/admin/login     admin login (public)
/// /auth/me              identity check (bearer token)
/// /auth/admin/verify    admin session check (admin bearer token)
/// ```
///
/// Any protected route added here guards itself by taking an `AuthUser` or
/// `RequireAdmin` extractor argument.
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/auth", auth::router())
}
