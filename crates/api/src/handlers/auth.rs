//! Handlers for the `/auth` resource (admin login, identity check).

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use evendiona_core::identity::{AdminSessionPayload, Envelope, MePayload, TokenPayload};
use evendiona_core::roles::Role;
use serde::Deserialize;

use crate::auth::jwt::issue_token;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/admin/login`.
///
/// Both fields are optional at the serde level so that a missing or `null`
/// field surfaces as a validation error rather than a deserialization one.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/admin/login
///
/// Check the submitted pair against the configured admin credentials and
/// return a 24-hour admin token.
pub async fn admin_login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<Envelope<TokenPayload>>> {
    let Json(input) = payload?;
    let username = input.username.unwrap_or_default();
    let password = input.password.unwrap_or_default();

    if !state.config.admin.validate(&username, &password)? {
        // The submitted username may be a mistyped password; log its length only.
        tracing::warn!(username_len = username.chars().count(), "Rejected admin login");
        return Err(AppError::unauthenticated("Invalid credentials"));
    }

    let token = issue_token(&username, Role::Admin, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(username = %username, "Admin logged in");
    Ok(Json(Envelope::ok(TokenPayload { token })))
}

/// GET /api/auth/me
///
/// Report the identity and role carried by the caller's token.
pub async fn me(user: AuthUser) -> Json<Envelope<MePayload>> {
    Json(Envelope::ok(MePayload {
        user: user.identity(),
    }))
}

/// GET /api/auth/admin/verify
///
/// Admin-only session check; also reports when the token expires.
pub async fn verify_admin(RequireAdmin(user): RequireAdmin) -> Json<Envelope<AdminSessionPayload>> {
    Json(Envelope::ok(AdminSessionPayload {
        user: user.identity(),
        expires_at: user.expires_at,
    }))
}
