//! Wire types for the authentication endpoints.
//!
//! The server serializes these and the client deserializes them, so both
//! sides agree on the `{ "success": true, "data": ... }` envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::roles::Role;

/// The authenticated principal as reported by `GET /api/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    pub role: Role,
}

/// Standard success envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Error envelope returned with every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
    pub code: String,
}

/// `data` payload of `POST /api/auth/admin/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPayload {
    pub token: String,
}

/// `data` payload of `GET /api/auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MePayload {
    pub user: Identity,
}

/// `data` payload of `GET /api/auth/admin/verify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSessionPayload {
    pub user: Identity,
    pub expires_at: DateTime<Utc>,
}
