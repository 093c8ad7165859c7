use evendiona_core::roles::Role;

/// Errors surfaced by the client-side session flow.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport failure (DNS, connection refused, TLS, body decoding).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server rejected the request as `400`.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The server rejected the credentials or bearer token (`401`).
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// The server accepted the token but refused the role (`403`).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Any other non-2xx response.
    #[error("Server returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The identity check returned a role other than the one required.
    #[error("Expected role {expected}, got {actual}")]
    WrongRole { expected: Role, actual: Role },

    /// Reading or writing the session storage failed.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid client configuration: {0}")]
    Config(String),
}
