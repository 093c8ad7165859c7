/// Domain-level errors shared by the server and client crates.
///
/// HTTP mapping lives in `evendiona_api::error::AppError`; this type only
/// carries the classification and a human-readable message.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Required input was missing or empty.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Credentials or bearer token were absent, invalid, or expired.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// The caller is authenticated but lacks the required role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
