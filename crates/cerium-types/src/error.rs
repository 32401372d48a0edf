use std::fmt;

use thiserror::Error;

/// Errors related to form and response operations.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("{0}")]
    Validation(String),

    #[error("unauthorized: {0}")]
    Unauthenticated(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("user has already filled this form")]
    AlreadyFilled,

    /// Missing form, or a form the caller does not own.
    #[error("form not found")]
    NotFound,

    #[error("form is closed for responses")]
    Closed,

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Which leg of the login flow failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamStage {
    TokenExchange,
    Profile,
}

impl fmt::Display for UpstreamStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamStage::TokenExchange => write!(f, "token exchange"),
            UpstreamStage::Profile => write!(f, "profile fetch"),
        }
    }
}

/// Errors related to login and session handling.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unauthorized: {0}")]
    Unauthenticated(String),

    #[error("identity provider {stage} failed: {message}")]
    Upstream { stage: UpstreamStage, message: String },

    #[error("profile not found")]
    ProfileNotFound,

    #[error("session signing failed: {0}")]
    Signing(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Reasons a session token fails verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session expired")]
    Expired,

    #[error("invalid session signature")]
    BadSignature,

    #[error("malformed session token: {0}")]
    Malformed(String),

    #[error("could not sign session: {0}")]
    Signing(String),
}

/// Errors from the identity provider client.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("provider returned status {0}")]
    Status(u16),

    #[error("invalid provider payload: {0}")]
    Decode(String),
}

/// Errors from repository operations (used by trait definitions in cerium-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}
