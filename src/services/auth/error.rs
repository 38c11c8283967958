use axum::http::StatusCode;
use thiserror::Error;

use crate::services::auth::jwks::JwksError;

/// Authentication / authorization failures.
///
/// Every variant except `Forbidden` is an authentication problem (401).
/// `Forbidden` means the caller is authenticated but lacks the permission (403).
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization header is expected")]
    MissingHeader,
    #[error("authorization header must be a bearer token")]
    MalformedHeader,
    #[error("unable to fetch signing keys")]
    KeyFetch(#[from] JwksError),
    #[error("unable to parse authentication token")]
    MalformedToken,
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token expired")]
    TokenExpired,
    #[error("{0}")]
    InvalidClaims(&'static str),
    #[error("permission not found")]
    Forbidden,
}

impl AuthError {
    pub const CLAIMS_MISMATCH: Self =
        AuthError::InvalidClaims("incorrect claims, please check the audience and issuer");
    pub const PERMISSIONS_MISSING: Self =
        AuthError::InvalidClaims("permissions not included in token");
    pub const EXPIRY_OUT_OF_RANGE: Self = AuthError::InvalidClaims("token expiry is out of range");

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// Stable, log-friendly name of the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "missing_header",
            AuthError::MalformedHeader => "malformed_header",
            AuthError::KeyFetch(_) => "key_fetch_error",
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims(_) => "invalid_claims",
            AuthError::Forbidden => "forbidden",
        }
    }
}
