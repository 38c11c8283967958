//! `Authorization: Bearer <token>` header parsing.

use axum::http::{HeaderMap, header};

use crate::services::auth::AuthError;

/// Pull the raw token out of the Authorization header.
///
/// The header must be exactly two space-separated parts, the first literally
/// `Bearer` and the second non-empty.
pub fn extract_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let raw = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    let mut parts = raw.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}
