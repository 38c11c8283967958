use std::str::FromStr;

use axum::http::HeaderMap;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::jwk::{Jwk, KeyAlgorithm};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use crate::services::auth::jwks::{JwksCache, JwksError};
use crate::services::auth::{AuthError, Claims, bearer};

/// Bearer access-token verifier backed by the issuer's published key set.
///
/// Checks, in order: header shape → JOSE header / `kid` / `alg` → signing key →
/// signature → `exp` → `iss` / `aud` → claim shape.
#[derive(Debug)]
pub struct TokenValidator {
    keys: JwksCache,
    issuer: String,
    audience: String,
    algorithms: Vec<Algorithm>,
    leeway_seconds: u64,
}

impl TokenValidator {
    pub fn new(
        keys: JwksCache,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        algorithms: Vec<Algorithm>,
        leeway_seconds: u64,
    ) -> Self {
        Self {
            keys,
            issuer: issuer.into(),
            audience: audience.into(),
            algorithms,
            leeway_seconds,
        }
    }

    pub async fn prime_keys(&self) -> Result<(), JwksError> {
        self.keys.prime().await
    }

    /// Entry-point for middleware: parse the Authorization header, then validate.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<Claims, AuthError> {
        let token = bearer::extract_token(headers)?;
        self.validate(token).await
    }

    /// Verify a raw JWT and return its claims.
    pub async fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let header = jsonwebtoken::decode_header(token).map_err(|e| {
            tracing::debug!(error = ?e, "undecodable token header");
            AuthError::MalformedToken
        })?;

        let kid = header.kid.as_deref().ok_or(AuthError::MalformedToken)?;

        // Reject before touching the key cache so arbitrary algs can't force refreshes.
        if !self.algorithms.contains(&header.alg) {
            tracing::debug!(alg = ?header.alg, "token alg not allowed");
            return Err(AuthError::MalformedToken);
        }

        let jwk = self.keys.find(kid).await?.ok_or_else(|| {
            tracing::debug!(kid, "no signing key for kid");
            AuthError::MalformedToken
        })?;

        if !key_allows(&jwk, header.alg) {
            return Err(AuthError::InvalidSignature);
        }

        let decoding_key = DecodingKey::from_jwk(&jwk).map_err(|e| {
            tracing::warn!(error = ?e, kid, "unusable signing key");
            AuthError::MalformedToken
        })?;

        let mut validation = Validation::new(header.alg);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.leeway = self.leeway_seconds;

        let claims = jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| map_decode_error(e.kind()))?
            .claims;

        // jsonwebtoken accepts `exp == now`; an expiry instant is already too late.
        let now = chrono::Utc::now().timestamp();
        let expires_at = i64::try_from(claims.exp.saturating_add(self.leeway_seconds))
            .map_err(|_| AuthError::EXPIRY_OUT_OF_RANGE)?;
        if now >= expires_at {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }
}

// A JWK may pin its algorithm; if so it must be the one the token was signed with.
fn key_allows(jwk: &Jwk, alg: Algorithm) -> bool {
    match &jwk.common.key_algorithm {
        None => true,
        Some(key_alg) => key_algorithm_matches(key_alg, alg),
    }
}

fn key_algorithm_matches(key_alg: &KeyAlgorithm, alg: Algorithm) -> bool {
    // Both enums use the JOSE names ("RS256", "EdDSA", ...) on the wire.
    serde_json::to_value(key_alg)
        .ok()
        .and_then(|v| v.as_str().map(Algorithm::from_str))
        .is_some_and(|parsed| parsed.is_ok_and(|a| a == alg))
}

fn map_decode_error(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => AuthError::InvalidSignature,
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidIssuer
        | ErrorKind::InvalidAudience
        | ErrorKind::InvalidSubject
        | ErrorKind::ImmatureSignature
        | ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::Json(_) => AuthError::CLAIMS_MISMATCH,
        _ => AuthError::MalformedToken,
    }
}
