/// Factory: build `TokenValidator` from application `Config`.
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::services::auth::TokenValidator;
use crate::services::auth::jwks::{HttpKeySource, JwksCache, JwksError};

pub fn build_token_validator(config: &AuthConfig) -> Result<Arc<TokenValidator>, JwksError> {
    let source = HttpKeySource::new(config.jwks_url.clone(), config.jwks_fetch_timeout)?;
    let keys = JwksCache::new(
        Arc::new(source),
        config.jwks_cache_ttl,
        config.jwks_min_refresh,
    );

    Ok(Arc::new(TokenValidator::new(
        keys,
        config.issuer.clone(),
        config.audience.clone(),
        config.algorithms.clone(),
        config.leeway_seconds,
    )))
}
