//! Shared fixtures for unit tests: signing keys, token minting, an in-memory
//! drink store and a fully wired router.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};
use sqlx::types::Json;

use crate::app::build_router;
use crate::config::Config;
use crate::repos::drink_repo::{DrinkRepo, DrinkRow, Ingredient};
use crate::repos::error::RepoError;
use crate::services::auth::TokenValidator;
use crate::services::auth::jwks::{JwksCache, JwksError, KeySource};
use crate::state::AppState;

pub const TEST_ISSUER: &str = "https://coffee-shop.test.auth0.com/";
pub const TEST_AUDIENCE: &str = "drinks";
pub const TEST_KID: &str = "test-key-1";

// Published in testdata/jwks.json under TEST_KID.
const SIGNING_KEY_PEM: &str = include_str!("../testdata/signing_key.pem");
// Never published.
const FOREIGN_KEY_PEM: &str = include_str!("../testdata/foreign_key.pem");
const JWKS_JSON: &str = include_str!("../testdata/jwks.json");

pub fn test_jwks() -> Value {
    serde_json::from_str(JWKS_JSON).unwrap()
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Claims an Auth0 access token for this API would carry.
pub fn valid_claims(permissions: &[&str]) -> Value {
    json!({
        "iss": TEST_ISSUER,
        "aud": TEST_AUDIENCE,
        "sub": "auth0|barista",
        "iat": now(),
        "exp": now() + 3600,
        "permissions": permissions,
    })
}

fn sign(claims: &Value, pem: &str, kid: Option<&str>) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_string);
    let key = EncodingKey::from_rsa_pem(pem.as_bytes()).unwrap();
    jsonwebtoken::encode(&header, claims, &key).unwrap()
}

/// RS256 token signed with the published test key.
pub fn mint_token(claims: &Value) -> String {
    sign(claims, SIGNING_KEY_PEM, Some(TEST_KID))
}

/// RS256 token signed with a key that is not in the key set.
pub fn mint_foreign(claims: &Value, kid: Option<&str>) -> String {
    sign(claims, FOREIGN_KEY_PEM, kid)
}

pub fn bearer(permissions: &[&str]) -> String {
    format!("Bearer {}", mint_token(&valid_claims(permissions)))
}

pub struct StaticKeySource(JwkSet);

#[async_trait]
impl KeySource for StaticKeySource {
    fn describe(&self) -> String {
        "static".to_string()
    }

    async fn fetch(&self) -> Result<JwkSet, JwksError> {
        Ok(self.0.clone())
    }
}

/// Key endpoint that is always down.
pub struct FailingKeySource;

#[async_trait]
impl KeySource for FailingKeySource {
    fn describe(&self) -> String {
        "failing".to_string()
    }

    async fn fetch(&self) -> Result<JwkSet, JwksError> {
        Err(JwksError::Status(503))
    }
}

fn validator_over(source: Arc<dyn KeySource>) -> TokenValidator {
    let cache = JwksCache::new(source, Duration::from_secs(600), Duration::from_secs(30));
    TokenValidator::new(
        cache,
        TEST_ISSUER,
        TEST_AUDIENCE,
        vec![Algorithm::RS256],
        0,
    )
}

pub fn static_validator() -> TokenValidator {
    let keys: JwkSet = serde_json::from_str(JWKS_JSON).unwrap();
    validator_over(Arc::new(StaticKeySource(keys)))
}

pub fn unreachable_keys_validator() -> TokenValidator {
    validator_over(Arc::new(FailingKeySource))
}

/// `DrinkRepo` backed by a map; enforces the unique title like the real table.
#[derive(Default)]
pub struct InMemoryDrinkRepo {
    inner: Mutex<(i32, BTreeMap<i32, DrinkRow>)>,
}

impl InMemoryDrinkRepo {
    fn title_taken(rows: &BTreeMap<i32, DrinkRow>, title: &str, except: Option<i32>) -> bool {
        rows.values()
            .any(|r| r.title == title && Some(r.id) != except)
    }
}

#[async_trait]
impl DrinkRepo for InMemoryDrinkRepo {
    async fn list(&self) -> Result<Vec<DrinkRow>, RepoError> {
        let guard = self.inner.lock().unwrap();
        Ok(guard.1.values().cloned().collect())
    }

    async fn get(&self, id: i32) -> Result<Option<DrinkRow>, RepoError> {
        let guard = self.inner.lock().unwrap();
        Ok(guard.1.get(&id).cloned())
    }

    async fn create(&self, title: &str, recipe: &[Ingredient]) -> Result<DrinkRow, RepoError> {
        let mut guard = self.inner.lock().unwrap();
        let (next_id, rows) = &mut *guard;
        if Self::title_taken(rows, title, None) {
            return Err(RepoError::Conflict);
        }
        *next_id += 1;
        let row = DrinkRow {
            id: *next_id,
            title: title.to_string(),
            recipe: Json(recipe.to_vec()),
        };
        rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        id: i32,
        title: &str,
        recipe: &[Ingredient],
    ) -> Result<Option<DrinkRow>, RepoError> {
        let mut guard = self.inner.lock().unwrap();
        let rows = &mut guard.1;
        if Self::title_taken(rows, title, Some(id)) {
            return Err(RepoError::Conflict);
        }
        let Some(row) = rows.get_mut(&id) else {
            return Ok(None);
        };
        row.title = title.to_string();
        row.recipe = Json(recipe.to_vec());
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, RepoError> {
        let mut guard = self.inner.lock().unwrap();
        Ok(guard.1.remove(&id).is_some())
    }
}

/// Store whose every call fails, as a dropped database connection would.
pub struct BrokenDrinkRepo;

#[async_trait]
impl DrinkRepo for BrokenDrinkRepo {
    async fn list(&self) -> Result<Vec<DrinkRow>, RepoError> {
        Err(RepoError::Db(sqlx::Error::PoolTimedOut))
    }

    async fn get(&self, _id: i32) -> Result<Option<DrinkRow>, RepoError> {
        Err(RepoError::Db(sqlx::Error::PoolTimedOut))
    }

    async fn create(&self, _title: &str, _recipe: &[Ingredient]) -> Result<DrinkRow, RepoError> {
        Err(RepoError::Db(sqlx::Error::PoolTimedOut))
    }

    async fn update(
        &self,
        _id: i32,
        _title: &str,
        _recipe: &[Ingredient],
    ) -> Result<Option<DrinkRow>, RepoError> {
        Err(RepoError::Db(sqlx::Error::PoolTimedOut))
    }

    async fn delete(&self, _id: i32) -> Result<bool, RepoError> {
        Err(RepoError::Db(sqlx::Error::PoolTimedOut))
    }
}

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://unused/coffee".to_string()),
        "AUTH_ISSUER" => Some(TEST_ISSUER.to_string()),
        "AUTH_AUDIENCE" => Some(TEST_AUDIENCE.to_string()),
        _ => None,
    })
    .unwrap()
}

pub fn router_with(drinks: Arc<dyn DrinkRepo>) -> Router {
    router_with_validator(drinks, static_validator())
}

pub fn router_with_validator(drinks: Arc<dyn DrinkRepo>, validator: TokenValidator) -> Router {
    let state = AppState::new(drinks, Arc::new(validator));
    build_router(state, &test_config())
}

pub fn test_router() -> Router {
    router_with(Arc::new(InMemoryDrinkRepo::default()))
}
