//! Signing key set (JWKS) source + time-bounded cache.
//!
//! The cache holds one immutable snapshot at a time. A refresh fetches a
//! complete new key set and swaps the `Arc`; readers never see a partially
//! updated set and no lock is held across the network call.
//! Concurrent refreshes may race: both fetch, last writer wins.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum JwksError {
    #[error("jwks request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("jwks endpoint returned status {0}")]
    Status(u16),
}

/// Where signing keys come from.
#[async_trait]
pub trait KeySource: Send + Sync + 'static {
    // For logging.
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<JwkSet, JwksError>;
}

/// Fetches the key set from the issuer's JWKS endpoint.
#[derive(Debug, Clone)]
pub struct HttpKeySource {
    url: Url,
    client: reqwest::Client,
}

impl HttpKeySource {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, JwksError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { url, client })
    }
}

#[async_trait]
impl KeySource for HttpKeySource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn fetch(&self) -> Result<JwkSet, JwksError> {
        let res = self.client.get(self.url.clone()).send().await?;

        let status = res.status();
        if !status.is_success() {
            return Err(JwksError::Status(status.as_u16()));
        }

        Ok(res.json::<JwkSet>().await?)
    }
}

#[derive(Debug)]
struct KeySnapshot {
    keys: JwkSet,
    fetched_at: Instant,
}

impl KeySnapshot {
    fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }
}

pub struct JwksCache {
    source: Arc<dyn KeySource>,
    ttl: Duration,
    // An unknown `kid` forces a refresh only when the snapshot is at least this old.
    min_refresh_interval: Duration,
    current: RwLock<Option<Arc<KeySnapshot>>>,
}

impl std::fmt::Debug for JwksCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwksCache")
            .field("source", &self.source.describe())
            .field("ttl", &self.ttl)
            .field("min_refresh_interval", &self.min_refresh_interval)
            .finish()
    }
}

impl JwksCache {
    pub fn new(source: Arc<dyn KeySource>, ttl: Duration, min_refresh_interval: Duration) -> Self {
        Self {
            source,
            ttl,
            min_refresh_interval,
            current: RwLock::new(None),
        }
    }

    /// Look up a signing key by `kid`.
    ///
    /// - `Ok(Some(_))`: key found in a fresh snapshot
    /// - `Ok(None)`: key unknown even after a forced refresh
    /// - `Err(_)`: the key source could not be reached
    pub async fn find(&self, kid: &str) -> Result<Option<Jwk>, JwksError> {
        let snapshot = match self.snapshot() {
            Some(s) if s.age() < self.ttl => s,
            _ => self.refresh().await?,
        };

        if let Some(jwk) = snapshot.keys.find(kid) {
            return Ok(Some(jwk.clone()));
        }

        // Issuer may have rotated keys since the last fetch.
        if snapshot.age() < self.min_refresh_interval {
            return Ok(None);
        }
        tracing::debug!(kid, "unknown kid, refreshing signing keys");
        let snapshot = self.refresh().await?;
        Ok(snapshot.keys.find(kid).cloned())
    }

    /// Fetch the key set now, replacing whatever is cached.
    pub async fn prime(&self) -> Result<(), JwksError> {
        self.refresh().await.map(|_| ())
    }

    fn snapshot(&self) -> Option<Arc<KeySnapshot>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn refresh(&self) -> Result<Arc<KeySnapshot>, JwksError> {
        let keys = self.source.fetch().await.map_err(|err| {
            tracing::warn!(error = %err, source = %self.source.describe(), "signing key fetch failed");
            err
        })?;

        tracing::info!(keys = keys.keys.len(), source = %self.source.describe(), "signing keys refreshed");

        let snapshot = Arc::new(KeySnapshot {
            keys,
            fetched_at: Instant::now(),
        });
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());

        Ok(snapshot)
    }
}
