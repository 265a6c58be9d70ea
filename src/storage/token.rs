use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::StorageError;

const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    /// seconds
    pub expires_in: u64,
}

/// Anything that can hand out a fresh bearer token for Graph.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch_token(&self) -> Result<AccessToken, StorageError>;
}

/// App-only credentials, exchanged with the client-credentials grant.
pub struct GraphCredentials {
    tenant_id: String,
    client_id: String,
    client_secret: String,
    http: reqwest::Client,
}

impl GraphCredentials {
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            http,
        }
    }

    fn token_url(&self) -> String {
        format!("https://login.microsoftonline.com/{}/oauth2/v2.0/token", self.tenant_id)
    }
}

#[async_trait]
impl TokenSource for GraphCredentials {
    async fn fetch_token(&self) -> Result<AccessToken, StorageError> {
        let response = self
            .http
            .post(self.token_url())
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", GRAPH_SCOPE),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Token(format!("{status}: {body}")));
        }

        let token: AccessToken = response.json().await?;
        info!("[STORAGE] obtained Graph token valid for {}s", token.expires_in);
        Ok(token)
    }
}

struct Cached {
    token: String,
    refresh_at: Instant,
}

/// Reuses a token until `expires_in - margin` has elapsed.
pub struct TokenCache<S> {
    source: S,
    margin: Duration,
    cached: Mutex<Option<Cached>>,
}

impl<S: TokenSource> TokenCache<S> {
    pub fn new(source: S, margin: Duration) -> Self {
        Self {
            source,
            margin,
            cached: Mutex::new(None),
        }
    }

    pub async fn token(&self) -> Result<String, StorageError> {
        let mut cached = self.cached.lock().await;

        if let Some(c) = cached.as_ref() {
            if Instant::now() < c.refresh_at {
                return Ok(c.token.clone());
            }
            debug!("[STORAGE] Graph token due for refresh");
        }

        let fresh = self.source.fetch_token().await?;
        let lifetime = Duration::from_secs(fresh.expires_in).saturating_sub(self.margin);
        *cached = Some(Cached {
            token: fresh.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });
        Ok(fresh.access_token)
    }

    /// Forget the cached token, e.g. after Graph answered 401.
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        expires_in: u64,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TokenSource for CountingSource {
        async fn fetch_token(&self) -> Result<AccessToken, StorageError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(AccessToken {
                access_token: format!("token-{n}"),
                expires_in: self.expires_in,
            })
        }
    }

    fn cache(expires_in: u64) -> TokenCache<CountingSource> {
        TokenCache::new(
            CountingSource { expires_in, calls: AtomicUsize::new(0) },
            Duration::from_secs(300),
        )
    }

    #[tokio::test]
    async fn valid_token_is_reused() {
        let cache = cache(3600);
        assert_eq!(cache.token().await.unwrap(), "token-1");
        assert_eq!(cache.token().await.unwrap(), "token-1");
        assert_eq!(cache.source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn token_inside_margin_is_refetched() {
        let cache = cache(100);
        assert_eq!(cache.token().await.unwrap(), "token-1");
        assert_eq!(cache.token().await.unwrap(), "token-2");
    }

    #[tokio::test]
    async fn invalidate_forces_a_new_token() {
        let cache = cache(3600);
        cache.token().await.unwrap();
        cache.invalidate().await;
        assert_eq!(cache.token().await.unwrap(), "token-2");
    }
}
