use std::time::Duration;

use reqwest::{header, RequestBuilder, Response, StatusCode};
use tracing::{info, warn};
use url::Url;

use super::token::{GraphCredentials, TokenCache, TokenSource};
use super::{normalize_path, StorageError};
use crate::config::StorageConfig;

const GRAPH_BASE: &str = "https://graph.microsoft.com/v1.0/";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// File operations on the practice's OneDrive, addressed by path.
pub struct OneDriveClient<S: TokenSource = GraphCredentials> {
    http: reqwest::Client,
    tokens: TokenCache<S>,
    graph_base: Url,
}

impl OneDriveClient<GraphCredentials> {
    /// `None` while the Graph credentials are incomplete.
    pub fn from_config(config: &StorageConfig) -> Result<Option<Self>, StorageError> {
        if !config.is_configured() {
            return Ok(None);
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        let credentials = GraphCredentials::new(
            &config.tenant_id,
            &config.client_id,
            &config.client_secret,
            http.clone(),
        );
        let tokens = TokenCache::new(credentials, Duration::from_secs(config.token_refresh_margin_secs));
        Ok(Some(Self::new(http, tokens, Url::parse(GRAPH_BASE)?)))
    }
}

impl<S: TokenSource> OneDriveClient<S> {
    pub fn new(http: reqwest::Client, tokens: TokenCache<S>, graph_base: Url) -> Self {
        Self { http, tokens, graph_base }
    }

    /// `drive/root:/a/b:/content`, the bytes of the item at `a/b`.
    fn content_url(&self, segments: &[String]) -> Result<Url, StorageError> {
        let mut url = self.graph_base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| StorageError::InvalidPath(self.graph_base.to_string()))?;
            path.pop_if_empty().push("drive").push("root:");
            let (last, parents) = segments
                .split_last()
                .ok_or_else(|| StorageError::InvalidPath(String::new()))?;
            path.extend(parents);
            path.push(&format!("{last}:")).push("content");
        }
        Ok(url)
    }

    // One retry with a fresh token when Graph rejects the cached one.
    async fn send(&self, build: impl Fn(&str) -> RequestBuilder) -> Result<Response, StorageError> {
        let token = self.tokens.token().await?;
        let response = build(&token).send().await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }
        warn!("[STORAGE] Graph rejected the cached token, refreshing");
        self.tokens.invalidate().await;
        let token = self.tokens.token().await?;
        Ok(build(&token).send().await?)
    }

    async fn remote_error(response: Response) -> StorageError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        StorageError::Remote { status, body }
    }

    pub async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        let segments = normalize_path(path)?;
        let url = self.content_url(&segments)?;

        let response = self
            .send(|token| {
                self.http
                    .put(url.clone())
                    .bearer_auth(token)
                    .header(header::CONTENT_TYPE, content_type)
                    .body(bytes.clone())
            })
            .await?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => {
                info!("[STORAGE] uploaded {}", segments.join("/"));
                Ok(())
            }
            _ => Err(Self::remote_error(response).await),
        }
    }

    /// File bytes and their content type.
    pub async fn download(&self, path: &str) -> Result<(Vec<u8>, String), StorageError> {
        let segments = normalize_path(path)?;
        let url = self.content_url(&segments)?;

        let response = self
            .send(|token| self.http.get(url.clone()).bearer_auth(token))
            .await?;

        match response.status() {
            StatusCode::OK => {
                let content_type = response
                    .headers()
                    .get(header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or(DEFAULT_CONTENT_TYPE)
                    .to_string();
                let bytes = response.bytes().await?;
                Ok((bytes.to_vec(), content_type))
            }
            StatusCode::NOT_FOUND => Err(StorageError::NotFound(segments.join("/"))),
            _ => Err(Self::remote_error(response).await),
        }
    }
}
