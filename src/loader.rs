// src/loader.rs
//! Data loading: one retrieval of `trends.json` per pipeline run.

use std::path::PathBuf;
use std::time::Instant;

use async_trait::async_trait;
use metrics::histogram;
use reqwest::{Client, Url};

use crate::model::{DatasetError, TrendDataset};

/// Name of the data resource, relative to the configured base URL.
pub const TRENDS_RESOURCE: &str = "trends.json";

/// The data is unavailable for this run. Never carries a partial dataset.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot resolve trends.json against {base}: {reason}")]
    InvalidUrl { base: String, reason: String },
    #[error("request for {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("reading {origin}: {source}")]
    Body {
        origin: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("parsing {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: DatasetError,
    },
}

#[async_trait]
pub trait TrendSource: Send + Sync {
    /// Fetch and parse the dataset once. No retries.
    async fn load(&self) -> Result<TrendDataset, LoadError>;
    fn name(&self) -> &str;
}

/// `GET <base>/trends.json?ts=<unix millis>`.
pub struct HttpTrendSource {
    base: Url,
    client: Client,
}

impl HttpTrendSource {
    pub fn new(base: Url) -> Self {
        Self::with_client(base, Client::new())
    }

    pub fn with_client(base: Url, client: Client) -> Self {
        Self { base, client }
    }

    /// Resource URL with the cache-busting `ts` parameter.
    pub fn request_url(&self, ts_millis: i64) -> Result<Url, LoadError> {
        let mut url = self
            .base
            .join(TRENDS_RESOURCE)
            .map_err(|e| LoadError::InvalidUrl {
                base: self.base.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("ts", &ts_millis.to_string());
        Ok(url)
    }
}

#[async_trait]
impl TrendSource for HttpTrendSource {
    async fn load(&self) -> Result<TrendDataset, LoadError> {
        let t0 = Instant::now();
        let ts = chrono::Utc::now().timestamp_millis();
        let url = self.request_url(ts)?;
        let url_str = url.to_string();

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| LoadError::Transport {
                url: url_str.clone(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url: url_str,
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await.map_err(|e| LoadError::Body {
            origin: url_str.clone(),
            source: Box::new(e),
        })?;
        let dataset = TrendDataset::from_slice(&body).map_err(|source| LoadError::Parse {
            origin: url_str.clone(),
            source,
        })?;

        histogram!("board_load_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        tracing::debug!(target: "loader", url = %url_str, items = dataset.items.len(), "trends loaded");
        Ok(dataset)
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Dataset from a local file or an in-memory document.
pub struct StaticTrendSource {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    File(PathBuf),
}

impl StaticTrendSource {
    pub fn from_fixture_str(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
        }
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            mode: Mode::File(path.into()),
        }
    }
}

#[async_trait]
impl TrendSource for StaticTrendSource {
    async fn load(&self) -> Result<TrendDataset, LoadError> {
        match &self.mode {
            Mode::Fixture(s) => {
                TrendDataset::from_slice(s.as_bytes()).map_err(|source| LoadError::Parse {
                    origin: "fixture".to_string(),
                    source,
                })
            }
            Mode::File(path) => {
                let origin = path.display().to_string();
                let body = tokio::fs::read(path).await.map_err(|e| LoadError::Body {
                    origin: origin.clone(),
                    source: Box::new(e),
                })?;
                TrendDataset::from_slice(&body).map_err(|source| LoadError::Parse { origin, source })
            }
        }
    }

    fn name(&self) -> &str {
        match self.mode {
            Mode::Fixture(_) => "fixture",
            Mode::File(_) => "file",
        }
    }
}
