// src/config.rs
//! Board configuration: TOML file plus environment overrides.

use anyhow::{anyhow, Context, Result};
use reqwest::Url;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::sort::SortKey;

pub const DEFAULT_CONFIG_PATH: &str = "config/board.toml";

pub const ENV_CONFIG_PATH: &str = "TREND_BOARD_CONFIG_PATH";
pub const ENV_DATA_URL: &str = "TREND_BOARD_DATA_URL";
pub const ENV_STATIC_DIR: &str = "TREND_BOARD_STATIC_DIR";

fn default_data_url() -> String {
    "http://127.0.0.1:8000/".to_string()
}
fn default_static_dir() -> PathBuf {
    PathBuf::from("public")
}
fn default_categories() -> Vec<String> {
    ["Kleidung", "Elektronik", "Motorrad", "Sonstiges"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    /// Base URL `trends.json` is resolved against.
    #[serde(default = "default_data_url")]
    pub data_url: String,
    /// Directory served as static fallback (may hold `trends.json` itself).
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    /// Options of the category selector, besides "alle".
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    /// Sort key used when a request does not name one.
    #[serde(default)]
    pub default_sort: SortKey,
    /// Install the Prometheus recorder and expose `/metrics`.
    #[serde(default)]
    pub metrics: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            data_url: default_data_url(),
            static_dir: default_static_dir(),
            categories: default_categories(),
            default_sort: SortKey::default(),
            metrics: false,
        }
    }
}

impl BoardConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading board config from {}", path.display()))?;
        let cfg: BoardConfig = toml::from_str(&data)
            .with_context(|| format!("parsing board config {}", path.display()))?;
        Ok(cfg.sanitized())
    }

    /// Resolution order:
    /// 1) $TREND_BOARD_CONFIG_PATH (must exist)
    /// 2) config/board.toml
    /// 3) built-in defaults
    ///
    /// then $TREND_BOARD_DATA_URL / $TREND_BOARD_STATIC_DIR override single fields.
    pub fn load_default() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from_file(&pb)?
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::load_from_file(DEFAULT_CONFIG_PATH)?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var(ENV_DATA_URL) {
            cfg.data_url = url;
        }
        if let Ok(dir) = std::env::var(ENV_STATIC_DIR) {
            cfg.static_dir = PathBuf::from(dir);
        }

        cfg.data_url()?;
        Ok(cfg.sanitized())
    }

    /// Parsed `data_url`. A base without a trailing slash is treated as a
    /// directory, so `http://host/board` resolves to `http://host/board/trends.json`.
    pub fn data_url(&self) -> Result<Url> {
        let raw = self.data_url.trim();
        let with_slash = if raw.ends_with('/') {
            raw.to_string()
        } else {
            format!("{raw}/")
        };
        Url::parse(&with_slash).with_context(|| format!("invalid data_url {raw:?}"))
    }

    fn sanitized(mut self) -> Self {
        use std::collections::HashSet;
        let mut seen = HashSet::new();
        self.categories = self
            .categories
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty() && c != crate::filter::ALL_CATEGORIES)
            .filter(|c| seen.insert(c.clone()))
            .collect();
        self
    }
}
