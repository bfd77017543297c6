// src/model.rs
//! Trend dataset as published by the batch job in `trends.json`.
//!
//! The producer is loose about types, so nothing here is derived with
//! `Deserialize`: every field is pulled out of a `serde_json::Value` and a
//! missing or wrong-typed field falls back to its neutral default instead of
//! failing the whole document.

use serde_json::{Map, Value};

/// Root object of `trends.json`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendDataset {
    /// Opaque timestamp (RFC 3339 string or epoch millis); display only.
    pub fetched_at: Option<Value>,
    pub source: SourceFlags,
    pub items: Vec<TrendItem>,
}

/// Which upstream providers contributed to the dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceFlags {
    pub google: bool,
    /// Short-video provider; published as `tiktok_csv` or `tiktok`.
    pub tiktok: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Article {
    pub url: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendItem {
    pub title: Option<String>,
    pub niche: Option<String>,
    pub score: Option<f64>,
    pub formatted_traffic: Option<Value>,
    pub tiktok_views: Option<Value>,
    /// `Some` whenever the key is present, even for `null`, `0` or `""`.
    pub tiktok_growth: Option<Value>,
    pub articles: Vec<Article>,
    pub sources: Vec<String>,
    pub share_url: Option<String>,
    // Raw lists as published, kept for free-text search.
    raw_articles: Option<Value>,
    raw_sources: Option<Value>,
}

impl TrendDataset {
    /// Parse a response body. Fails only on invalid JSON or a non-object root.
    pub fn from_slice(body: &[u8]) -> Result<Self, DatasetError> {
        let root: Value = serde_json::from_slice(body)?;
        Self::from_value(&root)
    }

    pub fn from_value(root: &Value) -> Result<Self, DatasetError> {
        let obj = root.as_object().ok_or(DatasetError::NotAnObject)?;

        let source = obj
            .get("source")
            .and_then(Value::as_object)
            .map(SourceFlags::from_map)
            .unwrap_or_default();

        let items = obj
            .get("items")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().map(TrendItem::from_value).collect())
            .unwrap_or_default();

        Ok(Self {
            fetched_at: obj.get("fetched_at").cloned(),
            source,
            items,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("dataset root is not a JSON object")]
    NotAnObject,
}

impl SourceFlags {
    fn from_map(m: &Map<String, Value>) -> Self {
        let flag = |k: &str| m.get(k).is_some_and(is_truthy);
        Self {
            google: flag("google"),
            tiktok: flag("tiktok_csv") || flag("tiktok"),
        }
    }
}

impl TrendItem {
    /// Build an item from one entry of `items`. Never fails.
    pub fn from_value(v: &Value) -> Self {
        let Some(obj) = v.as_object() else {
            return Self::default();
        };

        let articles = obj
            .get("articles")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().map(Article::from_value).collect())
            .unwrap_or_default();

        let sources = obj
            .get("sources")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().map(crate::escape::value_text).collect())
            .unwrap_or_default();

        Self {
            title: string_field(obj, "title"),
            niche: string_field(obj, "niche"),
            score: obj.get("score").and_then(Value::as_f64),
            formatted_traffic: obj.get("formattedTraffic").cloned(),
            tiktok_views: obj.get("tiktokViews").cloned(),
            tiktok_growth: obj.get("tiktokGrowth").cloned(),
            articles,
            sources,
            share_url: string_field(obj, "shareUrl"),
            raw_articles: obj.get("articles").filter(|v| is_truthy(v)).cloned(),
            raw_sources: obj.get("sources").filter(|v| is_truthy(v)).cloned(),
        }
    }

    pub fn score_or_zero(&self) -> f64 {
        self.score.unwrap_or(0.0)
    }

    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn niche_or_empty(&self) -> &str {
        self.niche.as_deref().unwrap_or("")
    }

    /// JSON text of `sources` as published (`[]` when absent).
    pub fn sources_json(&self) -> String {
        json_or_empty_list(self.raw_sources.as_ref())
    }

    /// JSON text of `articles` as published (`[]` when absent).
    pub fn articles_json(&self) -> String {
        json_or_empty_list(self.raw_articles.as_ref())
    }
}

impl Article {
    fn from_value(v: &Value) -> Self {
        match v.as_object() {
            Some(obj) => Self {
                url: string_field(obj, "url"),
                title: string_field(obj, "title"),
            },
            None => Self::default(),
        }
    }
}

/// Truthiness as the producer's consumers have always read it: null, false,
/// 0, NaN and "" are false; everything else (including `[]` and `{}`) is true.
pub fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// Non-empty strings only; empty strings count as absent.
fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn json_or_empty_list(v: Option<&Value>) -> String {
    match v {
        Some(v) => v.to_string(),
        None => "[]".to_string(),
    }
}
