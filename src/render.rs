// src/render.rs
//! HTML fragments for the three output regions: source badges, item cards and
//! the status line.
//!
//! Fragments are rebuilt from scratch on every run. Only data-derived text is
//! escaped; the markup written here is trusted.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::escape::{escape, escape_value, value_text};
use crate::model::{is_truthy, SourceFlags, TrendDataset, TrendItem};

/// Placeholder for an absent title, niche or signal line.
pub const PLACEHOLDER: &str = "—";
/// Link text for an article without a title.
pub const ARTICLE_FALLBACK_TITLE: &str = "Quelle";
/// At most this many article links per card.
pub const MAX_ARTICLE_LINKS: usize = 3;

const SIGNAL_SEPARATOR: &str = " • ";

/// Content of the three output regions after one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Regions {
    pub badges_html: String,
    pub items_html: String,
    /// Plain text; escaped when placed into a page.
    pub status: String,
}

/// Render a dataset's badges plus the already filtered and sorted items.
pub fn render(dataset: &TrendDataset, items: &[&TrendItem], now: DateTime<Local>) -> Regions {
    Regions {
        badges_html: render_badges(&dataset.source),
        items_html: render_items(items),
        status: status_line(items.len(), dataset.fetched_at.as_ref(), now),
    }
}

pub fn render_badges(flags: &SourceFlags) -> String {
    let mut out = String::new();
    if flags.google {
        out.push_str(&badge("Google"));
    }
    if flags.tiktok {
        out.push_str(&badge("TikTok CSV"));
    }
    out
}

pub fn render_items(items: &[&TrendItem]) -> String {
    items.iter().map(|it| render_card(it)).collect()
}

pub fn render_card(it: &TrendItem) -> String {
    let source_pills: String = it.sources.iter().map(|s| pill(s)).collect();
    let signals = signal_line(it);

    format!(
        r#"<article class="item">
  <div class="row">
    {niche}
    <span class="pill score">Score: {score}</span>
    <span class="row">{source_pills}</span>
  </div>
  <h3>{title}</h3>
  <div class="muted">{signals}</div>
  <div class="links">{links}</div>
</article>
"#,
        niche = pill(it.niche.as_deref().unwrap_or(PLACEHOLDER)),
        score = round_score(it.score_or_zero()),
        title = escape(it.title.as_deref().unwrap_or(PLACEHOLDER)),
        signals = if signals.is_empty() { PLACEHOLDER.to_string() } else { signals },
        links = links(it),
    )
}

/// Traffic and views appear when truthy; growth whenever the key exists.
/// Values come back escaped.
pub fn signal_line(it: &TrendItem) -> String {
    let mut parts = Vec::with_capacity(3);
    if let Some(v) = it.formatted_traffic.as_ref().filter(|v| is_truthy(v)) {
        parts.push(format!("Traffic: {}", escape_value(v)));
    }
    if let Some(v) = it.tiktok_views.as_ref().filter(|v| is_truthy(v)) {
        parts.push(format!("TT Views: {}", escape_value(v)));
    }
    if let Some(v) = it.tiktok_growth.as_ref() {
        parts.push(format!("TT Growth: {}", escape_value(v)));
    }
    parts.join(SIGNAL_SEPARATOR)
}

/// Up to three article links, else a Google Trends link, else nothing.
pub fn links(it: &TrendItem) -> String {
    if !it.articles.is_empty() {
        return it
            .articles
            .iter()
            .take(MAX_ARTICLE_LINKS)
            .map(|a| {
                link(
                    a.url.as_deref().unwrap_or_default(),
                    a.title.as_deref().unwrap_or(ARTICLE_FALLBACK_TITLE),
                )
            })
            .collect();
    }
    it.share_url
        .as_deref()
        .map(|u| link(u, "Google Trends"))
        .unwrap_or_default()
}

/// `"<n> Trends • geladen: <time>"`.
pub fn status_line(count: usize, fetched_at: Option<&Value>, now: DateTime<Local>) -> String {
    format!("{count} Trends • geladen: {}", format_fetched_at(fetched_at, now))
}

/// Local `dd.mm.yyyy, HH:MM:SS`. Numbers are epoch millis; falsy values mean
/// "now"; text that is not a recognizable timestamp is shown as is.
pub fn format_fetched_at(fetched_at: Option<&Value>, now: DateTime<Local>) -> String {
    let ts = match fetched_at.filter(|v| is_truthy(v)) {
        None => Some(now),
        Some(Value::Number(n)) => n
            .as_f64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms as i64).single())
            .map(|dt| dt.with_timezone(&Local)),
        Some(Value::String(s)) => parse_timestamp(s),
        Some(_) => None,
    };
    match ts {
        Some(dt) => dt.format("%d.%m.%Y, %H:%M:%S").to_string(),
        None => fetched_at.map(value_text).unwrap_or_default(),
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Local>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Local));
    }
    // Date-time without offset is local time.
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Local.from_local_datetime(&naive).earliest();
        }
    }
    // Bare dates are midnight UTC.
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive).with_timezone(&Local))
}

/// Half-up rounding to an integer (`-2.5` → `-2`, `2.5` → `3`).
pub fn round_score(score: f64) -> i64 {
    (score + 0.5).floor() as i64
}

fn badge(txt: &str) -> String {
    format!(r#"<span class="badge">{}</span>"#, escape(txt))
}

fn pill(txt: &str) -> String {
    format!(r#"<span class="pill">{}</span>"#, escape(txt))
}

fn link(url: &str, text: &str) -> String {
    format!(
        r#"<a href="{}" target="_blank">{}</a>"#,
        escape(url),
        escape(text)
    )
}
