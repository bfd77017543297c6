// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod api;
pub mod board;
pub mod config;
pub mod escape;
pub mod filter;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod page;
pub mod render;
pub mod sort;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::board::{Board, RunOutcome, RunReport, ViewState, UNAVAILABLE_MESSAGE};
pub use crate::config::BoardConfig;
pub use crate::loader::{HttpTrendSource, LoadError, StaticTrendSource, TrendSource};
pub use crate::model::{TrendDataset, TrendItem};

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tracing::info;

/// Build the full application router from a resolved config: HTTP data
/// source, board, routes, and `/metrics` when enabled.
pub fn app(config: BoardConfig) -> Result<Router> {
    let base = config.data_url()?;
    info!(data_url = %base, static_dir = %config.static_dir.display(), "trend board configured");

    let source: Arc<dyn TrendSource> = Arc::new(HttpTrendSource::new(base));
    let with_metrics = config.metrics;
    let mut router = api::router(AppState::new(Board::new(source), config));

    if with_metrics {
        let m = crate::metrics::Metrics::init()?;
        router = router.merge(m.router());
    }
    Ok(router)
}
