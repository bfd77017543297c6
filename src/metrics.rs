// src/metrics.rs
use anyhow::{Context, Result};
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder and describe the board series.
    /// Fails if a recorder is already installed in this process.
    pub fn init() -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        describe_counter!("board_runs_total", "Pipeline runs dispatched.");
        describe_counter!(
            "board_load_failures_total",
            "Runs whose trends.json load failed."
        );
        describe_counter!(
            "board_runs_superseded_total",
            "Runs discarded because a later run was applied first."
        );
        describe_gauge!("board_items_rendered", "Cards rendered by the last applied run.");
        describe_histogram!("board_load_ms", "trends.json fetch + parse time in milliseconds.");

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
