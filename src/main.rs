//! Trend Board — Binary Entrypoint
//! Boots the Axum HTTP server with the board routes and static files.

use shuttle_axum::ShuttleAxum;
use trend_board::{telemetry, BoardConfig};

/// Local logs only when TREND_BOARD_DEV_LOG=1; Shuttle installs its own
/// subscriber otherwise.
fn enable_dev_tracing() {
    let dev_flag = std::env::var("TREND_BOARD_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");
    if dev_flag {
        telemetry::init_tracing();
    }
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    enable_dev_tracing();

    let config = BoardConfig::load_default()?;
    let router = trend_board::app(config)?;

    Ok(router.into())
}
