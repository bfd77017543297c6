// src/api.rs
//! HTTP surface. Every page or view request is one interaction: it
//! dispatches a board run with the control values carried in the query.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;

use crate::board::{Board, RunReport, ViewState};
use crate::config::BoardConfig;
use crate::filter::ALL_CATEGORIES;
use crate::page::render_page;
use crate::render::Regions;
use crate::sort::SortKey;

#[derive(Clone)]
pub struct AppState {
    pub board: Arc<Board>,
    pub config: Arc<BoardConfig>,
}

impl AppState {
    pub fn new(board: Board, config: BoardConfig) -> Self {
        Self {
            board: Arc::new(board),
            config: Arc::new(config),
        }
    }
}

/// Router with `/`, `/api/view`, `/health` and the static directory as fallback.
pub fn router(state: AppState) -> Router {
    let statics = ServeDir::new(&state.config.static_dir);
    Router::new()
        .route("/", get(page))
        .route("/api/view", get(view))
        .route("/health", get(|| async { "ok" }))
        .fallback_service(statics)
        .with_state(state)
}

/// Control values as they arrive from the form.
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub niche: Option<String>,
    pub q: Option<String>,
    pub sort: Option<String>,
}

impl ViewQuery {
    pub fn into_view(self, default_sort: &SortKey) -> ViewState {
        ViewState {
            category: self
                .niche
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| ALL_CATEGORIES.to_string()),
            query: self.q.unwrap_or_default(),
            sort: self
                .sort
                .map(SortKey::from)
                .unwrap_or_else(|| default_sort.clone()),
        }
    }
}

async fn page(State(state): State<AppState>, Query(q): Query<ViewQuery>) -> Html<String> {
    let view = q.into_view(&state.config.default_sort);
    state.board.dispatch(&view).await;
    let regions = state.board.regions().await;
    Html(render_page(&state.config.categories, &view, &regions))
}

#[derive(Debug, Serialize)]
pub struct ViewResponse {
    #[serde(flatten)]
    pub report: RunReport,
    pub view: ViewState,
    #[serde(flatten)]
    pub regions: Regions,
}

async fn view(State(state): State<AppState>, Query(q): Query<ViewQuery>) -> Json<ViewResponse> {
    let view = q.into_view(&state.config.default_sort);
    let report = state.board.dispatch(&view).await;
    let regions = state.board.regions().await;
    Json(ViewResponse {
        report,
        view,
        regions,
    })
}
