// src/board.rs
//! The board: load → filter → sort → render, run once per interaction.
//!
//! The board owns the three output regions. A successful run replaces all of
//! them; a failed load only overwrites the status line. Runs may overlap;
//! each takes a sequence number when dispatched and a run that finishes
//! after a later-dispatched run has been applied is discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Local;
use metrics::{counter, gauge};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::filter::{filter_items, ALL_CATEGORIES};
use crate::loader::TrendSource;
use crate::render::{render, Regions};
use crate::sort::{sort_items, SortKey};

/// Status line shown whenever the data cannot be loaded.
pub const UNAVAILABLE_MESSAGE: &str =
    "trends.json noch nicht vorhanden – die GitHub Action erzeugt sie beim ersten Lauf.";

/// Snapshot of the interactive controls, taken when a run is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub category: String,
    pub query: String,
    pub sort: SortKey,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            category: ALL_CATEGORIES.to_string(),
            query: String::new(),
            sort: SortKey::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Regions replaced; `items` cards rendered.
    Rendered { items: usize },
    /// Load failed; only the status line changed.
    Unavailable,
    /// A later run was applied first; nothing changed.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub seq: u64,
    pub outcome: RunOutcome,
}

struct Applied {
    seq: u64,
    regions: Regions,
}

pub struct Board {
    source: Arc<dyn TrendSource>,
    applied: RwLock<Applied>,
    next_seq: AtomicU64,
}

impl Board {
    pub fn new(source: Arc<dyn TrendSource>) -> Self {
        Self {
            source,
            applied: RwLock::new(Applied {
                seq: 0,
                regions: Regions::default(),
            }),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Run the pipeline once for `view`.
    pub async fn dispatch(&self, view: &ViewState) -> RunReport {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        counter!("board_runs_total").increment(1);

        let rendered = self.source.load().await.map(|dataset| {
            let filtered = filter_items(&dataset.items, &view.category, &view.query);
            let sorted = sort_items(&filtered, &view.sort);
            (sorted.len(), render(&dataset, &sorted, Local::now()))
        });

        let mut applied = self.applied.write().await;
        if seq < applied.seq {
            counter!("board_runs_superseded_total").increment(1);
            debug!(target: "board", seq, applied = applied.seq, "stale run discarded");
            return RunReport {
                seq,
                outcome: RunOutcome::Superseded,
            };
        }
        applied.seq = seq;

        let outcome = match rendered {
            Ok((count, regions)) => {
                applied.regions = regions;
                gauge!("board_items_rendered").set(count as f64);
                info!(
                    target: "board",
                    seq,
                    items = count,
                    category = %view.category,
                    sort = view.sort.as_str(),
                    "board rendered"
                );
                RunOutcome::Rendered { items: count }
            }
            Err(e) => {
                counter!("board_load_failures_total").increment(1);
                warn!(target: "board", seq, source = self.source.name(), error = %e, "trends unavailable");
                applied.regions.status = UNAVAILABLE_MESSAGE.to_string();
                RunOutcome::Unavailable
            }
        };
        RunReport { seq, outcome }
    }

    /// Current content of the output regions.
    pub async fn regions(&self) -> Regions {
        self.applied.read().await.regions.clone()
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoadError;
    use crate::model::TrendDataset;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    /// One scripted answer per `load()`, optionally held until a gate opens.
    struct Scripted {
        steps: Mutex<VecDeque<Step>>,
    }

    struct Step {
        gate: Option<oneshot::Receiver<()>>,
        answer: Result<&'static str, u16>,
    }

    impl Scripted {
        fn new(steps: Vec<Step>) -> Arc<Self> {
            Arc::new(Self {
                steps: Mutex::new(steps.into()),
            })
        }
    }

    fn ok(body: &'static str) -> Step {
        Step { gate: None, answer: Ok(body) }
    }

    fn status(code: u16) -> Step {
        Step { gate: None, answer: Err(code) }
    }

    #[async_trait]
    impl TrendSource for Scripted {
        async fn load(&self) -> Result<TrendDataset, LoadError> {
            let step = self.steps.lock().unwrap().pop_front().expect("script exhausted");
            if let Some(gate) = step.gate {
                let _ = gate.await;
            }
            match step.answer {
                Ok(body) => TrendDataset::from_slice(body.as_bytes()).map_err(|source| {
                    LoadError::Parse {
                        origin: "script".into(),
                        source,
                    }
                }),
                Err(code) => Err(LoadError::Status {
                    url: "script".into(),
                    status: code,
                }),
            }
        }

        fn name(&self) -> &str {
            "script"
        }
    }

    const TWO: &str = r#"{"source":{"google":true},"items":[
        {"title":"low","niche":"a","score":10},
        {"title":"high","niche":"b","score":90}]}"#;

    #[tokio::test]
    async fn renders_sorted_cards() {
        let board = Board::new(Scripted::new(vec![ok(TWO)]));
        let report = board.dispatch(&ViewState::default()).await;
        assert_eq!(report.outcome, RunOutcome::Rendered { items: 2 });

        let r = board.regions().await;
        let high = r.items_html.find("<h3>high</h3>").unwrap();
        let low = r.items_html.find("<h3>low</h3>").unwrap();
        assert!(high < low);
        assert!(r.status.starts_with("2 Trends • geladen: "));
        assert_eq!(r.badges_html, r#"<span class="badge">Google</span>"#);
    }

    #[tokio::test]
    async fn view_state_drives_filter_and_sort() {
        let board = Board::new(Scripted::new(vec![ok(TWO)]));
        let view = ViewState {
            category: "a".into(),
            query: "LOW".into(),
            sort: SortKey::Title,
        };
        let report = board.dispatch(&view).await;
        assert_eq!(report.outcome, RunOutcome::Rendered { items: 1 });
        assert!(!board.regions().await.items_html.contains("high"));
    }

    #[tokio::test]
    async fn failure_keeps_cards_and_sets_message() {
        let board = Board::new(Scripted::new(vec![ok(TWO), status(404)]));
        board.dispatch(&ViewState::default()).await;
        let before = board.regions().await;

        let report = board.dispatch(&ViewState::default()).await;
        assert_eq!(report.outcome, RunOutcome::Unavailable);

        let after = board.regions().await;
        assert_eq!(after.items_html, before.items_html);
        assert_eq!(after.badges_html, before.badges_html);
        assert_eq!(after.status, UNAVAILABLE_MESSAGE);
    }

    #[tokio::test]
    async fn failure_before_any_success_only_sets_message() {
        let board = Board::new(Scripted::new(vec![status(500)]));
        board.dispatch(&ViewState::default()).await;
        let r = board.regions().await;
        assert_eq!(r.items_html, "");
        assert_eq!(r.status, UNAVAILABLE_MESSAGE);
    }

    #[tokio::test]
    async fn slower_earlier_run_is_discarded() {
        let (release, gate) = oneshot::channel();
        let board = Board::new(Scripted::new(vec![
            Step {
                gate: Some(gate),
                answer: Ok(r#"{"items":[{"title":"stale"}]}"#),
            },
            ok(r#"{"items":[{"title":"fresh"}]}"#),
        ]));

        let first_view = ViewState::default();
        let second_view = ViewState::default();
        let first = board.dispatch(&first_view);
        let second = async {
            let report = board.dispatch(&second_view).await;
            let _ = release.send(());
            report
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first.seq, 1);
        assert_eq!(first.outcome, RunOutcome::Superseded);
        assert_eq!(second.seq, 2);
        assert_eq!(second.outcome, RunOutcome::Rendered { items: 1 });
        let r = board.regions().await;
        assert!(r.items_html.contains("fresh"));
        assert!(!r.items_html.contains("stale"));
    }
}
