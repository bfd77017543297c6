//! Render the board once and print the HTML page to stdout.
//!
//! ```text
//! render_once --url http://127.0.0.1:8000/ --niche Elektronik --sort title
//! render_once --file public/trends.json --q jacke > board.html
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use trend_board::api::ViewQuery;
use trend_board::page::render_page;
use trend_board::{telemetry, Board, BoardConfig, HttpTrendSource, RunOutcome, StaticTrendSource, TrendSource};

#[derive(Parser, Debug)]
#[command(name = "render_once", about = "Render the trend board once to stdout")]
struct Args {
    /// Base URL to fetch trends.json from (defaults to the configured data_url).
    #[arg(long, conflicts_with = "file")]
    url: Option<String>,
    /// Read the dataset from a local file instead of HTTP.
    #[arg(long)]
    file: Option<PathBuf>,
    /// Category; "alle" for every category.
    #[arg(long)]
    niche: Option<String>,
    /// Free-text search.
    #[arg(long)]
    q: Option<String>,
    /// score | title | niche | anything else for input order.
    #[arg(long)]
    sort: Option<String>,
    /// Log as JSON lines.
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    if args.json_logs {
        telemetry::init_json_tracing();
    } else {
        telemetry::init_tracing();
    }

    let mut config = match BoardConfig::load_default() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config error: {e:#}");
            return ExitCode::from(2);
        }
    };

    let source: Arc<dyn TrendSource> = match (&args.file, &args.url) {
        (Some(path), _) => Arc::new(StaticTrendSource::from_file(path.clone())),
        (None, url) => {
            if let Some(u) = url {
                config.data_url = u.clone();
            }
            match config.data_url() {
                Ok(base) => Arc::new(HttpTrendSource::new(base)),
                Err(e) => {
                    eprintln!("{e:#}");
                    return ExitCode::from(2);
                }
            }
        }
    };

    let view = ViewQuery {
        niche: args.niche,
        q: args.q,
        sort: args.sort,
    }
    .into_view(&config.default_sort);

    let board = Board::new(source);
    let report = board.dispatch(&view).await;
    let regions = board.regions().await;
    println!("{}", render_page(&config.categories, &view, &regions));

    match report.outcome {
        RunOutcome::Unavailable => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}
