//! arXiv Digest preview - Entry Point
//!
//! Loads the paper list and subscription status from a digest backend and
//! prints the rendered page to stdout.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use arxiv_digest::models::ListFilter;
use arxiv_digest::store::MemoryStore;
use arxiv_digest::{App, Config, UiEvent};

#[derive(Parser, Debug)]
#[command(name = "arxiv-digest-preview")]
#[command(about = "Render the arXiv digest page against a backend")]
#[command(version)]
struct Cli {
    /// Backend origin
    #[arg(long, env = "ARXIV_DIGEST_API_URL")]
    api_url: Option<String>,

    /// arXiv category to list
    #[arg(long, default_value = "cs.CV")]
    category: String,

    /// Number of papers (1-50)
    #[arg(long, default_value = "10")]
    max_results: u32,

    /// Bearer token; enables bookmarks, summaries and subscription status
    #[arg(long, env = "ARXIV_DIGEST_TOKEN")]
    token: Option<String>,

    /// Paper ids whose summaries should be expanded before rendering
    #[arg(long = "expand", value_name = "PAPER_ID")]
    expand: Vec<String>,

    /// Request timeout in seconds
    #[arg(long, env = "ARXIV_DIGEST_TIMEOUT_SECS")]
    timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    // stdout carries the page
    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr)).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    let mut config = Config::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_base_url = api_url;
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    config.default_filter = ListFilter::new(cli.category, cli.max_results);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        api = %config.api_base_url,
        category = %config.default_filter.category,
        "Starting arXiv digest preview"
    );

    let app = App::builder(config).store(Arc::new(MemoryStore::new())).build()?;

    if let Some(token) = cli.token {
        app.handle(UiEvent::Login { token }).await;
    } else {
        app.start().await;
    }

    for paper_id in cli.expand {
        app.handle(UiEvent::ToggleSummary { paper_id }).await;
    }

    println!("{}", app.render_page().await);
    Ok(())
}
