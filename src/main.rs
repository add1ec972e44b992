mod api;
mod config;
mod messages;
mod model;
mod routes;
mod services;
mod state;
mod view;

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::ApiError;
use crate::api::http::HttpBubbleApi;
use crate::config::{ConfigError, DEFAULT_BASE_URL, DEFAULT_CLIENT_TIMEOUT_SECS, ServerConfig};
use crate::services::search::{DuckDuckGoSearch, SearchError};
use crate::services::store::{BubbleStore, StoreError};
use crate::view::{BubbleView, Outcome, text};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Rejected(&'static str),
    #[error("request failed")]
    Failed,
}

#[derive(Parser, Debug)]
#[command(name = "bubbles", about = "Record ideas as bubbles and collect resources for them")]
struct Cli {
    /// Server address used by the client commands.
    #[arg(long, global = true, env = "BUBBLES_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout for the client commands, in seconds.
    #[arg(long, global = true, env = "BUBBLES_CLIENT_TIMEOUT_SECS", default_value_t = DEFAULT_CLIENT_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Print every bubble.
    List,
    /// Create a bubble.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        idea: String,
    },
    /// Search for resources and attach them to a bubble.
    Fetch {
        id: i64,
        #[arg(required = true)]
        query: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let command = cli.command.clone().unwrap_or(Command::Serve);
    init_tracing(if command == Command::Serve { "info" } else { "warn" });

    let result = match command {
        Command::Serve => serve().await,
        other => run_client(&cli, other).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Failed) => ExitCode::FAILURE,
        Err(e) => {
            error!(error = %e, "bubbles failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// =============================================================================
// SERVER
// =============================================================================

async fn serve() -> Result<(), CliError> {
    let config = ServerConfig::from_env()?;
    let messages = config.lang.messages();

    let store = BubbleStore::open(config.data_file.clone()).await?;
    let search = DuckDuckGoSearch::new(&config.search, messages)?;
    let data_file = store.path().display().to_string();
    let state = state::AppState::new(store, Arc::new(search), messages);

    let addr = SocketAddr::new(config.bind, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, %data_file, lang = ?messages.lang, "bubbles listening");

    axum::serve(listener, routes::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("bubbles stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

// =============================================================================
// CLIENT
// =============================================================================

async fn run_client(cli: &Cli, command: Command) -> Result<(), CliError> {
    let lang = config::lang_from_env()?;
    let api = HttpBubbleApi::new(&cli.base_url, Duration::from_secs(cli.timeout_secs))?;
    let view = BubbleView::new(Arc::new(api), lang.messages());
    let messages = view.messages();

    let (outcome, only) = match command {
        Command::Serve | Command::List => (view.load().await, None),
        Command::Create { title, idea } => {
            view.set_field("title", title);
            view.set_field("idea", idea);
            (view.submit_create().await, None)
        }
        Command::Fetch { id, query } => {
            let query = query.join(" ");
            if query.trim().is_empty() {
                return Err(CliError::Rejected(messages.query_required));
            }
            if view.load().await == Outcome::Failed {
                (Outcome::Failed, None)
            } else if view.card(id).is_none() {
                return Err(CliError::Rejected(messages.bubble_not_found));
            } else {
                (view.submit_query(id, &query).await, Some(id))
            }
        }
    };

    let page = view.snapshot();
    if page.toast.visible {
        eprintln!("{}", page.toast.message);
    }
    match only.and_then(|id| page.list.card(id)) {
        Some(card) => print!("{}", text::render_card(card, messages)),
        None if outcome != Outcome::Failed => print!("{}", text::render_list(&page.list, messages)),
        None => {}
    }

    if outcome == Outcome::Failed { Err(CliError::Failed) } else { Ok(()) }
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
