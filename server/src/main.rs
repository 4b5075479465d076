//! Server entrypoint for quizcast
//!
//! This is the main binary that wires together all layers using
//! dependency injection: configuration → storage backend → change
//! notifier → HTTP router.

use anyhow::{Context, Result, bail};
use clap::Parser;
use quizcast_application::{ChangeNotifier, QuestionStore};
use quizcast_infrastructure::{
    ConfigLoader, FileConfig, FileQuestionStore, MemoryQuestionStore, SqliteQuestionStore,
    StoreBackend,
};
use quizcast_presentation::{AdminGate, AppState, router};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quizcast", about = "Quiz server with live question-set updates")]
struct Cli {
    /// Explicit config file (highest-priority file source)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip config discovery and use built-in defaults
    #[arg(long)]
    no_config: bool,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the storage backend (file, memory, sqlite)
    #[arg(short, long)]
    backend: Option<String>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("loading configuration")?
    };
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(backend) = &cli.backend {
        config.store.backend = match backend.parse() {
            Ok(b) => b,
            Err(e) => bail!("{e}"),
        };
    }

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    // The appender guard must outlive the server loop.
    let _log_guard = match &config.log.file {
        Some(path) => {
            let directory = path.parent().filter(|p| !p.as_os_str().is_empty());
            let file_name = path
                .file_name()
                .context("log file path has no file name")?;
            let appender = tracing_appender::rolling::never(
                directory.unwrap_or_else(|| std::path::Path::new(".")),
                file_name,
            );
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .init();
            None
        }
    };

    info!("Starting quizcast");

    // === Dependency Injection ===
    let store = build_store(&config).await?;
    let notifier = Arc::new(ChangeNotifier::new(store.current_version().await?));
    let gate = AdminGate::new(config.admin.password.clone(), config.admin.token.clone());
    let state = AppState::new(
        store,
        notifier,
        gate,
        Duration::from_secs(config.server.heartbeat_secs),
    );
    let app = router(state);

    let addr = (config.server.host.as_str(), config.server.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}:{}", config.server.host, config.server.port))?;
    info!(
        host = %config.server.host,
        port = config.server.port,
        backend = ?config.store.backend,
        "listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving")?;

    info!("Shut down cleanly");
    Ok(())
}

/// Construct the configured storage backend.
async fn build_store(config: &FileConfig) -> Result<Arc<dyn QuestionStore>> {
    let store: Arc<dyn QuestionStore> = match config.store.backend {
        StoreBackend::File => Arc::new(
            FileQuestionStore::open_with_retry(
                config.store.questions_file(),
                config.store.write_retries,
                Duration::from_millis(config.store.retry_backoff_ms),
            )
            .await?,
        ),
        // Memory mode seeds once from the durable snapshot when present.
        StoreBackend::Memory => {
            Arc::new(MemoryQuestionStore::seeded_from(config.store.questions_file()).await)
        }
        StoreBackend::Sqlite => {
            Arc::new(SqliteQuestionStore::open(config.store.database_file()).await?)
        }
    };
    Ok(store)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
    }
}
