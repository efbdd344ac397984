//! reframe-api - Main entry point
//!
//! Coaching backend: problem analysis sessions, journaling with reflection,
//! history and daily nudges, backed by SQLite and the Gemini API.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use reframe_api::api::attach_static_assets;
use reframe_api::coach::{Coach, GeminiClient};
use reframe_api::db::{MemoryStorage, SqliteStorage, Storage};
use reframe_api::{build_router, AppState, AuthSettings};
use reframe_common::config::{
    default_config_path, load_toml_config, resolve_gemini_api_key, resolve_token_secret,
    RootFolderInitializer, RootFolderResolver, TomlConfig,
};
use reframe_common::db::init_database;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for reframe-api
#[derive(Parser, Debug)]
#[command(name = "reframe-api")]
#[command(about = "Personal growth coaching API")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides config file)
    #[arg(short, long, env = "REFRAME_PORT")]
    port: Option<u16>,

    /// Address to bind (overrides config file)
    #[arg(long, env = "REFRAME_HOST")]
    host: Option<String>,

    /// Root folder holding the database
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Path to TOML config file
    #[arg(short, long, env = "REFRAME_CONFIG")]
    config: Option<PathBuf>,

    /// Directory with the built web client
    #[arg(long, env = "REFRAME_STATIC_ASSETS")]
    static_assets: Option<PathBuf>,

    /// Keep everything in memory; nothing survives a restart
    #[arg(long)]
    memory: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match args.config.clone().or_else(default_config_path) {
        Some(path) => load_toml_config(&path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => TomlConfig::default(),
    };

    let _log_guard = init_tracing(&config)?;

    info!(
        "Starting reframe-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let storage: Arc<dyn Storage> = if args.memory {
        warn!("Using in-memory storage - data will be lost on shutdown");
        Arc::new(MemoryStorage::with_defaults())
    } else {
        let root_folder = RootFolderResolver::new("reframe-api")
            .with_cli_arg(args.root_folder.clone())
            .with_toml(&config)
            .resolve();

        let initializer = RootFolderInitializer::new(root_folder);
        initializer.ensure_directory_exists()?;

        let db_path = initializer.database_path();
        info!("Database path: {}", db_path.display());

        let pool = init_database(&db_path).await.map_err(|e| {
            error!("Failed to open database: {}", e);
            e
        })?;
        info!("✓ Database ready");
        Arc::new(SqliteStorage::new(pool))
    };

    let gemini = GeminiClient::new(&config.gemini, resolve_gemini_api_key(&config))
        .context("Failed to build Gemini client")?;
    if gemini.has_api_key() {
        info!("✓ Gemini client configured (model: {})", config.gemini.model);
    }
    let coach = Coach::new(Arc::new(gemini));

    let auth = match resolve_token_secret(&config) {
        Some(secret) => {
            info!("✓ Identity token verification enabled");
            AuthSettings::with_secret(
                secret,
                Duration::from_secs(config.auth.token_max_age_secs),
            )
        }
        None => {
            warn!("No token secret configured - all requests use the development user");
            AuthSettings::disabled()
        }
    };

    let state = AppState::new(storage, coach, auth);
    let mut app = build_router(state);

    if let Some(dir) = args.static_assets.or(config.static_assets) {
        app = attach_static_assets(app, &dir);
    }

    let host = args.host.unwrap_or(config.host);
    let port = args.port.unwrap_or(config.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("reframe-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize the tracing subscriber
///
/// `RUST_LOG` wins over the configured level. With a log file configured,
/// output goes through a non-blocking writer whose guard must stay alive.
fn init_tracing(config: &TomlConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "reframe_api={level},reframe_common={level},tower_http={level}",
            level = config.logging.level
        ))
    });

    match &config.logging.file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let file_name = path
                .file_name()
                .context("Log file path has no file name")?;

            std::fs::create_dir_all(&directory)
                .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
                .init();

            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();

            Ok(None)
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
