use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use chat_companion::cli;
use chat_companion::config::{ChatConfig, RunMode};
use chat_companion::conversation::{SessionStore, spawn_prune_task};
use chat_companion::orchestrator::ResponseOrchestrator;
use chat_companion::web::{AppState, chat_routes};

const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ChatConfig::from_env()?;

    // Keep the guard alive so the file writer flushes on exit.
    let (file_layer, _log_guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "chat-companion.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    let orchestrator = Arc::new(
        ResponseOrchestrator::from_config(&config).context("Failed to load artifacts")?,
    );

    eprintln!("💬 Chat Companion v{}", env!("CARGO_PKG_VERSION"));

    match config.mode {
        RunMode::Cli => {
            eprintln!("   Type a message and press Enter. /history, /mood, /quit.\n");
            cli::run_repl(&orchestrator, config.max_history_turns).await
        }
        RunMode::Web => {
            let sessions = SessionStore::new(config.max_history_turns, config.session_idle_timeout);
            spawn_prune_task(Arc::clone(&sessions), PRUNE_INTERVAL);

            let addr = format!("{}:{}", config.bind_addr, config.port);
            eprintln!("   Chat page: http://{}/", addr);
            eprintln!("   Chat API: http://{}/api/message", addr);

            let app = chat_routes(AppState::new(orchestrator, sessions));
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {addr}"))?;
            tracing::info!(%addr, "Listening");
            axum::serve(listener, app).await.context("Server error")?;
            Ok(())
        }
    }
}
