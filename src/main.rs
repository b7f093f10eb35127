mod backends;
mod config;
mod core;
mod dispatcher;
mod languages;
mod runner;
mod server;
mod workspace;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use crate::backends::BackendContext;
use crate::config::ExecutorConfig;
use crate::dispatcher::Dispatcher;
use crate::runner::LocalRunner;
use crate::server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("coderunner=info".parse()?),
        )
        .init();

    info!("Starting Code Runner...");

    let config = ExecutorConfig::from_env()?;
    info!(
        "Executor config: run_timeout_ms={}, compile_timeout_ms={}",
        config.run_timeout.as_millis(),
        config.compile_timeout.as_millis()
    );

    // Load language configurations
    let languages_path = std::env::var("LANGUAGES_CONFIG").ok();
    let languages = languages::load_languages(languages_path.as_deref())?;
    info!(
        "Loaded language configurations from {}",
        languages_path.as_deref().unwrap_or("embedded table")
    );

    let ctx = BackendContext::from_config(&config, Arc::new(LocalRunner::new()));
    info!("Workspaces under {}", ctx.workspaces.root().display());

    let dispatcher = Dispatcher::from_table(&languages, &ctx);
    info!("Supported languages: {:?}", dispatcher.supported_languages());

    let app = server::router(AppState {
        dispatcher: Arc::new(dispatcher),
    });

    let listener = TcpListener::bind(config.bind_addr.as_str())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("HTTP server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Received shutdown signal");
        })
        .await
        .context("HTTP server error")?;

    info!("Code Runner shutdown complete");
    Ok(())
}
