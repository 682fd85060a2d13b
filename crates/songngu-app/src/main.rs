use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use songngu_config::Config;
use songngu_types::AppEvent;

pub mod console;
pub mod controller;
pub mod events;
pub mod logger;
pub mod speech;
pub mod state;


use self::controller::AppController;
use self::state::{AppState, Services};

#[derive(Parser)]
#[command(name = "songngu")]
#[command(about = "Mark vocabulary in a text and keep it in sync with its translation")]
struct Args {
    /// JSON config file; defaults plus environment overrides when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Text document to open on start
    #[arg(short, long)]
    open: Option<PathBuf>,

    /// Saved session to restore on start
    #[arg(short, long, conflicts_with = "open")]
    session: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logger::init_logger();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::new(),
    };

    let services = Services::from_config(&config);
    let state = Arc::new(AppState::new(config));
    let controller = AppController::new(state);
    let mut tasks = controller.spawn_tasks(services);

    let startup = match (args.open, args.session) {
        (Some(path), _) => Some(AppEvent::OpenDocument(path)),
        (None, Some(path)) => Some(AppEvent::LoadSession(path)),
        (None, None) => None,
    };
    if let Some(event) = startup {
        controller.send(event).await?;
    }

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::info!("Task finished, shutting down"),
                Ok(Err(e)) => tracing::error!("Task failed: {e:#}"),
                Err(e) => tracing::error!("Task panicked: {e}"),
            }
        }
    }

    controller.shutdown();
    while let Some(result) = tasks.join_next().await {
        if let Ok(Err(e)) = result {
            tracing::warn!("Task exited with error during shutdown: {e:#}");
        }
    }

    Ok(())
}
