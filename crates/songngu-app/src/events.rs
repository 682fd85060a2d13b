use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender, Sender};
use songngu_core::reading::ReadingEvent;
use songngu_core::{AnnotateError, Workspace};
use songngu_types::{AppEvent, Notice};
use tokio_util::sync::CancellationToken;

use crate::state::{AppState, Services};

pub mod document;
pub mod entries;
pub mod mark;
pub mod mirror;
pub mod reading;
pub mod session;

use document::{handle_open, handle_show_documents};
use entries::{handle_delete, handle_font, handle_list};
use mark::handle_mark;
use mirror::{handle_load_mirror, translate_mirror};
use reading::{handle_reading_event, handle_start_reading, handle_stop, handle_toggle_pause};
use session::{handle_export, handle_load_session, handle_save_session};

/// App's main loop; the only owner of the workspace
pub async fn event_loop(
    state: Arc<AppState>,
    services: Services,
    console_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_console_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut workspace = {
        let config = state.config.read().await;
        Workspace::new(
            services.sentences.clone(),
            config.reader.font_size,
            &config.reader.theme,
        )
    };

    // Reading workers are plain threads, so they get the sync half
    let (reading_tx, reading_rx) = kanal::unbounded::<ReadingEvent>();
    let reading_rx = reading_rx.to_async();

    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("[EVENT_LOOP] Cancelled");
                break;
            }
            event = reading_rx.recv() => {
                handle_reading_event(&mut workspace, event?, &app_to_console_tx).await?;
            }
            event = console_to_app_rx.recv() => {
                let event = event?;
                if matches!(event, AppEvent::Shutdown) {
                    tracing::info!("[EVENT_LOOP] Shutdown requested");
                    break;
                }
                tracing::debug!("[EVENT_LOOP] EVENT RECEIVED: {:?}", event);
                handle_events(
                    &state,
                    &services,
                    &mut workspace,
                    &reading_tx,
                    &app_to_console_tx,
                    event,
                )
                .await?;
            }
        }
    }

    workspace.stop_reading();
    Ok(())
}

async fn handle_events(
    state: &AppState,
    services: &Services,
    workspace: &mut Workspace,
    reading_tx: &Sender<ReadingEvent>,
    app_to_console_tx: &AsyncSender<AppEvent>,
    event: AppEvent,
) -> anyhow::Result<()> {
    match event {
        AppEvent::OpenDocument(path) => {
            handle_open(workspace, path, app_to_console_tx).await?;
        }
        AppEvent::MarkSelection { start, end } => {
            handle_mark(state, services, workspace, start, end, app_to_console_tx).await?;
        }
        AppEvent::DeleteEntry { ordinal } => {
            handle_delete(workspace, ordinal, app_to_console_tx).await?;
        }
        AppEvent::TranslateMirror => {
            translate_mirror(state, services, workspace, app_to_console_tx).await?;
        }
        AppEvent::LoadMirror(path) => {
            handle_load_mirror(workspace, path, app_to_console_tx).await?;
        }
        AppEvent::ChangeFont(size) => {
            handle_font(workspace, size, app_to_console_tx).await?;
        }
        AppEvent::SaveSession(path) => {
            handle_save_session(workspace, path, app_to_console_tx).await?;
        }
        AppEvent::LoadSession(path) => {
            handle_load_session(workspace, path, app_to_console_tx).await?;
        }
        AppEvent::Export(path) => {
            handle_export(workspace, path, app_to_console_tx).await?;
        }
        AppEvent::StartReading(mode) => {
            handle_start_reading(state, services, workspace, mode, reading_tx, app_to_console_tx)
                .await?;
        }
        AppEvent::TogglePause => {
            handle_toggle_pause(workspace, app_to_console_tx).await?;
        }
        AppEvent::StopReading => {
            handle_stop(workspace, app_to_console_tx).await?;
        }
        AppEvent::ListEntries => {
            handle_list(workspace, app_to_console_tx).await?;
        }
        AppEvent::ShowDocuments => {
            handle_show_documents(workspace, app_to_console_tx).await?;
        }
        AppEvent::ShowSummary(_)
        | AppEvent::ShowText { .. }
        | AppEvent::ReadingStatus { .. }
        | AppEvent::Notice(_)
        | AppEvent::Shutdown => {
            // Console-only events, ignore in backend
        }
    }

    Ok(())
}

/// Surface an operation failure: warnings for recoverable ones, errors otherwise
pub async fn report(
    app_to_console_tx: &AsyncSender<AppEvent>,
    title: &str,
    error: AnnotateError,
) -> anyhow::Result<()> {
    let notice = if error.is_warning() {
        tracing::warn!("{}: {}", title, error);
        Notice::warning(title, error.to_string())
    } else {
        tracing::error!("{}: {}", title, error);
        Notice::error(title, error.to_string())
    };
    app_to_console_tx.send(AppEvent::Notice(notice)).await?;
    Ok(())
}

pub async fn inform(
    app_to_console_tx: &AsyncSender<AppEvent>,
    title: &str,
    message: String,
) -> anyhow::Result<()> {
    tracing::info!("{}: {}", title, message);
    app_to_console_tx
        .send(AppEvent::Notice(Notice::info(title, message)))
        .await?;
    Ok(())
}
