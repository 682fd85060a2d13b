use kanal::{AsyncSender, Sender};
use songngu_core::Workspace;
use songngu_core::position::slice;
use songngu_core::reading::{ReadingEvent, ReadingState, ReadingTimings, ReadingTransition};
use songngu_types::{AppEvent, Notice, ReadingMode};

use crate::events::report;
use crate::state::{AppState, Services};

pub async fn handle_start_reading(
    state: &AppState,
    services: &Services,
    workspace: &mut Workspace,
    mode: ReadingMode,
    reading_tx: &Sender<ReadingEvent>,
    app_to_console_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let timings = ReadingTimings::from(&state.config.read().await.reader);

    match workspace.start_reading(&mode, services.speech.clone(), timings, reading_tx.clone()) {
        Ok(session) => {
            tracing::debug!("Reading session {} for {:?}", session, mode);
            send_status(app_to_console_tx, "Started".to_string(), true).await
        }
        Err(e) => report(app_to_console_tx, "Read", e).await,
    }
}

pub async fn handle_toggle_pause(
    workspace: &mut Workspace,
    app_to_console_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let status = match workspace.toggle_pause() {
        ReadingState::Paused => "Paused",
        ReadingState::Reading => "Resumed",
        ReadingState::Idle => "Not reading",
    };
    let reading = workspace.reading_state() != ReadingState::Idle;
    send_status(app_to_console_tx, status.to_string(), reading).await
}

pub async fn handle_stop(
    workspace: &mut Workspace,
    app_to_console_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    workspace.stop_reading();
    send_status(app_to_console_tx, "Stopped".to_string(), false).await
}

/// Progress from the reading worker
pub async fn handle_reading_event(
    workspace: &mut Workspace,
    event: ReadingEvent,
    app_to_console_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    match workspace.on_reading_event(event) {
        ReadingTransition::Highlight(range) => {
            let text = slice(workspace.primary(), range).trim().to_string();
            send_status(app_to_console_tx, text, true).await
        }
        ReadingTransition::Clear => {
            send_status(app_to_console_tx, "Finished".to_string(), false).await
        }
        ReadingTransition::Failed(message) => {
            tracing::warn!("Reading segment failed: {}", message);
            app_to_console_tx
                .send(AppEvent::Notice(Notice::error("Read", message)))
                .await?;
            Ok(())
        }
        ReadingTransition::Ignored => {
            tracing::debug!("Stale reading event ignored");
            Ok(())
        }
    }
}

async fn send_status(
    app_to_console_tx: &AsyncSender<AppEvent>,
    status: String,
    reading: bool,
) -> anyhow::Result<()> {
    app_to_console_tx
        .send(AppEvent::ReadingStatus { status, reading })
        .await?;
    Ok(())
}
