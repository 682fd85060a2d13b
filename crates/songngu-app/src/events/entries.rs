use kanal::AsyncSender;
use songngu_core::Workspace;
use songngu_types::AppEvent;

use crate::events::{inform, report};

pub async fn handle_delete(
    workspace: &mut Workspace,
    ordinal: usize,
    app_to_console_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    match workspace.delete_ordinal(ordinal) {
        Ok(entry) => {
            inform(
                app_to_console_tx,
                "Delete",
                format!("#{} {} removed", ordinal, entry.display_form),
            )
            .await
        }
        Err(e) => report(app_to_console_tx, "Delete", e).await,
    }
}

pub async fn handle_font(
    workspace: &mut Workspace,
    size: u16,
    app_to_console_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let applied = workspace.set_font_size(size);
    let message = if applied == size {
        format!("Font size {}", applied)
    } else {
        format!("Font size {} (clamped from {})", applied, size)
    };
    inform(app_to_console_tx, "Font", message).await
}

pub async fn handle_list(
    workspace: &Workspace,
    app_to_console_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    app_to_console_tx
        .send(AppEvent::ShowSummary(workspace.summary()))
        .await?;
    Ok(())
}
