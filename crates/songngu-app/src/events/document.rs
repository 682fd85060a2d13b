use std::path::PathBuf;

use kanal::AsyncSender;
use songngu_core::{AnnotateError, Workspace};
use songngu_types::{AppEvent, DocumentRole};

use crate::console::annotate_text;
use crate::events::{inform, report};

pub async fn handle_open(
    workspace: &mut Workspace,
    path: PathBuf,
    app_to_console_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let text = match tokio::fs::read_to_string(&path).await {
        Ok(text) => text,
        Err(e) => return report(app_to_console_tx, "Open", AnnotateError::Io(e)).await,
    };

    workspace.open_document(text, Some(path.clone()));
    inform(
        app_to_console_tx,
        "Open",
        format!(
            "{} ({} paragraphs, {} sentences)",
            path.display(),
            workspace.segments().paragraphs().len(),
            workspace.segments().sentences().len()
        ),
    )
    .await
}

pub async fn handle_show_documents(
    workspace: &Workspace,
    app_to_console_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    if !workspace.has_document() {
        return report(app_to_console_tx, "Show", AnnotateError::NoDocument).await;
    }

    for (role, text) in [
        (DocumentRole::Primary, workspace.primary()),
        (DocumentRole::Mirror, workspace.mirror()),
    ] {
        let text = if text.trim().is_empty() {
            "(empty)".to_string()
        } else {
            annotate_text(text, workspace.overlay(role))
        };
        app_to_console_tx
            .send(AppEvent::ShowText { role, text })
            .await?;
    }

    Ok(())
}
