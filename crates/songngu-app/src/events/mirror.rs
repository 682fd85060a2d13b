use std::path::PathBuf;
use std::time::Duration;

use kanal::AsyncSender;
use songngu_core::lookup::translate_notice;
use songngu_core::{AnnotateError, Workspace};
use songngu_types::AppEvent;

use crate::events::{inform, report};
use crate::state::{AppState, Services};

/// Translate the whole primary document into the mirror.
///
/// The mirror is only replaced by a complete, non-empty translation; on failure
/// it stays as it was, empty or holding the last full translation.
pub async fn translate_mirror(
    state: &AppState,
    services: &Services,
    workspace: &mut Workspace,
    app_to_console_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    if !workspace.has_document() {
        workspace.clear_mirror();
        return report(app_to_console_tx, "Translate", AnnotateError::NoDocument).await;
    }

    let Some(translator) = services.translator.as_deref() else {
        let reason = "no translator configured; set OPENAI_API_KEY or load a mirror file";
        return report(
            app_to_console_tx,
            "Translate",
            AnnotateError::LookupFailure(reason.to_string()),
        )
        .await;
    };

    let timeout = Duration::from_millis(state.config.read().await.translate_timeout_ms);
    inform(
        app_to_console_tx,
        "Translate",
        format!("Translating with {}...", translator.metadata().name),
    )
    .await?;

    let primary = workspace.primary().to_string();
    match tokio::time::timeout(timeout, translator.translate_document(&primary)).await {
        Ok(Ok(translation)) if !translation.text.trim().is_empty() => {
            tracing::info!(
                "Document translated {} -> {} by {}",
                translation.from,
                translation.to,
                translation.provider
            );
            workspace.set_mirror(translation.text);
            announce_located(workspace, app_to_console_tx).await
        }
        Ok(Ok(_)) => {
            let error = AnnotateError::LookupFailure("translation came back empty".to_string());
            report(app_to_console_tx, "Translate", error).await
        }
        Ok(Err(e)) => report(app_to_console_tx, "Translate", translate_notice(e)).await,
        Err(_) => {
            let error = AnnotateError::LookupFailure(format!(
                "translation timed out after {} ms",
                timeout.as_millis()
            ));
            report(app_to_console_tx, "Translate", error).await
        }
    }
}

pub async fn handle_load_mirror(
    workspace: &mut Workspace,
    path: PathBuf,
    app_to_console_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    if !workspace.has_document() {
        return report(app_to_console_tx, "Mirror", AnnotateError::NoDocument).await;
    }

    match tokio::fs::read_to_string(&path).await {
        Ok(text) => {
            workspace.set_mirror(text);
            announce_located(workspace, app_to_console_tx).await
        }
        Err(e) => report(app_to_console_tx, "Mirror", AnnotateError::Io(e)).await,
    }
}

async fn announce_located(
    workspace: &Workspace,
    app_to_console_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let located = workspace.store().mirror_spans().len();
    inform(
        app_to_console_tx,
        "Mirror",
        format!(
            "{} of {} entries located in the translation",
            located,
            workspace.store().len()
        ),
    )
    .await
}
