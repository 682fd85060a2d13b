use std::path::PathBuf;

use kanal::AsyncSender;
use songngu_core::Workspace;
use songngu_core::session::Session;
use songngu_types::AppEvent;

use crate::events::{inform, report};

pub async fn handle_save_session(
    workspace: &Workspace,
    path: PathBuf,
    app_to_console_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    match workspace.session().save(&path) {
        Ok(()) => {
            inform(
                app_to_console_tx,
                "Save",
                format!("{} entries saved to {}", workspace.store().len(), path.display()),
            )
            .await
        }
        Err(e) => report(app_to_console_tx, "Save", e).await,
    }
}

pub async fn handle_load_session(
    workspace: &mut Workspace,
    path: PathBuf,
    app_to_console_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let session = match Session::load(&path) {
        Ok(session) => session,
        Err(e) => return report(app_to_console_tx, "Load", e).await,
    };

    let saved = session.entries.len();
    workspace.restore(session);
    let restored = workspace.store().len();
    let message = if restored == saved {
        format!("{} entries restored from {}", restored, path.display())
    } else {
        format!(
            "{} of {} entries restored from {}",
            restored,
            saved,
            path.display()
        )
    };
    inform(app_to_console_tx, "Load", message).await
}

pub async fn handle_export(
    workspace: &Workspace,
    path: PathBuf,
    app_to_console_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    match workspace.export(&path) {
        Ok(rows) => {
            inform(
                app_to_console_tx,
                "Export",
                format!("{} rows written to {}", rows, path.display()),
            )
            .await
        }
        Err(e) => report(app_to_console_tx, "Export", e).await,
    }
}
