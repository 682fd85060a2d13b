use kanal::AsyncSender;
use songngu_core::Workspace;
use songngu_core::lookup::{Collaborators, LookupTimeouts, resolve_word_info};
use songngu_types::{AppEvent, Position};

use crate::events::mirror::translate_mirror;
use crate::events::{inform, report};
use crate::state::{AppState, Services};

pub async fn handle_mark(
    state: &AppState,
    services: &Services,
    workspace: &mut Workspace,
    start: Position,
    end: Position,
    app_to_console_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let selection = match workspace.prepare_mark(start, end) {
        Ok(selection) => selection,
        Err(e) => return report(app_to_console_tx, "Mark", e).await,
    };

    let info = match workspace.cached_info(&selection) {
        Some(info) => {
            tracing::debug!("Word info for '{}' from cache", selection.surface);
            info
        }
        None => {
            let timeouts = {
                let config = state.config.read().await;
                LookupTimeouts::from(&*config)
            };
            let collaborators = Collaborators {
                language: services.language.as_ref(),
                dictionary: services.dictionary.as_deref(),
                translator: services.translator.as_deref(),
            };

            let resolved = resolve_word_info(
                &selection.surface,
                &selection.paragraph,
                collaborators,
                timeouts,
            )
            .await;

            // Degraded results are not cached so the next mark retries the services
            if resolved.notices.is_empty() {
                workspace.cache_info(&selection, resolved.info.clone());
            }
            for notice in resolved.notices {
                report(app_to_console_tx, "Lookup", notice).await?;
            }
            resolved.info
        }
    };

    let surface = selection.surface.clone();
    let meaning = info.meaning.clone();
    let (key, ordinal) = workspace.commit_mark(selection, info);
    inform(
        app_to_console_tx,
        "Mark",
        format!("#{} {} = {} ({})", ordinal, surface, meaning, key),
    )
    .await?;

    if workspace.needs_mirror() && services.translator.is_some() {
        translate_mirror(state, services, workspace, app_to_console_tx).await?;
    }

    Ok(())
}
