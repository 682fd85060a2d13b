use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use songngu_types::AppEvent;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::console::console_loop;
use crate::events::event_loop;
use crate::state::{AppState, Services};

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_console: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub console_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            app_to_console: kanal::bounded_async(256),
            console_to_app: kanal::bounded_async(64),
        }
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn spawn_tasks(&self, services: Services) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        // Event loop; owns the workspace
        tasks.spawn(event_loop(
            self.state.clone(),
            services,
            self.channels.console_to_app.1.clone(),
            self.channels.app_to_console.0.clone(),
            self.cancel_token.child_token(),
        ));

        // Console loop
        tasks.spawn(console_loop(
            self.channels.app_to_console.1.clone(),
            self.channels.console_to_app.0.clone(),
            self.cancel_token.child_token(),
        ));

        tasks
    }

    /// Queue an event as if it had been typed
    pub async fn send(&self, event: AppEvent) -> anyhow::Result<()> {
        self.channels.console_to_app.0.send(event).await?;
        Ok(())
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
