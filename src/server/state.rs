//! Shared handler state

use std::sync::Arc;

use tokio::sync::watch;

use super::config::ServerConfig;
use crate::notifier::Notifier;
use crate::repository::PollRepository;

/// State shared by every request handler
#[derive(Clone)]
pub struct AppState {
    /// Poll storage
    pub repository: Arc<PollRepository>,
    /// Live update fan-out
    pub notifier: Notifier,
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Flipped to `true` when event streams should end
    shutdown: Arc<watch::Sender<bool>>,
}

impl AppState {
    /// Create handler state around an existing repository and notifier
    pub fn new(repository: Arc<PollRepository>, notifier: Notifier, config: ServerConfig) -> Self {
        let (shutdown, _) = watch::channel(false);

        Self {
            repository,
            notifier,
            config: Arc::new(config),
            shutdown: Arc::new(shutdown),
        }
    }

    /// End every open event stream
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    /// Resolves once `shutdown` has been called
    pub fn shutdown_signal(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let mut rx = self.shutdown.subscribe();
        async move {
            let _ = rx.wait_for(|stopped| *stopped).await;
        }
    }
}
