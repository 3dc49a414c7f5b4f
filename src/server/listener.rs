//! HTTP server listener
//!
//! Binds the socket and serves the router until shut down.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::error::Result;
use crate::notifier::{Notifier, NotifierConfig};
use crate::repository::PollRepository;
use crate::server::config::ServerConfig;
use crate::server::routes::router;
use crate::server::state::AppState;

/// Poll server
pub struct PollServer {
    config: ServerConfig,
    repository: Arc<PollRepository>,
    notifier: Notifier,
}

impl PollServer {
    /// Create a new server with the given configuration
    pub fn new(config: ServerConfig) -> Self {
        Self::with_notifier_config(config, NotifierConfig::default())
    }

    /// Create a new server with custom notifier configuration
    pub fn with_notifier_config(config: ServerConfig, notifier_config: NotifierConfig) -> Self {
        Self {
            config,
            repository: Arc::new(PollRepository::new()),
            notifier: Notifier::with_config(notifier_config),
        }
    }

    /// Get a reference to the poll repository
    pub fn repository(&self) -> &Arc<PollRepository> {
        &self.repository
    }

    /// Get a reference to the notifier
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Get the bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }

    /// Run the server
    ///
    /// Serves until the process exits. Only a failed bind returns an error;
    /// accept errors on the listening socket are retried.
    pub async fn run(&self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Run the server with graceful shutdown
    ///
    /// When `shutdown` resolves, open event streams are ended so that
    /// in-flight connections can drain.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "Poll server listening");

        let state = AppState::new(
            Arc::clone(&self.repository),
            self.notifier.clone(),
            self.config.clone(),
        );
        let app = router(state.clone());

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("Shutdown signal received");
                state.shutdown();
            })
            .await?;

        tracing::info!("Poll server stopped");
        Ok(())
    }
}
