//! Server configuration

use std::net::SocketAddr;
use std::time::Duration;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8080;

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// Interval between SSE keep-alive comments
    pub keep_alive_interval: Duration,

    /// Longest accepted poll question, in characters
    pub max_question_len: usize,

    /// Most options a single poll may have
    pub max_options: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            keep_alive_interval: Duration::from_secs(15),
            max_question_len: 500,
            max_options: 20,
        }
    }
}

impl ServerConfig {
    /// Create a new config with custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the SSE keep-alive interval
    pub fn keep_alive_interval(mut self, interval: Duration) -> Self {
        self.keep_alive_interval = interval;
        self
    }

    /// Set the maximum question length
    pub fn max_question_len(mut self, len: usize) -> Self {
        self.max_question_len = len;
        self
    }

    /// Set the maximum number of options (at least 2)
    pub fn max_options(mut self, max: usize) -> Self {
        self.max_options = max.max(2);
        self
    }
}
