//! Notifier configuration

/// Default number of pending messages per listener
pub const DEFAULT_BUFFER_CAPACITY: usize = 10;

/// Notifier configuration options
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Pending messages each listener may hold before new ones are dropped
    pub buffer_capacity: usize,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl NotifierConfig {
    /// Set the per-listener buffer capacity (minimum 1)
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity.max(1);
        self
    }
}
