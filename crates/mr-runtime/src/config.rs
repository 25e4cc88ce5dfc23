use std::time::Duration;

/// Configuration for the runtime loop.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Wall-clock delay between ticks.
    pub tick_interval: Duration,
    /// Capacity of the inbound request queue shared by all clients.
    pub inbound_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(500),
            inbound_capacity: 256,
        }
    }
}

impl RuntimeConfig {
    /// Set the delay between ticks.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Set the inbound queue capacity.
    pub fn with_inbound_capacity(mut self, capacity: usize) -> Self {
        self.inbound_capacity = capacity;
        self
    }
}
