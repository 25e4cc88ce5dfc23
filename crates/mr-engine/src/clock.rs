/// Tracks simulated time: a monotonic tick counter and the accumulated
/// seconds that tick payloads carry.
#[derive(Debug, Clone)]
pub struct SimClock {
    tick: u64,
    seconds_per_tick: f64,
    accumulated: f64,
}

impl SimClock {
    /// Create a new clock starting at tick 0 with the given step.
    pub fn new(seconds_per_tick: f64) -> Self {
        Self {
            tick: 0,
            seconds_per_tick,
            accumulated: 0.0,
        }
    }

    /// Advance the clock by one step. Returns the new accumulated time.
    pub fn advance(&mut self) -> f64 {
        self.tick += 1;
        self.accumulated += self.seconds_per_tick;
        self.accumulated
    }

    /// Return the current tick number.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Total simulated seconds since the clock started.
    pub fn time(&self) -> f64 {
        self.accumulated
    }

    /// Return the configured step.
    pub fn seconds_per_tick(&self) -> f64 {
        self.seconds_per_tick
    }
}
