use serde::Deserialize;

/// Configuration for an engine instance.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Simulated seconds added to the clock on every tick.
    pub tick_seconds: f64,
    /// Maximum diagnostic log size (oldest entries dropped when exceeded). 0 = unlimited.
    pub max_diagnostics: usize,
    /// Only dispatch skills the caller is entitled to. Off by default, in which
    /// case any registered verb is dispatched regardless of the caller's skills.
    pub require_entitlement: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_seconds: 0.0625,
            max_diagnostics: 256,
            require_entitlement: false,
        }
    }
}

impl EngineConfig {
    /// Set the simulated seconds per tick.
    pub fn with_tick_seconds(mut self, seconds: f64) -> Self {
        self.tick_seconds = seconds;
        self
    }

    /// Set the diagnostic log capacity (0 = unlimited).
    pub fn with_max_diagnostics(mut self, max: usize) -> Self {
        self.max_diagnostics = max;
        self
    }

    /// Require callers to hold a skill before it is dispatched.
    pub fn with_require_entitlement(mut self, require: bool) -> Self {
        self.require_entitlement = require;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = EngineConfig::default();
        assert!((config.tick_seconds - 0.0625).abs() < f64::EPSILON);
        assert_eq!(config.max_diagnostics, 256);
        assert!(!config.require_entitlement);
    }

    #[test]
    fn config_builder_chain() {
        let config = EngineConfig::default()
            .with_tick_seconds(0.5)
            .with_max_diagnostics(10)
            .with_require_entitlement(true);
        assert!((config.tick_seconds - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.max_diagnostics, 10);
        assert!(config.require_entitlement);
    }

    #[test]
    fn config_from_partial_json() {
        let config: EngineConfig = serde_json::from_str(r#"{"tick_seconds": 1.0}"#).unwrap();
        assert!((config.tick_seconds - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.max_diagnostics, 256);
    }
}
