//! Configuration for the terminal client.

use std::path::Path;

use serde::{Deserialize, Serialize};

use remcon_core::NetConfig;

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TermConfig {
    /// Console transport settings.
    pub console: NetConfig,
    /// Polling ticks per second driving the frame pump.
    pub tick_rate_hz: u64,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for TermConfig {
    fn default() -> Self {
        Self {
            console: NetConfig {
                role: "client".into(),
                ..NetConfig::default()
            },
            tick_rate_hz: 60,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".into() }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl TermConfig {
    /// Load configuration from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_role_is_client() {
        assert_eq!(TermConfig::default().console.role, "client");
    }

    #[test]
    fn roundtrip_config() {
        let cfg = TermConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed: TermConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.console.role, "client");
        assert_eq!(parsed.tick_rate_hz, 60);
    }
}
