//! Runner configuration, loadable from a JSON file

use nonstop_engine::config::{FEEDER_PARAM_NAME, SYMBOLS_PARAM_NAME, TIMEOUT_PARAM_NAME};
use nonstop_ports::PluginParam;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),
}

/// A quoted instrument and where its price walk starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolConfig {
    pub name: String,
    pub digits: u32,
    pub bid: f64,
    /// Spread in points
    pub spread: u32,
}

impl SymbolConfig {
    pub fn new(name: impl Into<String>, digits: u32, bid: f64, spread: u32) -> Self {
        Self {
            name: name.into(),
            digits,
            bid,
            spread,
        }
    }
}

/// Window of simulated seconds during which the primary feed is silent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outage {
    /// Seconds after the run starts
    pub start: i64,
    pub duration: i64,
}

impl Outage {
    pub fn contains(&self, elapsed: i64) -> bool {
        elapsed >= self.start && elapsed < self.start + self.duration
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub plugin_name: String,
    pub primary_feed: String,
    /// Feed that keeps quoting through outages; its ticks never count
    pub backup_feed: String,
    /// Raw staleness timeout parameter (seconds)
    pub timeout: i64,
    /// History server feed failover timeout (seconds)
    pub failover_timeout: i64,
    pub symbols: Vec<SymbolConfig>,
    /// Largest random walk move per quote, in points
    pub volatility: i64,
    /// Chance that a symbol quotes in a given simulated second
    pub quote_probability: f64,
    pub outages: Vec<Outage>,
    /// Length of the run in simulated seconds
    pub duration: i64,
    /// Wall-clock milliseconds per simulated second
    pub step_ms: u64,
    pub seed: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            plugin_name: "Nonstop Rate".to_string(),
            primary_feed: "FeedA".to_string(),
            backup_feed: "FeedB".to_string(),
            timeout: 30,
            failover_timeout: 60,
            symbols: vec![
                SymbolConfig::new("EURUSD", 5, 1.08500, 20),
                SymbolConfig::new("GBPUSD", 5, 1.26500, 25),
                SymbolConfig::new("USDJPY", 3, 151.250, 15),
            ],
            volatility: 3,
            quote_probability: 0.8,
            // Bridged gap, then one long enough for the server to fail over
            outages: vec![
                Outage {
                    start: 20,
                    duration: 45,
                },
                Outage {
                    start: 90,
                    duration: 90,
                },
            ],
            duration: 200,
            step_ms: 100,
            seed: None,
        }
    }
}

impl RunnerConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn in_outage(&self, elapsed: i64) -> bool {
        self.outages.iter().any(|outage| outage.contains(elapsed))
    }

    /// Plugin parameter list as the host would store it
    pub fn plugin_params(&self) -> Vec<PluginParam> {
        let symbols = self
            .symbols
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(",");

        vec![
            PluginParam::int(TIMEOUT_PARAM_NAME, self.timeout),
            PluginParam::new(FEEDER_PARAM_NAME, self.primary_feed.clone()),
            PluginParam::new(SYMBOLS_PARAM_NAME, symbols),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = RunnerConfig::from_json(r#"{ "timeout": 10, "seed": 3 }"#).unwrap();

        assert_eq!(config.timeout, 10);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.primary_feed, "FeedA");
        assert_eq!(config.symbols.len(), 3);
    }

    #[test]
    fn test_bad_json_is_reported() {
        let err = RunnerConfig::from_json("{ timeout: }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = RunnerConfig::from_file("/nonexistent/runner.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_outage_windows() {
        let config = RunnerConfig::default();

        assert!(!config.in_outage(19));
        assert!(config.in_outage(20));
        assert!(config.in_outage(64));
        assert!(!config.in_outage(65));
        assert!(config.in_outage(179));
        assert!(!config.in_outage(180));
    }

    #[test]
    fn test_plugin_params() {
        let params = RunnerConfig::default().plugin_params();

        assert_eq!(params[0].value_int(), 30);
        assert_eq!(params[1].value, "FeedA");
        assert_eq!(params[2].value, "EURUSD,GBPUSD,USDJPY");
    }
}
