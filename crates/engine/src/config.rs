//! Plugin configuration and its reconciliation from host parameters
//!
//! The configuration is an immutable snapshot. Every reload builds a new
//! [`PluginConfig`] from the previous one plus the host's parameter list, and
//! the engine publishes it atomically; readers always see one complete
//! version.

use nonstop_core::{Symbol, text};
use nonstop_ports::PluginParam;
use std::collections::BTreeSet;

/// Parameter holding the staleness timeout in seconds
pub const TIMEOUT_PARAM_NAME: &str = "01.Timeout(seconds)";

/// Parameter holding the primary feed name
pub const FEEDER_PARAM_NAME: &str = "02.Feeder";

/// First symbol list parameter. The management UI limits a value to 260
/// characters, so longer lists continue in `04.Symbols`, `05.Symbols`, ...
pub const SYMBOLS_PARAM_NAME: &str = "03.Symbols";

const SYMBOLS_SUFFIX: &str = ".Symbols";

/// Timeout used when the parameter is missing a usable value (seconds)
pub const DEFAULT_TIMEOUT: i64 = 30;

/// Estimated time between deciding to synthesize and the tick reaching the
/// stream (seconds)
pub const PROCESSING_LATENCY: i64 = 2;

/// Failover timeout assumed until the server configuration has been read.
/// Zero means every symbol counts as failed over, so nothing is synthesized.
pub const DEFAULT_FAILOVER_TIMEOUT: i64 = 0;

/// Static description of the plugin, as reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginInfo {
    pub version: u32,
    pub name: &'static str,
    pub copyright: &'static str,
    pub description: &'static str,
}

pub const PLUGIN_INFO: PluginInfo = PluginInfo {
    version: 100,
    name: "Nonstop Rate Plugin",
    copyright: "",
    description: "Plugin to generate fake rate in case feeder do not send rate in time.",
};

/// Parameters a freshly installed plugin starts with
pub fn default_parameters() -> Vec<PluginParam> {
    vec![
        PluginParam::int(TIMEOUT_PARAM_NAME, DEFAULT_TIMEOUT),
        PluginParam::new(FEEDER_PARAM_NAME, ""),
        PluginParam::new(SYMBOLS_PARAM_NAME, ""),
    ]
}

/// Live configuration shared by the classifier and the generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginConfig {
    /// Staleness threshold in seconds, already reduced by the processing latency
    pub timeout: i64,
    /// Trimmed name of the only feed whose ticks count as genuine
    pub primary_feed_name: String,
    /// Tracked symbols
    pub symbols: BTreeSet<Symbol>,
    /// Real-tick silence (seconds) after which the server fails over to
    /// another feed; synthesis stops there
    pub feeder_failover_timeout: i64,
    /// Publish counter
    pub version: u64,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            timeout: adjust_timeout(DEFAULT_TIMEOUT),
            primary_feed_name: String::new(),
            symbols: BTreeSet::new(),
            feeder_failover_timeout: DEFAULT_FAILOVER_TIMEOUT,
            version: 0,
        }
    }
}

impl PluginConfig {
    /// Build the next configuration from the plugin's parameter list
    ///
    /// The feed name and symbol set are rebuilt from scratch. The timeout
    /// keeps its previous value when no timeout parameter is present, and
    /// the failover timeout (a server setting) is always carried over.
    pub fn reconcile(&self, params: &[PluginParam]) -> PluginConfig {
        let mut next = PluginConfig {
            timeout: self.timeout,
            primary_feed_name: String::new(),
            symbols: BTreeSet::new(),
            feeder_failover_timeout: self.feeder_failover_timeout,
            version: self.version + 1,
        };

        for param in params {
            let name = text::trim(&param.name);
            if name == TIMEOUT_PARAM_NAME {
                next.timeout = parse_timeout(param.value_int());
            } else if name == FEEDER_PARAM_NAME {
                next.primary_feed_name = text::trim(&param.value).to_string();
            } else if is_symbols_param(&param.name) {
                next.symbols
                    .extend(text::parse_symbol_list(&param.value).map(str::to_string));
            }
        }

        next
    }

    /// Next configuration with a new failover timeout
    pub fn with_failover_timeout(&self, seconds: i64) -> PluginConfig {
        PluginConfig {
            feeder_failover_timeout: seconds,
            version: self.version + 1,
            ..self.clone()
        }
    }

    /// Whether `feed_name` is the configured primary feed
    ///
    /// Both sides are compared trimmed. With no primary feed configured no
    /// feed qualifies.
    pub fn is_primary_feed(&self, feed_name: &str) -> bool {
        !self.primary_feed_name.is_empty() && text::trim(feed_name) == self.primary_feed_name
    }

    pub fn is_tracked(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    /// Comma separated symbol list, for logs
    pub fn symbol_list(&self) -> String {
        self.symbols
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Staleness timeout from the raw parameter value
///
/// Zero or negative values fall back to [`DEFAULT_TIMEOUT`] before the
/// latency adjustment.
pub fn parse_timeout(raw: i64) -> i64 {
    let raw = if raw <= 0 { DEFAULT_TIMEOUT } else { raw };
    adjust_timeout(raw)
}

/// Subtract the processing latency, leaving timeouts at or below it untouched
pub fn adjust_timeout(raw: i64) -> i64 {
    if raw > PROCESSING_LATENCY {
        raw - PROCESSING_LATENCY
    } else {
        raw
    }
}

/// Whether `name` has the shape of a symbol list parameter: two digits
/// followed by `.Symbols`, nothing else
pub fn is_symbols_param(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() == 2 + SYMBOLS_SUFFIX.len()
        && bytes[..2].iter().all(u8::is_ascii_digit)
        && &name[2..] == SYMBOLS_SUFFIX
}
