use serde::{Deserialize, Serialize};

use crate::error::HostResult;

/// Identity of a plugin instance on the trading server
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginIdentity {
    pub name: String,
    /// Id of the server the plugin instance is attached to
    pub server: u64,
}

impl PluginIdentity {
    pub fn new(name: impl Into<String>, server: u64) -> Self {
        Self {
            name: name.into(),
            server,
        }
    }
}

/// Value type of a plugin parameter, as shown in the management UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Int,
    #[default]
    String,
}

/// One name/value entry of a plugin's parameter list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginParam {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub kind: ParamType,
}

impl PluginParam {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind: ParamType::String,
        }
    }

    pub fn int(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value: value.to_string(),
            kind: ParamType::Int,
        }
    }

    /// Integer reading of the value; anything unparsable reads as 0
    pub fn value_int(&self) -> i64 {
        self.value.trim().parse().unwrap_or(0)
    }
}

/// A plugin's current configuration record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginRecord {
    pub identity: PluginIdentity,
    pub params: Vec<PluginParam>,
}

/// Server roles whose configuration changes are broadcast to plugins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServerCategory {
    Trade,
    History,
    Access,
    Backup,
}

/// Port for reading this plugin's own configuration record
pub trait PluginConfigSource: Send + Sync {
    fn current(&self) -> HostResult<PluginRecord>;
}

/// Port for reading server-wide configuration
pub trait ServerConfigSource: Send + Sync {
    /// Seconds without quotes after which the history server switches to a
    /// backup data feed
    fn datafeeds_timeout(&self) -> HostResult<i64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_int() {
        assert_eq!(PluginParam::int("01.Timeout(seconds)", 30).value_int(), 30);
        assert_eq!(PluginParam::new("x", " 45 ").value_int(), 45);
        assert_eq!(PluginParam::new("x", "abc").value_int(), 0);
        assert_eq!(PluginParam::new("x", "").value_int(), 0);
    }
}
