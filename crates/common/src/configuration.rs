use crate::consts::{
    DEFAULT_CALL_AUTHORITY, DEFAULT_CALL_PATH, DEFAULT_CALL_TIMEOUT_MS, DEFAULT_CLUSTER_NAME,
    DEFAULT_DISPATCHES_PER_EVENT, DEFAULT_TICK_PERIOD_MS,
};
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Configuration {
    pub upstream: Upstream,
    /// Calls issued per response event by the immediate dispatch filter.
    pub dispatches_per_event: u32,
    /// Timer period of the queued dispatch filter.
    pub tick_period_ms: u64,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            upstream: Upstream::default(),
            dispatches_per_event: DEFAULT_DISPATCHES_PER_EVENT,
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Upstream {
    pub cluster: String,
    pub path: String,
    pub authority: String,
    pub timeout_ms: u64,
}

impl Default for Upstream {
    fn default() -> Self {
        Upstream {
            cluster: DEFAULT_CLUSTER_NAME.to_string(),
            path: DEFAULT_CALL_PATH.to_string(),
            authority: DEFAULT_CALL_AUTHORITY.to_string(),
            timeout_ms: DEFAULT_CALL_TIMEOUT_MS,
        }
    }
}

impl Configuration {
    /// Parses the plugin configuration. An empty configuration yields the defaults.
    pub fn from_slice(config_bytes: &[u8]) -> Result<Self, ConfigError> {
        if config_bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Configuration::default());
        }

        let config: Configuration = serde_yaml::from_slice(config_bytes)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.cluster.is_empty() {
            return Err(ConfigError::Invalid {
                why: String::from("upstream cluster name cannot be empty"),
            });
        }

        if !self.upstream.path.starts_with('/') {
            return Err(ConfigError::Invalid {
                why: format!(
                    "upstream path must start with '/', got \"{}\"",
                    self.upstream.path
                ),
            });
        }

        if self.dispatches_per_event == 0 {
            return Err(ConfigError::Invalid {
                why: String::from("dispatches_per_event must be at least 1"),
            });
        }

        Ok(())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }
}
