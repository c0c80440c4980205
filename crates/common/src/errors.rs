use proxy_wasm::types::Status;
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("Error dispatching HTTP call to `{upstream_name}{path}`, error: {internal_status:?}")]
    DispatchError {
        upstream_name: String,
        path: String,
        internal_status: Status,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid plugin configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("{why}")]
    Invalid { why: String },
}

#[derive(thiserror::Error, Debug)]
pub enum StartError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to set tick period to {period:?}, error: {internal_status:?}")]
    TickPeriod {
        period: Duration,
        internal_status: Status,
    },
}
