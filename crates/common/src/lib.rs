pub mod callback;
pub mod configuration;
pub mod consts;
pub mod dispatch;
pub mod errors;
pub mod host;
pub mod http;
pub mod plugin;
pub mod queue;
pub mod stats;

#[cfg(test)]
mod mock;
