use crate::metrics::Metrics;
use crate::stream_context::StreamContext;
use common::configuration::Configuration;
use common::plugin::PluginState;
use log::{debug, error};
use proxy_wasm::traits::*;
use proxy_wasm::types::*;
use std::rc::Rc;

#[derive(Debug)]
pub struct FilterContext {
    metrics: Rc<Metrics>,
    plugin: Option<PluginState>,
}

impl FilterContext {
    pub fn new() -> FilterContext {
        FilterContext {
            metrics: Rc::new(Metrics::new()),
            plugin: None,
        }
    }
}

impl Context for FilterContext {}

// RootContext allows the Rust code to reach into the Envoy Config
impl RootContext for FilterContext {
    fn on_configure(&mut self, _: usize) -> bool {
        let config_bytes = self.get_plugin_configuration().unwrap_or_default();

        let config = match Configuration::from_slice(&config_bytes) {
            Ok(config) => config,
            Err(err) => {
                error!("failed to start plugin: {}", err);
                return false;
            }
        };
        debug!("plugin configured: {:?}", config);

        self.plugin = Some(PluginState::new(&config));
        true
    }

    fn create_http_context(&self, context_id: u32) -> Option<Box<dyn HttpContext>> {
        debug!(
            "||| create_http_context called with context_id: {:?} |||",
            context_id
        );

        let plugin = self
            .plugin
            .as_ref()
            .expect("plugin must be configured when streams are being created");

        Some(Box::new(StreamContext::new(
            context_id,
            Rc::clone(&self.metrics),
            plugin.upstream(),
            plugin.callback(),
            plugin.dispatches_per_event(),
        )))
    }

    fn get_type(&self) -> Option<ContextType> {
        Some(ContextType::HttpContext)
    }
}
