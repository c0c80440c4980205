use crate::metrics::Metrics;
use crate::stream_context::StreamContext;
use common::configuration::Configuration;
use common::errors::StartError;
use common::host::{Host, ProxyWasmHost};
use common::http::{CallContext, Client};
use common::plugin::PluginState;
use common::stats::IncrementingMetric;
use log::{debug, error, warn};
use proxy_wasm::traits::*;
use proxy_wasm::types::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug)]
pub struct FilterContext {
    metrics: Rc<Metrics>,
    plugin: Option<PluginState>,
    // callouts stores token_id to call context; tick dispatches are answered on this root context.
    callouts: RefCell<HashMap<u32, CallContext>>,
    host: ProxyWasmHost,
}

impl FilterContext {
    pub fn new() -> FilterContext {
        FilterContext {
            metrics: Rc::new(Metrics::new()),
            plugin: None,
            callouts: RefCell::new(HashMap::new()),
            host: ProxyWasmHost,
        }
    }

    fn start(&self, config_bytes: &[u8]) -> Result<PluginState, StartError> {
        let config = Configuration::from_slice(config_bytes)?;
        debug!("plugin configured: {:?}", config);

        let plugin = PluginState::new(&config);
        plugin.start(&self.host)?;
        Ok(plugin)
    }

    /// Markers left in a replaced plugin's queue are never ticked; take them
    /// out of the queue depth gauge.
    fn discard_pending(&self, previous: &PluginState) {
        let queue = previous.queue();
        if queue.is_empty() {
            return;
        }
        warn!(
            "plugin reconfigured, discarding {} queued response events",
            queue.len()
        );
        self.metrics.queue_depth.increment(-(queue.len() as i64));
    }
}

impl Client for FilterContext {
    type CallContext = CallContext;

    fn host(&self) -> &dyn Host {
        &self.host
    }

    fn callouts(&self) -> &RefCell<HashMap<u32, Self::CallContext>> {
        &self.callouts
    }
}

// RootContext allows the Rust code to reach into the Envoy Config
impl RootContext for FilterContext {
    fn on_configure(&mut self, _: usize) -> bool {
        let config_bytes = self.get_plugin_configuration().unwrap_or_default();

        match self.start(&config_bytes) {
            Ok(plugin) => {
                if let Some(previous) = self.plugin.replace(plugin) {
                    self.discard_pending(&previous);
                }
                true
            }
            Err(err) => {
                error!("failed to start plugin: {}", err);
                false
            }
        }
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
            plugin.queue_handle(),
        )))
    }

    fn get_type(&self) -> Option<ContextType> {
        Some(ContextType::HttpContext)
    }

    fn on_tick(&mut self) {
        let Some(plugin) = self.plugin.as_ref() else {
            return;
        };

        let report = plugin.tick(&*self);

        if report.popped.is_some() {
            self.metrics.queue_depth.increment(-1);
        }
        match report.dispatch {
            Ok(_) => {
                self.metrics.active_http_calls.increment(1);
                self.metrics.dispatched_calls.increment(1);
            }
            Err(_) => self.metrics.dispatch_failures.increment(1),
        }
    }
}

impl Context for FilterContext {
    fn on_http_call_response(
        &mut self,
        token_id: u32,
        num_headers: usize,
        body_size: usize,
        num_trailers: usize,
    ) {
        if self.take_call_context(token_id).is_none() {
            warn!(
                "ignoring response for unknown token_id={}, {} calls pending",
                token_id,
                self.pending_calls()
            );
            return;
        }
        self.metrics.active_http_calls.increment(-1);

        if let Some(plugin) = self.plugin.as_ref() {
            plugin.callback().on_http_call_response(
                &self.host,
                token_id,
                num_headers,
                body_size,
                num_trailers,
            );
        }
    }
}
