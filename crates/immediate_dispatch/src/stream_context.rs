use crate::metrics::Metrics;
use common::callback::CallbackHandler;
use common::host::{Host, ProxyWasmHost};
use common::dispatch::dispatch_or_abort;
use common::http::{CallContext, Client, UpstreamCall};
use common::stats::IncrementingMetric;
use log::{debug, warn};
use proxy_wasm::traits::*;
use proxy_wasm::types::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub struct StreamContext {
    context_id: u32,
    metrics: Rc<Metrics>,
    upstream: Rc<UpstreamCall>,
    callback: Rc<CallbackHandler>,
    dispatches_per_event: u32,
    // callouts stores token_id to call context so each response is matched to a call this stream issued.
    callouts: RefCell<HashMap<u32, CallContext>>,
    host: ProxyWasmHost,
}

impl StreamContext {
    pub fn new(
        context_id: u32,
        metrics: Rc<Metrics>,
        upstream: Rc<UpstreamCall>,
        callback: Rc<CallbackHandler>,
        dispatches_per_event: u32,
    ) -> Self {
        StreamContext {
            context_id,
            metrics,
            upstream,
            callback,
            dispatches_per_event,
            callouts: RefCell::new(HashMap::new()),
            host: ProxyWasmHost,
        }
    }
}

impl Client for StreamContext {
    type CallContext = CallContext;

    fn host(&self) -> &dyn Host {
        &self.host
    }

    fn callouts(&self) -> &RefCell<HashMap<u32, Self::CallContext>> {
        &self.callouts
    }
}

impl HttpContext for StreamContext {
    fn on_http_response_headers(&mut self, num_headers: usize, end_of_stream: bool) -> Action {
        debug!(
            "on_http_response_headers context_id={} num_headers={} end_of_stream={}",
            self.context_id, num_headers, end_of_stream
        );

        let tokens = dispatch_or_abort(
            &*self,
            &self.upstream,
            self.context_id,
            self.dispatches_per_event,
        );
        let issued = tokens.len() as i64;
        self.metrics.active_http_calls.increment(issued);
        self.metrics.dispatched_calls.increment(issued);

        Action::Continue
    }
}

impl Context for StreamContext {
    fn on_http_call_response(
        &mut self,
        token_id: u32,
        num_headers: usize,
        body_size: usize,
        num_trailers: usize,
    ) {
        if self.take_call_context(token_id).is_none() {
            warn!(
                "context_id={}: ignoring response for unknown token_id={}, {} calls pending",
                self.context_id,
                token_id,
                self.pending_calls()
            );
            return;
        }
        self.metrics.active_http_calls.increment(-1);

        self.callback.on_http_call_response(
            &self.host,
            token_id,
            num_headers,
            body_size,
            num_trailers,
        );
    }
}
