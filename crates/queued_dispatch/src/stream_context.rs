use crate::metrics::Metrics;
use common::queue::{WorkQueue, RESPONSE_EVENT_MARKER};
use common::stats::IncrementingMetric;
use log::{debug, warn};
use proxy_wasm::traits::*;
use proxy_wasm::types::*;
use std::rc::{Rc, Weak};

pub struct StreamContext {
    context_id: u32,
    metrics: Rc<Metrics>,
    queue: Weak<WorkQueue>,
}

impl StreamContext {
    pub fn new(context_id: u32, metrics: Rc<Metrics>, queue: Weak<WorkQueue>) -> Self {
        StreamContext {
            context_id,
            metrics,
            queue,
        }
    }
}

impl HttpContext for StreamContext {
    fn on_http_response_headers(&mut self, num_headers: usize, end_of_stream: bool) -> Action {
        debug!(
            "on_http_response_headers context_id={} num_headers={} end_of_stream={}",
            self.context_id, num_headers, end_of_stream
        );

        // Only the root context's tick drains the queue; streams never dispatch.
        match self.queue.upgrade() {
            Some(queue) => {
                let depth = queue.push(RESPONSE_EVENT_MARKER);
                self.metrics.queue_depth.increment(1);
                debug!(
                    "context_id={}: queued response event, queue depth: {}",
                    self.context_id, depth
                );
            }
            None => warn!(
                "context_id={}: plugin was reconfigured, dropping response event",
                self.context_id
            ),
        }

        Action::Continue
    }
}

impl Context for StreamContext {}
