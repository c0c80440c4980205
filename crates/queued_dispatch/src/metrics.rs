use common::stats::{Counter, Gauge};

#[derive(Copy, Clone, Debug)]
pub struct Metrics {
    pub active_http_calls: Gauge,
    pub dispatched_calls: Counter,
    pub dispatch_failures: Counter,
    pub queue_depth: Gauge,
}

impl Metrics {
    pub fn new() -> Metrics {
        Metrics {
            active_http_calls: Gauge::new("active_http_calls"),
            dispatched_calls: Counter::new("dispatched_calls"),
            dispatch_failures: Counter::new("dispatch_failures"),
            queue_depth: Gauge::new("queue_depth"),
        }
    }
}
