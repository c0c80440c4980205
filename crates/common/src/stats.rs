use log::error;
use proxy_wasm::hostcalls;
use proxy_wasm::types::*;

pub trait Metric {
    fn id(&self) -> u32;
}

pub trait IncrementingMetric: Metric {
    fn increment(&self, offset: i64) {
        match hostcalls::increment_metric(self.id(), offset) {
            Ok(_) => (),
            Err(err) => error!("error incrementing metric: {:?}", err),
        }
    }
}

fn define_metric(metric_type: MetricType, name: &str) -> u32 {
    hostcalls::define_metric(metric_type, name)
        .unwrap_or_else(|err| panic!("failed to define {:?} '{}': {:?}", metric_type, name, err))
}

#[derive(Copy, Clone, Debug)]
pub struct Counter {
    id: u32,
}

impl Counter {
    pub fn new(name: &str) -> Counter {
        Counter {
            id: define_metric(MetricType::Counter, name),
        }
    }
}

impl Metric for Counter {
    fn id(&self) -> u32 {
        self.id
    }
}

impl IncrementingMetric for Counter {}

#[derive(Copy, Clone, Debug)]
pub struct Gauge {
    id: u32,
}

impl Gauge {
    pub fn new(name: &str) -> Gauge {
        Gauge {
            id: define_metric(MetricType::Gauge, name),
        }
    }
}

impl Metric for Gauge {
    fn id(&self) -> u32 {
        self.id
    }
}

/// Gauges only move by deltas: every increment is paired with a decrement
/// once the tracked item goes away.
impl IncrementingMetric for Gauge {}
