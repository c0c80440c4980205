use crate::callback::CallbackHandler;
use crate::configuration::Configuration;
use crate::errors::{ClientError, ConfigError, StartError};
use crate::host::Host;
use crate::http::{CallContext, CallOrigin, Client, UpstreamCall};
use crate::queue::{Marker, WorkQueue};
use log::{debug, warn};
use std::cell::Cell;
use std::rc::{Rc, Weak};
use std::time::Duration;

/// State owned by a plugin instance for the lifetime of one configuration load.
#[derive(Debug)]
pub struct PluginState {
    upstream: Rc<UpstreamCall>,
    callback: Rc<CallbackHandler>,
    queue: Rc<WorkQueue>,
    dispatches_per_event: u32,
    tick_period: Duration,
    ticks: Cell<u64>,
}

#[derive(Debug)]
pub struct TickReport {
    pub popped: Option<Marker>,
    pub dispatch: Result<u32, ClientError>,
}

impl PluginState {
    pub fn new(config: &Configuration) -> Self {
        let upstream = UpstreamCall::from(&config.upstream);
        let callback = CallbackHandler::new(upstream.cluster());
        PluginState {
            upstream: Rc::new(upstream),
            callback: Rc::new(callback),
            queue: Rc::new(WorkQueue::new()),
            dispatches_per_event: config.dispatches_per_event,
            tick_period: config.tick_period(),
            ticks: Cell::new(0),
        }
    }

    /// Subscribes to the host timer. Without it nothing would ever drain the
    /// queue, so a failure here fails the plugin start.
    pub fn start(&self, host: &dyn Host) -> Result<(), StartError> {
        if self.tick_period.is_zero() {
            return Err(ConfigError::Invalid {
                why: String::from("tick_period_ms must be at least 1"),
            }
            .into());
        }

        host.set_tick_period(self.tick_period)
            .map_err(|status| StartError::TickPeriod {
                period: self.tick_period,
                internal_status: status,
            })
    }

    /// Pops at most one queued marker and issues exactly one dispatch.
    ///
    /// The two actions are independent: an empty queue still dispatches, and a
    /// pending earlier dispatch does not hold back the pop. A rejected dispatch
    /// is left for the next tick.
    pub fn tick<C: Client<CallContext = CallContext>>(&self, client: &C) -> TickReport {
        let tick = self.ticks.get() + 1;
        self.ticks.set(tick);

        let popped = self.queue.pop_front();
        if let Some(marker) = popped {
            debug!(
                "tick {}: dequeued {}, {} left in queue",
                tick,
                marker,
                self.queue.len()
            );
        }

        let dispatch = client.http_call(
            self.upstream.call_args(),
            CallContext::new(&self.upstream, CallOrigin::Tick { tick }),
        );
        if let Err(error) = &dispatch {
            warn!("tick {}: {}, retrying on next tick", tick, error);
        }

        TickReport { popped, dispatch }
    }

    pub fn upstream(&self) -> Rc<UpstreamCall> {
        Rc::clone(&self.upstream)
    }

    pub fn callback(&self) -> Rc<CallbackHandler> {
        Rc::clone(&self.callback)
    }

    pub fn queue(&self) -> &WorkQueue {
        &self.queue
    }

    pub fn queue_handle(&self) -> Weak<WorkQueue> {
        Rc::downgrade(&self.queue)
    }

    pub fn dispatches_per_event(&self) -> u32 {
        self.dispatches_per_event
    }
}
