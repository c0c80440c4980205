use crate::host::Host;
use crate::http::{CallContext, Client};
use proxy_wasm::types::{Bytes, Status};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchedCall {
    pub upstream: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub trailers: Vec<(String, String)>,
    pub timeout: Duration,
}

/// In-memory host. Tokens start at 1 and increase with every accepted call.
#[derive(Debug)]
pub struct MockHost {
    dispatched: RefCell<Vec<DispatchedCall>>,
    next_token: Cell<u32>,
    dispatch_rejection: Cell<Option<Status>>,
    response_body: RefCell<Result<Option<Bytes>, Status>>,
    body_reads: Cell<usize>,
    tick_period: Cell<Option<Duration>>,
    tick_rejection: Cell<Option<Status>>,
}

impl Default for MockHost {
    fn default() -> Self {
        MockHost {
            dispatched: RefCell::new(Vec::new()),
            next_token: Cell::new(1),
            dispatch_rejection: Cell::new(None),
            response_body: RefCell::new(Ok(None)),
            body_reads: Cell::new(0),
            tick_period: Cell::new(None),
            tick_rejection: Cell::new(None),
        }
    }
}

impl MockHost {
    pub fn dispatched(&self) -> Vec<DispatchedCall> {
        self.dispatched.borrow().clone()
    }

    pub fn reject_dispatch(&self, status: Status) {
        self.dispatch_rejection.set(Some(status));
    }

    pub fn accept_dispatch(&self) {
        self.dispatch_rejection.set(None);
    }

    pub fn set_response_body(&self, body: Result<Option<Bytes>, Status>) {
        *self.response_body.borrow_mut() = body;
    }

    pub fn body_reads(&self) -> usize {
        self.body_reads.get()
    }

    pub fn tick_period(&self) -> Option<Duration> {
        self.tick_period.get()
    }

    pub fn reject_tick_period(&self, status: Status) {
        self.tick_rejection.set(Some(status));
    }
}

impl Host for MockHost {
    fn dispatch_http_call(
        &self,
        upstream: &str,
        headers: Vec<(&str, &str)>,
        body: Option<&[u8]>,
        trailers: Vec<(&str, &str)>,
        timeout: Duration,
    ) -> Result<u32, Status> {
        if let Some(status) = self.dispatch_rejection.get() {
            return Err(status);
        }
        let owned = |pairs: Vec<(&str, &str)>| -> Vec<(String, String)> {
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        };
        self.dispatched.borrow_mut().push(DispatchedCall {
            upstream: upstream.to_string(),
            headers: owned(headers),
            body: body.map(|b| b.to_vec()),
            trailers: owned(trailers),
            timeout,
        });
        let token = self.next_token.get();
        self.next_token.set(token + 1);
        Ok(token)
    }

    fn get_http_call_response_body(
        &self,
        start: usize,
        max_size: usize,
    ) -> Result<Option<Bytes>, Status> {
        self.body_reads.set(self.body_reads.get() + 1);
        self.response_body.borrow().clone().map(|body| {
            body.map(|bytes| {
                let end = bytes.len().min(start.saturating_add(max_size));
                bytes.get(start..end).unwrap_or_default().to_vec()
            })
        })
    }

    fn set_tick_period(&self, period: Duration) -> Result<(), Status> {
        if let Some(status) = self.tick_rejection.get() {
            return Err(status);
        }
        self.tick_period.set(Some(period));
        Ok(())
    }
}

#[derive(Debug)]
pub struct MockClient {
    pub host: MockHost,
    callouts: RefCell<HashMap<u32, CallContext>>,
}

impl MockClient {
    pub fn new(host: MockHost) -> Self {
        MockClient {
            host,
            callouts: RefCell::new(HashMap::new()),
        }
    }
}

impl Client for MockClient {
    type CallContext = CallContext;

    fn host(&self) -> &dyn Host {
        &self.host
    }

    fn callouts(&self) -> &RefCell<HashMap<u32, Self::CallContext>> {
        &self.callouts
    }
}
