use crate::{configuration::Upstream, errors::ClientError, host::Host};
use derivative::Derivative;
use log::trace;
use std::{cell::RefCell, collections::HashMap, fmt::Debug, time::Duration};

#[derive(Derivative)]
#[derivative(Debug)]
pub struct CallArgs<'a> {
    upstream: &'a str,
    path: &'a str,
    headers: Vec<(&'a str, &'a str)>,
    #[derivative(Debug = "ignore")]
    body: Option<&'a [u8]>,
    trailers: Vec<(&'a str, &'a str)>,
    timeout: Duration,
}

impl<'a> CallArgs<'a> {
    pub fn new(
        upstream: &'a str,
        path: &'a str,
        headers: Vec<(&'a str, &'a str)>,
        body: Option<&'a [u8]>,
        trailers: Vec<(&'a str, &'a str)>,
        timeout: Duration,
    ) -> Self {
        CallArgs {
            upstream,
            path,
            headers,
            body,
            trailers,
            timeout,
        }
    }
}

/// The request every side-channel call sends: a bodiless GET to a fixed path
/// on the configured cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamCall {
    cluster: String,
    path: String,
    method: String,
    authority: String,
    timeout: Duration,
}

impl UpstreamCall {
    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn call_args(&self) -> CallArgs<'_> {
        CallArgs::new(
            &self.cluster,
            &self.path,
            vec![
                (":path", self.path.as_str()),
                (":method", self.method.as_str()),
                (":authority", self.authority.as_str()),
            ],
            None,
            vec![],
            self.timeout,
        )
    }
}

impl From<&Upstream> for UpstreamCall {
    fn from(upstream: &Upstream) -> Self {
        UpstreamCall {
            cluster: upstream.cluster.clone(),
            path: upstream.path.clone(),
            method: http::Method::GET.to_string(),
            authority: upstream.authority.clone(),
            timeout: Duration::from_millis(upstream.timeout_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOrigin {
    ResponseHeaders { context_id: u32 },
    Tick { tick: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    pub upstream: String,
    pub path: String,
    pub origin: CallOrigin,
}

impl CallContext {
    pub fn new(call: &UpstreamCall, origin: CallOrigin) -> Self {
        CallContext {
            upstream: call.cluster().to_string(),
            path: call.path().to_string(),
            origin,
        }
    }
}

pub trait Client {
    type CallContext: Debug;

    fn host(&self) -> &dyn Host;

    fn http_call(
        &self,
        call_args: CallArgs,
        call_context: Self::CallContext,
    ) -> Result<u32, ClientError> {
        trace!(
            "dispatching http call with args={:?} context={:?}",
            call_args,
            call_context
        );

        match self.host().dispatch_http_call(
            call_args.upstream,
            call_args.headers,
            call_args.body,
            call_args.trailers,
            call_args.timeout,
        ) {
            Ok(id) => {
                self.add_call_context(id, call_context);
                Ok(id)
            }
            Err(status) => Err(ClientError::DispatchError {
                upstream_name: String::from(call_args.upstream),
                path: String::from(call_args.path),
                internal_status: status,
            }),
        }
    }

    fn add_call_context(&self, id: u32, call_context: Self::CallContext) {
        let callouts = self.callouts();
        if callouts.borrow_mut().insert(id, call_context).is_some() {
            panic!("Duplicate http call with id={}", id);
        }
    }

    /// Removes the context recorded for `token_id`. A second call for the same
    /// token returns `None`, so each response is handled at most once.
    fn take_call_context(&self, token_id: u32) -> Option<Self::CallContext> {
        self.callouts().borrow_mut().remove(&token_id)
    }

    fn pending_calls(&self) -> usize {
        self.callouts().borrow().len()
    }

    fn callouts(&self) -> &RefCell<HashMap<u32, Self::CallContext>>;
}
