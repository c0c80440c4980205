use proxy_wasm::hostcalls;
use proxy_wasm::types::{BufferType, Bytes, Status};
use std::time::Duration;

/// Host capabilities used by the dispatch core.
///
/// The host invokes one hook at a time and never re-enters a context while a
/// hook is running. Implementations are only called from within a hook's
/// synchronous extent, which is why the shared state built on top of this
/// trait uses `Rc`/`RefCell` and stays `!Send`.
pub trait Host {
    /// Issues an outbound call. Returns the token that the host later passes
    /// to `on_http_call_response`, or the status of a synchronous rejection.
    fn dispatch_http_call(
        &self,
        upstream: &str,
        headers: Vec<(&str, &str)>,
        body: Option<&[u8]>,
        trailers: Vec<(&str, &str)>,
        timeout: Duration,
    ) -> Result<u32, Status>;

    /// Reads the body of the call whose response is currently being delivered.
    fn get_http_call_response_body(
        &self,
        start: usize,
        max_size: usize,
    ) -> Result<Option<Bytes>, Status>;

    fn set_tick_period(&self, period: Duration) -> Result<(), Status>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ProxyWasmHost;

impl Host for ProxyWasmHost {
    fn dispatch_http_call(
        &self,
        upstream: &str,
        headers: Vec<(&str, &str)>,
        body: Option<&[u8]>,
        trailers: Vec<(&str, &str)>,
        timeout: Duration,
    ) -> Result<u32, Status> {
        hostcalls::dispatch_http_call(upstream, headers, body, trailers, timeout)
    }

    fn get_http_call_response_body(
        &self,
        start: usize,
        max_size: usize,
    ) -> Result<Option<Bytes>, Status> {
        hostcalls::get_buffer(BufferType::HttpCallResponseBody, start, max_size)
    }

    fn set_tick_period(&self, period: Duration) -> Result<(), Status> {
        hostcalls::set_tick_period(period)
    }
}
