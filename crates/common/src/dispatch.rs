use crate::errors::ClientError;
use crate::http::{CallContext, CallOrigin, Client, UpstreamCall};
use log::error;

/// Issues `count` calls for one response event of stream `context_id`.
/// Stops at the first call the host rejects.
pub fn dispatch_on_response<C: Client<CallContext = CallContext>>(
    client: &C,
    upstream: &UpstreamCall,
    context_id: u32,
    count: u32,
) -> Result<Vec<u32>, ClientError> {
    (0..count)
        .map(|_| {
            client.http_call(
                upstream.call_args(),
                CallContext::new(upstream, CallOrigin::ResponseHeaders { context_id }),
            )
        })
        .collect()
}

/// Like [`dispatch_on_response`], but a rejected call aborts the instance. A
/// rejected call never gets a callback, so the stream could not report it later.
pub fn dispatch_or_abort<C: Client<CallContext = CallContext>>(
    client: &C,
    upstream: &UpstreamCall,
    context_id: u32,
    count: u32,
) -> Vec<u32> {
    match dispatch_on_response(client, upstream, context_id, count) {
        Ok(tokens) => tokens,
        Err(error) => {
            error!("context_id={}: {}", context_id, error);
            panic!("{error}");
        }
    }
}
