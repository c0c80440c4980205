use crate::host::Host;
use log::{debug, error, info, warn};
use proxy_wasm::types::{Bytes, Status};

/// Terminal state of a dispatched call. There is no retry transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    Completed,
    /// Reset, timeout or any other failure. The host delivers these with no
    /// response headers.
    Failed,
}

impl CallOutcome {
    pub fn from_num_headers(num_headers: usize) -> Self {
        if num_headers == 0 {
            CallOutcome::Failed
        } else {
            CallOutcome::Completed
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackReport {
    Body(Bytes),
    Failed,
    BodyUnavailable(Status),
}

/// Completion handler shared by every call a plugin instance issues. It only
/// reports what came back: nothing is re-dispatched, re-queued or forwarded to
/// the intercepted stream.
#[derive(Debug)]
pub struct CallbackHandler {
    upstream: String,
}

impl CallbackHandler {
    pub fn new(upstream: &str) -> Self {
        CallbackHandler {
            upstream: String::from(upstream),
        }
    }

    pub fn on_http_call_response(
        &self,
        host: &dyn Host,
        token_id: u32,
        num_headers: usize,
        body_size: usize,
        num_trailers: usize,
    ) -> CallbackReport {
        debug!(
            "http call response from {}: token_id={} num_headers={} body_size={} num_trailers={}",
            self.upstream, token_id, num_headers, body_size, num_trailers
        );

        if CallOutcome::from_num_headers(num_headers) == CallOutcome::Failed {
            warn!(
                "http call to {} failed or timed out, token_id={}",
                self.upstream, token_id
            );
            // a local reply can still carry a body describing the failure
            if body_size > 0 {
                match host.get_http_call_response_body(0, body_size) {
                    Ok(body) => debug!(
                        "failed call body: {}",
                        String::from_utf8_lossy(&body.unwrap_or_default())
                    ),
                    Err(status) => debug!("failed call body unavailable: {:?}", status),
                }
            }
            return CallbackReport::Failed;
        }

        match host.get_http_call_response_body(0, body_size) {
            Ok(body) => {
                let body = body.unwrap_or_default();
                info!("http call resp {}", String::from_utf8_lossy(&body));
                CallbackReport::Body(body)
            }
            Err(status) => {
                error!("failed to get response body: {:?}", status);
                CallbackReport::BodyUnavailable(status)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::{CallOutcome, CallbackHandler, CallbackReport};
    use crate::mock::MockHost;
    use pretty_assertions::assert_eq;
    use proxy_wasm::types::Status;

    const ORIGIN_BODY: &str = r#"{"origin": "10.0.0.1"}"#;

    #[test]
    fn test_outcome_from_headers() {
        assert_eq!(CallOutcome::from_num_headers(0), CallOutcome::Failed);
        assert_eq!(CallOutcome::from_num_headers(4), CallOutcome::Completed);
    }

    #[test]
    fn test_reports_body() {
        let host = MockHost::default();
        host.set_response_body(Ok(Some(ORIGIN_BODY.as_bytes().to_vec())));
        let callback = CallbackHandler::new("cluster-manager");

        let report = callback.on_http_call_response(&host, 1, 4, ORIGIN_BODY.len(), 0);

        assert_eq!(report, CallbackReport::Body(ORIGIN_BODY.as_bytes().to_vec()));
        assert_eq!(host.body_reads(), 1);
    }

    #[test]
    fn test_body_read_is_bounded_by_reported_size() {
        let host = MockHost::default();
        host.set_response_body(Ok(Some(ORIGIN_BODY.as_bytes().to_vec())));
        let callback = CallbackHandler::new("cluster-manager");

        let report = callback.on_http_call_response(&host, 1, 4, 10, 0);

        assert_eq!(
            report,
            CallbackReport::Body(ORIGIN_BODY.as_bytes()[..10].to_vec())
        );
    }

    #[test]
    fn test_repeated_body_reads_return_same_bytes() {
        let host = MockHost::default();
        host.set_response_body(Ok(Some(ORIGIN_BODY.as_bytes().to_vec())));
        let callback = CallbackHandler::new("cluster-manager");

        let first = callback.on_http_call_response(&host, 1, 4, ORIGIN_BODY.len(), 0);
        let second = callback.on_http_call_response(&host, 1, 4, ORIGIN_BODY.len(), 0);

        assert_eq!(first, second);
        assert_eq!(host.body_reads(), 2);
    }

    #[test]
    fn test_missing_body_is_empty() {
        let host = MockHost::default();
        let callback = CallbackHandler::new("cluster-manager");

        let report = callback.on_http_call_response(&host, 1, 4, 0, 0);

        assert_eq!(report, CallbackReport::Body(vec![]));
    }

    #[test]
    fn test_body_retrieval_failure_is_not_retried() {
        let host = MockHost::default();
        host.set_response_body(Err(Status::NotFound));
        let callback = CallbackHandler::new("cluster-manager");

        let report = callback.on_http_call_response(&host, 1, 4, 32, 0);

        assert_eq!(report, CallbackReport::BodyUnavailable(Status::NotFound));
        assert_eq!(host.body_reads(), 1);
    }

    #[test]
    fn test_failed_call_without_body_skips_read() {
        let host = MockHost::default();
        host.set_response_body(Ok(Some(ORIGIN_BODY.as_bytes().to_vec())));
        let callback = CallbackHandler::new("cluster-manager");

        let report = callback.on_http_call_response(&host, 1, 0, 0, 0);

        assert_eq!(report, CallbackReport::Failed);
        assert_eq!(host.body_reads(), 0);
    }

    #[test]
    fn test_failed_call_reads_reported_body() {
        let host = MockHost::default();
        host.set_response_body(Ok(Some(b"upstream request timeout".to_vec())));
        let callback = CallbackHandler::new("cluster-manager");

        let report = callback.on_http_call_response(&host, 1, 0, 24, 0);

        assert_eq!(report, CallbackReport::Failed);
        assert_eq!(host.body_reads(), 1);
    }
}
