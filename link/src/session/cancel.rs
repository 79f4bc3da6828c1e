//! Out-of-band cancellation.

use log::{debug, warn};
use std::sync::Arc;

use crate::transport::{HttpRequest, HttpTransport};

/// Status the engine answers a successful cancellation with
const CANCEL_SUCCESS_STATUS: u16 = 204;

/// Owned handle for cancelling a query from another task.
///
/// Captures the partial-cancel URI known when the handle was taken. Cancelling
/// does not touch the session; the polling task observes the server's own
/// terminal state on its next poll.
#[derive(Clone)]
pub struct CancelHandle {
    uri: String,
    headers: Vec<(String, String)>,
    transport: Arc<dyn HttpTransport>,
}

impl CancelHandle {
    pub(crate) fn new(
        uri: String,
        headers: Vec<(String, String)>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            uri,
            headers,
            transport,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Request cancellation. `true` only if the server answered 204.
    pub async fn cancel(&self) -> bool {
        send_cancel(self.transport.as_ref(), &self.uri, self.headers.clone()).await
    }
}

impl std::fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelHandle").field("uri", &self.uri).finish()
    }
}

pub(crate) async fn send_cancel(
    transport: &dyn HttpTransport,
    uri: &str,
    headers: Vec<(String, String)>,
) -> bool {
    let request = HttpRequest::delete(uri).with_headers(headers);
    match transport.send(request).await {
        Ok(response) if response.status == CANCEL_SUCCESS_STATUS => {
            debug!("[ENGINE_QUERY] Cancellation accepted uri={}", uri);
            true
        },
        Ok(response) => {
            warn!(
                "[ENGINE_QUERY] Cancellation not accepted: status={} uri={}",
                response.status, uri
            );
            false
        },
        Err(e) => {
            warn!("[ENGINE_QUERY] Cancellation request failed: {} uri={}", e, uri);
            false
        },
    }
}
