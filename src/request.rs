//! Request driver: phase dispatch around an in-flight call

use std::future::Future;

use serde_json::Value;

use crate::action::Action;
use crate::cache::ResourceCache;

/// Outcome of one remote call, `(data, code)` for either disposition. In
/// this protocol a failed request can still carry a usable payload.
pub type RequestOutcome = Result<(Value, u16), (Value, u16)>;

/// Drive one request through its phases: dispatch `PENDING`, await the
/// call, dispatch `FULFILLED` or `REJECTED` with its `(data, code)`.
///
/// All asynchrony lives here, outside the reducer. The cache does no
/// request de-duplication or cancellation: callers must not issue
/// overlapping requests for one operation unless they can tolerate
/// last-writer-wins overwrites.
pub async fn perform<F>(cache: &ResourceCache, service: &str, operation: &str, request: F)
where
    F: Future<Output = RequestOutcome>,
{
    tracing::debug!(service, operation, "dispatching request");
    cache.dispatch(Action::pending(service, operation));

    match request.await {
        Ok((data, code)) => cache.dispatch(Action::fulfilled(service, operation, data, code)),
        Err((data, code)) => cache.dispatch(Action::rejected(service, operation, data, code)),
    }
}
