//! Cache observer trait

/// Observer trait for external observability, notified from the dispatch
/// path.
pub trait CacheObserver: Send + Sync + 'static {
    fn on_request_started(&self, service: &str, operation: &str);
    fn on_request_succeeded(&self, service: &str, operation: &str, code: u16);
    fn on_request_failed(&self, service: &str, operation: &str, code: u16);
    fn on_stale_tolerated(&self, service: &str, operation: &str);
    fn on_action_ignored(&self, service: &str, operation: &str);
}

/// No-op observer
pub struct NoOpObserver;

impl CacheObserver for NoOpObserver {
    fn on_request_started(&self, _service: &str, _operation: &str) {}
    fn on_request_succeeded(&self, _service: &str, _operation: &str, _code: u16) {}
    fn on_request_failed(&self, _service: &str, _operation: &str, _code: u16) {}
    fn on_stale_tolerated(&self, _service: &str, _operation: &str) {}
    fn on_action_ignored(&self, _service: &str, _operation: &str) {}
}

/// Tracing-based observer
pub struct TracingObserver;

impl CacheObserver for TracingObserver {
    fn on_request_started(&self, service: &str, operation: &str) {
        tracing::debug!(service = %service, operation = %operation, "Request started");
    }

    fn on_request_succeeded(&self, service: &str, operation: &str, code: u16) {
        tracing::info!(service = %service, operation = %operation, code = code, "Request succeeded");
    }

    fn on_request_failed(&self, service: &str, operation: &str, code: u16) {
        tracing::warn!(service = %service, operation = %operation, code = code, "Request failed");
    }

    fn on_stale_tolerated(&self, service: &str, operation: &str) {
        tracing::debug!(service = %service, operation = %operation, "Stale response tolerated");
    }

    fn on_action_ignored(&self, service: &str, operation: &str) {
        tracing::debug!(service = %service, operation = %operation, "Action for unregistered service ignored");
    }
}
