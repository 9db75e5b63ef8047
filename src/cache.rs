//! Stateful cache front over the pure reducer

use std::sync::atomic::Ordering;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;

use crate::action::{Action, Phase, STALE_TOLERATE};
use crate::container::ServiceState;
use crate::observer::{CacheObserver, NoOpObserver};
use crate::stats::{CacheStats, CacheStatsSnapshot};
use crate::tree::{RootReducer, StateTree};

/// Owns the current [`StateTree`] and applies actions to it.
///
/// The tree behind the watch channel is immutable: every dispatch installs
/// a new version sharing untouched branches with the old one, so [`state`]
/// clones and subscriber reads stay cheap.
///
/// [`state`]: ResourceCache::state
pub struct ResourceCache {
    reducer: RootReducer,
    state: watch::Sender<StateTree>,
    observer: Arc<dyn CacheObserver>,
    stats: Arc<CacheStats>,
}

impl ResourceCache {
    /// Cache seeded with `reducer`'s initial state.
    pub fn new(reducer: RootReducer) -> Self {
        let (state, _) = watch::channel(reducer.initial_state());
        Self {
            reducer,
            state,
            observer: Arc::new(NoOpObserver),
            stats: Arc::new(CacheStats::new()),
        }
    }

    /// Replace the observer notified on dispatches.
    pub fn with_observer(mut self, observer: Arc<dyn CacheObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Current state tree.
    pub fn state(&self) -> StateTree {
        self.state.borrow().clone()
    }

    /// Receiver notified after every state-changing dispatch.
    pub fn subscribe(&self) -> watch::Receiver<StateTree> {
        self.state.subscribe()
    }

    /// Apply one typed action.
    ///
    /// Actions for services that were never registered cannot change the
    /// tree; they are counted, reported to the observer and dropped
    /// without waking subscribers.
    pub fn dispatch(&self, action: Action) {
        self.stats.actions_dispatched.fetch_add(1, Ordering::Relaxed);

        if !self.reducer.handles(action.service()) {
            self.stats.actions_ignored.fetch_add(1, Ordering::Relaxed);
            self.observer
                .on_action_ignored(action.service(), action.operation());
            return;
        }

        self.record(&action);
        self.state
            .send_modify(|tree| *tree = self.reducer.reduce(tree, &action));
    }

    /// Decode and apply an action from its wire form. Undecodable actions
    /// are dropped, preserving the "the reducer never throws" contract.
    pub fn dispatch_raw(&self, identity: &str, payload: Option<(Value, u16)>) {
        match Action::from_wire(identity, payload) {
            Ok(action) => self.dispatch(action),
            Err(error) => {
                self.stats.actions_dispatched.fetch_add(1, Ordering::Relaxed);
                self.stats.actions_ignored.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(identity, %error, "undecodable action dropped");
            }
        }
    }

    /// Reinitialize one service's container to empty, e.g. on sign-out.
    /// Its stores materialize lazily again on the next touch.
    pub fn reset_service(&self, service_type: &str) {
        self.state.send_modify(|tree| {
            *tree = tree.with_service(service_type, ServiceState::new());
        });
    }

    /// Counters accumulated since construction.
    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    fn record(&self, action: &Action) {
        let (service, operation) = (action.service(), action.operation());
        match (action.phase(), action.payload()) {
            (Phase::Pending, _) => {
                self.stats.requests_started.fetch_add(1, Ordering::Relaxed);
                self.observer.on_request_started(service, operation);
            }
            (_, Some(payload)) if payload.code == STALE_TOLERATE => {
                self.stats.stale_tolerated.fetch_add(1, Ordering::Relaxed);
                self.observer.on_stale_tolerated(service, operation);
            }
            (Phase::Fulfilled, Some(payload)) => {
                self.stats.requests_succeeded.fetch_add(1, Ordering::Relaxed);
                self.observer
                    .on_request_succeeded(service, operation, payload.code);
            }
            (Phase::Rejected, Some(payload)) => {
                self.stats.requests_failed.fetch_add(1, Ordering::Relaxed);
                self.observer
                    .on_request_failed(service, operation, payload.code);
            }
            (_, None) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{OperationKind, Service};
    use serde_json::json;

    struct Payments;

    impl Service for Payments {
        fn service_type(&self) -> &'static str {
            "PAYUTC"
        }

        fn operation_kind(&self, operation: &str) -> OperationKind {
            match operation {
                "getHistory" => OperationKind::Incremental,
                _ => OperationKind::Plain,
            }
        }
    }

    struct Auth;

    impl Service for Auth {
        fn service_type(&self) -> &'static str {
            "CAS"
        }
    }

    fn cache() -> ResourceCache {
        let mut reducer = RootReducer::new();
        reducer.register(Arc::new(Payments)).register(Arc::new(Auth));
        ResourceCache::new(reducer)
    }

    #[test]
    fn test_dispatch_and_read() {
        let cache = cache();
        cache.dispatch(Action::pending("PAYUTC", "getWalletDetails"));
        cache.dispatch(Action::fulfilled(
            "PAYUTC",
            "getWalletDetails",
            json!({"amount": 4200}),
            200,
        ));

        let store = cache.state().store("PAYUTC", "getWalletDetails");
        assert!(store.is_fetched());
        assert_eq!(store.data(), Some(&json!({"amount": 4200})));
    }

    #[test]
    fn test_dispatch_raw_round_trip() {
        let cache = cache();
        cache.dispatch_raw("CAS_login_PENDING", None);
        cache.dispatch_raw("CAS_login_FULFILLED", Some((json!({"ticket": "t"}), 200)));

        let store = cache.state().store("CAS", "login");
        assert!(store.is_fetched());
        assert_eq!(store.code(), Some(200));
    }

    #[test]
    fn test_dispatch_raw_undecodable_is_dropped() {
        let cache = cache();
        let before = cache.state();

        cache.dispatch_raw("CONFIG_wipe", None);
        cache.dispatch_raw("PAYUTC_getWalletDetails_DONE", Some((json!([]), 200)));
        cache.dispatch_raw("PAYUTC_getWalletDetails_FULFILLED", None);

        let stats = cache.stats();
        assert_eq!(stats.actions_dispatched, 3);
        assert_eq!(stats.actions_ignored, 3);
        assert!(Arc::ptr_eq(
            &before.service("PAYUTC"),
            &cache.state().service("PAYUTC")
        ));
    }

    #[test]
    fn test_unregistered_service_counted_ignored() {
        let cache = cache();
        cache.dispatch(Action::pending("GINGER", "getInformation"));

        let stats = cache.stats();
        assert_eq!(stats.actions_dispatched, 1);
        assert_eq!(stats.actions_ignored, 1);
        assert_eq!(stats.requests_started, 0);
    }

    #[test]
    fn test_reset_service_reinitializes_container() {
        let cache = cache();
        cache.dispatch(Action::fulfilled("PAYUTC", "getWalletDetails", json!([1]), 200));
        cache.dispatch(Action::fulfilled("CAS", "login", json!("ok"), 200));

        cache.reset_service("PAYUTC");

        let tree = cache.state();
        assert!(tree.service("PAYUTC").is_empty());
        assert_eq!(tree.store("CAS", "login").data(), Some(&json!("ok")));
    }

    #[test]
    fn test_stats_track_phases() {
        let cache = cache();
        cache.dispatch(Action::pending("PAYUTC", "getWalletDetails"));
        cache.dispatch(Action::fulfilled("PAYUTC", "getWalletDetails", json!([]), 200));
        cache.dispatch(Action::pending("PAYUTC", "getUserRights"));
        cache.dispatch(Action::rejected("PAYUTC", "getUserRights", json!(null), 500));
        cache.dispatch(Action::fulfilled("PAYUTC", "getWalletDetails", json!([]), 523));

        let stats = cache.stats();
        assert_eq!(stats.actions_dispatched, 5);
        assert_eq!(stats.requests_started, 2);
        assert_eq!(stats.requests_succeeded, 1);
        assert_eq!(stats.requests_failed, 1);
        assert_eq!(stats.stale_tolerated, 1);
    }

    #[test]
    fn test_observer_sees_request_lifecycle() {
        use std::sync::atomic::AtomicU64;

        #[derive(Default)]
        struct Recording {
            started: AtomicU64,
            succeeded: AtomicU64,
            failed: AtomicU64,
            ignored: AtomicU64,
        }

        impl CacheObserver for Recording {
            fn on_request_started(&self, _service: &str, _operation: &str) {
                self.started.fetch_add(1, Ordering::Relaxed);
            }
            fn on_request_succeeded(&self, _service: &str, _operation: &str, _code: u16) {
                self.succeeded.fetch_add(1, Ordering::Relaxed);
            }
            fn on_request_failed(&self, _service: &str, _operation: &str, _code: u16) {
                self.failed.fetch_add(1, Ordering::Relaxed);
            }
            fn on_stale_tolerated(&self, _service: &str, _operation: &str) {}
            fn on_action_ignored(&self, _service: &str, _operation: &str) {
                self.ignored.fetch_add(1, Ordering::Relaxed);
            }
        }

        let observer = Arc::new(Recording::default());
        let cache = cache().with_observer(observer.clone());

        cache.dispatch(Action::pending("PAYUTC", "getWalletDetails"));
        cache.dispatch(Action::fulfilled("PAYUTC", "getWalletDetails", json!([]), 200));
        cache.dispatch(Action::rejected("CAS", "login", json!(null), 401));
        cache.dispatch(Action::pending("GINGER", "getInformation"));

        assert_eq!(observer.started.load(Ordering::Relaxed), 1);
        assert_eq!(observer.succeeded.load(Ordering::Relaxed), 1);
        assert_eq!(observer.failed.load(Ordering::Relaxed), 1);
        assert_eq!(observer.ignored.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_subscribers_see_new_versions() {
        let cache = cache();
        let mut rx = cache.subscribe();

        cache.dispatch(Action::pending("PAYUTC", "getWalletDetails"));

        rx.changed().await.unwrap();
        assert!(rx.borrow().store("PAYUTC", "getWalletDetails").is_fetching());
    }

    #[tokio::test]
    async fn test_ignored_actions_do_not_wake_subscribers() {
        let cache = cache();
        let rx = cache.subscribe();

        cache.dispatch(Action::pending("GINGER", "getInformation"));

        assert!(!rx.has_changed().unwrap());
    }
}
