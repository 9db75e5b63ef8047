//! Per-service reducer engine

use std::sync::Arc;

use crate::action::{Action, Payload, Phase, STALE_TOLERATE};
use crate::container::ServiceState;
use crate::merge::apply_page;
use crate::service::{OperationKind, Service};
use crate::store::ResourceStore;

/// Pure transition engine for one registered service.
///
/// Each invocation maps `(state, action)` to a new state with no I/O and no
/// suspension points. Phase ordering (`PENDING` before its completion) is
/// the dispatcher's responsibility; overlapping requests for one operation
/// resolve last-writer-wins.
pub struct ReducerEngine {
    service: Arc<dyn Service>,
}

impl ReducerEngine {
    /// Engine for `service`, keyed by its stable type identifier.
    pub fn new(service: Arc<dyn Service>) -> Self {
        Self { service }
    }

    /// The `SERVICE` identity component this engine answers to.
    pub fn service_type(&self) -> &'static str {
        self.service.service_type()
    }

    /// True when `action` belongs to this engine's service.
    pub fn matches(&self, action: &Action) -> bool {
        action.service() == self.service_type()
    }

    /// Apply one action. Actions for other services, and completions that
    /// carry no payload, pass the state through untouched; neither is an
    /// error. Stores materialize lazily on first touch and are never
    /// deleted.
    pub fn reduce(&self, state: &ServiceState, action: &Action) -> ServiceState {
        if !self.matches(action) {
            return state.clone();
        }

        let operation = action.operation();
        let mut next = state.clone();

        match (action.phase(), action.payload()) {
            (Phase::Pending, _) => {
                // A poll's PENDING also flags its base, without touching
                // the base's data or cursor.
                if let OperationKind::RefreshInto(base) = self.service.operation_kind(operation) {
                    next.update(base, mark_pending);
                }
                next.update(operation, mark_pending);
            }
            (phase, Some(payload)) => self.complete(&mut next, operation, phase, payload),
            (_, None) => {
                tracing::debug!(
                    service = self.service_type(),
                    operation,
                    "completion without payload ignored"
                );
                return state.clone();
            }
        }

        next
    }

    fn complete(&self, next: &mut ServiceState, operation: &str, phase: Phase, payload: &Payload) {
        // Soft success: the previously cached data stays authoritative,
        // for either disposition.
        if payload.code == STALE_TOLERATE {
            next.update(operation, |store| {
                store.fetching = false;
                store.fetched = true;
            });
            return;
        }

        let succeeded = phase == Phase::Fulfilled;
        match self.service.operation_kind(operation) {
            OperationKind::Plain => next.update(operation, |store| {
                store.data = Some(payload.data.clone());
                settle(store, succeeded, payload.code);
            }),
            OperationKind::Incremental => next.update(operation, |store| {
                apply_page(store, &payload.data);
                settle(store, succeeded, payload.code);
            }),
            OperationKind::RefreshInto(base) => {
                next.update(base, |store| {
                    apply_page(store, &payload.data);
                    settle(store, succeeded, payload.code);
                });
                next.update(operation, |store| settle(store, succeeded, payload.code));
            }
        }
    }
}

fn mark_pending(store: &mut ResourceStore) {
    store.fetching = true;
    store.fetched = false;
    store.failed = false;
    store.code = None;
}

fn settle(store: &mut ResourceStore, succeeded: bool, code: u16) {
    store.fetching = false;
    store.fetched = succeeded;
    store.failed = !succeeded;
    store.code = Some(code);
}
