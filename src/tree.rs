//! Top-level state tree and reducer composition

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::action::Action;
use crate::container::ServiceState;
use crate::reducer::ReducerEngine;
use crate::service::Service;
use crate::store::ResourceStore;

/// The normalized top-level state: one container per service namespace.
///
/// Versions share untouched branches, so cloning a tree is cheap and
/// `Arc::ptr_eq` on a namespace tells a consumer whether anything under it
/// changed.
#[derive(Clone, Debug, Default, Serialize)]
pub struct StateTree {
    services: HashMap<Box<str>, Arc<ServiceState>>,
}

impl StateTree {
    /// Container for `service_type`, or an empty one if never touched.
    pub fn service(&self, service_type: &str) -> Arc<ServiceState> {
        self.services.get(service_type).cloned().unwrap_or_default()
    }

    /// Store for one operation under one service, defaulted when absent.
    pub fn store(&self, service_type: &str, operation: &str) -> Arc<ResourceStore> {
        self.service(service_type).get(operation)
    }

    /// New tree with `service_type`'s container replaced; every other
    /// namespace keeps its `Arc` identity.
    pub fn with_service(&self, service_type: &str, state: ServiceState) -> Self {
        let mut services = self.services.clone();
        services.insert(service_type.into(), Arc::new(state));
        Self { services }
    }

    /// Materialized namespace keys.
    pub fn services(&self) -> impl Iterator<Item = &str> + '_ {
        self.services.keys().map(AsRef::as_ref)
    }
}

/// Combines one [`ReducerEngine`] per registered service into a single
/// reducer over the whole tree.
#[derive(Default)]
pub struct RootReducer {
    engines: Vec<ReducerEngine>,
}

impl RootReducer {
    /// Reducer with no services registered yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service collaborator. Its namespace starts empty and its
    /// stores materialize lazily on first touch.
    pub fn register(&mut self, service: Arc<dyn Service>) -> &mut Self {
        self.engines.push(ReducerEngine::new(service));
        self
    }

    /// True when some engine answers to `service_type`.
    pub fn handles(&self, service_type: &str) -> bool {
        self.engines
            .iter()
            .any(|engine| engine.service_type() == service_type)
    }

    /// Tree with an empty container for every registered service.
    pub fn initial_state(&self) -> StateTree {
        let mut tree = StateTree::default();
        for engine in &self.engines {
            tree = tree.with_service(engine.service_type(), ServiceState::new());
        }
        tree
    }

    /// Apply one action across all registered services. Namespaces whose
    /// engine does not match keep their `Arc` identity; an action no engine
    /// answers to leaves the whole tree untouched.
    pub fn reduce(&self, tree: &StateTree, action: &Action) -> StateTree {
        let mut next = tree.clone();
        for engine in &self.engines {
            if !engine.matches(action) {
                continue;
            }
            let slice = next.service(engine.service_type());
            next = next.with_service(engine.service_type(), engine.reduce(&slice, action));
        }
        next
    }
}
