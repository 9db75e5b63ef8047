//! Per-service container of operation stores

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::store::ResourceStore;

/// Mapping from operation name to its [`ResourceStore`].
///
/// Reads never fail: unknown operations synthesize a defaulted store.
/// Writes are copy-on-write at the container level, so sibling operations
/// keep their `Arc` identity across state versions. Consumers rely on this
/// structural sharing for cheap change detection.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ServiceState {
    stores: HashMap<Box<str>, Arc<ResourceStore>>,
}

impl ServiceState {
    /// Empty container; stores materialize lazily on first touch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store for `operation`, or a fresh default if it was never touched.
    pub fn get(&self, operation: &str) -> Arc<ResourceStore> {
        self.stores.get(operation).cloned().unwrap_or_default()
    }

    /// Store for `operation`, materializing and retaining the default when
    /// absent.
    pub fn get_or_create(&mut self, operation: &str) -> Arc<ResourceStore> {
        self.stores.entry(operation.into()).or_default().clone()
    }

    /// New container with `operation` replaced by `store`. Every sibling
    /// entry shares its `Arc` with `self`.
    pub fn with_store(&self, operation: &str, store: ResourceStore) -> Self {
        let mut stores = self.stores.clone();
        stores.insert(operation.into(), Arc::new(store));
        Self { stores }
    }

    /// Operation names with a materialized store.
    pub fn operations(&self) -> impl Iterator<Item = &str> + '_ {
        self.stores.keys().map(AsRef::as_ref)
    }

    /// Number of materialized stores.
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    /// True when no store has been materialized yet.
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Clone-mutate-replace on one store. The mutation runs on a private
    /// copy, never on a store shared with a previous state version.
    pub(crate) fn update(&mut self, operation: &str, f: impl FnOnce(&mut ResourceStore)) {
        let mut store = self
            .stores
            .get(operation)
            .map(|s| (**s).clone())
            .unwrap_or_default();
        f(&mut store);
        self.stores.insert(operation.into(), Arc::new(store));
    }
}
