//! Client-Side Cache for Asynchronous Remote-Service Calls
//!
//! A normalized, lazily-initialized state tree over the results of remote
//! resource fetches. Each registered service namespaces its operations; each
//! operation's request lifecycle (`PENDING` → `FULFILLED` | `REJECTED`) is
//! tracked in a per-operation [`ResourceStore`] by a pure reducer, with
//! cursor-bounded merging for incrementally paginated resources.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! // 1. Declare your service collaborators
//! struct Payments;
//!
//! impl Service for Payments {
//!     fn service_type(&self) -> &'static str { "PAYUTC" }
//!     fn operation_kind(&self, operation: &str) -> OperationKind {
//!         match operation {
//!             "getHistory" => OperationKind::Incremental,
//!             "getLastHistory" => OperationKind::RefreshInto("getHistory"),
//!             _ => OperationKind::Plain,
//!         }
//!     }
//! }
//!
//! // 2. Register them and build the cache
//! let mut reducer = RootReducer::new();
//! reducer.register(Arc::new(Payments));
//! let cache = ResourceCache::new(reducer);
//!
//! // 3. Drive requests; read through the accessor surface
//! perform(&cache, "PAYUTC", "getWalletDetails", fetch_wallet()).await;
//! let details = cache.state().store("PAYUTC", "getWalletDetails");
//! assert!(details.is_fetched());
//! ```

#![warn(missing_docs)]

// === Core Types ===
mod action;
mod store;

// === State ===
mod container;
mod merge;
mod tree;

// === Engine ===
mod reducer;
mod service;

// === Front ===
mod cache;
mod request;

// === Observability ===
mod observer;
mod stats;

// === Re-exports ===

// Actions
pub use action::{Action, ActionIdentity, IdentityError, Payload, Phase, STALE_TOLERATE};

// State
pub use container::ServiceState;
pub use store::ResourceStore;
pub use tree::{RootReducer, StateTree};

// Engine
pub use reducer::ReducerEngine;
pub use service::{OperationKind, Service};

// Front
pub use cache::ResourceCache;
pub use request::{perform, RequestOutcome};

// Observability
pub use observer::{CacheObserver, NoOpObserver, TracingObserver};
pub use stats::{CacheStats, CacheStatsSnapshot};
