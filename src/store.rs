//! Per-operation resource store

use serde::Serialize;
use serde_json::Value;

/// Cached state for one operation within one service.
///
/// A store is never observed half-built: a never-dispatched operation reads
/// as the default store, and each accessor takes an explicit fallback to
/// return when the underlying field is unset, so unset state never surfaces
/// as a null-shaped error to the consumer.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ResourceStore {
    pub(crate) data: Option<Value>,
    pub(crate) fetching: bool,
    pub(crate) fetched: bool,
    pub(crate) failed: bool,
    pub(crate) code: Option<u16>,
    pub(crate) cursor: Option<Value>,
}

impl ResourceStore {
    /// Last successfully returned payload, or `default` when none yet.
    pub fn data_or<'a>(&'a self, default: &'a Value) -> &'a Value {
        self.data.as_ref().unwrap_or(default)
    }

    /// Last payload, if any completion has delivered one.
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// True while a request for this operation is outstanding; `default`
    /// flows through when the flag is unset.
    pub fn is_fetching_or(&self, default: bool) -> bool {
        self.fetching || default
    }

    /// True while a request for this operation is outstanding.
    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    /// True once at least one request completed with a success-class
    /// outcome; `default` flows through when the flag is unset.
    pub fn is_fetched_or(&self, default: bool) -> bool {
        self.fetched || default
    }

    /// True once at least one request completed successfully.
    pub fn is_fetched(&self) -> bool {
        self.fetched
    }

    /// True if the most recent completed request failed; `default` flows
    /// through when the flag is unset.
    pub fn has_failed_or(&self, default: bool) -> bool {
        self.failed || default
    }

    /// True if the most recent completed request failed.
    pub fn has_failed(&self) -> bool {
        self.failed
    }

    /// Last status code observed, or `default` when none yet.
    pub fn code_or(&self, default: u16) -> u16 {
        self.code.unwrap_or(default)
    }

    /// Last status code observed.
    pub fn code(&self) -> Option<u16> {
        self.code
    }

    /// Identifier of the most recently seen leading record of an
    /// incrementally fetched resource. `None` until data arrives.
    pub fn cursor(&self) -> Option<&Value> {
        self.cursor.as_ref()
    }
}
