//! Service registration trait

/// How the reducer engine treats an operation's completions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationKind {
    /// Completions replace the store's data wholesale.
    Plain,
    /// Completions merge into the store's own data, bounded by its cursor.
    Incremental,
    /// A poll operation: completions merge into the named base operation's
    /// store, and only status flags and code land on the poll's own store.
    RefreshInto(&'static str),
}

/// An external service collaborator, registered with the cache by its
/// stable `TYPE` identifier.
///
/// The engine depends on nothing else about the service: the identifier is
/// both the namespace key in the state tree and the match target for the
/// `SERVICE` component of action identities.
///
/// # Example
///
/// ```rust,ignore
/// struct Payments;
///
/// impl Service for Payments {
///     fn service_type(&self) -> &'static str {
///         "PAYUTC"
///     }
///
///     fn operation_kind(&self, operation: &str) -> OperationKind {
///         match operation {
///             "getHistory" => OperationKind::Incremental,
///             "getLastHistory" => OperationKind::RefreshInto("getHistory"),
///             _ => OperationKind::Plain,
///         }
///     }
/// }
/// ```
pub trait Service: Send + Sync + 'static {
    /// Stable namespace identifier (the `SERVICE` identity component).
    fn service_type(&self) -> &'static str;

    /// How each operation's completions are applied.
    /// Default: every operation is plain.
    fn operation_kind(&self, _operation: &str) -> OperationKind {
        OperationKind::Plain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Auth;

    impl Service for Auth {
        fn service_type(&self) -> &'static str {
            "CAS"
        }
    }

    #[test]
    fn test_operations_default_to_plain() {
        assert_eq!(Auth.operation_kind("login"), OperationKind::Plain);
        assert_eq!(Auth.service_type(), "CAS");
    }
}
