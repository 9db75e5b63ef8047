//! Typed actions and the phase decoder

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status code signalling "treat as success, but the payload is not a
/// refresh of the data". The previously cached data stays authoritative.
pub const STALE_TOLERATE: u16 = 523;

/// Lifecycle phase of a remote request, as communicated via an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Request issued, response outstanding.
    Pending,
    /// Request completed successfully.
    Fulfilled,
    /// Request completed with a failure.
    Rejected,
}

impl Phase {
    /// Wire token for this phase.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Fulfilled => "FULFILLED",
            Self::Rejected => "REJECTED",
        }
    }

    /// True for `Fulfilled` and `Rejected`.
    pub fn is_completion(&self) -> bool {
        matches!(self, Self::Fulfilled | Self::Rejected)
    }
}

impl std::str::FromStr for Phase {
    type Err = IdentityError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "PENDING" => Ok(Self::Pending),
            "FULFILLED" => Ok(Self::Fulfilled),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(IdentityError::UnknownPhase(other.into())),
        }
    }
}

/// Failure to decode an action from its wire form.
///
/// Decoding fails closed: the dispatch layer treats every variant as "not
/// for me" and passes the state through, so the reducer path never throws.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// Identity did not have exactly three `_`-separated components.
    #[error("Malformed identity: {0}")]
    Malformed(Box<str>),
    /// One of the three components was empty.
    #[error("Empty component in identity: {0}")]
    EmptyComponent(Box<str>),
    /// The phase token was not `PENDING`, `FULFILLED` or `REJECTED`.
    #[error("Unknown phase token: {0}")]
    UnknownPhase(Box<str>),
    /// A completion phase arrived without its `(data, code)` payload.
    #[error("Completion action without payload: {0}")]
    MissingPayload(Box<str>),
}

/// Decoded identity of an action: which service, which operation, which phase.
///
/// The wire form is `SERVICE_OPERATION_PHASE` with exactly three non-empty
/// components; service and operation names must not contain the separator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionIdentity {
    /// Namespace key of the owning service (the collaborator's `TYPE`).
    pub service: Box<str>,
    /// Operation name within the service, e.g. `getWalletDetails`.
    pub operation: Box<str>,
    /// Lifecycle phase.
    pub phase: Phase,
}

impl ActionIdentity {
    /// Build an identity from its components.
    pub fn new(service: &str, operation: &str, phase: Phase) -> Self {
        Self {
            service: service.into(),
            operation: operation.into(),
            phase,
        }
    }
}

impl std::str::FromStr for ActionIdentity {
    type Err = IdentityError;

    fn from_str(identity: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = identity.split('_').collect();
        match parts.as_slice() {
            [service, operation, token] => {
                if service.is_empty() || operation.is_empty() || token.is_empty() {
                    return Err(IdentityError::EmptyComponent(identity.into()));
                }
                Ok(Self {
                    service: (*service).into(),
                    operation: (*operation).into(),
                    phase: token.parse()?,
                })
            }
            _ => Err(IdentityError::Malformed(identity.into())),
        }
    }
}

impl std::fmt::Display for ActionIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}_{}", self.service, self.operation, self.phase.token())
    }
}

/// The `(data, code)` pair carried by completion actions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    /// Returned document, semantically a sequence or a record.
    pub data: Value,
    /// Transport status code.
    pub code: u16,
}

/// One dispatched action: a decoded identity plus the optional payload.
///
/// Actions are built once, typed, at the action-creation boundary; the
/// string wire form is only parsed at [`Action::from_wire`] for external
/// dispatchers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    identity: ActionIdentity,
    payload: Option<Payload>,
}

impl Action {
    /// Mark a request for `operation` as in flight.
    pub fn pending(service: &str, operation: &str) -> Self {
        Self {
            identity: ActionIdentity::new(service, operation, Phase::Pending),
            payload: None,
        }
    }

    /// Record a successful completion carrying `(data, code)`.
    pub fn fulfilled(service: &str, operation: &str, data: Value, code: u16) -> Self {
        Self {
            identity: ActionIdentity::new(service, operation, Phase::Fulfilled),
            payload: Some(Payload { data, code }),
        }
    }

    /// Record a failed completion. A failed request can still carry a
    /// usable payload in this protocol; it is stored like a success's.
    pub fn rejected(service: &str, operation: &str, data: Value, code: u16) -> Self {
        Self {
            identity: ActionIdentity::new(service, operation, Phase::Rejected),
            payload: Some(Payload { data, code }),
        }
    }

    /// Decode an action from its wire form.
    ///
    /// Fails closed: malformed identities, unknown phase tokens and
    /// payload-less completions are decode errors, never panics.
    pub fn from_wire(identity: &str, payload: Option<(Value, u16)>) -> Result<Self, IdentityError> {
        let identity: ActionIdentity = identity.parse()?;
        let payload = payload.map(|(data, code)| Payload { data, code });
        if identity.phase.is_completion() && payload.is_none() {
            return Err(IdentityError::MissingPayload(identity.to_string().into()));
        }
        Ok(Self { identity, payload })
    }

    /// The decoded identity.
    pub fn identity(&self) -> &ActionIdentity {
        &self.identity
    }

    /// The `SERVICE` component.
    pub fn service(&self) -> &str {
        &self.identity.service
    }

    /// The `OPERATION` component.
    pub fn operation(&self) -> &str {
        &self.identity.operation
    }

    /// The `PHASE` component.
    pub fn phase(&self) -> Phase {
        self.identity.phase
    }

    /// The `(data, code)` payload, present on well-formed completions.
    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }
}
