//! # Bridge errors
//!
//! Every failure a caller of `set`, `get`, `remove` or a proxy method can see.
//! None of them are fatal to the registry: it stays usable after any of these.

use crate::relay::RelayError;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// No live binding under this name (never set, or removed).
    NameNotFound(String),
    /// The caller's adapter and the publisher's disagree on the capability.
    BindingTypeMismatch { name: String, expected: String, found: String },
    /// The remote implementation failed. Only its description crosses the boundary.
    RemoteCallFailure { name: String, method: String, description: String },
    /// A request or response could not be converted to or from the wire.
    CodecFailure(String),
    /// The method is not part of the capability.
    UnknownMethod { capability: String, method: String },
    /// Names must contain something other than whitespace.
    InvalidName(String),
    /// The registry was torn down.
    Closed,
    /// The relay could not move the call.
    Relay(RelayError),
    /// A frame was malformed or did not answer the call that was sent.
    Protocol(twinrpc::Error),
    /// No entry point is registered under this name.
    EntryPointNotFound(String),
    /// Raised by a service implementation.
    Service(String),
}

impl Error {
    /// Failure raised from inside a service implementation.
    pub fn service(description: impl Into<String>) -> Self {
        Self::Service(description.into())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameNotFound(name) => write!(f, "No binding named '{}'", name),
            Self::BindingTypeMismatch { name, expected, found } => write!(
                f,
                "Binding '{}' has capability {}, caller expects {}",
                name, found, expected
            ),
            Self::RemoteCallFailure { name, method, description } => {
                write!(f, "Remote call {}.{} failed: {}", name, method, description)
            }
            Self::CodecFailure(msg) => write!(f, "Codec failure: {}", msg),
            Self::UnknownMethod { capability, method } => {
                write!(f, "Capability {} has no method '{}'", capability, method)
            }
            Self::InvalidName(name) => write!(f, "Invalid binding name: {:?}", name),
            Self::Closed => write!(f, "Bridge registry is closed"),
            Self::Relay(e) => write!(f, "Relay error: {}", e),
            Self::Protocol(e) => write!(f, "Protocol error: {}", e),
            Self::EntryPointNotFound(name) => write!(f, "Entry point not found: {}", name),
            Self::Service(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Relay(e) => Some(e),
            Self::Protocol(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RelayError> for Error {
    fn from(e: RelayError) -> Self {
        Self::Relay(e)
    }
}

impl From<twinpack::Error> for Error {
    fn from(e: twinpack::Error) -> Self {
        Self::CodecFailure(e.to_string())
    }
}

impl From<twinrpc::Error> for Error {
    fn from(e: twinrpc::Error) -> Self {
        match e {
            twinrpc::Error::Serialization(e) => Self::CodecFailure(e.to_string()),
            other => Self::Protocol(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
