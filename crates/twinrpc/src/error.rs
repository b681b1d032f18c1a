//! # Error Definitions
//!
//! Frame-level failures, and the reasons a serving side reports back.

/// Failures while building or reading a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The underlying Twinpack serialization failed.
    Serialization(twinpack::Error),
    /// An unknown frame kind or failure reason was encountered.
    UnknownVariant(String),
    /// The internal structure of the message was malformed (e.g., missing Sequence header).
    ProtocolViolation(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::UnknownVariant(name) => write!(f, "Unknown variant: {}", name),
            Self::ProtocolViolation(msg) => write!(f, "Protocol violation: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<twinpack::Error> for Error {
    fn from(e: twinpack::Error) -> Self {
        Self::Serialization(e)
    }
}

/// A specialized Result type for frame operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a call produced no response (the "Err" side of a Reply).
///
/// These are distinct from `Error`; these represent the *serving* side refusing
/// or failing the call, whereas `Error` represents the envelope itself being bad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// No live binding exists under the name.
    NameNotFound(String),
    /// The caller and the publisher disagree on the capability.
    TypeMismatch { expected: String, found: String },
    /// The method is not part of the capability.
    UnknownMethod(String),
    /// The request or response could not be converted.
    Codec(String),
    /// The implementation itself failed. Only the description survives the boundary.
    Remote(String),
    /// The call frame could not be read.
    ProtocolViolation(String),
    /// The serving side's registry has been torn down.
    Closed,
}

impl Failure {
    pub(crate) fn as_tag(&self) -> &'static str {
        match self {
            Failure::NameNotFound(_) => "NoName",
            Failure::TypeMismatch { .. } => "BadType",
            Failure::UnknownMethod(_) => "NoMethod",
            Failure::Codec(_) => "Codec",
            Failure::Remote(_) => "Remote",
            Failure::ProtocolViolation(_) => "Protocol",
            Failure::Closed => "Closed",
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Failure::NameNotFound(name) => write!(f, "no binding named '{}'", name),
            Failure::TypeMismatch { expected, found } => {
                write!(f, "capability mismatch: expected {}, found {}", expected, found)
            }
            Failure::UnknownMethod(method) => write!(f, "unknown method '{}'", method),
            Failure::Codec(msg) => write!(f, "codec failure: {}", msg),
            Failure::Remote(msg) => write!(f, "remote failure: {}", msg),
            Failure::ProtocolViolation(msg) => write!(f, "protocol violation: {}", msg),
            Failure::Closed => write!(f, "registry closed"),
        }
    }
}
