//! # Call Relay
//!
//! The carrier that moves an encoded call to the side holding the
//! implementation and brings the encoded reply back.
//!
//! ## Philosophy
//!
//! - **Byte-Oriented**: A relay never interprets the payload. Frames, names
//!   and capabilities are the proxy's and dispatcher's business.
//! - **Request-Response**: One call payload in, one reply payload out.

use std::fmt;

use crate::dispatch::Dispatcher;

/// Failures of the carrier itself, as opposed to failures of the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// The serving side is gone or dropped the call.
    ConnectionLost(String),
    /// No reply arrived within the bridge's call timeout.
    Timeout,
    /// Any other carrier failure.
    Io(String),
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionLost(msg) => write!(f, "Connection lost: {}", msg),
            Self::Timeout => write!(f, "Call timed out"),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for RelayError {}

pub type Result<T> = std::result::Result<T, RelayError>;

/// Sends a call payload and waits for the reply payload.
///
/// Object-safe; bridges hold it as `Arc<dyn CallRelay>`.
#[async_trait::async_trait]
pub trait CallRelay: Send + Sync + 'static {
    async fn call(&self, payload: &[u8]) -> Result<Vec<u8>>;
}

/// Serves every call inline on the caller's task.
///
/// Used when both sides live on the same executor and no hop is wanted.
pub struct DirectRelay {
    dispatcher: Dispatcher,
}

impl DirectRelay {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

#[async_trait::async_trait]
impl CallRelay for DirectRelay {
    async fn call(&self, payload: &[u8]) -> Result<Vec<u8>> {
        Ok(self.dispatcher.handle(payload).await)
    }
}
