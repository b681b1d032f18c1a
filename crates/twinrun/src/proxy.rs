//! # Call Handles
//!
//! The untyped core of every proxy. A handle remembers a *name*, never a
//! binding: each call resolves the name afresh, so rebinding, removal and
//! capability changes are all observed by proxies obtained earlier.
//!
//! ## Invariants
//!
//! - Reply sequence numbers must match call sequence numbers.
//! - Only Reply frames are accepted; a Call frame in reply is a protocol violation.
//! - Remote failures arrive as descriptions only.

use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;

use tracing::trace;
use twinpack::Value;
use twinrpc::Call;
use twinrpc::Failure;
use twinrpc::Frame;

use crate::capability::Capability;
use crate::capability::Side;
use crate::error::Error;
use crate::error::Result;
use crate::registry::Registry;
use crate::relay::CallRelay;
use crate::relay::RelayError;

#[derive(Clone)]
pub struct CallHandle {
    pub(crate) name: String,
    pub(crate) capability: Capability,
    pub(crate) caller: Side,
    pub(crate) registry: Arc<Registry>,
    pub(crate) relay: Arc<dyn CallRelay>,
    pub(crate) seq: Arc<AtomicU64>,
    pub(crate) timeout: Option<Duration>,
}

impl CallHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// Invokes `method` on whatever implementation `name` is bound to right now.
    pub async fn call(&self, method: &str, request: Value) -> Result<Value> {
        if !self.capability.has_method(method) {
            return Err(Error::UnknownMethod {
                capability: self.capability.to_string(),
                method: method.to_string(),
            });
        }

        let binding = self.registry.resolve(&self.name)?;
        if binding.capability() != self.capability {
            return Err(Error::BindingTypeMismatch {
                name: self.name.clone(),
                expected: self.capability.to_string(),
                found: binding.capability().to_string(),
            });
        }

        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let payload = Frame::Call(Call {
            seq,
            name: self.name.clone(),
            capability: self.capability.to_string(),
            method: method.to_string(),
            request,
        })
        .encode()?;

        trace!(seq, binding = %self.name, method, caller = %self.caller, bytes = payload.len(), "Call sent");

        let response = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.relay.call(&payload))
                .await
                .map_err(|_| RelayError::Timeout)??,
            None => self.relay.call(&payload).await?,
        };

        match Frame::decode(&response).map_err(Error::Protocol)? {
            Frame::Call(_) => Err(Error::Protocol(twinrpc::Error::ProtocolViolation(
                "Received Call frame while waiting for Reply".into(),
            ))),
            Frame::Reply(reply) => {
                if reply.seq != seq {
                    return Err(Error::Protocol(twinrpc::Error::ProtocolViolation(format!(
                        "Sequence mismatch: sent {}, received {}",
                        seq, reply.seq
                    ))));
                }
                trace!(seq, ok = reply.outcome.is_ok(), "Reply received");
                reply.outcome.map_err(|failure| self.failure(method, failure))
            }
        }
    }

    fn failure(&self, method: &str, failure: Failure) -> Error {
        match failure {
            Failure::NameNotFound(name) => Error::NameNotFound(name),
            Failure::TypeMismatch { expected, found } => Error::BindingTypeMismatch {
                name: self.name.clone(),
                expected,
                found,
            },
            Failure::UnknownMethod(method) => Error::UnknownMethod {
                capability: self.capability.to_string(),
                method,
            },
            Failure::Codec(msg) => Error::CodecFailure(msg),
            Failure::Remote(description) => Error::RemoteCallFailure {
                name: self.name.clone(),
                method: method.to_string(),
                description,
            },
            Failure::ProtocolViolation(msg) => {
                Error::Protocol(twinrpc::Error::ProtocolViolation(msg))
            }
            Failure::Closed => Error::Closed,
        }
    }
}

impl std::fmt::Debug for CallHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallHandle")
            .field("name", &self.name)
            .field("capability", &self.capability)
            .field("caller", &self.caller)
            .finish()
    }
}
