//! # Dispatcher
//!
//! The serving half of a call: decodes a Call frame, resolves the target
//! binding, lets the stored adapter run the implementation, and encodes the
//! outcome as a Reply frame.
//!
//! `handle` never fails. Anything that goes wrong, including a payload that
//! is not a frame at all, becomes a failure reply the caller can decode.

use std::sync::Arc;

use tracing::debug;
use tracing::warn;
use twinrpc::Call;
use twinrpc::Failure;
use twinrpc::Frame;
use twinrpc::Reply;

use crate::error::Error;
use crate::registry::Registry;

#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Serves one encoded call and returns the encoded reply.
    pub async fn handle(&self, payload: &[u8]) -> Vec<u8> {
        let reply = match Frame::decode(payload) {
            Ok(Frame::Call(call)) => self.dispatch(call).await,
            Ok(Frame::Reply(reply)) => Reply::failure(
                reply.seq,
                Failure::ProtocolViolation("Received Reply frame where a Call was expected".into()),
            ),
            Err(e) => {
                warn!(error = %e, bytes = payload.len(), "Undecodable call frame");
                let seq = twinrpc::decode_seq(payload).unwrap_or(0);
                Reply::failure(seq, Failure::ProtocolViolation(e.to_string()))
            }
        };

        let seq = reply.seq;
        match Frame::Reply(reply).encode() {
            Ok(bytes) => bytes,
            Err(e) => {
                // Typically a response nested too deep to encode. A flat Codec
                // reply always encodes, so the empty fallback is unreachable.
                warn!(seq, error = %e, "Reply could not be encoded");
                let bytes = Frame::Reply(Reply::failure(seq, Failure::Codec(e.to_string())))
                    .encode()
                    .unwrap_or_default();
                debug_assert!(!bytes.is_empty(), "flat failure reply failed to encode");
                bytes
            }
        }
    }

    async fn dispatch(&self, call: Call) -> Reply {
        let Call { seq, name, capability, method, request } = call;

        let binding = match self.registry.resolve(&name) {
            Ok(binding) => binding,
            Err(Error::Closed) => return Reply::failure(seq, Failure::Closed),
            Err(_) => return Reply::failure(seq, Failure::NameNotFound(name)),
        };

        let found = binding.capability().to_string();
        if found != capability {
            return Reply::failure(seq, Failure::TypeMismatch { expected: capability, found });
        }

        debug!(seq, binding = %name, method = %method, owner = %binding.owner(), "Dispatching call");

        match binding.implementation().serve(&method, request).await {
            Ok(response) => Reply::ok(seq, response),
            Err(e) => {
                debug!(seq, binding = %name, method = %method, error = %e, "Call failed");
                Reply::failure(seq, failure(e))
            }
        }
    }
}

/// Maps a serving-side error to what crosses the relay.
///
/// Only the adapter's own refusals keep their kind. Anything else came out of
/// the implementation and travels as a description, so a nested call's
/// `NameNotFound` never masquerades as the caller's.
fn failure(error: Error) -> Failure {
    match error {
        Error::UnknownMethod { method, .. } => Failure::UnknownMethod(method),
        Error::CodecFailure(msg) => Failure::Codec(msg),
        Error::Service(description) => Failure::Remote(description),
        other => Failure::Remote(other.to_string()),
    }
}
