//! # Adapters
//!
//! An adapter is the per-capability codec. It knows how to:
//!
//! - serve an encoded method call against a native implementation (`serve`),
//! - wrap a call handle into something implementing the capability (`outbound`).
//!
//! Adapters hold no per-binding state; the registry stores them next to the
//! implementation they serve.

use std::sync::Arc;

use twinpack::Value;
use twinpack::Wire;

use crate::capability::Capability;
use crate::error::Error;
use crate::error::Result;
use crate::proxy::CallHandle;

#[async_trait::async_trait]
pub trait Adapter: Clone + Send + Sync + 'static {
    /// The native interface, usually `dyn SomeService`.
    type Service: ?Sized + Send + Sync + 'static;

    fn capability(&self) -> Capability;

    /// Decodes `request`, invokes `method` on `service` and encodes the result.
    ///
    /// Errors returned by `service` itself should pass through
    /// [`service_failure`] so they reach the caller as a remote failure rather
    /// than as a codec or lookup failure of the outer call.
    async fn serve(&self, service: &Self::Service, method: &str, request: Value) -> Result<Value>;

    /// Builds the proxy handed out by `get`.
    fn outbound(&self, handle: CallHandle) -> Arc<Self::Service>;
}

/// Encodes a native value for the relay.
pub fn encode<T: Wire>(value: &T) -> Value {
    value.to_value()
}

/// Decodes a relayed value, reporting failures as `CodecFailure`.
pub fn decode<T: Wire>(value: Value) -> Result<T> {
    T::from_value(value).map_err(Error::from)
}

/// Wraps an error raised by a service implementation.
///
/// Whatever the implementation hit, including failures of calls it made
/// through its own proxies, becomes `Service` with the error's description.
pub fn service_failure(error: Error) -> Error {
    match error {
        Error::Service(description) => Error::Service(description),
        other => Error::Service(other.to_string()),
    }
}

/// The error an adapter returns for a method its capability does not have.
pub fn unknown_method(capability: Capability, method: &str) -> Error {
    Error::UnknownMethod {
        capability: capability.to_string(),
        method: method.to_string(),
    }
}

/// Type-erased published implementation, as stored in a binding.
#[async_trait::async_trait]
pub(crate) trait Inbound: Send + Sync {
    async fn serve(&self, method: &str, request: Value) -> Result<Value>;
}

pub(crate) struct Published<A: Adapter> {
    adapter: A,
    service: Arc<A::Service>,
}

impl<A: Adapter> Published<A> {
    pub(crate) fn new(adapter: A, service: Arc<A::Service>) -> Self {
        Self { adapter, service }
    }
}

#[async_trait::async_trait]
impl<A: Adapter> Inbound for Published<A> {
    async fn serve(&self, method: &str, request: Value) -> Result<Value> {
        let capability = self.adapter.capability();
        if !capability.has_method(method) {
            return Err(unknown_method(capability, method));
        }
        self.adapter.serve(&self.service, method, request).await
    }
}
