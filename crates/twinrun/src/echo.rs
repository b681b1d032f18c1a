//! # Echo service
//!
//! The reference capability: a single `echo` method, the greeting
//! implementation both sides publish, and the entry points the embedded
//! runtime drives the bridge with.

use std::sync::Arc;

use twinpack::Fields;
use twinpack::Record;
use twinpack::Value;
use twinpack::Wire;

use crate::adapter;
use crate::adapter::Adapter;
use crate::bridge::Bridge;
use crate::capability::Capability;
use crate::entry::EntryPoints;
use crate::error::Result;
use crate::proxy::CallHandle;

pub const ECHO: Capability = Capability::new("EchoService", &["echo"]);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoRequest {
    pub message: String,
}

impl EchoRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl Wire for EchoRequest {
    fn to_value(&self) -> Value {
        Record::new().field("message", &self.message).build()
    }

    fn from_value(value: Value) -> twinpack::Result<Self> {
        Ok(Self { message: Fields::new(value)?.take("message")? })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoResponse {
    pub message: String,
}

impl Wire for EchoResponse {
    fn to_value(&self) -> Value {
        Record::new().field("message", &self.message).build()
    }

    fn from_value(value: Value) -> twinpack::Result<Self> {
        Ok(Self { message: Fields::new(value)?.take("message")? })
    }
}

#[async_trait::async_trait]
pub trait EchoService: Send + Sync {
    async fn echo(&self, request: EchoRequest) -> Result<EchoResponse>;
}

/// Answers `"<greeting> from <side>, <message>"`.
#[derive(Debug, Clone)]
pub struct Echoer {
    greeting: String,
    side: String,
}

impl Echoer {
    pub fn new(greeting: impl Into<String>, side: impl Into<String>) -> Self {
        Self {
            greeting: greeting.into(),
            side: side.into(),
        }
    }
}

#[async_trait::async_trait]
impl EchoService for Echoer {
    async fn echo(&self, request: EchoRequest) -> Result<EchoResponse> {
        Ok(EchoResponse {
            message: format!("{} from {}, {}", self.greeting, self.side, request.message),
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EchoAdapter;

#[async_trait::async_trait]
impl Adapter for EchoAdapter {
    type Service = dyn EchoService;

    fn capability(&self) -> Capability {
        ECHO
    }

    async fn serve(&self, service: &Self::Service, method: &str, request: Value) -> Result<Value> {
        match method {
            "echo" => {
                let request = adapter::decode(request)?;
                let response = service.echo(request).await.map_err(adapter::service_failure)?;
                Ok(adapter::encode(&response))
            }
            other => Err(adapter::unknown_method(ECHO, other)),
        }
    }

    fn outbound(&self, handle: CallHandle) -> Arc<dyn EchoService> {
        Arc::new(EchoProxy { handle })
    }
}

struct EchoProxy {
    handle: CallHandle,
}

#[async_trait::async_trait]
impl EchoService for EchoProxy {
    async fn echo(&self, request: EchoRequest) -> Result<EchoResponse> {
        let response = self.handle.call("echo", adapter::encode(&request)).await?;
        adapter::decode(response)
    }
}

/// Publishes `helloService` and `yoService` from the bridge's side.
pub fn prepare_bridges(bridge: &Bridge) -> Result<()> {
    let side = bridge.side().as_str();
    let hello: Arc<dyn EchoService> = Arc::new(Echoer::new("hello", side));
    let yo: Arc<dyn EchoService> = Arc::new(Echoer::new("yo", side));
    bridge.set("helloService", EchoAdapter, hello)?;
    bridge.set("yoService", EchoAdapter, yo)?;
    Ok(())
}

/// Calls `supService` on the other side and reports what came back.
pub async fn call_sup_service(bridge: &Bridge, message: String) -> Result<String> {
    let sup = bridge.get("supService", EchoAdapter)?;
    let response = sup.echo(EchoRequest { message }).await?;
    Ok(format!("{} received '{}'", bridge.side(), response.message))
}

async fn prepare_bridges_entry(bridge: Bridge, _input: Value) -> Result<Value> {
    prepare_bridges(&bridge)?;
    Ok(Value::Unit)
}

async fn call_sup_service_entry(bridge: Bridge, input: Value) -> Result<Value> {
    let message = adapter::decode(input)?;
    call_sup_service(&bridge, message).await.map(Value::Str)
}

/// `prepareBridges` and `callSupService`.
pub fn entry_points() -> EntryPoints {
    let mut entries = EntryPoints::new();
    entries
        .register("prepareBridges", prepare_bridges_entry)
        .register("callSupService", call_sup_service_entry);
    entries
}
