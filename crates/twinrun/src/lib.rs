//! # twinrun
//!
//! A typed, name-keyed call bridge between a host runtime and a runtime
//! embedded in it. Either side publishes an implementation of a capability
//! under a name; either side obtains a proxy for a name and calls it as if it
//! were local. Calls travel as `twinrpc` frames over a `CallRelay`.
//!
//! ```no_run
//! # async fn demo() -> twinrun::Result<()> {
//! use std::sync::Arc;
//! use twinrun::echo::{EchoAdapter, EchoRequest, EchoService, Echoer};
//!
//! let (host, guest) = twinrun::local::pair("host", "guest");
//! let hello: Arc<dyn EchoService> = Arc::new(Echoer::new("hello", "guest"));
//! guest.set("helloService", EchoAdapter, hello)?;
//!
//! let proxy = host.get("helloService", EchoAdapter)?;
//! let reply = proxy.echo(EchoRequest::new("world")).await?;
//! assert_eq!(reply.message, "hello from guest, world");
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod bridge;
pub mod capability;
pub mod channel;
pub mod dispatch;
pub mod echo;
pub mod entry;
pub mod error;
pub mod local;
pub mod logging;
pub mod proxy;
pub mod registry;
pub mod relay;

pub use adapter::Adapter;
pub use bridge::Bridge;
pub use bridge::BridgeBuilder;
pub use bridge::BridgeConfig;
pub use capability::Capability;
pub use capability::Side;
pub use entry::EntryPoints;
pub use error::Error;
pub use error::Result;
pub use proxy::CallHandle;
pub use registry::Registry;
pub use relay::CallRelay;
pub use relay::RelayError;
