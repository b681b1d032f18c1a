//! # Bridge
//!
//! One side's view of the shared registry: `set`, `get` and `remove` as the
//! runtime on that side sees them.
//!
//! Both bridges of a pair share one `Registry`. A proxy handed out by `get`
//! carries this bridge's relay, so calls it makes travel to the serving side
//! the same way no matter which side published the implementation.

use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::time::Duration;

use tracing::debug;

use crate::adapter::Adapter;
use crate::adapter::Published;
use crate::capability::Side;
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::proxy::CallHandle;
use crate::registry::Registry;
use crate::relay::CallRelay;
use crate::relay::DirectRelay;

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub side: Side,
    /// Upper bound on a single proxy call. `None` waits indefinitely.
    pub call_timeout: Option<Duration>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            side: Side::new("host"),
            call_timeout: None,
        }
    }
}

#[derive(Clone)]
pub struct Bridge {
    config: BridgeConfig,
    registry: Arc<Registry>,
    relay: Arc<dyn CallRelay>,
    seq: Arc<AtomicU64>,
}

impl Bridge {
    /// A host-side bridge serving calls inline.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::builder(registry).build()
    }

    pub fn builder(registry: Arc<Registry>) -> BridgeBuilder {
        BridgeBuilder::new(registry)
    }

    pub fn side(&self) -> &Side {
        &self.config.side
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Publishes `implementation` under `name`, replacing any previous binding.
    ///
    /// Proxies obtained earlier for `name` reach the new implementation on
    /// their next call.
    pub fn set<A: Adapter>(&self, name: &str, adapter: A, implementation: Arc<A::Service>) -> Result<()> {
        let capability = adapter.capability();
        let published = Arc::new(Published::new(adapter, implementation));
        self.registry.publish(name, capability, self.config.side.clone(), published)
    }

    /// Returns a proxy implementing the adapter's capability for `name`.
    ///
    /// The name does not have to be bound yet; a proxy for an unbound name
    /// fails with `NameNotFound` when called. A name already bound to another
    /// capability fails here with `BindingTypeMismatch`.
    pub fn get<A: Adapter>(&self, name: &str, adapter: A) -> Result<Arc<A::Service>> {
        let capability = adapter.capability();
        self.registry.expect(name, capability)?;
        debug!(binding = name, side = %self.config.side, %capability, "Proxy created");

        Ok(adapter.outbound(CallHandle {
            name: name.to_string(),
            capability,
            caller: self.config.side.clone(),
            registry: self.registry.clone(),
            relay: self.relay.clone(),
            seq: self.seq.clone(),
            timeout: self.config.call_timeout,
        }))
    }

    /// Tears down the binding for `name`.
    pub fn remove(&self, name: &str) -> Result<()> {
        self.registry.remove(name)
    }

    /// Closes the shared registry, for this bridge and its peer alike.
    pub fn close(&self) {
        debug!(side = %self.config.side, "Bridge closing");
        self.registry.close();
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("config", &self.config)
            .field("bindings", &self.registry.names())
            .finish()
    }
}

/// Fluent builder for a bridge endpoint.
pub struct BridgeBuilder {
    registry: Arc<Registry>,
    config: BridgeConfig,
    relay: Option<Arc<dyn CallRelay>>,
}

impl BridgeBuilder {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            config: BridgeConfig::default(),
            relay: None,
        }
    }

    pub fn side(mut self, side: impl Into<String>) -> Self {
        self.config.side = Side::new(side);
        self
    }

    pub fn relay(mut self, relay: Arc<dyn CallRelay>) -> Self {
        self.relay = Some(relay);
        self
    }

    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.config.call_timeout = Some(timeout);
        self
    }

    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Bridge {
        let relay: Arc<dyn CallRelay> = match self.relay {
            Some(relay) => relay,
            None => Arc::new(DirectRelay::new(Dispatcher::new(self.registry.clone()))),
        };

        Bridge {
            config: self.config,
            registry: self.registry,
            relay,
            seq: Arc::new(AtomicU64::new(1)),
        }
    }
}
