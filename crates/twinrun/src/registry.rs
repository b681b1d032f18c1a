//! # Binding Registry
//!
//! The single name-to-binding table both sides of a bridge consult.
//!
//! A name maps to at most one binding, and every binding in the table is live:
//! a side has published an implementation under it. Asking for a name nobody
//! has published leaves nothing behind.
//!
//! Uses DashMap so both sides can publish, look up and remove concurrently
//! without a global lock. Every lookup is fresh: nothing caches a binding.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use dashmap::DashMap;
use tracing::debug;
use tracing::warn;

use crate::adapter::Inbound;
use crate::capability::Capability;
use crate::capability::Side;
use crate::error::Error;
use crate::error::Result;

/// A name's current association.
#[derive(Clone)]
pub struct Binding {
    name: String,
    capability: Capability,
    owner: Side,
    implementation: Arc<dyn Inbound>,
}

impl Binding {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// The side that published the implementation.
    pub fn owner(&self) -> &Side {
        &self.owner
    }

    pub(crate) fn implementation(&self) -> &Arc<dyn Inbound> {
        &self.implementation
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("name", &self.name)
            .field("capability", &self.capability)
            .field("owner", &self.owner)
            .finish()
    }
}

#[derive(Default)]
pub struct Registry {
    bindings: DashMap<String, Binding>,
    closed: AtomicBool,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `implementation` the binding for `name`, replacing whatever was there.
    pub(crate) fn publish(
        &self,
        name: &str,
        capability: Capability,
        owner: Side,
        implementation: Arc<dyn Inbound>,
    ) -> Result<()> {
        self.check(name)?;

        let binding = Binding {
            name: name.to_string(),
            capability,
            owner: owner.clone(),
            implementation,
        };

        match self.bindings.insert(name.to_string(), binding) {
            Some(previous) if previous.capability != capability => warn!(
                binding = name,
                from = %previous.capability,
                to = %capability,
                "Binding capability changed"
            ),
            Some(_) => debug!(binding = name, %owner, "Binding replaced"),
            None => debug!(binding = name, %owner, %capability, "Binding published"),
        }

        // A close that raced with the insert wins.
        if self.is_closed() {
            self.bindings.remove(name);
            return Err(Error::Closed);
        }
        Ok(())
    }

    /// Checks that a caller may expect `name` to carry `capability`.
    ///
    /// Succeeds when the name is unbound or bound to that capability, and
    /// fails with `BindingTypeMismatch` otherwise. Records nothing: a later
    /// `set` under another capability is caught when the proxy calls.
    pub(crate) fn expect(&self, name: &str, capability: Capability) -> Result<()> {
        self.check(name)?;

        if let Some(binding) = self.bindings.get(name) {
            if binding.capability != capability {
                return Err(Error::BindingTypeMismatch {
                    name: name.to_string(),
                    expected: capability.to_string(),
                    found: binding.capability.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Looks up the binding for `name`.
    pub fn resolve(&self, name: &str) -> Result<Binding> {
        if self.is_closed() {
            return Err(Error::Closed);
        }
        self.bindings
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::NameNotFound(name.to_string()))
    }

    /// Removes the binding for `name`.
    pub fn remove(&self, name: &str) -> Result<()> {
        if self.is_closed() {
            return Err(Error::Closed);
        }
        self.bindings
            .remove(name)
            .ok_or_else(|| Error::NameNotFound(name.to_string()))?;
        debug!(binding = name, "Binding removed");
        Ok(())
    }

    /// Drops every binding. All later operations fail with `Closed`.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!(bindings = self.bindings.len(), "Registry closed");
        }
        self.bindings.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn is_live(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Bound names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bindings.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn check(&self, name: &str) -> Result<()> {
        if self.is_closed() {
            return Err(Error::Closed);
        }
        if name.trim().is_empty() {
            return Err(Error::InvalidName(name.to_string()));
        }
        Ok(())
    }
}
