//! # Entry Points
//!
//! An explicit, inspectable table of the named operations the embedded
//! runtime can invoke on the host. Nothing is discovered by reflection:
//! an operation exists when it has been registered here.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::debug;
use tracing::warn;
use twinpack::Value;

use crate::bridge::Bridge;
use crate::error::Error;
use crate::error::Result;

type EntryFn = Arc<dyn Fn(Bridge, Value) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

#[derive(Clone, Default)]
pub struct EntryPoints {
    entries: BTreeMap<String, EntryFn>,
}

impl EntryPoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `f` under `name`. A later registration under the same name wins.
    pub fn register<F, Fut>(&mut self, name: &str, f: F) -> &mut Self
    where
        F: Fn(Bridge, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        let entry: EntryFn = Arc::new(move |bridge, input| f(bridge, input).boxed());
        if self.entries.insert(name.to_string(), entry).is_some() {
            warn!(entry = name, "Entry point replaced");
        }
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Runs the entry point `name` against `bridge`.
    pub async fn invoke(&self, name: &str, bridge: &Bridge, input: Value) -> Result<Value> {
        let entry = self
            .entries
            .get(name)
            .cloned()
            .ok_or_else(|| Error::EntryPointNotFound(name.to_string()))?;

        debug!(entry = name, side = %bridge.side(), "Invoking entry point");
        entry(bridge.clone(), input).await
    }
}

impl std::fmt::Debug for EntryPoints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries.keys()).finish()
    }
}
