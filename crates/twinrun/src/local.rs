//! In-process bridge pairs.

use std::sync::Arc;

use crate::bridge::Bridge;
use crate::channel::ChannelRelay;
use crate::dispatch::Dispatcher;
use crate::registry::Registry;

/// Creates a connected pair of bridges over one shared registry.
///
/// Each side's proxies cross a channel to the other side's serving task, so
/// every call is a real asynchronous hop. Must be called from within a
/// tokio runtime.
pub fn pair(host: &str, guest: &str) -> (Bridge, Bridge) {
    pair_with(Arc::new(Registry::new()), host, guest)
}

/// Like `pair`, over an existing registry.
pub fn pair_with(registry: Arc<Registry>, host: &str, guest: &str) -> (Bridge, Bridge) {
    let to_guest = ChannelRelay::spawn(guest, Dispatcher::new(registry.clone()));
    let to_host = ChannelRelay::spawn(host, Dispatcher::new(registry.clone()));

    let host = Bridge::builder(registry.clone())
        .side(host)
        .relay(Arc::new(to_guest))
        .build();
    let guest = Bridge::builder(registry)
        .side(guest)
        .relay(Arc::new(to_host))
        .build();
    (host, guest)
}
