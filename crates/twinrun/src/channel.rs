//! # Channel Relay with Async Pump
//!
//! Carries calls to a serving task over tokio channels, the way calls would
//! cross into an embedded runtime running on its own executor.
//!
//! The serving task dispatches every call on its own task, so an
//! implementation that calls back across the bridge cannot deadlock it.
//! A pump task correlates replies with pending calls by a relay-local id;
//! the payloads themselves are never inspected.

use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tokio::task::AbortHandle;
use tracing::trace;
use tracing::warn;

use crate::dispatch::Dispatcher;
use crate::relay;
use crate::relay::CallRelay;
use crate::relay::RelayError;

type Pending = DashMap<u64, oneshot::Sender<relay::Result<Vec<u8>>>>;

struct PendingGuard<'a> {
    pending: &'a Pending,
    id: u64,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.pending.remove(&self.id);
    }
}

pub struct ChannelRelay {
    peer_name: String,
    tx: mpsc::UnboundedSender<(u64, Vec<u8>)>,
    pending: Arc<Pending>,
    next_id: AtomicU64,
    serving: AbortHandle,
}

impl ChannelRelay {
    /// Spawns the serving task for `dispatcher` and the reply pump.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(peer_name: impl Into<String>, dispatcher: Dispatcher) -> Self {
        let peer_name = peer_name.into();
        let (call_tx, mut call_rx) = mpsc::unbounded_channel::<(u64, Vec<u8>)>();
        let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<(u64, Vec<u8>)>();

        let serving = tokio::spawn(async move {
            while let Some((id, payload)) = call_rx.recv().await {
                let dispatcher = dispatcher.clone();
                let reply_tx = reply_tx.clone();
                tokio::spawn(async move {
                    let reply = dispatcher.handle(&payload).await;
                    let _ = reply_tx.send((id, reply));
                });
            }
        })
        .abort_handle();

        let pending: Arc<Pending> = Arc::new(DashMap::new());
        let pump_pending = pending.clone();
        let pump_peer = peer_name.clone();

        tokio::spawn(async move {
            while let Some((id, reply)) = reply_rx.recv().await {
                match pump_pending.remove(&id) {
                    Some((_, tx)) => {
                        let _ = tx.send(Ok(reply));
                    }
                    None => trace!(peer = %pump_peer, id, "Dropping reply for abandoned call"),
                }
            }

            // Every sender is gone: the serving side will never answer again.
            let lost = RelayError::ConnectionLost(format!("{} stopped serving", pump_peer));
            Self::notify_all_pending(&pump_pending, &pump_peer, lost);
        });

        Self {
            peer_name,
            tx: call_tx,
            pending,
            next_id: AtomicU64::new(1),
            serving,
        }
    }

    pub fn peer_name(&self) -> &str {
        &self.peer_name
    }

    /// Calls still waiting for a reply.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Stops the serving task. Calls already being served still complete;
    /// queued and later calls fail with `ConnectionLost`.
    pub fn disconnect(&self) {
        self.serving.abort();
    }

    fn notify_all_pending(pending: &Pending, peer: &str, error: RelayError) {
        let keys: Vec<u64> = pending.iter().map(|e| *e.key()).collect();
        if !keys.is_empty() {
            warn!(peer, calls = keys.len(), error = %error, "Failing pending calls");
        }
        for key in keys {
            if let Some((_, tx)) = pending.remove(&key) {
                let _ = tx.send(Err(error.clone()));
            }
        }
    }
}

#[async_trait::async_trait]
impl CallRelay for ChannelRelay {
    async fn call(&self, payload: &[u8]) -> relay::Result<Vec<u8>> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.pending.insert(id, tx);
        // Removes the entry however the call ends, including when the caller
        // stops polling (a timeout) before the reply arrives.
        let _guard = PendingGuard { pending: &self.pending, id };

        if self.tx.send((id, payload.to_vec())).is_err() {
            return Err(RelayError::ConnectionLost(format!(
                "{} is not serving",
                self.peer_name
            )));
        }

        match rx.await {
            Ok(result) => result,
            Err(_) => Err(RelayError::ConnectionLost(format!(
                "{} dropped the call",
                self.peer_name
            ))),
        }
    }
}
