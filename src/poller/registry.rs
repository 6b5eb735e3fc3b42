use std::{
    collections::HashMap,
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

use crate::types::BlockEvent;

/// Unique identity of a [`Subscription`] for the lifetime of its registry.
///
/// Ids are allocated from a monotonic counter; they are never reused.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// A registered subscription, returned by
/// [`EventPoller::subscribe`](crate::EventPoller::subscribe).
///
/// Holds the consuming end of the delivery channel. The poller blocks on the
/// channel when it is full, so an undrained subscription stalls dispatch for
/// its tick; dropping the `Subscription` (or the stream obtained from
/// [`into_stream`](Subscription::into_stream)) makes the poller skip it
/// instead. The registry entry itself is only removed by
/// [`EventPoller::unsubscribe`](crate::EventPoller::unsubscribe).
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    event_types: Vec<String>,
    receiver: mpsc::Receiver<BlockEvent>,
}

impl Subscription {
    /// The unique id of this subscription, needed to unsubscribe.
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// The event types this subscription was registered for, deduplicated in
    /// the order they were given.
    #[must_use]
    pub fn event_types(&self) -> &[String] {
        &self.event_types
    }

    /// Receives the next delivered event, or `None` once the poller has been
    /// dropped.
    pub async fn recv(&mut self) -> Option<BlockEvent> {
        self.receiver.recv().await
    }

    /// Converts the subscription into a [`ReceiverStream`] of events.
    #[must_use]
    pub fn into_stream(self) -> ReceiverStream<BlockEvent> {
        ReceiverStream::new(self.receiver)
    }
}

/// A producer-side entry in the event-type index.
#[derive(Debug, Clone)]
struct RegisteredSender {
    id: SubscriptionId,
    sender: mpsc::Sender<BlockEvent>,
}

/// Maps event types to the subscriptions interested in them.
///
/// Structural mutation (`subscribe`/`unsubscribe`) may happen from any thread
/// while the scheduler is mid-tick; the scheduler isolates itself by copying a
/// [`snapshot`](SubscriptionRegistry::snapshot) out of the lock once per tick
/// and never holds the lock across an await point.
#[derive(Debug)]
pub(crate) struct SubscriptionRegistry {
    /// Event type -> senders in subscription insertion order. A type key is
    /// removed once its last subscription goes away.
    index: RwLock<HashMap<String, Vec<RegisteredSender>>>,
    next_id: AtomicU64,
    buffer_capacity: usize,
}

impl SubscriptionRegistry {
    pub(crate) fn new(buffer_capacity: usize) -> Self {
        Self { index: RwLock::new(HashMap::new()), next_id: AtomicU64::new(1), buffer_capacity }
    }

    /// Creates a subscription for `event_types` and indexes it under each
    /// type. Duplicate types in the input are deduplicated.
    pub(crate) fn subscribe(&self, event_types: Vec<String>) -> Subscription {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (sender, receiver) = mpsc::channel(self.buffer_capacity);

        let mut registered = Vec::with_capacity(event_types.len());
        let mut index = self.index.write();
        for event_type in event_types {
            let entries = index.entry(event_type.clone()).or_default();
            if entries.iter().any(|entry| entry.id == id) {
                continue;
            }
            entries.push(RegisteredSender { id, sender: sender.clone() });
            registered.push(event_type);
        }
        drop(index);

        debug!(id = %id, event_types = ?registered, "subscription registered");

        Subscription { id, event_types: registered, receiver }
    }

    /// Removes the subscription with `id` from the index entries for each of
    /// `event_types`. A type the id is not registered under is a no-op.
    pub(crate) fn unsubscribe(&self, id: SubscriptionId, event_types: &[String]) {
        let mut index = self.index.write();
        for event_type in event_types {
            let Some(entries) = index.get_mut(event_type) else {
                continue;
            };
            entries.retain(|entry| entry.id != id);
            if entries.is_empty() {
                index.remove(event_type);
            }
        }
        drop(index);

        debug!(id = %id, event_types = ?event_types, "subscription removed");
    }

    /// Copies the current index out of the lock: every subscribed event type
    /// together with the senders registered for it, in insertion order.
    pub(crate) fn snapshot(&self) -> Vec<(String, Vec<mpsc::Sender<BlockEvent>>)> {
        self.index
            .read()
            .iter()
            .map(|(event_type, entries)| {
                (
                    event_type.clone(),
                    entries.iter().map(|entry| entry.sender.clone()).collect(),
                )
            })
            .collect()
    }

    #[cfg(test)]
    fn type_count(&self) -> usize {
        self.index.read().len()
    }
}
