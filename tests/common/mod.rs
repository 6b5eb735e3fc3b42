use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

use event_poller::{BlockEvents, BlockHeader, ClientError, Event, LedgerClient};
use parking_lot::Mutex;

/// Installs a test-writer tracing subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn test_event(event_type: &str, event_index: u32) -> Event {
    Event {
        event_type: event_type.to_string(),
        transaction_id: [0xab; 32],
        event_index,
        payload: b"payload".to_vec(),
    }
}

fn header_at(height: u64) -> BlockHeader {
    let mut id = [0u8; 32];
    id[..8].copy_from_slice(&height.to_be_bytes());
    let mut parent_id = [0u8; 32];
    parent_id[..8].copy_from_slice(&height.saturating_sub(1).to_be_bytes());
    BlockHeader { id, parent_id, height }
}

#[derive(Default)]
struct Inner {
    head: u64,
    /// Scripted responses for `get_latest_header`, consumed before falling
    /// back to `head`.
    head_script: VecDeque<Result<u64, ClientError>>,
    /// All known events, keyed by the height they were emitted at.
    events: Vec<(u64, Event)>,
    /// Number of upcoming `get_events_for_height_range` calls to fail, per
    /// event type.
    fetch_failures: HashMap<String, usize>,
}

/// A scriptable in-memory [`LedgerClient`].
///
/// Clones share state, so a test can keep one handle for scripting while the
/// poller owns another.
#[derive(Clone, Default)]
pub struct MockLedgerClient {
    inner: Arc<Mutex<Inner>>,
}

impl MockLedgerClient {
    pub fn with_head(head: u64) -> Self {
        let client = Self::default();
        client.set_head(head);
        client
    }

    /// Moves the chain head. Takes effect once any scripted responses have
    /// been consumed.
    pub fn set_head(&self, head: u64) {
        self.inner.lock().head = head;
    }

    /// Queues one response for the next `get_latest_header` call.
    pub fn push_head_result(&self, result: Result<u64, ClientError>) {
        self.inner.lock().head_script.push_back(result);
    }

    /// Records an event as emitted at `height`.
    pub fn add_event(&self, height: u64, event: Event) {
        self.inner.lock().events.push((height, event));
    }

    /// Makes the next `count` event fetches for `event_type` fail.
    pub fn fail_fetches(&self, event_type: &str, count: usize) {
        self.inner.lock().fetch_failures.insert(event_type.to_string(), count);
    }
}

impl LedgerClient for MockLedgerClient {
    async fn get_latest_header(&self, _sealed: bool) -> Result<BlockHeader, ClientError> {
        let mut inner = self.inner.lock();
        match inner.head_script.pop_front() {
            Some(result) => result.map(header_at),
            None => Ok(header_at(inner.head)),
        }
    }

    async fn get_header_by_height(&self, height: u64) -> Result<BlockHeader, ClientError> {
        let inner = self.inner.lock();
        if height > inner.head {
            return Err(ClientError::BlockNotFound(height));
        }
        Ok(header_at(height))
    }

    async fn get_events_for_height_range(
        &self,
        event_type: &str,
        start: u64,
        end: u64,
    ) -> Result<Vec<BlockEvents>, ClientError> {
        let mut inner = self.inner.lock();

        if let Some(remaining) = inner.fetch_failures.get_mut(event_type) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(ClientError::Transport("injected fetch failure".to_string()));
            }
        }

        let mut by_height: Vec<(u64, Vec<Event>)> = Vec::new();
        let mut matching: Vec<(u64, Event)> = inner
            .events
            .iter()
            .filter(|(height, event)| {
                (start..=end).contains(height) && event.event_type == event_type
            })
            .cloned()
            .collect();
        matching.sort_by_key(|(height, _)| *height);

        for (height, event) in matching {
            match by_height.last_mut() {
                Some((last_height, events)) if *last_height == height => events.push(event),
                _ => by_height.push((height, vec![event])),
            }
        }

        Ok(by_height
            .into_iter()
            .map(|(height, events)| BlockEvents {
                block_id: header_at(height).id,
                height,
                events,
            })
            .collect())
    }
}
