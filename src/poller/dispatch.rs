use std::ops::RangeInclusive;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::{
    client::{ClientError, LedgerClient},
    types::BlockEvent,
};

/// Why a unit of tick work (one window, one event type) did not complete.
#[derive(Debug)]
pub(crate) enum TickError {
    /// The shared cancellation token fired mid-operation.
    Cancelled,
    /// The ledger query failed.
    Client(ClientError),
}

/// Fetches all `event_type` events in `window` and fans each one out, in the
/// order the ledger returned them, to every sender in `subscribers`.
///
/// Sends block until the subscriber drains its channel; a full channel
/// therefore backpressures the whole tick. Both the fetch and every send are
/// raced against `token` so shutdown never hangs behind a stalled consumer.
/// Subscribers whose receiver has been dropped are skipped.
pub(crate) async fn fetch_and_dispatch<C: LedgerClient>(
    client: &C,
    event_type: &str,
    window: RangeInclusive<u64>,
    subscribers: &[mpsc::Sender<BlockEvent>],
    token: &CancellationToken,
) -> Result<(), TickError> {
    let (start, end) = (*window.start(), *window.end());

    let batches = tokio::select! {
        () = token.cancelled() => return Err(TickError::Cancelled),
        result = client.get_events_for_height_range(event_type, start, end) => {
            result.map_err(TickError::Client)?
        }
    };

    let event_count: usize = batches.iter().map(|batch| batch.events.len()).sum();
    if event_count == 0 {
        trace!(event_type, start, end, "no events in window");
        return Ok(());
    }

    debug!(event_type, start, end, event_count, "dispatching events");

    for batch in batches {
        for event in batch.events {
            for sender in subscribers {
                let delivery = BlockEvent { height: batch.height, event: event.clone() };
                tokio::select! {
                    () = token.cancelled() => return Err(TickError::Cancelled),
                    sent = sender.send(delivery) => {
                        if sent.is_err() {
                            // Receiver dropped; the subscription stays in the
                            // registry until unsubscribed, but delivery to it
                            // is a no-op.
                            debug!(event_type, "subscriber channel closed, skipping");
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
