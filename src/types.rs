/// 32-byte identifier used for blocks and transactions.
pub type Identifier = [u8; 32];

/// Header of a finalized block.
///
/// Headers are fetched from the [`LedgerClient`](crate::LedgerClient) and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    /// Identifier of this block.
    pub id: Identifier,
    /// Identifier of the parent block.
    pub parent_id: Identifier,
    /// Height of this block. Monotonically increasing along the finalized chain.
    pub height: u64,
}

/// A single ledger event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Fully qualified event type, e.g. `"A.0b2a3299cc857e29.Token.Deposit"`.
    pub event_type: String,
    /// Identifier of the transaction that emitted the event.
    pub transaction_id: Identifier,
    /// Index of the event within its transaction.
    pub event_index: u32,
    /// Opaque encoded payload. The poller routes by type only and never
    /// inspects the payload.
    pub payload: Vec<u8>,
}

/// Events of one type emitted within a single block, as returned by
/// [`LedgerClient::get_events_for_height_range`](crate::LedgerClient::get_events_for_height_range).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockEvents {
    /// Identifier of the block the events were emitted in.
    pub block_id: Identifier,
    /// Height of that block.
    pub height: u64,
    /// Matching events, in the order the ledger recorded them.
    pub events: Vec<Event>,
}

/// The unit delivered on subscription channels: one event together with the
/// height it was emitted at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockEvent {
    /// Height of the block the event was emitted in.
    pub height: u64,
    /// The event itself.
    pub event: Event,
}
