//! The ledger query boundary.
//!
//! The poller is generic over a [`LedgerClient`], which exposes the three
//! queries the polling loop needs: the latest finalized header, a header at a
//! specific height, and events of one type over a height range. How those
//! queries are answered (gRPC, REST, an in-process node) is the implementor's
//! concern.

use std::future::Future;

use thiserror::Error;

use crate::types::{BlockEvents, BlockHeader};

/// Error returned by a [`LedgerClient`] implementation.
///
/// The poller treats the client as opaque, so this error carries no structure
/// beyond what the poller acts on: whether a requested block exists, or that
/// the query failed in transit. Implementations map their own transport
/// errors into these variants.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The query could not be completed (network failure, node unavailable,
    /// malformed response, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// No block exists at the requested height.
    #[error("block not found at height {0}")]
    BlockNotFound(u64),
}

/// Query capability of the remote ledger.
///
/// All methods are read-only and may be called repeatedly with the same
/// arguments; the poller performs no caching of its own. Returned futures
/// must be `Send` so the polling loop can be driven from any runtime task.
pub trait LedgerClient: Send + Sync {
    /// Returns the header of the latest finalized block.
    ///
    /// When `sealed` is true, only blocks whose results have been sealed
    /// qualify; otherwise the latest finalized block is returned. The poller
    /// always asks for sealed blocks.
    fn get_latest_header(
        &self,
        sealed: bool,
    ) -> impl Future<Output = Result<BlockHeader, ClientError>> + Send;

    /// Returns the header of the finalized block at `height`.
    fn get_header_by_height(
        &self,
        height: u64,
    ) -> impl Future<Output = Result<BlockHeader, ClientError>> + Send;

    /// Returns all events of `event_type` emitted in blocks within
    /// `start..=end`, grouped per block in ascending height order. Blocks
    /// without matching events may be omitted from the result.
    fn get_events_for_height_range(
        &self,
        event_type: &str,
        start: u64,
        end: u64,
    ) -> impl Future<Output = Result<Vec<BlockEvents>, ClientError>> + Send;
}
