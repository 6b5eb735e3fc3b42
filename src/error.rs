use thiserror::Error;

use crate::client::ClientError;

/// Errors returned by [`EventPoller::run`](crate::EventPoller::run) and by
/// [`EventPollerBuilder::build`](crate::EventPollerBuilder::build).
///
/// Cancellation is never an error: a cancelled run returns `Ok(())` no matter
/// where the cancellation was observed. Transient per-tick client failures
/// are logged and retried on the next tick rather than surfaced here.
#[derive(Debug, Error)]
pub enum PollerError {
    /// A fetch or dispatch failed while the poller was configured with
    /// [`ErrorBehavior::Stop`](crate::ErrorBehavior::Stop). The run is over
    /// and cannot be resumed.
    #[error("polling aborted due to an error")]
    Aborted,

    /// The initial reference header could not be determined, so the run never
    /// started.
    #[error("error getting start header: {0}")]
    Startup(#[source] ClientError),

    /// The configured polling interval is invalid (must be greater than
    /// zero).
    #[error("polling interval must be greater than 0")]
    InvalidInterval,

    /// The configured maximum height range is invalid (must be greater than
    /// zero).
    #[error("max height range must be greater than 0")]
    InvalidMaxHeightRange,

    /// The configured subscription buffer capacity is invalid (must be
    /// greater than zero).
    #[error("subscription buffer capacity must be greater than 0")]
    InvalidBufferCapacity,
}
