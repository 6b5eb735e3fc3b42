use std::time::Duration;

use crate::{
    client::LedgerClient,
    error::PollerError,
    poller::{
        registry::SubscriptionRegistry,
        scheduler::{ErrorBehavior, EventPoller},
    },
};

/// Default maximum number of heights per event query window.
pub const DEFAULT_MAX_HEIGHT_RANGE: u64 = 250;

/// Default capacity of each subscription's delivery channel.
pub const DEFAULT_SUBSCRIPTION_BUFFER: usize = 64;

/// Builder/configuration for an [`EventPoller`].
#[derive(Clone, Debug)]
pub struct EventPollerBuilder {
    pub(crate) interval: Duration,
    pub(crate) start_height: Option<u64>,
    pub(crate) max_height_range: u64,
    pub(crate) error_behavior: ErrorBehavior,
    pub(crate) buffer_capacity: usize,
}

impl EventPollerBuilder {
    /// Creates a builder polling at `interval`, with default configuration
    /// otherwise.
    ///
    /// The interval must be greater than zero.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            start_height: None,
            max_height_range: DEFAULT_MAX_HEIGHT_RANGE,
            error_behavior: ErrorBehavior::default(),
            buffer_capacity: DEFAULT_SUBSCRIPTION_BUFFER,
        }
    }

    /// Sets the height polling starts above.
    ///
    /// The block at `start_height` itself is treated as already processed;
    /// the first event query begins at `start_height + 1`. When unset, the
    /// chain head at startup is used instead.
    #[must_use]
    pub fn start_height(mut self, start_height: u64) -> Self {
        self.start_height = Some(start_height);
        self
    }

    /// Sets the maximum number of heights per event query window.
    ///
    /// Larger spans between ticks are split into multiple queries of at most
    /// this many heights. Must be greater than 0.
    #[must_use]
    pub fn max_height_range(mut self, max_height_range: u64) -> Self {
        self.max_height_range = max_height_range;
        self
    }

    /// Sets what happens when fetching or dispatching events fails.
    #[must_use]
    pub fn error_behavior(mut self, error_behavior: ErrorBehavior) -> Self {
        self.error_behavior = error_behavior;
        self
    }

    /// Sets the capacity of each subscription's delivery channel.
    ///
    /// Once a subscriber falls this many events behind, dispatch blocks until
    /// it catches up. Must be greater than 0.
    #[must_use]
    pub fn buffer_capacity(mut self, buffer_capacity: usize) -> Self {
        self.buffer_capacity = buffer_capacity;
        self
    }

    /// Builds the poller around `client`.
    ///
    /// # Errors
    ///
    /// * [`PollerError::InvalidInterval`] - the polling interval is zero.
    /// * [`PollerError::InvalidMaxHeightRange`] - `max_height_range` is 0.
    /// * [`PollerError::InvalidBufferCapacity`] - `buffer_capacity` is 0.
    pub fn build<C: LedgerClient>(self, client: C) -> Result<EventPoller<C>, PollerError> {
        if self.interval.is_zero() {
            return Err(PollerError::InvalidInterval);
        }
        if self.max_height_range == 0 {
            return Err(PollerError::InvalidMaxHeightRange);
        }
        if self.buffer_capacity == 0 {
            return Err(PollerError::InvalidBufferCapacity);
        }
        Ok(EventPoller {
            client,
            interval: self.interval,
            start_height: self.start_height,
            max_height_range: self.max_height_range,
            error_behavior: self.error_behavior,
            registry: SubscriptionRegistry::new(self.buffer_capacity),
        })
    }
}
