//! The fixed-interval polling loop.
//!
//! [`EventPoller`] drives everything: each tick it queries the chain head,
//! chunks the unprocessed height span into windows, fetches and dispatches
//! every subscribed event type for every window, and advances the reference
//! height only when the whole tick succeeded. See [`EventPoller::run`] for the
//! exact escalation rules.

use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::{
    client::{ClientError, LedgerClient},
    error::PollerError,
    poller::{
        dispatch::{TickError, fetch_and_dispatch},
        registry::{Subscription, SubscriptionId, SubscriptionRegistry},
        windows::HeightWindows,
    },
    types::BlockHeader,
};

/// What the poller does when fetching or dispatching events fails.
///
/// Head-query failures are exempt: those always skip the tick and retry at
/// the next interval, whatever the behavior configured here.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ErrorBehavior {
    /// Log the error and keep polling. The reference height is not advanced
    /// for the failed tick, so the next tick re-covers the same heights.
    #[default]
    Continue,

    /// Log the error and end the run with [`PollerError::Aborted`].
    Stop,
}

/// How a single tick ended.
enum TickEnd {
    /// Every window and event type succeeded; advance to this height.
    Advance(u64),
    /// Something transient went wrong (or the head regressed); keep the
    /// previous reference height and let the next tick backfill.
    Skip,
    /// The cancellation token fired mid-tick.
    Cancelled,
    /// A fetch/dispatch failed under [`ErrorBehavior::Stop`].
    Aborted,
}

/// A ledger event poller.
///
/// Built via [`EventPollerBuilder`](crate::EventPollerBuilder). Subscriptions
/// can be added and removed from any thread, before or during
/// [`run`](EventPoller::run).
#[derive(Debug)]
pub struct EventPoller<C> {
    pub(crate) client: C,
    pub(crate) interval: Duration,
    pub(crate) start_height: Option<u64>,
    pub(crate) max_height_range: u64,
    pub(crate) error_behavior: ErrorBehavior,
    pub(crate) registry: SubscriptionRegistry,
}

impl<C: LedgerClient> EventPoller<C> {
    /// Creates a subscription for `event_types` and returns its handle.
    ///
    /// Every event of one of the listed types observed by the poller is
    /// delivered on the handle's channel. Duplicate types in the input are
    /// deduplicated.
    #[must_use]
    pub fn subscribe<I, S>(&self, event_types: I) -> Subscription
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registry.subscribe(event_types.into_iter().map(Into::into).collect())
    }

    /// Removes the subscription with `id` from each of `event_types`.
    ///
    /// Types the id is not registered under are ignored. The subscription's
    /// channel is not closed; its lifecycle belongs to the subscriber.
    pub fn unsubscribe(&self, id: SubscriptionId, event_types: &[String]) {
        self.registry.unsubscribe(id, event_types);
    }

    /// Runs the polling loop until cancellation or abort.
    ///
    /// The first poll happens one interval after this call; subsequent ticks
    /// fire at a fixed wall-clock cadence regardless of how long each tick's
    /// processing takes.
    ///
    /// Returns `Ok(())` when `token` is cancelled, wherever that is observed:
    /// waiting for a tick, inside a client call, or blocked on a subscriber's
    /// full channel.
    ///
    /// # Errors
    ///
    /// * [`PollerError::Startup`] - the initial reference header could not be
    ///   fetched.
    /// * [`PollerError::Aborted`] - a fetch or dispatch failed and the poller
    ///   is configured with [`ErrorBehavior::Stop`].
    pub async fn run(&self, token: CancellationToken) -> Result<(), PollerError> {
        let start = tokio::select! {
            () = token.cancelled() => return Ok(()),
            result = self.start_header() => result.map_err(PollerError::Startup)?,
        };
        let mut last_height = start.height;

        info!(
            start_height = last_height,
            interval = ?self.interval,
            max_height_range = self.max_height_range,
            "event poller started"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // An interval's first tick completes immediately; consume it so the
        // first poll fires one full interval after startup.
        ticker.tick().await;

        loop {
            tokio::select! {
                () = token.cancelled() => {
                    info!(last_height, "event poller stopped");
                    return Ok(());
                }
                _ = ticker.tick() => {}
            }

            match self.process_tick(last_height, &token).await {
                TickEnd::Advance(height) => last_height = height,
                TickEnd::Skip => {}
                TickEnd::Cancelled => {
                    info!(last_height, "event poller stopped");
                    return Ok(());
                }
                TickEnd::Aborted => {
                    error!(last_height, "event poller aborted");
                    return Err(PollerError::Aborted);
                }
            }
        }
    }

    /// Resolves the initial reference header: the configured start height if
    /// set, otherwise the latest sealed header.
    async fn start_header(&self) -> Result<BlockHeader, ClientError> {
        match self.start_height {
            Some(height) => self.client.get_header_by_height(height).await,
            None => self.client.get_latest_header(true).await,
        }
    }

    /// Processes one interval tick: query the head, fetch and dispatch every
    /// subscribed event type over every window between `last_height` and the
    /// head.
    async fn process_tick(&self, last_height: u64, token: &CancellationToken) -> TickEnd {
        let head = tokio::select! {
            () = token.cancelled() => return TickEnd::Cancelled,
            result = self.client.get_latest_header(true) => match result {
                Ok(header) => header,
                Err(err) => {
                    // Height stays put so the next tick covers the gap.
                    warn!(error = %err, "error getting latest header, skipping tick");
                    return TickEnd::Skip;
                }
            }
        };

        if head.height < last_height {
            warn!(
                head = head.height,
                last_height, "chain head behind last processed height, skipping tick"
            );
            return TickEnd::Skip;
        }

        // One snapshot per tick: subscriptions added mid-tick are picked up
        // by the next one.
        let snapshot = self.registry.snapshot();
        let mut tick_failed = false;

        for window in HeightWindows::new(last_height, head.height, self.max_height_range) {
            for (event_type, subscribers) in &snapshot {
                let dispatched = fetch_and_dispatch(
                    &self.client,
                    event_type,
                    window.clone(),
                    subscribers,
                    token,
                )
                .await;

                match dispatched {
                    Ok(()) => {}
                    Err(TickError::Cancelled) => return TickEnd::Cancelled,
                    Err(TickError::Client(err)) => {
                        error!(
                            %event_type,
                            start = *window.start(),
                            end = *window.end(),
                            error = %err,
                            "error polling events"
                        );
                        if self.error_behavior == ErrorBehavior::Stop {
                            return TickEnd::Aborted;
                        }
                        tick_failed = true;
                    }
                }
            }
        }

        if tick_failed {
            // A window/type pair failed under Continue: hold the reference
            // height so nothing between it and the head is lost.
            TickEnd::Skip
        } else {
            TickEnd::Advance(head.height)
        }
    }
}
