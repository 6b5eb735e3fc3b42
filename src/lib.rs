//! event-poller is a library for polling ledger events at a fixed interval
//! and fanning them out to type-based subscribers.
//!
//! The entry point is [`EventPoller`], built via [`EventPollerBuilder`]
//! around any [`LedgerClient`] implementation. Register subscriptions with
//! [`EventPoller::subscribe`], then call [`EventPoller::run`] with a
//! [`CancellationToken`][token] to start the loop.
//!
//! # How it works
//!
//! Each tick the poller queries the latest sealed header, splits the span
//! between the last fully processed height and the head into windows of at
//! most `max_height_range` heights, and for every window queries each
//! subscribed event type. Matching events are delivered to every subscriber
//! registered for that type, in the order the ledger returned them. The
//! reference height only advances when every window and type in the tick
//! succeeded, so transient failures are backfilled by the next tick instead
//! of dropping blocks.
//!
//! # Ordering
//!
//! Delivery order matches source order per event type. There is no ordering
//! guarantee across different event types.
//!
//! # Backpressure
//!
//! Delivery channels are bounded. A subscriber that stops draining its
//! channel blocks dispatch (and thereby the whole tick) until it catches up
//! or the run is cancelled. Dropping a [`Subscription`] instead makes the
//! poller skip it.
//!
//! # Errors and shutdown
//!
//! Cancellation always ends [`EventPoller::run`] promptly with `Ok(())`.
//! Transient query failures skip the tick and are retried at the interval
//! cadence; fetch/dispatch failures follow the configured [`ErrorBehavior`],
//! where [`ErrorBehavior::Stop`] ends the run with [`PollerError::Aborted`].
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use event_poller::{
//!     BlockEvents, BlockHeader, ClientError, EventPollerBuilder, LedgerClient,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! struct MyClient;
//!
//! impl LedgerClient for MyClient {
//!     async fn get_latest_header(&self, sealed: bool) -> Result<BlockHeader, ClientError> {
//!         todo!("query the ledger's access API")
//!     }
//!
//!     async fn get_header_by_height(&self, height: u64) -> Result<BlockHeader, ClientError> {
//!         todo!("query the ledger's access API")
//!     }
//!
//!     async fn get_events_for_height_range(
//!         &self,
//!         event_type: &str,
//!         start: u64,
//!         end: u64,
//!     ) -> Result<Vec<BlockEvents>, ClientError> {
//!         todo!("query the ledger's access API")
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let poller = EventPollerBuilder::new(Duration::from_secs(10)).build(MyClient)?;
//!
//!     let mut subscription = poller.subscribe(["A.0b2a3299cc857e29.Token.Deposit"]);
//!
//!     let token = CancellationToken::new();
//!     let shutdown = token.clone();
//!     tokio::spawn(async move {
//!         while let Some(delivery) = subscription.recv().await {
//!             println!("event at height {}: {}", delivery.height, delivery.event.event_type);
//!         }
//!     });
//!
//!     tokio::spawn(async move {
//!         tokio::signal::ctrl_c().await.ok();
//!         shutdown.cancel();
//!     });
//!
//!     poller.run(token).await?;
//!     Ok(())
//! }
//! ```
//!
//! [token]: tokio_util::sync::CancellationToken

pub mod client;

mod error;
mod poller;
mod types;

pub use client::{ClientError, LedgerClient};
pub use error::PollerError;
pub use poller::{
    DEFAULT_MAX_HEIGHT_RANGE, DEFAULT_SUBSCRIPTION_BUFFER, ErrorBehavior, EventPoller,
    EventPollerBuilder, Subscription, SubscriptionId,
};
pub use types::{BlockEvent, BlockEvents, BlockHeader, Event, Identifier};
