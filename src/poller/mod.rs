mod builder;
mod dispatch;
mod registry;
mod scheduler;
mod windows;

pub use builder::{DEFAULT_MAX_HEIGHT_RANGE, DEFAULT_SUBSCRIPTION_BUFFER, EventPollerBuilder};
pub use registry::{Subscription, SubscriptionId};
pub use scheduler::{ErrorBehavior, EventPoller};
