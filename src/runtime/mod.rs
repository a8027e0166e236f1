//! # Runtime
//!
//! The assertion path: registry construction, dispatch and classification,
//! and the notification boundary every outcome flows through.
//!
//! ## Module Structure
//!
//! - **`registry`**: builds the default [`PredicateRegistry`](crate::predicates::PredicateRegistry)
//! - **`outcome`**: statuses, call parsing and classified outcomes
//! - **`dispatch`**: the [`Dispatcher`](dispatch::Dispatcher)
//! - **`sink`**: events, the [`NotificationSink`](sink::NotificationSink) trait and output capture

pub mod dispatch;
pub mod outcome;
pub mod registry;
pub mod sink;
