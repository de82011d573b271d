//! Sketchform notification bus.
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`, carrying user-facing [`Notification`]s.
//! - [`NotificationLog`] — background subscriber that traces every
//!   notification and keeps a bounded window of the most recent ones.

pub mod bus;
pub mod log;

pub use bus::EventBus;
pub use log::NotificationLog;
pub use sketchform_core::notification::{Notification, Severity};
