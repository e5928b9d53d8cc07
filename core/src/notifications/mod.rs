//! Spoken/audible notifications for timer pre-alerts
//!
//! The tick loop must never wait on speech, so alerts go through an unbounded
//! queue drained by a single background worker. The worker delivers one
//! message at a time, in order.

mod error;
mod sink;

pub use error::DeliveryError;
pub use sink::{Delivery, LogDelivery, NotificationSink};
