//! AnalyticsSink port - fire-and-forget event delivery.
//!
//! Event names are opaque strings chosen by the host. Delivery has no
//! retry and no buffering; callers ignore failures.

use crate::domain::SinkError;

pub trait AnalyticsSink: Send + Sync {
    fn log_event(&self, name: &str) -> Result<(), SinkError>;
}
