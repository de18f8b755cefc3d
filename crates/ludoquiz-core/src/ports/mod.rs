//! Ports - seams to external systems.
//!
//! Each trait hides one collaborator the host environment provides:
//! durable keyed storage for results and an analytics event sink.

pub mod analytics_sink;
pub mod result_backend;

pub use self::analytics_sink::AnalyticsSink;
pub use self::result_backend::{ResultBackend, WriteTransaction};
