//! Impls - concrete ports.
//!
//! # Included
//! - **InMemoryBackend**: non-durable results, also the "storage disabled" stand-in
//! - **FileBackend**: durable JSON table on disk
//! - **NoopAnalyticsSink / TracingAnalyticsSink / RecordingAnalyticsSink**

pub mod analytics;
pub mod file_backend;
pub mod inmem_backend;

pub use self::analytics::{NoopAnalyticsSink, RecordingAnalyticsSink, TracingAnalyticsSink};
pub use self::file_backend::FileBackend;
pub use self::inmem_backend::InMemoryBackend;
