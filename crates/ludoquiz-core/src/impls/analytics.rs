//! AnalyticsSink implementations.
//!
//! - **NoopAnalyticsSink**: drops every event
//! - **TracingAnalyticsSink**: writes event names to the log
//! - **RecordingAnalyticsSink**: keeps events in memory (tests, demos)

use std::sync::{Arc, Mutex};

use tracing::info;

use crate::domain::SinkError;
use crate::ports::AnalyticsSink;

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAnalyticsSink;

impl AnalyticsSink for NoopAnalyticsSink {
    fn log_event(&self, _name: &str) -> Result<(), SinkError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAnalyticsSink;

impl AnalyticsSink for TracingAnalyticsSink {
    fn log_event(&self, name: &str) -> Result<(), SinkError> {
        info!(target: "ludoquiz::analytics", event = name, "analytics event");
        Ok(())
    }
}

/// Clones share the same event list.
#[derive(Debug, Clone, Default)]
pub struct RecordingAnalyticsSink {
    events: Arc<Mutex<Vec<String>>>,
    failing: bool,
}

impl RecordingAnalyticsSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that records nothing and reports every delivery as failed.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl AnalyticsSink for RecordingAnalyticsSink {
    fn log_event(&self, name: &str) -> Result<(), SinkError> {
        if self.failing {
            return Err(SinkError::Delivery(format!("refused event '{name}'")));
        }
        self.events
            .lock()
            .map_err(|_| SinkError::Delivery("event log poisoned".to_string()))?
            .push(name.to_string());
        Ok(())
    }
}
