//! BridgeBuilder - wiring of store, renderer and analytics for one host.

use std::sync::Arc;

use crate::config::LudoquizConfig;
use crate::impls::NoopAnalyticsSink;
use crate::ports::{AnalyticsSink, ResultBackend};
use crate::render::{BuilderRegistry, Renderer};
use crate::store::{DEFAULT_TABLE, ResultStore};

use super::bridge::Bridge;

/// Builds a `Bridge`.
///
/// # Example
/// ```ignore
/// let bridge = BridgeBuilder::new()
///     .backend(Arc::new(FileBackend::new("./ludoquiz-data")))
///     .analytics(Arc::new(TracingAnalyticsSink))
///     .build()?;
/// let running = bridge.start();
/// ```
pub struct BridgeBuilder {
    backend: Option<Arc<dyn ResultBackend>>,
    table: String,
    analytics: Arc<dyn AnalyticsSink>,
    renderer: Option<Renderer>,
    load_on_start: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no result backend configured")]
    MissingBackend,
}

impl BridgeBuilder {
    pub fn new() -> Self {
        Self {
            backend: None,
            table: DEFAULT_TABLE.to_string(),
            analytics: Arc::new(NoopAnalyticsSink),
            renderer: None,
            load_on_start: false,
        }
    }

    /// Backend, table, analytics sink and image settings from `config`.
    pub fn from_config(config: &LudoquizConfig) -> Self {
        Self::new()
            .backend(config.storage.build_backend())
            .table(config.storage.table.clone())
            .analytics(config.analytics.build_sink())
            .renderer(Renderer::new(Arc::new(BuilderRegistry::with_defaults(
                config.images.clone(),
            ))))
    }

    pub fn backend(mut self, backend: Arc<dyn ResultBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn analytics(mut self, analytics: Arc<dyn AnalyticsSink>) -> Self {
        self.analytics = analytics;
        self
    }

    pub fn renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Deliver the initial results right after startup instead of waiting
    /// for `HostRequest::RequestInitialResults`.
    pub fn load_on_start(mut self, load: bool) -> Self {
        self.load_on_start = load;
        self
    }

    pub fn build(self) -> Result<Bridge, BuildError> {
        let backend = self.backend.ok_or(BuildError::MissingBackend)?;
        Ok(Bridge::new(
            Arc::new(ResultStore::with_table(backend, self.table)),
            self.analytics,
            self.renderer.unwrap_or_default(),
            self.load_on_start,
        ))
    }
}

impl Default for BridgeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
