//! ludoquiz-core
//!
//! Result persistence and rich-text rendering for the Ludoquiz quiz client.
//!
//! # Modules
//! - **domain**: value types (QuizResult, Document, Markup, Quiz, ConnectionState, errors)
//! - **ports**: seams to the host environment (ResultBackend, AnalyticsSink)
//! - **impls**: concrete ports (InMemoryBackend, FileBackend, analytics sinks)
//! - **store**: ResultStore, merge-on-submit over a backend
//! - **render**: BuilderRegistry and Renderer, structured documents to markup
//! - **app**: the bridge a host application talks to
//! - **config**: TOML configuration

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod render;
pub mod store;

pub use app::{BridgeBuilder, BridgeHandle, RunningBridge};
pub use config::LudoquizConfig;
pub use domain::{Document, HostNotification, HostRequest, Markup, QuizId, QuizResult};
pub use render::Renderer;
pub use store::ResultStore;
