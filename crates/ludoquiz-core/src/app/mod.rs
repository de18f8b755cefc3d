//! App - the bridge between this crate and its host application.
//!
//! # Components
//! - **BridgeBuilder**: wiring and startup validation
//! - **Bridge / RunningBridge**: the request loop and its lifecycle
//! - **BridgeHandle**: what the host holds (requests + synchronous render)

pub mod bridge;
pub mod builder;

pub use self::bridge::{Bridge, BridgeHandle, RunningBridge};
pub use self::builder::{BridgeBuilder, BuildError};
