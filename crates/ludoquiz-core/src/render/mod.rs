//! Render - structured documents to markup.
//!
//! # Two layers
//! - **Registry**: `BlockBuilder` per block kind, `MarkBuilder` per mark type,
//!   style → tag table
//! - **Renderer**: fixed dispatch over the registry with a generic-container
//!   fallback, list grouping and mark nesting

pub mod builders;
pub mod context;
pub mod registry;
pub mod renderer;
mod spans;

pub use self::builders::{DecoratorMark, ImageBlockBuilder, LinkMark, TextBlockBuilder};
pub use self::context::RenderContext;
pub use self::registry::{BlockBuilder, BuilderRegistry, MarkBuilder, RegistryError, FALLBACK_TAG};
pub use self::renderer::{Renderer, ROOT_TAG};
