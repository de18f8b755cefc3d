//! RenderContext - what a block builder can reach while building.

use tracing::debug;

use crate::domain::{Block, Element, MarkupNode};

use super::registry::{BuilderRegistry, FALLBACK_TAG};
use super::spans;

pub struct RenderContext<'a> {
    registry: &'a BuilderRegistry,
}

impl<'a> RenderContext<'a> {
    pub fn new(registry: &'a BuilderRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'a BuilderRegistry {
        self.registry
    }

    pub fn style_tag(&self, style: &str) -> &'a str {
        self.registry.style_tag(style)
    }

    /// The block's spans with marks resolved and nested.
    pub fn render_spans(&self, block: &Block) -> Vec<MarkupNode> {
        spans::render_spans(self.registry, block)
    }

    /// Generic container for blocks nobody knows how to build.
    ///
    /// Always an element, so the block never disappears from the output.
    pub fn fallback(&self, block: &Block) -> MarkupNode {
        debug!(kind = %block.kind, "rendering block with generic container");
        Element::new(FALLBACK_TAG)
            .with_attr("data-block-kind", block.kind.as_str())
            .with_children(self.render_spans(block))
            .into()
    }
}
