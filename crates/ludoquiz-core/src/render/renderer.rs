//! Renderer - document to markup.
//!
//! Pure and total: every input document renders, unknown kinds and marks
//! degrade instead of failing. The renderer holds no mutable state and can
//! be shared across threads.

use std::sync::Arc;

use tracing::debug;

use crate::config::ImageConfig;
use crate::domain::{Block, Document, Element, Markup, MarkupNode};

use super::context::RenderContext;
use super::registry::BuilderRegistry;

/// Root container of every rendered document.
pub const ROOT_TAG: &str = "div";

/// Deepest list nesting rendered. Deeper items render at this level.
pub const MAX_LIST_DEPTH: u32 = 16;

#[derive(Clone)]
pub struct Renderer {
    registry: Arc<BuilderRegistry>,
}

impl Renderer {
    pub fn new(registry: Arc<BuilderRegistry>) -> Self {
        Self { registry }
    }

    pub fn with_defaults(images: ImageConfig) -> Self {
        Self::new(Arc::new(BuilderRegistry::with_defaults(images)))
    }

    pub fn registry(&self) -> &BuilderRegistry {
        &self.registry
    }

    /// Render blocks in order. Runs of list items are grouped into lists;
    /// nothing is reordered or dropped.
    pub fn render(&self, document: &Document) -> Markup {
        let ctx = RenderContext::new(&self.registry);
        let blocks = document.blocks();

        let mut root = Element::new(ROOT_TAG);
        let mut i = 0;
        while i < blocks.len() {
            if blocks[i].is_list_item() {
                let level = list_level(&blocks[i]);
                let (list, used) = self.render_list(&ctx, &blocks[i..], level);
                root.push(list);
                i += used;
            } else {
                root.push(self.render_block(&ctx, &blocks[i]));
                i += 1;
            }
        }
        Markup::new(root)
    }

    fn render_block(&self, ctx: &RenderContext<'_>, block: &Block) -> MarkupNode {
        match self.registry.block(&block.kind) {
            Some(builder) => builder
                .build(block, ctx)
                .unwrap_or_else(|| ctx.fallback(block)),
            None => {
                debug!(kind = %block.kind, "no builder registered for block kind");
                ctx.fallback(block)
            }
        }
    }

    /// Render the list at `level` starting at `blocks[0]` (which must be a
    /// list item at that level).
    ///
    /// Returns the list element and how many blocks it consumed. Deeper
    /// levels nest inside the preceding item; a shallower level or a change
    /// of list kind at the same level ends the list. Recursion depth is
    /// bounded by `MAX_LIST_DEPTH`.
    fn render_list(
        &self,
        ctx: &RenderContext<'_>,
        blocks: &[Block],
        level: u32,
    ) -> (MarkupNode, usize) {
        let kind = blocks[0].list_item.as_deref().unwrap_or_default();
        let mut list = Element::new(list_tag(kind));

        let mut i = 0;
        while i < blocks.len() {
            let block = &blocks[i];
            let Some(item_kind) = block.list_item.as_deref() else {
                break;
            };
            let item_level = list_level(block);
            if item_level < level || (item_level == level && item_kind != kind) {
                break;
            }

            if item_level > level {
                let (nested, used) = self.render_list(ctx, &blocks[i..], item_level);
                match list.children.last_mut() {
                    Some(MarkupNode::Element(item)) => item.push(nested),
                    _ => list.push(Element::new("li").with_child(nested)),
                }
                i += used;
                continue;
            }

            let item = match self.render_block(ctx, block) {
                MarkupNode::Element(el) if el.tag == "li" => el,
                other => Element::new("li").with_child(other),
            };
            list.push(item);
            i += 1;
        }
        (list.into(), i)
    }
}

fn list_level(block: &Block) -> u32 {
    block.level().min(MAX_LIST_DEPTH)
}

fn list_tag(kind: &str) -> &'static str {
    match kind {
        "number" => "ol",
        _ => "ul",
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(Arc::new(BuilderRegistry::default()))
    }
}
