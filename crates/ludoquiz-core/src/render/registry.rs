//! BuilderRegistry - block and mark builders by kind.
//!
//! Built during initialization (mutable), shared read-only while rendering.
//! New block kinds or mark types are added by registering a builder; the
//! renderer's dispatch never changes.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ImageConfig;
use crate::domain::{Block, Element, MarkDef, MarkupNode};

use super::builders::{DecoratorMark, ImageBlockBuilder, LinkMark, TextBlockBuilder};
use super::context::RenderContext;

/// Tag used for anything without a more specific mapping.
pub const FALLBACK_TAG: &str = "div";

/// Builds the markup for one block kind.
pub trait BlockBuilder: Send + Sync {
    /// `None` means "cannot build this one"; the renderer then uses the
    /// generic container.
    fn build(&self, block: &Block, ctx: &RenderContext<'_>) -> Option<MarkupNode>;
}

/// Builds the (empty) wrapper element for one mark type.
pub trait MarkBuilder: Send + Sync {
    /// `def` is the resolved mark definition for annotations and `None` for
    /// decorators. `None` drops the mark.
    fn wrap(&self, def: Option<&MarkDef>) -> Option<Element>;
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("builder for block kind '{0}' is already registered")]
    BlockAlreadyRegistered(String),

    #[error("builder for mark '{0}' is already registered")]
    MarkAlreadyRegistered(String),
}

pub struct BuilderRegistry {
    blocks: HashMap<String, Arc<dyn BlockBuilder>>,
    marks: HashMap<String, Arc<dyn MarkBuilder>>,
    styles: HashMap<String, String>,
}

impl BuilderRegistry {
    /// Empty registry: every block renders as the generic container.
    pub fn new() -> Self {
        Self {
            blocks: HashMap::new(),
            marks: HashMap::new(),
            styles: HashMap::new(),
        }
    }

    /// Text blocks, images, the standard decorators and links.
    pub fn with_defaults(images: ImageConfig) -> Self {
        let mut registry = Self::new();
        for (style, tag) in [
            ("normal", "p"),
            ("h1", "h1"),
            ("h2", "h2"),
            ("h3", "h3"),
            ("h4", "h4"),
            ("h5", "h5"),
            ("h6", "h6"),
            ("blockquote", "blockquote"),
        ] {
            registry.set_style(style, tag);
        }

        registry.blocks.insert(
            crate::domain::TEXT_BLOCK_KIND.to_string(),
            Arc::new(TextBlockBuilder),
        );
        registry
            .blocks
            .insert("image".to_string(), Arc::new(ImageBlockBuilder::new(images)));

        for decorator in [
            DecoratorMark::new("strong", "strong"),
            DecoratorMark::new("em", "em"),
            DecoratorMark::new("code", "code"),
            DecoratorMark::new("strike-through", "del"),
            DecoratorMark::new("underline", "span").with_attr("style", "text-decoration:underline"),
        ] {
            registry
                .marks
                .insert(decorator.name().to_string(), Arc::new(decorator));
        }
        registry.marks.insert("link".to_string(), Arc::new(LinkMark));
        registry
    }

    pub fn register_block(
        &mut self,
        kind: impl Into<String>,
        builder: Arc<dyn BlockBuilder>,
    ) -> Result<(), RegistryError> {
        let kind = kind.into();
        if self.blocks.contains_key(&kind) {
            return Err(RegistryError::BlockAlreadyRegistered(kind));
        }
        self.blocks.insert(kind, builder);
        Ok(())
    }

    pub fn register_mark(
        &mut self,
        name: impl Into<String>,
        builder: Arc<dyn MarkBuilder>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.marks.contains_key(&name) {
            return Err(RegistryError::MarkAlreadyRegistered(name));
        }
        self.marks.insert(name, builder);
        Ok(())
    }

    /// Map a text-block style to a tag. Last one wins.
    pub fn set_style(&mut self, style: impl Into<String>, tag: impl Into<String>) {
        self.styles.insert(style.into(), tag.into());
    }

    pub fn block(&self, kind: &str) -> Option<&Arc<dyn BlockBuilder>> {
        self.blocks.get(kind)
    }

    pub fn mark(&self, name: &str) -> Option<&Arc<dyn MarkBuilder>> {
        self.marks.get(name)
    }

    pub fn style_tag(&self, style: &str) -> &str {
        self.styles
            .get(style)
            .map(String::as_str)
            .unwrap_or(FALLBACK_TAG)
    }

    pub fn registered_kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.blocks.keys().cloned().collect();
        kinds.sort();
        kinds
    }
}

impl Default for BuilderRegistry {
    fn default() -> Self {
        Self::with_defaults(ImageConfig::default())
    }
}
