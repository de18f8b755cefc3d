//! Default builders.

use serde_json::Value;

use crate::config::ImageConfig;
use crate::domain::{Block, Element, MarkDef, MarkupNode};

use super::context::RenderContext;
use super::registry::{BlockBuilder, MarkBuilder};

/// Text blocks: style tag (or `li` inside a list) around the rendered spans.
pub struct TextBlockBuilder;

impl BlockBuilder for TextBlockBuilder {
    fn build(&self, block: &Block, ctx: &RenderContext<'_>) -> Option<MarkupNode> {
        let tag = if block.is_list_item() {
            "li"
        } else {
            ctx.style_tag(block.style())
        };
        Some(
            Element::new(tag)
                .with_children(ctx.render_spans(block))
                .into(),
        )
    }
}

/// Image blocks: `<figure><img src alt></figure>`.
///
/// The source comes from `asset.url` when the content source expanded the
/// asset, otherwise from the asset reference
/// `image-<id>-<width>x<height>-<ext>` and the configured CDN.
pub struct ImageBlockBuilder {
    config: ImageConfig,
}

impl ImageBlockBuilder {
    pub fn new(config: ImageConfig) -> Self {
        Self { config }
    }

    pub fn image_url(&self, block: &Block) -> Option<String> {
        let asset = block.field("asset")?;
        if let Some(url) = asset.get("url").and_then(Value::as_str) {
            return Some(url.to_string());
        }
        let reference = asset.get("_ref").and_then(Value::as_str)?;
        self.url_for_ref(reference)
    }

    fn url_for_ref(&self, reference: &str) -> Option<String> {
        if self.config.project_id.is_empty() {
            return None;
        }
        let rest = reference.strip_prefix("image-")?;
        let mut parts = rest.rsplitn(3, '-');
        let ext = parts.next()?;
        let dims = parts.next()?;
        let id = parts.next()?;
        let (w, h) = dims.split_once('x')?;
        let numeric = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if id.is_empty() || ext.is_empty() || !numeric(w) || !numeric(h) {
            return None;
        }
        Some(format!(
            "{}/{}/{}/{id}-{dims}.{ext}",
            self.config.base_url.trim_end_matches('/'),
            self.config.project_id,
            self.config.dataset,
        ))
    }
}

impl BlockBuilder for ImageBlockBuilder {
    fn build(&self, block: &Block, _ctx: &RenderContext<'_>) -> Option<MarkupNode> {
        let src = self.image_url(block)?;
        let alt = block.field_str("alt").unwrap_or_default();
        Some(
            Element::new("figure")
                .with_child(Element::new("img").with_attr("src", src).with_attr("alt", alt))
                .into(),
        )
    }
}

/// Decorator marks: a fixed wrapper element, no definition needed.
pub struct DecoratorMark {
    name: String,
    wrapper: Element,
}

impl DecoratorMark {
    pub fn new(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wrapper: Element::new(tag),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.wrapper = self.wrapper.with_attr(name, value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl MarkBuilder for DecoratorMark {
    fn wrap(&self, _def: Option<&MarkDef>) -> Option<Element> {
        Some(self.wrapper.clone())
    }
}

/// `link` annotations: `<a href>` with the def's target.
pub struct LinkMark;

impl MarkBuilder for LinkMark {
    fn wrap(&self, def: Option<&MarkDef>) -> Option<Element> {
        let href = def?.field_str("href")?;
        Some(Element::new("a").with_attr("href", href))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::registry::BuilderRegistry;
    use rstest::rstest;
    use serde_json::json;

    fn image_builder() -> ImageBlockBuilder {
        ImageBlockBuilder::new(ImageConfig {
            base_url: "https://cdn.sanity.io/images/".to_string(),
            project_id: "proj".to_string(),
            dataset: "production".to_string(),
        })
    }

    fn image_block(asset: Value) -> Block {
        let fields = json!({ "asset": asset, "alt": "poster" });
        Block::object("image", fields.as_object().cloned().unwrap_or_default())
    }

    #[rstest]
    #[case("image-Tb9Ew8CX-2000x3000-jpg", Some("https://cdn.sanity.io/images/proj/production/Tb9Ew8CX-2000x3000.jpg"))]
    #[case("image-a-b-c-10x20-png", Some("https://cdn.sanity.io/images/proj/production/a-b-c-10x20.png"))]
    #[case("image-abc-widexhigh-png", None)]
    #[case("file-abc-10x20-png", None)]
    #[case("image-10x20-png", None)]
    fn resolves_asset_references(#[case] reference: &str, #[case] expected: Option<&str>) {
        let block = image_block(json!({ "_ref": reference }));
        assert_eq!(image_builder().image_url(&block).as_deref(), expected);
    }

    #[test]
    fn expanded_asset_url_wins() {
        let block = image_block(json!({ "_ref": "image-x-1x1-png", "url": "https://img.test/x.png" }));
        assert_eq!(
            image_builder().image_url(&block).as_deref(),
            Some("https://img.test/x.png")
        );
    }

    #[test]
    fn no_project_means_no_reference_resolution() {
        let builder = ImageBlockBuilder::new(ImageConfig::default());
        let block = image_block(json!({ "_ref": "image-abc-10x20-png" }));
        assert_eq!(builder.image_url(&block), None);
    }

    #[test]
    fn image_builds_a_figure() {
        let registry = BuilderRegistry::new();
        let ctx = RenderContext::new(&registry);
        let block = image_block(json!({ "_ref": "image-abc-10x20-png" }));

        let node = image_builder().build(&block, &ctx).unwrap();
        let figure = node.as_element().unwrap();
        assert_eq!(figure.tag, "figure");
        let img = figure.children[0].as_element().unwrap();
        assert_eq!(img.attr("alt"), Some("poster"));
        assert_eq!(
            img.attr("src"),
            Some("https://cdn.sanity.io/images/proj/production/abc-10x20.png")
        );
    }

    #[test]
    fn link_needs_a_definition_with_href() {
        assert!(LinkMark.wrap(None).is_none());
        assert!(LinkMark.wrap(Some(&MarkDef::new("k", "link"))).is_none());
        let el = LinkMark
            .wrap(Some(&MarkDef::new("k", "link").with_field("href", "/about")))
            .unwrap();
        assert_eq!(el.attr("href"), Some("/about"));
    }
}
