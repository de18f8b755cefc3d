//! Span rendering: mark resolution and nesting.
//!
//! Mark order is the order the span declares its marks, first declared
//! outermost. Consecutive spans whose remaining marks start with the same
//! mark share one wrapper element, so
//!
//! ```text
//! "a"[strong] "b"[strong, em] "c"[]
//! ```
//!
//! renders as `<strong>a<em>b</em></strong>c`. Consecutive unmarked spans
//! become a single text node.

use tracing::debug;

use crate::domain::{Block, Element, MarkupNode, Span};

use super::registry::BuilderRegistry;

/// Most marks applied to one span. Later marks are dropped.
pub const MAX_MARKS_PER_SPAN: usize = 16;

/// A mark that resolved to a wrapper element.
struct ResolvedMark<'a> {
    id: &'a str,
    wrapper: Element,
}

struct ResolvedSpan<'a> {
    marks: Vec<ResolvedMark<'a>>,
    text: &'a str,
}

pub(crate) fn render_spans(registry: &BuilderRegistry, block: &Block) -> Vec<MarkupNode> {
    let spans: Vec<ResolvedSpan<'_>> = block
        .children
        .iter()
        .map(|span| ResolvedSpan {
            marks: resolve_marks(registry, block, span),
            text: span.text.as_str(),
        })
        .collect();
    nest(&spans, 0)
}

/// Resolve a span's mark ids, dropping any that do not resolve.
///
/// An id naming an entry in the block's `mark_defs` is an annotation and is
/// built by the builder for the def's type. Any other id is looked up as a
/// decorator name.
fn resolve_marks<'a>(
    registry: &BuilderRegistry,
    block: &'a Block,
    span: &'a Span,
) -> Vec<ResolvedMark<'a>> {
    let mut resolved: Vec<ResolvedMark<'a>> = Vec::with_capacity(span.marks.len());
    for id in &span.marks {
        if resolved.iter().any(|m| m.id == id.as_str()) {
            continue;
        }
        if resolved.len() == MAX_MARKS_PER_SPAN {
            debug!(block = ?block.key, "mark limit reached, remaining marks dropped");
            break;
        }
        let wrapper = match block.mark_def(id) {
            Some(def) => registry
                .mark(&def.kind)
                .and_then(|builder| builder.wrap(Some(def))),
            None => registry.mark(id).and_then(|builder| builder.wrap(None)),
        };
        match wrapper {
            Some(wrapper) => resolved.push(ResolvedMark {
                id: id.as_str(),
                wrapper,
            }),
            None => debug!(mark = %id, block = ?block.key, "unresolved mark dropped"),
        }
    }
    resolved
}

fn nest(spans: &[ResolvedSpan<'_>], depth: usize) -> Vec<MarkupNode> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < spans.len() {
        match spans[i].marks.get(depth) {
            None => {
                let mut text = String::new();
                while i < spans.len() && spans[i].marks.len() <= depth {
                    text.push_str(spans[i].text);
                    i += 1;
                }
                if !text.is_empty() {
                    out.push(MarkupNode::text(text));
                }
            }
            Some(mark) => {
                let start = i;
                while i < spans.len() && spans[i].marks.get(depth).map(|m| m.id) == Some(mark.id) {
                    i += 1;
                }
                let mut wrapper = mark.wrapper.clone();
                wrapper.children = nest(&spans[start..i], depth + 1);
                out.push(wrapper.into());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Markup, MarkDef};

    fn html(block: &Block) -> String {
        let registry = BuilderRegistry::default();
        let nodes = render_spans(&registry, block);
        Markup::new(Element::new("p").with_children(nodes)).to_html()
    }

    #[test]
    fn plain_spans_merge_into_one_text_node() {
        let block = Block::text("normal", vec![Span::plain("Hello, "), Span::plain("world")]);
        let registry = BuilderRegistry::default();
        let nodes = render_spans(&registry, &block);
        assert_eq!(nodes, vec![MarkupNode::text("Hello, world")]);
    }

    #[test]
    fn marks_nest_in_declared_order() {
        let block = Block::text("normal", vec![Span::marked("x", &["strong", "em"])]);
        assert_eq!(html(&block), "<p><strong><em>x</em></strong></p>");

        let block = Block::text("normal", vec![Span::marked("x", &["em", "strong"])]);
        assert_eq!(html(&block), "<p><em><strong>x</strong></em></p>");
    }

    #[test]
    fn consecutive_spans_share_an_outer_mark() {
        let block = Block::text(
            "normal",
            vec![
                Span::marked("a", &["strong"]),
                Span::marked("b", &["strong", "em"]),
                Span::plain("c"),
            ],
        );
        assert_eq!(html(&block), "<p><strong>a<em>b</em></strong>c</p>");
    }

    #[test]
    fn annotation_resolves_through_mark_defs() {
        let block = Block::text(
            "normal",
            vec![Span::plain("see "), Span::marked("docs", &["l1", "em"])],
        )
        .with_mark_def(MarkDef::new("l1", "link").with_field("href", "https://example.com"));
        assert_eq!(
            html(&block),
            "<p>see <a href=\"https://example.com\"><em>docs</em></a></p>"
        );
    }

    #[test]
    fn unresolved_marks_are_no_ops() {
        let block = Block::text(
            "normal",
            vec![
                Span::marked("a", &["missing-def"]),
                Span::marked("b", &["sparkle", "strong"]),
            ],
        )
        .with_mark_def(MarkDef::new("l1", "footnote"));
        assert_eq!(html(&block), "<p>a<strong>b</strong></p>");
    }

    #[test]
    fn link_without_href_is_dropped() {
        let block = Block::text("normal", vec![Span::marked("x", &["l1"])])
            .with_mark_def(MarkDef::new("l1", "link"));
        assert_eq!(html(&block), "<p>x</p>");
    }

    #[test]
    fn marks_beyond_the_limit_are_dropped() {
        let keys: Vec<String> = (0..1_000).map(|n| format!("l{n}")).collect();
        let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        let mut block = Block::text("normal", vec![Span::marked("deep", &refs)]);
        for key in &keys {
            block = block.with_mark_def(MarkDef::new(key.as_str(), "link").with_field("href", "/"));
        }

        let registry = BuilderRegistry::default();
        let mut depth = 0;
        let mut nodes = render_spans(&registry, &block);
        while let [MarkupNode::Element(el)] = nodes.as_slice() {
            depth += 1;
            nodes = el.children.clone();
        }
        assert_eq!(depth, MAX_MARKS_PER_SPAN);
        assert_eq!(nodes, vec![MarkupNode::text("deep")]);
    }

    #[test]
    fn repeated_mark_ids_apply_once() {
        let block = Block::text("normal", vec![Span::marked("x", &["em", "em"])]);
        assert_eq!(html(&block), "<p><em>x</em></p>");
    }
}
