//! Markup - the concrete element tree produced by the renderer.

use serde::Serialize;

/// A node in the output tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MarkupNode {
    Element(Element),
    Text { value: String },
}

impl MarkupNode {
    pub fn text(value: impl Into<String>) -> Self {
        MarkupNode::Text {
            value: value.into(),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            MarkupNode::Element(el) => Some(el),
            MarkupNode::Text { .. } => None,
        }
    }

    /// Visible text of this node and its descendants, in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            MarkupNode::Text { value } => out.push_str(value),
            MarkupNode::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
        }
    }

    fn write_html(&self, out: &mut String) {
        match self {
            MarkupNode::Text { value } => escape_into(value, false, out),
            MarkupNode::Element(el) => el.write_html(out),
        }
    }
}

impl From<Element> for MarkupNode {
    fn from(el: Element) -> Self {
        MarkupNode::Element(el)
    }
}

/// Void elements never carry children or a closing tag.
const VOID_TAGS: &[&str] = &["br", "hr", "img"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub tag: String,
    /// Attributes in insertion order.
    pub attrs: Vec<(String, String)>,
    pub children: Vec<MarkupNode>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: impl Into<MarkupNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = MarkupNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn push(&mut self, child: impl Into<MarkupNode>) {
        self.children.push(child.into());
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            escape_into(value, true, out);
            out.push('"');
        }
        out.push('>');
        if VOID_TAGS.contains(&self.tag.as_str()) {
            return;
        }
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

/// Rendered fragment: one root container wrapping every block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Markup {
    root: Element,
}

impl Markup {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Rendered blocks, in input order.
    pub fn blocks(&self) -> &[MarkupNode] {
        &self.root.children
    }

    pub fn into_root(self) -> Element {
        self.root
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.root.children {
            child.collect_text(&mut out);
        }
        out
    }

    pub fn to_html(&self) -> String {
        let mut out = String::with_capacity(256);
        self.root.write_html(&mut out);
        out
    }
}

fn escape_into(raw: &str, in_attr: bool, out: &mut String) {
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attr => out.push_str("&quot;"),
            '\'' if in_attr => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_escapes_text_and_attributes() {
        let markup = Markup::new(
            Element::new("div").with_child(
                Element::new("a")
                    .with_attr("href", "https://x.test/?a=1&b=\"2\"")
                    .with_child(MarkupNode::text("<b> & co")),
            ),
        );
        assert_eq!(
            markup.to_html(),
            "<div><a href=\"https://x.test/?a=1&amp;b=&quot;2&quot;\">&lt;b&gt; &amp; co</a></div>"
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let markup = Markup::new(
            Element::new("div").with_child(Element::new("img").with_attr("src", "a.png")),
        );
        assert_eq!(markup.to_html(), "<div><img src=\"a.png\"></div>");
    }

    #[test]
    fn text_content_follows_document_order() {
        let markup = Markup::new(
            Element::new("div")
                .with_child(Element::new("p").with_child(MarkupNode::text("one ")))
                .with_child(
                    Element::new("p")
                        .with_child(Element::new("em").with_child(MarkupNode::text("two")))
                        .with_child(MarkupNode::text(" three")),
                ),
        );
        assert_eq!(markup.text_content(), "one two three");
        assert_eq!(markup.blocks().len(), 2);
    }
}
