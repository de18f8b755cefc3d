//! Document - structured rich-text input for the renderer.
//!
//! The wire shape is the portable-text JSON produced by the content source:
//!
//! ```json
//! [
//!   {
//!     "_type": "block",
//!     "_key": "b1",
//!     "style": "normal",
//!     "markDefs": [{ "_key": "l1", "_type": "link", "href": "https://example.com" }],
//!     "children": [
//!       { "_type": "span", "text": "Read ", "marks": [] },
//!       { "_type": "span", "text": "this", "marks": ["strong", "l1"] }
//!     ]
//!   },
//!   { "_type": "image", "asset": { "_ref": "image-abc-640x480-png" } }
//! ]
//! ```
//!
//! Documents are immutable inputs. Anything the renderer does not know about
//! is kept in `fields` so kind-specific builders can read it.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Kind of a text block. Everything else is an embedded object.
pub const TEXT_BLOCK_KIND: &str = "block";

/// Kind of a plain text span.
pub const SPAN_KIND: &str = "span";

/// Ordered sequence of blocks. Order is rendering order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl From<Vec<Block>> for Document {
    fn from(blocks: Vec<Block>) -> Self {
        Self::new(blocks)
    }
}

/// One structural unit of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Empty when the source omitted it; renders as the generic container.
    #[serde(rename = "_type", default, deserialize_with = "null_as_default")]
    pub kind: String,

    #[serde(rename = "_key", default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Block-level styling (`normal`, `h1`, `blockquote`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    /// List marker context (`bullet`, `number`). `None` outside lists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_item: Option<String>,

    /// Nesting depth inside a list, starting at 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,

    /// Lookup table for annotation marks referenced by the spans.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub mark_defs: Vec<MarkDef>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<Span>,

    /// Kind-specific payload (image asset, alt text, ...).
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Block {
    /// A text block with the given style and spans.
    pub fn text(style: impl Into<String>, children: Vec<Span>) -> Self {
        Self {
            kind: TEXT_BLOCK_KIND.to_string(),
            key: None,
            style: Some(style.into()),
            list_item: None,
            level: None,
            mark_defs: Vec::new(),
            children,
            fields: Map::new(),
        }
    }

    /// An embedded object block carrying only a payload.
    pub fn object(kind: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            kind: kind.into(),
            key: None,
            style: None,
            list_item: None,
            level: None,
            mark_defs: Vec::new(),
            children: Vec::new(),
            fields,
        }
    }

    pub fn with_mark_def(mut self, def: MarkDef) -> Self {
        self.mark_defs.push(def);
        self
    }

    pub fn with_list_item(mut self, list_item: impl Into<String>, level: u32) -> Self {
        self.list_item = Some(list_item.into());
        self.level = Some(level);
        self
    }

    pub fn is_text(&self) -> bool {
        self.kind == TEXT_BLOCK_KIND
    }

    pub fn is_list_item(&self) -> bool {
        self.list_item.is_some()
    }

    pub fn level(&self) -> u32 {
        self.level.unwrap_or(1).max(1)
    }

    /// Style, defaulting to `normal` when the source omitted it.
    pub fn style(&self) -> &str {
        self.style.as_deref().unwrap_or("normal")
    }

    pub fn mark_def(&self, key: &str) -> Option<&MarkDef> {
        self.mark_defs.iter().find(|def| def.key == key)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Concatenated span text, in order.
    pub fn plain_text(&self) -> String {
        self.children.iter().map(|span| span.text.as_str()).collect()
    }
}

/// A run of text with zero or more marks.
///
/// A mark is either a decorator name (`strong`, `em`, ...) or the `_key` of
/// an entry in the enclosing block's `mark_defs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    #[serde(rename = "_type", default = "default_span_kind")]
    pub kind: String,

    #[serde(rename = "_key", default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub marks: Vec<String>,
}

/// `null` reads as the field's default, same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_span_kind() -> String {
    SPAN_KIND.to_string()
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::marked(text, &[])
    }

    pub fn marked(text: impl Into<String>, marks: &[&str]) -> Self {
        Self {
            kind: default_span_kind(),
            key: None,
            text: text.into(),
            marks: marks.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// Definition of an annotation mark (link target, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkDef {
    #[serde(rename = "_key", default)]
    pub key: String,

    #[serde(rename = "_type", default)]
    pub kind: String,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl MarkDef {
    pub fn new(key: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: kind.into(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}
