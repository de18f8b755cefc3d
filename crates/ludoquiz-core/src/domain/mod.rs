//! Domain model (ids, results, documents, markup, quiz content, ...).

pub mod document;
pub mod errors;
pub mod events;
pub mod ids;
pub mod markup;
pub mod quiz;
pub mod result;
pub mod state;

pub use self::document::{Block, Document, MarkDef, Span, SPAN_KIND, TEXT_BLOCK_KIND};
pub use self::errors::{BackendError, QuizError, SinkError};
pub use self::events::{HostNotification, HostRequest};
pub use self::ids::QuizId;
pub use self::markup::{Element, Markup, MarkupNode};
pub use self::quiz::{Answer, Question, Quiz, Slug};
pub use self::result::QuizResult;
pub use self::state::ConnectionState;
