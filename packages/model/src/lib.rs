//! # Richtext Model
//!
//! The immutable document model underneath the rich-text editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: Document + Selection + modifiers     │
//! │  - Blocks with per-char style/entity        │
//! │  - Pure mutation primitives                 │
//! │  - Raw tree format (serde)                  │
//! └─────────────────────────────────────────────┘
//!            ↓                       ↓
//! ┌──────────────────────┐ ┌────────────────────┐
//! │ styles: registry +   │ │ html: to_html /    │
//! │ resolver             │ │ from_html          │
//! └──────────────────────┘ └────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditorState, paste, change pipeline │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use richtext_model::{modifier, Document, Selection, StyleTag};
//!
//! let doc = Document::from_text("Hello world");
//! let key = doc.first_block().key().clone();
//! let bold = StyleTag::from("BOLD");
//!
//! let styled = modifier::apply_inline_style(&doc, &Selection::within(key, 0, 5), &bold);
//! assert!(styled.first_block().style_at(0).unwrap().contains(&bold));
//! // The original document is untouched
//! assert!(doc.first_block().style_at(0).unwrap().is_empty());
//! ```

mod block;
mod document;
mod entity;
mod error;
mod key;
pub mod modifier;
pub mod raw;
mod selection;
mod style;

pub use block::{Block, BlockType, CharacterMetadata, Run, TextAlign, TEXT_ALIGN};
pub use document::{Document, Fragment};
pub use entity::{Entity, EntityKey, EntityMap, EntityType, Mutability};
pub use error::{RawError, RawResult};
pub use key::{BlockKey, KeyGenerator};
pub use raw::{from_raw, to_raw, RawDocument};
pub use selection::{Position, ResolvedRange, Selection};
pub use style::{
    InlineStyle, StyleTag, BOLD, CODE, ITALIC, STRIKETHROUGH, SUBSCRIPT, SUPERSCRIPT, UNDERLINE,
};
