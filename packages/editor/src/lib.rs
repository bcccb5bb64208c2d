//! # Richtext Editor
//!
//! Editor state machine for the rich-text document core.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ styles: registry + toggle resolver          │
//! │ html:   to_html / from_html                 │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditorState lifecycle               │
//! │  - Style toggles with exclusivity groups    │
//! │  - Paste merging of external HTML           │
//! │  - Key commands and return handling         │
//! │  - Undo/redo history                        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ pipeline: commit → debounce → emit          │
//! │  on_change / on_html_change / on_raw_change │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Document is the source of truth**: HTML and raw views are derived on demand
//! 2. **Immutable states**: every edit replaces the state, snapshots stay valid
//! 3. **Single-threaded**: operations run to completion; only the debounce waits
//! 4. **Total mutations**: unrecognized input is dropped, never raised
//!
//! ## Usage
//!
//! ```rust
//! use richtext_editor::{ContentFormat, Editor, EditorConfig, Subscriber};
//! use richtext_styles::font_size_tag;
//! use std::time::{Duration, Instant};
//!
//! let config = EditorConfig::from_json(r#"{"fontSizes": [12, 14, 16]}"#).unwrap();
//! let mut editor = Editor::new(config).unwrap();
//! editor.subscribe(Subscriber::new().on_html_change(|html| println!("{}", html)));
//!
//! editor.toggle_style(&font_size_tag(14));
//! editor.insert_text("Hello");
//! assert_eq!(
//!     editor.get_content(Some(ContentFormat::Html)).as_html(),
//!     Some(r#"<p><span style="font-size:14px">Hello</span></p>"#)
//! );
//!
//! // Notifications wait for the debounce window
//! assert!(!editor.flush_due());
//! assert!(editor.deadline().unwrap() <= Instant::now() + Duration::from_millis(300));
//! ```

mod commands;
mod config;
mod decorators;
mod editor;
mod errors;
mod paste;
mod pipeline;
mod state;
mod undo_stack;

pub use commands::{backspace_reset, handle_return, Handled, KeyCommand, ReturnModifiers};
pub use config::{
    Captions, ContentFormat, Control, EditorConfig, InitialContent, MediaOptions,
    DEFAULT_DEBOUNCE_MS, DEFAULT_HISTORY_LIMIT,
};
pub use decorators::{CompositeDecorator, Decoration, Decorator, EntityDecorator};
pub use editor::Editor;
pub use errors::{EditorError, EditorResult};
pub use paste::{merge_paste, merge_paste_with, PasteOutcome, PastePayload};
pub use pipeline::{sleep_until_deadline, Content, Pipeline, PipelineStatus, Subscriber};
pub use state::EditorState;
pub use undo_stack::{HistoryEntry, UndoStack};
