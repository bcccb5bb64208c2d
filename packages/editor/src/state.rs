//! Immutable editor state
//!
//! An `EditorState` is never mutated: every edit produces a new one. The
//! document and decorations sit behind `Arc`, so states (and the undo history
//! holding their documents) share structure cheaply.

use crate::decorators::{Decoration, Decorator};
use richtext_model::{modifier, Document, InlineStyle, Selection, StyleTag};
use richtext_styles::{toggle_style, StyleRegistry, ToggleScope};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct EditorState {
    document: Arc<Document>,
    selection: Selection,
    /// Style for the next typed characters at a collapsed cursor
    inline_style_override: Option<InlineStyle>,
    decorations: Arc<Vec<Decoration>>,
}

impl EditorState {
    /// State with the cursor at the start of `document`
    pub fn new(document: Document, decorator: &dyn Decorator) -> Self {
        let selection = document.selection_at_start();
        Self::create(Arc::new(document), selection, decorator)
    }

    pub fn create(document: Arc<Document>, selection: Selection, decorator: &dyn Decorator) -> Self {
        let decorations = Arc::new(decorator.decorate(&document));
        Self {
            document,
            selection,
            inline_style_override: None,
            decorations,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn shared_document(&self) -> Arc<Document> {
        Arc::clone(&self.document)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn inline_style_override(&self) -> Option<&InlineStyle> {
        self.inline_style_override.as_ref()
    }

    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    /// Style the next typed character would receive
    pub fn current_inline_style(&self) -> InlineStyle {
        match &self.inline_style_override {
            Some(style) => style.clone(),
            None => modifier::inline_style_at(&self.document, &self.selection),
        }
    }

    /// Same content, new selection; a pending style does not survive a move
    pub fn with_selection(&self, selection: Selection) -> Self {
        Self {
            selection,
            inline_style_override: None,
            ..self.clone()
        }
    }

    pub fn with_inline_style_override(&self, style: InlineStyle) -> Self {
        Self {
            inline_style_override: Some(style),
            ..self.clone()
        }
    }

    /// New content and selection, redecorated
    pub fn with_content(
        &self,
        document: Document,
        selection: Selection,
        decorator: &dyn Decorator,
    ) -> Self {
        Self::create(Arc::new(document), selection, decorator)
    }

    /// Same document and selection, decorations recomputed
    pub fn redecorate(&self, decorator: &dyn Decorator) -> Self {
        Self {
            decorations: Arc::new(decorator.decorate(&self.document)),
            ..self.clone()
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.selection.is_collapsed()
    }

    /// Toggle `tag` over the selection, or into the pending style at a
    /// collapsed cursor. `None` when the content would not change.
    pub fn toggle_inline_style(
        &self,
        registry: &StyleRegistry,
        tag: &StyleTag,
        decorator: &dyn Decorator,
    ) -> Option<Self> {
        let step = toggle_style(registry, &self.current_inline_style(), tag, self.is_collapsed());

        match step.scope {
            ToggleScope::PendingStyle => Some(self.with_inline_style_override(step.next)),
            ToggleScope::Range => {
                let mut document = modifier::remove_inline_style_group(
                    &self.document,
                    &self.selection,
                    |existing| registry.in_group(existing, &step.group),
                );
                if let Some(add) = &step.add {
                    document = modifier::apply_inline_style(&document, &self.selection, add);
                }
                if document.content_eq(&self.document) {
                    return None;
                }
                Some(self.with_content(document, self.selection.clone(), decorator))
            }
        }
    }
}
