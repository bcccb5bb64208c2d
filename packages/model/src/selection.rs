//! Selections over a document
//!
//! A selection is an anchor and a focus position. It does not store its
//! direction; ordering is resolved against a document when needed.

use crate::document::Document;
use crate::key::BlockKey;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub key: BlockKey,
    pub offset: usize,
}

impl Position {
    pub fn new(key: BlockKey, offset: usize) -> Self {
        Self { key, offset }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    anchor: Position,
    focus: Position,
    has_focus: bool,
}

/// A selection resolved against a document: ordered, clamped, indexed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRange {
    pub start: Position,
    pub end: Position,
    pub start_index: usize,
    pub end_index: usize,
}

impl ResolvedRange {
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Char range covered in the block at `index`
    pub fn range_in_block(&self, index: usize, block_len: usize) -> std::ops::Range<usize> {
        let start = if index == self.start_index {
            self.start.offset
        } else {
            0
        };
        let end = if index == self.end_index {
            self.end.offset
        } else {
            block_len
        };
        start..end.max(start)
    }
}

impl Selection {
    pub fn new(anchor: Position, focus: Position) -> Self {
        Self {
            anchor,
            focus,
            has_focus: true,
        }
    }

    pub fn collapsed(key: BlockKey, offset: usize) -> Self {
        let position = Position::new(key, offset);
        Self::new(position.clone(), position)
    }

    /// Selection spanning `start..end` within one block
    pub fn within(key: BlockKey, start: usize, end: usize) -> Self {
        Self::new(Position::new(key.clone(), start), Position::new(key, end))
    }

    pub fn anchor(&self) -> &Position {
        &self.anchor
    }

    pub fn focus(&self) -> &Position {
        &self.focus
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    pub fn with_focus(mut self, has_focus: bool) -> Self {
        self.has_focus = has_focus;
        self
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Whether the focus comes before the anchor in `doc`
    pub fn is_backward(&self, doc: &Document) -> bool {
        let anchor = clamp(doc, &self.anchor);
        let focus = clamp(doc, &self.focus);
        (focus.0, focus.1.offset) < (anchor.0, anchor.1.offset)
    }

    /// Order and clamp the selection against `doc`
    ///
    /// Positions in unknown blocks fall back to the start of the document and
    /// offsets are clamped to block length, so every mutation stays total.
    pub fn resolve(&self, doc: &Document) -> ResolvedRange {
        let a = clamp(doc, &self.anchor);
        let f = clamp(doc, &self.focus);
        let (start, end) = if (f.0, f.1.offset) < (a.0, a.1.offset) {
            (f, a)
        } else {
            (a, f)
        };
        ResolvedRange {
            start_index: start.0,
            start: start.1,
            end_index: end.0,
            end: end.1,
        }
    }
}

fn clamp(doc: &Document, position: &Position) -> (usize, Position) {
    match doc.block_index(&position.key) {
        Some(index) => {
            let len = doc.blocks()[index].len();
            (
                index,
                Position::new(position.key.clone(), position.offset.min(len)),
            )
        }
        None => (0, Position::new(doc.first_block().key().clone(), 0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_orders_backward_selection() {
        let doc = Document::from_text("first\nsecond");
        let first = doc.blocks()[0].key().clone();
        let second = doc.blocks()[1].key().clone();

        let sel = Selection::new(Position::new(second.clone(), 3), Position::new(first.clone(), 2));
        assert!(sel.is_backward(&doc));

        let range = sel.resolve(&doc);
        assert_eq!(range.start, Position::new(first, 2));
        assert_eq!(range.end, Position::new(second, 3));
        assert_eq!((range.start_index, range.end_index), (0, 1));
    }

    #[test]
    fn test_resolve_clamps_offsets_and_unknown_keys() {
        let doc = Document::from_text("abc");
        let key = doc.blocks()[0].key().clone();

        let range = Selection::collapsed(key.clone(), 99).resolve(&doc);
        assert_eq!(range.start.offset, 3);

        let range = Selection::collapsed("missing".into(), 5).resolve(&doc);
        assert_eq!(range.start, Position::new(key, 0));
        assert!(range.is_collapsed());
    }
}
