//! # Document
//!
//! An immutable, ordered sequence of blocks plus the entities they reference.
//!
//! Every mutation in [`crate::modifier`] takes a `&Document` and returns a new
//! one; callers holding an older document keep a valid snapshot.

use crate::block::{Block, BlockType, CharacterMetadata};
use crate::entity::{Entity, EntityMap};
use crate::key::{BlockKey, KeyGenerator};
use crate::selection::Selection;
use std::collections::HashSet;

/// Sequence of blocks detached from any document (paste payloads)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub blocks: Vec<Block>,
    pub entities: EntityMap,
}

impl Fragment {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    blocks: Vec<Block>,
    entities: EntityMap,
    keys: KeyGenerator,
}

impl Document {
    /// Document holding a single empty unstyled block
    pub fn empty() -> Self {
        Self::from_blocks(Vec::new(), EntityMap::new())
    }

    /// Build a document, guaranteeing at least one block and unique keys
    pub fn from_blocks(blocks: Vec<Block>, entities: EntityMap) -> Self {
        let mut doc = Self {
            blocks: Vec::with_capacity(blocks.len().max(1)),
            entities,
            keys: KeyGenerator::default(),
        };

        let mut seen: HashSet<BlockKey> = blocks
            .iter()
            .map(|b| b.key().clone())
            .filter(|k| !k.is_empty())
            .collect();
        let mut used = HashSet::new();

        for mut block in blocks {
            if block.key().is_empty() || !used.insert(block.key().clone()) {
                let key = doc.keys.next_key(|k| seen.contains(k));
                seen.insert(key.clone());
                used.insert(key.clone());
                block.set_key(key);
            }
            doc.blocks.push(block);
        }

        if doc.blocks.is_empty() {
            let key = doc.keys.next_key(|_| false);
            doc.blocks.push(Block::new(key, BlockType::Unstyled));
        }
        doc
    }

    pub fn from_fragment(fragment: Fragment) -> Self {
        Self::from_blocks(fragment.blocks, fragment.entities)
    }

    /// One unstyled block per line of `text`
    pub fn from_text(text: &str) -> Self {
        let mut doc = Self::empty();
        let blocks = text
            .split('\n')
            .map(|line| {
                let key = doc.next_key();
                Block::new(key, BlockType::Unstyled).with_text(line, CharacterMetadata::default())
            })
            .collect();
        doc.blocks = blocks;
        doc
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn entities(&self) -> &EntityMap {
        &self.entities
    }

    pub fn entity(&self, key: crate::EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    pub fn block(&self, key: &BlockKey) -> Option<&Block> {
        self.blocks.iter().find(|b| b.key() == key)
    }

    pub fn block_index(&self, key: &BlockKey) -> Option<usize> {
        self.blocks.iter().position(|b| b.key() == key)
    }

    pub fn first_block(&self) -> &Block {
        &self.blocks[0]
    }

    pub fn last_block(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    /// Block text joined by newlines
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn has_text(&self) -> bool {
        self.blocks.len() > 1 || !self.blocks[0].is_empty()
    }

    pub fn selection_at_start(&self) -> Selection {
        Selection::collapsed(self.first_block().key().clone(), 0)
    }

    pub fn selection_at_end(&self) -> Selection {
        let last = self.last_block();
        Selection::collapsed(last.key().clone(), last.len())
    }

    /// Compare content while ignoring block keys and entity key numbering
    pub fn content_eq(&self, other: &Document) -> bool {
        self.blocks.len() == other.blocks.len()
            && self
                .blocks
                .iter()
                .zip(other.blocks.iter())
                .all(|(a, b)| self.block_content_eq(a, other, b))
    }

    fn block_content_eq(&self, a: &Block, other: &Document, b: &Block) -> bool {
        a.block_type() == b.block_type()
            && a.depth() == b.depth()
            && a.text() == b.text()
            && a.data() == b.data()
            && a.characters()
                .iter()
                .zip(b.characters().iter())
                .all(|(ca, cb)| {
                    ca.style == cb.style
                        && match (ca.entity, cb.entity) {
                            (None, None) => true,
                            (Some(ka), Some(kb)) => self.entity(ka) == other.entity(kb),
                            _ => false,
                        }
                })
    }

    /// Replace blocks and entities, keeping the key generator state
    pub(crate) fn with_content(&self, blocks: Vec<Block>, entities: EntityMap) -> Self {
        let mut doc = Self {
            blocks,
            entities,
            keys: self.keys.clone(),
        };
        if doc.blocks.is_empty() {
            let key = doc.next_key();
            doc.blocks.push(Block::new(key, BlockType::Unstyled));
        }
        doc
    }

    /// Generate a key unused in this document
    pub(crate) fn next_key(&mut self) -> BlockKey {
        let blocks = &self.blocks;
        self.keys
            .next_key(|k| blocks.iter().any(|b| b.key() == k))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.blocks == other.blocks && self.entities == other.entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{InlineStyle, BOLD};

    #[test]
    fn test_empty_document_has_one_block() {
        let doc = Document::empty();
        assert_eq!(doc.blocks().len(), 1);
        assert!(!doc.has_text());
        assert_eq!(doc.first_block().block_type(), &BlockType::Unstyled);
    }

    #[test]
    fn test_from_text_splits_lines() {
        let doc = Document::from_text("one\ntwo\nthree");
        assert_eq!(doc.blocks().len(), 3);
        assert_eq!(doc.plain_text(), "one\ntwo\nthree");

        let keys: HashSet<_> = doc.blocks().iter().map(|b| b.key().clone()).collect();
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn test_duplicate_keys_are_regenerated() {
        let a = Block::new("x".into(), BlockType::Unstyled);
        let b = Block::new("x".into(), BlockType::Unstyled);
        let doc = Document::from_blocks(vec![a, b], EntityMap::new());
        assert_ne!(doc.blocks()[0].key(), doc.blocks()[1].key());
        assert_eq!(doc.blocks()[0].key().as_str(), "x");
    }

    #[test]
    fn test_content_eq_ignores_keys() {
        let bold = CharacterMetadata::styled(InlineStyle::new().with(BOLD));
        let a = Document::from_blocks(
            vec![Block::new("a".into(), BlockType::Unstyled).with_text("hi", bold.clone())],
            EntityMap::new(),
        );
        let b = Document::from_blocks(
            vec![Block::new("b".into(), BlockType::Unstyled).with_text("hi", bold)],
            EntityMap::new(),
        );
        assert!(a.content_eq(&b));
        assert_ne!(a, b);
    }
}
