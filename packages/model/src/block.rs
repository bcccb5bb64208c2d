//! # Blocks
//!
//! A block is one paragraph-level unit: a type tag, nesting depth, free-form
//! block data, and text with per-character metadata. Offsets are counted in
//! `char`s, never bytes.

use crate::entity::EntityKey;
use crate::key::BlockKey;
use crate::style::InlineStyle;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::ops::Range;

/// Block data key holding the text alignment
pub const TEXT_ALIGN: &str = "textAlign";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    #[default]
    Unstyled,
    HeaderOne,
    HeaderTwo,
    HeaderThree,
    HeaderFour,
    HeaderFive,
    HeaderSix,
    Blockquote,
    CodeBlock,
    UnorderedListItem,
    OrderedListItem,
    Atomic,
    Custom(String),
}

impl BlockType {
    pub fn as_str(&self) -> &str {
        match self {
            BlockType::Unstyled => "unstyled",
            BlockType::HeaderOne => "header-one",
            BlockType::HeaderTwo => "header-two",
            BlockType::HeaderThree => "header-three",
            BlockType::HeaderFour => "header-four",
            BlockType::HeaderFive => "header-five",
            BlockType::HeaderSix => "header-six",
            BlockType::Blockquote => "blockquote",
            BlockType::CodeBlock => "code-block",
            BlockType::UnorderedListItem => "unordered-list-item",
            BlockType::OrderedListItem => "ordered-list-item",
            BlockType::Atomic => "atomic",
            BlockType::Custom(name) => name,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "unstyled" => BlockType::Unstyled,
            "header-one" => BlockType::HeaderOne,
            "header-two" => BlockType::HeaderTwo,
            "header-three" => BlockType::HeaderThree,
            "header-four" => BlockType::HeaderFour,
            "header-five" => BlockType::HeaderFive,
            "header-six" => BlockType::HeaderSix,
            "blockquote" => BlockType::Blockquote,
            "code-block" => BlockType::CodeBlock,
            "unordered-list-item" => BlockType::UnorderedListItem,
            "ordered-list-item" => BlockType::OrderedListItem,
            "atomic" => BlockType::Atomic,
            other => BlockType::Custom(other.to_string()),
        }
    }

    /// Header type for `level` in 1..=6
    pub fn header(level: u8) -> Option<Self> {
        match level {
            1 => Some(BlockType::HeaderOne),
            2 => Some(BlockType::HeaderTwo),
            3 => Some(BlockType::HeaderThree),
            4 => Some(BlockType::HeaderFour),
            5 => Some(BlockType::HeaderFive),
            6 => Some(BlockType::HeaderSix),
            _ => None,
        }
    }

    pub fn header_level(&self) -> Option<u8> {
        match self {
            BlockType::HeaderOne => Some(1),
            BlockType::HeaderTwo => Some(2),
            BlockType::HeaderThree => Some(3),
            BlockType::HeaderFour => Some(4),
            BlockType::HeaderFive => Some(5),
            BlockType::HeaderSix => Some(6),
            _ => None,
        }
    }

    pub fn is_list_item(&self) -> bool {
        matches!(
            self,
            BlockType::UnorderedListItem | BlockType::OrderedListItem
        )
    }
}

impl From<String> for BlockType {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<BlockType> for String {
    fn from(block_type: BlockType) -> Self {
        block_type.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Some(TextAlign::Left),
            "center" => Some(TextAlign::Center),
            "right" => Some(TextAlign::Right),
            "justify" => Some(TextAlign::Justify),
            _ => None,
        }
    }
}

/// Style set and entity reference of a single character
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterMetadata {
    pub style: InlineStyle,
    pub entity: Option<EntityKey>,
}

impl CharacterMetadata {
    pub fn styled(style: InlineStyle) -> Self {
        Self {
            style,
            entity: None,
        }
    }

    pub fn with_entity(mut self, entity: Option<EntityKey>) -> Self {
        self.entity = entity;
        self
    }
}

/// A maximal stretch of characters sharing identical metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Run<'a> {
    pub range: Range<usize>,
    pub text: &'a str,
    pub meta: &'a CharacterMetadata,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    key: BlockKey,
    block_type: BlockType,
    depth: u8,
    data: Map<String, Value>,
    text: String,
    chars: Vec<CharacterMetadata>,
}

impl Block {
    pub fn new(key: BlockKey, block_type: BlockType) -> Self {
        Self {
            key,
            block_type,
            depth: 0,
            data: Map::new(),
            text: String::new(),
            chars: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: &str, meta: CharacterMetadata) -> Self {
        self.push_text(text, &meta);
        self
    }

    pub fn with_key(mut self, key: BlockKey) -> Self {
        self.key = key;
        self
    }

    pub fn with_type(mut self, block_type: BlockType) -> Self {
        self.block_type = block_type;
        self
    }

    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_data(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    pub fn with_data_map(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    pub fn without_data(mut self, key: &str) -> Self {
        self.data.remove(key);
        self
    }

    pub fn key(&self) -> &BlockKey {
        &self.key
    }

    pub fn block_type(&self) -> &BlockType {
        &self.block_type
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn characters(&self) -> &[CharacterMetadata] {
        &self.chars
    }

    /// Length in chars
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn text_align(&self) -> Option<TextAlign> {
        self.data
            .get(TEXT_ALIGN)
            .and_then(Value::as_str)
            .and_then(TextAlign::parse)
    }

    pub fn style_at(&self, offset: usize) -> Option<&InlineStyle> {
        self.chars.get(offset).map(|c| &c.style)
    }

    pub fn entity_at(&self, offset: usize) -> Option<EntityKey> {
        self.chars.get(offset).and_then(|c| c.entity)
    }

    /// Append text where every char carries `meta`
    pub fn push_text(&mut self, text: &str, meta: &CharacterMetadata) {
        for ch in text.chars() {
            self.text.push(ch);
            self.chars.push(meta.clone());
        }
    }

    /// Append another block's text and metadata
    pub fn append(&mut self, other: &Block) {
        self.text.push_str(&other.text);
        self.chars.extend(other.chars.iter().cloned());
    }

    /// Insert text at `offset`, every char carrying `meta`
    pub fn insert_text(&mut self, offset: usize, text: &str, meta: &CharacterMetadata) {
        let offset = offset.min(self.len());
        let byte = self.byte_offset(offset);
        self.text.insert_str(byte, text);
        let count = text.chars().count();
        self.chars
            .splice(offset..offset, std::iter::repeat(meta.clone()).take(count));
    }

    /// Remove the chars in `range` (clamped)
    pub fn delete_range(&mut self, range: Range<usize>) {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        let (start_byte, end_byte) = (self.byte_offset(start), self.byte_offset(end));
        self.text.replace_range(start_byte..end_byte, "");
        self.chars.drain(start..end);
    }

    /// Split into `(head, tail)` at `offset`; the tail takes `tail_key`
    pub fn split_at(&self, offset: usize, tail_key: BlockKey) -> (Block, Block) {
        let offset = offset.min(self.len());
        let byte = self.byte_offset(offset);

        let head = Block {
            text: self.text[..byte].to_string(),
            chars: self.chars[..offset].to_vec(),
            ..self.clone()
        };
        let tail = Block {
            key: tail_key,
            text: self.text[byte..].to_string(),
            chars: self.chars[offset..].to_vec(),
            ..self.clone()
        };
        (head, tail)
    }

    /// Apply `f` to the metadata of every char in `range` (clamped)
    pub fn map_characters(&mut self, range: Range<usize>, mut f: impl FnMut(&mut CharacterMetadata)) {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        for meta in &mut self.chars[start..end] {
            f(meta);
        }
    }

    /// Group chars into maximal runs of identical metadata
    pub fn runs(&self) -> Vec<Run<'_>> {
        let mut runs = Vec::new();
        let mut start = 0;
        let mut start_byte = 0;
        let bytes: Vec<usize> = self
            .text
            .char_indices()
            .map(|(b, _)| b)
            .chain(std::iter::once(self.text.len()))
            .collect();

        for i in 1..=self.chars.len() {
            if i == self.chars.len() || self.chars[i] != self.chars[start] {
                let end_byte = bytes[i];
                runs.push(Run {
                    range: start..i,
                    text: &self.text[start_byte..end_byte],
                    meta: &self.chars[start],
                });
                start = i;
                start_byte = end_byte;
            }
        }
        runs
    }

    /// Contiguous ranges sharing one entity
    pub fn entity_ranges(&self) -> Vec<(Range<usize>, EntityKey)> {
        let mut ranges = Vec::new();
        let mut current: Option<(usize, EntityKey)> = None;

        for (i, meta) in self.chars.iter().enumerate() {
            match (current, meta.entity) {
                (Some((_, open)), Some(key)) if open == key => {}
                (open, next) => {
                    if let Some((start, key)) = open {
                        ranges.push((start..i, key));
                    }
                    current = next.map(|key| (i, key));
                }
            }
        }
        if let Some((start, key)) = current {
            ranges.push((start..self.chars.len(), key));
        }
        ranges
    }

    fn byte_offset(&self, offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(offset)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    pub(crate) fn set_key(&mut self, key: BlockKey) {
        self.key = key;
    }

    pub(crate) fn set_type(&mut self, block_type: BlockType) {
        self.block_type = block_type;
    }

    pub(crate) fn data_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.data
    }
}
