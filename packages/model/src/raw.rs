//! # Raw Tree Format
//!
//! The full-fidelity, serializable form of a [`Document`]: blocks with their
//! inline style ranges and entity ranges, plus an entity map keyed by decimal
//! strings.
//!
//! ```json
//! {
//!   "blocks": [{
//!     "key": "3f2a1",
//!     "text": "Hello",
//!     "type": "unstyled",
//!     "depth": 0,
//!     "inlineStyleRanges": [{ "offset": 0, "length": 5, "style": "FONTSIZE-14" }],
//!     "entityRanges": [],
//!     "data": {}
//!   }],
//!   "entityMap": {}
//! }
//! ```
//!
//! `to_raw` renumbers entities from 0 in order of first appearance, so saving
//! a loaded document yields the same raw tree.

use crate::block::{Block, BlockType, CharacterMetadata};
use crate::document::Document;
use crate::entity::{Entity, EntityKey, EntityMap, EntityType, Mutability};
use crate::error::{RawError, RawResult};
use crate::key::BlockKey;
use crate::style::StyleTag;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    pub blocks: Vec<RawBlock>,
    #[serde(default)]
    pub entity_map: BTreeMap<String, RawEntity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlock {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "type", default)]
    pub block_type: BlockType,
    #[serde(default)]
    pub depth: u8,
    #[serde(default)]
    pub inline_style_ranges: Vec<RawStyleRange>,
    #[serde(default)]
    pub entity_ranges: Vec<RawEntityRange>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStyleRange {
    pub offset: usize,
    pub length: usize,
    pub style: StyleTag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntityRange {
    pub offset: usize,
    pub length: usize,
    pub key: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntity {
    #[serde(rename = "type")]
    pub kind: EntityType,
    #[serde(default)]
    pub mutability: Mutability,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl RawDocument {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Serialize a document into the raw tree format
pub fn to_raw(doc: &Document) -> RawDocument {
    let mut renumbered: HashMap<EntityKey, u32> = HashMap::new();
    let mut entity_map = BTreeMap::new();

    let blocks = doc
        .blocks()
        .iter()
        .map(|block| {
            let entity_ranges = block
                .entity_ranges()
                .into_iter()
                .filter_map(|(range, key)| {
                    let entity = doc.entity(key)?;
                    let next = renumbered.len() as u32;
                    let raw_key = *renumbered.entry(key).or_insert_with(|| {
                        entity_map.insert(
                            next.to_string(),
                            RawEntity {
                                kind: entity.kind.clone(),
                                mutability: entity.mutability,
                                data: entity.data.clone(),
                            },
                        );
                        next
                    });
                    Some(RawEntityRange {
                        offset: range.start,
                        length: range.len(),
                        key: raw_key,
                    })
                })
                .collect();

            RawBlock {
                key: block.key().to_string(),
                text: block.text().to_string(),
                block_type: block.block_type().clone(),
                depth: block.depth(),
                inline_style_ranges: style_ranges(block),
                entity_ranges,
                data: block.data().clone(),
            }
        })
        .collect();

    RawDocument { blocks, entity_map }
}

fn style_ranges(block: &Block) -> Vec<RawStyleRange> {
    let mut open: BTreeMap<&StyleTag, usize> = BTreeMap::new();
    let mut ranges = Vec::new();

    for (i, meta) in block.characters().iter().enumerate() {
        open.retain(|tag, start| {
            if meta.style.contains(tag) {
                true
            } else {
                ranges.push(RawStyleRange {
                    offset: *start,
                    length: i - *start,
                    style: (*tag).clone(),
                });
                false
            }
        });
        for tag in &meta.style {
            open.entry(tag).or_insert(i);
        }
    }
    for (tag, start) in open {
        ranges.push(RawStyleRange {
            offset: start,
            length: block.len() - start,
            style: tag.clone(),
        });
    }

    ranges.sort_by(|a, b| (a.offset, &a.style).cmp(&(b.offset, &b.style)));
    ranges
}

/// Build a document from the raw tree format
///
/// Ranges past the end of a block are clamped; missing or duplicate block
/// keys are regenerated. Entity ranges must reference the entity map.
pub fn from_raw(raw: &RawDocument) -> RawResult<Document> {
    let mut entities = EntityMap::new();
    for (key, entity) in &raw.entity_map {
        let parsed: u32 = key
            .parse()
            .map_err(|_| RawError::InvalidEntityKey(key.clone()))?;
        entities.insert(
            EntityKey(parsed),
            Entity {
                kind: entity.kind.clone(),
                mutability: entity.mutability,
                data: entity.data.clone(),
            },
        );
    }

    let mut blocks = Vec::with_capacity(raw.blocks.len());
    for raw_block in &raw.blocks {
        let mut block = Block::new(BlockKey::new(raw_block.key.clone()), raw_block.block_type.clone())
            .with_depth(raw_block.depth)
            .with_data_map(raw_block.data.clone())
            .with_text(&raw_block.text, CharacterMetadata::default());
        let len = block.len();

        for range in &raw_block.inline_style_ranges {
            let start = range.offset.min(len);
            let end = range.offset.saturating_add(range.length).min(len);
            block.map_characters(start..end, |meta| {
                meta.style.insert(range.style.clone());
            });
        }

        for range in &raw_block.entity_ranges {
            let key = EntityKey(range.key);
            if !entities.contains(key) {
                return Err(RawError::unknown_entity(raw_block.key.clone(), range.key));
            }
            let start = range.offset.min(len);
            let end = range.offset.saturating_add(range.length).min(len);
            block.map_characters(start..end, |meta| meta.entity = Some(key));
        }

        blocks.push(block);
    }

    Ok(Document::from_blocks(blocks, entities))
}
