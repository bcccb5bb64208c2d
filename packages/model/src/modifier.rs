//! # Modifier
//!
//! Primitive mutation operators over an immutable [`Document`].
//!
//! Each operator takes the current document and a selection and returns a new
//! document (plus the selection afterwards where the operation moves it).
//! Operators are total: selections are resolved and clamped first, so no
//! valid document/selection pair can make them panic.

use crate::block::{Block, BlockType, CharacterMetadata};
use crate::document::{Document, Fragment};
use crate::entity::EntityKey;
use crate::selection::{ResolvedRange, Selection};
use crate::style::{InlineStyle, StyleTag};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Add `tag` to every char in the selection
pub fn apply_inline_style(doc: &Document, selection: &Selection, tag: &StyleTag) -> Document {
    map_selected_characters(doc, selection, |meta| {
        meta.style.insert(tag.clone());
    })
}

/// Remove `tag` from every char in the selection
pub fn remove_inline_style(doc: &Document, selection: &Selection, tag: &StyleTag) -> Document {
    map_selected_characters(doc, selection, |meta| {
        meta.style.remove(tag);
    })
}

/// Remove every tag matching `in_group` from every char in the selection
pub fn remove_inline_style_group(
    doc: &Document,
    selection: &Selection,
    in_group: impl Fn(&StyleTag) -> bool,
) -> Document {
    map_selected_characters(doc, selection, |meta| {
        meta.style.retain(|tag| !in_group(tag));
    })
}

fn map_selected_characters(
    doc: &Document,
    selection: &Selection,
    mut f: impl FnMut(&mut CharacterMetadata),
) -> Document {
    let range = selection.resolve(doc);
    if range.is_collapsed() {
        return doc.clone();
    }

    let mut blocks = doc.blocks().to_vec();
    for index in range.start_index..=range.end_index {
        let block = &mut blocks[index];
        let chars = range.range_in_block(index, block.len());
        block.map_characters(chars, &mut f);
    }
    doc.with_content(blocks, doc.entities().clone())
}

/// Style a newly typed character would receive at the selection
///
/// Collapsed: the char before the cursor, else the first char of the block,
/// else the last char of the nearest non-empty block above. Expanded: the
/// first selected char.
pub fn inline_style_at(doc: &Document, selection: &Selection) -> InlineStyle {
    let range = selection.resolve(doc);
    let block = &doc.blocks()[range.start_index];
    let offset = range.start.offset;

    let found = if range.is_collapsed() {
        if offset > 0 {
            block.style_at(offset - 1)
        } else if !block.is_empty() {
            block.style_at(0)
        } else {
            doc.blocks()[..range.start_index]
                .iter()
                .rev()
                .find(|b| !b.is_empty())
                .and_then(|b| b.style_at(b.len() - 1))
        }
    } else if offset < block.len() {
        block.style_at(offset)
    } else {
        offset.checked_sub(1).and_then(|o| block.style_at(o))
    };

    found.cloned().unwrap_or_default()
}

/// Delete the selected content, merging the boundary blocks
pub fn remove_range(doc: &Document, selection: &Selection) -> (Document, Selection) {
    let range = selection.resolve(doc);
    let cursor = Selection::collapsed(range.start.key.clone(), range.start.offset);
    if range.is_collapsed() {
        return (doc.clone(), cursor);
    }

    let mut blocks = doc.blocks().to_vec();
    if range.start_index == range.end_index {
        blocks[range.start_index].delete_range(range.start.offset..range.end.offset);
    } else {
        let mut tail = blocks[range.end_index].clone();
        tail.delete_range(0..range.end.offset);

        let head = &mut blocks[range.start_index];
        let head_len = head.len();
        head.delete_range(range.start.offset..head_len);
        head.append(&tail);

        blocks.drain(range.start_index + 1..=range.end_index);
    }

    (doc.with_content(blocks, doc.entities().clone()), cursor)
}

/// Replace the selection with `text`, every char carrying `style` and `entity`
pub fn insert_text(
    doc: &Document,
    selection: &Selection,
    text: &str,
    style: &InlineStyle,
    entity: Option<EntityKey>,
) -> (Document, Selection) {
    let (doc, cursor) = remove_range(doc, selection);
    let range = cursor.resolve(&doc);

    let mut blocks = doc.blocks().to_vec();
    let meta = CharacterMetadata::styled(style.clone()).with_entity(entity);
    blocks[range.start_index].insert_text(range.start.offset, text, &meta);

    let after = Selection::collapsed(
        range.start.key.clone(),
        range.start.offset + text.chars().count(),
    );
    (doc.with_content(blocks, doc.entities().clone()), after)
}

/// Split the block at the selection; the new block keeps the type
pub fn split_block(doc: &Document, selection: &Selection) -> (Document, Selection) {
    let (mut doc, cursor) = remove_range(doc, selection);
    let range = cursor.resolve(&doc);
    let tail_key = doc.next_key();

    let mut blocks = doc.blocks().to_vec();
    let (head, tail) = blocks[range.start_index].split_at(range.start.offset, tail_key.clone());
    blocks.splice(range.start_index..=range.start_index, [head, tail]);

    (
        doc.with_content(blocks, doc.entities().clone()),
        Selection::collapsed(tail_key, 0),
    )
}

/// Replace the selection with whole fragment blocks
///
/// The block holding the cursor is split into `before` and `after`, and the
/// fragment blocks are inserted between them under fresh keys, with their
/// entities registered in the target document. Empty halves are dropped.
/// An empty fragment only removes the selected range.
pub fn replace_with_fragment(
    doc: &Document,
    selection: &Selection,
    fragment: &Fragment,
) -> (Document, Selection) {
    let (mut doc, cursor) = remove_range(doc, selection);
    if fragment.is_empty() {
        return (doc, cursor);
    }

    let range = cursor.resolve(&doc);
    let mut entities = doc.entities().clone();
    let mut remap: HashMap<EntityKey, EntityKey> = HashMap::new();
    let mut inserted: Vec<Block> = Vec::with_capacity(fragment.blocks.len());

    for source in &fragment.blocks {
        let mut block = source.clone();
        block.set_key(doc.next_key());
        let len = block.len();
        block.map_characters(0..len, |meta| {
            meta.entity = meta.entity.and_then(|key| {
                let entity = fragment.entities.get(key)?;
                Some(
                    *remap
                        .entry(key)
                        .or_insert_with(|| entities.add(entity.clone())),
                )
            });
        });
        inserted.push(block);
    }

    let tail_key = doc.next_key();
    let (head, tail) = doc.blocks()[range.start_index].split_at(range.start.offset, tail_key);

    let after = inserted
        .last()
        .map(|b| Selection::collapsed(b.key().clone(), b.len()))
        .unwrap_or(cursor);

    debug!(
        inserted = inserted.len(),
        entities = remap.len(),
        "Splicing fragment into document"
    );

    let mut blocks = Vec::with_capacity(doc.blocks().len() + inserted.len() + 1);
    blocks.extend_from_slice(&doc.blocks()[..range.start_index]);
    if !head.is_empty() {
        blocks.push(head);
    }
    blocks.extend(inserted);
    if !tail.is_empty() {
        blocks.push(tail);
    }
    blocks.extend_from_slice(&doc.blocks()[range.start_index + 1..]);

    (doc.with_content(blocks, entities), after)
}

/// Set the type of every block touched by the selection
///
/// Blocks leaving list types drop their nesting depth.
pub fn set_block_type(doc: &Document, selection: &Selection, block_type: &BlockType) -> Document {
    map_selected_blocks(doc, &selection.resolve(doc), |block| {
        block.set_type(block_type.clone());
        if !block_type.is_list_item() {
            *block = block.clone().with_depth(0);
        }
    })
}

/// Set (or with `None`, remove) a block data entry on every touched block
pub fn set_block_data(
    doc: &Document,
    selection: &Selection,
    key: &str,
    value: Option<Value>,
) -> Document {
    map_selected_blocks(doc, &selection.resolve(doc), |block| match &value {
        Some(value) => {
            block.data_mut().insert(key.to_string(), value.clone());
        }
        None => {
            block.data_mut().remove(key);
        }
    })
}

fn map_selected_blocks(doc: &Document, range: &ResolvedRange, mut f: impl FnMut(&mut Block)) -> Document {
    let mut blocks = doc.blocks().to_vec();
    for block in &mut blocks[range.start_index..=range.end_index] {
        f(block);
    }
    doc.with_content(blocks, doc.entities().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, EntityMap};
    use crate::selection::Position;
    use crate::style::BOLD;

    fn styled(tags: &[&str]) -> CharacterMetadata {
        CharacterMetadata::styled(tags.iter().map(|t| StyleTag::from(*t)).collect())
    }

    #[test]
    fn test_apply_and_remove_across_blocks() {
        let doc = Document::from_text("hello\nworld");
        let first = doc.blocks()[0].key().clone();
        let second = doc.blocks()[1].key().clone();
        let sel = Selection::new(Position::new(first, 3), Position::new(second, 2));

        let bold = StyleTag::from(BOLD);
        let doc = apply_inline_style(&doc, &sel, &bold);
        let flags: Vec<bool> = doc.blocks()[0]
            .characters()
            .iter()
            .map(|c| c.style.contains(&bold))
            .collect();
        assert_eq!(flags, vec![false, false, false, true, true]);
        assert!(doc.blocks()[1].style_at(1).map(|s| s.contains(&bold)).unwrap_or(false));
        assert!(!doc.blocks()[1].style_at(2).map(|s| s.contains(&bold)).unwrap_or(true));

        let doc = remove_inline_style(&doc, &sel, &bold);
        assert!(doc
            .blocks()
            .iter()
            .all(|b| b.characters().iter().all(|c| c.style.is_empty())));
    }

    #[test]
    fn test_remove_group_leaves_other_tags() {
        let block = Block::new("a".into(), BlockType::Unstyled)
            .with_text("ab", styled(&["FONTSIZE-12", "COLOR-FF0000"]));
        let doc = Document::from_blocks(vec![block], EntityMap::new());
        let sel = Selection::within("a".into(), 0, 2);

        let doc = remove_inline_style_group(&doc, &sel, |t| t.as_str().starts_with("FONTSIZE-"));
        let style = doc.blocks()[0].style_at(0).cloned().unwrap_or_default();
        assert!(style.has("COLOR-FF0000"));
        assert!(!style.has("FONTSIZE-12"));
    }

    #[test]
    fn test_inline_style_at_collapsed_cursor() {
        let block = Block::new("a".into(), BlockType::Unstyled)
            .with_text("ab", styled(&[BOLD]))
            .with_text("cd", CharacterMetadata::default());
        let empty = Block::new("b".into(), BlockType::Unstyled);
        let doc = Document::from_blocks(vec![block, empty], EntityMap::new());

        assert!(inline_style_at(&doc, &Selection::collapsed("a".into(), 2)).has(BOLD));
        assert!(inline_style_at(&doc, &Selection::collapsed("a".into(), 0)).has(BOLD));
        assert!(inline_style_at(&doc, &Selection::collapsed("a".into(), 3)).is_empty());
        // Empty block looks upward to the last char of the previous block
        assert!(inline_style_at(&doc, &Selection::collapsed("b".into(), 0)).is_empty());
    }

    #[test]
    fn test_remove_range_merges_blocks() {
        let doc = Document::from_text("hello\nbig\nworld");
        let first = doc.blocks()[0].key().clone();
        let last = doc.blocks()[2].key().clone();
        let sel = Selection::new(Position::new(last, 1), Position::new(first.clone(), 4));

        let (doc, cursor) = remove_range(&doc, &sel);
        assert_eq!(doc.plain_text(), "hellorld");
        assert_eq!(cursor, Selection::collapsed(first, 4));
    }

    #[test]
    fn test_insert_text_replaces_selection() {
        let doc = Document::from_text("hello world");
        let key = doc.blocks()[0].key().clone();
        let style = InlineStyle::new().with(BOLD);

        let (doc, cursor) = insert_text(&doc, &Selection::within(key.clone(), 6, 11), "there", &style, None);
        assert_eq!(doc.plain_text(), "hello there");
        assert_eq!(cursor, Selection::collapsed(key, 11));
        assert!(doc.blocks()[0].style_at(6).map(|s| s.has(BOLD)).unwrap_or(false));
    }

    #[test]
    fn test_split_block_keeps_type() {
        let block = Block::new("h".into(), BlockType::HeaderOne)
            .with_text("Title", CharacterMetadata::default());
        let doc = Document::from_blocks(vec![block], EntityMap::new());

        let (doc, cursor) = split_block(&doc, &Selection::collapsed("h".into(), 2));
        assert_eq!(doc.blocks().len(), 2);
        assert_eq!(doc.blocks()[0].text(), "Ti");
        assert_eq!(doc.blocks()[1].text(), "tle");
        assert_eq!(doc.blocks()[1].block_type(), &BlockType::HeaderOne);
        assert_eq!(cursor.anchor().key, *doc.blocks()[1].key());
    }

    #[test]
    fn test_fragment_remaps_entities() {
        let mut existing = EntityMap::new();
        existing.add(Entity::link("https://old.example", None));
        let target = Block::new("t".into(), BlockType::Unstyled)
            .with_text("ab", CharacterMetadata::default());
        let doc = Document::from_blocks(vec![target], existing);

        let mut fragment_entities = EntityMap::new();
        let key = fragment_entities.add(Entity::link("https://new.example", None));
        let fragment = Fragment {
            blocks: vec![Block::new("f".into(), BlockType::Unstyled)
                .with_text("X", CharacterMetadata::default().with_entity(Some(key)))],
            entities: fragment_entities,
        };

        let (doc, cursor) = replace_with_fragment(&doc, &Selection::collapsed("t".into(), 1), &fragment);
        let texts: Vec<&str> = doc.blocks().iter().map(|b| b.text()).collect();
        assert_eq!(texts, vec!["a", "X", "b"]);

        let inserted = &doc.blocks()[1];
        let entity = inserted.entity_at(0).and_then(|k| doc.entity(k));
        assert_eq!(entity.and_then(|e| e.data_str("href")), Some("https://new.example"));
        assert_eq!(doc.entities().len(), 2);
        assert_eq!(cursor, Selection::collapsed(inserted.key().clone(), 1));
    }

    #[test]
    fn test_set_block_type_resets_depth() {
        let block = Block::new("l".into(), BlockType::UnorderedListItem).with_depth(2);
        let doc = Document::from_blocks(vec![block], EntityMap::new());
        let doc = set_block_type(&doc, &Selection::collapsed("l".into(), 0), &BlockType::Blockquote);
        assert_eq!(doc.blocks()[0].block_type(), &BlockType::Blockquote);
        assert_eq!(doc.blocks()[0].depth(), 0);
    }
}
