//! Chains of mutations across blocks
//!
//! This tests:
//! - Multi-block range removal and style application
//! - Fragment splicing with entity re-registration
//! - Snapshot immutability across edits
//! - Raw format stability after edits

use richtext_model::{
    from_raw, modifier, to_raw, Block, BlockKey, BlockType, CharacterMetadata, Document, Entity,
    EntityMap, EntityType, Fragment, InlineStyle, Position, Selection, StyleTag, BOLD, ITALIC,
};

fn three_paragraphs() -> Document {
    let blocks = ["alpha", "bravo", "charlie"]
        .iter()
        .map(|text| {
            Block::new(BlockKey::from(&text[..1]), BlockType::Unstyled)
                .with_text(text, CharacterMetadata::default())
        })
        .collect();
    Document::from_blocks(blocks, EntityMap::new())
}

fn span(anchor: (&str, usize), focus: (&str, usize)) -> Selection {
    Selection::new(
        Position::new(BlockKey::from(anchor.0), anchor.1),
        Position::new(BlockKey::from(focus.0), focus.1),
    )
}

fn texts(doc: &Document) -> Vec<&str> {
    doc.blocks().iter().map(|b| b.text()).collect()
}

#[test]
fn test_style_across_blocks_then_remove_range() {
    let doc = three_paragraphs();
    let bold = StyleTag::from(BOLD);

    let styled = modifier::apply_inline_style(&doc, &span(("a", 2), ("c", 3)), &bold);
    assert!(!styled.blocks()[0].style_at(1).unwrap().contains(&bold));
    assert!(styled.blocks()[0].style_at(2).unwrap().contains(&bold));
    assert!(styled.blocks()[1].style_at(4).unwrap().contains(&bold));
    assert!(styled.blocks()[2].style_at(2).unwrap().contains(&bold));
    assert!(!styled.blocks()[2].style_at(3).unwrap().contains(&bold));

    let (removed, cursor) = modifier::remove_range(&styled, &span(("a", 3), ("c", 1)));
    assert_eq!(texts(&removed), vec!["alpharlie"]);
    assert_eq!(cursor, Selection::collapsed(BlockKey::from("a"), 3));
    // "p" and "ha" stay bold, "rlie" does not
    assert!(removed.first_block().style_at(2).unwrap().contains(&bold));
    assert!(removed.first_block().style_at(3).unwrap().contains(&bold));
    assert!(!removed.first_block().style_at(5).unwrap().contains(&bold));

    // Earlier snapshots are untouched
    assert_eq!(texts(&doc), vec!["alpha", "bravo", "charlie"]);
    assert!(doc.blocks()[1].style_at(0).unwrap().is_empty());
}

#[test]
fn test_backward_selection_resolves_in_document_order() {
    let doc = three_paragraphs();
    let backward = span(("c", 2), ("a", 1));
    assert!(backward.is_backward(&doc));

    let (removed, cursor) = modifier::remove_range(&doc, &backward);
    assert_eq!(texts(&removed), vec!["aarlie"]);
    assert_eq!(cursor, Selection::collapsed(BlockKey::from("a"), 1));
}

#[test]
fn test_unknown_block_selection_is_clamped() {
    let doc = three_paragraphs();
    let stale = Selection::collapsed(BlockKey::from("gone"), 40);

    let (typed, cursor) =
        modifier::insert_text(&doc, &stale, ">", &InlineStyle::new(), None);
    assert_eq!(texts(&typed), vec![">alpha", "bravo", "charlie"]);
    assert_eq!(cursor, Selection::collapsed(BlockKey::from("a"), 1));
}

#[test]
fn test_fragment_entities_are_registered_per_paste() {
    let mut fragment_entities = EntityMap::new();
    let link = fragment_entities.add(Entity::link("https://example.com", None));
    let fragment = Fragment {
        blocks: vec![Block::new(BlockKey::from("f"), BlockType::Unstyled)
            .with_text("link", CharacterMetadata::default().with_entity(Some(link)))],
        entities: fragment_entities,
    };

    let doc = three_paragraphs();
    let (once, cursor) =
        modifier::replace_with_fragment(&doc, &Selection::collapsed(BlockKey::from("b"), 5), &fragment);
    let (twice, _) = modifier::replace_with_fragment(&once, &cursor, &fragment);

    assert_eq!(texts(&twice), vec!["alpha", "bravo", "link", "link", "charlie"]);
    assert_eq!(twice.entities().len(), 2);

    let first = twice.blocks()[2].entity_at(0).unwrap();
    let second = twice.blocks()[3].entity_at(0).unwrap();
    assert_ne!(first, second);
    assert_eq!(twice.entity(second).unwrap().kind, EntityType::Link);

    // Inserted blocks never reuse a key
    let mut keys: Vec<&BlockKey> = twice.blocks().iter().map(|b| b.key()).collect();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), 5);
}

#[test]
fn test_block_changes_then_raw_round_trip() {
    let doc = three_paragraphs();
    let all = span(("a", 0), ("c", 7));

    let doc = modifier::set_block_type(&doc, &all, &BlockType::OrderedListItem);
    let doc = modifier::set_block_data(
        &doc,
        &Selection::collapsed(BlockKey::from("b"), 0),
        "textAlign",
        Some("right".into()),
    );
    let doc = modifier::apply_inline_style(&doc, &span(("b", 1), ("b", 4)), &StyleTag::from(ITALIC));
    let (doc, _) = modifier::split_block(&doc, &Selection::collapsed(BlockKey::from("c"), 4));

    let raw = to_raw(&doc);
    let restored = from_raw(&raw).expect("valid raw");

    assert!(restored.content_eq(&doc));
    assert_eq!(to_raw(&restored), raw);
    assert_eq!(texts(&restored), vec!["alpha", "bravo", "char", "lie"]);
    assert_eq!(restored.blocks()[3].block_type(), &BlockType::OrderedListItem);
    assert_eq!(raw.blocks[1].data.get("textAlign"), Some(&"right".into()));
}

#[test]
fn test_leaving_list_drops_depth() {
    let doc = Document::from_blocks(
        vec![Block::new(BlockKey::from("l"), BlockType::UnorderedListItem)
            .with_depth(2)
            .with_text("nested", CharacterMetadata::default())],
        EntityMap::new(),
    );

    let para = modifier::set_block_type(
        &doc,
        &Selection::collapsed(BlockKey::from("l"), 0),
        &BlockType::Unstyled,
    );
    assert_eq!(para.first_block().depth(), 0);
}
