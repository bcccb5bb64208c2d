//! Documents built in memory survive a trip through HTML

use richtext_html::{from_html, from_html_with_report, to_html, HtmlOptions};
use richtext_model::{
    Block, BlockKey, BlockType, CharacterMetadata, Document, Entity, EntityMap, EntityType,
    InlineStyle, BOLD, ITALIC, STRIKETHROUGH, SUBSCRIPT, SUPERSCRIPT, TEXT_ALIGN, UNDERLINE,
};
use richtext_styles::{
    background_color_tag, color_tag, font_family_tag, font_size_tag, EnabledFamilies,
    StyleRegistry, StyleVocabulary,
};

fn registry() -> StyleRegistry {
    StyleRegistry::new(StyleVocabulary::default(), &EnabledFamilies::all()).expect("valid")
}

fn plain() -> CharacterMetadata {
    CharacterMetadata::default()
}

fn styled(style: InlineStyle) -> CharacterMetadata {
    CharacterMetadata::styled(style)
}

fn assert_round_trip(doc: &Document, options: HtmlOptions) {
    let registry = registry();
    let html = to_html(doc, &registry, options);
    let (back, warnings) = from_html_with_report(&html, &registry);

    assert!(warnings.is_empty(), "warnings for {}: {:?}", html, warnings);
    assert!(
        doc.content_eq(&back),
        "round trip changed content\nhtml: {}\nbefore: {:#?}\nafter: {:#?}",
        html,
        doc.blocks(),
        back.blocks()
    );
}

fn sample_document() -> Document {
    let mut entities = EntityMap::new();
    let link = entities.add(Entity::link("https://example.com", None));
    let image = entities.add(Entity::media(EntityType::Image, "https://example.com/cat.png"));
    let video = entities.add(Entity::media(EntityType::Video, "https://example.com/a.mp4"));

    let heading = InlineStyle::new().with(font_family_tag("Georgia"));
    let fancy = InlineStyle::new()
        .with(BOLD)
        .with(ITALIC)
        .with(UNDERLINE)
        .with(font_size_tag(24))
        .with(color_tag("#c0392b"))
        .with(background_color_tag("#fdda00"));

    let blocks = vec![
        Block::new(BlockKey::from("h"), BlockType::HeaderOne)
            .with_text("Release ", plain())
            .with_text("notes", styled(heading)),
        Block::new(BlockKey::from("p"), BlockType::Unstyled)
            .with_data(TEXT_ALIGN, "right")
            .with_text("Plain, ", plain())
            .with_text("fancy", styled(fancy))
            .with_text(" and ", plain())
            .with_text("linked", plain().with_entity(Some(link)))
            .with_text(" text.", plain()),
        Block::new(BlockKey::from("s"), BlockType::Unstyled)
            .with_text("H", plain())
            .with_text("2", styled(InlineStyle::new().with(SUBSCRIPT)))
            .with_text("O e=mc", plain())
            .with_text("2", styled(InlineStyle::new().with(SUPERSCRIPT)))
            .with_text(" ", plain())
            .with_text("old", styled(InlineStyle::new().with(STRIKETHROUGH))),
        Block::new(BlockKey::from("l1"), BlockType::UnorderedListItem).with_text("first", plain()),
        Block::new(BlockKey::from("l2"), BlockType::UnorderedListItem)
            .with_depth(1)
            .with_text("nested", styled(InlineStyle::new().with(BOLD))),
        Block::new(BlockKey::from("l3"), BlockType::OrderedListItem).with_text("ordered", plain()),
        Block::new(BlockKey::from("m"), BlockType::Atomic)
            .with_text(" ", plain().with_entity(Some(image))),
        Block::new(BlockKey::from("v"), BlockType::Atomic)
            .with_text(" ", plain().with_entity(Some(video))),
        Block::new(BlockKey::from("q"), BlockType::Blockquote)
            .with_text("line one\nline two", plain()),
        Block::new(BlockKey::from("c"), BlockType::CodeBlock)
            .with_text("if a < b {\n    swap();\n}", plain()),
        Block::new(BlockKey::from("e"), BlockType::Unstyled),
        Block::new(BlockKey::from("x"), BlockType::Custom("callout".to_string()))
            .with_text("custom  spacing ", plain()),
    ];
    Document::from_blocks(blocks, entities)
}

#[test]
fn test_round_trip_compact() {
    assert_round_trip(&sample_document(), HtmlOptions::default());
}

#[test]
fn test_round_trip_pretty() {
    assert_round_trip(&sample_document(), HtmlOptions::pretty());
}

#[test]
fn test_round_trip_plain_text() {
    let doc = Document::from_text("first line\n  indented\n\nafter a gap");
    assert_round_trip(&doc, HtmlOptions::default());
}

#[test]
fn test_round_trip_whitespace_edges() {
    let texts = [
        "\n",
        "\n\n",
        "ends with a break\n",
        "\nstarts with a break",
        "gap\n\nbetween",
        " ",
        "  spaced  out  ",
        "space \nbefore a break",
        "space after\n a break",
        "hard\u{a0}space",
        "\u{a0}",
        "mixed \u{a0} spaces",
    ];

    for text in texts {
        let doc = Document::from_blocks(
            vec![
                Block::new(BlockKey::from("p"), BlockType::Unstyled).with_text(text, plain()),
                Block::new(BlockKey::from("q"), BlockType::Blockquote)
                    .with_text(text, styled(InlineStyle::new().with(BOLD))),
                Block::new(BlockKey::from("c"), BlockType::CodeBlock).with_text(text, plain()),
            ],
            EntityMap::new(),
        );
        assert_round_trip(&doc, HtmlOptions::default());
        assert_round_trip(&doc, HtmlOptions::pretty());
    }
}

#[test]
fn test_soft_newline_only_block_is_not_empty() {
    let registry = registry();
    let doc = Document::from_blocks(
        vec![Block::new(BlockKey::from("p"), BlockType::Unstyled).with_text("\n", plain())],
        EntityMap::new(),
    );

    let html = to_html(&doc, &registry, HtmlOptions::default());
    assert_eq!(html, "<p><br/><br/></p>");
    assert_eq!(from_html(&html, &registry).first_block().text(), "\n");
}

#[test]
fn test_round_trip_block_data() {
    let doc = Document::from_blocks(
        vec![
            Block::new(BlockKey::from("a"), BlockType::Unstyled)
                .with_data(TEXT_ALIGN, "center")
                .with_data("lang", "rust")
                .with_data("level", 3)
                .with_text("data", plain()),
            Block::new(BlockKey::from("b"), BlockType::HeaderTwo)
                .with_data(TEXT_ALIGN, "RIGHT")
                .with_text("odd alignment", plain()),
        ],
        EntityMap::new(),
    );

    assert_round_trip(&doc, HtmlOptions::default());
}

#[test]
fn test_round_trip_is_stable() {
    let registry = registry();
    let once = to_html(&sample_document(), &registry, HtmlOptions::default());
    let twice = to_html(&from_html(&once, &registry), &registry, HtmlOptions::default());

    assert_eq!(once, twice);
}

#[test]
fn test_paste_from_word_processor() {
    let html = r#"
        <html><head><meta charset="utf-8"><style>p { margin: 0 }</style></head>
        <body>
          <!--StartFragment-->
          <p style="margin:0;font-size:16px"><b style="font-weight:normal">Quarterly</b>
             <span style="color:rgb(192, 57, 43);font-family:Georgia, serif">report</span></p>
          <p>&nbsp;</p>
          <p><i>Draft</i> &amp; <u>final</u></p>
          <!--EndFragment-->
        </body></html>
    "#;

    let (doc, warnings) = from_html_with_report(html, &registry());

    let texts: Vec<&str> = doc.blocks().iter().map(|b| b.text()).collect();
    assert_eq!(texts, vec!["Quarterly report", " ", "Draft & final"]);

    let first = &doc.blocks()[0];
    let report = first.style_at(10).cloned().unwrap_or_default();
    assert!(report.contains(&color_tag("#c0392b")));
    assert!(report.contains(&font_family_tag("Georgia")));
    assert!(report.contains(&font_size_tag(16)));

    // `margin` is not a style the registry knows
    assert!(!warnings.is_empty());
}
