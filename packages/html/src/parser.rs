//! HTML → Document import
//!
//! Walks the tolerant element tree and rebuilds blocks, entities and inline
//! styles. Style declarations resolve through the [`StyleRegistry`], so only
//! values legal under the vocabulary survive; everything else is dropped with
//! a [`ConversionWarning`].
//!
//! Whitespace follows the browser model: runs of ASCII whitespace collapse to
//! one space, and spaces at line edges are dropped. `&nbsp;` survives as a
//! plain space, while a literal U+00A0 or `&#160;` stays a hard space. A
//! block's final `<br>` only holds its last line open and adds no text.
//! Inside `<pre>` text is kept verbatim.

use crate::compiler::BLOCK_DATA_ATTR;
use crate::css::{parse_declarations, Declaration};
use crate::error::ConversionWarning;
use crate::escape::decode_text;
use crate::tree::{parse_tree, Element, Node};
use richtext_model::{
    Block, BlockType, CharacterMetadata, Document, Entity, EntityKey, EntityMap, EntityType,
    Fragment, InlineStyle, KeyGenerator, StyleTag, TextAlign, CODE, TEXT_ALIGN,
};
use richtext_styles::StyleRegistry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

/// Media kinds the importer accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaFilter {
    pub image: bool,
    pub video: bool,
    pub audio: bool,
}

impl Default for MediaFilter {
    fn default() -> Self {
        Self {
            image: true,
            video: true,
            audio: true,
        }
    }
}

impl MediaFilter {
    pub fn allows(&self, kind: &EntityType) -> bool {
        match kind {
            EntityType::Image => self.image,
            EntityType::Video => self.video,
            EntityType::Audio => self.audio,
            _ => true,
        }
    }
}

/// Result of importing a piece of HTML
#[derive(Debug, Clone)]
pub struct Conversion {
    pub fragment: Fragment,
    pub warnings: Vec<ConversionWarning>,
}

/// Configurable HTML importer
#[derive(Debug, Clone)]
pub struct HtmlImporter<'r> {
    registry: &'r StyleRegistry,
    media: MediaFilter,
}

impl<'r> HtmlImporter<'r> {
    pub fn new(registry: &'r StyleRegistry) -> Self {
        Self {
            registry,
            media: MediaFilter::default(),
        }
    }

    pub fn with_media(mut self, media: MediaFilter) -> Self {
        self.media = media;
        self
    }

    /// Import HTML as a fragment; it may hold zero blocks
    #[instrument(skip_all, fields(len = html.len()))]
    pub fn parse_fragment(&self, html: &str) -> Conversion {
        let tree = parse_tree(html);
        let mut converter = Converter::new(self.registry, self.media);
        converter.visit_nodes(&tree, &BlockContext::default(), &InlineContext::default());
        let conversion = converter.finish();

        for warning in &conversion.warnings {
            debug!(%warning, "Dropped content while importing HTML");
        }
        debug!(
            blocks = conversion.fragment.blocks.len(),
            entities = conversion.fragment.entities.len(),
            warnings = conversion.warnings.len(),
            "Imported HTML"
        );
        conversion
    }

    /// Import HTML as a full document (at least one block)
    pub fn parse_document(&self, html: &str) -> (Document, Vec<ConversionWarning>) {
        let Conversion { fragment, warnings } = self.parse_fragment(html);
        (Document::from_fragment(fragment), warnings)
    }
}

/// Decode HTML into a document, dropping anything unrecognized
pub fn from_html(html: &str, registry: &StyleRegistry) -> Document {
    from_html_with_report(html, registry).0
}

/// Decode HTML into a document and report what was dropped
pub fn from_html_with_report(
    html: &str,
    registry: &StyleRegistry,
) -> (Document, Vec<ConversionWarning>) {
    HtmlImporter::new(registry).parse_document(html)
}

/// Elements whose content never reaches the document
const IGNORED_ELEMENTS: &[&str] = &[
    "script", "style", "head", "title", "template", "meta", "link", "noscript", "iframe",
    "object", "hr",
];

/// Structural wrappers that neither start a block nor style text
const TRANSPARENT_ELEMENTS: &[&str] = &["html", "body", "tbody", "thead", "tfoot"];

/// Inline elements with no style meaning of their own
const PLAIN_INLINE_ELEMENTS: &[&str] = &[
    "span", "font", "small", "big", "mark", "label", "abbr", "cite", "q", "time", "kbd", "var",
    "samp", "dfn", "bdi", "bdo", "wbr", "source",
];

/// Block elements that take their type from the enclosing context
const GENERIC_BLOCKS: &[&str] = &[
    "p", "div", "section", "article", "header", "footer", "main", "aside", "nav", "figure",
    "figcaption", "address", "table", "tr", "td", "th", "dl", "dt", "dd",
];

fn is_block_level(name: &str) -> bool {
    GENERIC_BLOCKS.contains(&name)
        || matches!(
            name,
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "blockquote" | "pre" | "li" | "ul" | "ol"
        )
}

fn is_media(name: &str) -> bool {
    matches!(name, "img" | "video" | "audio")
}

#[derive(Debug, Clone, Default)]
struct BlockContext {
    block_type: BlockType,
    depth: u8,
    data: Map<String, Value>,
    /// Item type and depth of the innermost enclosing list
    list: Option<(BlockType, u8)>,
    preformatted: bool,
}

#[derive(Debug, Clone, Default)]
struct InlineContext {
    style: InlineStyle,
    entity: Option<EntityKey>,
}

impl InlineContext {
    fn meta(&self) -> CharacterMetadata {
        CharacterMetadata::styled(self.style.clone()).with_entity(self.entity)
    }
}

struct Converter<'r> {
    registry: &'r StyleRegistry,
    media: MediaFilter,
    keys: KeyGenerator,
    blocks: Vec<Block>,
    entities: EntityMap,
    current: Option<Block>,
    /// Collapsed whitespace waiting for more text on the same line
    pending_space: Option<CharacterMetadata>,
    warnings: Vec<ConversionWarning>,
}

impl<'r> Converter<'r> {
    fn new(registry: &'r StyleRegistry, media: MediaFilter) -> Self {
        Self {
            registry,
            media,
            keys: KeyGenerator::new("html"),
            blocks: Vec::new(),
            entities: EntityMap::new(),
            current: None,
            pending_space: None,
            warnings: Vec::new(),
        }
    }

    fn finish(mut self) -> Conversion {
        self.close_block();
        Conversion {
            fragment: Fragment {
                blocks: self.blocks,
                entities: self.entities,
            },
            warnings: self.warnings,
        }
    }

    fn visit_nodes(&mut self, nodes: &[Node], block: &BlockContext, inline: &InlineContext) {
        for node in nodes {
            match node {
                Node::Text(text) => self.text(text, block, inline),
                Node::Element(element) => self.element(element, block, inline),
            }
        }
    }

    fn element(&mut self, element: &Element, block: &BlockContext, inline: &InlineContext) {
        let name = element.name.as_str();
        match name {
            _ if IGNORED_ELEMENTS.contains(&name) => {}
            _ if TRANSPARENT_ELEMENTS.contains(&name) => {
                self.visit_nodes(&element.children, block, inline)
            }
            "br" => self.line_break(block, inline),
            "img" | "video" | "audio" => self.media(element),
            "a" => {
                let inline = self.link(element, inline);
                self.visit_nodes(&element.children, block, &inline);
            }
            "ul" | "ol" => self.list(element, block, inline),
            _ if is_block_level(name) => self.block_element(element, block, inline),
            _ => {
                let inline = self.inline_element(element, block, inline);
                self.visit_nodes(&element.children, block, &inline);
            }
        }
    }

    fn block_element(&mut self, element: &Element, parent: &BlockContext, inline: &InlineContext) {
        self.close_block();

        let name = element.name.as_str();
        let block_type = match name {
            "blockquote" => BlockType::Blockquote,
            "pre" => BlockType::CodeBlock,
            "li" => parent
                .list
                .as_ref()
                .map(|(item, _)| item.clone())
                .unwrap_or(BlockType::UnorderedListItem),
            _ => match name.strip_prefix('h').and_then(|level| level.parse::<u8>().ok()) {
                Some(level) => BlockType::header(level).unwrap_or_default(),
                None => match element.attr("data-block-type") {
                    Some(custom) => BlockType::from_name(custom),
                    None => parent.block_type.clone(),
                },
            },
        };
        let depth = if name == "li" {
            parent.list.as_ref().map(|(_, depth)| *depth).unwrap_or(0)
        } else if block_type.is_list_item() {
            parent.depth
        } else {
            0
        };

        let mut context = BlockContext {
            block_type,
            depth,
            data: parent.data.clone(),
            list: parent.list.clone(),
            preformatted: parent.preformatted || name == "pre",
        };
        let mut inline = inline.clone();
        if let Some(style) = element.attr("style") {
            for declaration in parse_declarations(style) {
                if declaration.property == "text-align" {
                    match TextAlign::parse(&declaration.value) {
                        Some(align) => {
                            context
                                .data
                                .insert(TEXT_ALIGN.to_string(), Value::from(align.as_str()));
                        }
                        None => self.warn(ConversionWarning::declaration(
                            &declaration.property,
                            &declaration.value,
                        )),
                    }
                } else {
                    self.apply_declaration(&mut inline.style, &declaration);
                }
            }
        }

        if let Some(json) = element.attr(BLOCK_DATA_ATTR) {
            match serde_json::from_str::<Map<String, Value>>(json) {
                Ok(extra) => context.data.extend(extra),
                Err(_) => self.warn(ConversionWarning::InvalidBlockData(json.to_string())),
            }
        }

        let is_container = element.children.iter().any(|child| {
            matches!(child, Node::Element(e) if is_block_level(&e.name) || is_media(&e.name))
        });
        if is_container {
            self.visit_nodes(&element.children, &context, &inline);
        } else {
            self.open_block(&context);
            self.visit_nodes(without_filler_break(&element.children), &context, &inline);
        }
        self.close_block();
    }

    fn list(&mut self, element: &Element, parent: &BlockContext, inline: &InlineContext) {
        self.close_block();

        let item = if element.name == "ol" {
            BlockType::OrderedListItem
        } else {
            BlockType::UnorderedListItem
        };
        let depth = parent
            .list
            .as_ref()
            .map(|(_, depth)| depth.saturating_add(1))
            .unwrap_or(0);
        let context = BlockContext {
            block_type: item.clone(),
            depth,
            data: Map::new(),
            list: Some((item, depth)),
            preformatted: false,
        };
        self.visit_nodes(&element.children, &context, inline);
        self.close_block();
    }

    fn inline_element(
        &mut self,
        element: &Element,
        block: &BlockContext,
        inline: &InlineContext,
    ) -> InlineContext {
        let name = element.name.as_str();
        let mut next = inline.clone();

        match self.registry.tag_for_element(name) {
            // `<pre><code>` is the code block itself, not inline code
            Some(tag) if block.preformatted && tag.as_str() == CODE => {}
            Some(tag) => self.add_tag(&mut next.style, tag),
            None if PLAIN_INLINE_ELEMENTS.contains(&name) => {}
            None => self.warn(ConversionWarning::UnsupportedElement(name.to_string())),
        }

        if name == "font" {
            for (attr, property) in [("color", "color"), ("face", "font-family")] {
                if let Some(value) = element.attr(attr) {
                    self.apply_declaration(&mut next.style, &Declaration::new(property, value));
                }
            }
        }
        if let Some(style) = element.attr("style") {
            for declaration in parse_declarations(style) {
                self.apply_declaration(&mut next.style, &declaration);
            }
        }
        next
    }

    fn link(&mut self, element: &Element, inline: &InlineContext) -> InlineContext {
        let mut next = inline.clone();
        if let Some(href) = element.attr("href").filter(|href| !href.is_empty()) {
            let target = element.attr("target").filter(|target| !target.is_empty());
            next.entity = Some(self.entities.add(Entity::link(href, target)));
        }
        if let Some(style) = element.attr("style") {
            for declaration in parse_declarations(style) {
                self.apply_declaration(&mut next.style, &declaration);
            }
        }
        next
    }

    fn media(&mut self, element: &Element) {
        let name = element.name.as_str();
        let kind = match name {
            "img" => EntityType::Image,
            "video" => EntityType::Video,
            _ => EntityType::Audio,
        };
        if !self.media.allows(&kind) {
            self.warn(ConversionWarning::DisabledMedia(name.to_string()));
            return;
        }

        let source = element.attr("src").or_else(|| {
            element.children.iter().find_map(|child| match child {
                Node::Element(e) if e.name == "source" => e.attr("src"),
                _ => None,
            })
        });
        let Some(source) = source.filter(|src| !src.is_empty()) else {
            self.warn(ConversionWarning::MissingSource(name.to_string()));
            return;
        };

        let mut entity = Entity::media(kind, source);
        for attr in ["width", "height", "alt"] {
            if let Some(value) = element.attr(attr) {
                entity = entity.with_data(attr, value);
            }
        }
        let key = self.entities.add(entity);

        self.close_block();
        let block_key = self.keys.next_key(|_| false);
        let meta = CharacterMetadata::default().with_entity(Some(key));
        self.blocks
            .push(Block::new(block_key, BlockType::Atomic).with_text(" ", meta));
    }

    fn text(&mut self, raw: &str, block: &BlockContext, inline: &InlineContext) {
        let meta = inline.meta();

        if block.preformatted {
            let text = decode_text(&raw.replace("\r\n", "\n"));
            if text.is_empty() {
                return;
            }
            self.push_text(&text, &meta, block);
            return;
        }

        let collapsed = collapse_whitespace(raw);
        let body = collapsed.trim_matches(' ');
        if body.is_empty() && self.current.is_none() {
            return;
        }

        if collapsed.starts_with(' ') && !self.at_line_start() && self.pending_space.is_none() {
            self.pending_space = Some(meta.clone());
        }
        if body.is_empty() {
            return;
        }

        self.push_text(&decode_text(body), &meta, block);
        if collapsed.ends_with(' ') {
            self.pending_space = Some(meta);
        }
    }

    fn line_break(&mut self, block: &BlockContext, inline: &InlineContext) {
        self.pending_space = None;
        self.ensure_block(block);
        if let Some(current) = self.current.as_mut() {
            current.push_text("\n", &inline.meta());
        }
    }

    fn push_text(&mut self, text: &str, meta: &CharacterMetadata, block: &BlockContext) {
        self.ensure_block(block);
        let pending = self.pending_space.take();
        if let Some(current) = self.current.as_mut() {
            if let Some(space) = pending {
                current.push_text(" ", &space);
            }
            current.push_text(text, meta);
        }
    }

    fn at_line_start(&self) -> bool {
        match &self.current {
            None => true,
            Some(block) => block.text().is_empty() || block.text().ends_with('\n'),
        }
    }

    fn ensure_block(&mut self, context: &BlockContext) {
        if self.current.is_none() {
            self.open_block(context);
        }
    }

    fn open_block(&mut self, context: &BlockContext) {
        self.close_block();
        let key = self.keys.next_key(|_| false);
        self.current = Some(
            Block::new(key, context.block_type.clone())
                .with_depth(context.depth)
                .with_data_map(context.data.clone()),
        );
    }

    fn close_block(&mut self) {
        self.pending_space = None;
        if let Some(block) = self.current.take() {
            self.blocks.push(block);
        }
    }

    fn apply_declaration(&mut self, style: &mut InlineStyle, declaration: &Declaration) {
        let tags = self
            .registry
            .tags_for_declaration(&declaration.property, &declaration.value);
        if tags.is_empty() {
            self.warn(ConversionWarning::declaration(
                &declaration.property,
                &declaration.value,
            ));
        }
        for tag in tags {
            self.add_tag(style, tag);
        }
    }

    /// Inner markup wins over outer markup within an exclusivity group
    fn add_tag(&self, style: &mut InlineStyle, tag: StyleTag) {
        let group = self.registry.group_of(&tag);
        style.retain(|existing| !self.registry.in_group(existing, &group));
        style.insert(tag);
    }

    fn warn(&mut self, warning: ConversionWarning) {
        self.warnings.push(warning);
    }
}

/// Children up to a trailing `<br>`; `<p><br></p>` is an empty paragraph
fn without_filler_break(children: &[Node]) -> &[Node] {
    let last = children
        .iter()
        .rposition(|node| !matches!(node, Node::Text(text) if text.trim().is_empty()));
    match last {
        Some(index) if matches!(&children[index], Node::Element(e) if e.name == "br") => {
            &children[..index]
        }
        _ => children,
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_ascii_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}
