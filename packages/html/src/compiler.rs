use crate::css::{format_declarations, Declaration};
use crate::escape::{escape_attr, push_escaped};
use richtext_model::{Block, BlockType, Document, Entity, EntityType, Run, TEXT_ALIGN};
use richtext_styles::{Rendering, StyleRegistry};
use serde_json::{Map, Value};
use tracing::instrument;

/// Attribute holding block data that has no HTML spelling
pub const BLOCK_DATA_ATTR: &str = "data-block-data";

/// Options for HTML output
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Put each block on its own line
    pub pretty: bool,
    /// Indentation string for nested lists
    pub indent: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: "  ".to_string(),
        }
    }
}

impl HtmlOptions {
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::default()
        }
    }
}

struct Context {
    options: HtmlOptions,
    depth: usize,
    buffer: String,
    /// Open list elements, outermost first; index is the list depth
    lists: Vec<&'static str>,
}

impl Context {
    fn new(options: HtmlOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
            lists: Vec::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    /// Open and close list elements so a block at `depth` of `list` sits in
    /// the right one
    fn sync_lists(&mut self, list: Option<&'static str>, depth: usize) {
        let Some(list) = list else {
            self.close_lists();
            return;
        };
        while self.lists.len() > depth + 1
            || (self.lists.len() == depth + 1 && self.lists.last() != Some(&list))
        {
            self.close_list();
        }
        while self.lists.len() < depth + 1 {
            self.add_line(&format!("<{}>", list));
            self.indent();
            self.lists.push(list);
        }
    }

    fn close_list(&mut self) {
        if let Some(list) = self.lists.pop() {
            self.dedent();
            self.add_line(&format!("</{}>", list));
        }
    }

    fn close_lists(&mut self) {
        while !self.lists.is_empty() {
            self.close_list();
        }
    }

    fn get_output(mut self) -> String {
        self.close_lists();
        self.buffer
    }
}

/// Render a document to HTML using the registry's rendering rules
///
/// Style tags the registry cannot resolve are left out of the markup; the raw
/// format still carries them.
#[instrument(skip_all, fields(blocks = document.blocks().len()))]
pub fn to_html(document: &Document, registry: &StyleRegistry, options: HtmlOptions) -> String {
    let mut ctx = Context::new(options);

    for block in document.blocks() {
        let list = match block.block_type() {
            BlockType::UnorderedListItem => Some("ul"),
            BlockType::OrderedListItem => Some("ol"),
            _ => None,
        };
        ctx.sync_lists(list, block.depth() as usize);

        let line = match block.block_type() {
            BlockType::Atomic => compile_atomic(document, registry, block),
            _ => compile_block(document, registry, block),
        };
        ctx.add_line(&line);
    }

    ctx.get_output()
}

fn block_element(block_type: &BlockType) -> String {
    match block_type {
        BlockType::Unstyled => "p".to_string(),
        BlockType::Blockquote => "blockquote".to_string(),
        BlockType::CodeBlock => "pre".to_string(),
        BlockType::UnorderedListItem | BlockType::OrderedListItem => "li".to_string(),
        BlockType::Atomic | BlockType::Custom(_) => "div".to_string(),
        header => match header.header_level() {
            Some(level) => format!("h{}", level),
            None => "p".to_string(),
        },
    }
}

fn block_attributes(block: &Block) -> String {
    let mut attrs = String::new();
    if matches!(block.block_type(), BlockType::Custom(_) | BlockType::Atomic) {
        attrs.push_str(&format!(
            " data-block-type=\"{}\"",
            escape_attr(block.block_type().as_str())
        ));
    }
    let align = block.text_align();
    if let Some(align) = align {
        attrs.push_str(&format!(" style=\"text-align:{}\"", align.as_str()));
    }

    // Data with no HTML spelling travels as JSON
    let spelled = |key: &str, value: &Value| {
        key == TEXT_ALIGN && value.as_str() == align.map(|align| align.as_str())
    };
    let extra: Map<String, Value> = block
        .data()
        .iter()
        .filter(|(key, value)| !spelled(key, value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    if !extra.is_empty() {
        attrs.push_str(&format!(
            " {}=\"{}\"",
            BLOCK_DATA_ATTR,
            escape_attr(&Value::Object(extra).to_string())
        ));
    }
    attrs
}

fn compile_block(document: &Document, registry: &StyleRegistry, block: &Block) -> String {
    let element = block_element(block.block_type());
    let mut html = format!("<{}{}>", element, block_attributes(block));
    let preformatted = *block.block_type() == BlockType::CodeBlock;

    if preformatted {
        html.push_str("<code>");
    }
    compile_inline(document, registry, block, preformatted, &mut html);
    if preformatted {
        html.push_str("</code>");
    } else if block.text().ends_with('\n') {
        // A final `<br/>` shows no line of its own
        html.push_str("<br/>");
    }

    html.push_str(&format!("</{}>", element));
    html
}

fn compile_atomic(document: &Document, registry: &StyleRegistry, block: &Block) -> String {
    let media = block
        .entity_at(0)
        .and_then(|key| document.entity(key))
        .filter(|entity| entity.kind.is_media());

    match media {
        Some(entity) => compile_media(entity),
        None => compile_block(document, registry, block),
    }
}

fn compile_media(entity: &Entity) -> String {
    let url = entity
        .data_str("url")
        .or_else(|| entity.data_str("src"))
        .unwrap_or_default();

    let mut attrs = format!(" src=\"{}\"", escape_attr(url));
    for key in ["width", "height", "alt"] {
        let value = match entity.data.get(key) {
            Some(Value::String(value)) => value.clone(),
            Some(Value::Number(value)) => value.to_string(),
            _ => continue,
        };
        attrs.push_str(&format!(" {}=\"{}\"", key, escape_attr(&value)));
    }

    let (class, element) = match entity.kind {
        EntityType::Image => ("image-wrap", format!("<img{}/>", attrs)),
        EntityType::Video => ("video-wrap", format!("<video controls{}></video>", attrs)),
        _ => ("audio-wrap", format!("<audio controls{}></audio>", attrs)),
    };
    format!("<div class=\"media-wrap {}\">{}</div>", class, element)
}

fn compile_inline(
    document: &Document,
    registry: &StyleRegistry,
    block: &Block,
    preformatted: bool,
    html: &mut String,
) {
    let chars: Vec<char> = block.text().chars().collect();

    for run in block.runs() {
        let link = run
            .meta
            .entity
            .and_then(|key| document.entity(key))
            .filter(|entity| entity.kind == EntityType::Link);

        let mut elements = Vec::new();
        let mut declarations = Vec::new();
        for tag in run.meta.style.iter() {
            match registry.render(tag) {
                // `<pre><code>` already marks the block as code
                Some(Rendering::Element("code")) if preformatted => {}
                Some(Rendering::Element(element)) => elements.push(element),
                Some(Rendering::Css { property, value }) => {
                    declarations.push(Declaration::new(property, value))
                }
                None => {}
            }
        }

        if let Some(link) = link {
            html.push_str(&link_open(link));
        }
        for element in &elements {
            html.push_str(&format!("<{}>", element));
        }
        if !declarations.is_empty() {
            html.push_str(&format!(
                "<span style=\"{}\">",
                escape_attr(&format_declarations(&declarations))
            ));
        }

        push_run_text(&run, &chars, preformatted, html);

        if !declarations.is_empty() {
            html.push_str("</span>");
        }
        for element in elements.iter().rev() {
            html.push_str(&format!("</{}>", element));
        }
        if link.is_some() {
            html.push_str("</a>");
        }
    }
}

fn link_open(link: &Entity) -> String {
    let href = link
        .data_str("href")
        .or_else(|| link.data_str("url"))
        .unwrap_or_default();
    match link.data_str("target").filter(|t| !t.is_empty()) {
        Some(target) => format!(
            "<a href=\"{}\" target=\"{}\">",
            escape_attr(href),
            escape_attr(target)
        ),
        None => format!("<a href=\"{}\">", escape_attr(href)),
    }
}

/// Escape run text; spaces that HTML would collapse become `&nbsp;`
fn push_run_text(run: &Run<'_>, chars: &[char], preformatted: bool, html: &mut String) {
    for (index, c) in run.range.clone().zip(run.text.chars()) {
        match c {
            _ if preformatted => push_escaped(html, c, false),
            '\n' => html.push_str("<br/>"),
            ' ' => {
                let at_edge = index == 0 || index + 1 == chars.len();
                let after_space = index > 0 && matches!(chars[index - 1], ' ' | '\n');
                let before_break = chars.get(index + 1) == Some(&'\n');
                if at_edge || after_space || before_break {
                    html.push_str("&nbsp;");
                } else {
                    html.push(' ');
                }
            }
            _ => push_escaped(html, c, false),
        }
    }
}
