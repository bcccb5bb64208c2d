//! Tolerant element tree built from the token stream
//!
//! Unclosed elements are closed at the end of input, stray end tags are
//! ignored, and a handful of implied end tags (`p`, `li`) are honored.

use crate::tokenizer::{end_tag_name, parse_start_tag, tokenize, Token};

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Raw text; character references and whitespace are left for the importer
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose start implicitly closes an open `<p>`
const CLOSES_PARAGRAPH: &[&str] = &[
    "address", "article", "aside", "blockquote", "div", "figure", "footer", "h1", "h2", "h3",
    "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table",
    "ul",
];

pub fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Parse markup into a forest of nodes
pub fn parse_tree(html: &str) -> Vec<Node> {
    let mut builder = TreeBuilder::default();
    for token in tokenize(html) {
        match token {
            Token::StartTag(slice) => builder.start(slice),
            Token::EndTag(slice) => builder.end(&end_tag_name(slice)),
            Token::Text(text) | Token::Lt(text) => builder.text(text),
            Token::Declaration => {}
        }
    }
    builder.finish()
}

#[derive(Default)]
struct TreeBuilder {
    roots: Vec<Node>,
    open: Vec<Element>,
}

impl TreeBuilder {
    fn start(&mut self, slice: &str) {
        let tag = parse_start_tag(slice);

        if CLOSES_PARAGRAPH.contains(&tag.name.as_str()) && self.top_is("p") {
            self.pop();
        }
        if tag.name == "li" {
            self.close_open_list_item();
        }

        let element = Element {
            name: tag.name,
            attrs: tag.attrs,
            children: Vec::new(),
        };
        if tag.self_closing || is_void(&element.name) {
            self.append(Node::Element(element));
        } else {
            self.open.push(element);
        }
    }

    fn end(&mut self, name: &str) {
        let Some(index) = self.open.iter().rposition(|e| e.name == name) else {
            // `</br>` is treated like `<br>` by browsers
            if name == "br" {
                self.append(Node::Element(Element::new("br")));
            }
            return;
        };
        while self.open.len() > index {
            self.pop();
        }
    }

    fn text(&mut self, text: &str) {
        let parent = match self.open.last_mut() {
            Some(element) => &mut element.children,
            None => &mut self.roots,
        };
        if let Some(Node::Text(previous)) = parent.last_mut() {
            previous.push_str(text);
        } else {
            parent.push(Node::Text(text.to_string()));
        }
    }

    fn finish(mut self) -> Vec<Node> {
        while !self.open.is_empty() {
            self.pop();
        }
        self.roots
    }

    fn close_open_list_item(&mut self) {
        let boundary = self
            .open
            .iter()
            .rposition(|e| e.name == "ul" || e.name == "ol");
        let item = self.open.iter().rposition(|e| e.name == "li");
        if let Some(item) = item {
            if boundary.map_or(true, |list| item > list) {
                while self.open.len() > item {
                    self.pop();
                }
            }
        }
    }

    fn top_is(&self, name: &str) -> bool {
        self.open.last().map_or(false, |e| e.name == name)
    }

    fn pop(&mut self) {
        if let Some(element) = self.open.pop() {
            self.append(Node::Element(element));
        }
    }

    fn append(&mut self, node: Node) {
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.roots.push(node),
        }
    }
}
