//! Key commands and return handling
//!
//! Every handler here is a pure function of the document and selection.
//! `None` means the editor does not handle the input and the host engine
//! falls back to its default behavior.

use richtext_model::{
    modifier, BlockType, Document, InlineStyle, Selection, BOLD, CODE, ITALIC, STRIKETHROUGH,
    UNDERLINE,
};

/// Veto signal returned to the host: `Yes` suppresses the default behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Yes,
    No,
}

impl Handled {
    pub fn is_handled(self) -> bool {
        self == Handled::Yes
    }
}

impl From<bool> for Handled {
    fn from(handled: bool) -> Self {
        if handled {
            Handled::Yes
        } else {
            Handled::No
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyCommand {
    Bold,
    Italic,
    Underline,
    Code,
    Strikethrough,
    Backspace,
    Undo,
    Redo,
    Other(String),
}

impl KeyCommand {
    pub fn from_name(name: &str) -> Self {
        match name {
            "bold" => KeyCommand::Bold,
            "italic" => KeyCommand::Italic,
            "underline" => KeyCommand::Underline,
            "code" => KeyCommand::Code,
            "strikethrough" => KeyCommand::Strikethrough,
            "backspace" => KeyCommand::Backspace,
            "undo" => KeyCommand::Undo,
            "redo" => KeyCommand::Redo,
            other => KeyCommand::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            KeyCommand::Bold => "bold",
            KeyCommand::Italic => "italic",
            KeyCommand::Underline => "underline",
            KeyCommand::Code => "code",
            KeyCommand::Strikethrough => "strikethrough",
            KeyCommand::Backspace => "backspace",
            KeyCommand::Undo => "undo",
            KeyCommand::Redo => "redo",
            KeyCommand::Other(name) => name,
        }
    }

    /// Inline style a formatting command toggles
    pub fn style(&self) -> Option<&'static str> {
        match self {
            KeyCommand::Bold => Some(BOLD),
            KeyCommand::Italic => Some(ITALIC),
            KeyCommand::Underline => Some(UNDERLINE),
            KeyCommand::Code => Some(CODE),
            KeyCommand::Strikethrough => Some(STRIKETHROUGH),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReturnModifiers {
    pub shift: bool,
}

impl ReturnModifiers {
    pub fn shift() -> Self {
        Self { shift: true }
    }
}

/// Backspace at the very start of a styled block resets it to unstyled
///
/// Applies to empty blocks and to the first block of the document. A code
/// block directly under a non-empty code block is left to the host, which
/// merges the two.
pub fn backspace_reset(document: &Document, selection: &Selection) -> Option<Document> {
    let range = selection.resolve(document);
    if !range.is_collapsed() || range.start.offset != 0 {
        return None;
    }

    let index = range.start_index;
    let block = &document.blocks()[index];
    if !block.is_empty() && index != 0 {
        return None;
    }
    if block.block_type() == &BlockType::Unstyled {
        return None;
    }
    if block.block_type() == &BlockType::CodeBlock {
        let above = index.checked_sub(1).map(|i| &document.blocks()[i]);
        if above.is_some_and(|b| b.block_type() == &BlockType::CodeBlock && !b.is_empty()) {
            return None;
        }
    }

    Some(modifier::set_block_type(document, selection, &BlockType::Unstyled))
}

/// Return key behavior beyond a plain block split
///
/// - shift+return inserts a soft newline carrying `style`
/// - return in an empty list item or blockquote resets it to unstyled
/// - return at the end of a header starts a new unstyled block
pub fn handle_return(
    document: &Document,
    selection: &Selection,
    modifiers: ReturnModifiers,
    style: &InlineStyle,
) -> Option<(Document, Selection)> {
    if modifiers.shift {
        return Some(modifier::insert_text(document, selection, "\n", style, None));
    }

    let range = selection.resolve(document);
    if !range.is_collapsed() {
        return None;
    }

    let block = &document.blocks()[range.start_index];
    let block_type = block.block_type();

    if block.is_empty() && (block_type.is_list_item() || block_type == &BlockType::Blockquote) {
        let document = modifier::set_block_type(document, selection, &BlockType::Unstyled);
        return Some((document, selection.clone()));
    }

    if block_type.header_level().is_some() && range.start.offset == block.len() {
        let (document, cursor) = modifier::split_block(document, selection);
        let document = modifier::set_block_type(&document, &cursor, &BlockType::Unstyled);
        return Some((document, cursor));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use richtext_model::{Block, BlockKey, CharacterMetadata, EntityMap};

    fn document(blocks: Vec<(&str, BlockType, &str)>) -> Document {
        let blocks = blocks
            .into_iter()
            .map(|(key, block_type, text)| {
                Block::new(BlockKey::from(key), block_type)
                    .with_text(text, CharacterMetadata::default())
            })
            .collect();
        Document::from_blocks(blocks, EntityMap::new())
    }

    fn at(key: &str, offset: usize) -> Selection {
        Selection::collapsed(BlockKey::from(key), offset)
    }

    #[test]
    fn test_command_names() {
        assert_eq!(KeyCommand::from_name("bold"), KeyCommand::Bold);
        assert_eq!(KeyCommand::from_name("strikethrough").style(), Some(STRIKETHROUGH));
        assert_eq!(
            KeyCommand::from_name("split-block"),
            KeyCommand::Other("split-block".to_string())
        );
        assert_eq!(KeyCommand::Undo.style(), None);
    }

    #[test]
    fn test_backspace_resets_empty_styled_block() {
        let doc = document(vec![
            ("a", BlockType::Unstyled, "text"),
            ("b", BlockType::UnorderedListItem, ""),
        ]);

        let reset = backspace_reset(&doc, &at("b", 0)).unwrap();
        assert_eq!(reset.blocks()[1].block_type(), &BlockType::Unstyled);
    }

    #[test]
    fn test_backspace_resets_first_block() {
        let doc = document(vec![("a", BlockType::HeaderOne, "Title")]);
        let reset = backspace_reset(&doc, &at("a", 0)).unwrap();
        assert_eq!(reset.first_block().block_type(), &BlockType::Unstyled);
        assert_eq!(reset.first_block().text(), "Title");
    }

    #[test]
    fn test_backspace_passes_through() {
        let doc = document(vec![
            ("a", BlockType::Unstyled, "text"),
            ("b", BlockType::HeaderTwo, "more"),
            ("c", BlockType::CodeBlock, "x"),
            ("d", BlockType::CodeBlock, ""),
        ]);

        assert!(backspace_reset(&doc, &at("a", 0)).is_none());
        assert!(backspace_reset(&doc, &at("b", 0)).is_none());
        assert!(backspace_reset(&doc, &at("b", 2)).is_none());
        assert!(backspace_reset(&doc, &at("d", 0)).is_none());
    }

    #[test]
    fn test_shift_return_inserts_soft_newline() {
        let doc = document(vec![("a", BlockType::Unstyled, "ab")]);
        let style = InlineStyle::new().with(BOLD);

        let (doc, selection) =
            handle_return(&doc, &at("a", 1), ReturnModifiers::shift(), &style).unwrap();

        assert_eq!(doc.first_block().text(), "a\nb");
        assert!(doc.first_block().style_at(1).unwrap().contains(&BOLD.into()));
        assert_eq!(selection, at("a", 2));
    }

    #[test]
    fn test_return_in_empty_list_item_resets() {
        let doc = document(vec![
            ("a", BlockType::OrderedListItem, "one"),
            ("b", BlockType::OrderedListItem, ""),
        ]);

        let (doc, _) =
            handle_return(&doc, &at("b", 0), ReturnModifiers::default(), &InlineStyle::new())
                .unwrap();
        assert_eq!(doc.blocks()[1].block_type(), &BlockType::Unstyled);
        assert_eq!(doc.blocks().len(), 2);
    }

    #[test]
    fn test_return_after_header_starts_paragraph() {
        let doc = document(vec![("a", BlockType::HeaderOne, "Title")]);

        let (doc, selection) =
            handle_return(&doc, &at("a", 5), ReturnModifiers::default(), &InlineStyle::new())
                .unwrap();

        assert_eq!(doc.blocks().len(), 2);
        assert_eq!(doc.blocks()[0].block_type(), &BlockType::HeaderOne);
        assert_eq!(doc.blocks()[1].block_type(), &BlockType::Unstyled);
        assert_eq!(selection, Selection::collapsed(doc.blocks()[1].key().clone(), 0));
    }

    #[test]
    fn test_plain_return_is_not_handled() {
        let doc = document(vec![
            ("a", BlockType::HeaderOne, "Title"),
            ("b", BlockType::Unstyled, "text"),
        ]);
        let none = InlineStyle::new();

        assert!(handle_return(&doc, &at("a", 2), ReturnModifiers::default(), &none).is_none());
        assert!(handle_return(&doc, &at("b", 4), ReturnModifiers::default(), &none).is_none());
    }
}
