//! # Paste Merger
//!
//! Splices externally sourced HTML into a document at a selection.
//!
//! ## Algorithm
//!
//! 1. No HTML payload: not handled, the host inserts the plain text itself
//! 2. Import the HTML as a fragment through the style registry
//! 3. Remove the selected range, split the cursor block, and insert the
//!    fragment blocks whole between the two halves
//! 4. Leave the cursor at the end of the last inserted block

use richtext_html::{Conversion, ConversionWarning, HtmlImporter};
use richtext_model::{modifier, Document, Selection};
use richtext_styles::StyleRegistry;
use tracing::{debug, instrument};

/// Clipboard contents offered to the editor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PastePayload {
    pub text: String,
    pub html: Option<String>,
}

impl PastePayload {
    pub fn new(text: impl Into<String>, html: Option<&str>) -> Self {
        Self {
            text: text.into(),
            html: html.map(str::to_string),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(text, None)
    }

    pub fn html(html: &str) -> Self {
        Self::new(String::new(), Some(html))
    }
}

#[derive(Debug)]
pub enum PasteOutcome {
    NotHandled,
    Handled {
        document: Document,
        selection: Selection,
        warnings: Vec<ConversionWarning>,
    },
}

impl PasteOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, PasteOutcome::Handled { .. })
    }
}

/// Merge a paste using the registry and the default media filter
pub fn merge_paste(
    document: &Document,
    selection: &Selection,
    payload: &PastePayload,
    registry: &StyleRegistry,
) -> PasteOutcome {
    merge_paste_with(document, selection, payload, &HtmlImporter::new(registry))
}

/// Merge a paste with a configured importer
#[instrument(skip_all, fields(html = payload.html.as_ref().map(String::len)))]
pub fn merge_paste_with(
    document: &Document,
    selection: &Selection,
    payload: &PastePayload,
    importer: &HtmlImporter<'_>,
) -> PasteOutcome {
    let Some(html) = payload.html.as_deref().filter(|html| !html.is_empty()) else {
        debug!("Paste without HTML left to the host");
        return PasteOutcome::NotHandled;
    };

    let Conversion { fragment, warnings } = importer.parse_fragment(html);
    let (document, selection) = modifier::replace_with_fragment(document, selection, &fragment);

    debug!(
        blocks = fragment.blocks.len(),
        warnings = warnings.len(),
        "Merged pasted HTML"
    );
    PasteOutcome::Handled {
        document,
        selection,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use richtext_model::BlockType;
    use richtext_styles::{EnabledFamilies, StyleVocabulary};

    fn registry() -> StyleRegistry {
        StyleRegistry::new(StyleVocabulary::default(), &EnabledFamilies::all()).expect("valid")
    }

    #[test]
    fn test_plain_text_is_not_handled() {
        let doc = Document::from_text("abc");
        let outcome = merge_paste(
            &doc,
            &doc.selection_at_end(),
            &PastePayload::text("plain"),
            &registry(),
        );
        assert!(!outcome.is_handled());

        let outcome = merge_paste(
            &doc,
            &doc.selection_at_end(),
            &PastePayload::new("plain", Some("")),
            &registry(),
        );
        assert!(!outcome.is_handled());
    }

    #[test]
    fn test_whitespace_html_is_handled() {
        let doc = Document::from_text("abc");
        let outcome = merge_paste(
            &doc,
            &doc.selection_at_end(),
            &PastePayload::new("  ", Some("  ")),
            &registry(),
        );

        let PasteOutcome::Handled { document, .. } = outcome else {
            panic!("expected paste to be handled");
        };
        assert_eq!(document.plain_text(), "abc");
    }

    #[test]
    fn test_paste_splits_cursor_block() {
        let doc = Document::from_text("HelloWorld");
        let key = doc.first_block().key().clone();

        let outcome = merge_paste(
            &doc,
            &Selection::collapsed(key.clone(), 5),
            &PastePayload::html("<h2>Mid</h2>"),
            &registry(),
        );

        let PasteOutcome::Handled { document, selection, warnings } = outcome else {
            panic!("expected paste to be handled");
        };
        let texts: Vec<&str> = document.blocks().iter().map(|b| b.text()).collect();
        assert_eq!(texts, vec!["Hello", "Mid", "World"]);
        assert_eq!(document.blocks()[0].key(), &key);
        assert_eq!(document.blocks()[1].block_type(), &BlockType::HeaderTwo);
        assert_eq!(selection, Selection::collapsed(document.blocks()[1].key().clone(), 3));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_empty_fragment_clears_selection() {
        let doc = Document::from_text("abcdef");
        let key = doc.first_block().key().clone();

        let outcome = merge_paste(
            &doc,
            &Selection::within(key.clone(), 1, 4),
            &PastePayload::html("<script>x()</script>"),
            &registry(),
        );

        let PasteOutcome::Handled { document, selection, .. } = outcome else {
            panic!("expected paste to be handled");
        };
        assert_eq!(document.plain_text(), "aef");
        assert_eq!(selection, Selection::collapsed(key, 1));
    }
}
