//! # Editor
//!
//! Entry point for the UI layer. Every operation runs synchronously, builds
//! one next [`EditorState`], and commits it to the [`Pipeline`].
//!
//! ```text
//! toolbar / keys / paste
//!         │
//!         ▼
//!   resolver · commands · paste merger ──▶ EditorState ──▶ Pipeline ──▶ callbacks
//!                                              │                (debounced)
//!                                              ▼
//!                                         UndoStack
//! ```

use crate::commands::{self, Handled, KeyCommand, ReturnModifiers};
use crate::config::{Control, ContentFormat, EditorConfig, InitialContent};
use crate::decorators::{CompositeDecorator, Decorator};
use crate::errors::EditorResult;
use crate::paste::{merge_paste_with, PasteOutcome, PastePayload};
use crate::pipeline::{Content, Pipeline, Subscriber};
use crate::state::EditorState;
use crate::undo_stack::{HistoryEntry, UndoStack};
use richtext_html::HtmlImporter;
use richtext_model::{
    from_raw, modifier, BlockType, Document, InlineStyle, RawDocument, Selection, StyleTag,
    TextAlign, TEXT_ALIGN,
};
use richtext_styles::{StyleFamily, StyleRegistry};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

type Clock = Box<dyn Fn() -> Instant>;
type KeyCommandHook = Box<dyn FnMut(&KeyCommand, &EditorState) -> Handled>;
type ReturnHook = Box<dyn FnMut(ReturnModifiers, &EditorState) -> Handled>;
type PasteHook = Box<dyn FnMut(&PastePayload, &EditorState) -> Handled>;

pub struct Editor {
    config: EditorConfig,
    registry: Arc<StyleRegistry>,
    decorator: CompositeDecorator,
    pipeline: Pipeline,
    history: UndoStack,
    clock: Clock,
    key_command_hook: Option<KeyCommandHook>,
    return_hook: Option<ReturnHook>,
    paste_hook: Option<PasteHook>,
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("config", &self.config)
            .field("decorator", &self.decorator)
            .field("pipeline", &self.pipeline)
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}

impl Editor {
    /// Build the registry and initial state from `config`
    ///
    /// Fails when an enabled style family has no vocabulary or the initial
    /// raw content is malformed.
    #[instrument(skip_all)]
    pub fn new(config: EditorConfig) -> EditorResult<Self> {
        let registry = Arc::new(StyleRegistry::new(
            config.style_vocabulary(),
            &config.enabled_families(),
        )?);

        let document = match &config.initial_content {
            Some(content) => import_content(&config, &registry, content)?,
            None => Document::empty(),
        };

        let decorator = CompositeDecorator::with_defaults();
        let state = EditorState::new(document, &decorator);
        let pipeline = Pipeline::new(
            state,
            Arc::clone(&registry),
            config.content_format,
            config.debounce(),
        );

        info!(
            blocks = pipeline.state().document().blocks().len(),
            format = ?config.content_format,
            debounce_ms = config.debounce_ms,
            "Editor initialized"
        );

        Ok(Self {
            history: UndoStack::with_max_levels(config.history_limit),
            config,
            registry,
            decorator,
            pipeline,
            clock: Box::new(Instant::now),
            key_command_hook: None,
            return_hook: None,
            paste_hook: None,
        })
    }

    /// Replace the time source used to arm and fire the debounce window
    pub fn with_clock(mut self, clock: impl Fn() -> Instant + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Register an extra decorator and redecorate the current state
    pub fn with_decorator(mut self, decorator: impl Decorator + 'static) -> Self {
        self.decorator.push(Box::new(decorator));
        self.force_render();
        self
    }

    /// Hook consulted before built-in key command handling; `Yes` vetoes it
    pub fn on_key_command(
        &mut self,
        hook: impl FnMut(&KeyCommand, &EditorState) -> Handled + 'static,
    ) {
        self.key_command_hook = Some(Box::new(hook));
    }

    pub fn on_return(&mut self, hook: impl FnMut(ReturnModifiers, &EditorState) -> Handled + 'static) {
        self.return_hook = Some(Box::new(hook));
    }

    pub fn on_paste(&mut self, hook: impl FnMut(&PastePayload, &EditorState) -> Handled + 'static) {
        self.paste_hook = Some(Box::new(hook));
    }

    pub fn subscribe(&mut self, subscriber: Subscriber) {
        self.pipeline.subscribe(subscriber);
    }

    pub fn state(&self) -> &EditorState {
        self.pipeline.state()
    }

    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Toggle an inline style at the selection
    ///
    /// Collapsed: the result becomes the style of the next typed characters.
    /// Expanded: the tag's whole group is cleared over the selection and the
    /// tag is applied unless it was active.
    #[instrument(skip_all, fields(tag = %tag))]
    pub fn toggle_style(&mut self, tag: &StyleTag) -> Handled {
        if !self.registry.is_legal(tag) {
            debug!("Ignoring toggle of a tag outside the vocabulary");
            return Handled::No;
        }

        let Some(next) = self
            .state()
            .toggle_inline_style(&self.registry, tag, &self.decorator)
        else {
            return Handled::No;
        };

        self.commit(next, "toggle style");
        Handled::Yes
    }

    /// Set the block type of the selected blocks; the same type resets to unstyled
    pub fn toggle_block_type(&mut self, block_type: &BlockType) -> Handled {
        let state = self.state();
        let range = state.selection().resolve(state.document());
        let current = state.document().blocks()[range.start_index].block_type();
        let next = if current == block_type {
            BlockType::Unstyled
        } else {
            block_type.clone()
        };

        let selection = state.selection().clone();
        let document = modifier::set_block_type(state.document(), &selection, &next);
        self.commit_content(document, selection, "block type");
        Handled::Yes
    }

    /// Align the selected blocks; the active alignment clears it
    pub fn set_text_align(&mut self, align: TextAlign) -> Handled {
        let state = self.state();
        let range = state.selection().resolve(state.document());
        let current = state.document().blocks()[range.start_index].text_align();
        let value = (current != Some(align)).then(|| Value::from(align.as_str()));

        let selection = state.selection().clone();
        let document = modifier::set_block_data(state.document(), &selection, TEXT_ALIGN, value);
        self.commit_content(document, selection, "text align");
        Handled::Yes
    }

    /// Strip every inline style from the selection
    pub fn clear_styles(&mut self) -> Handled {
        let state = self.state();
        if state.is_collapsed() {
            let next = state.with_inline_style_override(InlineStyle::new());
            self.commit(next, "clear styles");
            return Handled::Yes;
        }

        let selection = state.selection().clone();
        let document = modifier::remove_inline_style_group(state.document(), &selection, |_| true);
        if document.content_eq(state.document()) {
            return Handled::No;
        }
        self.commit_content(document, selection, "clear styles");
        Handled::Yes
    }

    /// Type `text` at the selection with the current inline style
    pub fn insert_text(&mut self, text: &str) {
        let state = self.state();
        let style = state.current_inline_style();
        let (document, selection) =
            modifier::insert_text(state.document(), state.selection(), text, &style, None);
        self.commit_content(document, selection, "insert text");
    }

    pub fn split_block(&mut self) {
        let state = self.state();
        let (document, selection) = modifier::split_block(state.document(), state.selection());
        self.commit_content(document, selection, "split block");
    }

    /// Offer clipboard contents; `No` leaves plain text to the host
    #[instrument(skip_all, fields(text = text.len(), html = html.map(str::len)))]
    pub fn handle_pasted_text(&mut self, text: &str, html: Option<&str>) -> Handled {
        let payload = PastePayload::new(text, html);
        if let Some(hook) = &mut self.paste_hook {
            if hook(&payload, self.pipeline.state()).is_handled() {
                return Handled::Yes;
            }
        }

        let importer = HtmlImporter::new(&self.registry).with_media(self.config.media.filter());
        let state = self.pipeline.state();
        match merge_paste_with(state.document(), state.selection(), &payload, &importer) {
            PasteOutcome::NotHandled => Handled::No,
            PasteOutcome::Handled {
                document,
                selection,
                warnings,
            } => {
                for warning in &warnings {
                    debug!(%warning, "Dropped pasted content");
                }
                self.commit_content(document, selection, "paste");
                Handled::Yes
            }
        }
    }

    pub fn handle_key_command(&mut self, name: &str) -> Handled {
        let command = KeyCommand::from_name(name);
        if let Some(hook) = &mut self.key_command_hook {
            if hook(&command, self.pipeline.state()).is_handled() {
                return Handled::Yes;
            }
        }

        match &command {
            KeyCommand::Bold
            | KeyCommand::Italic
            | KeyCommand::Underline
            | KeyCommand::Code
            | KeyCommand::Strikethrough => {
                let allowed = command_control(&command).map_or(true, |c| self.config.has_control(c));
                match command.style() {
                    Some(style) if allowed => self.toggle_style(&StyleTag::from(style)),
                    _ => Handled::No,
                }
            }
            KeyCommand::Backspace => {
                let selection = self.state().selection().clone();
                match commands::backspace_reset(self.state().document(), &selection) {
                    Some(document) => {
                        self.commit_content(document, selection, "backspace");
                        Handled::Yes
                    }
                    None => Handled::No,
                }
            }
            KeyCommand::Undo if self.config.has_control(Control::Undo) => self.undo().into(),
            KeyCommand::Redo if self.config.has_control(Control::Redo) => self.redo().into(),
            _ => Handled::No,
        }
    }

    pub fn handle_return(&mut self, modifiers: ReturnModifiers) -> Handled {
        if let Some(hook) = &mut self.return_hook {
            if hook(modifiers, self.pipeline.state()).is_handled() {
                return Handled::Yes;
            }
        }

        let state = self.state();
        let style = state.current_inline_style();
        match commands::handle_return(state.document(), state.selection(), modifiers, &style) {
            Some((document, selection)) => {
                self.commit_content(document, selection, "return");
                Handled::Yes
            }
            None => Handled::No,
        }
    }

    /// Move the selection; no history entry is recorded
    pub fn set_selection(&mut self, selection: Selection) {
        let next = self.state().with_selection(selection);
        self.commit(next, "select");
    }

    /// Replace the whole document, as when the host swaps content
    pub fn set_content(&mut self, content: &InitialContent) -> EditorResult<()> {
        let document = import_content(&self.config, &self.registry, content)?;
        let selection = document.selection_at_end();
        self.commit_content(document, selection, "set content");
        Ok(())
    }

    pub fn undo(&mut self) -> bool {
        let current = self.history_entry();
        match self.history.undo(current) {
            Some(entry) => {
                self.restore(entry);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        let current = self.history_entry();
        match self.history.redo(current) {
            Some(entry) => {
                self.restore(entry);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Recompute decorations; content and the debounce timer are untouched
    pub fn force_render(&mut self) {
        self.pipeline.force_render(&self.decorator);
    }

    /// Current content in `format`, or the configured format
    pub fn get_content(&self, format: Option<ContentFormat>) -> Content {
        self.pipeline
            .content(format.unwrap_or(self.config.content_format))
    }

    pub fn get_html_content(&self) -> String {
        self.pipeline.html()
    }

    pub fn get_raw_content(&self) -> RawDocument {
        self.pipeline.raw()
    }

    pub fn current_inline_style(&self) -> InlineStyle {
        self.state().current_inline_style()
    }

    /// Toolbar caption for a style family at the current selection
    pub fn caption(&self, family: StyleFamily) -> String {
        self.registry.caption(
            family,
            &self.current_inline_style(),
            self.config.captions.get(family),
        )
    }

    pub fn is_empty(&self) -> bool {
        !self.state().document().has_text()
    }

    /// Emit pending changes if the debounce window has closed
    pub fn flush_due(&mut self) -> bool {
        let now = (self.clock)();
        self.pipeline.flush_due(now)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pipeline.deadline()
    }

    fn commit_content(&mut self, document: Document, selection: Selection, description: &str) {
        let next = self
            .state()
            .with_content(document, selection, &self.decorator);
        self.commit(next, description);
    }

    fn commit(&mut self, next: EditorState, description: &str) {
        let current = self.pipeline.state();
        if !Arc::ptr_eq(&current.shared_document(), &next.shared_document()) {
            self.history.push(
                HistoryEntry::new(current.shared_document(), current.selection().clone())
                    .with_description(description),
            );
        }
        let now = (self.clock)();
        self.pipeline.commit(next, now);
    }

    fn history_entry(&self) -> HistoryEntry {
        let state = self.state();
        HistoryEntry::new(state.shared_document(), state.selection().clone())
    }

    fn restore(&mut self, entry: HistoryEntry) {
        debug!(description = ?entry.description, "Restoring history entry");
        let state = EditorState::create(entry.document, entry.selection, &self.decorator);
        let now = (self.clock)();
        self.pipeline.commit(state, now);
    }
}

fn command_control(command: &KeyCommand) -> Option<Control> {
    match command {
        KeyCommand::Bold => Some(Control::Bold),
        KeyCommand::Italic => Some(Control::Italic),
        KeyCommand::Underline => Some(Control::Underline),
        KeyCommand::Code => Some(Control::Code),
        KeyCommand::Strikethrough => Some(Control::StrikeThrough),
        _ => None,
    }
}

/// Decode initial or replacement content
///
/// A string is HTML, unless the content format is raw and the string holds a
/// JSON object, in which case it is a serialized raw document.
fn import_content(
    config: &EditorConfig,
    registry: &StyleRegistry,
    content: &InitialContent,
) -> EditorResult<Document> {
    match content {
        InitialContent::Raw(raw) => Ok(from_raw(raw)?),
        InitialContent::Html(text)
            if config.content_format == ContentFormat::Raw && text.trim_start().starts_with('{') =>
        {
            Ok(from_raw(&RawDocument::from_json(text)?)?)
        }
        InitialContent::Html(html) => {
            let importer = HtmlImporter::new(registry).with_media(config.media.filter());
            let (document, warnings) = importer.parse_document(html);
            if !warnings.is_empty() {
                warn!(count = warnings.len(), "Initial HTML had unsupported content");
            }
            Ok(document)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use richtext_styles::{color_tag, font_size_tag};

    fn editor(json: &str) -> Editor {
        Editor::new(EditorConfig::from_json(json).unwrap()).unwrap()
    }

    #[test]
    fn test_html_initial_content() {
        let editor = editor(r#"{"initialContent": "<h2>Hi</h2><p>there</p>"}"#);
        let blocks = editor.state().document().blocks();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].block_type(), &BlockType::HeaderTwo);
        assert_eq!(editor.get_html_content(), "<h2>Hi</h2><p>there</p>");
    }

    #[test]
    fn test_raw_json_string_initial_content() {
        let editor = editor(
            r#"{"initialContent": "{\"blocks\":[{\"key\":\"a\",\"text\":\"raw\"}]}", "contentFormat": "raw"}"#,
        );
        assert_eq!(editor.state().document().plain_text(), "raw");
    }

    #[test]
    fn test_enabled_family_without_vocabulary_is_fatal() {
        let config = EditorConfig::from_json(r#"{"fontSizes": []}"#).unwrap();
        assert!(Editor::new(config).is_err());
    }

    #[test]
    fn test_illegal_tag_is_noop() {
        let mut editor = editor(r#"{"fontSizes": [12, 14, 16]}"#);
        assert_eq!(editor.toggle_style(&font_size_tag(18)), Handled::No);
        assert!(!editor.pipeline().is_pending());
    }

    #[test]
    fn test_caption_tracks_active_value() {
        let mut editor = editor(r#"{"captions": {"color": "Text color"}}"#);
        assert_eq!(editor.caption(StyleFamily::Color), "Text color");

        editor.toggle_style(&color_tag("#61a951"));
        assert_eq!(editor.caption(StyleFamily::Color), "#61a951");
    }

    #[test]
    fn test_selection_change_skips_history() {
        let mut editor = editor(r#"{"initialContent": "<p>abc</p>"}"#);
        let key = editor.state().document().first_block().key().clone();

        editor.set_selection(Selection::collapsed(key, 2));
        assert!(!editor.can_undo());
        assert!(editor.pipeline().is_pending());
    }
}
