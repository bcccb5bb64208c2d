//! # Change Pipeline
//!
//! Owns the canonical editor state and coalesces commits into debounced
//! notifications.
//!
//! ```text
//!          commit                      flush_due (deadline passed)
//!   Idle ─────────▶ PendingEmission ───────────────────────────────▶ Idle
//!                     │    ▲                                    (emit once)
//!                     └────┘ commit (deadline restarted)
//! ```
//!
//! The pipeline never reads a clock itself: callers pass `now`, and an async
//! host waits on [`sleep_until_deadline`] between input events. Views are
//! computed only when a registered callback consumes them.

use crate::config::ContentFormat;
use crate::decorators::Decorator;
use crate::state::EditorState;
use richtext_html::{to_html, HtmlOptions};
use richtext_model::{to_raw, RawDocument};
use richtext_styles::StyleRegistry;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStatus {
    Idle,
    PendingEmission { deadline: Instant },
}

/// Document content in one of the external formats
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Content {
    Raw(RawDocument),
    Html(String),
}

impl Content {
    pub fn as_html(&self) -> Option<&str> {
        match self {
            Content::Html(html) => Some(html),
            Content::Raw(_) => None,
        }
    }

    pub fn as_raw(&self) -> Option<&RawDocument> {
        match self {
            Content::Raw(raw) => Some(raw),
            Content::Html(_) => None,
        }
    }

    pub fn format(&self) -> ContentFormat {
        match self {
            Content::Raw(_) => ContentFormat::Raw,
            Content::Html(_) => ContentFormat::Html,
        }
    }
}

type ChangeCallback = Box<dyn FnMut(&Content)>;
type HtmlCallback = Box<dyn FnMut(&str)>;
type RawCallback = Box<dyn FnMut(&RawDocument)>;

/// A set of optional notification callbacks
#[derive(Default)]
pub struct Subscriber {
    on_change: Option<ChangeCallback>,
    on_html_change: Option<HtmlCallback>,
    on_raw_change: Option<RawCallback>,
}

impl Subscriber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content in the pipeline's configured format
    pub fn on_change(mut self, callback: impl FnMut(&Content) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn on_html_change(mut self, callback: impl FnMut(&str) + 'static) -> Self {
        self.on_html_change = Some(Box::new(callback));
        self
    }

    pub fn on_raw_change(mut self, callback: impl FnMut(&RawDocument) + 'static) -> Self {
        self.on_raw_change = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("on_change", &self.on_change.is_some())
            .field("on_html_change", &self.on_html_change.is_some())
            .field("on_raw_change", &self.on_raw_change.is_some())
            .finish()
    }
}

/// Manages the commit → debounce → emit cycle
#[derive(Debug)]
pub struct Pipeline {
    state: EditorState,
    registry: Arc<StyleRegistry>,
    format: ContentFormat,
    debounce: Duration,
    status: PipelineStatus,
    subscribers: Vec<Subscriber>,
    emissions: usize,
    /// Conversions done for emissions, per format
    html_renders: usize,
    raw_renders: usize,
}

impl Pipeline {
    pub fn new(
        state: EditorState,
        registry: Arc<StyleRegistry>,
        format: ContentFormat,
        debounce: Duration,
    ) -> Self {
        Self {
            state,
            registry,
            format,
            debounce,
            status: PipelineStatus::Idle,
            subscribers: Vec::new(),
            emissions: 0,
            html_renders: 0,
            raw_renders: 0,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn status(&self) -> PipelineStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, PipelineStatus::PendingEmission { .. })
    }

    /// When the armed debounce window closes, if any
    pub fn deadline(&self) -> Option<Instant> {
        match self.status {
            PipelineStatus::PendingEmission { deadline } => Some(deadline),
            PipelineStatus::Idle => None,
        }
    }

    /// Number of emissions so far
    pub fn emissions(&self) -> usize {
        self.emissions
    }

    /// HTML conversions done for emissions so far
    pub fn html_renders(&self) -> usize {
        self.html_renders
    }

    /// Raw conversions done for emissions so far
    pub fn raw_renders(&self) -> usize {
        self.raw_renders
    }

    pub fn subscribe(&mut self, subscriber: Subscriber) {
        debug!(?subscriber, "Registered subscriber");
        self.subscribers.push(subscriber);
    }

    /// Replace the canonical state and (re)arm the debounce window
    pub fn commit(&mut self, state: EditorState, now: Instant) {
        let deadline = now + self.debounce;
        debug!(
            restarted = self.is_pending(),
            blocks = state.document().blocks().len(),
            "Committed editor state"
        );
        self.state = state;
        self.status = PipelineStatus::PendingEmission { deadline };
    }

    /// Recompute decorations over the current document, bypassing the debounce
    pub fn force_render(&mut self, decorator: &dyn Decorator) {
        self.state = self.state.redecorate(decorator);
        debug!(
            decorations = self.state.decorations().len(),
            "Forced render"
        );
    }

    /// Emit if the debounce window has closed; returns whether it did
    pub fn flush_due(&mut self, now: Instant) -> bool {
        match self.status {
            PipelineStatus::PendingEmission { deadline } if now >= deadline => {
                self.status = PipelineStatus::Idle;
                self.emit();
                true
            }
            _ => false,
        }
    }

    #[instrument(skip_all, fields(subscribers = self.subscribers.len()))]
    fn emit(&mut self) {
        self.emissions += 1;

        let needs_html = self.subscribers.iter().any(|s| {
            s.on_html_change.is_some()
                || (s.on_change.is_some() && self.format == ContentFormat::Html)
        });
        let needs_raw = self.subscribers.iter().any(|s| {
            s.on_raw_change.is_some() || (s.on_change.is_some() && self.format == ContentFormat::Raw)
        });

        let html = needs_html.then(|| self.html());
        let raw = needs_raw.then(|| self.raw());
        self.html_renders += usize::from(needs_html);
        self.raw_renders += usize::from(needs_raw);
        let change = match self.format {
            ContentFormat::Html => html.clone().map(Content::Html),
            ContentFormat::Raw => raw.clone().map(Content::Raw),
        };

        debug!(html = needs_html, raw = needs_raw, "Emitting change");

        for subscriber in &mut self.subscribers {
            if let (Some(callback), Some(content)) = (&mut subscriber.on_change, &change) {
                callback(content);
            }
            if let (Some(callback), Some(html)) = (&mut subscriber.on_html_change, &html) {
                callback(html);
            }
            if let (Some(callback), Some(raw)) = (&mut subscriber.on_raw_change, &raw) {
                callback(raw);
            }
        }
    }

    /// Current content in `format`, never debounced
    pub fn content(&self, format: ContentFormat) -> Content {
        match format {
            ContentFormat::Html => Content::Html(self.html()),
            ContentFormat::Raw => Content::Raw(self.raw()),
        }
    }

    pub fn default_format(&self) -> ContentFormat {
        self.format
    }

    pub fn html(&self) -> String {
        to_html(self.state.document(), &self.registry, HtmlOptions::default())
    }

    pub fn raw(&self) -> RawDocument {
        to_raw(self.state.document())
    }
}

/// Sleep until the pipeline deadline; never resolves when nothing is pending
pub async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending::<()>().await,
    }
}
