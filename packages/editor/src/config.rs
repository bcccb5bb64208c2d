//! Editor configuration
//!
//! Every field is optional in JSON; missing values fall back to the defaults
//! of [`EditorConfig::default`].

use crate::errors::EditorResult;
use richtext_html::MediaFilter;
use richtext_model::RawDocument;
use richtext_styles::{EnabledFamilies, StyleFamily, StyleVocabulary, VocabularyOverrides};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Format of the content handed to `on_change` and `get_content`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    #[default]
    Raw,
    Html,
}

/// Content the editor starts from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InitialContent {
    Html(String),
    Raw(RawDocument),
}

/// Toolbar controls; a style family is only enabled when its control is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Control {
    Undo,
    Redo,
    Headings,
    FontSize,
    FontFamily,
    Color,
    Bold,
    Italic,
    Underline,
    StrikeThrough,
    Superscript,
    Subscript,
    Code,
    TextAlign,
    ListUl,
    ListOl,
    Blockquote,
    Link,
    Media,
    Clear,
}

impl Control {
    pub const ALL: [Control; 20] = [
        Control::Undo,
        Control::Redo,
        Control::Headings,
        Control::FontSize,
        Control::FontFamily,
        Control::Color,
        Control::Bold,
        Control::Italic,
        Control::Underline,
        Control::StrikeThrough,
        Control::Superscript,
        Control::Subscript,
        Control::Code,
        Control::TextAlign,
        Control::ListUl,
        Control::ListOl,
        Control::Blockquote,
        Control::Link,
        Control::Media,
        Control::Clear,
    ];
}

/// Default captions shown when no value of a family is active
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Captions {
    pub font_size: Option<String>,
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub font_family: Option<String>,
}

impl Captions {
    pub fn get(&self, family: StyleFamily) -> Option<&str> {
        match family {
            StyleFamily::FontSize => self.font_size.as_deref(),
            StyleFamily::Color => self.color.as_deref(),
            StyleFamily::BackgroundColor => self.background_color.as_deref(),
            StyleFamily::FontFamily => self.font_family.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaOptions {
    pub image: bool,
    pub video: bool,
    pub audio: bool,
    /// Without an upload handler only images can be embedded
    pub upload_enabled: bool,
}

impl Default for MediaOptions {
    fn default() -> Self {
        Self {
            image: true,
            video: true,
            audio: true,
            upload_enabled: false,
        }
    }
}

impl MediaOptions {
    pub fn filter(&self) -> MediaFilter {
        MediaFilter {
            image: self.image,
            video: self.video && self.upload_enabled,
            audio: self.audio && self.upload_enabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    pub initial_content: Option<InitialContent>,
    pub content_format: ContentFormat,
    #[serde(flatten)]
    pub vocabulary: VocabularyOverrides,
    pub captions: Captions,
    pub controls: Vec<Control>,
    pub media: MediaOptions,
    pub debounce_ms: u64,
    pub history_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            initial_content: None,
            content_format: ContentFormat::Raw,
            vocabulary: VocabularyOverrides::default(),
            captions: Captions::default(),
            controls: Control::ALL.to_vec(),
            media: MediaOptions::default(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> EditorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Default vocabulary merged with the configured overrides
    pub fn style_vocabulary(&self) -> StyleVocabulary {
        StyleVocabulary::merged(&self.vocabulary)
    }

    /// Style families whose toolbar control is enabled
    pub fn enabled_families(&self) -> EnabledFamilies {
        let mut families = EnabledFamilies::none();
        if self.has_control(Control::FontSize) {
            families = families.with(StyleFamily::FontSize);
        }
        if self.has_control(Control::Color) {
            families = families
                .with(StyleFamily::Color)
                .with(StyleFamily::BackgroundColor);
        }
        if self.has_control(Control::FontFamily) {
            families = families.with(StyleFamily::FontFamily);
        }
        families
    }

    pub fn has_control(&self, control: Control) -> bool {
        self.controls.contains(&control)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = EditorConfig::from_json("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.history_limit, 100);
        assert_eq!(config.content_format, ContentFormat::Raw);
    }

    #[test]
    fn test_camel_case_fields() {
        let config = EditorConfig::from_json(
            r#"{
                "contentFormat": "html",
                "fontSizes": [12, 14, 16],
                "captions": { "fontSize": "Size" },
                "controls": ["bold", "font-size", "strike-through"],
                "media": { "uploadEnabled": true, "audio": false },
                "debounceMs": 50
            }"#,
        )
        .unwrap();

        assert_eq!(config.content_format, ContentFormat::Html);
        assert_eq!(config.style_vocabulary().font_sizes, vec![12, 14, 16]);
        assert_eq!(
            config.style_vocabulary().colors,
            StyleVocabulary::default().colors
        );
        assert_eq!(config.captions.get(StyleFamily::FontSize), Some("Size"));
        assert!(config.has_control(Control::StrikeThrough));
        assert!(!config.has_control(Control::Color));
        assert_eq!(config.media.filter(), MediaFilter { image: true, video: true, audio: false });
        assert_eq!(config.debounce_ms, 50);
    }

    #[test]
    fn test_enabled_families_follow_controls() {
        let config = EditorConfig {
            controls: vec![Control::Color],
            ..EditorConfig::default()
        };
        let families = config.enabled_families();
        assert!(families.contains(StyleFamily::Color));
        assert!(families.contains(StyleFamily::BackgroundColor));
        assert!(!families.contains(StyleFamily::FontSize));
    }

    #[test]
    fn test_media_needs_upload_for_video_and_audio() {
        let filter = MediaOptions::default().filter();
        assert!(filter.image);
        assert!(!filter.video);
        assert!(!filter.audio);
    }

    #[test]
    fn test_initial_content_variants() {
        let html: EditorConfig = EditorConfig::from_json(r#"{"initialContent": "<p>x</p>"}"#).unwrap();
        assert_eq!(
            html.initial_content,
            Some(InitialContent::Html("<p>x</p>".to_string()))
        );

        let raw = EditorConfig::from_json(
            r#"{"initialContent": {"blocks": [{"key": "a", "text": "x"}], "entityMap": {}}}"#,
        )
        .unwrap();
        assert!(matches!(raw.initial_content, Some(InitialContent::Raw(_))));
    }
}
