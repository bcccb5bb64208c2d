//! Style vocabulary: the legal values of each configurable style family

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontFamily {
    /// Display name, also used in the style tag (`FONTFAMILY-<NAME>`)
    pub name: String,
    /// CSS `font-family` value
    pub family: String,
}

impl FontFamily {
    pub fn new(name: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            family: family.into(),
        }
    }
}

/// Ordered legal values per style family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleVocabulary {
    pub colors: Vec<String>,
    pub font_sizes: Vec<u32>,
    pub font_families: Vec<FontFamily>,
}

/// Caller overrides; `None` keeps the default for that family
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyOverrides {
    #[serde(default)]
    pub colors: Option<Vec<String>>,
    #[serde(default)]
    pub font_sizes: Option<Vec<u32>>,
    #[serde(default)]
    pub font_families: Option<Vec<FontFamily>>,
}

impl StyleVocabulary {
    pub fn new(colors: Vec<String>, font_sizes: Vec<u32>, font_families: Vec<FontFamily>) -> Self {
        Self {
            colors,
            font_sizes,
            font_families,
        }
    }

    /// Defaults merged with caller overrides
    pub fn merged(overrides: &VocabularyOverrides) -> Self {
        let defaults = Self::default();
        Self {
            colors: overrides.colors.clone().unwrap_or(defaults.colors),
            font_sizes: overrides.font_sizes.clone().unwrap_or(defaults.font_sizes),
            font_families: overrides
                .font_families
                .clone()
                .unwrap_or(defaults.font_families),
        }
    }
}

impl Default for StyleVocabulary {
    fn default() -> Self {
        Self {
            colors: [
                "#000000", "#333333", "#666666", "#999999", "#cccccc", "#ffffff", "#61a951",
                "#16a085", "#07a9fe", "#003ba5", "#8e44ad", "#f32784", "#c0392b", "#d35400",
                "#f39c12", "#fdda00", "#7f8c8d", "#2c3e50",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            font_sizes: vec![
                12, 14, 16, 18, 20, 24, 28, 30, 32, 36, 40, 48, 56, 64, 72, 96, 120, 144,
            ],
            font_families: vec![
                FontFamily::new("Arial", "Arial, Helvetica, sans-serif"),
                FontFamily::new("Georgia", "Georgia, serif"),
                FontFamily::new("Impact", "Impact, serif"),
                FontFamily::new("Monospace", "\"Courier New\", Courier, monospace"),
                FontFamily::new("Tahoma", "tahoma, arial, \"Hiragino Sans GB\", sans-serif"),
            ],
        }
    }
}
