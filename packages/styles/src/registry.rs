//! # Style Registry
//!
//! Declares every known inline style from a [`StyleVocabulary`]: which tags
//! are legal, which exclusivity group each tag belongs to, and how each tag
//! renders to (and is recovered from) HTML.
//!
//! ## Tag naming
//!
//! | Family | Tag | Rendering |
//! |---|---|---|
//! | font size | `FONTSIZE-14` | `font-size:14px` |
//! | color | `COLOR-61A951` | `color:#61a951` |
//! | background color | `BGCOLOR-61A951` | `background-color:#61a951` |
//! | font family | `FONTFAMILY-GEORGIA` | `font-family:Georgia, serif` |
//!
//! Group lookup only looks at the tag namespace, so a `FONTSIZE-99` written
//! under an older vocabulary still belongs to the font-size group.

use crate::error::ConfigurationError;
use crate::vocabulary::{FontFamily, StyleVocabulary};
use richtext_model::{
    InlineStyle, StyleTag, BOLD, CODE, ITALIC, STRIKETHROUGH, SUBSCRIPT, SUPERSCRIPT, UNDERLINE,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use tracing::debug;

pub const FONT_SIZE_PREFIX: &str = "FONTSIZE";
pub const COLOR_PREFIX: &str = "COLOR";
pub const BACKGROUND_COLOR_PREFIX: &str = "BGCOLOR";
pub const FONT_FAMILY_PREFIX: &str = "FONTFAMILY";

/// Inline styles that carry no value
pub const SIMPLE_STYLES: [&str; 7] = [
    BOLD,
    ITALIC,
    UNDERLINE,
    STRIKETHROUGH,
    CODE,
    SUPERSCRIPT,
    SUBSCRIPT,
];

/// Configurable style families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleFamily {
    FontSize,
    Color,
    BackgroundColor,
    FontFamily,
}

impl StyleFamily {
    pub const ALL: [StyleFamily; 4] = [
        StyleFamily::FontSize,
        StyleFamily::Color,
        StyleFamily::BackgroundColor,
        StyleFamily::FontFamily,
    ];

    /// Built-in caption used when neither a value nor a default caption applies
    pub fn label(&self) -> &'static str {
        match self {
            StyleFamily::FontSize => "Font Size",
            StyleFamily::Color => "Color",
            StyleFamily::BackgroundColor => "Background Color",
            StyleFamily::FontFamily => "Font Family",
        }
    }

    pub fn group(&self) -> StyleGroup {
        match self {
            StyleFamily::FontSize => StyleGroup::FontSize,
            StyleFamily::Color => StyleGroup::Color,
            StyleFamily::BackgroundColor => StyleGroup::BackgroundColor,
            StyleFamily::FontFamily => StyleGroup::FontFamily,
        }
    }
}

impl fmt::Display for StyleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StyleFamily::FontSize => "font-size",
            StyleFamily::Color => "color",
            StyleFamily::BackgroundColor => "background-color",
            StyleFamily::FontFamily => "font-family",
        };
        f.write_str(name)
    }
}

/// Exclusivity group: at most one tag per group on any character
///
/// Tags outside the known families form a singleton group of their own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleGroup {
    FontSize,
    Color,
    BackgroundColor,
    FontFamily,
    Script,
    Standalone(StyleTag),
}

/// Families the host enabled (and therefore must have a vocabulary)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnabledFamilies(BTreeSet<StyleFamily>);

impl EnabledFamilies {
    pub fn all() -> Self {
        Self(StyleFamily::ALL.into_iter().collect())
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn with(mut self, family: StyleFamily) -> Self {
        self.0.insert(family);
        self
    }

    pub fn contains(&self, family: StyleFamily) -> bool {
        self.0.contains(&family)
    }
}

impl FromIterator<StyleFamily> for EnabledFamilies {
    fn from_iter<I: IntoIterator<Item = StyleFamily>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// How a tag renders in HTML
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendering {
    /// Wrap the run in this element
    Element(&'static str),
    /// Contribute one CSS declaration to the run's span
    Css { property: &'static str, value: String },
}

pub fn font_size_tag(size: u32) -> StyleTag {
    StyleTag::namespaced(FONT_SIZE_PREFIX, size)
}

pub fn color_tag(color: &str) -> StyleTag {
    StyleTag::namespaced(COLOR_PREFIX, color.trim_start_matches('#').to_uppercase())
}

pub fn background_color_tag(color: &str) -> StyleTag {
    StyleTag::namespaced(
        BACKGROUND_COLOR_PREFIX,
        color.trim_start_matches('#').to_uppercase(),
    )
}

pub fn font_family_tag(name: &str) -> StyleTag {
    StyleTag::namespaced(FONT_FAMILY_PREFIX, name.to_uppercase())
}

#[derive(Debug, Clone)]
pub struct StyleRegistry {
    vocabulary: StyleVocabulary,
    tags: BTreeSet<StyleTag>,
}

impl StyleRegistry {
    /// Validate the vocabulary and build the tag tables
    pub fn new(
        vocabulary: StyleVocabulary,
        enabled: &EnabledFamilies,
    ) -> Result<Self, ConfigurationError> {
        validate(&vocabulary, enabled)?;

        let mut tags: BTreeSet<StyleTag> = SIMPLE_STYLES.iter().map(|t| StyleTag::from(*t)).collect();
        tags.extend(vocabulary.font_sizes.iter().map(|s| font_size_tag(*s)));
        tags.extend(vocabulary.colors.iter().map(|c| color_tag(c)));
        tags.extend(vocabulary.colors.iter().map(|c| background_color_tag(c)));
        tags.extend(vocabulary.font_families.iter().map(|f| font_family_tag(&f.name)));

        debug!(
            tags = tags.len(),
            colors = vocabulary.colors.len(),
            font_sizes = vocabulary.font_sizes.len(),
            font_families = vocabulary.font_families.len(),
            "Built style registry"
        );

        Ok(Self { vocabulary, tags })
    }

    pub fn vocabulary(&self) -> &StyleVocabulary {
        &self.vocabulary
    }

    /// Every legal tag under the current vocabulary
    pub fn tags(&self) -> impl Iterator<Item = &StyleTag> {
        self.tags.iter()
    }

    pub fn is_legal(&self, tag: &StyleTag) -> bool {
        self.tags.contains(tag)
    }

    pub fn group_of(&self, tag: &StyleTag) -> StyleGroup {
        match tag.namespace() {
            Some((FONT_SIZE_PREFIX, _)) => StyleGroup::FontSize,
            Some((COLOR_PREFIX, _)) => StyleGroup::Color,
            Some((BACKGROUND_COLOR_PREFIX, _)) => StyleGroup::BackgroundColor,
            Some((FONT_FAMILY_PREFIX, _)) => StyleGroup::FontFamily,
            _ if tag.as_str() == SUPERSCRIPT || tag.as_str() == SUBSCRIPT => StyleGroup::Script,
            _ => StyleGroup::Standalone(tag.clone()),
        }
    }

    pub fn in_group(&self, tag: &StyleTag, group: &StyleGroup) -> bool {
        match group {
            StyleGroup::Standalone(only) => tag == only,
            _ => self.group_of(tag) == *group,
        }
    }

    /// HTML rendering rule for `tag`, or `None` when it cannot be resolved
    pub fn render(&self, tag: &StyleTag) -> Option<Rendering> {
        match tag.as_str() {
            BOLD => return Some(Rendering::Element("strong")),
            ITALIC => return Some(Rendering::Element("em")),
            UNDERLINE => return Some(Rendering::Element("u")),
            CODE => return Some(Rendering::Element("code")),
            SUPERSCRIPT => return Some(Rendering::Element("sup")),
            SUBSCRIPT => return Some(Rendering::Element("sub")),
            STRIKETHROUGH => {
                return Some(Rendering::Css {
                    property: "text-decoration",
                    value: "line-through".to_string(),
                })
            }
            _ => {}
        }

        let (namespace, value) = tag.namespace()?;
        match namespace {
            FONT_SIZE_PREFIX => value.parse::<u32>().ok().map(|size| Rendering::Css {
                property: "font-size",
                value: format!("{}px", size),
            }),
            COLOR_PREFIX => self.color_value(value, color_tag).map(|value| Rendering::Css {
                property: "color",
                value,
            }),
            BACKGROUND_COLOR_PREFIX => {
                self.color_value(value, background_color_tag)
                    .map(|value| Rendering::Css {
                        property: "background-color",
                        value,
                    })
            }
            FONT_FAMILY_PREFIX => self.font_family(value).map(|family| Rendering::Css {
                property: "font-family",
                value: family.family.clone(),
            }),
            _ => None,
        }
    }

    /// Inline style implied by an HTML element name
    pub fn tag_for_element(&self, element: &str) -> Option<StyleTag> {
        let tag = match element {
            "strong" | "b" => BOLD,
            "em" | "i" => ITALIC,
            "u" | "ins" => UNDERLINE,
            "s" | "del" | "strike" => STRIKETHROUGH,
            "code" => CODE,
            "sup" => SUPERSCRIPT,
            "sub" => SUBSCRIPT,
            _ => return None,
        };
        Some(StyleTag::from(tag))
    }

    /// Tags implied by one CSS declaration
    ///
    /// Only values legal under the vocabulary are recognized; anything else
    /// yields an empty list.
    pub fn tags_for_declaration(&self, property: &str, value: &str) -> Vec<StyleTag> {
        let value = value.trim();
        match property.trim().to_ascii_lowercase().as_str() {
            "font-size" => parse_px(value)
                .filter(|size| self.vocabulary.font_sizes.contains(size))
                .map(font_size_tag)
                .into_iter()
                .collect(),
            "color" => self
                .match_color(value)
                .map(|c| color_tag(c.as_str()))
                .into_iter()
                .collect(),
            "background-color" | "background" => self
                .match_color(value)
                .map(|c| background_color_tag(c.as_str()))
                .into_iter()
                .collect(),
            "font-family" => {
                let wanted = normalize_family(value);
                self.vocabulary
                    .font_families
                    .iter()
                    .find(|f| {
                        normalize_family(&f.family) == wanted
                            || normalize_family(&f.name) == wanted
                    })
                    .map(|f| font_family_tag(&f.name))
                    .into_iter()
                    .collect()
            }
            "text-decoration" | "text-decoration-line" => {
                let value = value.to_ascii_lowercase();
                let mut tags = Vec::new();
                if value.contains("underline") {
                    tags.push(StyleTag::from(UNDERLINE));
                }
                if value.contains("line-through") {
                    tags.push(StyleTag::from(STRIKETHROUGH));
                }
                tags
            }
            "font-weight" => match value.to_ascii_lowercase().as_str() {
                "bold" | "bolder" | "600" | "700" | "800" | "900" => vec![StyleTag::from(BOLD)],
                _ => Vec::new(),
            },
            "font-style" if value.eq_ignore_ascii_case("italic") => vec![StyleTag::from(ITALIC)],
            "vertical-align" => match value.to_ascii_lowercase().as_str() {
                "super" => vec![StyleTag::from(SUPERSCRIPT)],
                "sub" => vec![StyleTag::from(SUBSCRIPT)],
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    /// Vocabulary value of `family` active in `style`, formatted for display
    pub fn active_value(&self, family: StyleFamily, style: &InlineStyle) -> Option<String> {
        match family {
            StyleFamily::FontSize => self
                .vocabulary
                .font_sizes
                .iter()
                .find(|s| style.contains(&font_size_tag(**s)))
                .map(|s| format!("{}px", s)),
            StyleFamily::Color => self
                .vocabulary
                .colors
                .iter()
                .find(|c| style.contains(&color_tag(c.as_str())))
                .cloned(),
            StyleFamily::BackgroundColor => self
                .vocabulary
                .colors
                .iter()
                .find(|c| style.contains(&background_color_tag(c.as_str())))
                .cloned(),
            StyleFamily::FontFamily => self
                .vocabulary
                .font_families
                .iter()
                .find(|f| style.contains(&font_family_tag(&f.name)))
                .map(|f| f.name.clone()),
        }
    }

    /// Toolbar caption: the active value, else the default caption, else the label
    pub fn caption(
        &self,
        family: StyleFamily,
        style: &InlineStyle,
        default_caption: Option<&str>,
    ) -> String {
        self.active_value(family, style)
            .or_else(|| default_caption.map(str::to_string))
            .unwrap_or_else(|| family.label().to_string())
    }

    fn color_value(&self, value: &str, make_tag: fn(&str) -> StyleTag) -> Option<String> {
        let tag = make_tag(value);
        if let Some(color) = self
            .vocabulary
            .colors
            .iter()
            .find(|c| make_tag(c.as_str()) == tag)
        {
            return Some(color.to_lowercase());
        }
        // Outside the vocabulary: hex values still describe themselves
        let is_hex = matches!(value.len(), 3 | 6) && value.chars().all(|c| c.is_ascii_hexdigit());
        is_hex.then(|| format!("#{}", value.to_lowercase()))
    }

    fn match_color(&self, value: &str) -> Option<&String> {
        let wanted = normalize_color(value)?;
        self.vocabulary
            .colors
            .iter()
            .find(|c| normalize_color(c).as_deref() == Some(wanted.as_str()))
    }

    fn font_family(&self, upper_name: &str) -> Option<&FontFamily> {
        self.vocabulary
            .font_families
            .iter()
            .find(|f| f.name.to_uppercase() == upper_name)
    }
}

fn validate(vocabulary: &StyleVocabulary, enabled: &EnabledFamilies) -> Result<(), ConfigurationError> {
    let empty = |family: StyleFamily| match family {
        StyleFamily::FontSize => vocabulary.font_sizes.is_empty(),
        StyleFamily::Color | StyleFamily::BackgroundColor => vocabulary.colors.is_empty(),
        StyleFamily::FontFamily => vocabulary.font_families.is_empty(),
    };
    if let Some(family) = StyleFamily::ALL
        .into_iter()
        .find(|f| enabled.contains(*f) && empty(*f))
    {
        return Err(ConfigurationError::EmptyVocabulary(family));
    }

    let mut seen = HashSet::new();
    for color in &vocabulary.colors {
        let normalized = normalize_color(color)
            .ok_or_else(|| ConfigurationError::InvalidColor(color.clone()))?;
        if !seen.insert(normalized) {
            return Err(ConfigurationError::duplicate(StyleFamily::Color, color.clone()));
        }
    }

    let mut seen = HashSet::new();
    for size in &vocabulary.font_sizes {
        if *size == 0 {
            return Err(ConfigurationError::InvalidFontSize(*size));
        }
        if !seen.insert(*size) {
            return Err(ConfigurationError::duplicate(StyleFamily::FontSize, size.to_string()));
        }
    }

    let mut seen = HashSet::new();
    for family in &vocabulary.font_families {
        if !seen.insert(family.name.to_uppercase()) {
            return Err(ConfigurationError::duplicate(
                StyleFamily::FontFamily,
                family.name.clone(),
            ));
        }
    }

    Ok(())
}

/// Parse `18px` / `18` / `18.0px` into whole pixels
fn parse_px(value: &str) -> Option<u32> {
    let number = value.trim().trim_end_matches("px").trim();
    let parsed: f64 = number.parse().ok()?;
    (parsed > 0.0 && parsed.fract() == 0.0).then_some(parsed as u32)
}

/// Normalize a CSS color to 6-digit lowercase hex, or a lowercase name
fn normalize_color(value: &str) -> Option<String> {
    let value = value.trim().to_ascii_lowercase();

    if let Some(hex) = value.strip_prefix('#') {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        return match hex.len() {
            3 => Some(hex.chars().flat_map(|c| [c, c]).collect()),
            6 => Some(hex.to_string()),
            _ => None,
        };
    }

    if let Some(args) = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let channels: Vec<u8> = args
            .split(',')
            .take(3)
            .map(|c| c.trim().parse::<u8>())
            .collect::<Result<_, _>>()
            .ok()?;
        if channels.len() != 3 {
            return None;
        }
        return Some(format!("{:02x}{:02x}{:02x}", channels[0], channels[1], channels[2]));
    }

    (!value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic())).then_some(value)
}

fn normalize_family(value: &str) -> String {
    value
        .split(',')
        .map(|part| part.trim().trim_matches(|c| c == '"' || c == '\'').to_lowercase())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> StyleRegistry {
        StyleRegistry::new(StyleVocabulary::default(), &EnabledFamilies::all()).expect("valid")
    }

    #[test]
    fn test_group_lookup_uses_namespace() {
        let registry = registry();
        assert_eq!(registry.group_of(&font_size_tag(14)), StyleGroup::FontSize);
        assert_eq!(registry.group_of(&font_size_tag(99)), StyleGroup::FontSize);
        assert_eq!(registry.group_of(&color_tag("#ff0000")), StyleGroup::Color);
        assert_eq!(
            registry.group_of(&background_color_tag("#ff0000")),
            StyleGroup::BackgroundColor
        );
        assert_eq!(registry.group_of(&StyleTag::from(SUBSCRIPT)), StyleGroup::Script);
        assert_eq!(
            registry.group_of(&StyleTag::from(BOLD)),
            StyleGroup::Standalone(StyleTag::from(BOLD))
        );
    }

    #[test]
    fn test_legal_tags() {
        let registry = registry();
        assert!(registry.is_legal(&font_size_tag(14)));
        assert!(!registry.is_legal(&font_size_tag(15)));
        assert!(registry.is_legal(&StyleTag::from("COLOR-61A951")));
        assert!(registry.is_legal(&StyleTag::from("FONTFAMILY-GEORGIA")));
        assert!(registry.is_legal(&StyleTag::from(BOLD)));
    }

    #[test]
    fn test_render_rules() {
        let registry = registry();
        assert_eq!(
            registry.render(&font_size_tag(14)),
            Some(Rendering::Css {
                property: "font-size",
                value: "14px".to_string()
            })
        );
        assert_eq!(
            registry.render(&StyleTag::from("COLOR-61A951")),
            Some(Rendering::Css {
                property: "color",
                value: "#61a951".to_string()
            })
        );
        assert_eq!(
            registry.render(&font_family_tag("Georgia")),
            Some(Rendering::Css {
                property: "font-family",
                value: "Georgia, serif".to_string()
            })
        );
        assert_eq!(registry.render(&StyleTag::from(BOLD)), Some(Rendering::Element("strong")));
        assert_eq!(registry.render(&font_family_tag("Comic")), None);
        assert_eq!(registry.render(&StyleTag::from("HIGHLIGHT")), None);
    }

    #[test]
    fn test_reverse_mapping_respects_vocabulary() {
        let registry = registry();
        assert_eq!(registry.tags_for_declaration("font-size", "14px"), vec![font_size_tag(14)]);
        assert!(registry.tags_for_declaration("font-size", "15px").is_empty());
        assert_eq!(
            registry.tags_for_declaration("color", "rgb(97, 169, 81)"),
            vec![color_tag("#61a951")]
        );
        assert_eq!(
            registry.tags_for_declaration("color", "#FFF"),
            vec![color_tag("#ffffff")]
        );
        assert_eq!(
            registry.tags_for_declaration("font-family", "'Georgia', serif"),
            vec![font_family_tag("Georgia")]
        );
        assert_eq!(
            registry.tags_for_declaration("text-decoration", "underline line-through"),
            vec![StyleTag::from(UNDERLINE), StyleTag::from(STRIKETHROUGH)]
        );
        assert!(registry.tags_for_declaration("margin", "4px").is_empty());
    }

    #[test]
    fn test_empty_enabled_family_is_rejected() {
        let vocabulary = StyleVocabulary {
            font_sizes: vec![],
            ..StyleVocabulary::default()
        };
        let err = StyleRegistry::new(vocabulary.clone(), &EnabledFamilies::all()).unwrap_err();
        assert_eq!(err, ConfigurationError::EmptyVocabulary(StyleFamily::FontSize));

        // Not enabled: empty is fine
        let enabled = EnabledFamilies::none().with(StyleFamily::Color);
        assert!(StyleRegistry::new(vocabulary, &enabled).is_ok());
    }

    #[test]
    fn test_invalid_vocabulary_values() {
        let bad_color = StyleVocabulary {
            colors: vec!["#12".to_string()],
            ..StyleVocabulary::default()
        };
        assert_eq!(
            StyleRegistry::new(bad_color, &EnabledFamilies::none()).unwrap_err(),
            ConfigurationError::InvalidColor("#12".to_string())
        );

        let duplicate = StyleVocabulary {
            font_sizes: vec![12, 12],
            ..StyleVocabulary::default()
        };
        assert!(matches!(
            StyleRegistry::new(duplicate, &EnabledFamilies::none()),
            Err(ConfigurationError::DuplicateValue { .. })
        ));
    }

    #[test]
    fn test_caption() {
        let registry = registry();
        let active = InlineStyle::new().with(font_size_tag(14));
        assert_eq!(registry.caption(StyleFamily::FontSize, &active, None), "14px");
        assert_eq!(
            registry.caption(StyleFamily::FontSize, &InlineStyle::new(), Some("Size")),
            "Size"
        );
        assert_eq!(
            registry.caption(StyleFamily::FontFamily, &InlineStyle::new(), None),
            "Font Family"
        );
    }

    #[test]
    fn test_parse_px() {
        assert_eq!(parse_px("18px"), Some(18));
        assert_eq!(parse_px(" 18.0px "), Some(18));
        assert_eq!(parse_px("18"), Some(18));
        assert_eq!(parse_px("1.5em"), None);
        assert_eq!(parse_px("12.5px"), None);
    }
}
