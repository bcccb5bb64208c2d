//! # Richtext Styles
//!
//! Inline style vocabulary, exclusivity groups, and toggle resolution.
//!
//! ## Usage
//!
//! ```rust
//! use richtext_model::InlineStyle;
//! use richtext_styles::{font_size_tag, toggle_style, EnabledFamilies, StyleRegistry, StyleVocabulary};
//!
//! let registry = StyleRegistry::new(StyleVocabulary::default(), &EnabledFamilies::all()).unwrap();
//!
//! let step = toggle_style(&registry, &InlineStyle::new(), &font_size_tag(14), true);
//! let step = toggle_style(&registry, &step.next, &font_size_tag(16), true);
//! assert_eq!(step.next, InlineStyle::new().with(font_size_tag(16)));
//! ```

mod error;
mod registry;
mod resolver;
mod vocabulary;

pub use error::ConfigurationError;
pub use registry::{
    background_color_tag, color_tag, font_family_tag, font_size_tag, EnabledFamilies, Rendering,
    StyleFamily, StyleGroup, StyleRegistry, BACKGROUND_COLOR_PREFIX, COLOR_PREFIX,
    FONT_FAMILY_PREFIX, FONT_SIZE_PREFIX, SIMPLE_STYLES,
};
pub use resolver::{toggle_style, StyleToggle, ToggleScope};
pub use vocabulary::{FontFamily, StyleVocabulary, VocabularyOverrides};
