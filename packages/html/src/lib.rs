//! # Richtext HTML
//!
//! Conversion between documents and HTML, parameterized by a style registry.
//!
//! ```rust
//! use richtext_html::{from_html, to_html, HtmlOptions};
//! use richtext_styles::{EnabledFamilies, StyleRegistry, StyleVocabulary};
//!
//! let registry = StyleRegistry::new(StyleVocabulary::default(), &EnabledFamilies::all()).unwrap();
//! let doc = from_html("<h1>Title</h1><p><strong>Body</strong></p>", &registry);
//! let html = to_html(&doc, &registry, HtmlOptions::default());
//! assert_eq!(html, "<h1>Title</h1><p><strong>Body</strong></p>");
//! ```

pub mod compiler;
pub mod css;
pub mod error;
pub mod escape;
pub mod parser;
pub mod tokenizer;
pub mod tree;

pub use compiler::{to_html, HtmlOptions, BLOCK_DATA_ATTR};
pub use error::ConversionWarning;
pub use parser::{from_html, from_html_with_report, Conversion, HtmlImporter, MediaFilter};
pub use tokenizer::{tokenize, Token};
