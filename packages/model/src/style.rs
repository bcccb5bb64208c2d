//! Inline style tags and per-character style sets

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub const BOLD: &str = "BOLD";
pub const ITALIC: &str = "ITALIC";
pub const UNDERLINE: &str = "UNDERLINE";
pub const STRIKETHROUGH: &str = "STRIKETHROUGH";
pub const CODE: &str = "CODE";
pub const SUPERSCRIPT: &str = "SUPERSCRIPT";
pub const SUBSCRIPT: &str = "SUBSCRIPT";

/// A character-level formatting marker
///
/// Either a bare name (`BOLD`) or namespaced (`FONTSIZE-14`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleTag(String);

impl StyleTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Build a namespaced tag such as `FONTSIZE-14`
    pub fn namespaced(namespace: &str, value: impl fmt::Display) -> Self {
        Self(format!("{}-{}", namespace, value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split a namespaced tag into `(namespace, value)`
    pub fn namespace(&self) -> Option<(&str, &str)> {
        self.0.split_once('-')
    }
}

impl fmt::Display for StyleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StyleTag {
    fn from(tag: &str) -> Self {
        Self(tag.to_string())
    }
}

impl From<String> for StyleTag {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

/// The set of inline styles active on one character
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InlineStyle(BTreeSet<StyleTag>);

impl InlineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, tag: &StyleTag) -> bool {
        self.0.contains(tag)
    }

    pub fn has(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t.as_str() == tag)
    }

    pub fn insert(&mut self, tag: StyleTag) -> bool {
        self.0.insert(tag)
    }

    pub fn remove(&mut self, tag: &StyleTag) -> bool {
        self.0.remove(tag)
    }

    pub fn with(mut self, tag: impl Into<StyleTag>) -> Self {
        self.0.insert(tag.into());
        self
    }

    pub fn without(mut self, tag: &StyleTag) -> Self {
        self.0.remove(tag);
        self
    }

    pub fn retain(&mut self, keep: impl FnMut(&StyleTag) -> bool) {
        self.0.retain(keep);
    }

    pub fn iter(&self) -> impl Iterator<Item = &StyleTag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<StyleTag> for InlineStyle {
    fn from_iter<I: IntoIterator<Item = StyleTag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a InlineStyle {
    type Item = &'a StyleTag;
    type IntoIter = std::collections::btree_set::Iter<'a, StyleTag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
