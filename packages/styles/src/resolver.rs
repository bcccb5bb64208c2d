//! # Style Resolver
//!
//! Computes the next active style set for a toggle request while keeping
//! every exclusivity group down to at most one tag.
//!
//! ## Algorithm
//!
//! 1. Look up the group G of the requested tag
//! 2. Drop every active tag in G (whatever its value)
//! 3. Keep every other group's tags as they were
//! 4. Add the requested tag unless it was already active (toggle-off)
//!
//! Cost is proportional to the active set, never to the vocabulary size.

use crate::registry::{StyleGroup, StyleRegistry};
use richtext_model::{InlineStyle, StyleTag};
use tracing::debug;

/// Where a toggle is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleScope {
    /// Collapsed cursor: becomes the style of the next typed characters
    PendingStyle,
    /// Expanded selection: rewrites the selected characters
    Range,
}

/// Outcome of resolving one toggle request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleToggle {
    pub scope: ToggleScope,
    /// Group cleared from the target before `add` is applied
    pub group: StyleGroup,
    /// Active style set after the toggle
    pub next: InlineStyle,
    /// Tag added after clearing the group; `None` means toggle-off
    pub add: Option<StyleTag>,
}

impl StyleToggle {
    pub fn is_toggle_off(&self) -> bool {
        self.add.is_none()
    }
}

/// Resolve a style toggle against the currently active styles
pub fn toggle_style(
    registry: &StyleRegistry,
    active: &InlineStyle,
    requested: &StyleTag,
    collapsed: bool,
) -> StyleToggle {
    let group = registry.group_of(requested);
    let was_active = active.contains(requested);

    let mut next = active.clone();
    next.retain(|tag| !registry.in_group(tag, &group));

    let add = if was_active {
        None
    } else {
        next.insert(requested.clone());
        Some(requested.clone())
    };

    debug!(
        tag = %requested,
        group = ?group,
        toggle_off = was_active,
        collapsed,
        "Resolved style toggle"
    );

    StyleToggle {
        scope: if collapsed {
            ToggleScope::PendingStyle
        } else {
            ToggleScope::Range
        },
        group,
        next,
        add,
    }
}
