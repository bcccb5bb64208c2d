//! Exclusivity invariant over long toggle sequences

use richtext_model::{InlineStyle, StyleTag, BOLD, ITALIC, SUBSCRIPT, SUPERSCRIPT};
use richtext_styles::{
    background_color_tag, color_tag, font_family_tag, font_size_tag, toggle_style,
    EnabledFamilies, StyleGroup, StyleRegistry, StyleVocabulary,
};
use std::collections::HashMap;

fn candidate_tags(vocabulary: &StyleVocabulary) -> Vec<StyleTag> {
    let mut tags: Vec<StyleTag> = vocabulary.font_sizes.iter().map(|s| font_size_tag(*s)).collect();
    tags.extend(vocabulary.colors.iter().map(|c| color_tag(c)));
    tags.extend(vocabulary.colors.iter().map(|c| background_color_tag(c)));
    tags.extend(vocabulary.font_families.iter().map(|f| font_family_tag(&f.name)));
    tags.extend([BOLD, ITALIC, SUPERSCRIPT, SUBSCRIPT].map(StyleTag::from));
    tags
}

fn assert_exclusive(registry: &StyleRegistry, style: &InlineStyle) {
    let mut counts: HashMap<StyleGroup, usize> = HashMap::new();
    for tag in style.iter() {
        *counts.entry(registry.group_of(tag)).or_default() += 1;
    }
    for (group, count) in counts {
        assert!(count <= 1, "group {:?} has {} tags in {:?}", group, count, style);
    }
}

#[test]
fn test_exclusivity_holds_for_every_group() {
    let vocabulary = StyleVocabulary::default();
    let registry = StyleRegistry::new(vocabulary.clone(), &EnabledFamilies::all()).unwrap();
    let tags = candidate_tags(&vocabulary);

    // Deterministic pseudo-random walk over the whole vocabulary
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    let mut active = InlineStyle::new();
    for step in 0..2_000 {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let tag = &tags[(seed >> 33) as usize % tags.len()];
        let collapsed = step % 3 != 0;

        active = toggle_style(&registry, &active, tag, collapsed).next;
        assert_exclusive(&registry, &active);
    }
}

#[test]
fn test_toggle_off_is_idempotent_pair() {
    let vocabulary = StyleVocabulary::default();
    let registry = StyleRegistry::new(vocabulary.clone(), &EnabledFamilies::all()).unwrap();

    let start = InlineStyle::new()
        .with(font_size_tag(14))
        .with(color_tag("#61a951"))
        .with(BOLD);

    // A tag already active: toggling twice returns to the start
    for tag in start.iter().cloned().collect::<Vec<_>>() {
        let off = toggle_style(&registry, &start, &tag, false);
        assert!(!off.next.contains(&tag));
        let on = toggle_style(&registry, &off.next, &tag, false);
        assert_eq!(on.next, start);
    }
}
