//! # Decorators
//!
//! Decorators derive presentation metadata from a document: which character
//! ranges a rendering layer should draw with a special component (links,
//! mentions, ...). They never change the document.
//!
//! Decorations are recomputed on every commit and on `force_render`.

use richtext_model::{BlockKey, Document, EntityKey, EntityType};
use std::fmt;
use std::ops::Range;

/// A character range rendered by a named component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    pub block: BlockKey,
    pub range: Range<usize>,
    pub component: String,
    pub entity: Option<EntityKey>,
}

pub trait Decorator: fmt::Debug {
    fn decorate(&self, document: &Document) -> Vec<Decoration>;
}

/// Decorates every range carrying an entity of one type
#[derive(Debug, Clone)]
pub struct EntityDecorator {
    kind: EntityType,
    component: String,
}

impl EntityDecorator {
    pub fn new(kind: EntityType, component: impl Into<String>) -> Self {
        Self {
            kind,
            component: component.into(),
        }
    }

    pub fn links() -> Self {
        Self::new(EntityType::Link, "link")
    }
}

impl Decorator for EntityDecorator {
    fn decorate(&self, document: &Document) -> Vec<Decoration> {
        document
            .blocks()
            .iter()
            .flat_map(|block| {
                block
                    .entity_ranges()
                    .into_iter()
                    .filter(|(_, key)| {
                        document
                            .entity(*key)
                            .map_or(false, |entity| entity.kind == self.kind)
                    })
                    .map(|(range, key)| Decoration {
                        block: block.key().clone(),
                        range,
                        component: self.component.clone(),
                        entity: Some(key),
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

/// Runs every registered decorator in order
#[derive(Debug, Default)]
pub struct CompositeDecorator {
    decorators: Vec<Box<dyn Decorator>>,
}

impl CompositeDecorator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Composite with the built-in link decorator
    pub fn with_defaults() -> Self {
        Self::new().with(EntityDecorator::links())
    }

    pub fn with(mut self, decorator: impl Decorator + 'static) -> Self {
        self.decorators.push(Box::new(decorator));
        self
    }

    pub fn push(&mut self, decorator: Box<dyn Decorator>) {
        self.decorators.push(decorator);
    }

    pub fn len(&self) -> usize {
        self.decorators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorators.is_empty()
    }
}

impl Decorator for CompositeDecorator {
    fn decorate(&self, document: &Document) -> Vec<Decoration> {
        let mut decorations = Vec::new();
        for decorator in &self.decorators {
            decorations.append(&mut decorator.decorate(document));
        }
        decorations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use richtext_model::{Block, BlockType, CharacterMetadata, Entity, EntityMap};

    fn linked_document() -> Document {
        let mut entities = EntityMap::new();
        let link = entities.add(Entity::link("https://example.com", None));
        let image = entities.add(Entity::media(EntityType::Image, "a.png"));
        Document::from_blocks(
            vec![
                Block::new(BlockKey::from("a"), BlockType::Unstyled)
                    .with_text("see ", CharacterMetadata::default())
                    .with_text("here", CharacterMetadata::default().with_entity(Some(link))),
                Block::new(BlockKey::from("b"), BlockType::Atomic)
                    .with_text(" ", CharacterMetadata::default().with_entity(Some(image))),
            ],
            entities,
        )
    }

    #[test]
    fn test_link_decorator() {
        let decorations = EntityDecorator::links().decorate(&linked_document());

        assert_eq!(decorations.len(), 1);
        assert_eq!(decorations[0].block, BlockKey::from("a"));
        assert_eq!(decorations[0].range, 4..8);
        assert_eq!(decorations[0].component, "link");
    }

    #[test]
    fn test_composite_runs_all_decorators() {
        let composite = CompositeDecorator::with_defaults()
            .with(EntityDecorator::new(EntityType::Image, "image"));

        let decorations = composite.decorate(&linked_document());

        let components: Vec<&str> = decorations.iter().map(|d| d.component.as_str()).collect();
        assert_eq!(components, vec!["link", "image"]);
        assert_eq!(composite.len(), 2);
    }
}
