//! Entities: typed payloads attached to character ranges (links, media)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityKey(pub u32);

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityType {
    Link,
    Image,
    Video,
    Audio,
    Custom(String),
}

impl EntityType {
    pub fn as_str(&self) -> &str {
        match self {
            EntityType::Link => "LINK",
            EntityType::Image => "IMAGE",
            EntityType::Video => "VIDEO",
            EntityType::Audio => "AUDIO",
            EntityType::Custom(name) => name,
        }
    }

    pub fn is_media(&self) -> bool {
        matches!(self, EntityType::Image | EntityType::Video | EntityType::Audio)
    }
}

impl From<String> for EntityType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "LINK" => EntityType::Link,
            "IMAGE" => EntityType::Image,
            "VIDEO" => EntityType::Video,
            "AUDIO" => EntityType::Audio,
            _ => EntityType::Custom(name),
        }
    }
}

impl From<EntityType> for String {
    fn from(kind: EntityType) -> Self {
        kind.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mutability {
    #[default]
    Mutable,
    Immutable,
    Segmented,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub kind: EntityType,
    pub mutability: Mutability,
    pub data: Map<String, Value>,
}

impl Entity {
    pub fn new(kind: EntityType, mutability: Mutability) -> Self {
        Self {
            kind,
            mutability,
            data: Map::new(),
        }
    }

    /// Link entity with an optional target
    pub fn link(href: &str, target: Option<&str>) -> Self {
        let mut entity = Self::new(EntityType::Link, Mutability::Mutable).with_data("href", href);
        if let Some(target) = target {
            entity = entity.with_data("target", target);
        }
        entity
    }

    /// Media entity (image, video, audio) pointing at `url`
    pub fn media(kind: EntityType, url: &str) -> Self {
        Self::new(kind, Mutability::Immutable).with_data("url", url)
    }

    pub fn with_data(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}

/// Entity storage owned by a document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityMap {
    entries: BTreeMap<EntityKey, Entity>,
}

impl EntityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity and return its new key
    pub fn add(&mut self, entity: Entity) -> EntityKey {
        let key = self
            .entries
            .keys()
            .next_back()
            .map(|k| EntityKey(k.0 + 1))
            .unwrap_or(EntityKey(0));
        self.entries.insert(key, entity);
        key
    }

    pub fn insert(&mut self, key: EntityKey, entity: Entity) {
        self.entries.insert(key, entity);
    }

    pub fn get(&self, key: EntityKey) -> Option<&Entity> {
        self.entries.get(&key)
    }

    pub fn contains(&self, key: EntityKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityKey, &Entity)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_assigns_sequential_keys() {
        let mut map = EntityMap::new();
        let a = map.add(Entity::link("https://a.example", None));
        let b = map.add(Entity::media(EntityType::Image, "a.png"));
        assert_eq!(a, EntityKey(0));
        assert_eq!(b, EntityKey(1));
        assert_eq!(map.get(b).and_then(|e| e.data_str("url")), Some("a.png"));
    }

    #[test]
    fn test_entity_type_names() {
        assert_eq!(EntityType::from("LINK".to_string()), EntityType::Link);
        assert_eq!(
            EntityType::from("MENTION".to_string()),
            EntityType::Custom("MENTION".to_string())
        );
        assert_eq!(String::from(EntityType::Video), "VIDEO");
    }
}
