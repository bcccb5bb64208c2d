use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique key of a block within a document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockKey(String);

impl BlockKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

/// Generate a short seed from a namespace using CRC32
pub fn get_seed(namespace: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(namespace.as_bytes());
    let hash = format!("{:08x}", hasher.finalize());
    hash[..4].to_string()
}

/// Sequential block key generator
///
/// Keys are `<seed><counter>` with the counter in base 36. Callers pass a
/// predicate for keys already in use so that documents loaded from the raw
/// format never end up with duplicates.
#[derive(Debug, Clone)]
pub struct KeyGenerator {
    seed: String,
    count: u32,
}

impl KeyGenerator {
    pub fn new(namespace: &str) -> Self {
        Self {
            seed: get_seed(namespace),
            count: 0,
        }
    }

    /// Generate the next key not rejected by `taken`
    pub fn next_key(&mut self, taken: impl Fn(&BlockKey) -> bool) -> BlockKey {
        loop {
            self.count += 1;
            let key = BlockKey(format!("{}{}", self.seed, to_base36(self.count)));
            if !taken(&key) {
                return key;
            }
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new("document")
    }
}

fn to_base36(mut value: u32) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut out = Vec::new();
    loop {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
        if value == 0 {
            break;
        }
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
