use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a block, unique within its page
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate an id that `taken` reports as unused.
    pub fn fresh(taken: impl Fn(&BlockId) -> bool) -> Self {
        loop {
            let candidate = BlockId(format!("blk-{}", short_uuid()));
            if !taken(&candidate) {
                return candidate;
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier of a page in the page collection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Id for a nested item (mcq option, process step, card, hotspot)
pub fn item_id(prefix: &str) -> String {
    format!("{}-{}", prefix, short_uuid())
}

fn short_uuid() -> String {
    let mut s = Uuid::new_v4().simple().to_string();
    s.truncate(12);
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_fresh_skips_taken_ids() {
        let mut taken = HashSet::new();
        for _ in 0..50 {
            let id = BlockId::fresh(|c| taken.contains(c));
            assert!(id.as_str().starts_with("blk-"));
            assert!(taken.insert(id));
        }
    }

    #[test]
    fn test_item_id_prefix() {
        assert!(item_id("opt").starts_with("opt-"));
        assert_ne!(item_id("opt"), item_id("opt"));
    }
}
