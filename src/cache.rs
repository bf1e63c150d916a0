// File: src/cache.rs
use crate::model::{ResolvedColor, TagPath, Theme};
use std::collections::HashMap;

/// Resolved colors per (tag, theme). Only valid for one registry and palette
/// state; the engine clears it whenever either changes.
#[derive(Debug, Default)]
pub struct ColorCache {
    entries: HashMap<(TagPath, Theme), ResolvedColor>,
}

impl ColorCache {
    pub fn get(&self, tag: &TagPath, theme: Theme) -> Option<&ResolvedColor> {
        // HashMap<(K1, K2)> cannot be queried by reference pair, so clone the key
        self.entries.get(&(tag.clone(), theme))
    }

    pub fn insert(&mut self, tag: TagPath, theme: Theme, color: ResolvedColor) {
        self.entries.insert((tag, theme), color);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Background hex -> foreground hex. The derivation depends on the background
/// alone, so entries never go stale.
#[derive(Debug, Default)]
pub struct ForegroundMemo {
    entries: HashMap<String, String>,
}

impl ForegroundMemo {
    pub fn get_or_insert_with<F>(&mut self, background: &str, derive: F) -> String
    where
        F: FnOnce() -> String,
    {
        if let Some(hit) = self.entries.get(background) {
            return hit.clone();
        }
        let value = derive();
        self.entries.insert(background.to_string(), value.clone());
        value
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
