// File: src/registry.rs
//! Stable ordinal slots for tag paths and all of their ancestors.
//!
//! Slots are handed out once and never change afterwards, which is what keeps
//! a tag's color stable across sessions. The registry only ever grows.
use crate::model::TagPath;
use crate::model::tag::{depth_of, parent_of};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Slot used for paths that were never registered.
pub const DEFAULT_SLOT: u32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, u32>", into = "BTreeMap<String, u32>")]
pub struct TagRegistry {
    slots: BTreeMap<String, u32>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a registry from persisted slots. Zero slots and keys that are
    /// not normalized tag paths are dropped since [`TagRegistry::ensure`]
    /// never produces them.
    pub fn from_slots(slots: BTreeMap<String, u32>) -> Self {
        let slots = slots
            .into_iter()
            .filter(|(path, slot)| {
                *slot > 0 && TagPath::parse(path).is_some_and(|tag| tag.as_str() == path)
            })
            .collect();
        Self { slots }
    }

    pub fn slots(&self) -> &BTreeMap<String, u32> {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<u32> {
        self.slots.get(path).copied()
    }

    /// Lookup that never fails: unknown paths resolve to [`DEFAULT_SLOT`].
    pub fn slot_or_default(&self, path: &str) -> u32 {
        self.get(path).unwrap_or(DEFAULT_SLOT)
    }

    /// Registers every tag and every ancestor prefix that has no slot yet.
    ///
    /// Tags are processed in ascending order and prefixes shallowest first, so
    /// the outcome depends only on the set of tags and the existing slots.
    /// Returns `true` when at least one slot was added.
    pub fn ensure<'a, I>(&mut self, tags: I) -> bool
    where
        I: IntoIterator<Item = &'a TagPath>,
    {
        let ordered: BTreeSet<&TagPath> = tags.into_iter().collect();
        let mut added = 0usize;

        for tag in ordered {
            for prefix in tag.prefixes() {
                if self.slots.contains_key(prefix) {
                    continue;
                }
                let slot = self.next_sibling_slot(prefix);
                self.slots.insert(prefix.to_string(), slot);
                added += 1;
            }
        }

        if added > 0 {
            tracing::debug!(added, total = self.slots.len(), "registered new tag slots");
        }
        added > 0
    }

    /// One past the highest slot among registered siblings of `path`.
    ///
    /// Full scan over the registry; quadratic across a batch, which is fine at
    /// a few thousand tags.
    fn next_sibling_slot(&self, path: &str) -> u32 {
        let depth = depth_of(path);
        let parent = parent_of(path);
        self.slots
            .iter()
            .filter(|(known, _)| depth_of(known) == depth && parent_of(known) == parent)
            .map(|(_, slot)| *slot)
            .max()
            .unwrap_or(0)
            .saturating_add(1)
    }
}

impl From<BTreeMap<String, u32>> for TagRegistry {
    fn from(slots: BTreeMap<String, u32>) -> Self {
        Self::from_slots(slots)
    }
}

impl From<TagRegistry> for BTreeMap<String, u32> {
    fn from(registry: TagRegistry) -> Self {
        registry.slots
    }
}
