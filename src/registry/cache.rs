//! Run-scoped lookup cache
//!
//! Containers often share an image, so each `{repository}:{tag}` is fetched
//! at most once per run. Entries are write-once and never evicted; the cache
//! is dropped with the run.

use crate::registry::info::ImageInfo;
use std::collections::HashMap;
use tracing::debug;

/// In-memory map of lookup key to registry info
#[derive(Debug, Default)]
pub struct RunCache {
    entries: HashMap<String, ImageInfo>,
}

impl RunCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached info for `key`, if any
    pub fn get(&self, key: &str) -> Option<&ImageInfo> {
        let hit = self.entries.get(key);
        if hit.is_some() {
            debug!("Cache hit: {}", key);
        }
        hit
    }

    /// Store info under `key`. The first write wins.
    pub fn insert(&mut self, key: String, info: ImageInfo) -> &ImageInfo {
        self.entries.entry(key).or_insert(info)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
