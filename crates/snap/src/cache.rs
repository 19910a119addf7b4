//! Session-scoped BVH cache

use std::borrow::Cow;
use std::collections::HashMap;

use shared::ObjectId;

use crate::bvh::{BvhKind, BvhTree};

/// Trees built for one object
#[derive(Debug, Default)]
pub struct SnapObjectData {
    bvh_trees: [Option<BvhTree>; 2],
}

impl SnapObjectData {
    pub fn tree(&self, kind: BvhKind) -> Option<&BvhTree> {
        self.bvh_trees[slot(kind)].as_ref()
    }
}

fn slot(kind: BvhKind) -> usize {
    match kind {
        BvhKind::Verts => 0,
        BvhKind::LoopTris => 1,
    }
}

/// Acceleration trees for the lifetime of a snapping session.
///
/// With caching enabled a tree is built the first time an (object, kind) pair
/// is snapped and then reused until the cache is dropped, even if the object's
/// geometry changes in between. Without caching every request builds a fresh
/// tree that is dropped after the object has been snapped.
#[derive(Debug)]
pub struct SnapCache {
    enabled: bool,
    objects: HashMap<ObjectId, SnapObjectData>,
    build_count: u64,
}

impl Default for SnapCache {
    fn default() -> Self {
        Self::new(true)
    }
}

impl SnapCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            objects: HashMap::new(),
            build_count: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Tree of `kind` for `object`, building it with `build` when missing
    pub fn tree(
        &mut self,
        object: &ObjectId,
        kind: BvhKind,
        build: impl FnOnce() -> BvhTree,
    ) -> Cow<'_, BvhTree> {
        if !self.enabled {
            self.build_count += 1;
            tracing::trace!(object = %object, ?kind, "building uncached tree");
            return Cow::Owned(build());
        }

        let data = self.objects.entry(object.clone()).or_default();
        let tree = data.bvh_trees[slot(kind)].get_or_insert_with(|| {
            self.build_count += 1;
            tracing::trace!(object = %object, ?kind, "building cached tree");
            build()
        });
        Cow::Borrowed(tree)
    }

    pub fn object(&self, object: &str) -> Option<&SnapObjectData> {
        self.objects.get(object)
    }

    /// Number of trees built so far
    pub fn build_count(&self) -> u64 {
        self.build_count
    }

    /// Number of objects with cached data
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
