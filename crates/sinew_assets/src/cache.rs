//! Animation Asset Cache
//!
//! Explicit owner of every shared animation asset: clips by name and bone
//! hierarchies by model id. Construction and teardown order are under the
//! caller's control; there is no global cache.

use std::sync::Arc;

use sinew_animation::{AnimationClip, BoneHierarchy};
use sinew_core::{Result, SinewError};
use slotmap::new_key_type;

use crate::storage::AssetStorage;

new_key_type! {
    pub struct ClipHandle;
    pub struct HierarchyHandle;
}

#[derive(Default)]
pub struct AnimationAssets {
    clips: AssetStorage<ClipHandle, AnimationClip>,
    hierarchies: AssetStorage<HierarchyHandle, BoneHierarchy>,
}

impl AnimationAssets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Caches a clip under its own name.
    pub fn insert_clip(&self, clip: AnimationClip) -> ClipHandle {
        let name = clip.name().to_string();
        self.clips.add_named(&name, clip)
    }

    /// Shared, read-only clip by name.
    #[must_use]
    pub fn load_animation_clip(&self, name: &str) -> Option<Arc<AnimationClip>> {
        self.clips.get_by_name(name)
    }

    pub fn require_clip(&self, name: &str) -> Result<Arc<AnimationClip>> {
        self.load_animation_clip(name)
            .ok_or_else(|| SinewError::AssetNotFound(format!("animation clip '{name}'")))
    }

    #[must_use]
    pub fn clip_names(&self) -> Vec<String> {
        self.clips.names()
    }

    pub fn insert_hierarchy(&self, model_id: &str, hierarchy: BoneHierarchy) -> HierarchyHandle {
        self.hierarchies.add_named(model_id, hierarchy)
    }

    #[must_use]
    pub fn bone_hierarchy(&self, model_id: &str) -> Option<Arc<BoneHierarchy>> {
        self.hierarchies.get_by_name(model_id)
    }

    pub fn require_hierarchy(&self, model_id: &str) -> Result<Arc<BoneHierarchy>> {
        self.bone_hierarchy(model_id)
            .ok_or_else(|| SinewError::AssetNotFound(format!("bone hierarchy '{model_id}'")))
    }

    #[must_use]
    pub fn clips(&self) -> &AssetStorage<ClipHandle, AnimationClip> {
        &self.clips
    }

    #[must_use]
    pub fn hierarchies(&self) -> &AssetStorage<HierarchyHandle, BoneHierarchy> {
        &self.hierarchies
    }

    /// Releases clips first, then hierarchies. Instances still holding an
    /// `Arc` keep their assets alive.
    pub fn clear(&self) {
        log::debug!(
            "Releasing {} clips and {} hierarchies",
            self.clips.len(),
            self.hierarchies.len()
        );
        self.clips.clear();
        self.hierarchies.clear();
    }
}
