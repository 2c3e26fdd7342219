use rustc_hash::FxHashSet;
use sinew_core::{MAX_BONES, Result, SinewError};

use crate::shape::CompoundShape;

/// Which compound-shape child slot each collision-bearing bone drives.
///
/// Built once with the instance's rigid body and immutable afterwards. Bones
/// without a collision piece have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionBoneMapping {
    /// `(bone, slot)`, sorted by bone.
    entries: Vec<(usize, usize)>,
}

impl CollisionBoneMapping {
    pub fn new(pairs: impl IntoIterator<Item = (usize, usize)>) -> Result<Self> {
        let mut entries: Vec<(usize, usize)> = pairs.into_iter().collect();
        entries.sort_unstable_by_key(|&(bone, _)| bone);

        let mut slots = FxHashSet::default();
        for window in entries.windows(2) {
            if window[0].0 == window[1].0 {
                return Err(SinewError::InvalidMapping(format!(
                    "bone {} is mapped twice",
                    window[0].0
                )));
            }
        }
        for &(bone, slot) in &entries {
            if bone >= MAX_BONES {
                return Err(SinewError::InvalidMapping(format!(
                    "bone {bone} is beyond the {MAX_BONES}-bone capacity"
                )));
            }
            if !slots.insert(slot) {
                return Err(SinewError::InvalidMapping(format!(
                    "slot {slot} is driven by more than one bone"
                )));
            }
        }

        Ok(Self { entries })
    }

    /// Checks every slot exists in `shape`.
    pub fn validate_against(&self, shape: &impl CompoundShape) -> Result<()> {
        let count = shape.child_count();
        match self.entries.iter().find(|&&(_, slot)| slot >= count) {
            Some(&(bone, slot)) => Err(SinewError::InvalidMapping(format!(
                "bone {bone} maps to slot {slot}, shape has {count} children"
            ))),
            None => Ok(()),
        }
    }

    /// Checks every mapped bone is one the pose of a `bone_count`-bone
    /// hierarchy populates.
    pub fn validate_bones(&self, bone_count: usize) -> Result<()> {
        let populated = bone_count.min(MAX_BONES);
        match self.entries.iter().find(|&&(bone, _)| bone >= populated) {
            Some(&(bone, slot)) => Err(SinewError::InvalidMapping(format!(
                "bone {bone} (slot {slot}) is not among the {populated} posed bones"
            ))),
            None => Ok(()),
        }
    }

    #[must_use]
    pub fn slot_for(&self, bone: usize) -> Option<usize> {
        self.entries
            .binary_search_by_key(&bone, |&(b, _)| b)
            .ok()
            .map(|i| self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.entries.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
