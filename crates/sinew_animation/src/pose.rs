//! Pose Evaluation
//!
//! Combines a [`BoneHierarchy`] with an [`AnimationClip`] sampled at one time
//! value into a flat array of global (model-space) bone matrices.
//!
//! For every bone, in parent-before-child order:
//!
//! ```text
//! local  = clip animates bone ? sampled TRS : bind_local
//! global = global(parent) * local          (root: identity * local)
//! ```
//!
//! The output [`Pose`] has room for [`MAX_BONES`] bones. Bones past that limit
//! are dropped with a warning; since parents always precede children, every
//! kept bone's parent is kept as well.

use std::ops::Index;
use std::sync::Arc;

use glam::Mat4;
use sinew_core::MAX_BONES;
use uuid::Uuid;

use crate::clip::{AnimationClip, ChannelCursors};
use crate::skeleton::{BoneHierarchy, BoneNode};

/// Fixed-capacity buffer of global bone matrices, one slot per bone index.
///
/// Only the first [`bone_count`](Self::bone_count) slots are meaningful;
/// the rest hold whatever an earlier evaluation left there.
#[derive(Clone)]
pub struct Pose {
    matrices: Box<[Mat4; MAX_BONES]>,
    bone_count: usize,
    dropped: usize,
}

impl Pose {
    #[must_use]
    pub fn new() -> Self {
        Self {
            matrices: Box::new([Mat4::IDENTITY; MAX_BONES]),
            bone_count: 0,
            dropped: 0,
        }
    }

    /// The hierarchy at rest: every bone at its bind-local transform.
    #[must_use]
    pub fn bind_pose(hierarchy: &BoneHierarchy) -> Self {
        let mut pose = Self::new();
        pose.compose(hierarchy, |_, _| None);
        pose
    }

    /// Number of populated slots.
    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bone_count
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bone_count == 0
    }

    /// Bones the last evaluation could not fit.
    #[inline]
    #[must_use]
    pub fn dropped_bones(&self) -> usize {
        self.dropped
    }

    #[inline]
    #[must_use]
    pub fn get(&self, bone: usize) -> Option<&Mat4> {
        self.matrices().get(bone)
    }

    /// The populated slots.
    #[inline]
    #[must_use]
    pub fn matrices(&self) -> &[Mat4] {
        &self.matrices[..self.bone_count]
    }

    /// The whole fixed-size buffer, as bound to a skinning shader's joint
    /// array. Slots at or past `bone_count` are unspecified.
    #[inline]
    #[must_use]
    pub fn buffer(&self) -> &[Mat4; MAX_BONES] {
        &self.matrices
    }

    /// Populated slots as raw bytes for a GPU upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.matrices())
    }

    /// `global * inverse_bind` for one bone: the matrix a vertex shader
    /// applies to mesh-space vertices weighted to that bone.
    #[must_use]
    pub fn skinning_matrix(&self, hierarchy: &BoneHierarchy, bone: usize) -> Option<Mat4> {
        let global = self.get(bone)?;
        let node = hierarchy.bone(bone)?;
        Some(*global * node.inverse_bind)
    }

    pub fn skinning_matrices<'a>(
        &'a self,
        hierarchy: &'a BoneHierarchy,
    ) -> impl Iterator<Item = Mat4> + 'a {
        self.matrices()
            .iter()
            .zip(hierarchy.bones())
            .map(|(global, node)| *global * node.inverse_bind)
    }

    fn compose(
        &mut self,
        hierarchy: &BoneHierarchy,
        mut animated_local: impl FnMut(usize, &BoneNode) -> Option<Mat4>,
    ) {
        let count = hierarchy.len().min(MAX_BONES);

        for (index, bone) in hierarchy.bones().iter().enumerate().take(count) {
            let local = animated_local(index, bone).unwrap_or(bone.bind_local);
            self.matrices[index] = match bone.parent {
                Some(parent) => self.matrices[parent] * local,
                None => local,
            };
        }

        self.bone_count = count;
        self.dropped = hierarchy.len() - count;
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Pose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pose")
            .field("bone_count", &self.bone_count)
            .field("dropped", &self.dropped)
            .finish_non_exhaustive()
    }
}

impl Index<usize> for Pose {
    type Output = Mat4;

    fn index(&self, bone: usize) -> &Mat4 {
        &self.matrices()[bone]
    }
}

/// Stateless evaluation by bone name.
///
/// Each call looks every bone up in the clip's name table. Instances that
/// evaluate every frame should keep a [`SkeletonPoseEvaluator`] instead.
#[must_use]
pub fn evaluate_pose(hierarchy: &BoneHierarchy, clip: &AnimationClip, time: f32) -> Pose {
    let mut pose = Pose::new();
    pose.compose(hierarchy, |_, bone| clip.evaluate_local(&bone.name, time));
    if pose.dropped > 0 {
        log::warn!(
            "Hierarchy has {} bones, only the first {MAX_BONES} are evaluated",
            hierarchy.len()
        );
    }
    pose
}

/// Bone → channel resolution for one (hierarchy, clip) pair.
struct ClipBinding {
    hierarchy: Uuid,
    clip: Arc<AnimationClip>,
    channels: Vec<Option<usize>>,
    cursors: Vec<ChannelCursors>,
}

impl ClipBinding {
    fn new(hierarchy: &BoneHierarchy, clip: &Arc<AnimationClip>) -> Self {
        let channels: Vec<Option<usize>> = hierarchy
            .bones()
            .iter()
            .take(MAX_BONES)
            .map(|bone| clip.channel_index(&bone.name))
            .collect();

        let bound = channels.iter().flatten().count();
        log::debug!(
            "Bound clip '{}' to hierarchy {}: {bound}/{} bones animated",
            clip.name(),
            hierarchy.id(),
            channels.len()
        );
        if hierarchy.len() > MAX_BONES {
            log::warn!(
                "Hierarchy {} has {} bones, bones past {MAX_BONES} are dropped",
                hierarchy.id(),
                hierarchy.len()
            );
        }

        Self {
            hierarchy: hierarchy.id(),
            clip: Arc::clone(clip),
            channels,
            cursors: vec![ChannelCursors::default(); clip.channels().len()],
        }
    }

    fn matches(&self, hierarchy: &BoneHierarchy, clip: &Arc<AnimationClip>) -> bool {
        self.hierarchy == hierarchy.id() && Arc::ptr_eq(&self.clip, clip)
    }
}

/// Per-instance pose evaluator.
///
/// Caches which clip channel drives each bone and a keyframe cursor per
/// channel, so steady playback resolves no names and scans no key arrays.
/// The cache is rebuilt whenever a different hierarchy or clip comes in.
/// Output is bit-identical to [`evaluate_pose`].
#[derive(Default)]
pub struct SkeletonPoseEvaluator {
    binding: Option<ClipBinding>,
}

impl SkeletonPoseEvaluator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites `pose` with `clip` sampled at `time` ticks.
    pub fn evaluate(
        &mut self,
        hierarchy: &BoneHierarchy,
        clip: &Arc<AnimationClip>,
        time: f32,
        pose: &mut Pose,
    ) {
        if !self
            .binding
            .as_ref()
            .is_some_and(|b| b.matches(hierarchy, clip))
        {
            self.binding = Some(ClipBinding::new(hierarchy, clip));
        }
        let Some(binding) = self.binding.as_mut() else {
            return;
        };

        let channels = clip.channels();
        pose.compose(hierarchy, |index, _| {
            let channel = binding.channels[index]?;
            let transform =
                channels[channel].sample_with_cursors(time, &mut binding.cursors[channel]);
            Some(transform.to_mat4())
        });
    }
}
