use glam::{Mat4, Vec3};
use sinew_animation::Pose;

use crate::collider::center_offset_correction;
use crate::mapping::CollisionBoneMapping;
use crate::shape::CompoundShape;

/// Pushes evaluated bone matrices into a kinematic body's compound shape.
///
/// Must run to completion before the physics world's next step. It mutates
/// the shape in place and is not safe to interleave with a step running on
/// another thread.
#[derive(Debug, Clone, Copy)]
pub struct CollisionShapeSynchronizer {
    center_offset: Vec3,
    correction: Mat4,
}

impl CollisionShapeSynchronizer {
    /// `center_offset` must be the offset the compound shape was built with,
    /// otherwise the collision pieces drift away from the rendered mesh.
    #[must_use]
    pub fn new(center_offset: Vec3) -> Self {
        Self {
            center_offset,
            correction: center_offset_correction(center_offset),
        }
    }

    #[must_use]
    pub fn center_offset(&self) -> Vec3 {
        self.center_offset
    }

    /// The transform applied on top of each bone's pose matrix.
    #[must_use]
    pub fn correction(&self) -> Mat4 {
        self.correction
    }

    /// The child transform a mapped bone should end up with.
    #[must_use]
    pub fn child_transform_for(&self, pose: &Pose, bone: usize) -> Option<Mat4> {
        pose.get(bone).map(|global| self.correction * *global)
    }

    /// Writes `correction * pose[bone]` into every mapped slot, then refreshes
    /// the shape's bounds.
    ///
    /// The shape's local scaling is cleared to unit while the children are
    /// written and restored afterwards; child transforms are written in
    /// unscaled space and the backend applies the scaling on restore.
    pub fn sync<S: CompoundShape + ?Sized>(
        &self,
        pose: &Pose,
        mapping: &CollisionBoneMapping,
        shape: &mut S,
    ) {
        let saved_scaling = shape.local_scaling();
        shape.set_local_scaling(Vec3::ONE);

        let mut missing = 0usize;
        for (bone, slot) in mapping.iter() {
            match self.child_transform_for(pose, bone) {
                Some(transform) => shape.set_child_transform(slot, transform),
                None => missing += 1,
            }
        }
        if missing > 0 {
            log::warn!(
                "{missing} mapped bones are missing from the pose ({} bones), their collision pieces keep the previous transform",
                pose.bone_count()
            );
        }

        shape.set_local_scaling(saved_scaling);
        shape.recalculate_local_aabb();
    }
}
