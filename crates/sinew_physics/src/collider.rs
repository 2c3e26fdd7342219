//! Reference Compound Collider
//!
//! A CPU-side compound shape that reproduces the behaviour Sinew expects from
//! a physics backend: children with local transforms, scale-sensitive local
//! scaling, and a cached bounding box that is only refreshed on request.
//! Backends wrap their own compound type behind [`CompoundShape`]; this one
//! also serves tools and tests that run without a physics engine.

use glam::{Mat4, Vec3};
use sinew_core::Result;

use crate::mapping::CollisionBoneMapping;
use crate::shape::CompoundShape;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const ZERO: Self = Self {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
    };

    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    #[must_use]
    pub fn from_half_extents(half_extents: Vec3) -> Self {
        Self::new(-half_extents, half_extents)
    }

    #[must_use]
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[must_use]
    pub fn scaled(&self, scaling: Vec3) -> Aabb {
        Aabb::new(self.min * scaling, self.max * scaling)
    }

    /// Bounds of the eight transformed corners.
    #[must_use]
    pub fn transformed(&self, matrix: &Mat4) -> Aabb {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            let p = matrix.transform_point3(corner);
            min = min.min(p);
            max = max.max(p);
        }
        Aabb { min, max }
    }

    #[must_use]
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// The transform that moves model-space geometry into the rigid body's frame
/// when the model's visual origin and physics origin differ by
/// `center_offset`.
#[must_use]
pub fn center_offset_correction(center_offset: Vec3) -> Mat4 {
    Mat4::from_translation(-center_offset)
}

/// A convex collision piece attached to a bone.
#[derive(Debug, Clone, Copy)]
pub struct BonePiece {
    pub bone: usize,
    /// Piece transform in model space, before center-offset correction.
    pub transform: Mat4,
    /// Bounds of the piece's hull in its own space.
    pub bounds: Aabb,
}

#[derive(Debug, Clone, Copy)]
struct ChildShape {
    transform: Mat4,
    bounds: Aabb,
}

#[derive(Debug, Clone)]
pub struct CompoundCollider {
    children: Vec<ChildShape>,
    scaling: Vec3,
    local_aabb: Aabb,
    aabb_generation: u64,
    aabb_stale: bool,
}

impl CompoundCollider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            scaling: Vec3::ONE,
            local_aabb: Aabb::ZERO,
            aabb_generation: 0,
            aabb_stale: false,
        }
    }

    /// Builds the compound shape of an animated model.
    ///
    /// Static pieces sit at `translation(-center_offset)`. Bone pieces follow
    /// in ascending bone index, each at its corrected transform, and the
    /// returned mapping records which slot every bone landed in.
    pub fn from_pieces(
        center_offset: Vec3,
        static_pieces: &[Aabb],
        bone_pieces: &[BonePiece],
    ) -> Result<(Self, CollisionBoneMapping)> {
        let correction = center_offset_correction(center_offset);
        let mut collider = Self::new();

        for bounds in static_pieces {
            collider.add_child(correction, *bounds);
        }

        let mut ordered: Vec<&BonePiece> = bone_pieces.iter().collect();
        ordered.sort_by_key(|piece| piece.bone);

        let mut pairs = Vec::with_capacity(ordered.len());
        for piece in ordered {
            let slot = collider.add_child(correction * piece.transform, piece.bounds);
            pairs.push((piece.bone, slot));
        }

        let mapping = CollisionBoneMapping::new(pairs)?;
        Ok((collider, mapping))
    }

    /// Appends a child and refreshes the bounds. Returns its slot.
    pub fn add_child(&mut self, transform: Mat4, bounds: Aabb) -> usize {
        self.children.push(ChildShape { transform, bounds });
        self.recalculate_local_aabb();
        self.children.len() - 1
    }

    #[must_use]
    pub fn local_aabb(&self) -> Aabb {
        self.local_aabb
    }

    /// Incremented by every bounds recalculation.
    #[must_use]
    pub fn aabb_generation(&self) -> u64 {
        self.aabb_generation
    }

    /// True when a child moved since the bounds were last recomputed.
    #[must_use]
    pub fn is_aabb_stale(&self) -> bool {
        self.aabb_stale
    }

    fn compute_aabb(&self) -> Aabb {
        self.children
            .iter()
            .map(|child| child.bounds.scaled(self.scaling).transformed(&child.transform))
            .reduce(|a, b| a.union(&b))
            .unwrap_or(Aabb::ZERO)
    }
}

impl Default for CompoundCollider {
    fn default() -> Self {
        Self::new()
    }
}

impl CompoundShape for CompoundCollider {
    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child_transform(&self, slot: usize) -> Option<Mat4> {
        self.children.get(slot).map(|c| c.transform)
    }

    fn set_child_transform(&mut self, slot: usize, transform: Mat4) {
        let Some(child) = self.children.get_mut(slot) else {
            log::warn!("Compound shape has no child slot {slot}");
            return;
        };
        child.transform = transform;
        self.aabb_stale = true;
    }

    fn local_scaling(&self) -> Vec3 {
        self.scaling
    }

    /// Child origins are rescaled by `new / old`, so each change of scaling
    /// moves the children relative to their current positions.
    fn set_local_scaling(&mut self, scaling: Vec3) {
        let ratio = Vec3::select(
            self.scaling.cmpeq(Vec3::ZERO),
            Vec3::ONE,
            scaling / self.scaling,
        );
        for child in &mut self.children {
            let origin = child.transform.w_axis.truncate() * ratio;
            child.transform.w_axis = origin.extend(1.0);
        }
        self.scaling = scaling;
        self.recalculate_local_aabb();
    }

    fn recalculate_local_aabb(&mut self) {
        self.local_aabb = self.compute_aabb();
        self.aabb_generation += 1;
        self.aabb_stale = false;
    }
}
