use glam::{Mat4, Vec3};

/// Mutable handle to a physics backend's compound collision shape.
///
/// This is the surface a backend exposes to Sinew. The calls are the raw,
/// stateful primitives of a typical engine: in particular
/// [`set_child_transform`](Self::set_child_transform) is interpreted under
/// whatever local scaling is current, so writing child transforms while a
/// non-unit scaling is set compounds that scaling. Callers should go through
/// [`CollisionShapeSynchronizer`](crate::CollisionShapeSynchronizer), which
/// handles this.
pub trait CompoundShape {
    /// Number of child shapes.
    fn child_count(&self) -> usize;

    /// Local transform of a child, or `None` for an unknown slot.
    fn child_transform(&self, slot: usize) -> Option<Mat4>;

    /// Replaces a child's local transform without refreshing bounds.
    fn set_child_transform(&mut self, slot: usize, transform: Mat4);

    fn local_scaling(&self) -> Vec3;

    fn set_local_scaling(&mut self, scaling: Vec3);

    /// Recomputes the cached local bounding box from the children.
    fn recalculate_local_aabb(&mut self);
}
