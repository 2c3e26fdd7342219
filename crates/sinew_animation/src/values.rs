use glam::{Quat, Vec3};

/// A value that keyframe tracks can blend between.
pub trait Interpolatable: Copy + Sized {
    /// Blends `start` toward `end` by `t` in `[0, 1]`.
    fn interpolate_linear(start: &Self, end: &Self, t: f32) -> Self;
}

impl Interpolatable for f32 {
    fn interpolate_linear(start: &Self, end: &Self, t: f32) -> Self {
        start + (end - start) * t
    }
}

impl Interpolatable for Vec3 {
    fn interpolate_linear(start: &Self, end: &Self, t: f32) -> Self {
        start.lerp(*end, t)
    }
}

impl Interpolatable for Quat {
    /// Spherical interpolation along the shorter arc.
    ///
    /// `q` and `-q` encode the same rotation; when the keys sit in opposite
    /// hemispheres the end key is negated so the blend never takes the long way
    /// round. The result is renormalized to keep it a unit quaternion.
    fn interpolate_linear(start: &Self, end: &Self, t: f32) -> Self {
        let end = if start.dot(*end) < 0.0 { -*end } else { *end };
        start.slerp(end, t).normalize()
    }
}
