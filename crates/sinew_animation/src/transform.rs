use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Translation / rotation / scale triple of a bone (or of any animated
/// object) in its parent's space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoneTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl BoneTransform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    #[must_use]
    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Self::IDENTITY
        }
    }

    /// `translation * rotation * scale`
    #[inline]
    #[must_use]
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// The change that takes `original` to `self`, component-wise.
    ///
    /// Zero components of `original.scale` produce a unit scale delta on
    /// that axis.
    #[must_use]
    pub fn relative_to(&self, original: &BoneTransform) -> BoneTransform {
        let safe_div = |a: f32, b: f32| if b == 0.0 { 1.0 } else { a / b };
        BoneTransform {
            translation: self.translation - original.translation,
            rotation: (self.rotation * original.rotation.inverse()).normalize(),
            scale: Vec3::new(
                safe_div(self.scale.x, original.scale.x),
                safe_div(self.scale.y, original.scale.y),
                safe_div(self.scale.z, original.scale.z),
            ),
        }
    }
}

impl Default for BoneTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<BoneTransform> for Mat4 {
    fn from(transform: BoneTransform) -> Self {
        transform.to_mat4()
    }
}
