//! Sinew Physics
//!
//! Keeps the compound collision shape of an animated, kinematic rigid body in
//! step with its evaluated pose.
//!
//! - [`CompoundShape`]: what a physics backend exposes
//! - [`CollisionBoneMapping`]: bone index → child slot
//! - [`CollisionShapeSynchronizer`]: writes a pose into the shape
//! - [`CompoundCollider`]: reference backend

pub mod collider;
pub mod mapping;
pub mod shape;
pub mod sync;

pub use collider::{Aabb, BonePiece, CompoundCollider, center_offset_correction};
pub use mapping::CollisionBoneMapping;
pub use shape::CompoundShape;
pub use sync::CollisionShapeSynchronizer;
