//! # Sinew
//!
//! Keyframed skeletal animation for real-time 3D, with the collision shape of
//! every animated body kept in step with its pose.
//!
//! ```text
//! AnimationClock::advance
//!     → SkeletonPoseEvaluator::evaluate(hierarchy, clip, time)
//!         → Pose ─┬─→ renderer (skinning)
//!                 └─→ CollisionShapeSynchronizer::sync(compound shape)
//!                         → physics world step
//! ```
//!
//! # Crate Organization
//!
//! | Crate | Purpose |
//! |-------|---------|
//! | [`sinew_core`] | Errors, playback settings, capacity constants |
//! | [`sinew_animation`] | Keyframe tracks, clips, hierarchies, pose evaluation, clock |
//! | [`sinew_physics`] | Compound shape interface and pose → shape synchronization |
//! | [`sinew_assets`] | Shared clip and hierarchy cache |
//!
//! This crate ties them together per animated object ([`AnimatedInstance`])
//! and per world ([`AnimationSystem`]).

pub mod instance;
pub mod state;
pub mod system;

pub use instance::{AnimatedInstance, CollisionBinding};
pub use state::AnimationState;
pub use system::{AnimationSystem, InstanceKey, PhysicsStep};

pub use sinew_animation::{
    AnimationClip, AnimationClock, AnimationSequence, BoneChannels, BoneHierarchy,
    BoneHierarchyBuilder, BoneNode, BoneTransform, KeyframeTrack, PlaybackState, Pose,
    SkeletonPoseEvaluator,
};
pub use sinew_assets::AnimationAssets;
pub use sinew_core::{LoopMode, MAX_BONES, PlaybackSettings, Result, SinewError};
pub use sinew_physics::{
    Aabb, BonePiece, CollisionBoneMapping, CollisionShapeSynchronizer, CompoundCollider,
    CompoundShape,
};

pub mod prelude {
    pub use crate::{
        AnimatedInstance, AnimationAssets, AnimationClip, AnimationState, AnimationSystem,
        BoneHierarchy, CollisionBinding, CompoundCollider, CompoundShape, LoopMode,
        PhysicsStep, PlaybackSettings, Pose,
    };
}
