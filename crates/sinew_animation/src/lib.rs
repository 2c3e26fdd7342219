//! Sinew Animation
//!
//! Keyframe sampling and skeletal pose evaluation.
//!
//! Per tick, an instance advances its [`AnimationClock`], hands the clock's
//! time to a [`SkeletonPoseEvaluator`] together with its [`BoneHierarchy`]
//! and the shared [`AnimationClip`], and receives a [`Pose`] of global bone
//! matrices ready for skinning and collision sync.

pub mod clip;
pub mod clock;
pub mod pose;
pub mod sequence;
pub mod skeleton;
pub mod tracks;
pub mod transform;
pub mod values;

pub use clip::{AnimationClip, BoneChannels, ChannelCursors};
pub use clock::{AnimationClock, ClipTiming, PlaybackState};
pub use pose::{Pose, SkeletonPoseEvaluator, evaluate_pose};
pub use sequence::{AnimationSequence, SequenceSection};
pub use skeleton::{BoneHierarchy, BoneHierarchyBuilder, BoneNode};
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
pub use transform::BoneTransform;
pub use values::Interpolatable;

pub use sinew_core::{LoopMode, MAX_BONES};
