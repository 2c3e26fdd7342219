//! Animated Instance
//!
//! One animated object: its clock, its pose buffer and, when it has a
//! kinematic rigid body, the compound shape kept in step with that pose.
//!
//! Per tick, strictly in this order:
//!
//! 1. [`AnimationClock::advance`]
//! 2. [`SkeletonPoseEvaluator::evaluate`]
//! 3. [`CollisionShapeSynchronizer::sync`]
//!
//! The physics step must come after all three; [`AnimationSystem`] enforces
//! that for a whole world.
//!
//! [`AnimationSystem`]: crate::AnimationSystem

use std::sync::Arc;

use glam::Vec3;
use sinew_animation::{AnimationClip, AnimationClock, BoneHierarchy, Pose, SkeletonPoseEvaluator};
use sinew_assets::AnimationAssets;
use sinew_core::{LoopMode, PlaybackSettings, Result};
use sinew_physics::{
    CollisionBoneMapping, CollisionShapeSynchronizer, CompoundCollider, CompoundShape,
};

use crate::state::AnimationState;

/// The compound shape of an instance's rigid body, with the bone → slot
/// mapping established when that body was built.
pub struct CollisionBinding<S: CompoundShape = CompoundCollider> {
    synchronizer: CollisionShapeSynchronizer,
    mapping: CollisionBoneMapping,
    shape: S,
}

impl<S: CompoundShape> CollisionBinding<S> {
    /// `center_offset` must be the offset the shape was built with.
    pub fn new(center_offset: Vec3, mapping: CollisionBoneMapping, shape: S) -> Result<Self> {
        mapping.validate_against(&shape)?;
        Ok(Self {
            synchronizer: CollisionShapeSynchronizer::new(center_offset),
            mapping,
            shape,
        })
    }

    #[must_use]
    pub fn synchronizer(&self) -> &CollisionShapeSynchronizer {
        &self.synchronizer
    }

    #[must_use]
    pub fn mapping(&self) -> &CollisionBoneMapping {
        &self.mapping
    }

    #[must_use]
    pub fn shape(&self) -> &S {
        &self.shape
    }

    /// Direct access for setting the body's scaling and similar backend
    /// calls made between ticks.
    pub fn shape_mut(&mut self) -> &mut S {
        &mut self.shape
    }

    fn sync(&mut self, pose: &Pose) {
        self.synchronizer.sync(pose, &self.mapping, &mut self.shape);
    }
}

pub struct AnimatedInstance<S: CompoundShape = CompoundCollider> {
    hierarchy: Arc<BoneHierarchy>,
    clip: Option<Arc<AnimationClip>>,
    clock: AnimationClock,
    evaluator: SkeletonPoseEvaluator,
    pose: Pose,
    collision: Option<CollisionBinding<S>>,
    last_setup_seconds: f32,
}

impl<S: CompoundShape> AnimatedInstance<S> {
    /// A new instance rests in its bind pose until a clip is set.
    #[must_use]
    pub fn new(hierarchy: Arc<BoneHierarchy>, settings: &PlaybackSettings) -> Self {
        let pose = Pose::bind_pose(&hierarchy);
        if pose.dropped_bones() > 0 {
            log::warn!(
                "Hierarchy {} has {} bones, only the first {} are animated",
                hierarchy.id(),
                hierarchy.len(),
                pose.bone_count()
            );
        }
        Self {
            hierarchy,
            clip: None,
            clock: AnimationClock::new(settings),
            evaluator: SkeletonPoseEvaluator::new(),
            pose,
            collision: None,
            last_setup_seconds: 0.0,
        }
    }

    /// Instance of a model whose hierarchy is in the asset cache.
    pub fn from_assets(
        model_id: &str,
        assets: &AnimationAssets,
        settings: &PlaybackSettings,
    ) -> Result<Self> {
        let hierarchy = assets.require_hierarchy(model_id)?;
        Ok(Self::new(hierarchy, settings))
    }

    /// Attaches the rigid body's compound shape and pushes the current pose
    /// into it right away. Fails if the mapping names a bone this instance's
    /// pose never holds.
    pub fn with_collision(mut self, collision: CollisionBinding<S>) -> Result<Self> {
        collision.mapping.validate_bones(self.hierarchy.len())?;
        self.collision = Some(collision);
        self.sync_collision();
        Ok(self)
    }

    /// Binds the named clip and rewinds to its start.
    ///
    /// Returns `false` when the cache has no such clip. The instance then
    /// keeps its current clip and pose.
    pub fn set_clip(&mut self, name: &str, assets: &AnimationAssets) -> bool {
        let Some(clip) = assets.load_animation_clip(name) else {
            log::warn!(
                "Animation clip '{name}' not found, keeping {}",
                self.clip
                    .as_ref()
                    .map_or_else(|| "the bind pose".to_string(), |c| format!("'{}'", c.name()))
            );
            return false;
        };
        self.play(clip);
        true
    }

    /// Binds an already-loaded clip and rewinds to its start.
    pub fn play(&mut self, clip: Arc<AnimationClip>) {
        self.clock.bind_clip(&clip);
        self.clip = Some(clip);
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        self.clock.set_time_scale(scale);
    }

    pub fn set_loop_mode(&mut self, mode: LoopMode) {
        self.clock.set_loop_mode(mode);
    }

    /// Jumps to `ticks`, then evaluates and syncs the new pose.
    pub fn seek(&mut self, ticks: f32) {
        self.clock.seek(ticks);
        self.evaluate();
        self.sync_collision();
    }

    /// One simulation tick of `delta_seconds`: advance, evaluate, sync.
    pub fn tick(&mut self, delta_seconds: f32) {
        self.clock.advance(delta_seconds);
        self.evaluate();
        self.sync_collision();
    }

    /// Drives the instance from an absolute timestamp, advancing by the time
    /// elapsed since the previous call (or since 0, on the first call).
    pub fn setup_for_time(&mut self, now_seconds: f32) {
        let delta = now_seconds - self.last_setup_seconds;
        self.last_setup_seconds = now_seconds;
        self.tick(delta);
    }

    /// Re-evaluates the pose at the clock's current time. Without a clip the
    /// previous pose is kept.
    pub fn evaluate(&mut self) {
        if let Some(clip) = &self.clip {
            self.evaluator.evaluate(
                &self.hierarchy,
                clip,
                self.clock.current_time(),
                &mut self.pose,
            );
        }
    }

    /// Pushes the current pose into the collision shape, if any.
    pub fn sync_collision(&mut self) {
        if let Some(collision) = &mut self.collision {
            collision.sync(&self.pose);
        }
    }

    /// Global bone matrices for skinning.
    #[must_use]
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    #[must_use]
    pub fn hierarchy(&self) -> &Arc<BoneHierarchy> {
        &self.hierarchy
    }

    #[must_use]
    pub fn clip(&self) -> Option<&Arc<AnimationClip>> {
        self.clip.as_ref()
    }

    #[must_use]
    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    #[must_use]
    pub fn collision(&self) -> Option<&CollisionBinding<S>> {
        self.collision.as_ref()
    }

    pub fn collision_mut(&mut self) -> Option<&mut CollisionBinding<S>> {
        self.collision.as_mut()
    }

    #[must_use]
    pub fn state(&self) -> AnimationState {
        AnimationState {
            clip_name: self.clock.active_clip().map(str::to_string),
            animation_time: self.clock.current_time(),
            time_scale: self.clock.time_scale(),
            loop_mode: self.clock.loop_mode(),
        }
    }

    /// Resumes playback from a saved state, then evaluates and syncs.
    ///
    /// If the saved clip is not in the cache a warning is logged, the state
    /// is ignored and `false` is returned.
    pub fn restore_state(&mut self, state: &AnimationState, assets: &AnimationAssets) -> bool {
        if let Some(name) = &state.clip_name {
            if !self.set_clip(name, assets) {
                return false;
            }
        }
        self.clock.set_time_scale(state.time_scale);
        self.clock.set_loop_mode(state.loop_mode);
        self.seek(state.animation_time);
        true
    }
}
