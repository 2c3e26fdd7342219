//! Animated Instance Tests
//!
//! Tests for:
//! - Two-bone end-to-end scenario driven through an instance
//! - Collision shape kept in step with the pose on every tick
//! - Playback state persistence (JSON round trip, unknown clips)
//! - Tick ordering: every instance synced before the physics step
//! - Once / Loop playback through an instance

use std::cell::RefCell;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};
use std::rc::Rc;
use std::sync::Arc;

use glam::{Mat4, Quat, Vec3};
use sinew::prelude::*;
use sinew::{
    Aabb, BoneChannels, BoneHierarchyBuilder, BonePiece, BoneTransform, CollisionBoneMapping,
    KeyframeTrack, PlaybackState, SinewError,
};

const EPSILON: f32 = 1e-5;
const CENTER_OFFSET: Vec3 = Vec3::new(0.0, 1.0, 0.0);

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// root + child, child bound one unit up; "turn" rotates the root 90° about Y
/// over two ticks at one tick per second.
fn assets() -> anyhow::Result<AnimationAssets> {
    let assets = AnimationAssets::new();
    let hierarchy = BoneHierarchyBuilder::new()
        .bone("root", None, Mat4::IDENTITY)
        .bone("child", Some("root"), Mat4::from_translation(Vec3::Y))
        .build()?;
    assets.insert_hierarchy("two_bones", hierarchy);

    let turn = BoneChannels::from_rest("root", BoneTransform::IDENTITY).with_rotations(
        KeyframeTrack::linear(
            vec![0.0, 2.0],
            vec![Quat::IDENTITY, Quat::from_rotation_y(FRAC_PI_2)],
        )?,
    );
    assets.insert_clip(AnimationClip::new("turn", 1.0, 2.0, vec![turn])?);

    let lift = BoneChannels::from_rest("child", BoneTransform::from_translation(Vec3::Y))
        .with_positions(KeyframeTrack::linear(
            vec![0.0, 4.0],
            vec![Vec3::Y, Vec3::new(0.0, 3.0, 0.0)],
        )?);
    assets.insert_clip(AnimationClip::new("lift", 1.0, 4.0, vec![lift])?);
    Ok(assets)
}

fn instance(assets: &AnimationAssets) -> anyhow::Result<AnimatedInstance> {
    Ok(AnimatedInstance::from_assets(
        "two_bones",
        assets,
        &PlaybackSettings::default(),
    )?)
}

fn with_body(instance: AnimatedInstance) -> anyhow::Result<AnimatedInstance> {
    let pieces = [BonePiece {
        bone: 1,
        transform: instance.pose()[1],
        bounds: Aabb::from_half_extents(Vec3::splat(0.1)),
    }];
    let (collider, mapping) = CompoundCollider::from_pieces(
        CENTER_OFFSET,
        &[Aabb::from_half_extents(Vec3::new(0.5, 0.05, 0.5))],
        &pieces,
    )?;
    Ok(instance.with_collision(CollisionBinding::new(CENTER_OFFSET, mapping, collider)?)?)
}

fn assert_mat4_eq(actual: Mat4, expected: Mat4) {
    assert!(
        actual.abs_diff_eq(expected, EPSILON),
        "expected {expected:?}, got {actual:?}"
    );
}

// ============================================================================
// End-to-end
// ============================================================================

#[test]
fn two_bone_scenario_through_instance() -> anyhow::Result<()> {
    init_logging();
    let assets = assets()?;
    let mut instance = instance(&assets)?;
    assert!(instance.set_clip("turn", &assets));

    instance.tick(1.0);

    let root = instance.pose()[0];
    assert_mat4_eq(root, Mat4::from_quat(Quat::from_rotation_y(FRAC_PI_4)));
    assert_mat4_eq(instance.pose()[1], root * Mat4::from_translation(Vec3::Y));
    Ok(())
}

#[test]
fn looping_instance_wraps_time() -> anyhow::Result<()> {
    let assets = assets()?;
    let mut instance = instance(&assets)?;
    instance.set_clip("turn", &assets);

    instance.tick(2.5);

    assert!((instance.clock().current_time() - 0.5).abs() < EPSILON);
    assert_eq!(instance.clock().state(), PlaybackState::Playing);
    Ok(())
}

#[test]
fn once_instance_holds_last_pose() -> anyhow::Result<()> {
    let assets = assets()?;
    let mut instance = instance(&assets)?;
    instance.set_loop_mode(LoopMode::Once);
    instance.set_clip("turn", &assets);

    instance.tick(5.0);
    let held = instance.pose()[0];
    instance.tick(1.0);

    assert!(instance.clock().is_finished());
    assert_eq!(instance.pose()[0], held);
    assert_mat4_eq(held, Mat4::from_quat(Quat::from_rotation_y(FRAC_PI_2)));
    Ok(())
}

// ============================================================================
// Collision
// ============================================================================

#[test]
fn body_follows_every_tick() -> anyhow::Result<()> {
    init_logging();
    let assets = assets()?;
    let mut instance = with_body(instance(&assets)?)?;
    instance.set_clip("lift", &assets);

    let correction = Mat4::from_translation(-CENTER_OFFSET);
    let mut last_generation = 0;
    for _ in 0..6 {
        instance.tick(0.75);

        let collision = instance.collision().expect("instance has a body");
        let slot = collision.mapping().slot_for(1).expect("child is mapped");
        let expected = correction * instance.pose()[1];
        assert_mat4_eq(
            collision.shape().child_transform(slot).expect("slot exists"),
            expected,
        );
        assert!(!collision.shape().is_aabb_stale());
        assert!(collision.shape().aabb_generation() > last_generation);
        last_generation = collision.shape().aabb_generation();
    }
    Ok(())
}

#[test]
fn body_mapping_past_hierarchy_is_rejected() -> anyhow::Result<()> {
    let assets = assets()?;
    let (collider, mapping) = CompoundCollider::from_pieces(
        Vec3::ZERO,
        &[],
        &[BonePiece {
            bone: 5,
            transform: Mat4::IDENTITY,
            bounds: Aabb::from_half_extents(Vec3::splat(0.1)),
        }],
    )?;
    let binding = CollisionBinding::new(Vec3::ZERO, mapping, collider)?;

    let result = instance(&assets)?.with_collision(binding);

    assert!(matches!(result, Err(SinewError::InvalidMapping(_))));
    Ok(())
}

#[test]
fn body_scaling_survives_ticks() -> anyhow::Result<()> {
    let assets = assets()?;
    let mut instance = with_body(instance(&assets)?)?;
    instance.set_clip("lift", &assets);
    let scaling = Vec3::new(2.0, 1.0, 0.5);
    instance
        .collision_mut()
        .expect("instance has a body")
        .shape_mut()
        .set_local_scaling(scaling);

    for _ in 0..10 {
        instance.tick(0.1);
    }

    let shape = instance.collision().expect("instance has a body").shape();
    assert_eq!(shape.local_scaling(), scaling);
    let static_origin = shape.child_transform(0).expect("static piece").w_axis;
    assert!((static_origin.y + CENTER_OFFSET.y).abs() < EPSILON);
    Ok(())
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn state_round_trip_resumes_same_phase() -> anyhow::Result<()> {
    let assets = assets()?;
    let mut original = instance(&assets)?;
    original.set_clip("lift", &assets);
    original.set_time_scale(0.5);
    original.tick(3.0);

    let json = original.state().to_json()?;
    let state = AnimationState::from_json(&json)?;
    assert_eq!(state, original.state());

    let mut restored = instance(&assets)?;
    assert!(restored.restore_state(&state, &assets));

    assert_eq!(restored.clock().current_time(), original.clock().current_time());
    assert_eq!(restored.clock().time_scale(), 0.5);
    assert_eq!(restored.pose().matrices(), original.pose().matrices());
    Ok(())
}

#[test]
fn restoring_unknown_clip_keeps_binding() -> anyhow::Result<()> {
    init_logging();
    let assets = assets()?;
    let mut instance = instance(&assets)?;
    instance.set_clip("turn", &assets);
    instance.tick(1.0);
    let before = instance.state();
    let pose = instance.pose().matrices().to_vec();

    let state = AnimationState {
        clip_name: Some("dance".into()),
        animation_time: 0.25,
        time_scale: 3.0,
        loop_mode: LoopMode::Once,
    };
    assert!(!instance.restore_state(&state, &assets));

    assert_eq!(instance.state(), before);
    assert_eq!(instance.pose().matrices(), pose.as_slice());
    Ok(())
}

// ============================================================================
// Tick ordering
// ============================================================================

type EventLog = Rc<RefCell<Vec<&'static str>>>;

struct RecordingShape {
    log: EventLog,
    children: Vec<Mat4>,
    scaling: Vec3,
}

impl CompoundShape for RecordingShape {
    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child_transform(&self, slot: usize) -> Option<Mat4> {
        self.children.get(slot).copied()
    }

    fn set_child_transform(&mut self, slot: usize, transform: Mat4) {
        self.log.borrow_mut().push("child");
        self.children[slot] = transform;
    }

    fn local_scaling(&self) -> Vec3 {
        self.scaling
    }

    fn set_local_scaling(&mut self, scaling: Vec3) {
        self.scaling = scaling;
    }

    fn recalculate_local_aabb(&mut self) {
        self.log.borrow_mut().push("aabb");
    }
}

struct RecordingWorld {
    log: EventLog,
}

impl PhysicsStep for RecordingWorld {
    fn step_simulation(&mut self, _delta_seconds: f32) {
        self.log.borrow_mut().push("step");
    }
}

#[test]
fn all_instances_sync_before_physics_step() -> anyhow::Result<()> {
    let assets = assets()?;
    let log = EventLog::default();
    let mut system: AnimationSystem<RecordingShape> = AnimationSystem::new();

    for clip in ["turn", "lift"] {
        let mut instance =
            AnimatedInstance::from_assets("two_bones", &assets, &PlaybackSettings::default())?;
        instance.set_clip(clip, &assets);
        let shape = RecordingShape {
            log: Rc::clone(&log),
            children: vec![Mat4::IDENTITY],
            scaling: Vec3::ONE,
        };
        let mapping = CollisionBoneMapping::new([(1, 0)])?;
        system.insert(instance.with_collision(CollisionBinding::new(Vec3::ZERO, mapping, shape)?)?);
    }
    log.borrow_mut().clear();

    let mut world = RecordingWorld {
        log: Rc::clone(&log),
    };
    system.step(0.5, &mut world);

    assert_eq!(
        *log.borrow(),
        vec!["child", "aabb", "child", "aabb", "step"]
    );
    for (_key, instance) in system.iter() {
        assert!((instance.clock().current_time() - 0.5).abs() < EPSILON);
    }
    Ok(())
}

#[test]
fn removed_instance_is_not_stepped() -> anyhow::Result<()> {
    let assets = assets()?;
    let mut system: AnimationSystem = AnimationSystem::new();
    let key = system.insert(instance(&assets)?);
    let kept = system.insert(instance(&assets)?);

    let removed = system.remove(key).expect("instance was inserted");
    system.update(1.0);

    assert_eq!(system.len(), 1);
    assert!(system.get(key).is_none());
    assert!(system.get(kept).is_some());
    assert_eq!(removed.pose().matrices(), system.get(kept).unwrap().pose().matrices());
    Ok(())
}

#[test]
fn clips_are_shared_between_instances() -> anyhow::Result<()> {
    let assets = assets()?;
    let mut a = instance(&assets)?;
    let mut b = instance(&assets)?;
    a.set_clip("turn", &assets);
    b.set_clip("turn", &assets);

    assert!(Arc::ptr_eq(a.clip().unwrap(), b.clip().unwrap()));
    a.tick(0.5);
    b.tick(1.5);
    assert_ne!(a.pose()[0], b.pose()[0]);
    Ok(())
}
