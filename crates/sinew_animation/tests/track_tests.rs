//! Keyframe Track Tests
//!
//! Tests for:
//! - Linear / step sampling, clamping before the first and after the last key
//! - Cursor sampling agreeing with stateless sampling
//! - Exact reproduction of stored keys, per track and through a clip
//! - Keys sharing a timestamp
//! - Unit-length rotations across a whole track

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Quat, Vec3};
use sinew_animation::{
    AnimationClip, BoneChannels, BoneTransform, InterpolationMode, KeyframeCursor, KeyframeTrack,
};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// `q` and `-q` are the same rotation.
fn same_rotation(a: Quat, b: Quat) -> bool {
    a.abs_diff_eq(b, EPSILON) || a.abs_diff_eq(-b, EPSILON)
}

// ============================================================================
// Linear Interpolation
// ============================================================================

#[test]
fn linear_vec3_midpoint() {
    let track = KeyframeTrack::linear(vec![0.0, 1.0], vec![Vec3::ZERO, Vec3::X]).unwrap();
    let val = track.sample(0.5);
    assert!(val.abs_diff_eq(Vec3::new(0.5, 0.0, 0.0), EPSILON), "got {val}");
}

#[test]
fn linear_clamps_before_first_key() {
    let track = KeyframeTrack::linear(vec![1.0, 2.0], vec![10.0_f32, 20.0]).unwrap();
    assert_eq!(track.sample(0.0), 10.0);
    assert_eq!(track.sample(-5.0), 10.0);
}

#[test]
fn linear_clamps_after_last_key() {
    let track = KeyframeTrack::linear(vec![0.0, 1.0], vec![0.0_f32, 10.0]).unwrap();
    assert_eq!(track.sample(5.0), 10.0);
}

#[test]
fn single_key_is_constant() {
    let track = KeyframeTrack::linear(vec![0.0], vec![42.0_f32]).unwrap();
    assert_eq!(track.sample(-1.0), 42.0);
    assert_eq!(track.sample(3.0), 42.0);
}

// ============================================================================
// Step Interpolation
// ============================================================================

#[test]
fn step_holds_left_key() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0, 2.0],
        vec![0.0_f32, 100.0, 200.0],
        InterpolationMode::Step,
    )
    .unwrap();
    assert_eq!(track.sample(0.99), 0.0);
    assert_eq!(track.sample(1.0), 100.0);
    assert_eq!(track.sample(1.5), 100.0);
    assert_eq!(track.sample(2.0), 200.0);
}

// ============================================================================
// Keyframe Exactness
// ============================================================================

#[test]
fn keys_are_reproduced_exactly() {
    let times = vec![0.0, 0.3, 1.1, 2.0, 2.05];
    let positions = vec![
        Vec3::new(0.1, 0.2, 0.3),
        Vec3::new(-1.0, 4.5, 0.0),
        Vec3::new(7.25, 0.0, -3.0),
        Vec3::splat(1.0 / 3.0),
        Vec3::new(9.0, 8.0, 7.0),
    ];
    let rotations = vec![
        Quat::IDENTITY,
        Quat::from_rotation_x(0.7),
        Quat::from_rotation_y(-2.9),
        Quat::from_euler(glam::EulerRot::XYZ, 0.1, 0.2, 0.3),
        Quat::from_rotation_z(PI),
    ];
    let pos_track = KeyframeTrack::linear(times.clone(), positions.clone()).unwrap();
    let rot_track = KeyframeTrack::linear(times.clone(), rotations.clone()).unwrap();

    let mut cursor = KeyframeCursor::default();
    for (i, &t) in times.iter().enumerate() {
        assert_eq!(pos_track.sample(t), positions[i], "position key {i}");
        assert_eq!(rot_track.sample(t), rotations[i], "rotation key {i}");
        assert_eq!(pos_track.sample_with_cursor(t, &mut cursor), positions[i]);
    }
}

#[test]
fn clip_reproduces_every_key_of_every_track() {
    let pos_times = vec![0.0, 1.5, 4.0];
    let positions = vec![Vec3::ZERO, Vec3::new(1.25, -2.0, 0.5), Vec3::splat(3.0)];
    let rot_times = vec![0.0, 0.7, 2.2, 4.0];
    let rotations = vec![
        Quat::IDENTITY,
        Quat::from_rotation_z(0.4),
        Quat::from_rotation_x(-1.3),
        Quat::from_rotation_y(2.5),
    ];
    let scale_times = vec![0.25, 1.0, 3.3];
    let scales = vec![
        Vec3::ONE,
        Vec3::new(2.0, 0.5, 1.0),
        Vec3::new(0.1, 0.2, 0.3),
    ];

    let channels = BoneChannels::from_rest("bone", BoneTransform::IDENTITY)
        .with_positions(KeyframeTrack::linear(pos_times.clone(), positions.clone()).unwrap())
        .with_rotations(KeyframeTrack::linear(rot_times.clone(), rotations.clone()).unwrap())
        .with_scales(KeyframeTrack::linear(scale_times.clone(), scales.clone()).unwrap());
    let clip = AnimationClip::new("keys", 30.0, 4.0, vec![channels]).unwrap();

    for (i, &t) in pos_times.iter().enumerate() {
        let sampled = clip.sample_local("bone", t).unwrap();
        assert_eq!(sampled.translation, positions[i], "position key {i}");
    }
    for (i, &t) in rot_times.iter().enumerate() {
        let sampled = clip.sample_local("bone", t).unwrap();
        assert_eq!(sampled.rotation, rotations[i], "rotation key {i}");
    }
    for (i, &t) in scale_times.iter().enumerate() {
        let sampled = clip.sample_local("bone", t).unwrap();
        assert_eq!(sampled.scale, scales[i], "scale key {i}");
    }
}

// ============================================================================
// Shared Timestamps
// ============================================================================

#[test]
fn shared_timestamp_is_accepted_and_sampled() {
    let times = vec![0.0, 1.0, 1.0, 2.0];
    let values = vec![
        Vec3::ZERO,
        Vec3::X,
        Vec3::new(5.0, 0.0, 0.0),
        Vec3::new(6.0, 0.0, 0.0),
    ];
    let track = KeyframeTrack::linear(times, values.clone()).unwrap();

    // At the shared time the later key wins; neither side interpolates
    // across the zero-length span.
    assert_eq!(track.sample(0.0), values[0]);
    assert_eq!(track.sample(1.0), values[2]);
    assert_eq!(track.sample(2.0), values[3]);
    assert!(track.sample(0.5).abs_diff_eq(Vec3::new(0.5, 0.0, 0.0), EPSILON));
    assert!(track.sample(1.5).abs_diff_eq(Vec3::new(5.5, 0.0, 0.0), EPSILON));

    let sample_times = [-0.5, 0.0, 0.5, 0.999, 1.0, 1.001, 1.5, 2.0, 2.5];
    let mut cursor = KeyframeCursor::default();
    for &t in sample_times.iter().chain(sample_times.iter().rev()) {
        let stateless = track.sample(t);
        assert!(stateless.is_finite(), "t = {t}");
        assert_eq!(track.sample_with_cursor(t, &mut cursor), stateless, "t = {t}");
    }
}

#[test]
fn decreasing_times_are_rejected() {
    assert!(KeyframeTrack::linear(vec![0.0, 1.0, 0.5], vec![0.0_f32, 1.0, 2.0]).is_err());
}

// ============================================================================
// Rotation
// ============================================================================

#[test]
fn slerp_halfway() {
    let q0 = Quat::IDENTITY;
    let q1 = Quat::from_rotation_y(FRAC_PI_2);
    let track = KeyframeTrack::linear(vec![0.0, 1.0], vec![q0, q1]).unwrap();
    let val = track.sample(0.5);
    assert!(same_rotation(val, Quat::from_rotation_y(FRAC_PI_2 / 2.0)), "got {val}");
}

#[test]
fn slerp_takes_shorter_arc_between_opposite_hemispheres() {
    let q0 = Quat::from_rotation_z(0.2);
    let q1 = -Quat::from_rotation_z(0.6);
    let track = KeyframeTrack::linear(vec![0.0, 1.0], vec![q0, q1]).unwrap();
    let val = track.sample(0.5);
    assert!(
        same_rotation(val, Quat::from_rotation_z(0.4)),
        "interpolation reversed: got {val}"
    );
}

#[test]
fn rotations_stay_unit_length() {
    let track = KeyframeTrack::linear(
        vec![0.0, 1.0, 2.0, 3.0],
        vec![
            Quat::IDENTITY,
            Quat::from_rotation_x(2.5),
            -Quat::from_rotation_y(1.0),
            Quat::from_rotation_z(PI),
        ],
    )
    .unwrap();
    for i in 0..=300 {
        let t = i as f32 * 0.01;
        let len = track.sample(t).length();
        assert!(approx(len, 1.0), "t={t}: |q|={len}");
    }
}

// ============================================================================
// Cursor Sampling
// ============================================================================

#[test]
fn cursor_matches_stateless_forward_and_backward() {
    let track = KeyframeTrack::linear(
        (0..20).map(|i| i as f32 * 0.5).collect(),
        (0..20).map(|i| ((i * 7) % 5) as f32).collect(),
    )
    .unwrap();

    let mut cursor = KeyframeCursor::default();
    let forward = (0..=100).map(|i| i as f32 * 0.1);
    let backward = (0..=100).rev().map(|i| i as f32 * 0.1);
    let jumps = [8.0, 0.2, 9.9, 3.3, -1.0, 12.0];

    for t in forward.chain(backward).chain(jumps) {
        assert_eq!(
            track.sample_with_cursor(t, &mut cursor),
            track.sample(t),
            "t={t}"
        );
    }
}

#[test]
fn stale_cursor_is_tolerated() {
    let track = KeyframeTrack::linear(vec![0.0, 2.0], vec![0.0_f32, 100.0]).unwrap();
    // Cursor left over from a longer track
    let mut cursor = KeyframeCursor { last_index: 57 };
    assert!(approx(track.sample_with_cursor(1.0, &mut cursor), 50.0));
}
