use glam::{Mat4, Quat, Vec3};
use rustc_hash::FxHashMap;
use sinew_core::{PlaybackSettings, Result, SinewError};

use crate::tracks::{KeyframeCursor, KeyframeTrack};
use crate::transform::BoneTransform;

/// Cursors for the three tracks of one [`BoneChannels`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelCursors {
    pub position: KeyframeCursor,
    pub rotation: KeyframeCursor,
    pub scale: KeyframeCursor,
}

/// The position, rotation and scale tracks that animate one bone.
///
/// The three tracks are independent: they may have different key counts and
/// timestamps.
#[derive(Debug, Clone)]
pub struct BoneChannels {
    pub bone_name: String,
    pub positions: KeyframeTrack<Vec3>,
    pub rotations: KeyframeTrack<Quat>,
    pub scales: KeyframeTrack<Vec3>,
}

impl BoneChannels {
    #[must_use]
    pub fn new(
        bone_name: impl Into<String>,
        positions: KeyframeTrack<Vec3>,
        rotations: KeyframeTrack<Quat>,
        scales: KeyframeTrack<Vec3>,
    ) -> Self {
        Self {
            bone_name: bone_name.into(),
            positions,
            rotations,
            scales,
        }
    }

    /// Channels holding `rest` constantly; replace individual tracks with the
    /// `with_*` builders.
    #[must_use]
    pub fn from_rest(bone_name: impl Into<String>, rest: BoneTransform) -> Self {
        Self::new(
            bone_name,
            KeyframeTrack::constant(rest.translation),
            KeyframeTrack::constant(rest.rotation),
            KeyframeTrack::constant(rest.scale),
        )
    }

    #[must_use]
    pub fn with_positions(mut self, track: KeyframeTrack<Vec3>) -> Self {
        self.positions = track;
        self
    }

    #[must_use]
    pub fn with_rotations(mut self, track: KeyframeTrack<Quat>) -> Self {
        self.rotations = track;
        self
    }

    #[must_use]
    pub fn with_scales(mut self, track: KeyframeTrack<Vec3>) -> Self {
        self.scales = track;
        self
    }

    #[must_use]
    pub fn sample(&self, time: f32) -> BoneTransform {
        BoneTransform {
            translation: self.positions.sample(time),
            rotation: self.rotations.sample(time),
            scale: self.scales.sample(time),
        }
    }

    pub fn sample_with_cursors(&self, time: f32, cursors: &mut ChannelCursors) -> BoneTransform {
        BoneTransform {
            translation: self.positions.sample_with_cursor(time, &mut cursors.position),
            rotation: self.rotations.sample_with_cursor(time, &mut cursors.rotation),
            scale: self.scales.sample_with_cursor(time, &mut cursors.scale),
        }
    }

    /// Latest key time across the three tracks.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.positions
            .end_time()
            .max(self.rotations.end_time())
            .max(self.scales.end_time())
    }

    fn key_times(&self) -> impl Iterator<Item = f32> + '_ {
        self.positions
            .times()
            .iter()
            .chain(self.rotations.times())
            .chain(self.scales.times())
            .copied()
    }
}

/// A named, immutable set of bone channels.
///
/// Times are in ticks; [`ticks_per_second`](Self::ticks_per_second) converts
/// from seconds. Clips are shared read-only between every instance playing
/// them, so sampling takes `&self` and touches no interior state.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    name: String,
    ticks_per_second: f32,
    duration_ticks: f32,
    channels: Vec<BoneChannels>,
    lookup: FxHashMap<String, usize>,
}

impl AnimationClip {
    /// Builds a clip, validating that the duration is positive, every key lies
    /// in `[0, duration_ticks]` and no bone is animated twice.
    ///
    /// A non-positive `ticks_per_second` (importers report 0 for "unspecified")
    /// is replaced by [`PlaybackSettings::FALLBACK_TICKS_PER_SECOND`].
    pub fn new(
        name: impl Into<String>,
        ticks_per_second: f32,
        duration_ticks: f32,
        channels: Vec<BoneChannels>,
    ) -> Result<Self> {
        let name = name.into();

        if !(duration_ticks.is_finite() && duration_ticks > 0.0) {
            return Err(SinewError::invalid_clip(
                &name,
                format!("duration must be positive, got {duration_ticks}"),
            ));
        }

        let ticks_per_second = if ticks_per_second.is_finite() && ticks_per_second > 0.0 {
            ticks_per_second
        } else {
            log::debug!(
                "Clip '{name}' declares {ticks_per_second} ticks/s, using {}",
                PlaybackSettings::FALLBACK_TICKS_PER_SECOND
            );
            PlaybackSettings::FALLBACK_TICKS_PER_SECOND
        };

        let mut lookup = FxHashMap::default();
        for (index, channel) in channels.iter().enumerate() {
            if let Some(bad) = channel
                .key_times()
                .find(|&t| t < 0.0 || t > duration_ticks)
            {
                return Err(SinewError::invalid_clip(
                    &name,
                    format!(
                        "bone '{}' has a key at {bad}, outside [0, {duration_ticks}]",
                        channel.bone_name
                    ),
                ));
            }
            if lookup.insert(channel.bone_name.clone(), index).is_some() {
                return Err(SinewError::invalid_clip(
                    &name,
                    format!("bone '{}' is animated twice", channel.bone_name),
                ));
            }
        }

        Ok(Self {
            name,
            ticks_per_second,
            duration_ticks,
            channels,
            lookup,
        })
    }

    /// Builds a clip whose duration is the latest key time of any channel.
    pub fn from_channels(
        name: impl Into<String>,
        ticks_per_second: f32,
        channels: Vec<BoneChannels>,
    ) -> Result<Self> {
        let duration = channels
            .iter()
            .map(BoneChannels::end_time)
            .fold(0.0_f32, f32::max);
        Self::new(name, ticks_per_second, duration, channels)
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn ticks_per_second(&self) -> f32 {
        self.ticks_per_second
    }

    #[inline]
    #[must_use]
    pub fn duration_ticks(&self) -> f32 {
        self.duration_ticks
    }

    #[inline]
    #[must_use]
    pub fn duration_seconds(&self) -> f32 {
        self.duration_ticks / self.ticks_per_second
    }

    #[inline]
    #[must_use]
    pub fn seconds_to_ticks(&self, seconds: f32) -> f32 {
        seconds * self.ticks_per_second
    }

    #[inline]
    #[must_use]
    pub fn channels(&self) -> &[BoneChannels] {
        &self.channels
    }

    #[must_use]
    pub fn channel_index(&self, bone_name: &str) -> Option<usize> {
        self.lookup.get(bone_name).copied()
    }

    #[must_use]
    pub fn channel(&self, bone_name: &str) -> Option<&BoneChannels> {
        self.channel_index(bone_name).map(|i| &self.channels[i])
    }

    /// Samples a bone's local TRS at `time` (ticks).
    ///
    /// `None` means the clip does not animate this bone; callers fall back to
    /// the bind pose. Times outside the clip clamp to the first/last key;
    /// wrapping is the clock's job.
    #[must_use]
    pub fn sample_local(&self, bone_name: &str, time: f32) -> Option<BoneTransform> {
        self.channel(bone_name).map(|channel| channel.sample(time))
    }

    /// [`sample_local`](Self::sample_local) composed as
    /// `translation * rotation * scale`.
    #[must_use]
    pub fn evaluate_local(&self, bone_name: &str, time: f32) -> Option<Mat4> {
        self.sample_local(bone_name, time).map(|t| t.to_mat4())
    }
}
