//! Timeline Authoring
//!
//! [`AnimationSequence`] models the sections of an editor timeline for a
//! single object. Each section ends at a frame and records where the object
//! should be at that frame, as a delta from the object's original transform.
//! [`build_clip`](AnimationSequence::build_clip) turns the sections into an
//! immutable [`AnimationClip`]; the sequence never takes part in playback.

use glam::{Quat, Vec3};
use sinew_core::{Result, SinewError};

use crate::clip::{AnimationClip, BoneChannels};
use crate::tracks::KeyframeTrack;
use crate::transform::BoneTransform;

pub const DEFAULT_FRAME_COUNT: u32 = 120;
pub const FRAMES_PER_SECOND: f32 = 60.0;
const DEFAULT_SECTION_FRAMES: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceSection {
    pub frame_end: u32,
    /// Transform at `frame_end`, relative to the original transform.
    pub delta: BoneTransform,
}

#[derive(Debug, Clone)]
pub struct AnimationSequence {
    original: BoneTransform,
    sections: Vec<SequenceSection>,
    frame_count: u32,
}

impl AnimationSequence {
    /// Starts a timeline with one identity section; a timeline is never
    /// empty.
    #[must_use]
    pub fn new(original: BoneTransform) -> Self {
        Self {
            original,
            sections: vec![SequenceSection {
                frame_end: DEFAULT_SECTION_FRAMES,
                delta: BoneTransform::IDENTITY,
            }],
            frame_count: DEFAULT_FRAME_COUNT,
        }
    }

    #[must_use]
    pub fn original(&self) -> &BoneTransform {
        &self.original
    }

    #[must_use]
    pub fn sections(&self) -> &[SequenceSection] {
        &self.sections
    }

    #[must_use]
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// First frame of a section: the previous section's end, or 0.
    #[must_use]
    pub fn section_start(&self, index: usize) -> u32 {
        match index {
            0 => 0,
            i => self.sections.get(i - 1).map_or(0, |s| s.frame_end),
        }
    }

    fn last_end(&self) -> u32 {
        self.sections.last().map_or(0, |s| s.frame_end)
    }

    fn push(&mut self, length: u32, delta: BoneTransform) -> usize {
        let frame_end = self.last_end() + length.max(1);
        self.frame_count = self.frame_count.max(frame_end);
        self.sections.push(SequenceSection { frame_end, delta });
        self.sections.len() - 1
    }

    /// Appends an identity section after the last one.
    pub fn add_section(&mut self) -> usize {
        self.push(DEFAULT_SECTION_FRAMES, BoneTransform::IDENTITY)
    }

    /// Appends a copy of a section (same length and delta).
    pub fn duplicate_section(&mut self, index: usize) -> Option<usize> {
        let source = *self.sections.get(index)?;
        let length = source.frame_end - self.section_start(index);
        Some(self.push(length, source.delta))
    }

    /// Removes a section. The last remaining section cannot be removed.
    pub fn remove_section(&mut self, index: usize) -> bool {
        if self.sections.len() <= 1 || index >= self.sections.len() {
            return false;
        }
        self.sections.remove(index);
        true
    }

    /// Records the object's `current` transform as the target of a section.
    pub fn set_section_transform(&mut self, index: usize, current: &BoneTransform) -> bool {
        let delta = current.relative_to(&self.original);
        match self.sections.get_mut(index) {
            Some(section) => {
                section.delta = delta;
                true
            }
            None => false,
        }
    }

    /// Moves a section's end frame, kept strictly between its neighbours'
    /// ends.
    pub fn set_section_end(&mut self, index: usize, frame: u32) -> bool {
        if index >= self.sections.len() {
            return false;
        }
        let min = self.section_start(index) + 1;
        let max = self
            .sections
            .get(index + 1)
            .map_or(u32::MAX, |next| next.frame_end - 1);
        let frame_end = frame.clamp(min, max.max(min));
        self.sections[index].frame_end = frame_end;
        self.frame_count = self.frame_count.max(frame_end);
        true
    }

    /// Emits a clip that animates `bone_name`: an identity key at frame 0,
    /// then each section's delta at its end frame. Ticks are frames.
    pub fn build_clip(&self, name: &str, bone_name: &str) -> Result<AnimationClip> {
        let mut times = Vec::with_capacity(self.sections.len() + 1);
        let mut positions = Vec::with_capacity(times.capacity());
        let mut rotations = Vec::with_capacity(times.capacity());
        let mut scales = Vec::with_capacity(times.capacity());

        let mut push_key = |frame: u32, transform: &BoneTransform| {
            times.push(frame as f32);
            positions.push(transform.translation);
            rotations.push(transform.rotation);
            scales.push(transform.scale);
        };

        push_key(0, &BoneTransform::IDENTITY);
        for section in &self.sections {
            push_key(section.frame_end, &section.delta);
        }

        let Some(&duration) = times.last() else {
            return Err(SinewError::invalid_clip(name, "sequence has no sections"));
        };

        let channels = BoneChannels::new(
            bone_name,
            KeyframeTrack::<Vec3>::linear(times.clone(), positions)?,
            KeyframeTrack::<Quat>::linear(times.clone(), rotations)?,
            KeyframeTrack::<Vec3>::linear(times, scales)?,
        );

        AnimationClip::new(name, FRAMES_PER_SECOND, duration, vec![channels])
    }
}
