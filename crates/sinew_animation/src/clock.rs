use sinew_core::{LoopMode, PlaybackSettings};

use crate::clip::AnimationClip;

/// Playback state of an [`AnimationClock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    /// A [`LoopMode::Once`] clip reached its end (or its start, when running
    /// backwards). Advancing is a no-op until another clip is bound.
    Finished,
}

/// Timing of the bound clip, copied out so the clock does not hold the clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipTiming {
    pub ticks_per_second: f32,
    pub duration_ticks: f32,
}

impl From<&AnimationClip> for ClipTiming {
    fn from(clip: &AnimationClip) -> Self {
        Self {
            ticks_per_second: clip.ticks_per_second(),
            duration_ticks: clip.duration_ticks(),
        }
    }
}

/// Per-instance playback position.
///
/// Time is kept in the bound clip's ticks. [`advance`](Self::advance) takes
/// elapsed seconds, scales them by the time scale and the clip's tick rate,
/// then applies the loop policy.
#[derive(Debug, Clone)]
pub struct AnimationClock {
    current_time: f32,
    time_scale: f32,
    loop_mode: LoopMode,
    active_clip: Option<String>,
    timing: Option<ClipTiming>,
    state: PlaybackState,
}

impl AnimationClock {
    #[must_use]
    pub fn new(settings: &PlaybackSettings) -> Self {
        Self {
            current_time: 0.0,
            time_scale: settings.default_time_scale,
            loop_mode: settings.default_loop_mode,
            active_clip: None,
            timing: None,
            state: PlaybackState::Playing,
        }
    }

    /// Binds a clip by name and rewinds to 0; phase never carries over
    /// between clips.
    pub fn set_clip(&mut self, name: impl Into<String>, timing: ClipTiming) {
        let name = name.into();
        log::debug!(
            "Clock bound to '{name}' ({} ticks @ {} ticks/s)",
            timing.duration_ticks,
            timing.ticks_per_second
        );
        self.active_clip = Some(name);
        self.timing = Some(timing);
        self.current_time = 0.0;
        self.state = PlaybackState::Playing;
    }

    pub fn bind_clip(&mut self, clip: &AnimationClip) {
        self.set_clip(clip.name(), ClipTiming::from(clip));
    }

    /// Zero freezes playback, negative values play in reverse.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale;
    }

    /// Takes effect on the next advance; does not revive a finished clock.
    pub fn set_loop_mode(&mut self, mode: LoopMode) {
        self.loop_mode = mode;
    }

    /// Jumps to `ticks` (scrubbing). The loop policy is applied to the target,
    /// and a finished clock starts playing again.
    pub fn seek(&mut self, ticks: f32) {
        let Some(timing) = self.timing else {
            return;
        };
        self.current_time = ticks;
        self.apply_loop_policy(timing.duration_ticks);
        // Landing exactly on an end is a scrub target, not a finish.
        self.state = PlaybackState::Playing;
    }

    /// Advances by `delta_seconds` of real or simulated time.
    pub fn advance(&mut self, delta_seconds: f32) {
        if self.state == PlaybackState::Finished {
            return;
        }
        let Some(timing) = self.timing else {
            return;
        };
        if timing.duration_ticks <= 0.0 {
            return;
        }

        self.current_time += delta_seconds * self.time_scale * timing.ticks_per_second;
        self.apply_loop_policy(timing.duration_ticks);
    }

    fn apply_loop_policy(&mut self, duration: f32) {
        match self.loop_mode {
            LoopMode::Once => {
                if self.current_time >= duration {
                    self.current_time = duration;
                    self.state = PlaybackState::Finished;
                } else if self.current_time < 0.0 {
                    self.current_time = 0.0;
                    self.state = PlaybackState::Finished;
                }
            }
            LoopMode::Loop => {
                let t = self.current_time.rem_euclid(duration);
                // rem_euclid rounds up to `duration` for tiny negative times.
                self.current_time = if t >= duration { 0.0 } else { t };
            }
            LoopMode::PingPong => {
                let period = duration * 2.0;
                let t = self.current_time.rem_euclid(period);
                self.current_time = if t > duration { period - t } else { t };
            }
        }
    }

    /// Current position in ticks.
    #[inline]
    #[must_use]
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    #[inline]
    #[must_use]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    #[inline]
    #[must_use]
    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    #[inline]
    #[must_use]
    pub fn active_clip(&self) -> Option<&str> {
        self.active_clip.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn timing(&self) -> Option<ClipTiming> {
        self.timing
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state == PlaybackState::Finished
    }
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new(&PlaybackSettings::default())
    }
}
