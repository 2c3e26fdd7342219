//! Playback Settings
//!
//! Defaults applied when an animated instance is created or a clip is
//! imported without complete timing information.
//!
//! ```rust,ignore
//! use sinew_core::{LoopMode, PlaybackSettings};
//!
//! let settings = PlaybackSettings {
//!     default_loop_mode: LoopMode::Once,
//!     ..Default::default()
//! };
//! ```

use serde::{Deserialize, Serialize};

/// How a clock treats time that runs past either end of its clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoopMode {
    /// Play once, clamp at the end (or start, when reversed) and finish.
    Once,
    /// Wrap around: `time mod duration`.
    #[default]
    Loop,
    /// Bounce between start and end.
    PingPong,
}

/// Playback defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Ticks per second substituted when an imported clip declares zero.
    pub default_ticks_per_second: f32,
    /// Initial time scale of new clocks.
    pub default_time_scale: f32,
    /// Initial loop mode of new clocks.
    pub default_loop_mode: LoopMode,
}

impl PlaybackSettings {
    /// Assimp-style importers report 0 ticks per second when the source file
    /// leaves the rate unspecified.
    pub const FALLBACK_TICKS_PER_SECOND: f32 = 25.0;
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            default_ticks_per_second: Self::FALLBACK_TICKS_PER_SECOND,
            default_time_scale: 1.0,
            default_loop_mode: LoopMode::Loop,
        }
    }
}
