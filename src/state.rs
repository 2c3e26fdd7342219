use serde::{Deserialize, Serialize};
use sinew_core::{LoopMode, Result};

/// Persisted playback phase of an [`AnimatedInstance`](crate::AnimatedInstance).
///
/// Restoring it resumes the same clip at the same time, so a reloaded scene
/// continues where it was saved. Nothing else about an instance is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationState {
    pub clip_name: Option<String>,
    /// Clock time in the clip's ticks.
    pub animation_time: f32,
    pub time_scale: f32,
    #[serde(default)]
    pub loop_mode: LoopMode,
}

impl AnimationState {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
