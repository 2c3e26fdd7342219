//! Sinew Core
//!
//! Foundational types shared by every Sinew crate:
//!
//! - [`errors`]: the [`SinewError`] type and [`Result`] alias
//! - [`settings`]: playback defaults ([`PlaybackSettings`], [`LoopMode`])
//! - [`MAX_BONES`]: the fixed skinning capacity

pub mod errors;
pub mod settings;

pub use errors::{Result, SinewError};
pub use settings::{LoopMode, PlaybackSettings};

/// Maximum number of bones a pose can hold.
///
/// Skinning shaders declare a fixed-size joint array of this length, and the
/// collision synchronizer never addresses a bone at or beyond it.
pub const MAX_BONES: usize = 128;
