//! Error Types
//!
//! This module defines the error types used throughout Sinew.
//!
//! # Overview
//!
//! Only load-time and construction-time operations fail. Per-frame work
//! (clip sampling, pose evaluation, clock advance, collision sync) never
//! returns an error: degenerate inputs fall back to bind pose, clamp, or log a
//! warning instead.
//!
//! ```rust,ignore
//! use sinew_core::{Result, SinewError};
//!
//! fn load() -> Result<()> {
//!     Err(SinewError::AssetNotFound("walk".into()))
//! }
//! ```

use thiserror::Error;

/// The main error type for Sinew.
#[derive(Error, Debug)]
pub enum SinewError {
    // ========================================================================
    // Hierarchy Errors
    // ========================================================================
    /// A hierarchy was built with no bones.
    #[error("Bone hierarchy is empty")]
    EmptyHierarchy,

    /// No bone without a parent was found.
    #[error("Bone hierarchy has no root bone")]
    MissingRoot,

    /// More than one bone has no parent.
    #[error("Bone hierarchy has multiple roots: '{first}' and '{second}'")]
    MultipleRoots {
        /// The first root encountered
        first: String,
        /// The second root encountered
        second: String,
    },

    /// A bone references a parent that does not exist.
    #[error("Bone '{bone}' references missing parent '{parent}'")]
    OrphanedBone {
        /// The bone with the dangling parent link
        bone: String,
        /// The parent name or index that could not be resolved
        parent: String,
    },

    /// The parent links contain a cycle.
    #[error("Bone hierarchy contains a cycle through '{0}'")]
    HierarchyCycle(String),

    /// A bone is listed before its parent.
    #[error("Bone '{bone}' (index {index}) precedes its parent (index {parent})")]
    ParentAfterChild {
        /// The offending bone
        bone: String,
        /// Index of the bone
        index: usize,
        /// Index of its parent
        parent: usize,
    },

    /// Two bones share a name.
    #[error("Duplicate bone name '{0}'")]
    DuplicateBone(String),

    // ========================================================================
    // Clip Errors
    // ========================================================================
    /// An animation clip violates its construction invariants.
    #[error("Invalid animation clip '{clip}': {reason}")]
    InvalidClip {
        /// Clip name
        clip: String,
        /// Human-readable description
        reason: String,
    },

    /// A keyframe track violates its construction invariants.
    #[error("Invalid keyframe track: {0}")]
    InvalidTrack(String),

    // ========================================================================
    // Collision Errors
    // ========================================================================
    /// A bone-to-collision-slot mapping is malformed.
    #[error("Invalid collision mapping: {0}")]
    InvalidMapping(String),

    // ========================================================================
    // Asset Errors
    // ========================================================================
    /// The requested asset was not found.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    // ========================================================================
    // Format & Parsing Errors
    // ========================================================================
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl SinewError {
    /// Shorthand for [`SinewError::InvalidClip`].
    pub fn invalid_clip(clip: &str, reason: impl Into<String>) -> Self {
        Self::InvalidClip {
            clip: clip.to_string(),
            reason: reason.into(),
        }
    }
}

/// Alias for `Result<T, SinewError>`.
pub type Result<T> = std::result::Result<T, SinewError>;
