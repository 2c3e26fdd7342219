//! Sinew Assets
//!
//! Shared, immutable animation assets.

pub mod cache;
pub mod storage;

pub use cache::{AnimationAssets, ClipHandle, HierarchyHandle};
pub use storage::AssetStorage;
