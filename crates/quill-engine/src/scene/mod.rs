//! Scene (path list) types.
//!
//! Responsibilities:
//! - record fills renderer-agnostically
//! - provide deterministic paint order (z-index + insertion order)
//! - turn the recorded fills into GPU-ready buffers: path IDs, stencil/cover
//!   vertices, and the per-path color and transform data textures

mod buffers;
mod build;
mod glyphs;
mod key;
mod list;
mod z_index;

pub use buffers::{BuildStats, PathDraw, SceneBuffers};
pub use build::BuildOptions;
pub use key::SortKey;
pub use list::{FillCmd, FillItem, Scene};
pub use z_index::ZIndex;
