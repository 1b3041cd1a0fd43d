//! Quill engine crate.
//!
//! GPU vector path rendering: paths are flattened on the CPU, filled with a
//! stencil-then-cover scheme, and ordered by per-path depth. Each vertex
//! carries a path ID that the vertex stage uses to fetch the path's color and
//! transform from float data textures.
//!
//! This crate also owns the platform + GPU runtime pieces the viewer uses.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod data_texture;
pub mod paint;
pub mod path;
pub mod render;
pub mod scene;
pub mod text;
pub mod vertex;
