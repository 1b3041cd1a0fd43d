//! Fill colors.
//!
//! Path fills are solid: one premultiplied color per path ID, stored in the
//! color data texture and fetched by the vertex stage.

pub mod color;

pub use color::Color;
