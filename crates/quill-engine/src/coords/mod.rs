//! Coordinate and transform types shared by the path pipeline.
//!
//! Canonical CPU space:
//! - Screen pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! Glyph outlines live in font units (+Y up); their per-path `StTransform`
//! flips Y on the way to screen space. The vertex stage converts screen pixels
//! to clip space using the framebuffer size.

mod framebuffer;
mod mat4;
mod rect;
mod st_transform;
mod vec2;

pub use framebuffer::FramebufferSize;
pub use mat4::Mat4;
pub use rect::Rect;
pub use st_transform::StTransform;
pub use vec2::Vec2;
