//! Pointer input in framebuffer pixels.
//!
//! The runtime feeds winit window events into a [`PointerState`] per window
//! and hands the app one [`PointerFrame`] per rendered frame. Coordinates are
//! physical pixels, the same space as the path ID target.

mod pointer;

pub use pointer::{PointerFrame, PointerState};
