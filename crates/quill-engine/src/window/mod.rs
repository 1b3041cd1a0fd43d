//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the window, wires them to the GPU layer,
//! and routes pointer events into [`crate::input`].

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
