//! Data textures: per-path float4 records addressed by path ID.
//!
//! A data texture is a lookup table, not an image. Record `i` lives at texel
//! `(i % width, i / width)`; the vertex stage reads it with an integer load.
//! This module owns the CPU-side store and addressing; the GPU upload lives in
//! `render::GpuDataTexture`.

mod layout;
mod store;

pub use layout::{DataTextureLayout, DEFAULT_MAX_WIDTH};
pub use store::{fetch_float4, DataTexture};
