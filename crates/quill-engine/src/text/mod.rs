//! Font loading, glyph outlines and simple paragraph layout.
//!
//! Layout works in pixels at a given point size. Glyph outlines are kept in
//! font units and become scene paths through
//! [`Scene::push_glyphs`](crate::scene::Scene::push_glyphs).

mod codepoints;
mod error;
mod font_system;
mod glyph_store;
mod typesetter;

pub use codepoints::CodepointRanges;
pub use error::TextError;
pub use font_system::{FontId, FontMetrics, FontSystem, LoadedFont};
pub use glyph_store::GlyphStore;
pub use typesetter::{GlyphPosition, PositionedGlyph, Typesetter};
