use std::sync::Arc;

use crate::coords::{StTransform, Vec2};
use crate::paint::Color;
use crate::path::FillRule;
use crate::text::{GlyphStore, PositionedGlyph};

use super::{Scene, ZIndex};

impl Scene {
    /// Records one non-zero fill per glyph.
    ///
    /// Every glyph shares its outline `Arc` with the store, so repeated glyphs
    /// are flattened once per build. `point_size` must be the size the glyphs
    /// were positioned at, multiplied by the same scale.
    pub fn push_glyphs(
        &mut self,
        z: ZIndex,
        store: &GlyphStore,
        glyphs: &[PositionedGlyph],
        point_size: f32,
        color: Color,
    ) {
        let ppu = point_size / store.units_per_em();
        for glyph in glyphs {
            let Some(outline) = store.outline(glyph.glyph_index) else {
                continue;
            };
            if outline.is_empty() {
                continue;
            }
            let transform = StTransform::new(Vec2::new(ppu, -ppu), glyph.origin);
            self.push_fill(z, Arc::clone(outline), color, transform, FillRule::NonZero);
        }
    }
}
