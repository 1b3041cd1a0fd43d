use std::sync::Arc;

use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::{FontRef, GlyphId, MetadataProvider};

use crate::coords::{Rect, Vec2};
use crate::path::{Path, PathBuilder, PathEl};

use super::{CodepointRanges, FontMetrics, LoadedFont, TextError};

/// Table marker for glyph IDs not in the store. Wider than any dense index,
/// so a store may hold all 65536 glyph IDs.
const ABSENT: u32 = u32::MAX;

/// Glyph outlines for a set of glyph IDs, addressed by dense glyph index.
///
/// Outlines stay in font units with Y up; scene code scales them with
/// `(ppu, -ppu)` so one `Arc<Path>` serves every size and position.
#[derive(Debug, Clone, Default)]
pub struct GlyphStore {
    units_per_em: f32,
    outlines: Vec<Arc<Path>>,
    bounds: Vec<Option<Rect>>,
    glyph_ids: Vec<u16>,
    glyph_id_to_index: Vec<u32>,
}

impl GlyphStore {
    /// Extracts unhinted outlines for `glyph_ids` (deduplicated). Glyphs
    /// without outlines, like space, get an empty path.
    pub fn from_glyph_ids(
        glyph_ids: impl IntoIterator<Item = u16>,
        font: &LoadedFont,
    ) -> Result<Self, TextError> {
        let font_ref = FontRef::new(font.bytes()).map_err(|e| TextError::FontParse(e.to_string()))?;
        let outlines = font_ref.outline_glyphs();

        let mut ids: Vec<u16> = glyph_ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();

        let paths = ids.into_iter().map(|id| {
            let mut pen = PathPen::default();
            if let Some(glyph) = outlines.get(GlyphId::new(u32::from(id))) {
                let settings = DrawSettings::unhinted(Size::unscaled(), LocationRef::default());
                if let Err(e) = glyph.draw(settings, &mut pen) {
                    log::warn!("glyph {id}: outline failed: {e}");
                    pen = PathPen::default();
                }
            }
            (id, pen.builder.build())
        });

        Ok(Self::from_outlines(font.units_per_em(), paths))
    }

    /// Maps every code point in `codepoints` through the font's cmap and
    /// stores the resulting glyphs. Unmapped characters contribute `.notdef`.
    pub fn from_codepoints(codepoints: &CodepointRanges, font: &LoadedFont) -> Result<Self, TextError> {
        let ids: Vec<u16> = codepoints.chars().map(|ch| font.glyph_id(ch)).collect();
        Self::from_glyph_ids(ids, font)
    }

    /// Builds a store from outlines already in font units. Later duplicates
    /// of a glyph ID are ignored.
    pub fn from_outlines(units_per_em: f32, outlines: impl IntoIterator<Item = (u16, Path)>) -> Self {
        let mut entries: Vec<(u16, Path)> = outlines.into_iter().collect();
        entries.sort_by_key(|(id, _)| *id);
        entries.dedup_by_key(|(id, _)| *id);

        let table_len = entries.last().map_or(0, |(id, _)| usize::from(*id) + 1);
        let mut store = Self {
            units_per_em,
            outlines: Vec::with_capacity(entries.len()),
            bounds: Vec::with_capacity(entries.len()),
            glyph_ids: Vec::with_capacity(entries.len()),
            glyph_id_to_index: vec![ABSENT; table_len],
        };

        for (index, (id, path)) in entries.into_iter().enumerate() {
            store.glyph_id_to_index[usize::from(id)] = index as u32;
            store.bounds.push(control_bounds(&path));
            store.outlines.push(Arc::new(path));
            store.glyph_ids.push(id);
        }
        store
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.outlines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.outlines.is_empty()
    }

    #[inline]
    pub fn units_per_em(&self) -> f32 {
        self.units_per_em
    }

    pub fn glyph_index(&self, glyph_id: u16) -> Option<u16> {
        match self.glyph_id_to_index.get(usize::from(glyph_id)) {
            None | Some(&ABSENT) => None,
            Some(&index) => u16::try_from(index).ok(),
        }
    }

    pub fn glyph_id(&self, index: u16) -> Option<u16> {
        self.glyph_ids.get(usize::from(index)).copied()
    }

    /// Shared outline in font units, Y up.
    pub fn outline(&self, index: u16) -> Option<&Arc<Path>> {
        self.outlines.get(usize::from(index))
    }

    /// Outline bounds in pixels at `point_size`, relative to the baseline
    /// origin with Y down. `None` for unknown or empty glyphs.
    pub fn glyph_bounds_px(&self, index: u16, point_size: f32) -> Option<Rect> {
        let b = (*self.bounds.get(usize::from(index))?)?;
        let ppu = point_size / self.units_per_em;
        let (min, max) = (b.min(), b.max());
        Some(Rect::from_min_max(
            Vec2::new(min.x * ppu, -max.y * ppu),
            Vec2::new(max.x * ppu, -min.y * ppu),
        ))
    }
}

/// Bounds of all on- and off-curve points; never smaller than the outline.
fn control_bounds(path: &Path) -> Option<Rect> {
    let points = path.elements().iter().flat_map(|el| {
        let pts: [Option<Vec2>; 3] = match *el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => [Some(p), None, None],
            PathEl::QuadTo(c, p) => [Some(c), Some(p), None],
            PathEl::CubicTo(c0, c1, p) => [Some(c0), Some(c1), Some(p)],
            PathEl::Close => [None, None, None],
        };
        pts.into_iter().flatten()
    });
    Rect::from_points(points)
}

#[derive(Default)]
struct PathPen {
    builder: PathBuilder,
}

impl OutlinePen for PathPen {
    #[inline]
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(x, y);
    }

    #[inline]
    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(x, y);
    }

    #[inline]
    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.builder.quad_to(cx0, cy0, x, y);
    }

    #[inline]
    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.builder.cubic_to(cx0, cy0, cx1, cy1, x, y);
    }

    #[inline]
    fn close(&mut self) {
        self.builder.close();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// SIL OFL 1.1; see `testdata/README.md`.
    pub(crate) const CANTARELL: &[u8] = include_bytes!("../../testdata/Cantarell-Regular.ttf");

    /// 500x700 font-unit box standing on the baseline.
    pub(crate) fn box_glyph() -> Path {
        Path::rect(Rect::new(0.0, 0.0, 500.0, 700.0))
    }

    #[test]
    fn ids_map_to_dense_indices() {
        let store = GlyphStore::from_outlines(
            1000.0,
            [(70, box_glyph()), (3, Path::default()), (70, Path::default())],
        );
        assert_eq!(store.len(), 2);
        assert_eq!(store.glyph_index(3), Some(0));
        assert_eq!(store.glyph_index(70), Some(1));
        assert_eq!(store.glyph_index(4), None);
        assert_eq!(store.glyph_index(500), None);
        assert_eq!(store.glyph_id(1), Some(70));
        // First occurrence wins.
        assert!(!store.outline(1).unwrap().is_empty());
    }

    #[test]
    fn pixel_bounds_flip_to_y_down() {
        let store = GlyphStore::from_outlines(1000.0, [(1, box_glyph())]);
        let b = store.glyph_bounds_px(0, 10.0).unwrap();
        assert_eq!(b, Rect::new(0.0, -7.0, 5.0, 7.0));
    }

    #[test]
    fn empty_glyph_has_no_bounds() {
        let store = GlyphStore::from_outlines(1000.0, [(32, Path::default())]);
        assert!(store.glyph_bounds_px(0, 12.0).is_none());
        assert!(store.glyph_bounds_px(9, 12.0).is_none());
    }

    #[test]
    fn every_glyph_id_can_be_stored() {
        let store = GlyphStore::from_outlines(1000.0, (0..=u16::MAX).map(|id| (id, Path::default())));
        assert_eq!(store.len(), 65536);
        assert_eq!(store.glyph_index(0), Some(0));
        assert_eq!(store.glyph_index(u16::MAX), Some(u16::MAX));
        assert_eq!(store.glyph_id(u16::MAX), Some(u16::MAX));
    }

    #[test]
    fn real_font_outlines() {
        let font = LoadedFont::from_bytes(CANTARELL).unwrap();
        let h = font.glyph_id('H');
        let space = font.glyph_id(' ');
        assert_ne!(h, 0);
        assert_ne!(space, 0);

        let store = GlyphStore::from_glyph_ids([h, space, h], &font).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.units_per_em(), 1000.0);

        let h_index = store.glyph_index(h).unwrap();
        let space_index = store.glyph_index(space).unwrap();
        assert!(!store.outline(h_index).unwrap().is_empty());
        assert!(store.outline(space_index).unwrap().is_empty());
        assert!(store.glyph_bounds_px(space_index, 10.0).is_none());

        // "H" stands on the baseline and rises about 0.69 em.
        let b = store.glyph_bounds_px(h_index, 10.0).unwrap();
        assert!(b.max().y.abs() < 1e-3, "{b:?}");
        assert!((b.min().y + 6.92).abs() < 0.05, "{b:?}");
        assert!(b.min().x > 0.0 && b.max().x < 7.4, "{b:?}");
    }

    #[test]
    fn codepoints_map_through_the_cmap() {
        let font = LoadedFont::from_bytes(CANTARELL).unwrap();
        let store = GlyphStore::from_codepoints(&CodepointRanges::from_text("AHa"), &font).unwrap();
        assert_eq!(store.len(), 3);
        for ch in ['A', 'H', 'a'] {
            let index = store.glyph_index(font.glyph_id(ch)).unwrap();
            assert!(!store.outline(index).unwrap().is_empty(), "{ch}");
        }
    }

    #[test]
    fn pen_builds_closed_contours() {
        let mut pen = PathPen::default();
        pen.move_to(0.0, 0.0);
        pen.quad_to(5.0, 10.0, 10.0, 0.0);
        pen.close();
        let path = pen.builder.build();
        assert_eq!(path.elements().len(), 3);
        assert_eq!(path.elements()[2], PathEl::Close);
    }
}
