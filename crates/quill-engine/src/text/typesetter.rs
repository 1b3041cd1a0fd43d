//! Simple left-to-right text layout.
//!
//! Words are separated by whitespace and wrapped at a fixed page width.
//! There is no shaping beyond per-pair kerning, no bidi, and no control over
//! line spacing beyond what the font reports.

use crate::coords::{Rect, Vec2};

use super::{FontId, FontMetrics, FontSystem, GlyphStore, TextError};

/// A glyph placed on the page. `x`/`y` are the baseline pen position in
/// pixels at the point size used for layout.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlyphPosition {
    pub x: f32,
    pub y: f32,
    pub glyph_id: u16,
}

impl GlyphPosition {
    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// A glyph that survived culling, snapped for rendering.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PositionedGlyph {
    /// Whole-pixel bounds on the page.
    pub bounds: Rect,
    /// Snapped baseline pen position. `x` is a multiple of the subpixel
    /// granularity, `y` a whole pixel.
    pub origin: Vec2,
    /// Fractional part of `origin.x`, in `[0, 1)`.
    pub subpixel_x: f32,
    pub glyph_index: u16,
}

#[derive(Debug, Clone)]
pub struct Typesetter {
    glyph_positions: Vec<GlyphPosition>,
    page_width: f32,
    cursor: Vec2,
    line_has_word: bool,
}

impl Typesetter {
    /// Starts the first baseline one ascent below the top of the page.
    pub fn new<F: FontMetrics + ?Sized>(page_width: f32, font: &F, point_size: f32) -> Self {
        let ppu = point_size / font.units_per_em();
        Self {
            glyph_positions: Vec::new(),
            page_width,
            cursor: Vec2::new(0.0, font.ascent() * ppu),
            line_has_word: false,
        }
    }

    /// Lays out `text` after whatever was added before. `\n` forces a line
    /// break; other whitespace collapses to one space advance.
    pub fn add_text<F: FontMetrics + ?Sized>(
        &mut self,
        font: &F,
        point_size: f32,
        text: &str,
    ) -> Result<(), TextError> {
        let ppu = point_size / font.units_per_em();
        let space = font.glyph_id(' ');
        if space == 0 {
            return Err(TextError::NoSpaceGlyph);
        }
        let space_advance = font.advance(space) * ppu;
        let line_spacing = (font.ascent() - font.descent() + font.line_gap()) * ppu;

        let mut glyphs: Vec<(u16, f32)> = Vec::new();
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.new_line(line_spacing);
            }

            for word in line.split_whitespace() {
                shape_word(font, word, ppu, &mut glyphs);
                let total_advance: f32 = glyphs.iter().map(|&(_, adv)| adv).sum();

                if self.line_has_word && self.cursor.x + total_advance > self.page_width {
                    self.new_line(line_spacing);
                }

                for &(glyph_id, advance) in &glyphs {
                    self.glyph_positions.push(GlyphPosition {
                        x: self.cursor.x,
                        y: self.cursor.y,
                        glyph_id,
                    });
                    self.cursor.x += advance;
                }

                self.cursor.x += space_advance;
                self.line_has_word = true;
            }
        }
        Ok(())
    }

    #[inline]
    pub fn glyph_positions(&self) -> &[GlyphPosition] {
        &self.glyph_positions
    }

    /// Current pen position; the next word starts here.
    #[inline]
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Outlines for every glyph laid out so far.
    pub fn create_glyph_store(&self, fonts: &FontSystem, font: FontId) -> Result<GlyphStore, TextError> {
        let font = fonts.font(font)?;
        GlyphStore::from_glyph_ids(self.glyph_positions.iter().map(|g| g.glyph_id), font)
    }

    /// Glyphs whose pixel bounds intersect `bounding_rect`, snapped for
    /// rendering at `scale` (device pixels per layout pixel).
    ///
    /// Glyphs missing from `glyph_store` or without an outline are skipped.
    pub fn positioned_glyphs_in_rect(
        &self,
        bounding_rect: Rect,
        glyph_store: &GlyphStore,
        point_size: f32,
        scale: f32,
        subpixel_granularity: f32,
    ) -> Vec<PositionedGlyph> {
        let granularity = if subpixel_granularity > 0.0 { subpixel_granularity } else { 1.0 };
        let inv_granularity = 1.0 / granularity;

        let mut positioned = Vec::new();
        for glyph in &self.glyph_positions {
            let Some(glyph_index) = glyph_store.glyph_index(glyph.glyph_id) else {
                continue;
            };
            let Some(bounds) = glyph_store.glyph_bounds_px(glyph_index, point_size) else {
                continue;
            };
            let bounds = Rect::from_min_max(bounds.min() * scale, bounds.max() * scale);

            let origin = Vec2::new(
                (glyph.x * scale * inv_granularity).round() * granularity,
                (glyph.y * scale).round(),
            );
            let pixel_bounds = Rect::from_min_max(bounds.min() + origin, bounds.max() + origin).round_out();

            if !pixel_bounds.intersects(bounding_rect) {
                continue;
            }

            positioned.push(PositionedGlyph {
                bounds: pixel_bounds,
                origin,
                subpixel_x: origin.x.rem_euclid(1.0),
                glyph_index,
            });
        }
        positioned
    }

    fn new_line(&mut self, line_spacing: f32) {
        self.cursor.x = 0.0;
        self.cursor.y += line_spacing;
        self.line_has_word = false;
    }
}

/// Glyph IDs of `word` with kerned advances in pixels.
fn shape_word<F: FontMetrics + ?Sized>(font: &F, word: &str, ppu: f32, out: &mut Vec<(u16, f32)>) {
    out.clear();
    let ids: Vec<u16> = word.chars().map(|ch| font.glyph_id(ch)).collect();
    for (i, &id) in ids.iter().enumerate() {
        let kern = ids.get(i + 1).map_or(0.0, |&next| font.kern(id, next));
        out.push((id, (font.advance(id) + kern) * ppu));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::path::Path;
    use crate::text::glyph_store::tests::box_glyph;

    /// Monospace ASCII font: 1000 upem, 500 advance, `AV` kerned by -100.
    pub(crate) struct MonoFont;

    impl FontMetrics for MonoFont {
        fn units_per_em(&self) -> f32 {
            1000.0
        }
        fn ascent(&self) -> f32 {
            800.0
        }
        fn descent(&self) -> f32 {
            -200.0
        }
        fn line_gap(&self) -> f32 {
            0.0
        }
        fn glyph_id(&self, ch: char) -> u16 {
            if ch.is_ascii() { ch as u16 } else { 0 }
        }
        fn advance(&self, _glyph_id: u16) -> f32 {
            500.0
        }
        fn kern(&self, left: u16, right: u16) -> f32 {
            if (left, right) == ('A' as u16, 'V' as u16) { -100.0 } else { 0.0 }
        }
    }

    fn xs(t: &Typesetter) -> Vec<f32> {
        t.glyph_positions().iter().map(|g| g.x).collect()
    }

    #[test]
    fn starts_one_ascent_down() {
        let t = Typesetter::new(100.0, &MonoFont, 10.0);
        assert_eq!(t.cursor(), Vec2::new(0.0, 8.0));
    }

    #[test]
    fn words_advance_with_space() {
        let mut t = Typesetter::new(100.0, &MonoFont, 10.0);
        t.add_text(&MonoFont, 10.0, "ab cd").unwrap();
        assert_eq!(xs(&t), vec![0.0, 5.0, 15.0, 20.0]);
        assert!(t.glyph_positions().iter().all(|g| g.y == 8.0));
    }

    #[test]
    fn kerning_pulls_pairs_together() {
        let mut t = Typesetter::new(100.0, &MonoFont, 10.0);
        t.add_text(&MonoFont, 10.0, "AVA").unwrap();
        assert_eq!(xs(&t), vec![0.0, 4.0, 9.0]);
    }

    #[test]
    fn long_word_wraps_to_next_line() {
        let mut t = Typesetter::new(12.0, &MonoFont, 10.0);
        t.add_text(&MonoFont, 10.0, "ab cd").unwrap();
        let g = t.glyph_positions();
        assert_eq!((g[2].x, g[2].y), (0.0, 18.0));
    }

    #[test]
    fn first_word_on_a_line_never_wraps() {
        let mut t = Typesetter::new(4.0, &MonoFont, 10.0);
        t.add_text(&MonoFont, 10.0, "abcdef").unwrap();
        assert!(t.glyph_positions().iter().all(|g| g.y == 8.0));
    }

    #[test]
    fn newline_breaks_the_line() {
        let mut t = Typesetter::new(1000.0, &MonoFont, 10.0);
        t.add_text(&MonoFont, 10.0, "a\nb").unwrap();
        let g = t.glyph_positions();
        assert_eq!((g[1].x, g[1].y), (0.0, 18.0));
    }

    #[test]
    fn missing_space_glyph_is_an_error() {
        struct NoSpace;
        impl FontMetrics for NoSpace {
            fn units_per_em(&self) -> f32 { 1000.0 }
            fn ascent(&self) -> f32 { 800.0 }
            fn descent(&self) -> f32 { -200.0 }
            fn line_gap(&self) -> f32 { 0.0 }
            fn glyph_id(&self, _ch: char) -> u16 { 0 }
            fn advance(&self, _glyph_id: u16) -> f32 { 0.0 }
            fn kern(&self, _left: u16, _right: u16) -> f32 { 0.0 }
        }
        let mut t = Typesetter::new(100.0, &NoSpace, 10.0);
        assert_eq!(t.add_text(&NoSpace, 10.0, "x"), Err(TextError::NoSpaceGlyph));
    }

    fn store() -> GlyphStore {
        GlyphStore::from_outlines(1000.0, [('A' as u16, box_glyph()), (' ' as u16, Path::default())])
    }

    #[test]
    fn positioned_glyphs_cull_and_snap() {
        let mut t = Typesetter::new(100.0, &MonoFont, 10.0);
        t.add_text(&MonoFont, 10.0, "A A B").unwrap();
        let store = store();

        let all = t.positioned_glyphs_in_rect(Rect::new(0.0, 0.0, 100.0, 100.0), &store, 10.0, 1.0, 0.25);
        // 'B' is not in the store.
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].origin, Vec2::new(0.0, 8.0));
        assert_eq!(all[0].bounds, Rect::new(0.0, 1.0, 5.0, 7.0));
        assert_eq!(all[1].origin.x, 10.0);

        let left = t.positioned_glyphs_in_rect(Rect::new(0.0, 0.0, 4.0, 100.0), &store, 10.0, 1.0, 0.25);
        assert_eq!(left.len(), 1);
    }

    #[test]
    fn subpixel_offset_follows_granule() {
        let mut t = Typesetter::new(100.0, &MonoFont, 10.0);
        t.glyph_positions.push(GlyphPosition { x: 0.3, y: 8.4, glyph_id: 'A' as u16 });
        let store = store();
        let g = t.positioned_glyphs_in_rect(Rect::new(0.0, 0.0, 100.0, 100.0), &store, 10.0, 1.0, 0.25);
        assert_eq!(g[0].origin, Vec2::new(0.25, 8.0));
        assert_eq!(g[0].subpixel_x, 0.25);
    }

    #[test]
    fn scale_multiplies_positions() {
        let mut t = Typesetter::new(100.0, &MonoFont, 10.0);
        t.add_text(&MonoFont, 10.0, "A").unwrap();
        let g = t.positioned_glyphs_in_rect(Rect::new(0.0, 0.0, 100.0, 100.0), &store(), 10.0, 2.0, 1.0);
        assert_eq!(g[0].origin, Vec2::new(0.0, 16.0));
        assert_eq!(g[0].bounds, Rect::new(0.0, 2.0, 10.0, 14.0));
    }

    #[test]
    fn lays_out_a_real_font() {
        let mut fonts = FontSystem::new();
        let id = fonts.load_font(crate::text::glyph_store::tests::CANTARELL).unwrap();
        let font = fonts.font(id).unwrap();

        let mut t = Typesetter::new(1000.0, font, 20.0);
        t.add_text(font, 20.0, "HA H").unwrap();
        let xs = xs(&t);
        assert_eq!(xs.len(), 3);
        assert!(xs.windows(2).all(|w| w[0] < w[1]), "{xs:?}");
        // "H" advances 740 units: 14.8 px at 20 px/em.
        assert!((xs[1] - 14.8).abs() < 0.01, "{xs:?}");

        let store = t.create_glyph_store(&fonts, id).unwrap();
        assert_eq!(store.len(), 2);
        let placed = t.positioned_glyphs_in_rect(Rect::new(0.0, 0.0, 1000.0, 100.0), &store, 20.0, 1.0, 0.25);
        assert_eq!(placed.len(), 3);
        let baseline = (font.ascent() * 20.0 / 1000.0).round();
        assert!(placed.iter().all(|g| g.origin.y == baseline));
        assert!(placed.iter().all(|g| g.bounds.max().y <= baseline));
    }
}
