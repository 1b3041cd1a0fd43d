use super::TextError;

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// What layout needs from a font. All values are in font units.
///
/// Glyph ID 0 is `.notdef`, returned for characters the font lacks.
pub trait FontMetrics {
    fn units_per_em(&self) -> f32;
    /// Distance from baseline to the top of the line, positive.
    fn ascent(&self) -> f32;
    /// Distance from baseline to the bottom of the line, negative.
    fn descent(&self) -> f32;
    fn line_gap(&self) -> f32;
    fn glyph_id(&self, ch: char) -> u16;
    fn advance(&self, glyph_id: u16) -> f32;
    fn kern(&self, left: u16, right: u16) -> f32;
}

/// A parsed font.
///
/// The raw bytes are kept for outline extraction; `fontdue` answers metric
/// and kerning queries.
pub struct LoadedFont {
    bytes: Vec<u8>,
    metrics: fontdue::Font,
    line: fontdue::LineMetrics,
}

impl LoadedFont {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, TextError> {
        let bytes = bytes.into();
        let metrics = fontdue::Font::from_bytes(bytes.as_slice(), fontdue::FontSettings::default())
            .map_err(|e| TextError::FontParse(e.to_string()))?;

        // Querying at px = units_per_em yields font units.
        let line = metrics
            .horizontal_line_metrics(metrics.units_per_em())
            .ok_or_else(|| TextError::FontParse("missing horizontal line metrics".into()))?;

        Ok(Self { bytes, metrics, line })
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn fontdue(&self) -> &fontdue::Font {
        &self.metrics
    }
}

impl FontMetrics for LoadedFont {
    fn units_per_em(&self) -> f32 {
        self.metrics.units_per_em()
    }

    fn ascent(&self) -> f32 {
        self.line.ascent
    }

    fn descent(&self) -> f32 {
        self.line.descent
    }

    fn line_gap(&self) -> f32 {
        self.line.line_gap
    }

    fn glyph_id(&self, ch: char) -> u16 {
        self.metrics.lookup_glyph_index(ch)
    }

    fn advance(&self, glyph_id: u16) -> f32 {
        self.metrics
            .metrics_indexed(glyph_id, self.metrics.units_per_em())
            .advance_width
    }

    fn kern(&self, left: u16, right: u16) -> f32 {
        self.metrics
            .horizontal_kern_indexed(left, right, self.metrics.units_per_em())
            .unwrap_or(0.0)
    }
}

impl std::fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedFont")
            .field("bytes", &self.bytes.len())
            .field("units_per_em", &self.metrics.units_per_em())
            .field("glyphs", &self.metrics.glyph_count())
            .finish()
    }
}

/// Owns a collection of loaded fonts.
///
/// Fonts are immutable after loading.
#[derive(Debug, Default)]
pub struct FontSystem {
    fonts: Vec<LoadedFont>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes.
    pub fn load_font(&mut self, bytes: impl Into<Vec<u8>>) -> Result<FontId, TextError> {
        let font = LoadedFont::from_bytes(bytes)?;
        let id = FontId(self.fonts.len());
        log::debug!("loaded font {:?}: {:?}", id, font);
        self.fonts.push(font);
        Ok(id)
    }

    pub fn get(&self, id: FontId) -> Option<&LoadedFont> {
        self.fonts.get(id.0)
    }

    /// Like [`get`](Self::get) but reports an unknown ID as an error.
    pub fn font(&self, id: FontId) -> Result<&LoadedFont, TextError> {
        self.get(id).ok_or(TextError::UnknownFont(id))
    }
}
