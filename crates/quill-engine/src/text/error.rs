use thiserror::Error;

use super::FontId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TextError {
    #[error("failed to parse font: {0}")]
    FontParse(String),
    #[error("no font loaded for {0:?}")]
    UnknownFont(FontId),
    #[error("font has no glyph for space")]
    NoSpaceGlyph,
}
