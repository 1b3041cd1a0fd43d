/// Default row width. Keeps textures well inside every backend's 2D limit
/// while allowing 65536 records in 256 rows.
pub const DEFAULT_MAX_WIDTH: u32 = 256;

/// Texel grid of a data texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct DataTextureLayout {
    pub width: u32,
    pub height: u32,
}

impl DataTextureLayout {
    /// Smallest grid of rows at most `max_width` wide holding `len` records.
    ///
    /// `width = clamp(len, 1, max_width)`, `height = ceil(len / width)`, both
    /// at least 1 so an empty table still binds.
    pub fn for_len(len: usize, max_width: u32) -> Self {
        let max_width = max_width.max(1);
        let width = (len.min(max_width as usize) as u32).max(1);
        let height = (len.div_ceil(width as usize) as u32).max(1);
        Self { width, height }
    }

    #[inline]
    pub fn area(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Texel holding record `index`.
    #[inline]
    pub fn texel_coord(self, index: u32) -> (u32, u32) {
        (index % self.width, index / self.width)
    }

    /// Dimensions as uploaded to the vertex stage.
    #[inline]
    pub fn to_ivec2(self) -> [i32; 2] {
        [self.width as i32, self.height as i32]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_is_one_texel() {
        assert_eq!(DataTextureLayout::for_len(0, 256), DataTextureLayout { width: 1, height: 1 });
    }

    #[test]
    fn short_table_is_one_row() {
        assert_eq!(DataTextureLayout::for_len(17, 256), DataTextureLayout { width: 17, height: 1 });
    }

    #[test]
    fn long_table_wraps_rows() {
        let l = DataTextureLayout::for_len(513, 256);
        assert_eq!(l, DataTextureLayout { width: 256, height: 3 });
        assert!(l.area() >= 513);
    }

    #[test]
    fn full_id_range_fits() {
        let l = DataTextureLayout::for_len(65536, 256);
        assert_eq!((l.width, l.height), (256, 256));
    }

    #[test]
    fn texel_coord_is_row_major() {
        let l = DataTextureLayout { width: 4, height: 3 };
        assert_eq!(l.texel_coord(0), (0, 0));
        assert_eq!(l.texel_coord(5), (1, 1));
        assert_eq!(l.texel_coord(11), (3, 2));
    }

    #[test]
    fn zero_max_width_is_treated_as_one() {
        assert_eq!(DataTextureLayout::for_len(3, 0), DataTextureLayout { width: 1, height: 3 });
    }
}
