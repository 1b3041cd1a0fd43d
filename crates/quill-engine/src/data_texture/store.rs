use super::{DataTextureLayout, DEFAULT_MAX_WIDTH};

/// CPU store for a float4 data texture.
///
/// The texel vector is kept padded to the full grid so it can be uploaded as
/// one contiguous `Rgba32Float` image.
#[derive(Debug, Clone)]
pub struct DataTexture {
    texels: Vec<[f32; 4]>,
    len: usize,
    max_width: u32,
    layout: DataTextureLayout,
}

impl DataTexture {
    pub fn new() -> Self {
        Self::with_max_width(DEFAULT_MAX_WIDTH)
    }

    pub fn with_max_width(max_width: u32) -> Self {
        let layout = DataTextureLayout::for_len(0, max_width);
        Self {
            texels: vec![[0.0; 4]; layout.area()],
            len: 0,
            max_width,
            layout,
        }
    }

    /// Store sized for `len` records, all zero.
    pub fn with_len(len: usize) -> Self {
        let mut t = Self::new();
        t.resize(len);
        t
    }

    /// Number of records (not texels; the grid may be padded).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn layout(&self) -> DataTextureLayout {
        self.layout
    }

    /// Writes record `index`, growing the table as needed.
    pub fn set(&mut self, index: usize, value: [f32; 4]) {
        if index >= self.len {
            self.resize(index + 1);
        }
        let (x, y) = self.layout.texel_coord(index as u32);
        let slot = y as usize * self.layout.width as usize + x as usize;
        self.texels[slot] = value;
    }

    pub fn get(&self, index: usize) -> Option<[f32; 4]> {
        if index >= self.len {
            return None;
        }
        Some(self.fetch(index as i32))
    }

    /// Shader-equivalent read of record `index` against this store's layout.
    #[inline]
    pub fn fetch(&self, index: i32) -> [f32; 4] {
        fetch_float4(&self.texels, index, self.layout.to_ivec2())
    }

    /// Texels, row-major, padded to the full grid.
    #[inline]
    pub fn texels(&self) -> &[[f32; 4]] {
        &self.texels
    }

    /// Raw texel bytes, row-major, padded to the full grid.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }

    /// Drops all records but keeps the allocation.
    pub fn clear(&mut self) {
        self.len = 0;
        self.layout = DataTextureLayout::for_len(0, self.max_width);
        self.texels.clear();
        self.texels.resize(self.layout.area(), [0.0; 4]);
    }

    fn resize(&mut self, len: usize) {
        let new_layout = DataTextureLayout::for_len(len, self.max_width);
        if new_layout != self.layout {
            // Re-address existing records into the new grid.
            let mut texels = vec![[0.0; 4]; new_layout.area()];
            for i in 0..self.len {
                let (ox, oy) = self.layout.texel_coord(i as u32);
                let (nx, ny) = new_layout.texel_coord(i as u32);
                texels[ny as usize * new_layout.width as usize + nx as usize] =
                    self.texels[oy as usize * self.layout.width as usize + ox as usize];
            }
            self.texels = texels;
            self.layout = new_layout;
        }
        self.len = len;
    }
}

impl Default for DataTexture {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads record `index` from row-major `texels` with `dims = (width, height)`.
///
/// Mirrors the vertex stage's fetch: texel `(index % width, index / width)`,
/// and anything outside the grid reads as zero like a robust texture load.
pub fn fetch_float4(texels: &[[f32; 4]], index: i32, dims: [i32; 2]) -> [f32; 4] {
    let [w, h] = dims;
    if index < 0 || w <= 0 || h <= 0 {
        return [0.0; 4];
    }
    let (x, y) = (index % w, index / w);
    if y >= h {
        return [0.0; 4];
    }
    texels
        .get(y as usize * w as usize + x as usize)
        .copied()
        .unwrap_or([0.0; 4])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_fetch() {
        let mut t = DataTexture::new();
        t.set(3, [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(t.len(), 4);
        assert_eq!(t.fetch(3), [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(t.get(0), Some([0.0; 4]));
        assert_eq!(t.get(4), None);
    }

    #[test]
    fn growth_preserves_records_across_relayout() {
        let mut t = DataTexture::with_max_width(4);
        for i in 0..3 {
            t.set(i, [i as f32; 4]);
        }
        assert_eq!(t.layout(), DataTextureLayout { width: 3, height: 1 });

        t.set(9, [9.0; 4]);
        assert_eq!(t.layout(), DataTextureLayout { width: 4, height: 3 });
        for i in 0..3 {
            assert_eq!(t.fetch(i), [i as f32; 4]);
        }
        assert_eq!(t.fetch(9), [9.0; 4]);
    }

    #[test]
    fn bytes_cover_padded_grid() {
        let mut t = DataTexture::with_max_width(4);
        t.set(4, [1.0; 4]);
        assert_eq!(t.as_bytes().len(), t.layout().area() * 16);
    }

    #[test]
    fn out_of_range_fetch_is_zero() {
        let t = DataTexture::with_len(2);
        assert_eq!(t.fetch(-1), [0.0; 4]);
        assert_eq!(t.fetch(100), [0.0; 4]);
        assert_eq!(fetch_float4(&[], 0, [0, 0]), [0.0; 4]);
    }

    #[test]
    fn clear_resets_layout() {
        let mut t = DataTexture::new();
        t.set(300, [1.0; 4]);
        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.layout(), DataTextureLayout { width: 1, height: 1 });
    }
}
