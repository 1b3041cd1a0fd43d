use std::num::NonZeroU16;

use super::PathError;

/// Largest valid path ID. ID 0 is reserved for "no path" (background).
pub const MAX_PATH_ID: u16 = u16::MAX;

/// Identifies one path's record in the shared data textures.
///
/// The ID doubles as the texel index into the color and transform data
/// textures, as the draw-order rank (higher IDs paint on top), and as the
/// value written to the ID target for picking.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PathId(NonZeroU16);

impl PathId {
    /// Returns `None` for the reserved ID 0.
    #[inline]
    pub const fn new(id: u16) -> Option<Self> {
        match NonZeroU16::new(id) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    #[inline]
    pub const fn get(self) -> u16 {
        self.0.get()
    }

    /// Texel index into the per-path data textures.
    #[inline]
    pub const fn index(self) -> usize {
        self.0.get() as usize
    }

    /// Per-vertex attribute encoding. Exact for every `u16`.
    #[inline]
    pub fn as_f32(self) -> f32 {
        f32::from(self.get())
    }

    /// Two-channel packing written by the ID pass: low byte, high byte, each
    /// normalized to `[0, 1]`.
    #[inline]
    pub fn pack(self) -> [f32; 2] {
        pack_path_index(u32::from(self.get()))
    }

    /// Inverse of [`pack`](Self::pack) applied to the bytes read back from an
    /// `Rg8Unorm` target. Background texels (0, 0) yield `None`.
    #[inline]
    pub fn unpack(texel: [u8; 2]) -> Option<Self> {
        Self::new(u16::from_le_bytes(texel))
    }
}

/// Packing used by both the CPU reference and the shader. Indices past
/// `u16::MAX` wrap in the high byte just like the 8-bit target would.
#[inline]
pub(crate) fn pack_path_index(index: u32) -> [f32; 2] {
    [
        (index & 0xff) as f32 / 255.0,
        ((index >> 8) & 0xff) as f32 / 255.0,
    ]
}

/// Hands out path IDs in ascending order, starting at 1.
///
/// IDs are scene-scoped: a rebuilt scene calls [`reset`](Self::reset) and
/// starts numbering again, which keeps data textures dense.
#[derive(Debug, Clone)]
pub struct PathIdAllocator {
    next: u32,
}

impl PathIdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn allocate(&mut self) -> Result<PathId, PathError> {
        let id = u16::try_from(self.next)
            .ok()
            .and_then(PathId::new)
            .ok_or(PathError::IdsExhausted(self.allocated()))?;
        self.next += 1;
        Ok(id)
    }

    /// Number of IDs handed out since the last reset.
    #[inline]
    pub fn allocated(&self) -> u32 {
        self.next - 1
    }

    /// Smallest texel count able to hold every allocated ID (index 0 included).
    #[inline]
    pub fn texel_count(&self) -> usize {
        self.next as usize
    }

    pub fn reset(&mut self) {
        self.next = 1;
    }
}

impl Default for PathIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_reserved() {
        assert!(PathId::new(0).is_none());
        assert_eq!(PathId::new(7).map(PathId::get), Some(7));
    }

    #[test]
    fn allocator_is_sequential_from_one() {
        let mut alloc = PathIdAllocator::new();
        let ids: Vec<u16> = (0..3).map(|_| alloc.allocate().map(PathId::get).unwrap()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(alloc.allocated(), 3);
        assert_eq!(alloc.texel_count(), 4);

        alloc.reset();
        assert_eq!(alloc.allocate().map(PathId::get), Ok(1));
    }

    #[test]
    fn allocator_exhausts_after_max() {
        let mut alloc = PathIdAllocator::new();
        for _ in 0..MAX_PATH_ID {
            alloc.allocate().unwrap();
        }
        assert_eq!(alloc.allocate(), Err(PathError::IdsExhausted(u32::from(MAX_PATH_ID))));
    }

    #[test]
    fn pack_splits_low_and_high_bytes() {
        let id = PathId::new(0x1234).unwrap();
        assert_eq!(id.pack(), [0x34 as f32 / 255.0, 0x12 as f32 / 255.0]);
    }

    #[test]
    fn unpack_inverts_pack_through_bytes() {
        for raw in [1u16, 255, 256, 0xabcd, MAX_PATH_ID] {
            let id = PathId::new(raw).unwrap();
            let [lo, hi] = id.pack();
            let texel = [(lo * 255.0).round() as u8, (hi * 255.0).round() as u8];
            assert_eq!(PathId::unpack(texel), Some(id));
        }
        assert_eq!(PathId::unpack([0, 0]), None);
    }

    #[test]
    fn attribute_encoding_is_exact() {
        let id = PathId::new(MAX_PATH_ID).unwrap();
        assert_eq!(id.as_f32() as u16, MAX_PATH_ID);
    }
}
