/// Framebuffer size in physical pixels.
///
/// Uploaded to the vertex stage as an integer pair; screen-space positions are
/// divided by it to reach clip space.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct FramebufferSize {
    pub width: u32,
    pub height: u32,
}

impl FramebufferSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Integer pair as the shader sees it. Zero extents are bumped to 1 so the
    /// clip-space division never hits zero.
    #[inline]
    pub fn to_ivec2(self) -> [i32; 2] {
        [
            self.width.clamp(1, i32::MAX as u32) as i32,
            self.height.clamp(1, i32::MAX as u32) as i32,
        ]
    }
}
