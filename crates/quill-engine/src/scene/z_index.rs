/// Layer for fills. Higher layers paint on top of lower ones and therefore
/// receive higher path IDs.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct ZIndex(pub i32);

impl ZIndex {
    pub const BACKGROUND: ZIndex = ZIndex(-1);
    pub const CONTENT: ZIndex = ZIndex(0);
    pub const OVERLAY: ZIndex = ZIndex(100);

    #[inline]
    pub const fn new(v: i32) -> Self {
        Self(v)
    }

    #[inline]
    pub const fn above(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}
