/// Linear premultiplied RGBA color.
///
/// Invariant:
/// - `rgb` components are multiplied by `a` (premultiplied alpha).
///
/// The color data texture stores this representation directly and the cover
/// pass blends with `One, OneMinusSrcAlpha`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::from_premul(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::from_premul(1.0, 1.0, 1.0, 1.0);

    #[inline]
    pub const fn transparent() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 }
    }

    /// Creates a premultiplied color from straight bytes (`0`–`255`).
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_straight(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    /// Parses `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        if !(s.len() == 6 || s.len() == 8) || !s.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
        let a = if s.len() == 8 { byte(6)? } else { 255 };
        Some(Self::from_srgb_u8(byte(0)?, byte(2)?, byte(4)?, a))
    }

    /// Creates a premultiplied color from premultiplied components.
    #[inline]
    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a premultiplied color from straight alpha components.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: (r.clamp(0.0, 1.0)) * a,
            g: (g.clamp(0.0, 1.0)) * a,
            b: (b.clamp(0.0, 1.0)) * a,
            a,
        }
    }

    /// Returns a straight-alpha representation.
    ///
    /// For `a == 0`, RGB is returned as 0.
    #[inline]
    pub fn to_straight(self) -> (f32, f32, f32, f32) {
        if self.a <= 0.0 {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            let inv = 1.0 / self.a;
            (self.r * inv, self.g * inv, self.b * inv, self.a)
        }
    }

    /// Scales all channels by `opacity`, which keeps premultiplication intact.
    #[inline]
    pub fn with_opacity(self, opacity: f32) -> Self {
        let o = opacity.clamp(0.0, 1.0);
        Self::from_premul(self.r * o, self.g * o, self.b * o, self.a * o)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    #[inline]
    pub fn is_opaque(self) -> bool {
        self.a >= 1.0
    }

    /// Clamps all channels to [0, 1] and enforces premultiplication.
    #[inline]
    pub fn clamped(self) -> Self {
        let a = self.a.clamp(0.0, 1.0);

        // Premultiplied rgb cannot exceed alpha.
        let r = self.r.clamp(0.0, a);
        let g = self.g.clamp(0.0, a);
        let b = self.b.clamp(0.0, a);

        Self { r, g, b, a }
    }

    /// Texel value for the color data texture.
    #[inline]
    pub fn to_float4(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// `wgpu` clear color.
    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_is_premultiplied() {
        let c = Color::from_straight(1.0, 0.5, 0.0, 0.5);
        assert_eq!(c.to_float4(), [0.5, 0.25, 0.0, 0.5]);
        assert_eq!(c.to_straight(), (1.0, 0.5, 0.0, 0.5));
    }

    #[test]
    fn hex_parses_with_and_without_alpha() {
        assert_eq!(Color::from_hex("#ff0000"), Some(Color::from_premul(1.0, 0.0, 0.0, 1.0)));
        let c = Color::from_hex("00ff0000").unwrap_or_default();
        assert_eq!(c, Color::transparent());
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("zzzzzz"), None);
    }

    #[test]
    fn clamped_caps_rgb_at_alpha() {
        let c = Color::from_premul(0.9, 0.1, 2.0, 0.5).clamped();
        assert_eq!(c, Color::from_premul(0.5, 0.1, 0.5, 0.5));
    }

    #[test]
    fn opacity_keeps_premultiplication() {
        let c = Color::WHITE.with_opacity(0.25);
        assert_eq!(c.to_float4(), [0.25, 0.25, 0.25, 0.25]);
        assert!(!c.is_opaque());
        assert!(Color::BLACK.is_opaque());
    }
}
