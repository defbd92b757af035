//! Packed 32-bit vertex colors

/// Vertex color packed the way the toolkit stores it: R in bits 0-7, G in
/// 8-15, B in 16-23 and A in 24-31.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct PackedColor(pub u32);

impl PackedColor {
    pub const WHITE: PackedColor = PackedColor::rgba(255, 255, 255, 255);
    pub const BLACK: PackedColor = PackedColor::rgba(0, 0, 0, 255);
    pub const RED: PackedColor = PackedColor::rgba(255, 0, 0, 255);
    pub const GREEN: PackedColor = PackedColor::rgba(0, 255, 0, 255);
    pub const BLUE: PackedColor = PackedColor::rgba(0, 0, 255, 255);
    pub const TRANSPARENT: PackedColor = PackedColor(0);

    const ALPHA_MASK: u32 = 0xFF00_0000;

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self((a as u32) << 24 | (b as u32) << 16 | (g as u32) << 8 | r as u32)
    }

    pub const fn r(self) -> u8 {
        self.0 as u8
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn b(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Same color with the alpha channel cleared
    pub const fn transparent(self) -> Self {
        Self(self.0 & !Self::ALPHA_MASK)
    }

    /// Parse `RRGGBBAA` hex notation (with or without a leading `#`)
    pub fn from_hex_rgba(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 8 {
            return None;
        }
        let value = u32::from_str_radix(hex, 16).ok()?;
        Some(Self::rgba(
            (value >> 24) as u8,
            (value >> 16) as u8,
            (value >> 8) as u8,
            value as u8,
        ))
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r(), self.g(), self.b(), self.a()]
    }
}

impl From<u32> for PackedColor {
    fn from(value: u32) -> Self {
        Self(value)
    }
}
