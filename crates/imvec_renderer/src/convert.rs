//! Toolkit to native type conversion

use imvec_core::{PackedColor, Vec2};
use imvec_paint::{Color, Point, Rect};
use std::sync::OnceLock;

static CHANNEL_LUT: OnceLock<[f32; 256]> = OnceLock::new();

fn channel_lut() -> &'static [f32; 256] {
    CHANNEL_LUT.get_or_init(|| {
        let mut lut = [0.0; 256];
        for (i, v) in lut.iter_mut().enumerate() {
            *v = i as f32 / 255.0;
        }
        lut
    })
}

/// Normalize a packed toolkit color (A in the high byte, R in the low byte)
#[inline]
pub fn to_native_color(color: PackedColor) -> Color {
    let lut = channel_lut();
    Color::new(
        lut[color.r() as usize],
        lut[color.g() as usize],
        lut[color.b() as usize],
        lut[color.a() as usize],
    )
}

#[inline]
pub fn to_native_point(v: Vec2) -> Point {
    Point::new(v.x, v.y)
}

/// Clip rectangle `[x1, y1, x2, y2]` to a native rect
#[inline]
pub fn to_native_rect(r: [f32; 4]) -> Rect {
    Rect::new(r[0], r[1], r[2], r[3])
}
