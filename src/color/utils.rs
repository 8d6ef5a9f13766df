use crate::color::Rgb;

/// Scale every channel of a color by `factor`
///
/// Channels are clamped to `0..=255`, so negative or NaN factors give black
/// and factors above 1.0 saturate.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn scale(color: Rgb, factor: f32) -> Rgb {
    let channel = |value: u8| (f32::from(value) * factor).clamp(0.0, 255.0) as u8;
    Rgb {
        r: channel(color.r),
        g: channel(color.g),
        b: channel(color.b),
    }
}

/// Create an RGB color from a u32 value (0xRRGGBB format)
pub const fn rgb_from_u32(color: u32) -> Rgb {
    Rgb {
        r: ((color >> 16) & 0xFF) as u8,
        g: ((color >> 8) & 0xFF) as u8,
        b: (color & 0xFF) as u8,
    }
}
