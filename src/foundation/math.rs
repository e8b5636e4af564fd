/// Largest 8-bit channel value.
pub const MAX_COLORS_8: u32 = 255;
/// Largest gamma-expanded channel value (`255 * 255`).
pub const MAX_COLORS_16: u32 = MAX_COLORS_8 * MAX_COLORS_8;

/// `x * y / 255` rounded to nearest.
pub(crate) fn mul_div255_u32(x: u32, y: u32) -> u32 {
    (x * y + 127) / 255
}

pub(crate) fn mul_div255_u8(x: u8, y: u8) -> u8 {
    mul_div255_u32(u32::from(x), u32::from(y)) as u8
}

/// Inverse of [`mul_div255_u8`] for a channel premultiplied by `a`, clamped to 255.
pub(crate) fn div_alpha_u8(c: u8, a: u8) -> u8 {
    if a == 0 {
        return 0;
    }
    let a = u32::from(a);
    ((u32::from(c) * 255 + a / 2) / a).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
