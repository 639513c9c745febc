use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};

/// Glyph cell size in unscaled pixels.
pub const GLYPH_SIZE: u32 = 8;

const FALLBACK: char = '?';

/// Returns the 8x8 bitmap for `c`, one byte per row, bit 0 leftmost.
///
/// Characters outside Basic Latin and Latin-1 render as `?`.
pub fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get(FALLBACK))
        .unwrap_or([0; 8])
}

#[inline]
pub fn is_set(bitmap: &[u8; 8], col: u32, row: u32) -> bool {
    bitmap[row as usize] & (1 << col) != 0
}
