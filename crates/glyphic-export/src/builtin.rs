//! Built-in 8×8 bitmaps for every glyph, used to synthesize a default
//! palette atlas when none has been drawn by hand.
//!
//! Each glyph is eight row masks, top row first; bit 7 is the leftmost
//! column. Tonal bitmaps are ordered by strictly increasing ink coverage
//! so the rendered raster keeps the ramp's brightness ordering.

use glyphic_pipeline::Glyph;

use crate::palette::{PaletteAtlas, TILE_SIZE};

/// Eight row masks for one tile.
pub type GlyphRows = [u8; 8];

/// Bitmaps indexed by [`Glyph::index`].
pub const BITMAPS: [GlyphRows; Glyph::COUNT as usize] = [
    // ' '
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
    // '.'
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x18, 0x00],
    // ':'
    [0x00, 0x18, 0x18, 0x00, 0x00, 0x18, 0x18, 0x00],
    // '-'
    [0x00, 0x00, 0x00, 0x7E, 0x7E, 0x00, 0x00, 0x00],
    // '='
    [0x00, 0x00, 0xFF, 0x00, 0x00, 0xFF, 0x00, 0x00],
    // '+'
    [0x00, 0x18, 0x18, 0xFF, 0xFF, 0x18, 0x18, 0x00],
    // '*'
    [0x18, 0x99, 0x7E, 0x3C, 0x3C, 0x7E, 0x99, 0x18],
    // '#'
    [0x66, 0x66, 0xFF, 0x66, 0x66, 0xFF, 0x66, 0x66],
    // '%'
    [0xE7, 0xA7, 0xEE, 0x3C, 0x78, 0x77, 0xE5, 0xE7],
    // '@'
    [0x7E, 0xFF, 0xC3, 0xDF, 0xDF, 0xDE, 0xFF, 0x7E],
    // horizontal edge: full width so neighbouring tiles join up
    [0x00, 0x00, 0x00, 0xFF, 0xFF, 0x00, 0x00, 0x00],
    // backslash edge
    [0xC0, 0x60, 0x30, 0x18, 0x0C, 0x06, 0x03, 0x01],
    // vertical edge
    [0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18],
    // slash edge
    [0x03, 0x06, 0x0C, 0x18, 0x30, 0x60, 0xC0, 0x80],
];

/// Whether texel `(x, y)` of a tile is inked.
#[must_use]
pub const fn is_set(rows: &GlyphRows, x: u32, y: u32) -> bool {
    if x >= TILE_SIZE || y >= TILE_SIZE {
        return false;
    }
    (rows[y as usize] >> (7 - x)) & 1 == 1
}

/// Synthesize a palette atlas from [`BITMAPS`]: white ink on black.
#[must_use]
pub fn builtin_atlas() -> PaletteAtlas {
    PaletteAtlas::from_fn(|index, x, y| {
        let inked = BITMAPS
            .get(usize::from(index))
            .is_some_and(|rows| is_set(rows, x, y));
        if inked { u8::MAX } else { 0 }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use glyphic_pipeline::glyph::RAMP_LEN;

    fn coverage(rows: &GlyphRows) -> u32 {
        rows.iter().map(|r| r.count_ones()).sum()
    }

    #[test]
    fn space_is_blank() {
        assert_eq!(coverage(&BITMAPS[0]), 0);
    }

    #[test]
    fn tonal_bitmaps_increase_in_coverage() {
        let tonal = &BITMAPS[..usize::from(RAMP_LEN)];
        for pair in tonal.windows(2) {
            assert!(coverage(&pair[0]) < coverage(&pair[1]));
        }
    }

    #[test]
    fn bit_order_is_msb_left() {
        let rows = BITMAPS[11];
        assert!(is_set(&rows, 0, 0));
        assert!(!is_set(&rows, 7, 0));
        assert!(is_set(&rows, 7, 7));
        assert!(!is_set(&rows, 8, 0));
    }

    #[test]
    fn atlas_matches_bitmaps() {
        let atlas = builtin_atlas();
        for glyph_index in 0..Glyph::COUNT {
            for y in 0..TILE_SIZE {
                for x in 0..TILE_SIZE {
                    let expected = if is_set(&BITMAPS[usize::from(glyph_index)], x, y) {
                        255
                    } else {
                        0
                    };
                    assert_eq!(atlas.texel(glyph_index, x, y), expected);
                }
            }
        }
    }
}
