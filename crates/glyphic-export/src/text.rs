//! Plain-text serializer.
//!
//! Every cell becomes two characters so the output keeps roughly the
//! source aspect ratio in a terminal font. One line per grid row, each
//! terminated by `\n`.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use glyphic_pipeline::{EdgeDirection, Glyph, GlyphGrid};

/// The two ASCII bytes emitted for a glyph.
#[must_use]
pub fn symbol(glyph: Glyph) -> [u8; 2] {
    let c = match glyph {
        Glyph::Tone(tone) => tone.ramp_char(),
        Glyph::Edge(EdgeDirection::Horizontal) => b'-',
        Glyph::Edge(EdgeDirection::Backslash) => b'\\',
        Glyph::Edge(EdgeDirection::Vertical) => b'|',
        Glyph::Edge(EdgeDirection::Slash) => b'/',
    };
    [c, c]
}

/// Serialize a glyph grid as text.
///
/// # Examples
///
/// ```
/// use glyphic_pipeline::{EdgeDirection, Glyph, GlyphGrid, Tone};
///
/// let grid = GlyphGrid::from_fn(2, 1, |x, _| {
///     if x == 0 { Glyph::Tone(Tone::BRIGHTEST) } else { Glyph::Edge(EdgeDirection::Slash) }
/// });
/// assert_eq!(glyphic_export::to_text(&grid), "@@//\n");
/// ```
#[must_use]
pub fn to_text(grid: &GlyphGrid) -> String {
    let line_len = grid.width() as usize * 2 + 1;
    let mut out = String::with_capacity(line_len * grid.height() as usize);
    for row in grid.rows() {
        for glyph in row {
            for b in symbol(*glyph) {
                out.push(char::from(b));
            }
        }
        out.push('\n');
    }
    out
}
