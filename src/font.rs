//! A small bitmap font for the display bridge's text-mode glyph blit.
//!
//! The source 8x8 rows are doubled (`out[i] = g8[i / 2]`) to produce the
//! 8x16 glyph height VGA text mode expects; no external font crate ships
//! that height directly, so the table is hand-authored and intentionally
//! covers only the printable ASCII the BIOS teletype path actually emits:
//! digits, letters (folded to uppercase), space, and a few punctuation
//! marks. Anything outside that set renders as a solid block, matching
//! how real text-mode adapters render an undefined glyph index.

const BLOCK: [u8; 8] = [0xFF, 0x81, 0x81, 0x81, 0x81, 0x81, 0x81, 0xFF];
const SPACE: [u8; 8] = [0x00; 8];

const GLYPHS_8X8: &[(u8, [u8; 8])] = &[
    (b' ', SPACE),
    (b'!', [0x18, 0x18, 0x18, 0x18, 0x18, 0x00, 0x18, 0x00]),
    (b'.', [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x00]),
    (b',', [0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x18, 0x30]),
    (b':', [0x00, 0x18, 0x18, 0x00, 0x00, 0x18, 0x18, 0x00]),
    (b'-', [0x00, 0x00, 0x00, 0x7E, 0x7E, 0x00, 0x00, 0x00]),
    (b'0', [0x3C, 0x66, 0x6E, 0x76, 0x66, 0x66, 0x3C, 0x00]),
    (b'1', [0x18, 0x38, 0x18, 0x18, 0x18, 0x18, 0x7E, 0x00]),
    (b'2', [0x3C, 0x66, 0x06, 0x0C, 0x30, 0x60, 0x7E, 0x00]),
    (b'3', [0x3C, 0x66, 0x06, 0x1C, 0x06, 0x66, 0x3C, 0x00]),
    (b'4', [0x0C, 0x1C, 0x3C, 0x6C, 0x7E, 0x0C, 0x0C, 0x00]),
    (b'5', [0x7E, 0x60, 0x7C, 0x06, 0x06, 0x66, 0x3C, 0x00]),
    (b'6', [0x3C, 0x60, 0x7C, 0x66, 0x66, 0x66, 0x3C, 0x00]),
    (b'7', [0x7E, 0x06, 0x0C, 0x18, 0x30, 0x30, 0x30, 0x00]),
    (b'8', [0x3C, 0x66, 0x66, 0x3C, 0x66, 0x66, 0x3C, 0x00]),
    (b'9', [0x3C, 0x66, 0x66, 0x3E, 0x06, 0x66, 0x3C, 0x00]),
    (b'A', [0x18, 0x3C, 0x66, 0x66, 0x7E, 0x66, 0x66, 0x00]),
    (b'B', [0x7C, 0x66, 0x66, 0x7C, 0x66, 0x66, 0x7C, 0x00]),
    (b'C', [0x3C, 0x66, 0x60, 0x60, 0x60, 0x66, 0x3C, 0x00]),
    (b'D', [0x78, 0x6C, 0x66, 0x66, 0x66, 0x6C, 0x78, 0x00]),
    (b'E', [0x7E, 0x60, 0x60, 0x7C, 0x60, 0x60, 0x7E, 0x00]),
    (b'F', [0x7E, 0x60, 0x60, 0x7C, 0x60, 0x60, 0x60, 0x00]),
    (b'G', [0x3C, 0x66, 0x60, 0x6E, 0x66, 0x66, 0x3C, 0x00]),
    (b'H', [0x66, 0x66, 0x66, 0x7E, 0x66, 0x66, 0x66, 0x00]),
    (b'I', [0x7E, 0x18, 0x18, 0x18, 0x18, 0x18, 0x7E, 0x00]),
    (b'J', [0x06, 0x06, 0x06, 0x06, 0x06, 0x66, 0x3C, 0x00]),
    (b'K', [0x66, 0x6C, 0x78, 0x70, 0x78, 0x6C, 0x66, 0x00]),
    (b'L', [0x60, 0x60, 0x60, 0x60, 0x60, 0x60, 0x7E, 0x00]),
    (b'M', [0x63, 0x77, 0x7F, 0x6B, 0x63, 0x63, 0x63, 0x00]),
    (b'N', [0x66, 0x76, 0x7E, 0x7E, 0x6E, 0x66, 0x66, 0x00]),
    (b'O', [0x3C, 0x66, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x00]),
    (b'P', [0x7C, 0x66, 0x66, 0x7C, 0x60, 0x60, 0x60, 0x00]),
    (b'Q', [0x3C, 0x66, 0x66, 0x66, 0x6A, 0x6C, 0x36, 0x00]),
    (b'R', [0x7C, 0x66, 0x66, 0x7C, 0x78, 0x6C, 0x66, 0x00]),
    (b'S', [0x3C, 0x66, 0x60, 0x3C, 0x06, 0x66, 0x3C, 0x00]),
    (b'T', [0x7E, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x00]),
    (b'U', [0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x00]),
    (b'V', [0x66, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x18, 0x00]),
    (b'W', [0x63, 0x63, 0x63, 0x6B, 0x7F, 0x77, 0x63, 0x00]),
    (b'X', [0x66, 0x66, 0x3C, 0x18, 0x3C, 0x66, 0x66, 0x00]),
    (b'Y', [0x66, 0x66, 0x66, 0x3C, 0x18, 0x18, 0x18, 0x00]),
    (b'Z', [0x7E, 0x0C, 0x18, 0x30, 0x60, 0x60, 0x7E, 0x00]),
];

fn lookup_8x8(ch: u8) -> [u8; 8] {
    let folded = if ch.is_ascii_lowercase() { ch - 32 } else { ch };
    for (glyph_ch, rows) in GLYPHS_8X8 {
        if *glyph_ch == folded {
            return *rows;
        }
    }
    BLOCK
}

/// Returns the 8x16 glyph for a text-mode character, each 8x8 source row
/// doubled into two output rows.
pub fn glyph(ch: u8) -> [u8; 16] {
    let g8 = lookup_8x8(ch);
    let mut out = [0u8; 16];
    for i in 0..16 {
        out[i] = g8[i / 2];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercase_folds_to_the_same_glyph_as_uppercase() {
        assert_eq!(glyph(b'h'), glyph(b'H'));
    }

    #[test]
    fn each_source_row_is_doubled() {
        let g = glyph(b'A');
        for i in 0..8 {
            assert_eq!(g[i * 2], g[i * 2 + 1]);
        }
    }

    #[test]
    fn unknown_glyphs_render_as_a_solid_block() {
        assert_eq!(glyph(0x01), glyph(0x02));
    }
}
