#![allow(dead_code)]
use bitfont::BitmapFont;

pub const HEIGHT: u8 = 4;

/// Rows derived from a seed so that every glyph looks different.
pub fn rows_for(seed: u32) -> [u32; HEIGHT as usize] {
    [seed, seed.rotate_left(7), !seed, seed.rotate_right(3)]
}

/// A variable width font holding exactly `glyphs`, each `(code point, width,
/// row seed)`.
pub fn font_with_glyphs(glyphs: &[(u32, u8, u32)]) -> BitmapFont {
    let mut font = BitmapFont::create(HEIGHT, 8, false, 0).unwrap();
    font.set_family("Test");
    font.set_presentation_size(HEIGHT);
    for (code_point, width, seed) in glyphs {
        font.materialize_page(*code_point).unwrap();
        font.set_glyph_width(*code_point, *width).unwrap();
        for (y, row) in rows_for(*seed).into_iter().enumerate() {
            font.set_glyph_row(*code_point, y, row).unwrap();
        }
    }
    font
}

/// The single page 8x8 font used by the examples in the docs.
pub fn basic_latin() -> BitmapFont {
    let mut font = BitmapFont::create(8, 8, false, 256).unwrap();
    font.set_family("Basic");
    font.set_glyph_spacing(1);
    font.set_glyph_width('A' as u32, 6).unwrap();
    font.set_glyph_row('A' as u32, 0, 0b0001_1000).unwrap();
    font.set_glyph_row('A' as u32, 7, 0b0100_0010).unwrap();
    font.set_glyph_width('?' as u32, 5).unwrap();
    font.set_glyph_row('?' as u32, 0, 0b0000_1110).unwrap();
    font
}
