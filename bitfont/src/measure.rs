use crate::BitmapFont;

const LINE_FEED: u32 = '\n' as u32;
const CARRIAGE_RETURN: u32 = '\r' as u32;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelMetrics {
    pub size: f32,
    pub x_height: f32,
    pub advance_of_ascii_zero: f32,
    pub glyph_spacing: f32,
    pub ascent: f32,
    pub descent: f32,
    pub line_gap: f32,
}

impl BitmapFont {
    /// The advance of a single code point. Bitmap fonts carry no emoji of their
    /// own, so this is the width of whatever glyph gets drawn.
    pub fn glyph_or_emoji_width(&self, code_point: u32) -> u8 {
        if self.is_fixed_width() {
            return self.glyph_fixed_width();
        }
        self.glyph_width(code_point)
    }

    /// Width in pixels of the widest line of `code_points`. Every glyph
    /// advances by its width plus the glyph spacing.
    pub fn width(&self, code_points: impl IntoIterator<Item = u32>) -> u32 {
        let spacing = self.glyph_spacing() as u32;
        let mut widest = 0;
        let mut line: u32 = 0;
        for code_point in code_points {
            if code_point == LINE_FEED || code_point == CARRIAGE_RETURN {
                widest = widest.max(line);
                line = 0;
                continue;
            }
            line = line.saturating_add(self.glyph_or_emoji_width(code_point) as u32 + spacing);
        }
        widest.max(line)
    }

    pub fn width_of_str(&self, text: &str) -> u32 {
        self.width(text.chars().map(u32::from))
    }

    /// Each byte is one code point in U+0000..=U+00FF.
    pub fn width_of_latin1(&self, text: &[u8]) -> u32 {
        self.width(text.iter().map(|byte| *byte as u32))
    }

    pub fn width_of_utf32(&self, text: &[u32]) -> u32 {
        self.width(text.iter().copied())
    }

    pub fn pixel_size(&self) -> f32 {
        self.glyph_height() as f32
    }

    pub fn point_size(&self) -> f32 {
        self.pixel_size() * 0.75
    }

    pub fn preferred_line_height(&self) -> u32 {
        self.glyph_height() as u32 + self.line_gap() as u32
    }

    pub fn pixel_metrics(&self) -> PixelMetrics {
        let size = self.pixel_size();
        PixelMetrics {
            size,
            x_height: self.x_height() as f32,
            advance_of_ascii_zero: self.glyph_width('0' as u32) as f32,
            glyph_spacing: self.glyph_spacing() as f32,
            ascent: self.baseline() as f32,
            descent: size - self.baseline() as f32,
            line_gap: size * 0.4,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::BitmapFont;

    fn font() -> BitmapFont {
        let mut font = BitmapFont::create(10, 8, false, 256).unwrap();
        font.set_glyph_spacing(1);
        for (c, width) in [('A', 6), ('i', 2), ('0', 5), ('?', 4)] {
            font.set_glyph_width(c as u32, width).unwrap();
        }
        font.set_baseline(8);
        font.set_mean_line(3);
        font
    }

    #[test]
    fn width_adds_spacing_per_glyph() {
        let font = font();
        assert_eq!(font.width_of_str("A"), 7);
        assert_eq!(font.width_of_str("Ai"), 10);
        assert_eq!(font.width_of_str(""), 0);
    }

    #[test]
    fn missing_glyphs_measure_as_fallback() {
        let font = font();
        assert_eq!(font.width_of_str("中"), 5);
        assert_eq!(font.width_of_utf32(&[0x10FFFF, 0x41]), 5 + 7);
    }

    #[test]
    fn widest_line_wins() {
        let font = font();
        assert_eq!(font.width_of_str("i\nAAA\r\nA"), 21);
        assert_eq!(font.width_of_str("\n"), 0);
    }

    #[test]
    fn adapters_agree() {
        let font = font();
        assert_eq!(font.width_of_latin1(b"Ai0"), font.width_of_str("Ai0"));
        assert_eq!(
            font.width_of_utf32(&['A' as u32, 'i' as u32]),
            font.width_of_str("Ai")
        );
    }

    #[test]
    fn fixed_width_measures_nominal_width() {
        let mut font = font();
        font.set_fixed_width(true);
        assert_eq!(font.glyph_or_emoji_width('i' as u32), 8);
        assert_eq!(font.width_of_str("iii"), 27);
    }

    #[test]
    fn very_long_lines_saturate() {
        let mut font = BitmapFont::create(10, 32, true, 256).unwrap();
        font.set_glyph_spacing(255);
        let width = font.width(core::iter::repeat('A' as u32).take(20_000_000));
        assert_eq!(width, u32::MAX);
        assert_eq!(font.width_of_str("AA"), 2 * (32 + 255));
    }

    #[test]
    fn metrics() {
        let font = font();
        let metrics = font.pixel_metrics();
        assert_eq!(metrics.size, 10.0);
        assert_eq!(metrics.x_height, 5.0);
        assert_eq!(metrics.advance_of_ascii_zero, 5.0);
        assert_eq!(metrics.glyph_spacing, 1.0);
        assert_eq!(metrics.ascent, 8.0);
        assert_eq!(metrics.descent, 2.0);
        assert_eq!(metrics.line_gap, 4.0);
        assert_eq!(font.point_size(), 7.5);
        assert_eq!(font.preferred_line_height(), 14);
    }
}
