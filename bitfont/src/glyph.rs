use crate::BYTES_PER_ROW;

/// A borrowed view of one glyph bitmap.
///
/// Each row is a little endian `u32` where bit `x` is column `x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyph<'a> {
    rows: &'a [u8],
    width: u8,
    height: u8,
}

impl<'a> Glyph<'a> {
    pub(crate) fn new(rows: &'a [u8], width: u8, height: u8) -> Self {
        debug_assert!(rows.is_empty() || rows.len() == height as usize * BYTES_PER_ROW);
        Self {
            rows,
            width,
            height,
        }
    }

    /// A zero width glyph with no rows, handed out when a font has nothing to
    /// fall back on.
    pub(crate) fn blank(height: u8) -> Self {
        Self {
            rows: &[],
            width: 0,
            height,
        }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0
    }

    /// The raw little endian row bytes.
    pub fn row_bytes(&self) -> &'a [u8] {
        self.rows
    }

    pub fn row(&self, y: usize) -> u32 {
        let start = y * BYTES_PER_ROW;
        match self.rows.get(start..start + BYTES_PER_ROW) {
            Some(bytes) => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            None => 0,
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < 32 && self.row(y) & (1 << x) != 0
    }

    pub fn rows(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.height as usize).map(move |y| self.row(y))
    }
}
