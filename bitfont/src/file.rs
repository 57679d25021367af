//! The packed font file format.
//!
//! A file is a [`FontFileHeader`] followed by the presence mask, the glyph rows
//! of every present page and finally one width byte per glyph. All integers are
//! little endian and fixed size.
use alloc::{string::ToString, sync::Arc, vec::Vec};
use core::ops::Range;

use bincode::{
    config::{Configuration, Fixint, LittleEndian, NoLimit},
    de::{read::Reader, BorrowDecoder, Decoder},
    enc::{write::Writer, Encoder},
    error::{DecodeError, EncodeError},
};
use tracing::{event, Level};

use crate::{
    fixed_string::FontName, FontError, SharedBytes, BYTES_PER_ROW, MAX_GLYPH_WIDTH,
    MAX_RANGE_MASK_SIZE, PAGE_SIZE,
};

pub const FONT_BINCODE_CONFIG: Configuration<LittleEndian, Fixint, NoLimit> =
    bincode::config::standard().with_fixed_int_encoding();

pub const FONT_MAGIC: [u8; 4] = *b"!Fnt";

/// Encoded size of [`FontFileHeader`].
pub const FONT_HEADER_LEN: usize = 80;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MagicBytes;

impl bincode::Encode for MagicBytes {
    fn encode<E: Encoder>(&self, encoder: &mut E) -> Result<(), EncodeError> {
        encoder.writer().write(FONT_MAGIC.as_ref())
    }
}

impl<Context> bincode::Decode<Context> for MagicBytes {
    fn decode<D: Decoder<Context = Context>>(decoder: &mut D) -> Result<Self, DecodeError> {
        let mut bytes = [0u8; FONT_MAGIC.len()];
        decoder.reader().read(&mut bytes)?;
        if bytes == FONT_MAGIC {
            Ok(MagicBytes)
        } else {
            Err(DecodeError::Other("invalid magic bytes"))
        }
    }
}

impl<'de, Context> bincode::BorrowDecode<'de, Context> for MagicBytes {
    fn borrow_decode<D: BorrowDecoder<'de, Context = Context>>(
        decoder: &mut D,
    ) -> Result<Self, DecodeError> {
        <MagicBytes as bincode::Decode<Context>>::decode(decoder)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, bincode::Encode, bincode::Decode)]
pub struct FontFileHeader {
    pub magic: MagicBytes,
    pub glyph_width: u8,
    pub glyph_height: u8,
    pub range_mask_size: u16,
    pub is_variable_width: u8,
    pub glyph_spacing: u8,
    pub baseline: u8,
    pub mean_line: u8,
    pub presentation_size: u8,
    pub weight: u16,
    pub slope: u8,
    pub name: FontName,
    pub family: FontName,
}

impl FontFileHeader {
    pub fn is_variable_width(&self) -> bool {
        self.is_variable_width != 0
    }
}

/// Where each section of an encoded font lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FontLayout {
    pub header: FontFileHeader,
    pub mask: Range<usize>,
    pub rows: Range<usize>,
    pub widths: Range<usize>,
}

impl FontLayout {
    pub fn page_count(&self) -> usize {
        self.widths.len() / PAGE_SIZE
    }
}

pub(crate) fn parse_layout(bytes: &[u8]) -> Result<FontLayout, FontError> {
    let (header, header_len): (FontFileHeader, usize) =
        bincode::decode_from_slice(bytes, FONT_BINCODE_CONFIG)
            .map_err(|e| FontError::not_found(format!("invalid header: {}", e)))?;
    debug_assert_eq!(header_len, FONT_HEADER_LEN);

    if header.glyph_width > MAX_GLYPH_WIDTH {
        return Err(FontError::UnsupportedGlyphWidth(header.glyph_width));
    }
    let mask_len = header.range_mask_size as usize;
    if mask_len > MAX_RANGE_MASK_SIZE {
        return Err(FontError::not_found(format!(
            "presence mask of {} bytes exceeds {}",
            mask_len, MAX_RANGE_MASK_SIZE
        )));
    }

    let mask = header_len..header_len + mask_len;
    let section = bytes
        .get(mask.clone())
        .ok_or_else(|| FontError::not_found("truncated presence mask"))?;
    let page_count: usize = section.iter().map(|byte| byte.count_ones() as usize).sum();
    let glyph_count = page_count * PAGE_SIZE;

    let rows = mask.end..mask.end + glyph_count * header.glyph_height as usize * BYTES_PER_ROW;
    let widths = rows.end..rows.end + glyph_count;
    if bytes.len() < widths.end {
        return Err(FontError::not_found(format!(
            "expected {} bytes of glyph data but the buffer holds {}",
            widths.end - mask.end,
            bytes.len() - mask.end
        )));
    }
    if bytes.len() > widths.end {
        event!(
            Level::DEBUG,
            trailing = bytes.len() - widths.end,
            "ignoring bytes after the width table"
        );
    }

    Ok(FontLayout {
        header,
        mask,
        rows,
        widths,
    })
}

pub(crate) fn encode_font(
    mut header: FontFileHeader,
    mask: &[u8],
    rows: &[u8],
    widths: &[u8],
) -> Vec<u8> {
    header.range_mask_size = mask.len() as u16;
    let mut bytes = Vec::with_capacity(FONT_HEADER_LEN + mask.len() + rows.len() + widths.len());
    bytes.extend(
        bincode::encode_to_vec(&header, FONT_BINCODE_CONFIG)
            .expect("encoding a header into a vec cannot fail"),
    );
    bytes.extend_from_slice(mask);
    bytes.extend_from_slice(rows);
    bytes.extend_from_slice(widths);
    bytes
}

/// Somewhere a font's encoded bytes can be read from.
pub trait FontSource {
    type Error: core::fmt::Display;

    fn read_font(&self) -> Result<SharedBytes, Self::Error>;
}

impl FontSource for SharedBytes {
    type Error = core::convert::Infallible;

    fn read_font(&self) -> Result<SharedBytes, Self::Error> {
        Ok(self.clone())
    }
}

impl FontSource for [u8] {
    type Error = core::convert::Infallible;

    fn read_font(&self) -> Result<SharedBytes, Self::Error> {
        Ok(Arc::new(self.to_vec()))
    }
}

#[cfg(feature = "std")]
impl FontSource for std::path::Path {
    type Error = std::io::Error;

    fn read_font(&self) -> Result<SharedBytes, Self::Error> {
        let bytes = std::fs::read(self)?;
        event!(
            Level::DEBUG,
            path = %self.display(),
            len = bytes.len(),
            "read font file"
        );
        Ok(Arc::new(bytes))
    }
}

pub(crate) fn source_error(error: impl core::fmt::Display) -> FontError {
    FontError::NotFound(error.to_string())
}
