//! Sparse, paged storage for monochrome bitmap fonts.
//!
//! A font may in principle cover every Unicode code point, but stores only the
//! 256 code point pages it actually populates. The [`PageDirectory`] turns code
//! points into storage slots and the [`GlyphStore`] holds the rows and widths
//! behind those slots. [`BitmapFont`] ties them together with the font metrics
//! and the fallback policy used at render time.
#![no_std]

#[cfg(feature = "std")]
#[macro_use]
extern crate std;

#[macro_use]
extern crate alloc;

pub mod directory;
pub mod file;
pub mod fixed_string;
pub mod glyph;
pub mod store;
pub mod style;

mod error;
mod font;
mod measure;
mod subset;

pub use directory::{offset_within_page, page_of, PageDirectory, PageEntry, Resolution};
pub use error::*;
pub use file::{FontFileHeader, FontSource, FONT_BINCODE_CONFIG, FONT_HEADER_LEN};
pub use font::*;
pub use glyph::Glyph;
pub use measure::PixelMetrics;
pub use store::{GlyphStore, SharedBytes};

/// Number of code points that share one presence mask bit.
pub const PAGE_SIZE: usize = 256;

/// One past the highest Unicode code point.
pub const MAX_CODE_POINT_COUNT: usize = 0x110000;

/// Number of pages needed to cover the whole code point space.
pub const MAX_PAGE_COUNT: usize = MAX_CODE_POINT_COUNT / PAGE_SIZE;

/// Size in bytes of a presence mask covering the whole code point space.
pub const MAX_RANGE_MASK_SIZE: usize = MAX_PAGE_COUNT / 8;

/// Glyph rows are stored as one little endian `u32` each.
pub const MAX_GLYPH_WIDTH: u8 = 32;

pub(crate) const BYTES_PER_ROW: usize = core::mem::size_of::<u32>();
