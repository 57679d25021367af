//! Flat glyph storage addressed by slot index.
//!
//! Rows for every slot are laid out back to back, `glyph_height` little endian
//! `u32` words per slot, followed in a separate buffer by one width byte per
//! slot. Slots are only ever produced by the [`PageDirectory`], so every slot a
//! caller holds lies inside the store.
//!
//! [`PageDirectory`]: crate::PageDirectory
use alloc::{sync::Arc, vec::Vec};
use core::{fmt, ops::Range};

use crate::{FontError, BYTES_PER_ROW, PAGE_SIZE};

/// A read-only buffer shared with whoever loaded it, typically a file mapping.
pub type SharedBytes = Arc<dyn AsRef<[u8]> + Send + Sync>;

enum Buffer {
    Owned(Vec<u8>),
    Borrowed {
        source: SharedBytes,
        range: Range<usize>,
    },
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Owned(bytes) => bytes,
            Buffer::Borrowed { source, range } => &AsRef::<[u8]>::as_ref(&**source)[range.clone()],
        }
    }

    fn owned_mut(&mut self) -> Result<&mut Vec<u8>, FontError> {
        match self {
            Buffer::Owned(bytes) => Ok(bytes),
            Buffer::Borrowed { .. } => Err(FontError::ReadOnlyViolation),
        }
    }

    fn len(&self) -> usize {
        match self {
            Buffer::Owned(bytes) => bytes.len(),
            Buffer::Borrowed { range, .. } => range.len(),
        }
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Buffer::Owned(bytes) => f.debug_struct("Owned").field("len", &bytes.len()).finish(),
            Buffer::Borrowed { range, .. } => {
                f.debug_struct("Borrowed").field("range", range).finish()
            }
        }
    }
}

pub(crate) fn try_zeroed(len: usize) -> Result<Vec<u8>, FontError> {
    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(len)
        .map_err(|_| FontError::AllocationFailed { bytes: len })?;
    bytes.resize(len, 0);
    Ok(bytes)
}

pub(crate) fn try_copy(source: &[u8]) -> Result<Vec<u8>, FontError> {
    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(source.len())
        .map_err(|_| FontError::AllocationFailed {
            bytes: source.len(),
        })?;
    bytes.extend_from_slice(source);
    Ok(bytes)
}

fn try_reserve_len(bytes: &mut Vec<u8>, new_len: usize) -> Result<(), FontError> {
    if new_len > bytes.len() {
        let additional = new_len - bytes.len();
        bytes
            .try_reserve_exact(additional)
            .map_err(|_| FontError::AllocationFailed { bytes: additional })?;
    }
    Ok(())
}

#[derive(Debug)]
pub struct GlyphStore {
    glyph_height: u8,
    rows: Buffer,
    widths: Buffer,
}

impl GlyphStore {
    /// An owned store of `page_count` pages of empty glyphs.
    pub fn new(glyph_height: u8, page_count: usize) -> Result<Self, FontError> {
        let glyph_count = page_count * PAGE_SIZE;
        Ok(Self {
            glyph_height,
            rows: Buffer::Owned(try_zeroed(glyph_count * bytes_per_glyph(glyph_height))?),
            widths: Buffer::Owned(try_zeroed(glyph_count)?),
        })
    }

    /// A store over `rows` and `widths` regions of a shared buffer. The store
    /// never writes to them.
    pub fn borrowed(
        glyph_height: u8,
        source: SharedBytes,
        rows: Range<usize>,
        widths: Range<usize>,
    ) -> Self {
        assert_eq!(rows.len(), widths.len() * bytes_per_glyph(glyph_height));
        assert_eq!(widths.len() % PAGE_SIZE, 0);
        Self {
            glyph_height,
            rows: Buffer::Borrowed {
                source: source.clone(),
                range: rows,
            },
            widths: Buffer::Borrowed {
                source,
                range: widths,
            },
        }
    }

    pub(crate) fn from_owned(glyph_height: u8, rows: Vec<u8>, widths: Vec<u8>) -> Self {
        assert_eq!(rows.len(), widths.len() * bytes_per_glyph(glyph_height));
        assert_eq!(widths.len() % PAGE_SIZE, 0);
        Self {
            glyph_height,
            rows: Buffer::Owned(rows),
            widths: Buffer::Owned(widths),
        }
    }

    pub fn glyph_height(&self) -> u8 {
        self.glyph_height
    }

    pub fn bytes_per_glyph(&self) -> usize {
        bytes_per_glyph(self.glyph_height)
    }

    fn bytes_per_page(&self) -> usize {
        self.bytes_per_glyph() * PAGE_SIZE
    }

    pub fn glyph_count(&self) -> usize {
        self.widths.len()
    }

    pub fn page_count(&self) -> usize {
        self.glyph_count() / PAGE_SIZE
    }

    pub fn is_borrowed(&self) -> bool {
        matches!(self.widths, Buffer::Borrowed { .. })
    }

    pub fn rows(&self) -> &[u8] {
        self.rows.as_slice()
    }

    pub fn widths(&self) -> &[u8] {
        self.widths.as_slice()
    }

    pub fn glyph_at(&self, slot: usize) -> (&[u8], u8) {
        (self.rows_at(slot), self.width_at(slot))
    }

    pub fn rows_at(&self, slot: usize) -> &[u8] {
        let start = slot * self.bytes_per_glyph();
        &self.rows()[start..start + self.bytes_per_glyph()]
    }

    pub fn width_at(&self, slot: usize) -> u8 {
        self.widths()[slot]
    }

    pub fn set_width(&mut self, slot: usize, width: u8) -> Result<(), FontError> {
        self.widths.owned_mut()?[slot] = width;
        Ok(())
    }

    pub fn rows_mut(&mut self, slot: usize) -> Result<&mut [u8], FontError> {
        let bytes_per_glyph = self.bytes_per_glyph();
        let start = slot * bytes_per_glyph;
        Ok(&mut self.rows.owned_mut()?[start..start + bytes_per_glyph])
    }

    /// Reallocates to hold `new_page_count` pages. New slots are empty.
    /// Both buffers are reserved before either changes length, so a failed
    /// allocation leaves the store as it was.
    pub fn resize(&mut self, new_page_count: usize) -> Result<(), FontError> {
        let bytes_per_glyph = self.bytes_per_glyph();
        let (Buffer::Owned(rows), Buffer::Owned(widths)) = (&mut self.rows, &mut self.widths)
        else {
            return Err(FontError::ReadOnlyViolation);
        };
        let glyph_count = new_page_count
            .checked_mul(PAGE_SIZE)
            .ok_or(FontError::AllocationFailed { bytes: usize::MAX })?;
        let row_len = glyph_count
            .checked_mul(bytes_per_glyph)
            .ok_or(FontError::AllocationFailed { bytes: usize::MAX })?;

        try_reserve_len(rows, row_len)?;
        try_reserve_len(widths, glyph_count)?;
        rows.resize(row_len, 0);
        widths.resize(glyph_count, 0);
        Ok(())
    }

    /// Grows the store by one page of empty glyphs placed at `storage_page`.
    /// Pages from there on move up by one.
    pub fn insert_blank_page(&mut self, storage_page: usize) -> Result<(), FontError> {
        if self.is_borrowed() {
            return Err(FontError::ReadOnlyViolation);
        }
        assert!(storage_page <= self.page_count());
        let bytes_per_page = self.bytes_per_page();
        self.resize(self.page_count() + 1)?;

        self.rows.owned_mut()?[storage_page * bytes_per_page..].rotate_right(bytes_per_page);
        self.widths.owned_mut()?[storage_page * PAGE_SIZE..].rotate_right(PAGE_SIZE);
        Ok(())
    }

    pub fn remove_page(&mut self, storage_page: usize) -> Result<(), FontError> {
        if self.is_borrowed() {
            return Err(FontError::ReadOnlyViolation);
        }
        assert!(storage_page < self.page_count());
        let bytes_per_page = self.bytes_per_page();
        let row_start = storage_page * bytes_per_page;
        self.rows
            .owned_mut()?
            .drain(row_start..row_start + bytes_per_page);
        let width_start = storage_page * PAGE_SIZE;
        self.widths
            .owned_mut()?
            .drain(width_start..width_start + PAGE_SIZE);
        Ok(())
    }

    /// Every glyph in the page has zero width.
    pub fn page_is_blank(&self, storage_page: usize) -> bool {
        let start = storage_page * PAGE_SIZE;
        self.widths()[start..start + PAGE_SIZE]
            .iter()
            .all(|width| *width == 0)
    }

    /// Copies a whole page of slots from `source` into this store.
    pub fn copy_page_from(
        &mut self,
        source: &GlyphStore,
        source_page: usize,
        dest_page: usize,
    ) -> Result<(), FontError> {
        assert_eq!(self.glyph_height, source.glyph_height);
        let bytes_per_page = self.bytes_per_page();
        let from = source_page * bytes_per_page;
        let to = dest_page * bytes_per_page;
        self.rows.owned_mut()?[to..to + bytes_per_page]
            .copy_from_slice(&source.rows()[from..from + bytes_per_page]);

        let from = source_page * PAGE_SIZE;
        let to = dest_page * PAGE_SIZE;
        self.widths.owned_mut()?[to..to + PAGE_SIZE]
            .copy_from_slice(&source.widths()[from..from + PAGE_SIZE]);
        Ok(())
    }

    /// An owned copy, whether or not this store is borrowed.
    pub fn try_clone(&self) -> Result<Self, FontError> {
        Ok(Self {
            glyph_height: self.glyph_height,
            rows: Buffer::Owned(try_copy(self.rows())?),
            widths: Buffer::Owned(try_copy(self.widths())?),
        })
    }
}

fn bytes_per_glyph(glyph_height: u8) -> usize {
    glyph_height as usize * BYTES_PER_ROW
}
