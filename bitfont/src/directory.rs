//! The glyph page directory.
//!
//! Code points are grouped into pages of [`PAGE_SIZE`] code points. Two
//! structures describe which pages a font has:
//!
//! - the **presence mask** holds one bit per page and records which pages were
//!   populated when the font was encoded. It is what gets persisted.
//! - the **page index table** holds one entry per present page, in increasing
//!   page order, and says where in the glyph store that page lives, or that it
//!   has been dropped from memory.
//!
//! A code point resolves to a slot only when both agree.
use alloc::vec::Vec;

use crate::PAGE_SIZE;

/// The page a code point belongs to.
pub fn page_of(code_point: u32) -> u32 {
    code_point / PAGE_SIZE as u32
}

/// The position of a code point within its page.
pub fn offset_within_page(code_point: u32) -> usize {
    (code_point % PAGE_SIZE as u32) as usize
}

/// First code point of a page.
pub fn first_code_point_of(page: u32) -> u32 {
    page * PAGE_SIZE as u32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageEntry {
    pub page: u32,
    /// Position of the page in the glyph store, in units of [`PAGE_SIZE`]
    /// slots. `None` once the page has been dropped from memory.
    pub storage_page: Option<usize>,
}

/// Outcome of looking a code point up in the directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Hit(usize),
    PresentButUnmaterialized,
    PageAbsent,
}

impl Resolution {
    pub fn slot(self) -> Option<usize> {
        match self {
            Resolution::Hit(slot) => Some(slot),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageDirectory {
    mask: Vec<u8>,
    table: Vec<PageEntry>,
    /// storage page -> page number, the inverse of the table
    materialized: Vec<u32>,
}

impl PageDirectory {
    /// Builds the page index table from a presence mask. Every present page is
    /// materialized and pages are laid out in storage in increasing page order.
    pub fn from_mask(mask: Vec<u8>) -> Self {
        debug_assert!(mask.len() <= crate::MAX_RANGE_MASK_SIZE);
        let mut table = Vec::new();
        let mut materialized = Vec::new();
        for (byte_index, byte) in mask.iter().enumerate() {
            for bit in 0..8 {
                if byte & (1 << bit) == 0 {
                    continue;
                }
                let page = (byte_index * 8 + bit) as u32;
                table.push(PageEntry {
                    page,
                    storage_page: Some(materialized.len()),
                });
                materialized.push(page);
            }
        }

        Self {
            mask,
            table,
            materialized,
        }
    }

    /// A directory whose mask marks the first `page_count` pages present.
    pub fn with_leading_pages(page_count: usize) -> Self {
        let mut mask = vec![0u8; page_count.div_ceil(8)];
        for page in 0..page_count {
            mask[page / 8] |= 1 << (page % 8);
        }
        Self::from_mask(mask)
    }

    pub fn resolve(&self, code_point: u32) -> Resolution {
        let page = page_of(code_point);
        if !self.is_page_present(page) {
            return Resolution::PageAbsent;
        }
        match self.storage_page_of(page) {
            Some(storage_page) => {
                Resolution::Hit(storage_page * PAGE_SIZE + offset_within_page(code_point))
            }
            None => Resolution::PresentButUnmaterialized,
        }
    }

    pub fn resolve_index(&self, code_point: u32) -> Option<usize> {
        self.resolve(code_point).slot()
    }

    /// The code point stored at `slot`.
    ///
    /// # Panics
    ///
    /// If `slot` is not inside a materialized page.
    pub fn index_to_code_point(&self, slot: usize) -> u32 {
        let page = self.materialized[slot / PAGE_SIZE];
        first_code_point_of(page) + (slot % PAGE_SIZE) as u32
    }

    /// Whether the presence mask has no bit for the page of `code_point`.
    pub fn page_is_empty(&self, code_point: u32) -> bool {
        !self.is_page_present(page_of(code_point))
    }

    pub fn is_page_present(&self, page: u32) -> bool {
        let byte = (page / 8) as usize;
        self.mask
            .get(byte)
            .is_some_and(|bits| bits & (1 << (page % 8)) != 0)
    }

    pub fn entry(&self, page: u32) -> Option<&PageEntry> {
        self.table
            .binary_search_by_key(&page, |entry| entry.page)
            .ok()
            .map(|index| &self.table[index])
    }

    pub fn storage_page_of(&self, page: u32) -> Option<usize> {
        self.entry(page).and_then(|entry| entry.storage_page)
    }

    /// Number of pages that have storage.
    pub fn page_count(&self) -> usize {
        self.materialized.len()
    }

    pub fn glyph_count(&self) -> usize {
        self.page_count() * PAGE_SIZE
    }

    pub fn mask(&self) -> &[u8] {
        &self.mask
    }

    pub fn entries(&self) -> &[PageEntry] {
        &self.table
    }

    /// Page numbers in storage order.
    pub fn materialized_pages(&self) -> &[u32] {
        &self.materialized
    }

    /// Marks `page` present and gives it storage. Pages after it in storage
    /// move up by one. Returns the storage page it now occupies.
    ///
    /// The page must not already be materialized.
    pub fn materialize(&mut self, page: u32) -> usize {
        debug_assert!((page as usize) < crate::MAX_PAGE_COUNT);
        debug_assert!(self.storage_page_of(page).is_none());

        let byte = page as usize / 8;
        if self.mask.len() <= byte {
            self.mask.resize(byte + 1, 0);
        }
        self.mask[byte] |= 1 << (page % 8);

        let storage_page = self.materialized.partition_point(|&other| other < page);
        self.materialized.insert(storage_page, page);
        for entry in &mut self.table {
            if let Some(other) = entry.storage_page.as_mut() {
                if *other >= storage_page {
                    *other += 1;
                }
            }
        }

        match self.table.binary_search_by_key(&page, |entry| entry.page) {
            Ok(index) => self.table[index].storage_page = Some(storage_page),
            Err(index) => self.table.insert(
                index,
                PageEntry {
                    page,
                    storage_page: Some(storage_page),
                },
            ),
        }
        storage_page
    }

    /// Drops a page from memory. Its presence bit stays set until the font is
    /// encoded again. Returns the storage page it used to occupy.
    pub fn drop_page(&mut self, page: u32) -> Option<usize> {
        let index = self
            .table
            .binary_search_by_key(&page, |entry| entry.page)
            .ok()?;
        let storage_page = self.table[index].storage_page.take()?;
        self.materialized.remove(storage_page);
        for entry in &mut self.table {
            if let Some(other) = entry.storage_page.as_mut() {
                if *other > storage_page {
                    *other -= 1;
                }
            }
        }
        Some(storage_page)
    }

    /// The presence mask as it should be persisted: only pages that still have
    /// storage keep their bit.
    pub fn encoded_mask(&self) -> Vec<u8> {
        let mut mask = vec![0u8; self.mask.len()];
        for &page in &self.materialized {
            mask[page as usize / 8] |= 1 << (page % 8);
        }
        mask
    }
}
