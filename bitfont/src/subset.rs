//! Deriving fonts with a different set of materialized pages.
use alloc::vec::Vec;

use tracing::{event, Level};

use crate::{
    BitmapFont, FontError, GlyphStore, PageDirectory, MAX_PAGE_COUNT, MAX_RANGE_MASK_SIZE,
    PAGE_SIZE,
};

impl BitmapFont {
    fn fallback_storage_page(&self) -> Option<usize> {
        self.fallback_index().map(|slot| slot / PAGE_SIZE)
    }

    /// A copy of the font holding only its materialized pages, packed
    /// densely, with the presence mask cut after the highest of them. Blank
    /// pages are kept, dropping them is [`drop_empty_pages`](Self::drop_empty_pages).
    pub fn masked_character_set(&self) -> Result<BitmapFont, FontError> {
        let pages = self.directory.materialized_pages();
        let mask_len = pages.last().map_or(0, |page| *page as usize / 8 + 1);
        let mut mask = vec![0u8; mask_len];
        for page in pages {
            mask[*page as usize / 8] |= 1 << (page % 8);
        }

        let mut store = GlyphStore::new(self.glyph_height(), pages.len())?;
        for storage_page in 0..pages.len() {
            store.copy_page_from(&self.store, storage_page, storage_page)?;
        }
        event!(
            Level::DEBUG,
            pages = pages.len(),
            mask_len,
            "masked character set"
        );
        Ok(self.with_storage(PageDirectory::from_mask(mask), store))
    }

    /// A copy of the font with every page of the code point space
    /// materialized. Pages this font does not have are left empty.
    pub fn unmasked_character_set(&self) -> Result<BitmapFont, FontError> {
        let directory = PageDirectory::from_mask(vec![0xFF; MAX_RANGE_MASK_SIZE]);
        let mut store = GlyphStore::new(self.glyph_height(), MAX_PAGE_COUNT)?;
        for (source_page, page) in self.directory.materialized_pages().iter().enumerate() {
            store.copy_page_from(&self.store, source_page, *page as usize)?;
        }
        event!(
            Level::DEBUG,
            copied = self.directory.page_count(),
            "unmasked character set"
        );
        Ok(self.with_storage(directory, store))
    }

    /// Releases the storage of materialized pages whose glyphs are all empty.
    /// Their presence bits are cleared the next time the font is encoded.
    /// Returns how many pages were dropped.
    pub fn drop_empty_pages(&mut self) -> Result<usize, FontError> {
        if self.is_borrowed() {
            return Err(FontError::ReadOnlyViolation);
        }
        let fallback_page = self.fallback_storage_page();
        let blank: Vec<u32> = self
            .directory
            .materialized_pages()
            .iter()
            .enumerate()
            .filter(|(storage_page, _)| {
                Some(*storage_page) != fallback_page && self.store.page_is_blank(*storage_page)
            })
            .map(|(_, page)| *page)
            .collect();

        for page in &blank {
            if let Some(storage_page) = self.directory.drop_page(*page) {
                self.store.remove_page(storage_page)?;
            }
        }
        self.update_fallback();
        event!(Level::DEBUG, dropped = blank.len(), "dropped empty pages");
        Ok(blank.len())
    }
}
