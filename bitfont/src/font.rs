use alloc::{sync::Arc, vec::Vec};

use tracing::{event, Level};

use crate::{
    directory::{page_of, PageDirectory},
    file::{self, FontFileHeader, FontSource, MagicBytes},
    fixed_string::FontName,
    glyph::Glyph,
    store::{try_copy, GlyphStore},
    FontError, SharedBytes, MAX_CODE_POINT_COUNT, MAX_GLYPH_WIDTH, MAX_PAGE_COUNT, PAGE_SIZE,
};

const REPLACEMENT_CHARACTER: u32 = 0xFFFD;
const DEFAULT_LINE_GAP: u8 = 4;

/// A monochrome bitmap font whose glyphs are stored in 256 code point pages.
///
/// Lookups never fail: a code point without a glyph is drawn with the font's
/// fallback glyph. Mutation is only possible on fonts that own their storage,
/// fonts loaded with [`BitmapFont::load_shared`] reject it with
/// [`FontError::ReadOnlyViolation`].
#[derive(Debug)]
pub struct BitmapFont {
    name: FontName,
    family: FontName,
    glyph_width: u8,
    glyph_height: u8,
    fixed_width: bool,
    /// Header byte behind `fixed_width`, written back as it was read.
    variable_width_flag: u8,
    glyph_spacing: u8,
    baseline: u8,
    mean_line: u8,
    x_height: u8,
    presentation_size: u8,
    weight: u16,
    slope: u8,
    line_gap: u8,
    min_glyph_width: u8,
    max_glyph_width: u8,
    /// How many stored glyphs have each non-zero width.
    width_histogram: [u32; 256],
    pub(crate) directory: PageDirectory,
    pub(crate) store: GlyphStore,
    fallback: Option<usize>,
}

impl BitmapFont {
    /// A blank font covering the first `glyph_count` code points, rounded up to
    /// whole pages. Fixed width fonts start with every glyph at the nominal
    /// width.
    pub fn create(
        glyph_height: u8,
        glyph_width: u8,
        fixed: bool,
        glyph_count: usize,
    ) -> Result<Self, FontError> {
        if glyph_width > MAX_GLYPH_WIDTH {
            return Err(FontError::UnsupportedGlyphWidth(glyph_width));
        }
        let page_count = glyph_count.div_ceil(PAGE_SIZE).min(MAX_PAGE_COUNT);
        let directory = PageDirectory::with_leading_pages(page_count);
        let mut store = GlyphStore::new(glyph_height, page_count)?;
        if fixed {
            for slot in 0..store.glyph_count() {
                store.set_width(slot, glyph_width)?;
            }
        }

        let header = FontFileHeader {
            magic: MagicBytes,
            glyph_width,
            glyph_height,
            range_mask_size: directory.mask().len() as u16,
            is_variable_width: u8::from(!fixed),
            glyph_spacing: 1,
            baseline: 0,
            mean_line: 0,
            presentation_size: 0,
            weight: 400,
            slope: 0,
            name: FontName::truncate("Untitled"),
            family: FontName::truncate("Untitled"),
        };
        Ok(Self::from_parts(&header, directory, store))
    }

    /// Decodes a font into storage the font owns.
    pub fn load_from_bytes(bytes: &[u8]) -> Result<Self, FontError> {
        let layout = file::parse_layout(bytes)?;
        let directory = PageDirectory::from_mask(try_copy(&bytes[layout.mask.clone()])?);
        let store = GlyphStore::from_owned(
            layout.header.glyph_height,
            try_copy(&bytes[layout.rows.clone()])?,
            try_copy(&bytes[layout.widths.clone()])?,
        );
        let font = Self::from_parts(&layout.header, directory, store);
        event!(
            Level::DEBUG,
            name = font.name.as_str(),
            pages = layout.page_count(),
            "loaded font"
        );
        Ok(font)
    }

    /// Decodes a font that keeps reading its glyphs from `bytes`. The font is
    /// read-only.
    pub fn load_shared(bytes: SharedBytes) -> Result<Self, FontError> {
        let buffer: &[u8] = AsRef::<[u8]>::as_ref(&*bytes);
        let layout = file::parse_layout(buffer)?;
        let directory = PageDirectory::from_mask(try_copy(&buffer[layout.mask.clone()])?);
        let store = GlyphStore::borrowed(
            layout.header.glyph_height,
            bytes.clone(),
            layout.rows.clone(),
            layout.widths.clone(),
        );
        let font = Self::from_parts(&layout.header, directory, store);
        event!(
            Level::DEBUG,
            name = font.name.as_str(),
            pages = layout.page_count(),
            "loaded shared font"
        );
        Ok(font)
    }

    pub fn load_from_source<S: FontSource + ?Sized>(source: &S) -> Result<Self, FontError> {
        let bytes = source.read_font().map_err(file::source_error)?;
        Self::load_shared(bytes)
    }

    #[cfg(feature = "std")]
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Self, FontError> {
        Self::load_from_source(path.as_ref())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        file::encode_font(
            self.header(),
            &self.directory.encoded_mask(),
            self.store.rows(),
            self.store.widths(),
        )
    }

    #[cfg(feature = "std")]
    pub fn write_to_file(&self, path: impl AsRef<std::path::Path>) -> std::io::Result<()> {
        let bytes = self.to_bytes();
        std::fs::write(path.as_ref(), &bytes)?;
        event!(
            Level::INFO,
            path = %path.as_ref().display(),
            len = bytes.len(),
            "wrote font"
        );
        Ok(())
    }

    pub fn header(&self) -> FontFileHeader {
        FontFileHeader {
            magic: MagicBytes,
            glyph_width: self.glyph_width,
            glyph_height: self.glyph_height,
            range_mask_size: self.directory.mask().len() as u16,
            is_variable_width: self.variable_width_flag,
            glyph_spacing: self.glyph_spacing,
            baseline: self.baseline,
            mean_line: self.mean_line,
            presentation_size: self.presentation_size,
            weight: self.weight,
            slope: self.slope,
            name: self.name,
            family: self.family,
        }
    }

    fn from_parts(header: &FontFileHeader, directory: PageDirectory, store: GlyphStore) -> Self {
        let mut font = Self {
            name: header.name,
            family: header.family,
            glyph_width: header.glyph_width,
            glyph_height: header.glyph_height,
            fixed_width: !header.is_variable_width(),
            variable_width_flag: header.is_variable_width,
            glyph_spacing: header.glyph_spacing,
            baseline: header.baseline,
            mean_line: header.mean_line,
            x_height: header.baseline.saturating_sub(header.mean_line),
            presentation_size: header.presentation_size,
            weight: header.weight,
            slope: header.slope,
            line_gap: DEFAULT_LINE_GAP,
            min_glyph_width: header.glyph_width,
            max_glyph_width: header.glyph_width,
            width_histogram: [0; 256],
            directory,
            store,
            fallback: None,
        };
        for width in font.store.widths() {
            if *width != 0 {
                font.width_histogram[*width as usize] += 1;
            }
        }
        font.update_width_bounds();
        font.update_fallback();
        font
    }

    /// A font with the same metadata as this one over different storage.
    pub(crate) fn with_storage(&self, directory: PageDirectory, store: GlyphStore) -> Self {
        let mut font = Self::from_parts(&self.header(), directory, store);
        font.line_gap = self.line_gap;
        font
    }

    /// An independent copy that owns its storage, even when this font is
    /// shared.
    pub fn try_clone(&self) -> Result<Self, FontError> {
        Ok(Self {
            directory: self.directory.clone(),
            store: self.store.try_clone()?,
            ..*self
        })
    }

    pub(crate) fn update_width_bounds(&mut self) {
        if self.fixed_width {
            self.min_glyph_width = self.glyph_width;
            self.max_glyph_width = self.glyph_width;
            return;
        }
        let histogram = &self.width_histogram;
        let mut used = (1..=u8::MAX).filter(|width| histogram[*width as usize] != 0);
        self.min_glyph_width = used.next().unwrap_or(0);
        self.max_glyph_width = used
            .next_back()
            .unwrap_or(self.min_glyph_width)
            .max(self.glyph_width);
    }

    fn store_width(&mut self, slot: usize, width: u8) -> Result<(), FontError> {
        let previous = self.store.width_at(slot);
        self.store.set_width(slot, width)?;
        if previous != 0 {
            self.width_histogram[previous as usize] -= 1;
        }
        if width != 0 {
            self.width_histogram[width as usize] += 1;
        }
        self.update_width_bounds();
        Ok(())
    }

    /// Picks the glyph drawn for code points the font does not have. Slots move
    /// whenever pages are added or dropped so this runs after every such change.
    pub(crate) fn update_fallback(&mut self) {
        self.fallback = [REPLACEMENT_CHARACTER, '?' as u32]
            .into_iter()
            .find_map(|code_point| {
                self.directory
                    .resolve_index(code_point)
                    .filter(|slot| self.store.width_at(*slot) != 0)
            })
            .or_else(|| self.directory.resolve_index(0));
    }

    // Lookup

    /// The glyph drawn for `code_point`, which is the fallback glyph when the
    /// font has no slot for it.
    pub fn glyph(&self, code_point: u32) -> Glyph<'_> {
        match self.glyph_index(code_point) {
            Some(slot) => self.glyph_at(slot),
            None => Glyph::blank(self.glyph_height),
        }
    }

    /// The glyph stored for `code_point`, without falling back.
    pub fn raw_glyph(&self, code_point: u32) -> Option<Glyph<'_>> {
        self.raw_glyph_index(code_point).map(|slot| self.glyph_at(slot))
    }

    pub fn contains_glyph(&self, code_point: u32) -> bool {
        self.raw_glyph_index(code_point)
            .is_some_and(|slot| self.store.width_at(slot) != 0)
    }

    pub fn glyph_width(&self, code_point: u32) -> u8 {
        if self.fixed_width {
            return self.glyph_width;
        }
        self.glyph_index(code_point)
            .map_or(0, |slot| self.store.width_at(slot))
    }

    /// Width of the glyph stored for `code_point`, 0 if there is none.
    pub fn raw_glyph_width(&self, code_point: u32) -> u8 {
        if self.fixed_width {
            return self.glyph_width;
        }
        self.raw_glyph_index(code_point)
            .map_or(0, |slot| self.store.width_at(slot))
    }

    /// The slot used to draw `code_point`.
    pub fn glyph_index(&self, code_point: u32) -> Option<usize> {
        self.directory.resolve_index(code_point).or(self.fallback)
    }

    pub fn raw_glyph_index(&self, code_point: u32) -> Option<usize> {
        self.directory.resolve_index(code_point)
    }

    /// # Panics
    ///
    /// If `slot` is not below [`glyph_count`](Self::glyph_count).
    pub fn glyph_at(&self, slot: usize) -> Glyph<'_> {
        Glyph::new(
            self.store.rows_at(slot),
            self.glyph_width_at(slot),
            self.glyph_height,
        )
    }

    pub fn glyph_width_at(&self, slot: usize) -> u8 {
        if self.fixed_width {
            self.glyph_width
        } else {
            self.store.width_at(slot)
        }
    }

    pub fn index_to_code_point(&self, slot: usize) -> u32 {
        self.directory.index_to_code_point(slot)
    }

    pub fn page_is_empty(&self, code_point: u32) -> bool {
        self.directory.page_is_empty(code_point)
    }

    pub fn glyph_count(&self) -> usize {
        self.store.glyph_count()
    }

    pub fn fallback_index(&self) -> Option<usize> {
        self.fallback
    }

    pub fn directory(&self) -> &PageDirectory {
        &self.directory
    }

    pub fn is_borrowed(&self) -> bool {
        self.store.is_borrowed()
    }

    // Mutation

    fn slot_for_mutation(&self, code_point: u32) -> Result<usize, FontError> {
        if self.store.is_borrowed() {
            return Err(FontError::ReadOnlyViolation);
        }
        self.directory
            .resolve_index(code_point)
            .ok_or(FontError::OutOfRange { code_point })
    }

    pub fn set_glyph_width(&mut self, code_point: u32, width: u8) -> Result<(), FontError> {
        if width > MAX_GLYPH_WIDTH {
            return Err(FontError::UnsupportedGlyphWidth(width));
        }
        let slot = self.slot_for_mutation(code_point)?;
        self.store_width(slot, width)?;
        self.update_fallback();
        Ok(())
    }

    /// Replaces row `y` of the glyph for `code_point`. Bit `x` is column `x`.
    ///
    /// # Panics
    ///
    /// If `y` is not below the glyph height.
    pub fn set_glyph_row(&mut self, code_point: u32, y: usize, bits: u32) -> Result<(), FontError> {
        assert!(y < self.glyph_height as usize, "row {} out of range", y);
        let slot = self.slot_for_mutation(code_point)?;
        let start = y * crate::BYTES_PER_ROW;
        self.store.rows_mut(slot)?[start..start + crate::BYTES_PER_ROW]
            .copy_from_slice(&bits.to_le_bytes());
        Ok(())
    }

    pub fn clear_glyph(&mut self, code_point: u32) -> Result<(), FontError> {
        let slot = self.slot_for_mutation(code_point)?;
        self.store.rows_mut(slot)?.fill(0);
        self.store_width(slot, 0)?;
        self.update_fallback();
        Ok(())
    }

    /// Gives the page holding `code_point` storage so its glyphs can be set.
    pub fn materialize_page(&mut self, code_point: u32) -> Result<(), FontError> {
        if self.store.is_borrowed() {
            return Err(FontError::ReadOnlyViolation);
        }
        if code_point as usize >= MAX_CODE_POINT_COUNT {
            return Err(FontError::OutOfRange { code_point });
        }
        let page = page_of(code_point);
        if self.directory.storage_page_of(page).is_some() {
            return Ok(());
        }

        let storage_page = self
            .directory
            .materialized_pages()
            .partition_point(|&other| other < page);
        self.store.insert_blank_page(storage_page)?;
        let placed = self.directory.materialize(page);
        debug_assert_eq!(placed, storage_page);
        if self.fixed_width {
            let first = storage_page * PAGE_SIZE;
            for slot in first..first + PAGE_SIZE {
                self.store_width(slot, self.glyph_width)?;
            }
        }
        self.update_fallback();
        event!(Level::DEBUG, page, storage_page, "materialized page");
        Ok(())
    }

    // Metadata

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = FontName::truncate(name);
    }

    pub fn family(&self) -> &str {
        self.family.as_str()
    }

    pub fn set_family(&mut self, family: &str) {
        self.family = FontName::truncate(family);
    }

    /// The nominal glyph width.
    pub fn glyph_fixed_width(&self) -> u8 {
        self.glyph_width
    }

    pub fn glyph_height(&self) -> u8 {
        self.glyph_height
    }

    pub fn is_fixed_width(&self) -> bool {
        self.fixed_width
    }

    pub fn set_fixed_width(&mut self, fixed_width: bool) {
        if fixed_width != self.fixed_width {
            self.variable_width_flag = u8::from(!fixed_width);
        }
        self.fixed_width = fixed_width;
        self.update_width_bounds();
    }

    pub fn glyph_spacing(&self) -> u8 {
        self.glyph_spacing
    }

    pub fn set_glyph_spacing(&mut self, spacing: u8) {
        self.glyph_spacing = spacing;
    }

    pub fn baseline(&self) -> u8 {
        self.baseline
    }

    pub fn set_baseline(&mut self, baseline: u8) {
        self.baseline = baseline;
        self.x_height = self.baseline.saturating_sub(self.mean_line);
    }

    pub fn mean_line(&self) -> u8 {
        self.mean_line
    }

    pub fn set_mean_line(&mut self, mean_line: u8) {
        self.mean_line = mean_line;
        self.x_height = self.baseline.saturating_sub(self.mean_line);
    }

    pub fn x_height(&self) -> u8 {
        self.x_height
    }

    pub fn presentation_size(&self) -> u8 {
        self.presentation_size
    }

    pub fn set_presentation_size(&mut self, size: u8) {
        self.presentation_size = size;
    }

    pub fn weight(&self) -> u16 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: u16) {
        self.weight = weight;
    }

    pub fn slope(&self) -> u8 {
        self.slope
    }

    pub fn set_slope(&mut self, slope: u8) {
        self.slope = slope;
    }

    pub fn line_gap(&self) -> u8 {
        self.line_gap
    }

    pub fn set_line_gap(&mut self, line_gap: u8) {
        self.line_gap = line_gap;
    }

    pub fn min_glyph_width(&self) -> u8 {
        self.min_glyph_width
    }

    pub fn max_glyph_width(&self) -> u8 {
        self.max_glyph_width
    }
}

impl TryFrom<&[u8]> for BitmapFont {
    type Error = FontError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::load_from_bytes(bytes)
    }
}

impl TryFrom<Vec<u8>> for BitmapFont {
    type Error = FontError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::load_shared(Arc::new(bytes))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Resolution;

    fn katica() -> BitmapFont {
        let mut font = BitmapFont::create(10, 8, false, 256).unwrap();
        font.set_name("Katica 10");
        font.set_family("Katica");
        font.set_glyph_width('A' as u32, 6).unwrap();
        font.set_glyph_row('A' as u32, 0, 0b0011_1100).unwrap();
        font.set_glyph_width('?' as u32, 5).unwrap();
        font.set_glyph_row('?' as u32, 1, 0b1_1110).unwrap();
        font
    }

    #[test]
    fn create_rounds_up_to_pages() {
        let font = BitmapFont::create(8, 8, false, 300).unwrap();
        assert_eq!(font.glyph_count(), 512);
        assert_eq!(font.directory().mask(), &[0b11]);
        assert_eq!(font.name(), "Untitled");
        assert_eq!(font.weight(), 400);
        assert_eq!(
            BitmapFont::create(8, 33, false, 1).unwrap_err(),
            FontError::UnsupportedGlyphWidth(33)
        );
    }

    #[test]
    fn created_fixed_width_font_is_populated() {
        let font = BitmapFont::create(8, 6, true, 256).unwrap();
        assert!(font.contains_glyph('x' as u32));
        assert_eq!(font.glyph_width(0x4E00), 6);
        assert_eq!(font.min_glyph_width(), 6);
        assert_eq!(font.max_glyph_width(), 6);
    }

    #[test]
    fn lookup_hits_and_falls_back() {
        let font = katica();
        assert!(font.contains_glyph('A' as u32));
        assert!(!font.contains_glyph('B' as u32));
        assert_eq!(font.glyph('A' as u32).row(0), 0b0011_1100);

        // 'B' has a slot, even though it is empty
        assert_eq!(font.glyph_index('B' as u32), Some('B' as usize));
        assert_eq!(font.glyph_width('B' as u32), 0);

        assert!(font.page_is_empty(0x4E00));
        assert_eq!(font.glyph_index(0x4E00), Some('?' as usize));
        assert_eq!(font.glyph(0x4E00).row(1), 0b1_1110);
        assert_eq!(font.glyph_width(0x4E00), 5);
        assert_eq!(font.raw_glyph_width(0x4E00), 0);
        assert!(font.raw_glyph(0x4E00).is_none());
        assert_eq!(font.glyph_index(u32::MAX), Some('?' as usize));
    }

    #[test]
    fn fallback_prefers_replacement_character() {
        let mut font = katica();
        font.materialize_page(0xFFFD).unwrap();
        assert_eq!(font.fallback_index(), Some('?' as usize));
        font.set_glyph_width(0xFFFD, 7).unwrap();
        assert_eq!(font.fallback_index(), font.raw_glyph_index(0xFFFD));
        assert_eq!(font.glyph_width(0x4E00), 7);
    }

    #[test]
    fn fallback_falls_to_code_point_zero() {
        let font = BitmapFont::create(8, 8, false, 256).unwrap();
        assert_eq!(font.fallback_index(), Some(0));
        assert!(font.glyph(0x4E00).is_empty());
    }

    #[test]
    fn no_fallback_yields_blank_glyph() {
        let mut font = BitmapFont::create(8, 8, false, 0).unwrap();
        assert_eq!(font.fallback_index(), None);
        assert!(font.glyph('A' as u32).is_empty());
        assert_eq!(font.glyph('A' as u32).height(), 8);
        assert_eq!(font.glyph_width('A' as u32), 0);

        font.materialize_page(0x4E00).unwrap();
        assert_eq!(font.fallback_index(), None);
        font.set_glyph_width('?' as u32, 3).unwrap_err();
    }

    #[test]
    fn mutation_outside_storage_is_out_of_range() {
        let mut font = katica();
        assert_eq!(
            font.set_glyph_width(0x4E00, 3),
            Err(FontError::OutOfRange { code_point: 0x4E00 })
        );
        assert_eq!(
            font.clear_glyph(0x110000),
            Err(FontError::OutOfRange {
                code_point: 0x110000
            })
        );
        assert_eq!(
            font.materialize_page(0x110000),
            Err(FontError::OutOfRange {
                code_point: 0x110000
            })
        );
        assert_eq!(
            font.set_glyph_width('A' as u32, 40),
            Err(FontError::UnsupportedGlyphWidth(40))
        );
    }

    #[test]
    fn materialized_page_keeps_existing_glyphs() {
        let mut font = katica();
        font.materialize_page(0x4E00).unwrap();
        assert_eq!(font.directory().resolve(0x4E2D), Resolution::Hit(256 + 0x2D));
        font.set_glyph_width(0x4E2D, 8).unwrap();
        assert!(font.contains_glyph(0x4E2D));
        assert!(font.contains_glyph('A' as u32));
        assert_eq!(font.glyph('A' as u32).row(0), 0b0011_1100);

        // a page below an existing one moves the later page up
        font.materialize_page(0x0400).unwrap();
        assert_eq!(font.raw_glyph_index(0x4E2D), Some(2 * 256 + 0x2D));
        assert_eq!(font.glyph_width(0x4E2D), 8);
        assert_eq!(font.index_to_code_point(256), 0x0400);
    }

    #[test]
    fn clear_glyph_empties_it() {
        let mut font = katica();
        font.clear_glyph('A' as u32).unwrap();
        assert!(!font.contains_glyph('A' as u32));
        assert_eq!(font.glyph('A' as u32).row(0), 0);
    }

    #[test]
    fn width_bounds_track_stored_glyphs() {
        let mut font = katica();
        assert_eq!(font.min_glyph_width(), 5);
        assert_eq!(font.max_glyph_width(), 8);
        font.set_glyph_width('W' as u32, 12).unwrap();
        assert_eq!(font.max_glyph_width(), 12);
        font.set_glyph_width('i' as u32, 2).unwrap();
        assert_eq!(font.min_glyph_width(), 2);
    }

    #[test]
    fn width_bounds_shrink_when_extremes_go() {
        let mut font = katica();
        font.set_glyph_width('W' as u32, 12).unwrap();
        font.set_glyph_width('M' as u32, 12).unwrap();
        font.set_glyph_width('i' as u32, 2).unwrap();

        font.clear_glyph('W' as u32).unwrap();
        assert_eq!(font.max_glyph_width(), 12);
        font.set_glyph_width('M' as u32, 7).unwrap();
        assert_eq!(font.max_glyph_width(), 8);

        font.set_glyph_width('i' as u32, 3).unwrap();
        assert_eq!(font.min_glyph_width(), 3);
        font.clear_glyph('i' as u32).unwrap();
        assert_eq!(font.min_glyph_width(), 5);

        for code_point in ['A', '?', 'M'] {
            font.clear_glyph(code_point as u32).unwrap();
        }
        assert_eq!(font.min_glyph_width(), 0);
        assert_eq!(font.max_glyph_width(), 8);
    }

    #[test]
    fn width_bounds_count_fixed_width_pages() {
        let mut font = BitmapFont::create(8, 6, true, 256).unwrap();
        font.materialize_page(0x4E00).unwrap();
        font.set_fixed_width(false);
        assert_eq!(font.min_glyph_width(), 6);
        font.set_glyph_width('x' as u32, 9).unwrap();
        assert_eq!(font.max_glyph_width(), 9);
        font.set_glyph_width('x' as u32, 6).unwrap();
        assert_eq!(font.max_glyph_width(), 6);

        let reloaded = BitmapFont::load_from_bytes(&font.to_bytes()).unwrap();
        assert_eq!(reloaded.min_glyph_width(), 6);
        assert_eq!(reloaded.max_glyph_width(), 6);
    }

    #[test]
    fn variable_width_byte_is_written_back_unchanged() {
        let mut bytes = katica().to_bytes();
        bytes[8] = 2;
        let font = BitmapFont::load_from_bytes(&bytes).unwrap();
        assert!(!font.is_fixed_width());
        assert_eq!(font.header().is_variable_width, 2);
        assert_eq!(font.to_bytes(), bytes);

        let mut font = font;
        font.set_fixed_width(false);
        assert_eq!(font.header().is_variable_width, 2);
        font.set_fixed_width(true);
        assert_eq!(font.header().is_variable_width, 0);
        font.set_fixed_width(false);
        assert_eq!(font.header().is_variable_width, 1);
    }

    #[test]
    fn x_height_follows_baseline_and_mean_line() {
        let mut font = katica();
        font.set_baseline(8);
        font.set_mean_line(3);
        assert_eq!(font.x_height(), 5);
        font.set_mean_line(9);
        assert_eq!(font.x_height(), 0);
    }

    #[test]
    fn fixed_width_ignores_stored_widths() {
        let mut font = katica();
        font.set_fixed_width(true);
        assert_eq!(font.glyph_width('B' as u32), 8);
        assert_eq!(font.glyph_width(0x4E00), 8);
        assert_eq!(font.raw_glyph_width(0x4E00), 8);
        assert_eq!(font.glyph('A' as u32).width(), 8);
    }

    #[test]
    fn shared_font_is_read_only() {
        let bytes = katica().to_bytes();
        let mut font = BitmapFont::try_from(bytes).unwrap();
        assert!(font.is_borrowed());
        assert_eq!(font.glyph('A' as u32).row(0), 0b0011_1100);
        assert_eq!(
            font.set_glyph_width('A' as u32, 1),
            Err(FontError::ReadOnlyViolation)
        );
        assert_eq!(
            font.materialize_page(0x4E00),
            Err(FontError::ReadOnlyViolation)
        );

        let mut copy = font.try_clone().unwrap();
        assert!(!copy.is_borrowed());
        copy.set_glyph_width('A' as u32, 1).unwrap();
        assert_eq!(copy.glyph_width('A' as u32), 1);
        assert_eq!(font.glyph_width('A' as u32), 6);
    }

    #[test]
    fn unmodified_font_round_trips_exactly() {
        let bytes = katica().to_bytes();
        let font = BitmapFont::load_from_bytes(&bytes).unwrap();
        assert!(!font.is_borrowed());
        assert_eq!(font.name(), "Katica 10");
        assert_eq!(font.family(), "Katica");
        assert_eq!(font.to_bytes(), bytes);
    }
}
