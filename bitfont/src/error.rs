//! Error types for bitfont

use alloc::string::String;
use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontError {
    /// There was no backing buffer, or it does not hold a well formed font
    NotFound(String),
    /// A mutation addressed a code point that has no storage slot
    OutOfRange {
        /// The code point that failed to resolve
        code_point: u32,
    },
    /// A mutation was attempted on a font backed by a borrowed buffer
    ReadOnlyViolation,
    /// Storage for a clone, subset or resize could not be allocated
    AllocationFailed {
        /// The number of bytes that were requested
        bytes: usize,
    },
    /// The nominal glyph width does not fit in a row
    UnsupportedGlyphWidth(u8),
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontError::NotFound(reason) => write!(f, "font not found: {}", reason),
            FontError::OutOfRange { code_point } => {
                write!(f, "code point U+{:04X} has no glyph slot", code_point)
            }
            FontError::ReadOnlyViolation => {
                write!(f, "font is backed by a read-only buffer")
            }
            FontError::AllocationFailed { bytes } => {
                write!(f, "failed to allocate {} bytes of glyph storage", bytes)
            }
            FontError::UnsupportedGlyphWidth(width) => write!(
                f,
                "glyph width {} exceeds the maximum of {}",
                width,
                crate::MAX_GLYPH_WIDTH
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FontError {}

impl FontError {
    pub(crate) fn not_found(reason: impl Into<String>) -> Self {
        FontError::NotFound(reason.into())
    }
}
