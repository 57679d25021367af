//! NUL padded strings stored in a fixed number of bytes.
use core::fmt;
use core::str::FromStr;

use bincode::{
    de::{read::Reader, BorrowDecoder, Decoder},
    enc::{write::Writer, Encoder},
    error::{DecodeError, EncodeError},
};

/// A string kept in exactly `N` bytes, padded with NUL. At most `N - 1` bytes
/// are content so the field is always terminated.
///
/// The bytes are kept as read, so a decoded field encodes back identically
/// even when it carries junk after the terminator.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedString<const N: usize> {
    bytes: [u8; N],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringTooLong {
    pub max_len: usize,
    pub actual_len: usize,
}

impl fmt::Display for StringTooLong {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "string too long: max length is {} bytes but got {}",
            self.max_len, self.actual_len
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StringTooLong {}

impl<const N: usize> FixedString<N> {
    pub fn new(s: &str) -> Result<Self, StringTooLong> {
        if s.len() > Self::max_length() {
            return Err(StringTooLong {
                max_len: Self::max_length(),
                actual_len: s.len(),
            });
        }
        Ok(Self::truncate(s))
    }

    /// Keeps as much of `s` as fits without splitting a character.
    pub fn truncate(s: &str) -> Self {
        let mut end = s.len().min(Self::max_length());
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        let mut bytes = [0u8; N];
        bytes[..end].copy_from_slice(&s.as_bytes()[..end]);
        Self { bytes }
    }

    pub fn from_bytes(bytes: [u8; N]) -> Self {
        Self { bytes }
    }

    /// The content up to the first NUL. Bytes that are not UTF-8 end the string
    /// early.
    pub fn as_str(&self) -> &str {
        let content = match self.bytes.iter().position(|byte| *byte == 0) {
            Some(end) => &self.bytes[..end],
            None => &self.bytes[..],
        };
        match core::str::from_utf8(content) {
            Ok(s) => s,
            Err(e) => core::str::from_utf8(&content[..e.valid_up_to()]).unwrap_or_default(),
        }
    }

    pub fn as_bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    pub fn max_length() -> usize {
        N.saturating_sub(1)
    }

    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const N: usize> Default for FixedString<N> {
    fn default() -> Self {
        Self { bytes: [0u8; N] }
    }
}

impl<const N: usize> AsRef<str> for FixedString<N> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<const N: usize> fmt::Display for FixedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

impl<const N: usize> fmt::Debug for FixedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl<const N: usize> FromStr for FixedString<N> {
    type Err = StringTooLong;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<const N: usize> TryFrom<&str> for FixedString<N> {
    type Error = StringTooLong;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<const N: usize> bincode::Encode for FixedString<N> {
    fn encode<E: Encoder>(&self, encoder: &mut E) -> Result<(), EncodeError> {
        encoder.writer().write(&self.bytes)
    }
}

impl<const N: usize, Context> bincode::Decode<Context> for FixedString<N> {
    fn decode<D: Decoder<Context = Context>>(decoder: &mut D) -> Result<Self, DecodeError> {
        let mut bytes = [0u8; N];
        decoder.reader().read(&mut bytes)?;
        Ok(Self { bytes })
    }
}

impl<'de, const N: usize, Context> bincode::BorrowDecode<'de, Context> for FixedString<N> {
    fn borrow_decode<D: BorrowDecoder<'de, Context = Context>>(
        decoder: &mut D,
    ) -> Result<Self, DecodeError> {
        let mut bytes = [0u8; N];
        decoder.reader().read(&mut bytes)?;
        Ok(Self { bytes })
    }
}

pub const FONT_NAME_LEN: usize = 32;

pub type FontName = FixedString<FONT_NAME_LEN>;
