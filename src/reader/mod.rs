#![doc = r#"
A cursor over the bytes of a MIDI file.

The [`Reader`] never copies: every slice it hands out borrows from the
input, which is how parsed text and system exclusive payloads stay
zero-copy inside a [`MidiFile`](crate::file::MidiFile).

Positions reported in errors are absolute offsets into the original input,
including for readers scoped to a single track chunk.
"#]

mod error;
pub use error::*;

use crate::{ChunkError, ChunkTag, ParseError, VarLen};

/// A forward-only reader over a byte slice
#[derive(Clone, Debug)]
pub struct Reader<'slc> {
    data: &'slc [u8],
    /// offset of `data[0]` within the original input
    base: usize,
    position: usize,
}

impl<'slc> Reader<'slc> {
    /// Create a reader positioned at the start of `data`
    pub const fn from_byte_slice(data: &'slc [u8]) -> Self {
        Self {
            data,
            base: 0,
            position: 0,
        }
    }

    /// Create a reader over a slice that starts at `base` in some larger input.
    pub(crate) const fn with_offset(data: &'slc [u8], base: usize) -> Self {
        Self {
            data,
            base,
            position: 0,
        }
    }

    /// Absolute offset of the next byte to be read
    pub const fn buffer_position(&self) -> usize {
        self.base + self.position
    }

    /// Number of unread bytes
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// True when every byte has been consumed
    pub const fn is_at_end(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Returns the next byte without consuming it
    pub fn peek_u8(&self) -> ReadResult<u8> {
        self.data
            .get(self.position)
            .copied()
            .ok_or_else(|| ReaderError::oob(self.buffer_position()))
    }

    /// Reads one byte
    pub fn read_u8(&mut self) -> ReadResult<u8> {
        let byte = self.peek_u8()?;
        self.position += 1;
        Ok(byte)
    }

    /// Reads exactly `len` bytes
    pub fn read_slice(&mut self, len: usize) -> ReadResult<&'slc [u8]> {
        if len > self.remaining() {
            return Err(ReaderError::oob(self.buffer_position()));
        }
        let start = self.position;
        self.position += len;
        Ok(&self.data[start..self.position])
    }

    /// Reads exactly `SIZE` bytes into an array
    pub fn read_exact_size<const SIZE: usize>(&mut self) -> ReadResult<[u8; SIZE]> {
        let slice = self.read_slice(SIZE)?;
        let mut bytes = [0; SIZE];
        bytes.copy_from_slice(slice);
        Ok(bytes)
    }

    /// Reads a big-endian u16
    pub fn read_u16(&mut self) -> ReadResult<u16> {
        self.read_exact_size().map(u16::from_be_bytes)
    }

    /// Reads a big-endian u32
    pub fn read_u32(&mut self) -> ReadResult<u32> {
        self.read_exact_size().map(u32::from_be_bytes)
    }

    /// Reads a variable length quantity
    pub fn read_varlen(&mut self) -> ReadResult<u32> {
        let (value, consumed) = VarLen::decode(&self.data[self.position..])
            .map_err(|e| ReaderError::parse_error(self.buffer_position(), e))?;
        self.position += consumed;
        Ok(value)
    }

    /// Reads a variable length quantity, then that many bytes
    pub fn read_varlen_slice(&mut self) -> ReadResult<&'slc [u8]> {
        let len = self.read_varlen()?;
        self.read_slice(len as usize)
    }

    /// Reads a chunk header with the `expected` tag and returns the chunk
    /// body as its own reader.
    ///
    /// # Errors
    /// - [`ChunkError::InvalidTag`] if the tag differs
    /// - [`ChunkError::Length`] if the declared length runs past the input
    pub fn read_chunk(&mut self, expected: ChunkTag) -> ReadResult<Reader<'slc>> {
        let tag_position = self.buffer_position();
        let found = ChunkTag(self.read_exact_size()?);
        if found != expected {
            return Err(ReaderError::parse_error(
                tag_position,
                ChunkError::InvalidTag { expected, found }.into(),
            ));
        }
        let declared = self.read_u32()?;
        let available = self.remaining();
        if declared as usize > available {
            return Err(inv_data(self, ChunkError::Length { declared, available }));
        }
        let base = self.buffer_position();
        let body = self.read_slice(declared as usize)?;
        Ok(Reader::with_offset(body, base))
    }
}

pub(crate) fn inv_data(reader: &Reader<'_>, v: impl Into<ParseError>) -> ReaderError {
    ReaderError::parse_error(reader.buffer_position(), v.into())
}

#[test]
fn reads_chunk_bodies_with_absolute_positions() {
    use pretty_assertions::assert_eq;
    let bytes = [
        b'M', b'T', b'r', b'k', 0, 0, 0, 3, 0x00, 0x81, 0x00, 0xAA,
    ];
    let mut reader = Reader::from_byte_slice(&bytes);
    let mut chunk = reader.read_chunk(ChunkTag::TRACK).unwrap();
    assert_eq!(chunk.buffer_position(), 8);
    assert_eq!(chunk.read_varlen().unwrap(), 0);
    assert_eq!(chunk.read_varlen().unwrap(), 0x80);
    assert!(chunk.is_at_end());
    assert_eq!(chunk.read_u8().unwrap_err().position(), 11);
    assert_eq!(reader.read_u8().unwrap(), 0xAA);
}

#[test]
fn rejects_overlong_chunks() {
    use pretty_assertions::assert_eq;
    let bytes = [b'M', b'T', b'r', b'k', 0, 0, 0, 9, 0x00];
    let mut reader = Reader::from_byte_slice(&bytes);
    let err = reader.read_chunk(ChunkTag::TRACK).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::ParseError(ParseError::Chunk(ChunkError::Length {
            declared: 9,
            available: 1
        }))
    );
}
