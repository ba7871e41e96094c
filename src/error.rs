use core::fmt;

use thiserror::Error;

use crate::file::meta::MetaKind;

#[doc = r#"
The ways a byte stream can fail to be a Standard MIDI File.

These are always wrapped in a [`ReaderError`](crate::reader::ReaderError), which
records the byte offset where the problem was found.
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Chunk framing errors
    #[error("Chunk: {0}")]
    Chunk(#[from] ChunkError),
    /// Header chunk errors
    #[error("Header: {0}")]
    Header(#[from] HeaderError),
    /// Errors assembling the file from its chunks
    #[error("File: {0}")]
    File(#[from] FileError),
    /// Meta event payload errors
    #[error("Meta event: {0}")]
    Meta(#[from] MetaError),
    /// SMPTE offset payload errors
    #[error("SMPTE offset: {0}")]
    Smpte(#[from] SmpteError),
    /// A variable length quantity ran past four bytes
    #[error("Variable length quantity is longer than 4 bytes")]
    VarLenTooLong,
    /// The input ended in the middle of a variable length quantity
    #[error("Variable length quantity is missing its final byte")]
    VarLenTruncated,
    /// A byte in data position had its leading bit set
    #[error("Invalid data byte {0:#04X}")]
    DataByte(u8),
    /// A status byte that starts no known event
    #[error("Unrecognized status byte {0:#04X}")]
    UnknownStatus(u8),
    /// A data byte appeared before any status byte was in effect
    #[error("Data byte {0:#04X} found with no running status in effect")]
    MissingRunningStatus(u8),
}

/// A four character chunk identifier, such as `MThd` or `MTrk`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkTag(pub [u8; 4]);

impl ChunkTag {
    /// `MThd`
    pub const HEADER: Self = Self(*b"MThd");
    /// `MTrk`
    pub const TRACK: Self = Self(*b"MTrk");
}

impl fmt::Display for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            if byte.is_ascii_graphic() {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\x{byte:02X}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkTag(\"{self}\")")
    }
}

/// Errors in the framing of a chunk
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChunkError {
    /// The chunk identifier was not the one expected at this point
    #[error("Expected a {expected} chunk, found {found}")]
    InvalidTag {
        /// The tag required here
        expected: ChunkTag,
        /// The tag present in the input
        found: ChunkTag,
    },
    /// The declared chunk length runs past the end of the input
    #[error("Chunk declares {declared} bytes but only {available} remain")]
    Length {
        /// Length written in the chunk header
        declared: u32,
        /// Bytes actually left in the input
        available: usize,
    },
}

/// Errors in the `MThd` chunk
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// The header length field was not 6
    #[error("Header length must be 6, found {0}")]
    Length(u32),
    /// The format field was not 0, 1 or 2
    #[error("Unknown file format {0}")]
    InvalidFormat(u16),
    /// Format 0 files hold exactly one track
    #[error("A single track file declares {0} tracks")]
    SingleTrackCount(u16),
    /// The division field uses SMPTE framing, which is not supported
    #[error("SMPTE division ({0:#04X}) is not supported")]
    SmpteTiming(u8),
    /// A division of zero ticks per quarter note
    #[error("Division of zero ticks per quarter note")]
    ZeroDivision,
}

/// Errors while assembling a file out of chunks
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FileError {
    /// A second header chunk was supplied
    #[error("Duplicate header chunk")]
    DuplicateHeader,
    /// A track chunk was supplied before the header
    #[error("Track chunk found before the header chunk")]
    TrackBeforeHeader,
    /// The file was finished without a header
    #[error("No header chunk")]
    NoHeader,
    /// The input ended before every declared track was read
    #[error("Header declares {declared} tracks but only {found} are present")]
    MissingTracks {
        /// Track count from the header
        declared: u16,
        /// Tracks actually present
        found: u16,
    },
    /// A track chunk beyond the count declared in the header
    #[error("Header declares only {declared} tracks")]
    ExtraTrack {
        /// Track count from the header
        declared: u16,
    },
}

/// Errors in the payload of a meta event
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetaError {
    /// A fixed size meta event carried the wrong number of bytes
    #[error("{kind:?} expects {expected} bytes, found {found}")]
    Length {
        /// The meta event kind
        kind: MetaKind,
        /// Payload size required by the kind
        expected: usize,
        /// Payload size declared in the stream
        found: usize,
    },
    /// A channel prefix outside 0-15
    #[error("Channel prefix {0} is out of range")]
    Channel(u8),
}

/// Errors in an SMPTE offset payload
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SmpteError {
    /// Payload was not five bytes
    #[error("Length must be 5, found {0}")]
    Length(usize),
    /// Frame rate bits outside 0-3
    #[error("Invalid frame rate type {0}")]
    TrackFrame(u8),
    /// Hours above 23
    #[error("Invalid hour offset {0}")]
    HourOffset(u8),
    /// Minutes above 59
    #[error("Invalid minute offset {0}")]
    MinuteOffset(u8),
    /// Seconds above 59
    #[error("Invalid second offset {0}")]
    SecondOffset(u8),
    /// Subframes above 99
    #[error("Invalid subframe {0}")]
    Subframe(u8),
}
