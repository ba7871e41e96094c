use thiserror::Error;

#[doc = r#"
Values that cannot be represented in a Standard MIDI File.

Encoding stops at the first of these, and no bytes are handed back.
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WriteError {
    /// A delta time above the four byte variable length limit
    #[error("{0:#X} does not fit in a variable length quantity")]
    VarLenOverflow(u32),
    /// A meta or system exclusive payload longer than a variable length quantity can describe
    #[error("Payload of {0} bytes is too large")]
    PayloadTooLarge(usize),
    /// A chunk body longer than its 32-bit length field allows
    #[error("Chunk of {0} bytes is too large")]
    ChunkTooLarge(usize),
    /// More tracks than the 16-bit track count allows
    #[error("{0} tracks do not fit in the header")]
    TooManyTracks(usize),
    /// A format 0 file needs exactly one track
    #[error("A single track file cannot hold {0} tracks")]
    SingleTrackCount(usize),
    /// A key, velocity or other data value above 127
    #[error("Data byte {0} is above 127")]
    DataByte(u8),
    /// A pitch bend value above 14 bits
    #[error("Pitch bend {0:#X} is above 0x3FFF")]
    PitchBend(u16),
    /// A tempo above the 24-bit limit
    #[error("Tempo of {0} microseconds does not fit in 24 bits")]
    Tempo(u32),
    /// A division of zero ticks per quarter note
    #[error("Division of {0} ticks per quarter note")]
    Division(u16),
    /// An unknown meta event carrying a subtype the registry defines
    #[error("Meta subtype {0:#04X} has a defined meaning and cannot be written as unknown")]
    KnownSubtype(u8),
    /// An event was added after the end-of-track marker
    #[error("Event added after the end of the track")]
    EventAfterEndOfTrack,
}

/// The result of an encoding operation
pub type WriteResult<T> = Result<T, WriteError>;
