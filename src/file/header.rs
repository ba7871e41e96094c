use crate::{
    ChunkError, ChunkTag, HeaderError,
    file::{FormatType, Timing, builder::RawFormat},
    prelude::*,
};

const HEADER_LENGTH: u32 = 6;

#[doc = r#"
The contents of the `MThd` chunk.

```text
"MThd" | 00 00 00 06 | format (2) | track count (2) | division (2)
```
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    format: RawFormat,
    timing: Timing,
}

impl Header {
    /// Create a new header from a format and timing
    pub const fn new(format: RawFormat, timing: Timing) -> Self {
        Self { format, timing }
    }

    /// Reads the header chunk at the reader's position.
    ///
    /// # Errors
    /// - [`ChunkError::InvalidTag`] if the chunk is not `MThd`
    /// - [`HeaderError::Length`] if the chunk length is not 6
    /// - [`HeaderError::InvalidFormat`] for a format other than 0, 1 or 2
    /// - [`HeaderError::SingleTrackCount`] for a format 0 file without exactly one track
    pub fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let tag_position = reader.buffer_position();
        let found = ChunkTag(reader.read_exact_size()?);
        if found != ChunkTag::HEADER {
            return Err(ReaderError::parse_error(
                tag_position,
                ChunkError::InvalidTag {
                    expected: ChunkTag::HEADER,
                    found,
                }
                .into(),
            ));
        }
        let length_position = reader.buffer_position();
        let length = reader.read_u32()?;
        if length != HEADER_LENGTH {
            return Err(ReaderError::parse_error(
                length_position,
                HeaderError::Length(length).into(),
            ));
        }

        let format_position = reader.buffer_position();
        let format = reader.read_u16()?;
        let format_type = FormatType::try_from(format).map_err(|_| {
            ReaderError::parse_error(format_position, HeaderError::InvalidFormat(format).into())
        })?;
        let num_tracks = reader.read_u16()?;
        let format = RawFormat::new(format_type, num_tracks)
            .map_err(|e| ReaderError::parse_error(format_position, e.into()))?;

        let timing = Timing::read(reader)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            format = u16::from(format_type),
            tracks = num_tracks,
            ticks_per_quarter_note = timing.ticks_per_quarter_note(),
            "read MIDI header"
        );

        Ok(Self { format, timing })
    }

    /// The full header chunk, tag and length included
    pub fn to_bytes(&self) -> [u8; 14] {
        let mut bytes = [0; 14];
        bytes[0..4].copy_from_slice(&ChunkTag::HEADER.0);
        bytes[4..8].copy_from_slice(&HEADER_LENGTH.to_be_bytes());
        bytes[8..10].copy_from_slice(&u16::from(self.format_type()).to_be_bytes());
        bytes[10..12].copy_from_slice(&self.num_tracks().to_be_bytes());
        bytes[12..14].copy_from_slice(&self.timing.to_bytes());
        bytes
    }

    /// The format and declared track count
    pub const fn format(&self) -> &RawFormat {
        &self.format
    }

    /// Returns the format type of the file
    pub const fn format_type(&self) -> FormatType {
        self.format.format_type()
    }

    /// Number of track chunks the header declares
    pub const fn num_tracks(&self) -> u16 {
        self.format.num_tracks()
    }

    /// Get the timing props
    pub const fn timing(&self) -> Timing {
        self.timing
    }
}

#[test]
fn header_layout() {
    use pretty_assertions::assert_eq;
    let header = Header::new(
        RawFormat::new(FormatType::Simultaneous, 2).unwrap(),
        Timing::new_ticks_per_quarter_note(480),
    );
    let bytes = header.to_bytes();
    assert_eq!(
        bytes,
        [
            b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 1, 0, 2, 0x01, 0xE0
        ]
    );
    let mut reader = Reader::from_byte_slice(&bytes);
    assert_eq!(Header::read(&mut reader).unwrap(), header);
}

#[test]
fn header_length_must_be_six() {
    use pretty_assertions::assert_eq;
    let bytes = [b'M', b'T', b'h', b'd', 0, 0, 0, 8, 0, 1, 0, 2, 0x01, 0xE0, 0, 0];
    let err = Header::read(&mut Reader::from_byte_slice(&bytes)).unwrap_err();
    assert_eq!(err.position(), 4);
    assert_eq!(
        err.parse_error_kind(),
        Some(&ParseError::Header(HeaderError::Length(8)))
    );
}

#[test]
fn smpte_division_is_rejected() {
    use pretty_assertions::assert_eq;
    let bytes = [b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0xE7, 0x28];
    let err = Header::read(&mut Reader::from_byte_slice(&bytes)).unwrap_err();
    assert_eq!(
        err.parse_error_kind(),
        Some(&ParseError::Header(HeaderError::SmpteTiming(0xE7)))
    );
}
