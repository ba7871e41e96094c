use crate::{HeaderError, prelude::*};

/// The division field of the header: how many ticks make a quarter note.
///
/// Only metrical timing is supported. A division with its leading bit set
/// (SMPTE frames and ticks per frame) is rejected when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timing {
    ticks_per_quarter_note: u16,
}

impl Timing {
    /// The leading bit of the u16 is disregarded, so 1-32767
    pub const fn new_ticks_per_quarter_note(tpqn: u16) -> Self {
        Self {
            ticks_per_quarter_note: tpqn & 0x7FFF,
        }
    }

    pub(crate) fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let position = reader.buffer_position();
        let bytes: [u8; 2] = reader.read_exact_size()?;
        if bytes[0] & 0x80 != 0 {
            return Err(ReaderError::parse_error(
                position,
                HeaderError::SmpteTiming(bytes[0]).into(),
            ));
        }
        let ticks_per_quarter_note = u16::from_be_bytes(bytes);
        if ticks_per_quarter_note == 0 {
            return Err(ReaderError::parse_error(
                position,
                HeaderError::ZeroDivision.into(),
            ));
        }
        Ok(Self {
            ticks_per_quarter_note,
        })
    }

    /// Returns the ticks per quarter note for the file.
    pub const fn ticks_per_quarter_note(&self) -> u16 {
        self.ticks_per_quarter_note
    }

    /// The division field as written
    pub const fn to_bytes(&self) -> [u8; 2] {
        self.ticks_per_quarter_note.to_be_bytes()
    }
}
