use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
    DataByte, ParseError,
    reader::{ReadResult, Reader, ReaderError},
};

/// The kind of a channel voice message, as found in the high nibble of its status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum VoiceKind {
    /// `0x8n`
    NoteOff = 0x8,
    /// `0x9n`
    NoteOn = 0x9,
    /// `0xAn`, polyphonic key pressure
    Aftertouch = 0xA,
    /// `0xBn`
    ControlChange = 0xB,
    /// `0xCn`
    ProgramChange = 0xC,
    /// `0xDn`
    ChannelPressure = 0xD,
    /// `0xEn`
    PitchBend = 0xE,
}

impl VoiceKind {
    /// Identifies the kind from a full status byte
    pub fn from_status(status: u8) -> Result<Self, ParseError> {
        Self::try_from(status >> 4).map_err(|_| ParseError::UnknownStatus(status))
    }

    /// How many data bytes follow the status byte
    pub const fn data_len(&self) -> usize {
        match self {
            Self::ProgramChange | Self::ChannelPressure => 1,
            Self::NoteOff
            | Self::NoteOn
            | Self::Aftertouch
            | Self::ControlChange
            | Self::PitchBend => 2,
        }
    }
}

/// A 14-bit pitch wheel position. `0x2000` is centered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PitchBend {
    pub(crate) lsb: DataByte,
    pub(crate) msb: DataByte,
}

impl PitchBend {
    /// The centered wheel
    pub const CENTER: Self = Self::new_unchecked(0x2000);

    /// Returns `None` if `value` does not fit in 14 bits.
    pub const fn new(value: u16) -> Option<Self> {
        if value > 0x3FFF {
            return None;
        }
        Some(Self::new_unchecked(value))
    }

    const fn new_unchecked(value: u16) -> Self {
        Self {
            lsb: DataByte::new_unchecked((value & 0x7F) as u8),
            msb: DataByte::new_unchecked((value >> 7) as u8),
        }
    }

    /// Builds the position from its two data bytes
    pub const fn from_bytes(lsb: DataByte, msb: DataByte) -> Self {
        Self { lsb, msb }
    }

    /// The 14-bit position
    pub const fn value(&self) -> u16 {
        ((self.msb.0 as u16) << 7) | self.lsb.0 as u16
    }

    /// Offset from center, -8192 through 8191
    pub const fn offset(&self) -> i16 {
        self.value() as i16 - 0x2000
    }
}

#[doc = r#"
The body of a channel voice message.

A note-on with a velocity of zero never appears here after decoding: the
format treats it as a note-off, and the parser reports it as
[`VoiceEvent::NoteOff`] with a velocity of zero.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum VoiceEvent {
    /// A key was released
    NoteOff { key: DataByte, velocity: DataByte },
    /// A key was pressed
    NoteOn { key: DataByte, velocity: DataByte },
    /// Pressure applied to a single held key
    Aftertouch { key: DataByte, pressure: DataByte },
    /// A controller changed value
    ControlChange {
        controller: DataByte,
        value: DataByte,
    },
    /// Select a patch
    ProgramChange { program: DataByte },
    /// Pressure applied to the whole channel
    ChannelPressure { pressure: DataByte },
    /// Pitch wheel moved
    PitchBend(PitchBend),
}

impl VoiceEvent {
    /// The kind of event, used for the status byte
    pub const fn kind(&self) -> VoiceKind {
        match self {
            Self::NoteOff { .. } => VoiceKind::NoteOff,
            Self::NoteOn { .. } => VoiceKind::NoteOn,
            Self::Aftertouch { .. } => VoiceKind::Aftertouch,
            Self::ControlChange { .. } => VoiceKind::ControlChange,
            Self::ProgramChange { .. } => VoiceKind::ProgramChange,
            Self::ChannelPressure { .. } => VoiceKind::ChannelPressure,
            Self::PitchBend(_) => VoiceKind::PitchBend,
        }
    }

    /// True for a note-off, or a note-on with zero velocity
    pub const fn is_note_off(&self) -> bool {
        match self {
            Self::NoteOff { .. } => true,
            Self::NoteOn { velocity, .. } => velocity.0 == 0,
            _ => false,
        }
    }

    /// Reads the data bytes that follow a status byte of the given kind.
    pub(crate) fn read(kind: VoiceKind, reader: &mut Reader<'_>) -> ReadResult<Self> {
        let mut data = [DataByte::default(); 2];
        for slot in data.iter_mut().take(kind.data_len()) {
            let byte = reader.read_u8()?;
            *slot = DataByte::new(byte)
                .map_err(|e| ReaderError::parse_error(reader.buffer_position() - 1, e))?;
        }
        let [first, second] = data;
        Ok(match kind {
            VoiceKind::NoteOff => Self::NoteOff {
                key: first,
                velocity: second,
            },
            VoiceKind::NoteOn if second.0 == 0 => Self::NoteOff {
                key: first,
                velocity: second,
            },
            VoiceKind::NoteOn => Self::NoteOn {
                key: first,
                velocity: second,
            },
            VoiceKind::Aftertouch => Self::Aftertouch {
                key: first,
                pressure: second,
            },
            VoiceKind::ControlChange => Self::ControlChange {
                controller: first,
                value: second,
            },
            VoiceKind::ProgramChange => Self::ProgramChange { program: first },
            VoiceKind::ChannelPressure => Self::ChannelPressure { pressure: first },
            VoiceKind::PitchBend => Self::PitchBend(PitchBend::from_bytes(first, second)),
        })
    }

    /// The data bytes, and how many of them are used
    pub(crate) const fn data_bytes(&self) -> ([u8; 2], usize) {
        match *self {
            Self::NoteOff { key, velocity } | Self::NoteOn { key, velocity } => {
                ([key.0, velocity.0], 2)
            }
            Self::Aftertouch { key, pressure } => ([key.0, pressure.0], 2),
            Self::ControlChange { controller, value } => ([controller.0, value.0], 2),
            Self::ProgramChange { program } => ([program.0, 0], 1),
            Self::ChannelPressure { pressure } => ([pressure.0, 0], 1),
            Self::PitchBend(bend) => ([bend.lsb.0, bend.msb.0], 2),
        }
    }
}

#[test]
fn pitch_bend_splits_into_seven_bit_halves() {
    use pretty_assertions::assert_eq;
    let bend = PitchBend::new(0x3FFF).unwrap();
    assert_eq!((bend.lsb.value(), bend.msb.value()), (0x7F, 0x7F));
    assert_eq!(PitchBend::CENTER.offset(), 0);
    assert_eq!(PitchBend::new(0x0081).unwrap().value(), 0x0081);
    assert_eq!(PitchBend::new(0x4000), None);
}

#[test]
fn zero_velocity_note_on_reads_as_note_off() {
    use pretty_assertions::assert_eq;
    let bytes = [0x3C, 0x00];
    let mut reader = Reader::from_byte_slice(&bytes);
    let event = VoiceEvent::read(VoiceKind::NoteOn, &mut reader).unwrap();
    assert_eq!(
        event,
        VoiceEvent::NoteOff {
            key: DataByte(0x3C),
            velocity: DataByte(0)
        }
    );
}

#[test]
fn status_bytes_in_data_position_are_rejected() {
    use pretty_assertions::assert_eq;
    let bytes = [0x3C, 0x90];
    let mut reader = Reader::from_byte_slice(&bytes);
    let err = VoiceEvent::read(VoiceKind::NoteOn, &mut reader).unwrap_err();
    assert_eq!(err.position(), 1);
    assert_eq!(err.parse_error_kind(), Some(&ParseError::DataByte(0x90)));
}
