use crate::{
    ParseError,
    file::meta::MetaMessage,
    message::{
        channel::{ChannelVoiceMessage, VoiceKind},
        sysex::{SysExKind, SystemExclusiveMessage},
    },
    prelude::*,
};

/// Any event that can appear in a track chunk
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackMessage<'a> {
    /// A channel voice message
    ChannelVoice(ChannelVoiceMessage),
    /// A system exclusive payload, `F0` or `F7`
    SystemExclusive(SystemExclusiveMessage<'a>),
    /// A meta event, `FF`
    Meta(MetaMessage<'a>),
}

impl<'a> TrackMessage<'a> {
    /// The end-of-track marker
    pub const fn end_of_track() -> Self {
        Self::Meta(MetaMessage::EndOfTrack)
    }

    /// True for the end-of-track marker
    pub const fn is_end_of_track(&self) -> bool {
        matches!(self, Self::Meta(MetaMessage::EndOfTrack))
    }

    /// Detaches the message from the input buffer
    pub fn into_owned(self) -> TrackMessage<'static> {
        match self {
            Self::ChannelVoice(msg) => TrackMessage::ChannelVoice(msg),
            Self::SystemExclusive(msg) => TrackMessage::SystemExclusive(msg.into_owned()),
            Self::Meta(msg) => TrackMessage::Meta(msg.into_owned()),
        }
    }
}

impl From<ChannelVoiceMessage> for TrackMessage<'_> {
    fn from(value: ChannelVoiceMessage) -> Self {
        Self::ChannelVoice(value)
    }
}

impl<'a> From<SystemExclusiveMessage<'a>> for TrackMessage<'a> {
    fn from(value: SystemExclusiveMessage<'a>) -> Self {
        Self::SystemExclusive(value)
    }
}

impl<'a> From<MetaMessage<'a>> for TrackMessage<'a> {
    fn from(value: MetaMessage<'a>) -> Self {
        Self::Meta(value)
    }
}

/// A message and the ticks since the previous event in the same track
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackEvent<'a> {
    delta_ticks: u32,
    event: TrackMessage<'a>,
}

impl<'a> TrackEvent<'a> {
    /// Create a new event
    pub fn new(delta_ticks: u32, event: impl Into<TrackMessage<'a>>) -> Self {
        Self {
            delta_ticks,
            event: event.into(),
        }
    }

    /// Ticks since the previous event
    pub const fn delta_ticks(&self) -> u32 {
        self.delta_ticks
    }

    /// The message
    pub const fn event(&self) -> &TrackMessage<'a> {
        &self.event
    }

    /// Consumes the event, returning its message
    pub fn into_event(self) -> TrackMessage<'a> {
        self.event
    }

    /// Detaches the event from the input buffer
    pub fn into_owned(self) -> TrackEvent<'static> {
        TrackEvent {
            delta_ticks: self.delta_ticks,
            event: self.event.into_owned(),
        }
    }

    /// Reads one `(delta, event)` pair.
    ///
    /// `running_status` holds the last channel voice status byte. It is reused
    /// when the byte after the delta-time is a data byte, and replaced when a
    /// new channel voice status byte is read. Meta and system exclusive events
    /// leave it untouched.
    pub(crate) fn read(reader: &mut Reader<'a>, running_status: &mut Option<u8>) -> ReadResult<Self> {
        let delta_ticks = reader.read_varlen()?;

        let status_position = reader.buffer_position();
        let next = reader.peek_u8()?;
        let status = if next & 0x80 == 0 {
            (*running_status)
                .ok_or_else(|| inv_data(reader, ParseError::MissingRunningStatus(next)))?
        } else {
            reader.read_u8()?
        };

        let event = match status {
            0xFF => {
                let subtype = reader.read_u8()?;
                let data = reader.read_varlen_slice()?;
                let meta = MetaMessage::parse(subtype, data)
                    .map_err(|e| ReaderError::parse_error(status_position, e))?;
                #[cfg(feature = "tracing")]
                if let MetaMessage::Unknown { subtype, data } = &meta {
                    tracing::warn!(
                        position = status_position,
                        subtype,
                        len = data.len(),
                        "skipping unknown meta event"
                    );
                }
                TrackMessage::Meta(meta)
            }
            0xF0 | 0xF7 => {
                let kind = if status == 0xF0 {
                    SysExKind::Begin
                } else {
                    SysExKind::Escape
                };
                let data = reader.read_varlen_slice()?;
                TrackMessage::SystemExclusive(SystemExclusiveMessage::new(kind, data))
            }
            _ => {
                let kind = VoiceKind::from_status(status)
                    .map_err(|e| ReaderError::parse_error(status_position, e))?;
                *running_status = Some(status);
                TrackMessage::ChannelVoice(ChannelVoiceMessage::read(status, kind, reader)?)
            }
        };

        Ok(Self { delta_ticks, event })
    }
}

/// An event tagged with its absolute position in ticks from the start of its track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ticked<T> {
    accumulated_ticks: u64,
    event: T,
}

impl<T> Ticked<T> {
    /// Tag an event with a tick position
    pub const fn new(accumulated_ticks: u64, event: T) -> Self {
        Self {
            accumulated_ticks,
            event,
        }
    }

    /// Ticks since the start of the track
    pub const fn accumulated_ticks(&self) -> u64 {
        self.accumulated_ticks
    }

    /// The event
    pub const fn event(&self) -> &T {
        &self.event
    }

    /// Consumes self, returning the event
    pub fn into_event(self) -> T {
        self.event
    }
}

#[cfg(test)]
fn read_all(bytes: &[u8]) -> ReadResult<alloc::vec::Vec<TrackEvent<'_>>> {
    let mut reader = Reader::from_byte_slice(bytes);
    let mut running_status = None;
    let mut events = alloc::vec::Vec::new();
    while !reader.is_at_end() {
        events.push(TrackEvent::read(&mut reader, &mut running_status)?);
    }
    Ok(events)
}

#[test]
fn running_status_reuses_previous_status() {
    use crate::{DataByte, message::channel::Channel};
    use pretty_assertions::assert_eq;

    let bytes = [0x00, 0x91, 0x3C, 0x64, 0x60, 0x40, 0x50, 0x83, 0x60, 0x3C, 0x00];
    let events = read_all(&bytes).unwrap();
    assert_eq!(
        events,
        [
            TrackEvent::new(
                0,
                ChannelVoiceMessage::note_on(Channel::Two, DataByte(0x3C), DataByte(0x64))
            ),
            TrackEvent::new(
                0x60,
                ChannelVoiceMessage::note_on(Channel::Two, DataByte(0x40), DataByte(0x50))
            ),
            TrackEvent::new(
                0x1E0,
                ChannelVoiceMessage::note_off(Channel::Two, DataByte(0x3C), DataByte(0))
            ),
        ]
    );
}

#[test]
fn running_status_survives_meta_events() {
    use pretty_assertions::assert_eq;
    let bytes = [
        0x00, 0xC2, 0x05, // program change
        0x00, 0xFF, 0x06, 0x01, b'A', // marker
        0x10, 0x07, // program change under running status
    ];
    let events = read_all(&bytes).unwrap();
    assert_eq!(events.len(), 3);
    assert!(matches!(events[2].event(), TrackMessage::ChannelVoice(msg) if msg.status() == 0xC2));
    assert_eq!(events[2].delta_ticks(), 0x10);
}

#[test]
fn data_byte_without_status_is_an_error() {
    use pretty_assertions::assert_eq;
    let err = read_all(&[0x00, 0x3C, 0x40]).unwrap_err();
    assert_eq!(err.position(), 1);
    assert_eq!(
        err.parse_error_kind(),
        Some(&ParseError::MissingRunningStatus(0x3C))
    );
}

#[test]
fn system_common_status_is_rejected() {
    use pretty_assertions::assert_eq;
    let err = read_all(&[0x00, 0xF2, 0x00, 0x00]).unwrap_err();
    assert_eq!(err.parse_error_kind(), Some(&ParseError::UnknownStatus(0xF2)));
}

#[test]
fn sysex_payload_is_length_prefixed() {
    use pretty_assertions::assert_eq;
    let events = read_all(&[0x00, 0xF0, 0x03, 0x43, 0x12, 0xF7]).unwrap();
    assert_eq!(
        events[0].event(),
        &TrackMessage::SystemExclusive(SystemExclusiveMessage::new(
            SysExKind::Begin,
            &[0x43, 0x12, 0xF7][..]
        ))
    );
}
