#![doc = r#"
Meta events

Meta events carry information that is never sent to a device: names,
tempo and time signature changes, and the end-of-track marker.

```text
FF <subtype> <len> <payload>
```

[`MetaKind`] is the registry of subtypes this crate understands, along with the
payload size each one requires. Subtypes outside the registry are not an
error: the payload is skipped using its declared length and surfaced as
[`MetaMessage::Unknown`].
"#]

mod key_signature;
pub use key_signature::*;

mod smpte_offset;
pub use smpte_offset::*;

mod tempo;
pub use tempo::*;

mod text;
pub use text::*;

mod time_signature;
pub use time_signature::*;

use alloc::borrow::Cow;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{MetaError, ParseError, message::channel::Channel};

/// The meta event subtypes with a defined meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum MetaKind {
    SequenceNumber = 0x00,
    Text = 0x01,
    Copyright = 0x02,
    TrackName = 0x03,
    InstrumentName = 0x04,
    Lyric = 0x05,
    Marker = 0x06,
    CuePoint = 0x07,
    ChannelPrefix = 0x20,
    EndOfTrack = 0x2F,
    Tempo = 0x51,
    SmpteOffset = 0x54,
    TimeSignature = 0x58,
    KeySignature = 0x59,
    SequencerSpecific = 0x7F,
}

/// How many payload bytes a meta event kind carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// Exactly this many bytes
    Fixed(usize),
    /// Any length
    Variable,
}

impl MetaKind {
    /// The payload size this kind requires
    pub const fn payload(&self) -> PayloadShape {
        use MetaKind::*;
        match self {
            SequenceNumber => PayloadShape::Fixed(2),
            Text | Copyright | TrackName | InstrumentName | Lyric | Marker | CuePoint => {
                PayloadShape::Variable
            }
            ChannelPrefix => PayloadShape::Fixed(1),
            EndOfTrack => PayloadShape::Fixed(0),
            Tempo => PayloadShape::Fixed(3),
            SmpteOffset => PayloadShape::Fixed(5),
            TimeSignature => PayloadShape::Fixed(4),
            KeySignature => PayloadShape::Fixed(2),
            SequencerSpecific => PayloadShape::Variable,
        }
    }
}

#[doc = r#"
A decoded meta event.

Owned payloads borrow from the input when parsed, see [`MetaMessage::into_owned`].
"#]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MetaMessage<'a> {
    /// `FF 00 02 ssss`
    SequenceNumber(u16),
    /// `FF 01..07 len text`
    Text(TextKind, Cow<'a, [u8]>),
    /// `FF 20 01 cc`: the channel that following sysex and meta events refer to
    ChannelPrefix(Channel),
    /// `FF 2F 00`
    EndOfTrack,
    /// `FF 51 03 tttttt`
    Tempo(Tempo),
    /// `FF 54 05 hr mn se fr ff`
    SmpteOffset(SmpteOffset),
    /// `FF 58 04 nn dd cc bb`
    TimeSignature(TimeSignature),
    /// `FF 59 02 sf mi`
    KeySignature(KeySignature),
    /// `FF 7F len data`
    SequencerSpecific(Cow<'a, [u8]>),
    /// A subtype outside [`MetaKind`]. The writer rejects one that is inside it.
    Unknown {
        /// The subtype byte
        subtype: u8,
        /// The payload, skipped over by its declared length
        data: Cow<'a, [u8]>,
    },
}

impl<'a> MetaMessage<'a> {
    /// Interprets the payload of a meta event with the given subtype.
    ///
    /// # Errors
    /// [`MetaError::Length`] if a fixed size kind has the wrong payload size,
    /// or an error from the payload itself (such as an invalid SMPTE offset).
    pub fn parse(subtype: u8, data: &'a [u8]) -> Result<Self, ParseError> {
        let Ok(kind) = MetaKind::try_from(subtype) else {
            return Ok(Self::Unknown {
                subtype,
                data: Cow::Borrowed(data),
            });
        };
        if let PayloadShape::Fixed(expected) = kind.payload()
            && data.len() != expected
        {
            return Err(MetaError::Length {
                kind,
                expected,
                found: data.len(),
            }
            .into());
        }

        use MetaKind as K;
        let text = |kind| Self::Text(kind, Cow::Borrowed(data));
        Ok(match kind {
            K::SequenceNumber => Self::SequenceNumber(u16::from_be_bytes([data[0], data[1]])),
            K::Text => text(TextKind::Text),
            K::Copyright => text(TextKind::Copyright),
            K::TrackName => text(TextKind::TrackName),
            K::InstrumentName => text(TextKind::InstrumentName),
            K::Lyric => text(TextKind::Lyric),
            K::Marker => text(TextKind::Marker),
            K::CuePoint => text(TextKind::CuePoint),
            K::ChannelPrefix => Self::ChannelPrefix(
                Channel::try_from(data[0]).map_err(|_| MetaError::Channel(data[0]))?,
            ),
            K::EndOfTrack => Self::EndOfTrack,
            K::Tempo => Self::Tempo(Tempo::from_bytes([data[0], data[1], data[2]])),
            K::SmpteOffset => Self::SmpteOffset(SmpteOffset::parse(data)?),
            K::TimeSignature => Self::TimeSignature(TimeSignature::from_bytes([
                data[0], data[1], data[2], data[3],
            ])),
            K::KeySignature => Self::KeySignature(KeySignature::from_bytes([data[0], data[1]])),
            K::SequencerSpecific => Self::SequencerSpecific(Cow::Borrowed(data)),
        })
    }

    /// The subtype byte written after `FF`
    pub fn subtype(&self) -> u8 {
        match self {
            Self::Unknown { subtype, .. } => *subtype,
            known => known.kind().map(u8::from).unwrap_or_default(),
        }
    }

    /// The registry entry for this event, `None` for [`MetaMessage::Unknown`]
    pub const fn kind(&self) -> Option<MetaKind> {
        Some(match self {
            Self::SequenceNumber(_) => MetaKind::SequenceNumber,
            Self::Text(kind, _) => kind.meta_kind(),
            Self::ChannelPrefix(_) => MetaKind::ChannelPrefix,
            Self::EndOfTrack => MetaKind::EndOfTrack,
            Self::Tempo(_) => MetaKind::Tempo,
            Self::SmpteOffset(_) => MetaKind::SmpteOffset,
            Self::TimeSignature(_) => MetaKind::TimeSignature,
            Self::KeySignature(_) => MetaKind::KeySignature,
            Self::SequencerSpecific(_) => MetaKind::SequencerSpecific,
            Self::Unknown { .. } => return None,
        })
    }

    /// True for the end-of-track marker
    pub const fn is_end_of_track(&self) -> bool {
        matches!(self, Self::EndOfTrack)
    }

    /// The payload as written after the length field
    pub fn payload(&self) -> Cow<'_, [u8]> {
        match self {
            Self::SequenceNumber(n) => Cow::Owned(n.to_be_bytes().to_vec()),
            Self::Text(_, data) | Self::SequencerSpecific(data) | Self::Unknown { data, .. } => {
                Cow::Borrowed(data)
            }
            Self::ChannelPrefix(channel) => Cow::Owned(alloc::vec![channel.index()]),
            Self::EndOfTrack => Cow::Borrowed(&[][..]),
            Self::Tempo(tempo) => Cow::Owned(tempo.to_bytes().to_vec()),
            Self::SmpteOffset(offset) => Cow::Owned(offset.to_bytes().to_vec()),
            Self::TimeSignature(sig) => Cow::Owned(sig.to_bytes().to_vec()),
            Self::KeySignature(sig) => Cow::Owned(sig.to_bytes().to_vec()),
        }
    }

    /// Detaches the message from the input buffer
    pub fn into_owned(self) -> MetaMessage<'static> {
        let own = |data: Cow<'a, [u8]>| Cow::Owned(data.into_owned());
        match self {
            Self::SequenceNumber(n) => MetaMessage::SequenceNumber(n),
            Self::Text(kind, data) => MetaMessage::Text(kind, own(data)),
            Self::ChannelPrefix(c) => MetaMessage::ChannelPrefix(c),
            Self::EndOfTrack => MetaMessage::EndOfTrack,
            Self::Tempo(t) => MetaMessage::Tempo(t),
            Self::SmpteOffset(o) => MetaMessage::SmpteOffset(o),
            Self::TimeSignature(s) => MetaMessage::TimeSignature(s),
            Self::KeySignature(s) => MetaMessage::KeySignature(s),
            Self::SequencerSpecific(data) => MetaMessage::SequencerSpecific(own(data)),
            Self::Unknown { subtype, data } => MetaMessage::Unknown {
                subtype,
                data: own(data),
            },
        }
    }
}

#[test]
fn unknown_subtypes_are_kept_opaque() {
    use pretty_assertions::assert_eq;
    let msg = MetaMessage::parse(0x21, &[0x02]).unwrap();
    assert_eq!(
        msg,
        MetaMessage::Unknown {
            subtype: 0x21,
            data: Cow::Borrowed(&[0x02][..])
        }
    );
    assert_eq!(msg.subtype(), 0x21);
    assert_eq!(msg.kind(), None);
}

#[test]
fn fixed_size_payloads_are_checked() {
    use pretty_assertions::assert_eq;
    assert_eq!(
        MetaMessage::parse(0x51, &[0x07, 0xA1]),
        Err(ParseError::Meta(MetaError::Length {
            kind: MetaKind::Tempo,
            expected: 3,
            found: 2
        }))
    );
    assert_eq!(
        MetaMessage::parse(0x2F, &[0x00]),
        Err(ParseError::Meta(MetaError::Length {
            kind: MetaKind::EndOfTrack,
            expected: 0,
            found: 1
        }))
    );
}

#[test]
fn known_subtypes_decode() {
    use pretty_assertions::assert_eq;
    assert_eq!(
        MetaMessage::parse(0x00, &[0x00, 0x07]),
        Ok(MetaMessage::SequenceNumber(7))
    );
    assert_eq!(
        MetaMessage::parse(0x03, b"Piano"),
        Ok(MetaMessage::Text(TextKind::TrackName, Cow::Borrowed(&b"Piano"[..])))
    );
    assert_eq!(
        MetaMessage::parse(0x20, &[0x09]),
        Ok(MetaMessage::ChannelPrefix(Channel::Ten))
    );
    assert_eq!(
        MetaMessage::parse(0x20, &[0x10]),
        Err(ParseError::Meta(MetaError::Channel(0x10)))
    );
    let tempo = MetaMessage::parse(0x51, &[0x07, 0xA1, 0x20]).unwrap();
    assert_eq!(tempo, MetaMessage::Tempo(Tempo::new(500_000)));
    assert_eq!(tempo.payload().as_ref(), &[0x07, 0xA1, 0x20]);
}
