use num_enum::{IntoPrimitive, TryFromPrimitive};

use super::MetaKind;

/// The text meta events, subtypes `01` through `07`.
///
/// Text is kept as raw bytes: the format only recommends printable ASCII, and
/// files in the wild use whatever encoding their author's machine used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TextKind {
    /// Any text
    Text = 0x01,
    /// A copyright notice
    Copyright = 0x02,
    /// Sequence name in the first track, otherwise the track name
    TrackName = 0x03,
    /// The instrumentation for the track
    InstrumentName = 0x04,
    /// A syllable to be sung
    Lyric = 0x05,
    /// A rehearsal letter or section name
    Marker = 0x06,
    /// Something happening on screen or stage
    CuePoint = 0x07,
}

impl TextKind {
    /// The text kind for a registry entry, `None` if the entry is not text
    pub const fn from_meta_kind(kind: MetaKind) -> Option<Self> {
        Some(match kind {
            MetaKind::Text => Self::Text,
            MetaKind::Copyright => Self::Copyright,
            MetaKind::TrackName => Self::TrackName,
            MetaKind::InstrumentName => Self::InstrumentName,
            MetaKind::Lyric => Self::Lyric,
            MetaKind::Marker => Self::Marker,
            MetaKind::CuePoint => Self::CuePoint,
            MetaKind::SequenceNumber
            | MetaKind::ChannelPrefix
            | MetaKind::EndOfTrack
            | MetaKind::Tempo
            | MetaKind::SmpteOffset
            | MetaKind::TimeSignature
            | MetaKind::KeySignature
            | MetaKind::SequencerSpecific => return None,
        })
    }

    /// The matching registry entry
    pub const fn meta_kind(&self) -> MetaKind {
        match self {
            Self::Text => MetaKind::Text,
            Self::Copyright => MetaKind::Copyright,
            Self::TrackName => MetaKind::TrackName,
            Self::InstrumentName => MetaKind::InstrumentName,
            Self::Lyric => MetaKind::Lyric,
            Self::Marker => MetaKind::Marker,
            Self::CuePoint => MetaKind::CuePoint,
        }
    }
}

#[test]
fn text_kinds_share_their_subtype_with_the_registry() {
    use pretty_assertions::assert_eq;
    for subtype in 0..=0x7F_u8 {
        let Ok(kind) = MetaKind::try_from(subtype) else {
            continue;
        };
        let text = TextKind::from_meta_kind(kind);
        assert_eq!(text, TextKind::try_from(subtype).ok());
        if let Some(text) = text {
            assert_eq!(text.meta_kind(), kind);
            assert_eq!(u8::from(text), subtype);
        }
    }
}
