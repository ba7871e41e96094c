use alloc::vec::Vec;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use super::Track;

#[doc = r#"
The tracks of a MIDI file, arranged by the file's format.

Format 0 holds a single track with events for any channel. Format 1 holds
tracks that play at the same time, conventionally with the tempo map in the
first. Format 2 holds independent single-track patterns.
"#]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Format<'a> {
    /// Format 0
    SingleMultiChannel(Track<'a>),
    /// Format 1
    Simultaneous(Vec<Track<'a>>),
    /// Format 2
    SequentiallyIndependent(Vec<Track<'a>>),
}

impl<'a> Format<'a> {
    /// The tracks, in file order
    pub fn tracks(&self) -> &[Track<'a>] {
        match self {
            Self::SingleMultiChannel(track) => core::slice::from_ref(track),
            Self::Simultaneous(tracks) | Self::SequentiallyIndependent(tracks) => tracks,
        }
    }

    /// Consumes the format, returning its tracks
    pub fn into_tracks(self) -> Vec<Track<'a>> {
        match self {
            Self::SingleMultiChannel(track) => alloc::vec![track],
            Self::Simultaneous(tracks) | Self::SequentiallyIndependent(tracks) => tracks,
        }
    }

    /// Returns the format type
    pub const fn format_type(&self) -> FormatType {
        match self {
            Self::SingleMultiChannel(_) => FormatType::SingleMultiChannel,
            Self::Simultaneous(_) => FormatType::Simultaneous,
            Self::SequentiallyIndependent(_) => FormatType::SequentiallyIndependent,
        }
    }
}

/// The value of the format field in the header chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum FormatType {
    /// Format 0, one track
    SingleMultiChannel = 0,
    /// Format 1, synchronous tracks
    Simultaneous = 1,
    /// Format 2, independent tracks
    SequentiallyIndependent = 2,
}
