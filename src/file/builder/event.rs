use crate::file::{Header, Track};

/// A parsed chunk, fed to a [`MidiFileBuilder`](super::MidiFileBuilder)
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkEvent<'a> {
    /// The `MThd` chunk
    Header(Header),
    /// An `MTrk` chunk
    Track(Track<'a>),
}

impl From<Header> for ChunkEvent<'_> {
    fn from(value: Header) -> Self {
        Self::Header(value)
    }
}

impl<'a> From<Track<'a>> for ChunkEvent<'a> {
    fn from(value: Track<'a>) -> Self {
        Self::Track(value)
    }
}
