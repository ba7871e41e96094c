use alloc::vec::Vec;

use crate::{
    ChunkTag,
    file::{Track, TrackEvent},
    reader::{ReadResult, Reader},
};

/// The body of an `MTrk` chunk, not yet parsed into events.
#[derive(Debug, Clone)]
pub struct RawTrackChunk<'a> {
    reader: Reader<'a>,
}

impl<'a> RawTrackChunk<'a> {
    /// Splits the next track chunk off the reader.
    ///
    /// # Errors
    /// - [`ChunkError::InvalidTag`](crate::ChunkError::InvalidTag) if the chunk is not `MTrk`
    /// - [`ChunkError::Length`](crate::ChunkError::Length) if its length runs past the input
    pub fn read(reader: &mut Reader<'a>) -> ReadResult<Self> {
        let reader = reader.read_chunk(ChunkTag::TRACK)?;
        Ok(Self { reader })
    }

    /// Offset of the first event byte in the input
    pub const fn offset(&self) -> usize {
        self.reader.buffer_position()
    }

    /// Length of the chunk body in bytes
    pub const fn len(&self) -> usize {
        self.reader.remaining()
    }

    /// True for a chunk with no body at all
    pub const fn is_empty(&self) -> bool {
        self.reader.is_at_end()
    }

    /// Reads events until the end-of-track marker.
    ///
    /// Bytes after the marker are ignored. A chunk that runs out before any
    /// marker still yields its events; [`Track::is_terminated`] tells the two
    /// apart.
    pub fn parse(self) -> ReadResult<Track<'a>> {
        let mut reader = self.reader;
        let mut running_status = None;
        let mut events = Vec::new();

        while !reader.is_at_end() {
            let event = TrackEvent::read(&mut reader, &mut running_status)?;
            let end = event.event().is_end_of_track();
            events.push(event);
            if end {
                #[cfg(feature = "tracing")]
                if !reader.is_at_end() {
                    tracing::debug!(
                        position = reader.buffer_position(),
                        ignored = reader.remaining(),
                        "bytes after end of track"
                    );
                }
                #[cfg(feature = "tracing")]
                tracing::debug!(events = events.len(), "parsed track");
                return Ok(Track::new(events));
            }
        }

        #[cfg(feature = "tracing")]
        tracing::warn!(
            position = reader.buffer_position(),
            events = events.len(),
            "track chunk ended without an end-of-track event"
        );
        Ok(Track::new(events))
    }
}

#[test]
fn stops_at_end_of_track() {
    use pretty_assertions::assert_eq;
    let bytes = [
        b'M', b'T', b'r', b'k', 0, 0, 0, 10, //
        0x00, 0xC0, 0x01, //
        0x00, 0xFF, 0x2F, 0x00, //
        0xDE, 0xAD, 0xBE,
    ];
    let chunk = RawTrackChunk::read(&mut Reader::from_byte_slice(&bytes)).unwrap();
    assert_eq!((chunk.offset(), chunk.len()), (8, 10));
    let track = chunk.parse().unwrap();
    assert_eq!(track.events().len(), 2);
    assert!(track.is_terminated());
}

#[test]
fn missing_end_of_track_is_tolerated() {
    use pretty_assertions::assert_eq;
    let bytes = [b'M', b'T', b'r', b'k', 0, 0, 0, 4, 0x00, 0x90, 0x3C, 0x40];
    let chunk = RawTrackChunk::read(&mut Reader::from_byte_slice(&bytes)).unwrap();
    let track = chunk.parse().unwrap();
    assert_eq!(track.events().len(), 1);
    assert!(!track.is_terminated());
}

#[test]
fn events_may_not_cross_the_chunk_boundary() {
    use pretty_assertions::assert_eq;
    // the note-on claims two data bytes but the chunk holds only one
    let bytes = [b'M', b'T', b'r', b'k', 0, 0, 0, 3, 0x00, 0x90, 0x3C, 0x40];
    let chunk = RawTrackChunk::read(&mut Reader::from_byte_slice(&bytes)).unwrap();
    let err = chunk.parse().unwrap_err();
    assert!(err.is_out_of_bounds());
    assert_eq!(err.position(), 11);
}
