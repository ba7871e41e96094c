#![doc = r#"
Rusty representation of a [`MidiFile`]

# Overview

A [`MidiFile`] is the decoded form of a Standard MIDI File: its [`Timing`]
and its tracks, arranged by [`Format`]. Each [`Track`] is a list of
[`TrackEvent`]s, each a delta time and a [`TrackMessage`].

Text and system exclusive payloads borrow from the parsed bytes. Use
[`MidiFile::into_owned`] to keep a file around after its input is dropped.
"#]

/// Contains the [`MidiFileBuilder`] and associated
///
/// MIDI file parsing events.
pub mod builder;

mod event;
pub use event::*;

mod format;
pub use format::*;

mod header;
pub use header::*;

pub mod meta;

mod timed_event_iter;
pub use timed_event_iter::*;

mod timing;
pub use timing::*;

mod track;
pub use track::*;

use alloc::vec::Vec;

use crate::{
    FileError,
    file::{
        builder::{MidiFileBuilder, chunk::RawTrackChunk, event::ChunkEvent},
        meta::Tempo,
    },
    prelude::*,
};

#[doc = r#"
A decoded Standard MIDI File.

# Example
```rust
use midicodec::prelude::*;

let bytes = [
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0x01, 0xE0,
    b'M', b'T', b'r', b'k', 0, 0, 0, 11,
    0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20,
    0x00, 0xFF, 0x2F, 0x00,
];
let file = MidiFile::parse(&bytes).unwrap();
assert_eq!(file.format_type(), FormatType::SingleMultiChannel);
assert_eq!(file.timing().ticks_per_quarter_note(), 480);
assert_eq!(file.beats_per_minute(), 120);
```
"#]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiFile<'a> {
    timing: Timing,
    format: Format<'a>,
}

impl<'a> MidiFile<'a> {
    /// Create a file from its tracks and timing
    pub const fn new(format: Format<'a>, timing: Timing) -> Self {
        Self { timing, format }
    }

    /// Parse a set of bytes into a file struct.
    ///
    /// Exactly as many track chunks as the header declares are read. Bytes
    /// after the last of them are ignored.
    ///
    /// # Errors
    /// Any malformed header, chunk or event, reported with the offset it
    /// was found at. Input that ends before every declared track is
    /// [`FileError::MissingTracks`].
    pub fn parse(bytes: &'a [u8]) -> ReadResult<Self> {
        let mut reader = Reader::from_byte_slice(bytes);
        let header = Header::read(&mut reader)?;

        let declared = header.num_tracks();
        let mut chunks = Vec::with_capacity(declared as usize);
        for found in 0..declared {
            if reader.is_at_end() {
                return Err(inv_data(
                    &reader,
                    FileError::MissingTracks { declared, found },
                ));
            }
            chunks.push(RawTrackChunk::read(&mut reader)?);
        }

        #[cfg(feature = "tracing")]
        if !reader.is_at_end() {
            tracing::warn!(
                position = reader.buffer_position(),
                ignored = reader.remaining(),
                "bytes after the last declared track"
            );
        }

        let tracks = parse_tracks(chunks)?;

        let mut builder = MidiFileBuilder::default();
        builder
            .handle_chunk(ChunkEvent::Header(header))
            .map_err(|e| inv_data(&reader, e))?;
        for track in tracks {
            builder
                .handle_chunk(ChunkEvent::Track(track))
                .map_err(|e| inv_data(&reader, e))?;
        }
        builder.build().map_err(|e| inv_data(&reader, e))
    }

    /// Encodes the file. Equivalent to [`crate::encode`].
    ///
    /// Every track gets exactly one end-of-track marker, whether or not it
    /// was parsed with one.
    ///
    /// # Errors
    /// The first value that cannot be written, see [`WriteError`].
    pub fn to_bytes(&self) -> WriteResult<Vec<u8>> {
        let mut writer = MidiWriter::new(self.timing).with_format(self.format_type());
        for track in self.tracks() {
            let mut track_writer = TrackWriter::new();
            for event in track.events() {
                track_writer.add_event(event.delta_ticks(), event.event())?;
            }
            writer.push_track(track_writer);
        }
        writer.finish()
    }

    /// Returns header info
    pub const fn timing(&self) -> Timing {
        self.timing
    }

    /// Returns the format type for the file.
    pub const fn format_type(&self) -> FormatType {
        self.format.format_type()
    }

    /// The tracks arranged by format
    pub const fn format(&self) -> &Format<'a> {
        &self.format
    }

    /// Returns the track list
    pub fn tracks(&self) -> &[Track<'a>] {
        self.format.tracks()
    }

    /// Number of tracks in the file
    pub fn track_count(&self) -> usize {
        self.tracks().len()
    }

    /// The first tempo set in any track, or the 120 bpm default
    pub fn tempo(&self) -> Tempo {
        self.tracks()
            .iter()
            .find_map(|track| track.info().tempo)
            .unwrap_or_default()
    }

    /// Microseconds per quarter note, see [`MidiFile::tempo`]
    pub fn micros_per_quarter_note(&self) -> u32 {
        self.tempo().micros_per_quarter_note()
    }

    /// Whole beats per minute, see [`MidiFile::tempo`]
    pub fn beats_per_minute(&self) -> u32 {
        self.tempo().beats_per_minute()
    }

    /// Indices of the tracks that do not end with an end-of-track marker
    pub fn unterminated_tracks(&self) -> impl Iterator<Item = usize> + '_ {
        self.tracks()
            .iter()
            .enumerate()
            .filter(|(_, track)| !track.is_terminated())
            .map(|(index, _)| index)
    }

    /// Returns every event with its time in microseconds, track by track.
    pub fn into_timed_events(self) -> TimedEventIterator<'a> {
        TimedEventIterator::new(self.format, self.timing)
    }

    /// Detaches the file from the input buffer
    pub fn into_owned(self) -> MidiFile<'static> {
        let format = match self.format {
            Format::SingleMultiChannel(track) => Format::SingleMultiChannel(track.into_owned()),
            Format::Simultaneous(tracks) => {
                Format::Simultaneous(tracks.into_iter().map(Track::into_owned).collect())
            }
            Format::SequentiallyIndependent(tracks) => Format::SequentiallyIndependent(
                tracks.into_iter().map(Track::into_owned).collect(),
            ),
        };
        MidiFile {
            timing: self.timing,
            format,
        }
    }
}

fn parse_tracks(chunks: Vec<RawTrackChunk<'_>>) -> ReadResult<Vec<Track<'_>>> {
    #[cfg(feature = "parallel")]
    {
        if chunks.len() > 1 {
            use rayon::prelude::*;

            return chunks
                .into_par_iter()
                .map(RawTrackChunk::parse)
                .collect::<ReadResult<Vec<_>>>();
        }
    }
    chunks
        .into_iter()
        .map(RawTrackChunk::parse)
        .collect::<ReadResult<Vec<_>>>()
}

#[cfg(test)]
const TWO_TRACKS: &[u8] = &[
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 1, 0, 2, 0x00, 0x60, //
    b'M', b'T', b'r', b'k', 0, 0, 0, 11, //
    0x00, 0xFF, 0x51, 0x03, 0x0F, 0x42, 0x40, //
    0x00, 0xFF, 0x2F, 0x00, //
    b'M', b'T', b'r', b'k', 0, 0, 0, 7, //
    0x00, 0x90, 0x3C, 0x64, //
    0x60, 0x3C, 0x00,
];

#[test]
fn parses_every_declared_track() {
    use pretty_assertions::assert_eq;
    let file = MidiFile::parse(TWO_TRACKS).unwrap();
    assert_eq!(file.format_type(), FormatType::Simultaneous);
    assert_eq!(file.track_count(), 2);
    assert_eq!(file.beats_per_minute(), 60);
    // the second track never ends
    assert_eq!(file.unterminated_tracks().collect::<Vec<_>>(), [1]);
    assert_eq!(file.tracks()[1].notes().len(), 1);
}

#[test]
fn declared_tracks_must_be_present() {
    use pretty_assertions::assert_eq;
    let mut bytes = TWO_TRACKS.to_vec();
    bytes[11] = 3;
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(err.position(), bytes.len());
    assert_eq!(
        err.parse_error_kind(),
        Some(&ParseError::File(FileError::MissingTracks {
            declared: 3,
            found: 2
        }))
    );
}

#[test]
fn encodes_what_it_parses() {
    use pretty_assertions::assert_eq;
    let file = MidiFile::parse(TWO_TRACKS).unwrap();
    let bytes = file.to_bytes().unwrap();
    // the second track gains its end-of-track marker
    assert_eq!(bytes.len(), TWO_TRACKS.len() + 4);
    let reparsed = MidiFile::parse(&bytes).unwrap();
    assert_eq!(reparsed.tracks()[0], file.tracks()[0]);
    assert_eq!(
        reparsed.tracks()[1].events()[..2],
        file.tracks()[1].events()[..]
    );
    assert!(reparsed.unterminated_tracks().next().is_none());
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_decode_matches_sequential() {
    use pretty_assertions::assert_eq;

    let mut writer = MidiWriter::default().with_preamble(crate::writer::TrackPreamble::default());
    for index in 0..8 {
        let track = writer.track(index).unwrap();
        for step in 0..(index as u8 * 5) {
            track
                .note_on(3, Channel::from_status(index as u8), 30 + step, 64)
                .unwrap();
            track
                .note_off(90, Channel::from_status(index as u8), 30 + step, 0)
                .unwrap();
        }
    }
    let bytes = writer.finish().unwrap();

    let mut reader = Reader::from_byte_slice(&bytes);
    let header = Header::read(&mut reader).unwrap();
    let chunks: Vec<_> = (0..header.num_tracks())
        .map(|_| RawTrackChunk::read(&mut reader).unwrap())
        .collect();
    let sequential: Vec<_> = chunks
        .iter()
        .cloned()
        .map(|chunk| chunk.parse().unwrap())
        .collect();

    assert_eq!(parse_tracks(chunks).unwrap(), sequential);
    assert_eq!(MidiFile::parse(&bytes).unwrap().tracks(), &sequential[..]);
}
