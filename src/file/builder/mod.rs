#![doc = r#"
Assembles a [`MidiFile`] out of parsed chunks.

[`MidiFile::parse`](super::MidiFile::parse) drives this for you. The builder
is public so files can also be put together from chunks parsed one at a
time.
"#]

mod format;
pub use format::*;

pub mod chunk;

/// The chunks a [`MidiFileBuilder`] accepts
pub mod event;

use alloc::vec::Vec;

use super::MidiFile;
use crate::{
    FileError,
    file::{Format, FormatType, Header, Track, builder::event::ChunkEvent},
};

/// A builder used to create a new [`MidiFile`].
#[derive(Default)]
pub struct MidiFileBuilder<'a> {
    header: Option<Header>,
    tracks: Vec<Track<'a>>,
}

impl<'a> MidiFileBuilder<'a> {
    /// Handles a chunk of a midi file.
    ///
    /// # Errors
    /// - [`FileError::DuplicateHeader`] for a second header
    /// - [`FileError::TrackBeforeHeader`] for a track before any header
    /// - [`FileError::ExtraTrack`] for a track past the declared count
    pub fn handle_chunk(&mut self, chunk: ChunkEvent<'a>) -> Result<(), FileError> {
        match chunk {
            ChunkEvent::Header(header) => {
                if self.header.is_some() {
                    return Err(FileError::DuplicateHeader);
                }
                self.header = Some(header);
            }
            ChunkEvent::Track(track) => {
                let Some(header) = &self.header else {
                    return Err(FileError::TrackBeforeHeader);
                };
                if self.tracks.len() >= header.num_tracks() as usize {
                    return Err(FileError::ExtraTrack {
                        declared: header.num_tracks(),
                    });
                }
                self.tracks.push(track);
            }
        }
        Ok(())
    }

    /// Attempts to finish the midifile from the provided chunks.
    ///
    /// # Errors
    /// - [`FileError::NoHeader`] if no header was handled
    /// - [`FileError::MissingTracks`] if fewer tracks arrived than the header declares
    pub fn build(self) -> Result<MidiFile<'a>, FileError> {
        let Some(header) = self.header else {
            return Err(FileError::NoHeader);
        };
        let declared = header.num_tracks();
        if self.tracks.len() < declared as usize {
            return Err(FileError::MissingTracks {
                declared,
                found: self.tracks.len() as u16,
            });
        }

        let format = match header.format_type() {
            FormatType::SingleMultiChannel => {
                let mut tracks = self.tracks.into_iter();
                let Some(track) = tracks.next() else {
                    return Err(FileError::MissingTracks { declared, found: 0 });
                };
                Format::SingleMultiChannel(track)
            }
            FormatType::Simultaneous => Format::Simultaneous(self.tracks),
            FormatType::SequentiallyIndependent => Format::SequentiallyIndependent(self.tracks),
        };

        Ok(MidiFile::new(format, header.timing()))
    }
}

#[test]
fn header_comes_first() {
    use crate::file::Timing;
    use pretty_assertions::assert_eq;

    let header = Header::new(
        RawFormat::single_multichannel(),
        Timing::new_ticks_per_quarter_note(96),
    );
    let mut builder = MidiFileBuilder::default();
    assert_eq!(
        builder.handle_chunk(Track::new(Vec::new()).into()),
        Err(FileError::TrackBeforeHeader)
    );
    builder.handle_chunk(header.clone().into()).unwrap();
    assert_eq!(
        builder.handle_chunk(header.into()),
        Err(FileError::DuplicateHeader)
    );
    builder.handle_chunk(Track::new(Vec::new()).into()).unwrap();
    assert_eq!(
        builder.handle_chunk(Track::new(Vec::new()).into()),
        Err(FileError::ExtraTrack { declared: 1 })
    );

    let file = builder.build().unwrap();
    assert_eq!(file.format_type(), FormatType::SingleMultiChannel);
    assert_eq!(file.tracks().len(), 1);
}

#[test]
fn build_requires_every_declared_track() {
    use crate::file::Timing;
    use pretty_assertions::assert_eq;

    let header = Header::new(
        RawFormat::new(FormatType::Simultaneous, 2).unwrap(),
        Timing::new_ticks_per_quarter_note(96),
    );
    let mut builder = MidiFileBuilder::default();
    builder.handle_chunk(header.into()).unwrap();
    builder.handle_chunk(Track::new(Vec::new()).into()).unwrap();
    assert_eq!(
        builder.build().unwrap_err(),
        FileError::MissingTracks {
            declared: 2,
            found: 1
        }
    );
    assert_eq!(
        MidiFileBuilder::default().build().unwrap_err(),
        FileError::NoHeader
    );
}
