#![doc = r#"
Encoder and decoder for the Standard MIDI File (SMF) format.

# Overview

A Standard MIDI File is a header chunk (`MThd`) followed by one or more track chunks
(`MTrk`). Each track chunk is a stream of delta-timed events: channel voice messages,
system exclusive payloads, and meta events such as tempo changes or the mandatory
end-of-track marker.

This crate turns those bytes into a [`MidiFile`](crate::file::MidiFile) made of
[`Track`](crate::file::Track)s and [`TrackEvent`](crate::file::TrackEvent)s, and turns
that model back into bytes with running-status compression applied.

# Example
```rust
use midicodec::prelude::*;

let mut writer = MidiWriter::new(Timing::new_ticks_per_quarter_note(480));
let track = writer.track(0).unwrap();
track.set_tempo(0, Tempo::new(500_000)).unwrap();
track.note_on(0, Channel::One, 60, 100).unwrap();
track.note_off(480, Channel::One, 60, 0).unwrap();

let bytes = writer.finish().unwrap();

let file = MidiFile::parse(&bytes).unwrap();
assert_eq!(file.beats_per_minute(), 120);
assert_eq!(file.tracks()[0].notes().len(), 1);
```
"#]
#![no_std]
#![warn(missing_docs)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod byte;
pub use byte::*;

mod error;
pub use error::*;

mod micros;
pub use micros::*;

mod note;
pub use note::*;

mod varlen;
pub use varlen::*;

pub mod file;
pub mod message;
pub mod reader;
pub mod writer;

use alloc::vec::Vec;

/// Serializes a [`MidiFile`](file::MidiFile) into the bytes of a Standard MIDI File.
///
/// Nothing is returned unless the whole file could be encoded.
pub fn encode(file: &file::MidiFile<'_>) -> writer::WriteResult<Vec<u8>> {
    file.to_bytes()
}

/// Parses the bytes of a Standard MIDI File.
pub fn decode(bytes: &[u8]) -> reader::ReadResult<file::MidiFile<'_>> {
    file::MidiFile::parse(bytes)
}

/// Commonly used types
pub mod prelude {
    pub use crate::{
        DataByte, Note, UMicros, VarLen,
        error::*,
        file::{meta::*, *},
        message::{channel::*, sysex::*},
        reader::{ReadResult, Reader, ReaderError, ReaderErrorKind},
        writer::{MidiWriter, TrackPreamble, TrackWriter, WriteError, WriteResult},
    };

    pub(crate) use crate::reader::inv_data;
}
