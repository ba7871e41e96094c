use alloc::vec::Vec;

use crate::{
    file::{
        FormatType, Header, Timing,
        builder::RawFormat,
        meta::{Tempo, TimeSignature},
    },
    writer::{TrackWriter, WriteError, WriteResult},
};

/// Events written at the start of every track a [`MidiWriter`] creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackPreamble {
    /// Written first
    pub time_signature: TimeSignature,
    /// Written after the time signature
    pub tempo: Tempo,
}

impl Default for TrackPreamble {
    /// 4/4 at one second per quarter note
    fn default() -> Self {
        Self {
            time_signature: TimeSignature::default(),
            tempo: Tempo::new(1_000_000),
        }
    }
}

#[doc = r#"
Builds a whole Standard MIDI File.

Tracks are addressed by index and created on first use. When a
[`TrackPreamble`] is set, each new track starts with its time signature and
tempo events. [`MidiWriter::finish`] writes the header followed by every
track chunk in order.

The default writer produces a format 1 file at 1000 ticks per quarter note.
"#]
#[derive(Debug, Clone)]
pub struct MidiWriter {
    format: FormatType,
    timing: Timing,
    tracks: Vec<TrackWriter>,
    preamble: Option<TrackPreamble>,
}

impl Default for MidiWriter {
    fn default() -> Self {
        Self::new(Timing::new_ticks_per_quarter_note(1000))
    }
}

impl MidiWriter {
    /// A format 1 writer with no tracks and no preamble
    pub fn new(timing: Timing) -> Self {
        Self {
            format: FormatType::Simultaneous,
            timing,
            tracks: Vec::new(),
            preamble: None,
        }
    }

    /// Sets the format written to the header
    pub fn with_format(mut self, format: FormatType) -> Self {
        self.format = format;
        self
    }

    /// Starts every track created from here on with `preamble`
    pub fn with_preamble(mut self, preamble: TrackPreamble) -> Self {
        self.preamble = Some(preamble);
        self
    }

    /// The timing written to the header
    pub const fn timing(&self) -> Timing {
        self.timing
    }

    /// Number of tracks created so far
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// The track at `index`, creating it and any before it.
    ///
    /// # Errors
    /// [`WriteError::TooManyTracks`] past the 16-bit track count.
    pub fn track(&mut self, index: usize) -> WriteResult<&mut TrackWriter> {
        if index >= u16::MAX as usize {
            return Err(WriteError::TooManyTracks(index + 1));
        }
        while self.tracks.len() <= index {
            let mut track = TrackWriter::new();
            if let Some(preamble) = self.preamble {
                track.time_signature(0, preamble.time_signature)?;
                track.set_tempo(0, preamble.tempo)?;
            }
            self.tracks.push(track);
        }
        Ok(&mut self.tracks[index])
    }

    /// Appends a track written elsewhere
    pub fn push_track(&mut self, track: TrackWriter) {
        self.tracks.push(track);
    }

    /// Marks where playback should jump back to, in the first track
    pub fn add_loop_start(&mut self, delta: u32) -> WriteResult<()> {
        self.track(0)?.add_marker(delta, "loopStart")
    }

    /// Marks where playback should loop from, in the first track
    pub fn add_loop_end(&mut self, delta: u32) -> WriteResult<()> {
        self.track(0)?.add_marker(delta, "loopEnd")
    }

    /// Writes the header and every track chunk.
    ///
    /// # Errors
    /// - [`WriteError::TooManyTracks`] if the count does not fit in 16 bits
    /// - [`WriteError::SingleTrackCount`] for a format 0 file without exactly one track
    /// - [`WriteError::Division`] for zero ticks per quarter note
    /// - any error from finishing a track
    pub fn finish(self) -> WriteResult<Vec<u8>> {
        let count = self.tracks.len();
        let num_tracks = u16::try_from(count).map_err(|_| WriteError::TooManyTracks(count))?;
        let format = RawFormat::new(self.format, num_tracks)
            .map_err(|_| WriteError::SingleTrackCount(count))?;
        let ticks_per_quarter_note = self.timing.ticks_per_quarter_note();
        if ticks_per_quarter_note == 0 {
            return Err(WriteError::Division(ticks_per_quarter_note));
        }

        let mut out = Header::new(format, self.timing).to_bytes().to_vec();
        for track in self.tracks {
            out.extend_from_slice(&track.finish()?);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(tracks = count, len = out.len(), "wrote MIDI file");

        Ok(out)
    }
}

#[test]
fn header_declares_every_track() {
    use crate::message::channel::Channel;
    use pretty_assertions::assert_eq;

    let mut writer = MidiWriter::new(Timing::new_ticks_per_quarter_note(96));
    writer.track(1).unwrap().note_on(0, Channel::Two, 40, 90).unwrap();
    assert_eq!(writer.track_count(), 2);

    let bytes = writer.finish().unwrap();
    assert_eq!(
        bytes[..14],
        [b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 1, 0, 2, 0, 96]
    );
    // an empty track is only its end-of-track marker
    assert_eq!(
        bytes[14..26],
        [b'M', b'T', b'r', b'k', 0, 0, 0, 4, 0x00, 0xFF, 0x2F, 0x00]
    );
    assert_eq!(bytes[26..34], [b'M', b'T', b'r', b'k', 0, 0, 0, 8]);
    assert_eq!(bytes.len(), 42);
}

#[test]
fn preamble_starts_each_new_track() {
    use pretty_assertions::assert_eq;
    let mut writer = MidiWriter::default().with_preamble(TrackPreamble::default());
    writer.add_loop_start(0).unwrap();
    let bytes = writer.finish().unwrap();
    assert_eq!(bytes[12..14], 1000u16.to_be_bytes());
    assert_eq!(
        bytes[22..],
        [
            0x00, 0xFF, 0x58, 0x04, 4, 2, 32, 8, //
            0x00, 0xFF, 0x51, 0x03, 0x0F, 0x42, 0x40, //
            0x00, 0xFF, 0x06, 0x09, b'l', b'o', b'o', b'p', b'S', b't', b'a', b'r', b't', //
            0x00, 0xFF, 0x2F, 0x00,
        ]
    );
}

#[test]
fn single_track_format_holds_one_track() {
    use pretty_assertions::assert_eq;
    let mut writer = MidiWriter::default().with_format(FormatType::SingleMultiChannel);
    writer.track(1).unwrap();
    assert_eq!(writer.finish(), Err(WriteError::SingleTrackCount(2)));

    let writer = MidiWriter::new(Timing::new_ticks_per_quarter_note(0));
    assert_eq!(writer.finish(), Err(WriteError::Division(0)));
}
