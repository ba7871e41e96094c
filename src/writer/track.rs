use alloc::{borrow::Cow, vec::Vec};

use crate::{
    ChunkTag, DataByte, MAX_VARLEN, VarLen,
    file::{
        TrackMessage,
        meta::{MetaKind, MetaMessage, Tempo, TextKind, TimeSignature},
    },
    message::{
        channel::{Channel, ChannelVoiceMessage, PitchBend, VoiceEvent},
        sysex::SystemExclusiveMessage,
    },
    writer::{WriteError, WriteResult, write_chunk},
};

const END_OF_TRACK: [u8; 3] = [0xFF, 0x2F, 0x00];

#[doc = r#"
Encodes the events of one track chunk.

Events are written as they are added. The writer keeps the last channel
voice status byte and omits it from the next event when it repeats, and
collects delay added with [`TrackWriter::add_delay`] into the delta time of
the next event.

The end-of-track marker is written by [`TrackWriter::finish`]. Adding one
explicitly only records its delta time, so a finished track always ends with
exactly one marker.

# Example
```rust
use midicodec::prelude::*;

let mut track = TrackWriter::new();
track.note_on(0, Channel::One, 60, 100).unwrap();
track.note_off(480, Channel::One, 60, 0).unwrap();
let chunk = track.finish().unwrap();

assert_eq!(
    chunk,
    [
        b'M', b'T', b'r', b'k', 0, 0, 0, 12,
        0x00, 0x90, 0x3C, 0x64,
        0x83, 0x60, 0x3C, 0x00,
        0x00, 0xFF, 0x2F, 0x00,
    ]
);
```
"#]
#[derive(Debug, Clone)]
pub struct TrackWriter {
    buffer: Vec<u8>,
    running_status: Option<u8>,
    pending_delta: u32,
    ended: bool,
    compress_note_off: bool,
}

impl Default for TrackWriter {
    fn default() -> Self {
        Self {
            buffer: Vec::new(),
            running_status: None,
            pending_delta: 0,
            ended: false,
            compress_note_off: true,
        }
    }
}

impl TrackWriter {
    /// An empty track
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a note-off with zero velocity is written as a note-on with
    /// zero velocity when that lets the status byte be omitted. On by default.
    pub fn with_note_off_compression(mut self, compress: bool) -> Self {
        self.compress_note_off = compress;
        self
    }

    /// The status byte the next channel voice event may omit
    pub const fn running_status(&self) -> Option<u8> {
        self.running_status
    }

    /// True once an end-of-track marker has been added
    pub const fn is_ended(&self) -> bool {
        self.ended
    }

    /// The encoded events so far, without the chunk header or the end-of-track marker
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Adds `ticks` to the delta time of the next event.
    ///
    /// # Errors
    /// [`WriteError::VarLenOverflow`] if the pending delay would pass the
    /// four byte limit.
    pub fn add_delay(&mut self, ticks: u32) -> WriteResult<()> {
        if self.ended {
            return Err(WriteError::EventAfterEndOfTrack);
        }
        self.pending_delta = self.delay_after(ticks)?;
        Ok(())
    }

    fn delay_after(&self, ticks: u32) -> WriteResult<u32> {
        let total = self.pending_delta.saturating_add(ticks);
        if total > MAX_VARLEN {
            return Err(WriteError::VarLenOverflow(total));
        }
        Ok(total)
    }

    /// Encodes `event`, `delta` ticks after the previous event plus any pending delay.
    ///
    /// Nothing is written if the event cannot be encoded.
    pub fn add_event(&mut self, delta: u32, event: &TrackMessage<'_>) -> WriteResult<()> {
        if self.ended {
            return Err(WriteError::EventAfterEndOfTrack);
        }
        let delta = self.delay_after(delta)?;

        match event {
            TrackMessage::Meta(MetaMessage::EndOfTrack) => {
                self.pending_delta = delta;
                self.ended = true;
                return Ok(());
            }
            TrackMessage::ChannelVoice(msg) => self.write_voice(delta, msg)?,
            TrackMessage::Meta(meta) => {
                match meta {
                    MetaMessage::Tempo(tempo) if tempo.micros_per_quarter_note() > Tempo::MAX_MICROS => {
                        return Err(WriteError::Tempo(tempo.micros_per_quarter_note()));
                    }
                    MetaMessage::Unknown { subtype, .. } if MetaKind::try_from(*subtype).is_ok() => {
                        return Err(WriteError::KnownSubtype(*subtype));
                    }
                    _ => {}
                }
                let payload = meta.payload();
                let len = VarLen::encode_len(payload.len())?;
                self.write_delta(delta)?;
                self.buffer.extend_from_slice(&[0xFF, meta.subtype()]);
                self.buffer.extend_from_slice(len.as_bytes());
                self.buffer.extend_from_slice(&payload);
                self.running_status = None;
            }
            TrackMessage::SystemExclusive(sysex) => self.write_sysex(delta, sysex)?,
        }
        self.pending_delta = 0;
        Ok(())
    }

    fn write_delta(&mut self, delta: u32) -> WriteResult<()> {
        let delta = VarLen::encode(delta)?;
        self.buffer.extend_from_slice(delta.as_bytes());
        Ok(())
    }

    fn write_voice(&mut self, delta: u32, msg: &ChannelVoiceMessage) -> WriteResult<()> {
        let mut status = msg.status();
        let (data, len) = msg.event().data_bytes();

        if self.compress_note_off
            && let VoiceEvent::NoteOff { velocity, .. } = msg.event()
            && velocity.value() == 0
        {
            let note_on = 0x90 | msg.channel().index();
            if self.running_status == Some(note_on) {
                status = note_on;
            }
        }

        self.write_delta(delta)?;
        if self.running_status != Some(status) {
            self.buffer.push(status);
            self.running_status = Some(status);
        }
        self.buffer.extend_from_slice(&data[..len]);
        Ok(())
    }

    fn write_sysex(&mut self, delta: u32, sysex: &SystemExclusiveMessage<'_>) -> WriteResult<()> {
        let len = VarLen::encode_len(sysex.data().len())?;
        self.write_delta(delta)?;
        self.buffer.push(sysex.kind().into());
        self.buffer.extend_from_slice(len.as_bytes());
        self.buffer.extend_from_slice(sysex.data());
        self.running_status = None;
        Ok(())
    }

    fn add_voice(&mut self, delta: u32, channel: Channel, event: VoiceEvent) -> WriteResult<()> {
        self.add_event(
            delta,
            &TrackMessage::ChannelVoice(ChannelVoiceMessage::new(channel, event)),
        )
    }

    /// Press `key`
    pub fn note_on(&mut self, delta: u32, channel: Channel, key: u8, velocity: u8) -> WriteResult<()> {
        let event = VoiceEvent::NoteOn {
            key: data(key)?,
            velocity: data(velocity)?,
        };
        self.add_voice(delta, channel, event)
    }

    /// Release `key`
    pub fn note_off(&mut self, delta: u32, channel: Channel, key: u8, velocity: u8) -> WriteResult<()> {
        let event = VoiceEvent::NoteOff {
            key: data(key)?,
            velocity: data(velocity)?,
        };
        self.add_voice(delta, channel, event)
    }

    /// Polyphonic key pressure
    pub fn aftertouch(&mut self, delta: u32, channel: Channel, key: u8, pressure: u8) -> WriteResult<()> {
        let event = VoiceEvent::Aftertouch {
            key: data(key)?,
            pressure: data(pressure)?,
        };
        self.add_voice(delta, channel, event)
    }

    /// Set a controller
    pub fn control_change(
        &mut self,
        delta: u32,
        channel: Channel,
        controller: u8,
        value: u8,
    ) -> WriteResult<()> {
        let event = VoiceEvent::ControlChange {
            controller: data(controller)?,
            value: data(value)?,
        };
        self.add_voice(delta, channel, event)
    }

    /// Select a patch
    pub fn program_change(&mut self, delta: u32, channel: Channel, program: u8) -> WriteResult<()> {
        let event = VoiceEvent::ProgramChange {
            program: data(program)?,
        };
        self.add_voice(delta, channel, event)
    }

    /// Pressure for the whole channel
    pub fn channel_pressure(&mut self, delta: u32, channel: Channel, pressure: u8) -> WriteResult<()> {
        let event = VoiceEvent::ChannelPressure {
            pressure: data(pressure)?,
        };
        self.add_voice(delta, channel, event)
    }

    /// Move the pitch wheel to a 14-bit position, `0x2000` being centered
    pub fn pitch_bend(&mut self, delta: u32, channel: Channel, value: u16) -> WriteResult<()> {
        let bend = PitchBend::new(value).ok_or(WriteError::PitchBend(value))?;
        self.add_voice(delta, channel, VoiceEvent::PitchBend(bend))
    }

    /// Adds a text meta event of the given kind
    pub fn add_text(&mut self, delta: u32, kind: TextKind, text: impl AsRef<[u8]>) -> WriteResult<()> {
        let meta = MetaMessage::Text(kind, Cow::Borrowed(text.as_ref()));
        self.add_event(delta, &TrackMessage::Meta(meta))
    }

    /// Adds a marker
    pub fn add_marker(&mut self, delta: u32, text: impl AsRef<[u8]>) -> WriteResult<()> {
        self.add_text(delta, TextKind::Marker, text)
    }

    /// Changes the tempo
    pub fn set_tempo(&mut self, delta: u32, tempo: Tempo) -> WriteResult<()> {
        self.add_event(delta, &TrackMessage::Meta(MetaMessage::Tempo(tempo)))
    }

    /// Changes the time signature
    pub fn time_signature(&mut self, delta: u32, signature: TimeSignature) -> WriteResult<()> {
        self.add_event(
            delta,
            &TrackMessage::Meta(MetaMessage::TimeSignature(signature)),
        )
    }

    /// Writes the end-of-track marker and wraps the events in an `MTrk` chunk.
    pub fn finish(self) -> WriteResult<Vec<u8>> {
        let delta = VarLen::encode(self.pending_delta)?;
        let mut body = self.buffer;
        body.reserve(delta.len() + END_OF_TRACK.len());
        body.extend_from_slice(delta.as_bytes());
        body.extend_from_slice(&END_OF_TRACK);
        write_chunk(ChunkTag::TRACK, &body)
    }
}

fn data(byte: u8) -> WriteResult<DataByte> {
    DataByte::new(byte).map_err(|_| WriteError::DataByte(byte))
}

#[test]
fn running_status_omits_repeated_status() {
    use pretty_assertions::assert_eq;
    let mut track = TrackWriter::new();
    track.note_on(0, Channel::One, 60, 100).unwrap();
    track.note_on(0, Channel::One, 64, 100).unwrap();
    track.note_on(0, Channel::Two, 67, 100).unwrap();
    assert_eq!(
        track.as_bytes(),
        [0x00, 0x90, 60, 100, 0x00, 64, 100, 0x00, 0x91, 67, 100]
    );
}

#[test]
fn note_off_compression_follows_running_status() {
    use pretty_assertions::assert_eq;
    let mut track = TrackWriter::new();
    track.note_on(0, Channel::One, 60, 100).unwrap();
    track.note_off(10, Channel::One, 60, 0).unwrap();
    // released with a velocity, so it needs its own status
    track.note_off(10, Channel::One, 62, 64).unwrap();
    // running status is now 0x80, nothing to gain
    track.note_off(10, Channel::One, 64, 0).unwrap();
    assert_eq!(
        track.as_bytes(),
        [
            0x00, 0x90, 60, 100, //
            10, 60, 0, //
            10, 0x80, 62, 64, //
            10, 64, 0,
        ]
    );

    let mut plain = TrackWriter::new().with_note_off_compression(false);
    plain.note_on(0, Channel::One, 60, 100).unwrap();
    plain.note_off(10, Channel::One, 60, 0).unwrap();
    assert_eq!(plain.as_bytes(), [0x00, 0x90, 60, 100, 10, 0x80, 60, 0]);
}

#[test]
fn meta_and_sysex_clear_running_status() {
    use crate::message::sysex::SysExKind;
    use pretty_assertions::assert_eq;

    let mut track = TrackWriter::new();
    track.program_change(0, Channel::Three, 5).unwrap();
    track.add_marker(0, "A").unwrap();
    track.program_change(0, Channel::Three, 6).unwrap();
    track
        .add_event(
            0,
            &TrackMessage::SystemExclusive(SystemExclusiveMessage::new(
                SysExKind::Begin,
                &[0x7E, 0xF7][..],
            )),
        )
        .unwrap();
    track.program_change(0, Channel::Three, 7).unwrap();
    assert_eq!(
        track.as_bytes(),
        [
            0x00, 0xC2, 5, //
            0x00, 0xFF, 0x06, 0x01, b'A', //
            0x00, 0xC2, 6, //
            0x00, 0xF0, 0x02, 0x7E, 0xF7, //
            0x00, 0xC2, 7,
        ]
    );
}

#[test]
fn delay_accumulates_into_next_event() {
    use pretty_assertions::assert_eq;
    let mut track = TrackWriter::new();
    track.add_delay(100).unwrap();
    track.add_delay(28).unwrap();
    track.channel_pressure(0, Channel::One, 9).unwrap();
    track.add_delay(5).unwrap();
    let chunk = track.finish().unwrap();
    assert_eq!(
        &chunk[8..],
        [0x81, 0x00, 0xD0, 9, 0x05, 0xFF, 0x2F, 0x00]
    );
}

#[test]
fn explicit_end_of_track_is_written_once() {
    use pretty_assertions::assert_eq;
    let mut track = TrackWriter::new();
    track.add_event(7, &TrackMessage::end_of_track()).unwrap();
    assert!(track.is_ended());
    assert_eq!(
        track.note_on(0, Channel::One, 60, 100),
        Err(WriteError::EventAfterEndOfTrack)
    );
    let chunk = track.finish().unwrap();
    assert_eq!(chunk, [b'M', b'T', b'r', b'k', 0, 0, 0, 4, 7, 0xFF, 0x2F, 0x00]);
}

#[test]
fn unknown_meta_cannot_reuse_a_registered_subtype() {
    use pretty_assertions::assert_eq;
    let unknown = |subtype: u8, data: &'static [u8]| {
        TrackMessage::Meta(MetaMessage::Unknown {
            subtype,
            data: Cow::Borrowed(data),
        })
    };

    let mut track = TrackWriter::new();
    // would end the track early for any decoder
    assert_eq!(
        track.add_event(0, &unknown(0x2F, &[])),
        Err(WriteError::KnownSubtype(0x2F))
    );
    // a tempo payload of the wrong size
    assert_eq!(
        track.add_event(0, &unknown(0x51, &[1, 2])),
        Err(WriteError::KnownSubtype(0x51))
    );
    assert!(track.as_bytes().is_empty());
    assert!(!track.is_ended());

    track.add_event(0, &unknown(0x60, &[1, 2])).unwrap();
    track.note_on(10, Channel::One, 60, 100).unwrap();
    let chunk = track.finish().unwrap();
    assert_eq!(
        chunk[8..],
        [
            0x00, 0xFF, 0x60, 0x02, 1, 2, //
            0x0A, 0x90, 0x3C, 0x64, //
            0x00, 0xFF, 0x2F, 0x00,
        ]
    );
}

#[test]
fn invalid_values_write_nothing() {
    use pretty_assertions::assert_eq;
    let mut track = TrackWriter::new();
    assert_eq!(
        track.note_on(0, Channel::One, 128, 100),
        Err(WriteError::DataByte(128))
    );
    assert_eq!(
        track.pitch_bend(0, Channel::One, 0x4000),
        Err(WriteError::PitchBend(0x4000))
    );
    assert_eq!(
        track.set_tempo(0, Tempo::new(0x0100_0000)),
        Err(WriteError::Tempo(0x0100_0000))
    );
    assert_eq!(
        track.note_on(0x1000_0000, Channel::One, 60, 100),
        Err(WriteError::VarLenOverflow(0x1000_0000))
    );
    assert!(track.as_bytes().is_empty());
    assert_eq!(track.running_status(), None);
}
