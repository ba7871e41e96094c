use alloc::{
    collections::{BTreeMap, VecDeque},
    vec::Vec,
};

use crate::{
    DataByte,
    message::channel::{Channel, ChannelVoiceMessage, VoiceEvent},
};

#[doc = r#"
A sounding note: a note-on paired with the note-off that ends it.

Built by [`Track::notes`](crate::file::Track::notes). Times are in ticks
from the start of the track.
"#]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    channel: Channel,
    key: DataByte,
    velocity: DataByte,
    start: u64,
    duration: u64,
}

impl Note {
    /// Create a new note
    pub const fn new(
        channel: Channel,
        key: DataByte,
        velocity: DataByte,
        start: u64,
        duration: u64,
    ) -> Self {
        Self {
            channel,
            key,
            velocity,
            start,
            duration,
        }
    }

    /// The channel the note played on
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// The key pressed
    pub const fn key(&self) -> DataByte {
        self.key
    }

    /// The note-on velocity
    pub const fn velocity(&self) -> DataByte {
        self.velocity
    }

    /// Tick the note starts on
    pub const fn start(&self) -> u64 {
        self.start
    }

    /// Length in ticks
    pub const fn duration(&self) -> u64 {
        self.duration
    }

    /// Tick the note ends on
    pub const fn end(&self) -> u64 {
        self.start + self.duration
    }
}

/// Pairs note-ons with note-offs on the same channel and key.
///
/// Repeated note-ons for a held key stack up; each note-off closes the
/// oldest one.
#[derive(Default)]
pub(crate) struct NoteTracker {
    held: BTreeMap<(Channel, DataByte), VecDeque<(u64, DataByte)>>,
    notes: Vec<Note>,
}

impl NoteTracker {
    pub(crate) fn handle(&mut self, tick: u64, msg: &ChannelVoiceMessage) {
        let channel = msg.channel();
        match *msg.event() {
            VoiceEvent::NoteOn { key, velocity } if velocity.0 > 0 => {
                self.held
                    .entry((channel, key))
                    .or_default()
                    .push_back((tick, velocity));
            }
            VoiceEvent::NoteOn { key, .. } | VoiceEvent::NoteOff { key, .. } => {
                let Some(held) = self.held.get_mut(&(channel, key)) else {
                    return;
                };
                if let Some((start, velocity)) = held.pop_front() {
                    self.notes
                        .push(Note::new(channel, key, velocity, start, tick - start));
                }
            }
            _ => {}
        }
    }

    /// Closes anything still held at `end` and returns the notes by start tick.
    pub(crate) fn finish(mut self, end: u64) -> Vec<Note> {
        for ((channel, key), held) in self.held {
            for (start, velocity) in held {
                self.notes.push(Note::new(
                    channel,
                    key,
                    velocity,
                    start,
                    end.saturating_sub(start),
                ));
            }
        }
        self.notes.sort_by_key(|note| (note.start, note.key));
        self.notes
    }
}

#[test]
fn pairs_note_on_with_next_note_off() {
    use pretty_assertions::assert_eq;
    let c = DataByte(60);
    let mut tracker = NoteTracker::default();
    tracker.handle(0, &ChannelVoiceMessage::note_on(Channel::One, c, DataByte(100)));
    tracker.handle(0, &ChannelVoiceMessage::note_on(Channel::Two, c, DataByte(80)));
    tracker.handle(480, &ChannelVoiceMessage::note_off(Channel::One, c, DataByte(0)));
    // note-on with zero velocity ends the channel two note
    tracker.handle(960, &ChannelVoiceMessage::note_on(Channel::Two, c, DataByte(0)));

    let notes = tracker.finish(960);
    assert_eq!(
        notes,
        [
            Note::new(Channel::One, c, DataByte(100), 0, 480),
            Note::new(Channel::Two, c, DataByte(80), 0, 960),
        ]
    );
}

#[test]
fn held_notes_end_with_the_track() {
    use pretty_assertions::assert_eq;
    let mut tracker = NoteTracker::default();
    tracker.handle(
        100,
        &ChannelVoiceMessage::note_on(Channel::One, DataByte(64), DataByte(90)),
    );
    // stray note-off for a key that was never pressed
    tracker.handle(
        120,
        &ChannelVoiceMessage::note_off(Channel::One, DataByte(65), DataByte(0)),
    );
    let notes = tracker.finish(500);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].duration(), 400);
    assert_eq!(notes[0].end(), 500);
}
