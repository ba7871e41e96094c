use alloc::{borrow::Cow, vec::Vec};

use crate::{
    DataByte, Note,
    file::{
        TrackEvent, TrackMessage, Ticked,
        meta::{KeySignature, MetaMessage, SmpteOffset, Tempo, TextKind, TimeSignature},
    },
    message::channel::VoiceEvent,
    note::NoteTracker,
};

#[doc = r#"
Information gathered from the meta events of a track.

Each field holds the first matching event in the track.
"#]
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackInfo<'a> {
    /// Sequence or track name
    pub name: Option<Cow<'a, [u8]>>,
    /// Instrument name
    pub instrument: Option<Cow<'a, [u8]>>,
    /// The first tempo set in the track
    pub tempo: Option<Tempo>,
    /// The first time signature
    pub time_signature: Option<TimeSignature>,
    /// The first key signature
    pub key_signature: Option<KeySignature>,
    /// Where the track starts in SMPTE time
    pub smpte_offset: Option<SmpteOffset>,
}

impl<'a> TrackInfo<'a> {
    fn gather(events: &[TrackEvent<'a>]) -> Self {
        let mut info = Self::default();
        for event in events {
            let TrackMessage::Meta(meta) = event.event() else {
                continue;
            };
            match meta {
                MetaMessage::Text(TextKind::TrackName, name) => {
                    info.name.get_or_insert_with(|| name.clone());
                }
                MetaMessage::Text(TextKind::InstrumentName, name) => {
                    info.instrument.get_or_insert_with(|| name.clone());
                }
                MetaMessage::Tempo(tempo) => {
                    info.tempo.get_or_insert(*tempo);
                }
                MetaMessage::TimeSignature(sig) => {
                    info.time_signature.get_or_insert(*sig);
                }
                MetaMessage::KeySignature(sig) => {
                    info.key_signature.get_or_insert(*sig);
                }
                MetaMessage::SmpteOffset(offset) => {
                    info.smpte_offset.get_or_insert(*offset);
                }
                _ => {}
            }
        }
        info
    }
}

#[doc = r#"
An ordered sequence of events from one track chunk.

A well formed track ends with exactly one end-of-track meta event. A parsed
track whose chunk ran out before that marker is still returned, with
[`Track::is_terminated`] reporting `false`.
"#]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track<'a> {
    pub(crate) events: Vec<TrackEvent<'a>>,
    info: TrackInfo<'a>,
}

impl<'a> Track<'a> {
    /// Create a new track from its events
    pub fn new(events: Vec<TrackEvent<'a>>) -> Self {
        let info = TrackInfo::gather(&events);
        Self { events, info }
    }

    /// The events, in order
    pub fn events(&self) -> &[TrackEvent<'a>] {
        &self.events
    }

    /// Consumes the track, returning its events
    pub fn into_events(self) -> Vec<TrackEvent<'a>> {
        self.events
    }

    /// Metadata from the track's meta events
    pub fn info(&self) -> &TrackInfo<'a> {
        &self.info
    }

    /// The track name, if one was set
    pub fn name(&self) -> Option<&[u8]> {
        self.info.name.as_deref()
    }

    /// True if the last event is the end-of-track marker
    pub fn is_terminated(&self) -> bool {
        self.events
            .last()
            .is_some_and(|event| event.event().is_end_of_track())
    }

    /// Events with their absolute tick position
    pub fn ticked_events(&self) -> impl Iterator<Item = Ticked<&TrackEvent<'a>>> {
        self.events.iter().scan(0u64, |ticks, event| {
            *ticks += event.delta_ticks() as u64;
            Some(Ticked::new(*ticks, event))
        })
    }

    /// Total length of the track in ticks
    pub fn duration_ticks(&self) -> u64 {
        self.events.iter().map(|e| e.delta_ticks() as u64).sum()
    }

    /// Pairs every note-on with the note-off that ends it.
    ///
    /// Notes still held at the end of the track end on its last tick.
    pub fn notes(&self) -> Vec<Note> {
        let mut tracker = NoteTracker::default();
        for ticked in self.ticked_events() {
            if let TrackMessage::ChannelVoice(msg) = ticked.event().event() {
                tracker.handle(ticked.accumulated_ticks(), msg);
            }
        }
        tracker.finish(self.duration_ticks())
    }

    /// The lowest and highest key of any note-on in the track
    pub fn key_range(&self) -> Option<(DataByte, DataByte)> {
        self.events
            .iter()
            .filter_map(|event| match event.event() {
                TrackMessage::ChannelVoice(msg) => match msg.event() {
                    VoiceEvent::NoteOn { key, .. } => Some(*key),
                    _ => None,
                },
                _ => None,
            })
            .fold(None, |range, key| match range {
                None => Some((key, key)),
                Some((low, high)) => Some((low.min(key), high.max(key))),
            })
    }

    /// Detaches the track from the input buffer
    pub fn into_owned(self) -> Track<'static> {
        let events: Vec<_> = self.events.into_iter().map(TrackEvent::into_owned).collect();
        Track::new(events)
    }
}

#[cfg(test)]
fn voice(delta: u32, status: u8, key: u8, velocity: u8) -> TrackEvent<'static> {
    use crate::message::channel::{Channel, ChannelVoiceMessage};
    let event = if status & 0xF0 == 0x90 {
        VoiceEvent::NoteOn {
            key: DataByte(key),
            velocity: DataByte(velocity),
        }
    } else {
        VoiceEvent::NoteOff {
            key: DataByte(key),
            velocity: DataByte(velocity),
        }
    };
    TrackEvent::new(
        delta,
        ChannelVoiceMessage::new(Channel::from_status(status), event),
    )
}

#[test]
fn info_takes_first_of_each_meta() {
    use pretty_assertions::assert_eq;
    let track = Track::new(alloc::vec![
        TrackEvent::new(0, MetaMessage::Text(TextKind::TrackName, Cow::Borrowed(&b"Lead"[..]))),
        TrackEvent::new(0, MetaMessage::Tempo(Tempo::new(600_000))),
        TrackEvent::new(0, MetaMessage::Tempo(Tempo::new(400_000))),
        TrackEvent::new(0, TrackMessage::end_of_track()),
    ]);
    assert_eq!(track.name(), Some(&b"Lead"[..]));
    assert_eq!(track.info().tempo, Some(Tempo::new(600_000)));
    assert!(track.is_terminated());
}

#[test]
fn ticked_events_accumulate_deltas() {
    use pretty_assertions::assert_eq;
    let track = Track::new(alloc::vec![
        voice(0, 0x90, 60, 100),
        voice(480, 0x80, 60, 0),
        voice(240, 0x90, 62, 90),
    ]);
    let ticks: Vec<u64> = track
        .ticked_events()
        .map(|t| t.accumulated_ticks())
        .collect();
    assert_eq!(ticks, [0, 480, 720]);
    assert_eq!(track.duration_ticks(), 720);
    assert!(!track.is_terminated());
}

#[test]
fn key_range_covers_note_ons() {
    use pretty_assertions::assert_eq;
    let track = Track::new(alloc::vec![
        voice(0, 0x90, 64, 100),
        voice(0, 0x90, 48, 100),
        voice(0, 0x80, 30, 0),
        voice(0, 0x90, 72, 100),
    ]);
    assert_eq!(track.key_range(), Some((DataByte(48), DataByte(72))));
    assert_eq!(Track::new(Vec::new()).key_range(), None);
}
