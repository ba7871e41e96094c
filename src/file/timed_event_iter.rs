use alloc::vec::{self, Vec};

use crate::{
    UMicros,
    file::{Format, Timing, Track, TrackEvent, TrackMessage, meta::DEFAULT_MICROS_PER_QUARTER_NOTE},
    prelude::*,
};

/// An event tagged with the time it happens, measured from the start of its track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timed<T> {
    /// When the event happens
    pub timestamp: UMicros,
    /// The event
    pub event: T,
}

impl<T> Timed<T> {
    /// Tag an event with a time
    pub const fn new(timestamp: UMicros, event: T) -> Self {
        Self { timestamp, event }
    }
}

#[derive(Debug, Clone, Copy)]
struct TempoChange {
    tick: u64,
    /// time at `tick`
    at: UMicros,
    micros_per_quarter_note: u32,
}

/// Converts tick positions to microseconds, following every tempo change.
#[derive(Debug, Clone)]
struct TempoMap {
    ticks_per_quarter_note: u16,
    changes: Vec<TempoChange>,
}

impl TempoMap {
    fn new(timing: Timing, tracks: &[Track<'_>]) -> Self {
        let mut tempos: Vec<(u64, u32)> = tracks
            .iter()
            .flat_map(|track| {
                track.ticked_events().filter_map(|ticked| match ticked.event().event() {
                    TrackMessage::Meta(MetaMessage::Tempo(tempo)) => {
                        Some((ticked.accumulated_ticks(), tempo.micros_per_quarter_note()))
                    }
                    _ => None,
                })
            })
            .collect();
        // stable, so for changes on the same tick the later track wins
        tempos.sort_by_key(|(tick, _)| *tick);

        let mut map = Self {
            ticks_per_quarter_note: timing.ticks_per_quarter_note(),
            changes: alloc::vec![TempoChange {
                tick: 0,
                at: UMicros::ZERO,
                micros_per_quarter_note: DEFAULT_MICROS_PER_QUARTER_NOTE,
            }],
        };
        for (tick, tempo) in tempos {
            let at = map.micros_at(tick);
            match map.changes.last_mut() {
                Some(last) if last.tick == tick => last.micros_per_quarter_note = tempo,
                _ => map.changes.push(TempoChange {
                    tick,
                    at,
                    micros_per_quarter_note: tempo,
                }),
            }
        }
        map
    }

    fn micros_at(&self, tick: u64) -> UMicros {
        let index = self.changes.partition_point(|change| change.tick <= tick);
        let Some(change) = self.changes[..index].last() else {
            return UMicros::ZERO;
        };
        change.at
            + UMicros::from_ticks(
                tick - change.tick,
                change.micros_per_quarter_note,
                self.ticks_per_quarter_note,
            )
    }
}

#[doc = r#"
An iterator returned from [`MidiFile::into_timed_events`](super::MidiFile::into_timed_events).

Yields every event of the first track, then every event of the next, each
stamped with its time from the start of the track.

In format 0 and 1 files, tempo changes in any track apply to all tracks. In
format 2 files each track follows only its own tempo changes. Until the
first tempo change, a quarter note lasts 500 000 microseconds. A track's
SMPTE offset, if it has one, shifts all of its events.
"#]
pub struct TimedEventIterator<'a> {
    timing: Timing,
    shared_tempo: Option<TempoMap>,
    tracks: vec::IntoIter<Track<'a>>,
    current: CurrentTrack<'a>,
    len_remaining: usize,
}

struct CurrentTrack<'a> {
    tempo: Option<TempoMap>,
    offset: UMicros,
    ticks: u64,
    events: vec::IntoIter<TrackEvent<'a>>,
}

impl<'a> CurrentTrack<'a> {
    fn new(track: Track<'a>, tempo: Option<TempoMap>) -> Self {
        let offset = track
            .info()
            .smpte_offset
            .as_ref()
            .map(|offset| UMicros::new(offset.as_micros() as u64))
            .unwrap_or_default();
        Self {
            tempo,
            offset,
            ticks: 0,
            events: track.into_events().into_iter(),
        }
    }

    fn empty() -> Self {
        Self {
            tempo: None,
            offset: UMicros::ZERO,
            ticks: 0,
            events: Vec::new().into_iter(),
        }
    }
}

impl<'a> TimedEventIterator<'a> {
    pub(super) fn new(format: Format<'a>, timing: Timing) -> Self {
        let shared_tempo = match &format {
            Format::SequentiallyIndependent(_) => None,
            Format::SingleMultiChannel(_) | Format::Simultaneous(_) => {
                Some(TempoMap::new(timing, format.tracks()))
            }
        };
        let tracks = format.into_tracks();
        let len_remaining = tracks.iter().map(|track| track.events().len()).sum();

        Self {
            timing,
            shared_tempo,
            tracks: tracks.into_iter(),
            current: CurrentTrack::empty(),
            len_remaining,
        }
    }

    fn next_track(&mut self) -> Option<()> {
        let track = self.tracks.next()?;
        let tempo = match self.shared_tempo {
            Some(_) => None,
            None => Some(TempoMap::new(self.timing, core::slice::from_ref(&track))),
        };
        self.current = CurrentTrack::new(track, tempo);
        Some(())
    }
}

impl<'a> Iterator for TimedEventIterator<'a> {
    type Item = Timed<TrackMessage<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let event = loop {
            match self.current.events.next() {
                Some(event) => break event,
                None => self.next_track()?,
            }
        };
        self.len_remaining -= 1;
        self.current.ticks += event.delta_ticks() as u64;

        let tempo = self.current.tempo.as_ref().or(self.shared_tempo.as_ref())?;
        let timestamp = self.current.offset + tempo.micros_at(self.current.ticks);
        Some(Timed::new(timestamp, event.into_event()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len_remaining, Some(self.len_remaining))
    }
}

impl ExactSizeIterator for TimedEventIterator<'_> {}

#[cfg(test)]
fn note_on_event(delta_ticks: u32, key: u8, velocity: u8, channel: Channel) -> TrackEvent<'static> {
    TrackEvent::new(
        delta_ticks,
        ChannelVoiceMessage::note_on(channel, DataByte(key), DataByte(velocity)),
    )
}

#[cfg(test)]
fn note_off_event(delta_ticks: u32, key: u8, channel: Channel) -> TrackEvent<'static> {
    TrackEvent::new(
        delta_ticks,
        ChannelVoiceMessage::note_off(channel, DataByte(key), DataByte(0)),
    )
}

#[cfg(test)]
fn tempo_event(delta_ticks: u32, micros_per_quarter: u32) -> TrackEvent<'static> {
    TrackEvent::new(
        delta_ticks,
        MetaMessage::Tempo(Tempo::new(micros_per_quarter)),
    )
}

#[cfg(test)]
fn timestamps(format: Format<'static>, ticks_per_quarter_note: u16) -> Vec<u64> {
    let timing = Timing::new_ticks_per_quarter_note(ticks_per_quarter_note);
    TimedEventIterator::new(format, timing)
        .map(|timed| timed.timestamp.us())
        .collect()
}

#[test]
fn test_empty_file_yields_nothing() {
    let timing = Timing::new_ticks_per_quarter_note(480);
    let mut iter = TimedEventIterator::new(Format::Simultaneous(Vec::new()), timing);
    assert_eq!(iter.len(), 0);
    assert!(iter.next().is_none());
}

#[test]
fn test_single_track_multiple_events_with_delta_time() {
    use pretty_assertions::assert_eq;
    let track = Track::new(alloc::vec![
        tempo_event(0, 500_000),
        note_on_event(0, 60, 100, Channel::One),
        note_off_event(480, 60, Channel::One),
        note_on_event(240, 62, 80, Channel::One),
    ]);
    assert_eq!(
        timestamps(Format::SingleMultiChannel(track), 480),
        [0, 0, 500_000, 750_000]
    );
}

#[test]
fn test_default_tempo_without_tempo_event() {
    use pretty_assertions::assert_eq;
    let track = Track::new(alloc::vec![
        note_on_event(0, 60, 100, Channel::One),
        note_off_event(96, 60, Channel::One),
    ]);
    assert_eq!(
        timestamps(Format::SingleMultiChannel(track), 96),
        [0, 500_000]
    );
}

#[test]
fn test_tempo_change_mid_track() {
    use pretty_assertions::assert_eq;
    let track = Track::new(alloc::vec![
        tempo_event(0, 500_000),
        note_on_event(480, 60, 100, Channel::One),
        tempo_event(0, 1_000_000),
        note_off_event(480, 60, Channel::One),
    ]);
    assert_eq!(
        timestamps(Format::SingleMultiChannel(track), 480),
        [0, 500_000, 500_000, 1_500_000]
    );
}

#[test]
fn test_simultaneous_tracks_share_the_tempo_map() {
    use pretty_assertions::assert_eq;
    let conductor = Track::new(alloc::vec![
        tempo_event(0, 500_000),
        tempo_event(480, 250_000),
    ]);
    let melody = Track::new(alloc::vec![
        note_on_event(240, 36, 80, Channel::Two),
        note_off_event(480, 36, Channel::Two),
    ]);
    assert_eq!(
        timestamps(Format::Simultaneous(alloc::vec![conductor, melody]), 480),
        [0, 500_000, 250_000, 625_000]
    );
}

#[test]
fn test_sequentially_independent_tracks_keep_their_own_tempo() {
    use pretty_assertions::assert_eq;
    let first = Track::new(alloc::vec![
        tempo_event(0, 1_000_000),
        note_on_event(0, 60, 100, Channel::One),
        note_off_event(960, 60, Channel::One),
    ]);
    let second = Track::new(alloc::vec![
        note_on_event(0, 48, 90, Channel::Two),
        note_off_event(480, 48, Channel::Two),
    ]);
    assert_eq!(
        timestamps(
            Format::SequentiallyIndependent(alloc::vec![first, second]),
            960
        ),
        [0, 0, 1_000_000, 0, 250_000]
    );
}

#[test]
fn test_smpte_offset_shifts_the_track() {
    use pretty_assertions::assert_eq;
    let offset = SmpteOffset::parse(&[0x60, 0x00, 0x00, 0x01, 0x00]).unwrap();
    let track = Track::new(alloc::vec![
        TrackEvent::new(0, MetaMessage::SmpteOffset(offset)),
        note_on_event(480, 60, 100, Channel::One),
    ]);
    let shift = offset.as_micros() as u64;
    assert_eq!(
        timestamps(Format::SingleMultiChannel(track), 480),
        [shift, shift + 500_000]
    );
}
