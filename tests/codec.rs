use std::borrow::Cow;

use midicodec::prelude::*;

fn voice(delta: u32, channel: Channel, event: VoiceEvent) -> TrackEvent<'static> {
    TrackEvent::new(delta, ChannelVoiceMessage::new(channel, event))
}

fn data(byte: u8) -> DataByte {
    DataByte::new(byte).unwrap()
}

fn single_track_file(events: Vec<TrackEvent<'static>>) -> MidiFile<'static> {
    MidiFile::new(
        Format::Simultaneous(vec![Track::new(events)]),
        Timing::new_ticks_per_quarter_note(480),
    )
}

#[test]
fn note_on_then_note_off_uses_running_status() {
    let mut writer = MidiWriter::new(Timing::new_ticks_per_quarter_note(480));
    let track = writer.track(0).unwrap();
    track.note_on(0, Channel::One, 60, 100).unwrap();
    track.note_off(480, Channel::One, 60, 0).unwrap();
    let bytes = writer.finish().unwrap();

    let chunk = &bytes[14..];
    assert_eq!(chunk[..4], *b"MTrk");
    assert_eq!(
        chunk[8..],
        [
            0x00, 0x90, 0x3C, 0x64, //
            0x83, 0x60, 0x3C, 0x00, //
            0x00, 0xFF, 0x2F, 0x00,
        ]
    );

    let file = midicodec::decode(&bytes).unwrap();
    let events = file.tracks()[0].events();
    assert_eq!(events.len(), 3);
    assert_eq!(
        events[0],
        voice(0, Channel::One, VoiceEvent::NoteOn { key: data(60), velocity: data(100) })
    );
    assert_eq!(
        events[1],
        voice(480, Channel::One, VoiceEvent::NoteOff { key: data(60), velocity: data(0) })
    );
    assert_eq!(events[2], TrackEvent::new(0, TrackMessage::end_of_track()));
}

#[test]
fn declared_chunk_lengths_match_their_bodies() {
    let mut writer = MidiWriter::default().with_preamble(TrackPreamble::default());
    for index in 0..3 {
        let track = writer.track(index).unwrap();
        for key in 0..(20 * index as u8) {
            track.note_on(7, Channel::Ten, key, 90).unwrap();
            track.note_off(300, Channel::Ten, key, 0).unwrap();
        }
        track.add_text(0, TextKind::Lyric, "la").unwrap();
    }
    let bytes = writer.finish().unwrap();

    let mut rest = &bytes[14..];
    let mut chunks = 0;
    while !rest.is_empty() {
        assert_eq!(rest[..4], *b"MTrk");
        let len = u32::from_be_bytes([rest[4], rest[5], rest[6], rest[7]]) as usize;
        let body = &rest[8..8 + len];
        assert_eq!(body[len - 3..], [0xFF, 0x2F, 0x00]);
        rest = &rest[8 + len..];
        chunks += 1;
    }
    assert_eq!(chunks, 3);
}

#[test]
fn every_event_kind_survives_a_round_trip() {
    let events = vec![
        TrackEvent::new(0, MetaMessage::SequenceNumber(3)),
        TrackEvent::new(0, MetaMessage::Text(TextKind::TrackName, Cow::Borrowed(&b"Lead"[..]))),
        TrackEvent::new(0, MetaMessage::ChannelPrefix(Channel::Four)),
        TrackEvent::new(0, MetaMessage::Tempo(Tempo::new(428_571))),
        TrackEvent::new(0, MetaMessage::TimeSignature(TimeSignature::new(6, 3, 24, 8))),
        TrackEvent::new(0, MetaMessage::KeySignature(KeySignature::new(-3, true))),
        voice(0, Channel::Four, VoiceEvent::ProgramChange { program: data(19) }),
        voice(0, Channel::Four, VoiceEvent::ControlChange { controller: data(7), value: data(100) }),
        voice(10, Channel::Four, VoiceEvent::NoteOn { key: data(64), velocity: data(80) }),
        voice(10, Channel::Four, VoiceEvent::Aftertouch { key: data(64), pressure: data(30) }),
        voice(10, Channel::Four, VoiceEvent::ChannelPressure { pressure: data(20) }),
        voice(10, Channel::Four, VoiceEvent::PitchBend(PitchBend::new(0x1234).unwrap())),
        voice(10, Channel::Four, VoiceEvent::NoteOff { key: data(64), velocity: data(40) }),
        TrackEvent::new(
            0,
            SystemExclusiveMessage::new(SysExKind::Begin, &[0x7E, 0x7F, 0x09, 0x01, 0xF7][..]),
        ),
        TrackEvent::new(0, SystemExclusiveMessage::new(SysExKind::Escape, &[0xFA][..])),
        TrackEvent::new(5, MetaMessage::SequencerSpecific(Cow::Borrowed(&[0x00, 0x00, 0x41][..]))),
        TrackEvent::new(0, MetaMessage::Unknown { subtype: 0x60, data: Cow::Borrowed(&[1, 2][..]) }),
        TrackEvent::new(1_000_000, TrackMessage::end_of_track()),
    ];
    let file = single_track_file(events);

    let bytes = midicodec::encode(&file).unwrap();
    let decoded = midicodec::decode(&bytes).unwrap();
    assert_eq!(decoded, file);

    let info = decoded.tracks()[0].info();
    assert_eq!(info.name.as_deref(), Some(&b"Lead"[..]));
    assert_eq!(info.key_signature, Some(KeySignature::new(-3, true)));
    assert_eq!(decoded.micros_per_quarter_note(), 428_571);
    assert_eq!(decoded.beats_per_minute(), 140);
}

#[test]
fn zero_velocity_note_on_decodes_as_note_off() {
    let file = single_track_file(vec![
        voice(0, Channel::Two, VoiceEvent::NoteOn { key: data(50), velocity: data(90) }),
        voice(20, Channel::Two, VoiceEvent::NoteOn { key: data(50), velocity: data(0) }),
    ]);
    let decoded = midicodec::decode(&midicodec::encode(&file).unwrap())
        .unwrap()
        .into_owned();
    assert_eq!(
        decoded.tracks()[0].events()[1],
        voice(20, Channel::Two, VoiceEvent::NoteOff { key: data(50), velocity: data(0) })
    );
    let notes = decoded.tracks()[0].notes();
    assert_eq!(notes.len(), 1);
    assert_eq!((notes[0].start(), notes[0].duration()), (0, 20));
}

#[test]
fn tempo_of_500000_is_120_bpm() {
    let mut writer = MidiWriter::default();
    writer.track(0).unwrap().set_tempo(0, Tempo::new(500_000)).unwrap();
    let bytes = writer.finish().unwrap();
    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.beats_per_minute(), 120);
    assert_eq!(file.tempo(), Tempo::new(500_000));
}

#[test]
fn missing_tempo_falls_back_to_120_bpm() {
    let file = single_track_file(vec![]);
    assert_eq!(file.micros_per_quarter_note(), 500_000);
    assert_eq!(file.beats_per_minute(), 120);
}

#[test]
fn loop_markers_land_in_the_first_track() {
    let mut writer = MidiWriter::default();
    writer.track(1).unwrap().note_on(0, Channel::One, 60, 1).unwrap();
    writer.add_loop_start(0).unwrap();
    writer.add_loop_end(4000).unwrap();
    let bytes = writer.finish().unwrap();

    let file = MidiFile::parse(&bytes).unwrap();
    let markers: Vec<(u64, &[u8])> = file.tracks()[0]
        .ticked_events()
        .filter_map(|ticked| match ticked.event().event() {
            TrackMessage::Meta(MetaMessage::Text(TextKind::Marker, text)) => {
                Some((ticked.accumulated_ticks(), &text[..]))
            }
            _ => None,
        })
        .collect();
    assert_eq!(markers, [(0, &b"loopStart"[..]), (4000, &b"loopEnd"[..])]);
}

#[test]
fn key_range_and_notes_follow_the_track() {
    let mut writer = MidiWriter::default();
    let track = writer.track(0).unwrap();
    track.note_on(0, Channel::One, 48, 100).unwrap();
    track.note_on(0, Channel::One, 72, 100).unwrap();
    track.note_off(1000, Channel::One, 48, 0).unwrap();
    track.note_off(500, Channel::One, 72, 0).unwrap();
    let bytes = writer.finish().unwrap();

    let file = MidiFile::parse(&bytes).unwrap();
    let track = &file.tracks()[0];
    assert_eq!(track.key_range(), Some((data(48), data(72))));
    let durations: Vec<(u8, u64)> = track
        .notes()
        .iter()
        .map(|note| (note.key().value(), note.duration()))
        .collect();
    assert_eq!(durations, [(48, 1000), (72, 1500)]);
}

#[test]
fn sequential_files_keep_their_format() {
    let file = MidiFile::new(
        Format::SequentiallyIndependent(vec![Track::new(vec![]), Track::new(vec![])]),
        Timing::new_ticks_per_quarter_note(192),
    );
    let bytes = file.to_bytes().unwrap();
    assert_eq!(bytes[8..14], [0, 2, 0, 2, 0, 192]);
    let decoded = MidiFile::parse(&bytes).unwrap();
    assert_eq!(decoded.format_type(), FormatType::SequentiallyIndependent);
    assert_eq!(decoded.track_count(), 2);
}

#[test]
fn unknown_meta_with_a_registered_subtype_is_not_encoded() {
    let file = single_track_file(vec![
        TrackEvent::new(0, MetaMessage::Unknown { subtype: 0x2F, data: Cow::Borrowed(&[][..]) }),
        voice(10, Channel::One, VoiceEvent::NoteOn { key: data(60), velocity: data(100) }),
    ]);
    assert_eq!(midicodec::encode(&file), Err(WriteError::KnownSubtype(0x2F)));

    let file = single_track_file(vec![TrackEvent::new(
        0,
        MetaMessage::Unknown { subtype: 0x51, data: Cow::Borrowed(&[1, 2][..]) },
    )]);
    assert_eq!(midicodec::encode(&file), Err(WriteError::KnownSubtype(0x51)));
}
