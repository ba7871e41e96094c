use midicodec::prelude::*;

/// Helper function to create a minimal MIDI file with SMPTE offset
/// Returns the complete MIDI file as a byte vector
fn create_midi_with_smpte_offset(
    fps: SmpteFps,
    hour: u8,
    minute: u8,
    second: u8,
    frame: u8,
    subframe: u8,
) -> Vec<u8> {
    let offset = SmpteOffset {
        fps,
        hour,
        minute,
        second,
        frame,
        subframe,
    };

    let mut writer = MidiWriter::new(Timing::new_ticks_per_quarter_note(96))
        .with_format(FormatType::SingleMultiChannel);
    let track = writer.track(0).unwrap();
    track
        .add_event(0, &TrackMessage::Meta(MetaMessage::SmpteOffset(offset)))
        .unwrap();
    track.note_on(0, Channel::One, 60, 100).unwrap();
    track.note_off(96, Channel::One, 60, 64).unwrap();
    writer.finish().unwrap()
}

fn offset_of(file: &MidiFile<'_>) -> SmpteOffset {
    file.tracks()[0]
        .info()
        .smpte_offset
        .expect("track should carry an SMPTE offset")
}

#[test]
fn test_smpte_offset_24fps() {
    let midi_data = create_midi_with_smpte_offset(SmpteFps::TwentyFour, 12, 30, 15, 18, 50);

    // header, chunk header, delta time, then FF 54 05
    assert_eq!(midi_data[22..26], [0x00, 0xFF, 0x54, 0x05]);

    let file = MidiFile::parse(&midi_data).unwrap();
    let offset = offset_of(&file);
    assert_eq!(offset.fps, SmpteFps::TwentyFour);
    assert_eq!(offset.hour, 12);
    assert_eq!(offset.minute, 30);
    assert_eq!(offset.second, 15);
    assert_eq!(offset.frame, 18);
    assert_eq!(offset.subframe, 50);

    let expected_micros = (12 * 3600 + 30 * 60 + 15) as f64 * 1_000_000.0
        + (18.0 / 24.0) * 1_000_000.0
        + (50.0 / 100.0 / 24.0) * 1_000_000.0;
    assert!((offset.as_micros() - expected_micros).abs() < 0.01);
}

#[test]
fn test_smpte_offset_25fps_pal() {
    let midi_data = create_midi_with_smpte_offset(SmpteFps::TwentyFive, 0, 0, 1, 12, 75);
    let file = MidiFile::parse(&midi_data).unwrap();
    let offset = offset_of(&file);
    assert_eq!(offset.fps, SmpteFps::TwentyFive);
    assert_eq!(offset.second, 1);
    assert_eq!(offset.frame, 12);
    assert_eq!(offset.subframe, 75);
}

#[test]
fn test_smpte_offset_29_97_drop_frame() {
    let midi_data = create_midi_with_smpte_offset(SmpteFps::TwentyNine, 23, 59, 59, 28, 99);
    let file = MidiFile::parse(&midi_data).unwrap();
    let offset = offset_of(&file);
    assert_eq!(offset.fps, SmpteFps::TwentyNine);

    // just before midnight
    let expected = 86_399_000_000.0 + (28.0 * 1_000_000.0 / 29.97) + (99.0 * 10_000.0 / 29.97);
    assert!((offset.as_micros() - expected).abs() < 1_000.0);
}

#[test]
fn test_smpte_offset_shifts_timed_events() {
    let midi_data = create_midi_with_smpte_offset(SmpteFps::Thirty, 0, 0, 2, 15, 0);
    let file = MidiFile::parse(&midi_data).unwrap();

    // two seconds and half a second's worth of frames
    let start = 2_500_000;
    let timestamps: Vec<u64> = file
        .into_timed_events()
        .map(|timed| timed.timestamp.us())
        .collect();
    // offset, note on, note off a quarter note later, end of track
    assert_eq!(timestamps, [start, start, start + 500_000, start + 500_000]);
}

#[test]
fn test_multiple_tracks_with_different_offsets() {
    let mut writer = MidiWriter::new(Timing::new_ticks_per_quarter_note(480));
    for (index, second) in [0u8, 10].into_iter().enumerate() {
        let offset = SmpteOffset {
            fps: SmpteFps::TwentyFive,
            hour: 0,
            minute: 0,
            second,
            frame: 0,
            subframe: 0,
        };
        writer
            .track(index)
            .unwrap()
            .add_event(0, &TrackMessage::Meta(MetaMessage::SmpteOffset(offset)))
            .unwrap();
    }
    let bytes = writer.finish().unwrap();
    let file = MidiFile::parse(&bytes).unwrap();

    let seconds: Vec<u8> = file
        .tracks()
        .iter()
        .filter_map(|track| track.info().smpte_offset)
        .map(|offset| offset.second)
        .collect();
    assert_eq!(seconds, [0, 10]);
}

#[test]
fn test_smpte_division_is_rejected() {
    // -25 frames per second, 40 ticks per frame
    let bytes = [
        b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0xE7, 40, //
        b'M', b'T', b'r', b'k', 0, 0, 0, 4, 0x00, 0xFF, 0x2F, 0x00,
    ];
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(err.position(), 12);
    assert_eq!(
        err.parse_error_kind(),
        Some(&ParseError::Header(HeaderError::SmpteTiming(0xE7)))
    );
}
