use midicodec::prelude::*;

const HEADER: [u8; 14] = [
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 1, 0, 1, 0x00, 0x60,
];

fn with_track(header: [u8; 14], body: &[u8]) -> Vec<u8> {
    let mut bytes = header.to_vec();
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
    bytes.extend_from_slice(body);
    bytes
}

fn parse_error(bytes: &[u8]) -> (usize, ParseError) {
    let err = MidiFile::parse(bytes).unwrap_err();
    let kind = err
        .parse_error_kind()
        .cloned()
        .unwrap_or_else(|| panic!("expected a parse error, got {err}"));
    (err.position(), kind)
}

#[test]
fn wrong_header_tag() {
    let mut bytes = with_track(HEADER, &[0x00, 0xFF, 0x2F, 0x00]);
    bytes[..4].copy_from_slice(b"RIFF");
    assert_eq!(
        parse_error(&bytes),
        (
            0,
            ParseError::Chunk(ChunkError::InvalidTag {
                expected: ChunkTag::HEADER,
                found: ChunkTag(*b"RIFF"),
            })
        )
    );
}

#[test]
fn wrong_track_tag() {
    let mut bytes = with_track(HEADER, &[0x00, 0xFF, 0x2F, 0x00]);
    bytes[14..18].copy_from_slice(b"MTrx");
    assert_eq!(
        parse_error(&bytes),
        (
            14,
            ParseError::Chunk(ChunkError::InvalidTag {
                expected: ChunkTag::TRACK,
                found: ChunkTag(*b"MTrx"),
            })
        )
    );
}

#[test]
fn header_length_must_be_six() {
    let mut header = HEADER;
    header[7] = 8;
    let bytes = with_track(header, &[0x00, 0xFF, 0x2F, 0x00]);
    assert_eq!(
        parse_error(&bytes),
        (4, ParseError::Header(HeaderError::Length(8)))
    );
}

#[test]
fn unknown_format() {
    let mut header = HEADER;
    header[9] = 3;
    assert_eq!(
        parse_error(&header),
        (8, ParseError::Header(HeaderError::InvalidFormat(3)))
    );
}

#[test]
fn single_track_format_with_two_tracks() {
    let mut header = HEADER;
    header[9] = 0;
    header[11] = 2;
    assert_eq!(
        parse_error(&header),
        (8, ParseError::Header(HeaderError::SingleTrackCount(2)))
    );
}

#[test]
fn zero_division() {
    let mut header = HEADER;
    header[13] = 0;
    assert_eq!(
        parse_error(&header),
        (12, ParseError::Header(HeaderError::ZeroDivision))
    );
}

#[test]
fn declared_track_is_missing() {
    let mut header = HEADER;
    header[11] = 2;
    let bytes = with_track(header, &[0x00, 0xFF, 0x2F, 0x00]);
    assert_eq!(
        parse_error(&bytes),
        (
            bytes.len(),
            ParseError::File(FileError::MissingTracks {
                declared: 2,
                found: 1
            })
        )
    );
}

#[test]
fn truncated_header() {
    let err = MidiFile::parse(&HEADER[..10]).unwrap_err();
    assert!(err.is_out_of_bounds());
    assert_eq!(err.position(), 10);
}

#[test]
fn chunk_length_past_the_input() {
    let mut bytes = with_track(HEADER, &[0x00, 0xFF, 0x2F, 0x00]);
    bytes[21] = 40;
    assert_eq!(
        parse_error(&bytes),
        (
            22,
            ParseError::Chunk(ChunkError::Length {
                declared: 40,
                available: 4
            })
        )
    );
}

#[test]
fn data_byte_without_running_status() {
    let bytes = with_track(HEADER, &[0x00, 0x3C, 0x40]);
    assert_eq!(
        parse_error(&bytes),
        (23, ParseError::MissingRunningStatus(0x3C))
    );
}

#[test]
fn meta_events_keep_running_status() {
    let bytes = with_track(
        HEADER,
        &[
            0x00, 0x91, 0x3C, 0x40, //
            0x00, 0xFF, 0x06, 0x01, b'A', //
            0x10, 0x3C, 0x00, //
            0x00, 0xFF, 0x2F, 0x00,
        ],
    );
    let file = MidiFile::parse(&bytes).unwrap();
    let events = file.tracks()[0].events();
    assert_eq!(events.len(), 4);
    assert_eq!(
        events[2],
        TrackEvent::new(
            0x10,
            ChannelVoiceMessage::note_off(
                Channel::Two,
                DataByte::new(0x3C).unwrap(),
                DataByte::new(0).unwrap()
            )
        )
    );
}

#[test]
fn system_status_bytes_are_rejected() {
    let bytes = with_track(HEADER, &[0x00, 0xF1, 0x00]);
    assert_eq!(
        parse_error(&bytes),
        (23, ParseError::UnknownStatus(0xF1))
    );
}

#[test]
fn data_byte_with_leading_bit() {
    // the second data byte of the note-on is a status byte
    let bytes = with_track(HEADER, &[0x00, 0x90, 0x3C, 0x80, 0x00]);
    let (_, kind) = parse_error(&bytes);
    assert_eq!(kind, ParseError::DataByte(0x80));
}

#[test]
fn varlen_longer_than_four_bytes() {
    let bytes = with_track(HEADER, &[0x81, 0x81, 0x81, 0x81, 0x00, 0xC0, 0x01]);
    assert_eq!(parse_error(&bytes), (22, ParseError::VarLenTooLong));
}

#[test]
fn tempo_with_wrong_length() {
    let bytes = with_track(HEADER, &[0x00, 0xFF, 0x51, 0x02, 0x07, 0xA1, 0x00, 0xFF, 0x2F, 0x00]);
    assert_eq!(
        parse_error(&bytes),
        (
            23,
            ParseError::Meta(MetaError::Length {
                kind: MetaKind::Tempo,
                expected: 3,
                found: 2
            })
        )
    );
}

#[test]
fn unknown_meta_events_are_skipped() {
    let bytes = with_track(
        HEADER,
        &[
            0x00, 0xFF, 0x60, 0x03, 0x01, 0x02, 0x03, //
            0x00, 0xC0, 0x05, //
            0x00, 0xFF, 0x2F, 0x00,
        ],
    );
    let file = MidiFile::parse(&bytes).unwrap();
    let events = file.tracks()[0].events();
    assert_eq!(events.len(), 3);
    assert!(matches!(
        events[0].event(),
        TrackMessage::Meta(MetaMessage::Unknown { subtype: 0x60, data }) if data[..] == [1, 2, 3]
    ));
    assert!(matches!(
        events[1].event(),
        TrackMessage::ChannelVoice(msg) if msg.channel() == Channel::One
    ));
}

#[test]
fn missing_end_of_track_is_tolerated() {
    let bytes = with_track(HEADER, &[0x00, 0x90, 0x3C, 0x40, 0x60, 0x3C, 0x00]);
    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.tracks()[0].events().len(), 2);
    assert_eq!(file.unterminated_tracks().collect::<Vec<_>>(), [0]);
}

#[test]
fn trailing_bytes_are_ignored() {
    let mut bytes = with_track(HEADER, &[0x00, 0xFF, 0x2F, 0x00]);
    bytes.extend_from_slice(b"MTrk\0\0\0\0garbage");
    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.track_count(), 1);
}
