use midicodec::prelude::*;

/// Helper to create raw SMPTE offset data bytes
fn create_smpte_bytes(
    fps_bits: u8,
    hour: u8,
    minute: u8,
    second: u8,
    frame: u8,
    subframe: u8,
) -> Vec<u8> {
    vec![
        (fps_bits << 5) | (hour & 0x1F),
        minute,
        second,
        frame,
        subframe,
    ]
}

/// A format 0 file whose only track starts with an SMPTE offset carrying `payload`
fn file_with_offset_payload(payload: &[u8]) -> Vec<u8> {
    let mut body = vec![0x00, 0xFF, 0x54, payload.len() as u8];
    body.extend_from_slice(payload);
    body.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);

    let mut bytes = vec![b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0x03, 0xE8];
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
    bytes.extend_from_slice(&body);
    bytes
}

#[test]
fn test_smpte_offset_invalid_length() {
    let result = SmpteOffset::parse(&[0x00, 0x00, 0x00]);
    assert!(matches!(result, Err(SmpteError::Length(3))));

    let result = SmpteOffset::parse(&[0x00; 6]);
    assert!(matches!(result, Err(SmpteError::Length(6))));

    let result = SmpteOffset::parse(&[]);
    assert!(matches!(result, Err(SmpteError::Length(0))));
}

#[test]
fn test_smpte_offset_invalid_frame_type() {
    for fps_bits in [0b100, 0b101, 0b111] {
        let data = create_smpte_bytes(fps_bits, 12, 30, 15, 10, 50);
        let result = SmpteOffset::parse(&data);
        assert!(matches!(result, Err(SmpteError::TrackFrame(bits)) if bits == fps_bits));
    }
}

#[test]
fn test_smpte_offset_invalid_hour() {
    let result = SmpteOffset::parse(&[0x18, 0x00, 0x00, 0x00, 0x00]);
    assert!(matches!(result, Err(SmpteError::HourOffset(24))));

    let result = SmpteOffset::parse(&[0x1F, 0x00, 0x00, 0x00, 0x00]);
    assert!(matches!(result, Err(SmpteError::HourOffset(31))));
}

#[test]
fn test_smpte_offset_invalid_minute_and_second() {
    for invalid in [60, 61, 99, 255] {
        let result = SmpteOffset::parse(&create_smpte_bytes(0, 12, invalid, 30, 15, 50));
        assert!(matches!(result, Err(SmpteError::MinuteOffset(m)) if m == invalid));

        let result = SmpteOffset::parse(&create_smpte_bytes(1, 12, 30, invalid, 15, 50));
        assert!(matches!(result, Err(SmpteError::SecondOffset(s)) if s == invalid));
    }
}

#[test]
fn test_smpte_offset_invalid_subframe() {
    for invalid in [100, 150, 255] {
        let result = SmpteOffset::parse(&create_smpte_bytes(2, 12, 30, 45, 15, invalid));
        assert!(matches!(result, Err(SmpteError::Subframe(s)) if s == invalid));
    }
}

#[test]
fn test_smpte_offset_combined_errors() {
    // hour is checked before minute
    let result = SmpteOffset::parse(&create_smpte_bytes(0, 25, 61, 30, 15, 50));
    assert!(matches!(result, Err(SmpteError::HourOffset(25))));

    let result = SmpteOffset::parse(&create_smpte_bytes(1, 23, 60, 60, 15, 50));
    assert!(matches!(result, Err(SmpteError::MinuteOffset(60))));
}

#[test]
fn test_smpte_offset_boundary_values() {
    let test_cases = [
        (0, 0, 0, 0, 0, 0),
        (0, 23, 59, 59, 23, 99),
        (1, 23, 59, 59, 24, 99),
        (2, 23, 59, 59, 29, 99),
        (3, 23, 59, 59, 29, 99),
    ];

    for (fps_bits, hour, minute, second, frame, subframe) in test_cases {
        let data = create_smpte_bytes(fps_bits, hour, minute, second, frame, subframe);
        let offset = SmpteOffset::parse(&data).unwrap();
        assert_eq!(offset.hour, hour);
        assert_eq!(offset.minute, minute);
        assert_eq!(offset.second, second);
        assert_eq!(offset.frame, frame);
        assert_eq!(offset.subframe, subframe);
        assert_eq!(offset.to_bytes().as_slice(), data.as_slice());
    }
}

#[test]
fn test_smpte_drop_frame_precision() {
    let offset = SmpteOffset::parse(&create_smpte_bytes(2, 0, 0, 0, 1, 0)).unwrap();
    // one frame at 30000/1001 fps
    let exact_frame_duration = 1_001_000.0 / 30.0;
    assert!((offset.as_micros() - exact_frame_duration).abs() < 0.001);
}

#[test]
fn test_invalid_offset_in_file_reports_its_position() {
    let bytes = file_with_offset_payload(&create_smpte_bytes(0, 24, 0, 0, 0, 0));
    let err = MidiFile::parse(&bytes).unwrap_err();
    // header (14) and track chunk header (8), then the delta time
    assert_eq!(err.position(), 23);
    assert_eq!(
        err.parse_error_kind(),
        Some(&ParseError::Smpte(SmpteError::HourOffset(24)))
    );
}

#[test]
fn test_short_offset_in_file_is_a_length_error() {
    let bytes = file_with_offset_payload(&[0x00, 0x00, 0x00]);
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(
        err.parse_error_kind(),
        Some(&ParseError::Meta(MetaError::Length {
            kind: MetaKind::SmpteOffset,
            expected: 5,
            found: 3
        }))
    );
}
