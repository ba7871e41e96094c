/// The default tempo when a file sets none: 120 beats per minute
pub const DEFAULT_MICROS_PER_QUARTER_NOTE: u32 = 500_000;

const MICROS_PER_MINUTE: u32 = 60_000_000;

/// A tempo, in microseconds per quarter note.
///
/// Written as a 24-bit big-endian value in a `FF 51 03` meta event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tempo(u32);

impl Default for Tempo {
    fn default() -> Self {
        Self(DEFAULT_MICROS_PER_QUARTER_NOTE)
    }
}

impl Tempo {
    /// The largest tempo the 24-bit field can hold
    pub const MAX_MICROS: u32 = 0x00FF_FFFF;

    /// Create a tempo from microseconds per quarter note.
    ///
    /// Values are not checked here; the writer rejects anything above
    /// [`Tempo::MAX_MICROS`].
    pub const fn new(micros_per_quarter_note: u32) -> Self {
        Self(micros_per_quarter_note)
    }

    /// Create a tempo from beats per minute. `None` for zero.
    pub const fn from_bpm(bpm: u32) -> Option<Self> {
        if bpm == 0 {
            return None;
        }
        Some(Self(MICROS_PER_MINUTE / bpm))
    }

    /// Read the three byte payload
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self(u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]))
    }

    /// The three byte payload
    pub const fn to_bytes(&self) -> [u8; 3] {
        let [_, a, b, c] = self.0.to_be_bytes();
        [a, b, c]
    }

    /// Microseconds per quarter note
    pub const fn micros_per_quarter_note(&self) -> u32 {
        self.0
    }

    /// Whole beats per minute, `60_000_000 / micros`. Zero for a zero tempo.
    pub const fn beats_per_minute(&self) -> u32 {
        if self.0 == 0 {
            return 0;
        }
        MICROS_PER_MINUTE / self.0
    }

    /// Beats per minute without rounding
    pub fn beats_per_minute_f64(&self) -> f64 {
        MICROS_PER_MINUTE as f64 / self.0 as f64
    }

    /// How long one tick lasts at this tempo
    pub fn micros_per_tick(&self, ticks_per_quarter_note: u16) -> f64 {
        self.0 as f64 / ticks_per_quarter_note as f64
    }
}

#[test]
fn tempo_converts_to_bpm() {
    use pretty_assertions::assert_eq;
    let tempo = Tempo::from_bytes([0x07, 0xA1, 0x20]);
    assert_eq!(tempo.micros_per_quarter_note(), 500_000);
    assert_eq!(tempo.beats_per_minute(), 120);
    assert_eq!(tempo.to_bytes(), [0x07, 0xA1, 0x20]);
    assert_eq!(Tempo::from_bpm(60), Some(Tempo::new(1_000_000)));
    assert_eq!(Tempo::new(0).beats_per_minute(), 0);
}
