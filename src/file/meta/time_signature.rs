#[doc = r#"
A time signature, `FF 58 04 nn dd cc bb`.

The denominator is stored as a power of two, so 6/8 is written `06 03`.
`cc` is the number of MIDI clocks per metronome click and `bb` the number of
notated 32nd notes in a MIDI quarter note (24 clocks).
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    numerator: u8,
    denominator_log2: u8,
    clocks_per_click: u8,
    thirty_seconds_per_quarter: u8,
}

impl Default for TimeSignature {
    /// 4/4, a click every 32 clocks, 8 32nds per quarter note
    fn default() -> Self {
        Self::new(4, 2, 32, 8)
    }
}

impl TimeSignature {
    /// Create a time signature. `denominator_log2` is 2 for quarter notes.
    pub const fn new(
        numerator: u8,
        denominator_log2: u8,
        clocks_per_click: u8,
        thirty_seconds_per_quarter: u8,
    ) -> Self {
        Self {
            numerator,
            denominator_log2,
            clocks_per_click,
            thirty_seconds_per_quarter,
        }
    }

    pub(crate) const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    pub(crate) const fn to_bytes(&self) -> [u8; 4] {
        [
            self.numerator,
            self.denominator_log2,
            self.clocks_per_click,
            self.thirty_seconds_per_quarter,
        ]
    }

    /// Beats per bar
    pub const fn numerator(&self) -> u8 {
        self.numerator
    }

    /// The note value of a beat. `None` if the stored power does not fit in a u32.
    pub const fn denominator(&self) -> Option<u32> {
        1u32.checked_shl(self.denominator_log2 as u32)
    }

    /// The denominator as stored
    pub const fn denominator_log2(&self) -> u8 {
        self.denominator_log2
    }

    /// MIDI clocks per metronome click
    pub const fn clocks_per_click(&self) -> u8 {
        self.clocks_per_click
    }

    /// Notated 32nd notes per MIDI quarter note
    pub const fn thirty_seconds_per_quarter(&self) -> u8 {
        self.thirty_seconds_per_quarter
    }
}

#[test]
fn six_eight() {
    use pretty_assertions::assert_eq;
    let sig = TimeSignature::from_bytes([0x06, 0x03, 0x24, 0x08]);
    assert_eq!(sig.numerator(), 6);
    assert_eq!(sig.denominator(), Some(8));
    assert_eq!(sig.clocks_per_click(), 36);
    assert_eq!(TimeSignature::new(1, 40, 0, 0).denominator(), None);
}
