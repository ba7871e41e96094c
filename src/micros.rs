use core::{fmt, ops::Add};

/// A point in time in whole microseconds, measured from the start of a track.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UMicros(u64);

impl UMicros {
    /// The start of the track
    pub const ZERO: Self = Self(0);

    /// Wraps a count of microseconds
    #[inline]
    pub const fn new(microseconds: u64) -> Self {
        Self(microseconds)
    }

    /// The length of `ticks` at a fixed tempo, rounded down.
    ///
    /// Computed in 128 bits, so no intermediate product overflows.
    pub const fn from_ticks(ticks: u64, micros_per_quarter_note: u32, ticks_per_quarter_note: u16) -> Self {
        if ticks_per_quarter_note == 0 {
            return Self::ZERO;
        }
        let micros =
            ticks as u128 * micros_per_quarter_note as u128 / ticks_per_quarter_note as u128;
        if micros > u64::MAX as u128 {
            Self(u64::MAX)
        } else {
            Self(micros as u64)
        }
    }

    /// The raw microsecond count
    #[inline]
    pub const fn us(&self) -> u64 {
        self.0
    }

    /// Seconds, for display
    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1_000_000.
    }
}

impl Add for UMicros {
    type Output = UMicros;
    fn add(self, rhs: Self) -> Self::Output {
        UMicros(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Display for UMicros {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}µs", self.0)
    }
}

#[test]
fn ticks_to_micros() {
    use pretty_assertions::assert_eq;
    assert_eq!(UMicros::from_ticks(480, 500_000, 480), UMicros::new(500_000));
    assert_eq!(UMicros::from_ticks(1, 500_000, 3), UMicros::new(166_666));
    // a full 28 bit delta at the slowest tempo
    assert_eq!(
        UMicros::from_ticks(0x0FFF_FFFF, 0x00FF_FFFF, 1).us(),
        0x0FFF_FFFF * 0x00FF_FFFF
    );
    assert_eq!(UMicros::from_ticks(10, 500_000, 0), UMicros::ZERO);
}

#[test]
fn display_and_seconds() {
    use pretty_assertions::assert_eq;
    let t = UMicros::new(2_500_000);
    assert_eq!(alloc::format!("{t}"), "2500000µs");
    assert_eq!(t.as_secs_f64(), 2.5);
    assert_eq!((t + UMicros::new(1)).us(), 2_500_001);
}
