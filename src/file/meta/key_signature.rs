/// A key signature, `FF 59 02 sf mi`.
///
/// `sf` counts sharps (positive) or flats (negative), and `mi` is 1 for a minor key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeySignature {
    sharps_flats: i8,
    minor: bool,
}

impl KeySignature {
    /// Create a new key signature
    pub const fn new(sharps_flats: i8, minor: bool) -> Self {
        Self {
            sharps_flats,
            minor,
        }
    }

    pub(crate) const fn from_bytes(bytes: [u8; 2]) -> Self {
        Self::new(bytes[0] as i8, bytes[1] != 0)
    }

    pub(crate) const fn to_bytes(&self) -> [u8; 2] {
        [self.sharps_flats as u8, self.minor as u8]
    }

    /// Sharps if positive, flats if negative
    pub const fn sharps_flats(&self) -> i8 {
        self.sharps_flats
    }

    /// True for a minor key
    pub const fn is_minor(&self) -> bool {
        self.minor
    }
}

#[test]
fn flats_are_negative() {
    use pretty_assertions::assert_eq;
    let sig = KeySignature::from_bytes([0xFD, 0x01]);
    assert_eq!(sig.sharps_flats(), -3);
    assert!(sig.is_minor());
    assert_eq!(sig.to_bytes(), [0xFD, 0x01]);
}
