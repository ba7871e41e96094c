use crate::ParseError;

#[doc = r#"
A byte with its leading bit clear, holding a value between 0 and 127.

Keys, velocities, controller numbers and every other payload byte of a
channel voice message are data bytes. A byte with the leading bit set is a
status byte, which is what lets running status work at all.
"#]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataByte(pub(crate) u8);

impl DataByte {
    /// The largest data byte, 127.
    pub const MAX: Self = Self(0x7F);

    /// Checks for correctness (leading 0 bit).
    pub const fn new(byte: u8) -> Result<Self, ParseError> {
        if byte & 0x80 != 0 {
            return Err(ParseError::DataByte(byte));
        }
        Ok(Self(byte))
    }

    /// Masks off the leading bit.
    pub const fn new_unchecked(byte: u8) -> Self {
        Self(byte & 0x7F)
    }

    /// Returns the byte
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for DataByte {
    type Error = ParseError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DataByte> for u8 {
    fn from(value: DataByte) -> Self {
        value.0
    }
}

#[test]
fn rejects_status_bytes() {
    use pretty_assertions::assert_eq;
    assert_eq!(DataByte::new(0x7F), Ok(DataByte::MAX));
    assert_eq!(DataByte::new(0x80), Err(ParseError::DataByte(0x80)));
    assert_eq!(DataByte::new_unchecked(0xBC).value(), 0x3C);
}
