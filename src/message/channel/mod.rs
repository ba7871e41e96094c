#![doc = r#"
Channel voice messages and the channel they address.

A channel voice message is a status byte whose high nibble names the kind
of message and whose low nibble names the channel, followed by one or two
data bytes.
"#]

mod voice;
pub use voice::*;

mod voice_event;
pub use voice_event::*;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// One of the sixteen MIDI channels.
///
/// `Channel::One` is written as `0` in the low nibble of a status byte.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TryFromPrimitive, IntoPrimitive,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Channel {
    One = 0,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Eleven,
    Twelve,
    Thirteen,
    Fourteen,
    Fifteen,
    Sixteen,
}

impl Channel {
    /// Reads the channel out of the low nibble of a status byte.
    pub const fn from_status(status: u8) -> Self {
        use Channel::*;
        match status & 0x0F {
            0 => One,
            1 => Two,
            2 => Three,
            3 => Four,
            4 => Five,
            5 => Six,
            6 => Seven,
            7 => Eight,
            8 => Nine,
            9 => Ten,
            10 => Eleven,
            11 => Twelve,
            12 => Thirteen,
            13 => Fourteen,
            14 => Fifteen,
            _ => Sixteen,
        }
    }

    /// The zero-based channel number
    pub const fn index(&self) -> u8 {
        *self as u8
    }
}

#[test]
fn channel_numbers() {
    use pretty_assertions::assert_eq;
    assert_eq!(Channel::from_status(0x93), Channel::Four);
    assert_eq!(Channel::from_status(0x8F).index(), 15);
    assert_eq!(Channel::try_from(9u8), Ok(Channel::Ten));
    assert!(Channel::try_from(16u8).is_err());
}
