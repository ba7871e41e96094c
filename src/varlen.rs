#![doc = r#"
Variable length quantities

Delta times and the lengths of meta and system exclusive payloads are written as
big-endian groups of seven bits. Every byte but the last has its leading bit set.

```text
0x00000000 -> 00
0x0000007F -> 7F
0x00000080 -> 81 00
0x00003FFF -> FF 7F
0x0FFFFFFF -> FF FF FF 7F
```
"#]

use crate::{ParseError, writer::WriteError};

/// The largest value a four byte quantity can hold.
pub const MAX_VARLEN: u32 = 0x0FFF_FFFF;

/// A value encoded as a variable length quantity, one to four bytes long.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct VarLen {
    bytes: [u8; 4],
    len: u8,
}

impl VarLen {
    /// Encodes `value` using as few bytes as possible.
    ///
    /// # Errors
    /// [`WriteError::VarLenOverflow`] if `value` is above [`MAX_VARLEN`].
    pub const fn encode(value: u32) -> Result<Self, WriteError> {
        if value > MAX_VARLEN {
            return Err(WriteError::VarLenOverflow(value));
        }
        let mut bytes = [0; 4];
        bytes[3] = (value & 0x7F) as u8;
        let mut len = 1;
        let mut rest = value >> 7;
        while rest > 0 {
            len += 1;
            bytes[4 - len] = 0x80 | (rest & 0x7F) as u8;
            rest >>= 7;
        }
        Ok(Self {
            bytes,
            len: len as u8,
        })
    }

    /// Encodes a payload length.
    ///
    /// # Errors
    /// [`WriteError::PayloadTooLarge`] if `len` is above [`MAX_VARLEN`].
    pub fn encode_len(len: usize) -> Result<Self, WriteError> {
        match u32::try_from(len) {
            Ok(value) if value <= MAX_VARLEN => Self::encode(value),
            _ => Err(WriteError::PayloadTooLarge(len)),
        }
    }

    /// The encoded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[4 - self.len as usize..]
    }

    /// Number of encoded bytes, 1 through 4
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Decodes a quantity from the front of `bytes`.
    ///
    /// Returns the value and how many bytes it took. Non-minimal encodings
    /// (leading `0x80` bytes) are accepted.
    pub const fn decode(bytes: &[u8]) -> Result<(u32, usize), ParseError> {
        let mut value: u32 = 0;
        let mut i = 0;
        loop {
            if i == 4 {
                return Err(ParseError::VarLenTooLong);
            }
            if i == bytes.len() {
                return Err(ParseError::VarLenTruncated);
            }
            let byte = bytes[i];
            value = (value << 7) | (byte & 0x7F) as u32;
            i += 1;
            if byte & 0x80 == 0 {
                return Ok((value, i));
            }
        }
    }
}

#[test]
fn encodes_minimally() {
    use pretty_assertions::assert_eq;
    let cases: [(u32, &[u8]); 8] = [
        (0x00, &[0x00]),
        (0x40, &[0x40]),
        (0x7F, &[0x7F]),
        (0x80, &[0x81, 0x00]),
        (0x2000, &[0xC0, 0x00]),
        (0x3FFF, &[0xFF, 0x7F]),
        (0x0010_0000, &[0xC0, 0x80, 0x00]),
        (MAX_VARLEN, &[0xFF, 0xFF, 0xFF, 0x7F]),
    ];
    for (value, bytes) in cases {
        let encoded = VarLen::encode(value).unwrap();
        assert_eq!(encoded.as_bytes(), bytes);
        assert_eq!(VarLen::decode(bytes), Ok((value, bytes.len())));
    }
}

#[test]
fn rejects_values_past_28_bits() {
    use pretty_assertions::assert_eq;
    assert_eq!(
        VarLen::encode(MAX_VARLEN + 1),
        Err(WriteError::VarLenOverflow(0x1000_0000))
    );
}

#[test]
fn accepts_non_minimal_encodings() {
    use pretty_assertions::assert_eq;
    assert_eq!(VarLen::decode(&[0x80, 0x80, 0x00]), Ok((0, 3)));
    assert_eq!(VarLen::decode(&[0x80, 0x81, 0x00, 0xAA]), Ok((0x80, 3)));
}

#[test]
fn rejects_malformed_quantities() {
    use pretty_assertions::assert_eq;
    assert_eq!(
        VarLen::decode(&[0x81, 0x82, 0x83, 0x84, 0x05]),
        Err(ParseError::VarLenTooLong)
    );
    assert_eq!(VarLen::decode(&[0x81, 0x82]), Err(ParseError::VarLenTruncated));
    assert_eq!(VarLen::decode(&[]), Err(ParseError::VarLenTruncated));
}

#[test]
fn round_trips_at_group_boundaries() {
    use pretty_assertions::assert_eq;
    for shift in 0..28 {
        for value in [(1u32 << shift) - 1, 1 << shift, (1 << shift) + 1] {
            if value > MAX_VARLEN {
                continue;
            }
            let encoded = VarLen::encode(value).unwrap();
            assert_eq!(
                VarLen::decode(encoded.as_bytes()),
                Ok((value, encoded.len()))
            );
        }
    }
}
