#![doc = r#"
System exclusive events as they appear inside a track chunk.

```text
F0 <len> <bytes to be transmitted after F0>
F7 <len> <bytes to be transmitted as is>
```

The `F7` form is used both to continue a system exclusive message split
across several events and to smuggle arbitrary bytes (such as realtime
messages) into a track.
"#]

use alloc::borrow::Cow;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Which lead byte introduced the event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum SysExKind {
    /// `F0`, a complete message or its first packet
    Begin = 0xF0,
    /// `F7`, a continuation packet or an escape sequence
    Escape = 0xF7,
}

/// A system exclusive event and its payload
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemExclusiveMessage<'a> {
    kind: SysExKind,
    data: Cow<'a, [u8]>,
}

impl<'a> SystemExclusiveMessage<'a> {
    /// Create a new message. `data` is everything after the length field.
    pub fn new(kind: SysExKind, data: impl Into<Cow<'a, [u8]>>) -> Self {
        Self {
            kind,
            data: data.into(),
        }
    }

    /// The lead byte kind
    pub const fn kind(&self) -> SysExKind {
        self.kind
    }

    /// The payload, as written after the length field
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Detaches the message from the input buffer
    pub fn into_owned(self) -> SystemExclusiveMessage<'static> {
        SystemExclusiveMessage {
            kind: self.kind,
            data: Cow::Owned(self.data.into_owned()),
        }
    }
}
