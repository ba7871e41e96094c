use crate::{
    DataByte,
    message::channel::{Channel, VoiceEvent, VoiceKind},
    reader::{ReadResult, Reader},
};

/// A channel voice message: an event addressed to one of the sixteen channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelVoiceMessage {
    pub(crate) channel: Channel,
    pub(crate) event: VoiceEvent,
}

impl ChannelVoiceMessage {
    /// Create a new channel voice event.
    pub const fn new(channel: Channel, event: VoiceEvent) -> Self {
        Self { channel, event }
    }

    /// Shorthand for a note-on message
    pub const fn note_on(channel: Channel, key: DataByte, velocity: DataByte) -> Self {
        Self::new(channel, VoiceEvent::NoteOn { key, velocity })
    }

    /// Shorthand for a note-off message
    pub const fn note_off(channel: Channel, key: DataByte, velocity: DataByte) -> Self {
        Self::new(channel, VoiceEvent::NoteOff { key, velocity })
    }

    /// The channel this message is addressed to
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// The voice event
    pub const fn event(&self) -> &VoiceEvent {
        &self.event
    }

    /// The status byte, combining the event kind and the channel
    pub fn status(&self) -> u8 {
        (u8::from(self.event.kind()) << 4) | self.channel.index()
    }

    /// Reads the data bytes for an already known status byte.
    pub(crate) fn read(status: u8, kind: VoiceKind, reader: &mut Reader<'_>) -> ReadResult<Self> {
        let event = VoiceEvent::read(kind, reader)?;
        Ok(Self::new(Channel::from_status(status), event))
    }
}

#[test]
fn status_combines_kind_and_channel() {
    use pretty_assertions::assert_eq;
    let msg = ChannelVoiceMessage::note_on(Channel::Ten, DataByte(36), DataByte(100));
    assert_eq!(msg.status(), 0x99);

    let msg = ChannelVoiceMessage::new(
        Channel::One,
        VoiceEvent::ProgramChange {
            program: DataByte(5),
        },
    );
    assert_eq!(msg.status(), 0xC0);
}
