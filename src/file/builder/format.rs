use crate::{HeaderError, file::FormatType};

#[doc = r#"
The format field of a header together with its declared track count.

A format 0 file holds exactly one track, so its count is implied.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RawFormat {
    /// Format 0
    SingleMultiChannel,
    /// Format 1
    Simultaneous(u16),
    /// Format 2
    SequentiallyIndependent(u16),
}

impl RawFormat {
    /// Create a [`RawFormat::SingleMultiChannel`]
    pub const fn single_multichannel() -> Self {
        Self::SingleMultiChannel
    }

    /// Pairs a format type with a track count.
    ///
    /// # Errors
    /// [`HeaderError::SingleTrackCount`] if a format 0 file declares anything but one track.
    pub const fn new(format: FormatType, num_tracks: u16) -> Result<Self, HeaderError> {
        Ok(match format {
            FormatType::SingleMultiChannel => {
                if num_tracks != 1 {
                    return Err(HeaderError::SingleTrackCount(num_tracks));
                }
                Self::SingleMultiChannel
            }
            FormatType::Simultaneous => Self::Simultaneous(num_tracks),
            FormatType::SequentiallyIndependent => Self::SequentiallyIndependent(num_tracks),
        })
    }

    /// Returns the number of tracks identified by the format.
    ///
    /// [`RawFormat::SingleMultiChannel`] will always return 1.
    pub const fn num_tracks(&self) -> u16 {
        use RawFormat::*;
        match self {
            SingleMultiChannel => 1,
            Simultaneous(num) | SequentiallyIndependent(num) => *num,
        }
    }

    /// Returns the format type of the format.
    pub const fn format_type(&self) -> FormatType {
        use RawFormat::*;
        match self {
            SingleMultiChannel => FormatType::SingleMultiChannel,
            Simultaneous(_) => FormatType::Simultaneous,
            SequentiallyIndependent(_) => FormatType::SequentiallyIndependent,
        }
    }
}
