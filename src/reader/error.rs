use crate::ParseError;
use thiserror::Error;

#[doc = r#"
A failed decode, with the byte offset of the problem.

Offsets count from the start of the whole input, also for errors found
inside a track chunk.
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("at byte {position}: {kind}")]
pub struct ReaderError {
    position: usize,
    kind: ReaderErrorKind,
}

/// Why a decode failed
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReaderErrorKind {
    /// The bytes are there but do not form a valid file
    #[error("{0}")]
    ParseError(#[from] ParseError),
    /// The input ended before a value was complete
    #[error("unexpected end of input")]
    OutOfBounds,
}

impl ReaderError {
    /// A malformed value at `position`
    pub const fn parse_error(position: usize, error: ParseError) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::ParseError(error),
        }
    }

    /// The input ran out at `position`
    pub const fn oob(position: usize) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::OutOfBounds,
        }
    }

    /// Offset of the offending byte
    pub const fn position(&self) -> usize {
        self.position
    }

    /// True if the input was truncated
    pub const fn is_out_of_bounds(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::OutOfBounds)
    }

    /// What went wrong
    pub const fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }

    /// The format error, or `None` for truncated input
    pub const fn parse_error_kind(&self) -> Option<&ParseError> {
        match &self.kind {
            ReaderErrorKind::ParseError(e) => Some(e),
            ReaderErrorKind::OutOfBounds => None,
        }
    }
}

/// Result of a decode step, see [`ReaderError`]
pub type ReadResult<T> = Result<T, ReaderError>;

#[test]
fn display_names_the_offset() {
    use pretty_assertions::assert_eq;
    let err = ReaderError::parse_error(22, ParseError::VarLenTooLong);
    assert_eq!(
        alloc::format!("{err}"),
        "at byte 22: Variable length quantity is longer than 4 bytes"
    );
    assert_eq!(
        alloc::format!("{}", ReaderError::oob(3)),
        "at byte 3: unexpected end of input"
    );
}
