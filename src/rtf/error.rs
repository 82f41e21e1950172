//! Error types for RTF parsing.
//!
//! Every error aborts the current parse. Variants are grouped into coarse
//! categories through [`ErrorKind`] so callers can react to a class of
//! failure without matching every variant.

use thiserror::Error;

/// Result type for RTF operations.
pub type RtfResult<T> = Result<T, RtfError>;

/// Broad category of an [`RtfError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Brace nesting or tree shape violations
    Structure,
    /// Malformed `\'hh` escape
    HexEncoding,
    /// Malformed `\uN` escape or skip count
    UnicodeEncoding,
    /// Byte sequence that does not decode under the active code page
    MultiByteEncoding,
    /// Failure of the underlying byte source
    Io,
}

/// RTF parsing errors.
#[derive(Error, Debug)]
pub enum RtfError {
    /// A closing brace without a matching opening brace
    #[error("Invalid RTF structure: too many closing braces")]
    TooManyBraces,

    /// End of input with groups still open
    #[error("Invalid RTF structure: too few closing braces ({open} group(s) still open)")]
    TooFewBraces { open: usize },

    /// The input never opened a group
    #[error("Invalid RTF structure: empty document")]
    EmptyDocument,

    /// A control word outside of any group
    #[error("Invalid RTF structure: tag '{0}' found outside of any group")]
    TagOnRootLevel(String),

    /// Literal text outside of any group
    #[error("Invalid RTF structure: text '{0}' found outside of any group")]
    TextOnRootLevel(String),

    /// The structure builder received an element while no group was open
    #[error("Invalid RTF structure: no open group for new element")]
    MissingGroupForNewTag,

    /// A second group closed at nesting level zero
    #[error("Invalid RTF structure: multiple root-level groups")]
    MultipleRootGroups,

    /// The structure builder saw the parse end with groups still open
    #[error("Invalid RTF structure: {0} unclosed group(s) at end of parse")]
    UnclosedGroups(usize),

    /// The structure builder was asked for a result it does not have
    #[error("Invalid RTF structure: no root group available")]
    NoRootGroup,

    /// First digit of a `\'hh` escape is not hexadecimal
    #[error("Invalid hex escape: first digit '{0}' is not hexadecimal")]
    InvalidFirstHexDigit(char),

    /// Second digit of a `\'hh` escape is not hexadecimal
    #[error("Invalid hex escape: second digit '{0}' is not hexadecimal")]
    InvalidSecondHexDigit(char),

    /// Input ended inside a `\'hh` escape
    #[error("Invalid hex escape: unexpected end of input")]
    UnexpectedEofInHex,

    /// Input ended right after a backslash
    #[error("Invalid control word: unexpected end of input after backslash")]
    UnexpectedEofInTag,

    /// `\ucN` outside of the legal range
    #[error("Invalid unicode skip count: {0} (expected 0..=10)")]
    InvalidUnicodeSkipCount(i32),

    /// Input ended while skipping the alternative representation of `\uN`
    #[error("Invalid unicode escape: unexpected end of input while skipping fallback text")]
    UnexpectedEofInUnicodeSkip,

    /// Bytes that do not decode under the active code page
    #[error("Invalid multi-byte sequence {bytes:02X?} for code page {code_page}")]
    InvalidMultiByteSequence { code_page: u32, bytes: Vec<u8> },

    /// A multi-byte character was interrupted by a tag, brace or end of input
    #[error("Incomplete multi-byte sequence for code page {code_page}")]
    IncompleteMultiByteSequence { code_page: u32 },

    /// IO error of a byte source
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RtfError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RtfError::TooManyBraces
            | RtfError::TooFewBraces { .. }
            | RtfError::EmptyDocument
            | RtfError::TagOnRootLevel(_)
            | RtfError::TextOnRootLevel(_)
            | RtfError::MissingGroupForNewTag
            | RtfError::MultipleRootGroups
            | RtfError::UnclosedGroups(_)
            | RtfError::NoRootGroup
            | RtfError::UnexpectedEofInTag => ErrorKind::Structure,
            RtfError::InvalidFirstHexDigit(_)
            | RtfError::InvalidSecondHexDigit(_)
            | RtfError::UnexpectedEofInHex => ErrorKind::HexEncoding,
            RtfError::InvalidUnicodeSkipCount(_) | RtfError::UnexpectedEofInUnicodeSkip => {
                ErrorKind::UnicodeEncoding
            },
            RtfError::InvalidMultiByteSequence { .. }
            | RtfError::IncompleteMultiByteSequence { .. } => ErrorKind::MultiByteEncoding,
            RtfError::Io(_) => ErrorKind::Io,
        }
    }

    /// Whether this is a structural error.
    #[inline]
    pub fn is_structural(&self) -> bool {
        self.kind() == ErrorKind::Structure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(RtfError::TooManyBraces.kind(), ErrorKind::Structure);
        assert_eq!(RtfError::TooFewBraces { open: 1 }.kind(), ErrorKind::Structure);
        assert_eq!(RtfError::InvalidFirstHexDigit('x').kind(), ErrorKind::HexEncoding);
        assert_eq!(RtfError::InvalidUnicodeSkipCount(11).kind(), ErrorKind::UnicodeEncoding);
        assert_eq!(
            RtfError::IncompleteMultiByteSequence { code_page: 932 }.kind(),
            ErrorKind::MultiByteEncoding
        );
        assert!(RtfError::EmptyDocument.is_structural());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            RtfError::InvalidUnicodeSkipCount(42).to_string(),
            "Invalid unicode skip count: 42 (expected 0..=10)"
        );
        assert_eq!(
            RtfError::TooManyBraces.to_string(),
            "Invalid RTF structure: too many closing braces"
        );
        let err = RtfError::InvalidMultiByteSequence {
            code_page: 932,
            bytes: vec![0x82, 0x20],
        };
        assert_eq!(
            err.to_string(),
            "Invalid multi-byte sequence [82, 20] for code page 932"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read");
        let err: RtfError = io.into();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
