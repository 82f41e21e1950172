//! Character sources for the parser.
//!
//! The parser reads one character at a time with a single character of
//! lookahead. Byte streams surface every byte as the character with the same
//! value, so the parser's code page decoder sees the original bytes.

use super::error::RtfResult;
use std::io::{BufReader, Bytes, Read};
use std::str::Chars;

/// A readable stream of RTF characters with one character of lookahead.
pub trait RtfSource {
    /// Next character without consuming it; `None` at end of input.
    fn peek_char(&mut self) -> RtfResult<Option<char>>;

    /// Consume and return the next character; `None` at end of input.
    fn next_char(&mut self) -> RtfResult<Option<char>>;
}

impl<S: RtfSource + ?Sized> RtfSource for &mut S {
    #[inline]
    fn peek_char(&mut self) -> RtfResult<Option<char>> {
        (**self).peek_char()
    }

    #[inline]
    fn next_char(&mut self) -> RtfResult<Option<char>> {
        (**self).next_char()
    }
}

/// Source over an in-memory string.
#[derive(Debug, Clone)]
pub struct StrSource<'a> {
    chars: std::iter::Peekable<Chars<'a>>,
}

impl<'a> StrSource<'a> {
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }
}

impl<'a> From<&'a str> for StrSource<'a> {
    fn from(input: &'a str) -> Self {
        Self::new(input)
    }
}

impl RtfSource for StrSource<'_> {
    #[inline]
    fn peek_char(&mut self) -> RtfResult<Option<char>> {
        Ok(self.chars.peek().copied())
    }

    #[inline]
    fn next_char(&mut self) -> RtfResult<Option<char>> {
        Ok(self.chars.next())
    }
}

/// Source over a byte stream.
///
/// The stream is buffered internally. Closing it is up to the caller, who
/// keeps ownership of the reader's underlying resource.
pub struct ByteSource<R: Read> {
    bytes: Bytes<BufReader<R>>,
    peeked: Option<Option<u8>>,
}

impl<R: Read> ByteSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            bytes: BufReader::new(reader).bytes(),
            peeked: None,
        }
    }

    fn read_byte(&mut self) -> RtfResult<Option<u8>> {
        match self.bytes.next() {
            Some(byte) => Ok(Some(byte?)),
            None => Ok(None),
        }
    }
}

impl<R: Read> RtfSource for ByteSource<R> {
    fn peek_char(&mut self) -> RtfResult<Option<char>> {
        if self.peeked.is_none() {
            let byte = self.read_byte()?;
            self.peeked = Some(byte);
        }
        Ok(self.peeked.flatten().map(char::from))
    }

    fn next_char(&mut self) -> RtfResult<Option<char>> {
        let byte = match self.peeked.take() {
            Some(byte) => byte,
            None => self.read_byte()?,
        };
        Ok(byte.map(char::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtf::error::{ErrorKind, RtfError};

    #[test]
    fn test_str_source() {
        let mut source = StrSource::new("ab");
        assert_eq!(source.peek_char().unwrap(), Some('a'));
        assert_eq!(source.peek_char().unwrap(), Some('a'));
        assert_eq!(source.next_char().unwrap(), Some('a'));
        assert_eq!(source.next_char().unwrap(), Some('b'));
        assert_eq!(source.peek_char().unwrap(), None);
        assert_eq!(source.next_char().unwrap(), None);
    }

    #[test]
    fn test_byte_source_keeps_byte_values() {
        let mut source = ByteSource::new(&[b'{', 0xE9, 0x80][..]);
        assert_eq!(source.next_char().unwrap(), Some('{'));
        assert_eq!(source.peek_char().unwrap(), Some('\u{E9}'));
        assert_eq!(source.next_char().unwrap(), Some('\u{E9}'));
        assert_eq!(source.next_char().unwrap(), Some('\u{80}'));
        assert_eq!(source.next_char().unwrap(), None);
        assert_eq!(source.peek_char().unwrap(), None);
    }

    #[test]
    fn test_byte_source_io_error() {
        struct Failing;
        impl Read for Failing {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("broken pipe"))
            }
        }

        let mut source = ByteSource::new(Failing);
        let err: RtfError = source.next_char().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
