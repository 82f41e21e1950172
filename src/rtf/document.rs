//! Parsed RTF documents and convenience entry points.

use super::element::Group;
use super::error::RtfResult;
use super::parser::{ParserOptions, parse_to_tree};
use super::source::{ByteSource, StrSource};
use super::writer::{WriterOptions, to_rtf_string};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A parsed RTF document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtfDocument {
    root: Group,
}

impl RtfDocument {
    /// Parse an RTF document from a string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rtf_tree::rtf::RtfDocument;
    ///
    /// let doc = RtfDocument::parse(r"{\rtf1\ansi{\fonttbl{\f0 Helvetica;}}\f0 Hello World!\par}")?;
    /// assert_eq!(doc.root().destination(), Some("rtf"));
    /// # Ok::<(), rtf_tree::rtf::RtfError>(())
    /// ```
    pub fn parse(input: &str) -> RtfResult<Self> {
        Self::parse_with_options(input, ParserOptions::default())
    }

    pub fn parse_with_options(input: &str, options: ParserOptions) -> RtfResult<Self> {
        parse_to_tree(StrSource::new(input), options).map(Self::from)
    }

    /// Parse an RTF document from raw bytes.
    ///
    /// Bytes outside ASCII are decoded through the code page in effect where
    /// they appear.
    pub fn from_bytes(bytes: &[u8]) -> RtfResult<Self> {
        Self::from_reader(bytes)
    }

    /// Parse an RTF document from a byte stream.
    pub fn from_reader<R: Read>(reader: R) -> RtfResult<Self> {
        Self::from_reader_with_options(reader, ParserOptions::default())
    }

    pub fn from_reader_with_options<R: Read>(reader: R, options: ParserOptions) -> RtfResult<Self> {
        parse_to_tree(ByteSource::new(reader), options).map(Self::from)
    }

    /// Open and parse an RTF file.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use rtf_tree::rtf::RtfDocument;
    ///
    /// let doc = RtfDocument::open("document.rtf")?;
    /// let text = doc.text();
    /// # Ok::<(), rtf_tree::rtf::RtfError>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> RtfResult<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "opening rtf file");
        Self::from_reader(File::open(path)?)
    }

    /// Root group of the document.
    #[inline]
    pub fn root(&self) -> &Group {
        &self.root
    }

    #[inline]
    pub fn into_root(self) -> Group {
        self.root
    }

    /// All text of the document, including text of destinations such as the
    /// font table.
    pub fn text(&self) -> String {
        self.root.text()
    }

    /// Serialize the document back to RTF.
    pub fn to_rtf(&self) -> String {
        to_rtf_string(&self.root, WriterOptions::default())
    }
}

impl From<Group> for RtfDocument {
    fn from(root: Group) -> Self {
        Self { root }
    }
}

/// Parse an RTF string into its root group.
pub fn parse_str(input: &str) -> RtfResult<Group> {
    parse_to_tree(StrSource::new(input), ParserOptions::default())
}

/// Parse RTF bytes into their root group.
pub fn parse_bytes(bytes: &[u8]) -> RtfResult<Group> {
    parse_reader(bytes)
}

/// Parse an RTF byte stream into its root group. The reader is not closed.
pub fn parse_reader<R: Read>(reader: R) -> RtfResult<Group> {
    parse_to_tree(ByteSource::new(reader), ParserOptions::default())
}

/// Parse an RTF file into its root group.
pub fn parse_file<P: AsRef<Path>>(path: P) -> RtfResult<Group> {
    RtfDocument::open(path).map(RtfDocument::into_root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtf::error::{ErrorKind, RtfError};
    use std::io::Write;

    const SAMPLE: &str = r"{\rtf1\ansi\deff0{\fonttbl{\f0\fswiss\fcharset0 Helvetica;}}\f0\pard Hello {\b World}!\par}";

    #[test]
    fn test_parse_document() {
        let doc = RtfDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.root().destination(), Some("rtf"));
        assert!(doc.root().select_child_group_with_destination("fonttbl").is_some());
        assert_eq!(doc.text(), "Helvetica;Hello World!");
    }

    #[test]
    fn test_entry_points_agree() {
        let from_str = parse_str(SAMPLE).unwrap();
        let from_bytes = parse_bytes(SAMPLE.as_bytes()).unwrap();
        let from_reader = parse_reader(std::io::Cursor::new(SAMPLE)).unwrap();
        assert_eq!(from_str, from_bytes);
        assert_eq!(from_str, from_reader);
    }

    #[test]
    fn test_bytes_use_document_code_page() {
        let bytes = b"{\\rtf1\\ansi\\ansicpg1251 \xcf\xf0\xe8}";
        let doc = RtfDocument::from_bytes(bytes).unwrap();
        assert_eq!(doc.text(), "При");
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        file.flush().unwrap();

        let root = parse_file(file.path()).unwrap();
        assert_eq!(root, parse_str(SAMPLE).unwrap());
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RtfDocument::open(dir.path().join("missing.rtf")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_errors_propagate() {
        assert!(matches!(parse_str("no groups"), Err(RtfError::EmptyDocument)));
        assert!(matches!(
            parse_bytes(b"{\\rtf1"),
            Err(RtfError::TooFewBraces { open: 1 })
        ));
    }

    #[test]
    fn test_options_apply() {
        let options = ParserOptions::new().with_ignore_content_after_root_group(true);
        let doc = RtfDocument::parse_with_options("{\\rtf1 x}\0garbage", options).unwrap();
        assert_eq!(doc.text(), "x");
        let doc = RtfDocument::from_reader_with_options(&b"{a}}"[..], options).unwrap();
        assert_eq!(doc.text(), "a");
    }

    #[test]
    fn test_to_rtf_round_trip() {
        let doc = RtfDocument::parse(SAMPLE).unwrap();
        let again = RtfDocument::parse(&doc.to_rtf()).unwrap();
        assert_eq!(doc, again);
    }
}
