//! rtf-tree - A Rust library for parsing the structure of RTF documents
//!
//! This library reads Rich Text Format input and exposes it as a tree of
//! groups, control words and decoded text, without interpreting formatting.
//!
//! # Features
//!
//! - **Event parser**: Report groups, tags and text to any number of listeners
//! - **Tree builder**: Fold the event stream into a [`rtf::Group`] tree
//! - **Text decoding**: `\'hh` escapes and raw bytes decoded through the code page
//!   in effect, including multi-byte code pages and per-font charsets
//! - **Unicode escapes**: `\uN` with `\ucN` fallback skipping and surrogate pairs
//! - **Writer**: Serialize a tree back to RTF that parses to the same tree
//!
//! # Example - Parsing a string
//!
//! ```
//! use rtf_tree::rtf::{self, Element};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let root = rtf::parse_str(r"{\rtf1\ansi{\fonttbl{\f0\fcharset0 Arial;}}\f0 hi}")?;
//!
//! assert_eq!(root.destination(), Some("rtf"));
//! let fonts = root.select_child_group_with_destination("fonttbl");
//! assert!(fonts.is_some());
//! assert_eq!(root.children().last().and_then(Element::as_text).map(|t| t.as_str()), Some("hi"));
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Listening to parser events
//!
//! ```
//! use rtf_tree::rtf::{ParserListener, ParserOptions, RtfParser, RtfResult, StrSource, Tag};
//!
//! #[derive(Default)]
//! struct TagCounter(usize);
//!
//! impl ParserListener for TagCounter {
//!     fn tag_found(&mut self, _tag: &Tag) -> RtfResult<()> {
//!         self.0 += 1;
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut counter = TagCounter::default();
//! let mut parser = RtfParser::new(ParserOptions::default());
//! parser.add_listener(&mut counter);
//! parser.parse(StrSource::new(r"{\rtf1\b bold\b0}"))?;
//! drop(parser);
//! assert_eq!(counter.0, 3);
//! # Ok(())
//! # }
//! ```

/// Code page and charset tables shared by the parser components
pub mod common;

/// RTF structural parser, element tree and writer
pub mod rtf;

// Re-export commonly used types for convenience
pub use rtf::{Group, RtfDocument, RtfError, RtfParser, RtfResult};
