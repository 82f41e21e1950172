//! RTF (Rich Text Format) structural parser.
//!
//! This module turns RTF into a tree of groups, control words and decoded
//! text. It does not interpret formatting; consumers walk the tree or listen
//! to the parser's event stream and decide what each control word means.
//!
//! # Architecture
//!
//! - **Parser**: scans characters and reports groups, tags and text to
//!   [`ParserListener`]s, decoding `\'hh` and `\uN` escapes through the code
//!   page in effect
//! - **StructureBuilder**: a listener that folds the events into a [`Group`]
//! - **Visitor**: [`ElementVisitor`] and [`walk`] for traversing the tree
//! - **Writer**: serializes a tree back to RTF
//!
//! # Example
//!
//! ```rust
//! use rtf_tree::rtf::RtfDocument;
//!
//! let rtf_text = r#"{\rtf1\ansi{\fonttbl{\f0\fswiss Helvetica;}}\f0\pard Hello World!\par}"#;
//! let doc = RtfDocument::parse(rtf_text)?;
//! assert!(doc.text().ends_with("Hello World!"));
//! # Ok::<(), rtf_tree::rtf::RtfError>(())
//! ```

mod builder;
mod decoder;
mod document;
mod element;
mod error;
pub mod keywords;
mod listener;
mod parser;
mod source;
mod visitor;
mod writer;

// Re-exports
pub use builder::StructureBuilder;
pub use document::{RtfDocument, parse_bytes, parse_file, parse_reader, parse_str};
pub use element::{Element, ElementKind, Group, Tag, Text};
pub use error::{ErrorKind, RtfError, RtfResult};
pub use listener::{ListenerLogger, LoggerSettings, ParserListener};
pub use parser::{ParserOptions, RtfParser, parse_to_tree};
pub use source::{ByteSource, RtfSource, StrSource};
pub use visitor::{ElementVisitor, TextCollector, VisitorOrder, visit_children, walk};
pub use writer::{RtfWriter, WriterOptions, to_rtf_string};
