//! RTF serializer for element trees.
//!
//! The writer walks a tree through the [`ElementVisitor`] contract and emits
//! RTF that parses back to an equal tree. Output is plain ASCII: control
//! characters are written as `\'hh` escapes and everything outside ASCII as
//! `\uN` escapes followed by fallback characters.

use super::element::{Element, Group, Tag, Text};
use super::keywords;
use super::visitor::{ElementVisitor, visit_children};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};

/// Default `\uc` in effect at the start of a document.
const DEFAULT_UNICODE_SKIP_COUNT: u8 = 1;

/// RTF writer options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterOptions {
    /// Character written after each `\uN` escape for readers without
    /// Unicode support
    pub unicode_fallback: char,
    /// Write a line break after every `\par` for readability
    pub line_break_after_paragraph: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            unicode_fallback: '?',
            line_break_after_paragraph: false,
        }
    }
}

impl WriterOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_unicode_fallback(mut self, fallback: char) -> Self {
        self.unicode_fallback = fallback;
        self
    }

    #[inline]
    pub fn with_line_break_after_paragraph(mut self, enabled: bool) -> Self {
        self.line_break_after_paragraph = enabled;
        self
    }

    /// Fallback character actually written. Characters that would change
    /// the meaning of the output are replaced by `?`.
    fn effective_fallback(&self) -> char {
        match self.unicode_fallback {
            '\\' | '{' | '}' | ' ' => '?',
            c if c.is_ascii_graphic() => c,
            _ => '?',
        }
    }
}

/// RTF tree writer
pub struct RtfWriter<W: Write> {
    /// Output writer
    writer: W,
    options: WriterOptions,
    /// `\uc` value in effect for the current group
    skip_count: u8,
    /// Saved `\uc` values of the enclosing groups
    skip_counts: Vec<u8>,
    /// First error raised while visiting
    error: Option<io::Error>,
}

impl<W: Write> RtfWriter<W> {
    /// Create a new RTF writer
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, WriterOptions::default())
    }

    /// Create a new RTF writer with options
    pub fn with_options(writer: W, options: WriterOptions) -> Self {
        Self {
            writer,
            options,
            skip_count: DEFAULT_UNICODE_SKIP_COUNT,
            skip_counts: Vec::new(),
            error: None,
        }
    }

    /// Write a group and everything below it.
    pub fn write_group(&mut self, group: &Group) -> io::Result<()> {
        group.accept(self);
        self.take_error()
    }

    /// Write a single element.
    pub fn write_element(&mut self, element: &Element) -> io::Result<()> {
        element.accept(self);
        self.take_error()
    }

    /// Flush the writer
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume the writer, returning the underlying output.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn take_error(&mut self) -> io::Result<()> {
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Run `op` unless an earlier write already failed.
    fn record<F>(&mut self, op: F)
    where
        F: FnOnce(&mut Self) -> io::Result<()>,
    {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = op(self) {
            self.error = Some(err);
        }
    }

    /// Write a tag. Control words get a delimiting space so a following
    /// letter, digit or space is not read as part of the tag.
    fn write_tag(&mut self, tag: &Tag) -> io::Result<()> {
        self.write_str("\\")?;
        self.write_str(tag.full_name())?;
        if tag.is_control_symbol() {
            return Ok(());
        }
        self.write_str(" ")?;

        if tag.name() == keywords::UNICODE_SKIP_COUNT
            && let Some(count) = tag.value_as_number()
            && (0..=keywords::MAX_UNICODE_SKIP_COUNT).contains(&count)
        {
            self.skip_count = count as u8;
        }
        if tag.name() == keywords::PARAGRAPH && self.options.line_break_after_paragraph {
            self.write_str("\r\n")?;
        }
        Ok(())
    }

    /// Write a control word
    fn write_control_word(&mut self, word: &str, param: Option<i32>) -> io::Result<()> {
        self.write_str("\\")?;
        self.write_str(word)?;
        if let Some(p) = param {
            write!(self.writer, "{}", p)?;
        }
        self.write_str(" ")
    }

    /// Write plain text (with proper escaping)
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        let mut units = [0u16; 2];
        for ch in text.chars() {
            match ch {
                '\\' => self.write_str("\\\\")?,
                '{' => self.write_str("\\{")?,
                '}' => self.write_str("\\}")?,
                c if c.is_ascii_control() => {
                    write!(self.writer, "\\'{:02x}", c as u8)?;
                },
                c if c.is_ascii() => {
                    write!(self.writer, "{}", c)?;
                },
                c => {
                    for &unit in c.encode_utf16(&mut units).iter() {
                        // RTF arguments are signed 16-bit values.
                        self.write_control_word(keywords::UNICODE_CHAR, Some(i32::from(unit as i16)))?;
                        self.write_fallback()?;
                    }
                },
            }
        }
        Ok(())
    }

    fn write_fallback(&mut self) -> io::Result<()> {
        let fallback = self.options.effective_fallback();
        for _ in 0..self.skip_count {
            write!(self.writer, "{}", fallback)?;
        }
        Ok(())
    }

    /// Write a string
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.writer.write_all(s.as_bytes())
    }
}

impl<W: Write> ElementVisitor for RtfWriter<W> {
    fn visit_tag(&mut self, tag: &Tag) {
        self.record(|w| w.write_tag(tag));
    }

    fn visit_group(&mut self, group: &Group) {
        self.skip_counts.push(self.skip_count);
        self.record(|w| w.write_str("{"));
        visit_children(self, group.children());
        self.record(|w| w.write_str("}"));
        if let Some(count) = self.skip_counts.pop() {
            self.skip_count = count;
        }
    }

    fn visit_text(&mut self, text: &Text) {
        self.record(|w| w.write_text(text.as_str()));
    }
}

/// Serialize `group` to an RTF string.
pub fn to_rtf_string(group: &Group, options: WriterOptions) -> String {
    let mut writer = RtfWriter::with_options(Vec::new(), options);
    // Writes into a Vec do not fail.
    let _ = writer.write_group(group);
    String::from_utf8_lossy(&writer.into_inner()).into_owned()
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_rtf_string(self, WriterOptions::default()))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut writer = RtfWriter::new(Vec::new());
        writer.write_element(self).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&writer.into_inner()))
    }
}
