//! RTF scanner that reports structure to parser listeners.
//!
//! The parser reads characters one at a time, recognizes braces, control
//! words, control symbols, `\'hh` and `\uN` escapes, and reports groups, tags
//! and coalesced text runs to every registered [`ParserListener`]. Code page
//! and `\uc` state are scoped to groups and restored when a group closes.

use super::builder::StructureBuilder;
use super::decoder::TextDecoder;
use super::element::{Group, Tag, Text};
use super::error::{RtfError, RtfResult};
use super::keywords;
use super::listener::ParserListener;
use super::source::RtfSource;
use crate::common::encoding::{DEFAULT_CODE_PAGE, charset_to_codepage};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Number of leading tags that may declare the document encoding.
const DOCUMENT_ENCODING_TAG_LIMIT: usize = 4;

/// Default number of fallback units following `\uN`.
const DEFAULT_UNICODE_SKIP_COUNT: u8 = 1;

/// Parser options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Stop reading once the first top-level group closes, instead of
    /// treating trailing content as part of the document.
    pub ignore_content_after_root_group: bool,
}

impl ParserOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_ignore_content_after_root_group(mut self, ignore: bool) -> Self {
        self.ignore_content_after_root_group = ignore;
        self
    }
}

/// State saved when a group opens and restored when it closes.
#[derive(Debug, Clone, Copy)]
struct GroupScope {
    unicode_skip_count: u8,
    code_page: u32,
    tags_in_group: usize,
}

/// RTF parser.
///
/// A parser is single-use per call to [`RtfParser::parse`]; all scanning
/// state is reset when a parse begins. Listeners are notified in
/// registration order.
pub struct RtfParser<'l> {
    options: ParserOptions,
    listeners: Vec<&'l mut dyn ParserListener>,

    /// Current brace depth
    level: usize,
    group_opened: bool,
    tag_count: usize,
    tags_in_group: usize,
    unicode_skip_count: u8,
    scopes: Vec<GroupScope>,

    code_page: u32,
    /// Created on first use after each code page change
    decoder: Option<TextDecoder>,

    /// Level at which the font table group was opened
    font_table_level: Option<usize>,
    expecting_theme_font: bool,
    target_font: Option<String>,
    font_code_pages: HashMap<String, u32>,

    text: String,
    hex_bytes: SmallVec<[u8; 8]>,
    high_surrogate: Option<u16>,
}

impl<'l> RtfParser<'l> {
    /// Create a parser without listeners.
    pub fn new(options: ParserOptions) -> Self {
        Self {
            options,
            listeners: Vec::new(),
            level: 0,
            group_opened: false,
            tag_count: 0,
            tags_in_group: 0,
            unicode_skip_count: DEFAULT_UNICODE_SKIP_COUNT,
            scopes: Vec::new(),
            code_page: DEFAULT_CODE_PAGE,
            decoder: None,
            font_table_level: None,
            expecting_theme_font: false,
            target_font: None,
            font_code_pages: HashMap::new(),
            text: String::new(),
            hex_bytes: SmallVec::new(),
            high_surrogate: None,
        }
    }

    #[inline]
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Register a listener; it is notified after those registered before it.
    pub fn add_listener(&mut self, listener: &'l mut dyn ParserListener) {
        self.listeners.push(listener);
    }

    /// Builder-style [`RtfParser::add_listener`].
    pub fn with_listener(mut self, listener: &'l mut dyn ParserListener) -> Self {
        self.add_listener(listener);
        self
    }

    #[inline]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    /// Parse the whole source, reporting events to the registered listeners.
    ///
    /// `parse_begin` and `parse_end` are always reported; in between exactly
    /// one of `parse_success` or `parse_fail` is reported.
    pub fn parse<S: RtfSource>(&mut self, mut source: S) -> RtfResult<()> {
        self.reset();
        tracing::trace!("rtf parse begin");

        let mut result = self.notify(|l| l.parse_begin());
        if result.is_ok() {
            result = self.scan(&mut source);
        }

        let outcome = match result {
            Ok(()) => self.notify(|l| l.parse_success()),
            Err(err) => {
                tracing::debug!(error = %err, "rtf parse failed");
                // The parse error takes precedence over listener failures.
                let _ = self.notify_all(|l| l.parse_fail(&err));
                Err(err)
            },
        };

        let end = self.notify_all(|l| l.parse_end());
        tracing::trace!("rtf parse end");
        outcome.and(end)
    }

    fn reset(&mut self) {
        self.level = 0;
        self.group_opened = false;
        self.tag_count = 0;
        self.tags_in_group = 0;
        self.unicode_skip_count = DEFAULT_UNICODE_SKIP_COUNT;
        self.scopes.clear();
        self.code_page = DEFAULT_CODE_PAGE;
        self.decoder = None;
        self.font_table_level = None;
        self.expecting_theme_font = false;
        self.target_font = None;
        self.font_code_pages.clear();
        self.text.clear();
        self.hex_bytes.clear();
        self.high_surrogate = None;
    }

    /// Notify listeners in order, stopping at the first failure.
    fn notify<F>(&mut self, mut event: F) -> RtfResult<()>
    where
        F: FnMut(&mut (dyn ParserListener + 'l)) -> RtfResult<()>,
    {
        for listener in self.listeners.iter_mut() {
            event(&mut **listener)?;
        }
        Ok(())
    }

    /// Notify every listener, returning the first failure.
    fn notify_all<F>(&mut self, mut event: F) -> RtfResult<()>
    where
        F: FnMut(&mut (dyn ParserListener + 'l)) -> RtfResult<()>,
    {
        let mut first_error = None;
        for listener in self.listeners.iter_mut() {
            if let Err(err) = event(&mut **listener)
                && first_error.is_none()
            {
                first_error = Some(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn scan<S: RtfSource>(&mut self, source: &mut S) -> RtfResult<()> {
        while let Some(ch) = source.next_char()? {
            match ch {
                '{' => self.open_group()?,
                '}' => {
                    self.close_group()?;
                    if self.level == 0 && self.options.ignore_content_after_root_group {
                        break;
                    }
                },
                '\\' => self.parse_escape(source)?,
                // Line breaks are not content.
                '\n' | '\r' => {},
                '\t' => self.handle_tag(source, Tag::named(keywords::TAB))?,
                _ => self.append_literal(ch)?,
            }
        }

        if !self.group_opened {
            return Err(RtfError::EmptyDocument);
        }
        self.flush_text()?;
        if self.level > 0 {
            return Err(RtfError::TooFewBraces { open: self.level });
        }
        Ok(())
    }

    fn open_group(&mut self) -> RtfResult<()> {
        self.flush_text()?;
        self.notify(|l| l.group_begin())?;

        self.scopes.push(GroupScope {
            unicode_skip_count: self.unicode_skip_count,
            code_page: self.code_page,
            tags_in_group: self.tags_in_group,
        });
        self.level += 1;
        self.group_opened = true;
        self.tags_in_group = 0;
        self.expecting_theme_font = false;
        Ok(())
    }

    fn close_group(&mut self) -> RtfResult<()> {
        self.flush_text()?;
        let scope = self.scopes.pop().ok_or(RtfError::TooManyBraces)?;

        self.unicode_skip_count = scope.unicode_skip_count;
        self.tags_in_group = scope.tags_in_group;
        self.set_code_page(scope.code_page)?;
        if self.font_table_level == Some(self.level) {
            tracing::debug!(fonts = self.font_code_pages.len(), "font table end");
            self.font_table_level = None;
            self.target_font = None;
        }
        self.expecting_theme_font = false;
        self.level -= 1;

        self.notify(|l| l.group_end())
    }

    /// Handle everything following a backslash.
    fn parse_escape<S: RtfSource>(&mut self, source: &mut S) -> RtfResult<()> {
        let next = source.peek_char()?.ok_or(RtfError::UnexpectedEofInTag)?;
        if next == '\'' {
            source.next_char()?;
            return self.parse_hex_escape(source);
        }

        self.decode_hex_bytes()?;
        if next.is_ascii_alphabetic() {
            let tag = read_control_word(source)?;
            return self.handle_tag(source, tag);
        }

        source.next_char()?;
        match next {
            '\\' | '{' | '}' => self.append_decoded(next),
            // A backslash before a line break is a paragraph break.
            '\n' | '\r' => self.handle_tag(source, Tag::named(keywords::PARAGRAPH)),
            symbol => self.handle_tag(source, Tag::named(symbol.to_string())),
        }
    }

    /// Buffer the byte of a `\'hh` escape. Consecutive escapes are decoded
    /// together so multi-byte characters are not split.
    fn parse_hex_escape<S: RtfSource>(&mut self, source: &mut S) -> RtfResult<()> {
        let high = source.next_char()?.ok_or(RtfError::UnexpectedEofInHex)?;
        let high = high
            .to_digit(16)
            .ok_or(RtfError::InvalidFirstHexDigit(high))?;
        let low = source.next_char()?.ok_or(RtfError::UnexpectedEofInHex)?;
        let low = low
            .to_digit(16)
            .ok_or(RtfError::InvalidSecondHexDigit(low))?;

        // Both digits are below 16, so the value fits a byte.
        self.hex_bytes.push(((high << 4) | low) as u8);
        Ok(())
    }

    fn decode_hex_bytes(&mut self) -> RtfResult<()> {
        if self.hex_bytes.is_empty() {
            return Ok(());
        }
        self.finish_surrogate();
        let bytes = std::mem::take(&mut self.hex_bytes);
        let code_page = self.code_page;
        let decoder = self
            .decoder
            .get_or_insert_with(|| TextDecoder::new(code_page));
        decoder.push_bytes(&bytes, &mut self.text)
    }

    /// Append a literal character, decoding it through the active code page.
    fn append_literal(&mut self, ch: char) -> RtfResult<()> {
        self.decode_hex_bytes()?;
        match u8::try_from(u32::from(ch)) {
            Ok(byte) => {
                self.finish_surrogate();
                let code_page = self.code_page;
                let decoder = self
                    .decoder
                    .get_or_insert_with(|| TextDecoder::new(code_page));
                decoder.push_byte(byte, &mut self.text)
            },
            // Not a byte value, so it cannot be code page data.
            Err(_) => self.append_decoded(ch),
        }
    }

    /// Append a character that needs no decoding.
    fn append_decoded(&mut self, ch: char) -> RtfResult<()> {
        self.ensure_decoder_complete()?;
        self.finish_surrogate();
        self.text.push(ch);
        Ok(())
    }

    fn ensure_decoder_complete(&self) -> RtfResult<()> {
        match &self.decoder {
            Some(decoder) => decoder.ensure_complete(),
            None => Ok(()),
        }
    }

    /// Resolve a pending high surrogate that was not followed by a low one.
    fn finish_surrogate(&mut self) {
        if self.high_surrogate.take().is_some() {
            self.text.push(char::REPLACEMENT_CHARACTER);
        }
    }

    fn push_utf16_unit(&mut self, unit: u16) {
        match unit {
            0xD800..=0xDBFF => {
                self.finish_surrogate();
                self.high_surrogate = Some(unit);
            },
            0xDC00..=0xDFFF => {
                let ch = match self.high_surrogate.take() {
                    Some(high) => char::decode_utf16([high, unit])
                        .next()
                        .and_then(Result::ok)
                        .unwrap_or(char::REPLACEMENT_CHARACTER),
                    None => char::REPLACEMENT_CHARACTER,
                };
                self.text.push(ch);
            },
            _ => {
                self.finish_surrogate();
                self.text
                    .push(char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER));
            },
        }
    }

    /// Report pending text as a single run.
    fn flush_text(&mut self) -> RtfResult<()> {
        self.decode_hex_bytes()?;
        self.ensure_decoder_complete()?;
        self.finish_surrogate();
        if self.text.is_empty() {
            return Ok(());
        }
        if self.level == 0 {
            return Err(RtfError::TextOnRootLevel(std::mem::take(&mut self.text)));
        }
        let text = Text::new(std::mem::take(&mut self.text));
        self.notify(|l| l.text_found(&text))
    }

    fn set_code_page(&mut self, code_page: u32) -> RtfResult<()> {
        if code_page == self.code_page {
            return Ok(());
        }
        self.ensure_decoder_complete()?;
        tracing::debug!(from = self.code_page, to = code_page, "code page change");
        self.code_page = code_page;
        self.decoder = None;
        Ok(())
    }

    fn handle_tag<S: RtfSource>(&mut self, source: &mut S, tag: Tag) -> RtfResult<()> {
        self.decode_hex_bytes()?;
        if self.level == 0 {
            self.flush_text()?;
            return Err(RtfError::TagOnRootLevel(tag.full_name().to_owned()));
        }

        let first_in_group = self.tags_in_group == 0;
        self.tags_in_group += 1;

        if self.tag_count < DOCUMENT_ENCODING_TAG_LIMIT
            && let Some(code_page) = keywords::document_code_page(tag.name(), tag.value_as_number())
        {
            self.set_code_page(code_page)?;
        }
        self.tag_count += 1;

        // Theme font entries name the font in the tag after the marker.
        let mut theme_font_selector = false;
        if first_in_group && keywords::THEME_FONTS.contains(tag.name()) {
            self.expecting_theme_font = true;
        } else if self.expecting_theme_font {
            self.expecting_theme_font = false;
            theme_font_selector = true;
        }

        if tag.name() == keywords::FONT_TABLE {
            tracing::debug!(level = self.level, "font table begin");
            self.font_table_level = Some(self.level);
        }

        if self.font_table_level.is_some() {
            if tag.name() == keywords::FONT || theme_font_selector {
                self.target_font = Some(tag.full_name().to_owned());
            } else if tag.name() == keywords::FONT_CHARSET
                && let Some(font) = &self.target_font
            {
                let code_page = charset_to_codepage(tag.value_as_number().unwrap_or(-1));
                if code_page != 0 {
                    tracing::debug!(font = %font, code_page, "font code page");
                    self.font_code_pages.insert(font.clone(), code_page);
                    self.set_code_page(code_page)?;
                }
            }
        } else if tag.name() == keywords::FONT
            && let Some(&code_page) = self.font_code_pages.get(tag.full_name())
        {
            self.set_code_page(code_page)?;
        }

        match tag.name() {
            keywords::UNICODE_CHAR => {
                self.ensure_decoder_complete()?;
                match tag.value_as_number().and_then(utf16_unit) {
                    Some(unit) => self.push_utf16_unit(unit),
                    None => {
                        self.finish_surrogate();
                        self.text.push(char::REPLACEMENT_CHARACTER);
                    },
                }
                self.skip_unicode_fallback(source)
            },
            keywords::UNICODE_SKIP_COUNT => {
                let count = tag.value_as_number().unwrap_or(-1);
                if !(0..=keywords::MAX_UNICODE_SKIP_COUNT).contains(&count) {
                    return Err(RtfError::InvalidUnicodeSkipCount(count));
                }
                self.unicode_skip_count = count as u8;
                Ok(())
            },
            _ => {
                self.flush_text()?;
                self.notify(|l| l.tag_found(&tag))
            },
        }
    }

    /// Discard the alternative representation following `\uN`.
    ///
    /// Whitespace before the first skipped unit does not count; a brace ends
    /// the run early and is left in the input.
    fn skip_unicode_fallback<S: RtfSource>(&mut self, source: &mut S) -> RtfResult<()> {
        let mut skipped = 0;
        while skipped < self.unicode_skip_count {
            let next = source
                .peek_char()?
                .ok_or(RtfError::UnexpectedEofInUnicodeSkip)?;
            match next {
                ' ' | '\r' | '\n' => {
                    source.next_char()?;
                    if skipped == 0 {
                        continue;
                    }
                },
                '\\' => {
                    source.next_char()?;
                    let second = next_mandatory(source)?;
                    if second == '\'' {
                        next_mandatory(source)?;
                        next_mandatory(source)?;
                    }
                },
                '{' | '}' => break,
                _ => {
                    source.next_char()?;
                },
            }
            skipped += 1;
        }
        Ok(())
    }
}

impl Default for RtfParser<'_> {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

/// UTF-16 code unit of a `\uN` argument. Writers use the signed 16-bit form
/// for units above 32767, so both spellings are accepted.
fn utf16_unit(value: i32) -> Option<u16> {
    if value < 0 {
        i16::try_from(value).ok().map(|v| v as u16)
    } else {
        u16::try_from(value).ok()
    }
}

fn next_mandatory<S: RtfSource>(source: &mut S) -> RtfResult<char> {
    source
        .next_char()?
        .ok_or(RtfError::UnexpectedEofInUnicodeSkip)
}

/// Read a control word name and its optional signed argument, consuming a
/// single delimiting space.
fn read_control_word<S: RtfSource>(source: &mut S) -> RtfResult<Tag> {
    let mut name = String::new();
    loop {
        match source.peek_char()? {
            Some(c) if c.is_ascii_alphabetic() => {
                name.push(c);
                source.next_char()?;
            },
            _ => break,
        }
    }

    let mut value = String::new();
    if source.peek_char()? == Some('-') {
        source.next_char()?;
        value.push('-');
    }
    loop {
        match source.peek_char()? {
            Some(c) if c.is_ascii_digit() => {
                value.push(c);
                source.next_char()?;
            },
            _ => break,
        }
    }
    if value == "-" {
        value.clear();
    }

    if source.peek_char()? == Some(' ') {
        source.next_char()?;
    }

    Ok(Tag::new(name, Some(&value)))
}

/// Parse `source` into its root group.
pub fn parse_to_tree<S: RtfSource>(source: S, options: ParserOptions) -> RtfResult<Group> {
    let mut builder = StructureBuilder::new();
    {
        let mut parser = RtfParser::new(options).with_listener(&mut builder);
        parser.parse(source)?;
    }
    builder.into_root()
}
