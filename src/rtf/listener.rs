//! Parser event protocol.
//!
//! The parser reports a flat, ordered stream of events to every registered
//! [`ParserListener`]. Each parse is bracketed by `parse_begin`/`parse_end`
//! and reports exactly one of `parse_success` or `parse_fail`.

use super::element::{Tag, Text};
use super::error::{RtfError, RtfResult};
use serde::{Deserialize, Serialize};

/// Receiver of parser events.
///
/// All methods default to doing nothing. Returning an error aborts the
/// parse; the parser then reports `parse_fail` with that error.
pub trait ParserListener {
    fn parse_begin(&mut self) -> RtfResult<()> {
        Ok(())
    }

    fn group_begin(&mut self) -> RtfResult<()> {
        Ok(())
    }

    fn tag_found(&mut self, _tag: &Tag) -> RtfResult<()> {
        Ok(())
    }

    fn text_found(&mut self, _text: &Text) -> RtfResult<()> {
        Ok(())
    }

    fn group_end(&mut self) -> RtfResult<()> {
        Ok(())
    }

    fn parse_success(&mut self) -> RtfResult<()> {
        Ok(())
    }

    fn parse_fail(&mut self, _reason: &RtfError) -> RtfResult<()> {
        Ok(())
    }

    fn parse_end(&mut self) -> RtfResult<()> {
        Ok(())
    }
}

/// Settings for [`ListenerLogger`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerSettings {
    /// Log group begin/end events
    pub log_groups: bool,
    /// Log every tag
    pub log_tags: bool,
    /// Log every text run
    pub log_text: bool,
    /// Log parse begin/end and the outcome
    pub log_outcome: bool,
    /// Indent entries by group depth
    pub indent: bool,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            log_groups: true,
            log_tags: true,
            log_text: true,
            log_outcome: true,
            indent: true,
        }
    }
}

impl LoggerSettings {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_groups(mut self, enabled: bool) -> Self {
        self.log_groups = enabled;
        self
    }

    #[inline]
    pub fn with_tags(mut self, enabled: bool) -> Self {
        self.log_tags = enabled;
        self
    }

    #[inline]
    pub fn with_text(mut self, enabled: bool) -> Self {
        self.log_text = enabled;
        self
    }

    #[inline]
    pub fn with_outcome(mut self, enabled: bool) -> Self {
        self.log_outcome = enabled;
        self
    }

    #[inline]
    pub fn with_indent(mut self, enabled: bool) -> Self {
        self.indent = enabled;
        self
    }
}

/// Listener that reports parser events through `tracing` at debug level.
#[derive(Debug, Default)]
pub struct ListenerLogger {
    settings: LoggerSettings,
    level: usize,
}

impl ListenerLogger {
    pub fn new(settings: LoggerSettings) -> Self {
        Self { settings, level: 0 }
    }

    #[inline]
    pub fn settings(&self) -> &LoggerSettings {
        &self.settings
    }

    /// Current group depth as seen by this listener.
    #[inline]
    pub fn level(&self) -> usize {
        self.level
    }

    fn indent(&self) -> String {
        if self.settings.indent {
            "  ".repeat(self.level)
        } else {
            String::new()
        }
    }
}

impl ParserListener for ListenerLogger {
    fn parse_begin(&mut self) -> RtfResult<()> {
        self.level = 0;
        if self.settings.log_outcome {
            tracing::debug!("parse begin");
        }
        Ok(())
    }

    fn group_begin(&mut self) -> RtfResult<()> {
        if self.settings.log_groups {
            tracing::debug!(level = self.level, "{}{{", self.indent());
        }
        self.level += 1;
        Ok(())
    }

    fn tag_found(&mut self, tag: &Tag) -> RtfResult<()> {
        if self.settings.log_tags {
            tracing::debug!(level = self.level, "{}{}", self.indent(), tag);
        }
        Ok(())
    }

    fn text_found(&mut self, text: &Text) -> RtfResult<()> {
        if self.settings.log_text {
            tracing::debug!(level = self.level, "{}text: {:?}", self.indent(), text.as_str());
        }
        Ok(())
    }

    fn group_end(&mut self) -> RtfResult<()> {
        self.level = self.level.saturating_sub(1);
        if self.settings.log_groups {
            tracing::debug!(level = self.level, "{}}}", self.indent());
        }
        Ok(())
    }

    fn parse_success(&mut self) -> RtfResult<()> {
        if self.settings.log_outcome {
            tracing::debug!("parse succeeded");
        }
        Ok(())
    }

    fn parse_fail(&mut self, reason: &RtfError) -> RtfResult<()> {
        if self.settings.log_outcome {
            tracing::debug!(error = %reason, "parse failed");
        }
        Ok(())
    }

    fn parse_end(&mut self) -> RtfResult<()> {
        if self.settings.log_outcome {
            tracing::debug!("parse end");
        }
        Ok(())
    }
}
