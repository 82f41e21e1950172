//! Streaming decoder for code page text.
//!
//! Literal characters and `\'hh` escapes are fed in as single bytes. A byte
//! that completes a character appends it to the output; a byte that starts a
//! multi-byte sequence stays pending until the sequence completes.

use super::error::{RtfError, RtfResult};
use crate::common::encoding::codepage_to_encoding_or_default;
use encoding_rs::{Decoder, DecoderResult, Encoding};
use smallvec::SmallVec;

/// Spare capacity reserved before decoding a single byte.
const DECODE_RESERVE: usize = 16;

pub(crate) struct TextDecoder {
    code_page: u32,
    encoding: &'static Encoding,
    decoder: Decoder,
    /// Bytes of the character currently being decoded
    pending: SmallVec<[u8; 4]>,
}

impl TextDecoder {
    /// Create a decoder for `code_page`, falling back to Windows-1252 for
    /// code pages without a known encoding.
    pub fn new(code_page: u32) -> Self {
        let (encoding, fallback) = codepage_to_encoding_or_default(code_page);
        if fallback {
            tracing::warn!(code_page, "unsupported code page, decoding as windows-1252");
        }
        Self {
            code_page,
            encoding,
            decoder: encoding.new_decoder_without_bom_handling(),
            pending: SmallVec::new(),
        }
    }

    #[cfg(test)]
    pub fn code_page(&self) -> u32 {
        self.code_page
    }

    #[cfg(test)]
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Whether a multi-byte character has been started but not completed.
    #[inline]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Feed one byte, appending any completed character to `out`.
    pub fn push_byte(&mut self, byte: u8, out: &mut String) -> RtfResult<()> {
        self.pending.push(byte);
        let before = out.len();
        let mut input: &[u8] = &[byte];
        loop {
            out.reserve(DECODE_RESERVE);
            let (result, read) = self
                .decoder
                .decode_to_string_without_replacement(input, out, false);
            input = &input[read..];
            match result {
                DecoderResult::InputEmpty => break,
                DecoderResult::OutputFull => continue,
                DecoderResult::Malformed(_, _) => {
                    let bytes = self.pending.to_vec();
                    self.reset();
                    return Err(RtfError::InvalidMultiByteSequence {
                        code_page: self.code_page,
                        bytes,
                    });
                },
            }
        }
        if out.len() > before {
            self.pending.clear();
        }
        Ok(())
    }

    /// Feed several bytes in order.
    pub fn push_bytes(&mut self, bytes: &[u8], out: &mut String) -> RtfResult<()> {
        for &byte in bytes {
            self.push_byte(byte, out)?;
        }
        Ok(())
    }

    /// Fail if a multi-byte character is still incomplete.
    pub fn ensure_complete(&self) -> RtfResult<()> {
        if self.has_pending() {
            return Err(RtfError::IncompleteMultiByteSequence {
                code_page: self.code_page,
            });
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.decoder = self.encoding.new_decoder_without_bom_handling();
        self.pending.clear();
    }
}
