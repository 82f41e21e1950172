//! Character encoding utilities for RTF text.
//!
//! RTF stores literal text as 8-bit or multi-byte code page data. This module
//! maps Windows code page identifiers and RTF font charsets onto
//! `encoding_rs` encodings.

use encoding_rs::Encoding;

/// Code page used when a document does not declare one (ANSI, Western European).
pub const DEFAULT_CODE_PAGE: u32 = 1252;

/// Map Windows codepage identifier to encoding_rs Encoding.
///
/// Returns `None` for code pages without an `encoding_rs` counterpart, such as
/// the DOS code pages 437 and 850 or the symbol code page 42, and for the
/// UTF-16 code pages 1200 and 1201, which are not ASCII based.
///
/// # Examples
/// ```
/// use rtf_tree::common::encoding::codepage_to_encoding;
///
/// let encoding = codepage_to_encoding(936).unwrap();
/// assert_eq!(encoding.name(), "GBK");
/// ```
#[inline]
pub fn codepage_to_encoding(codepage: u32) -> Option<&'static Encoding> {
    match codepage {
        866 => Some(encoding_rs::IBM866), // DOS Cyrillic

        // Windows codepages (Western scripts)
        874 => Some(encoding_rs::WINDOWS_874),   // Thai
        1250 => Some(encoding_rs::WINDOWS_1250), // Central European
        1251 => Some(encoding_rs::WINDOWS_1251), // Cyrillic
        1252 => Some(encoding_rs::WINDOWS_1252), // Western European (default ANSI)
        1253 => Some(encoding_rs::WINDOWS_1253), // Greek
        1254 => Some(encoding_rs::WINDOWS_1254), // Turkish
        1255 => Some(encoding_rs::WINDOWS_1255), // Hebrew
        1256 => Some(encoding_rs::WINDOWS_1256), // Arabic
        1257 => Some(encoding_rs::WINDOWS_1257), // Baltic
        1258 => Some(encoding_rs::WINDOWS_1258), // Vietnamese

        // East Asian codepages
        932 => Some(encoding_rs::SHIFT_JIS),  // Japanese Shift-JIS
        936 => Some(encoding_rs::GBK),        // Simplified Chinese (GB2312/GBK)
        949 => Some(encoding_rs::EUC_KR),     // Korean
        950 => Some(encoding_rs::BIG5),       // Traditional Chinese (Big5)
        20932 => Some(encoding_rs::EUC_JP),   // Japanese EUC-JP
        20936 => Some(encoding_rs::GBK),      // GB2312
        54936 => Some(encoding_rs::GB18030),  // Chinese GB18030 (superset of GBK)

        // ISO 8859 series
        28591 => Some(encoding_rs::WINDOWS_1252), // ISO-8859-1 approximation
        28592 => Some(encoding_rs::ISO_8859_2),
        28593 => Some(encoding_rs::ISO_8859_3),
        28594 => Some(encoding_rs::ISO_8859_4),
        28595 => Some(encoding_rs::ISO_8859_5),
        28596 => Some(encoding_rs::ISO_8859_6),
        28597 => Some(encoding_rs::ISO_8859_7),
        28598 => Some(encoding_rs::ISO_8859_8),
        28603 => Some(encoding_rs::ISO_8859_13),
        28605 => Some(encoding_rs::ISO_8859_15),

        // KOI8 series
        20866 => Some(encoding_rs::KOI8_R),
        21866 => Some(encoding_rs::KOI8_U),

        // Macintosh
        10000 => Some(encoding_rs::MACINTOSH),      // Mac Roman
        10001 => Some(encoding_rs::SHIFT_JIS),      // Mac Japanese
        10002 => Some(encoding_rs::BIG5),           // Mac Traditional Chinese
        10003 => Some(encoding_rs::EUC_KR),         // Mac Korean
        10007 => Some(encoding_rs::X_MAC_CYRILLIC), // Mac Cyrillic
        10008 => Some(encoding_rs::GBK),            // Mac Simplified Chinese

        // Unicode
        65001 => Some(encoding_rs::UTF_8),

        _ => None,
    }
}

/// Map an RTF font charset (`\fcharsetN`) to a Windows code page.
///
/// Returns `0` when the charset has no code page of its own (the "default"
/// charset and a few obsolete Mac/Arabic variants) or is unknown.
#[inline]
pub const fn charset_to_codepage(charset: i32) -> u32 {
    match charset {
        0 => 1252,    // ANSI
        1 => 0,       // Default
        2 => 42,      // Symbol
        77 => 10000,  // Mac Roman
        78 => 10001,  // Mac Shift Jis
        79 => 10003,  // Mac Hangul
        80 => 10008,  // Mac GB2312
        81 => 10002,  // Mac Big5
        82 => 0,      // Mac Johab (old)
        83 => 10005,  // Mac Hebrew
        84 => 10004,  // Mac Arabic
        85 => 10006,  // Mac Greek
        86 => 10081,  // Mac Turkish
        87 => 10021,  // Mac Thai
        88 => 10029,  // Mac East Europe
        89 => 10007,  // Mac Russian
        128 => 932,   // Shift JIS
        129 => 949,   // Hangul
        130 => 1361,  // Johab
        134 => 936,   // GB2312
        136 => 950,   // Big5
        161 => 1253,  // Greek
        162 => 1254,  // Turkish
        163 => 1258,  // Vietnamese
        177 => 1255,  // Hebrew
        178 => 1256,  // Arabic
        179 => 0,     // Arabic Traditional (old)
        180 => 0,     // Arabic user (old)
        181 => 0,     // Hebrew user (old)
        186 => 1257,  // Baltic
        204 => 1251,  // Russian
        222 => 874,   // Thai
        238 => 1250,  // Eastern European
        254 => 437,   // PC 437
        255 => 850,   // OEM
        _ => 0,
    }
}

/// Resolve a code page to an encoding, falling back to Windows-1252.
///
/// The second value reports whether the fallback was taken.
#[inline]
pub fn codepage_to_encoding_or_default(codepage: u32) -> (&'static Encoding, bool) {
    match codepage_to_encoding(codepage) {
        Some(encoding) => (encoding, false),
        None => (encoding_rs::WINDOWS_1252, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codepage_to_encoding() {
        assert_eq!(codepage_to_encoding(1252).unwrap().name(), "windows-1252");
        assert_eq!(codepage_to_encoding(932).unwrap().name(), "Shift_JIS");
        assert_eq!(codepage_to_encoding(1251).unwrap().name(), "windows-1251");
        assert_eq!(codepage_to_encoding(10000).unwrap().name(), "macintosh");
    }

    #[test]
    fn test_codepage_to_encoding_unsupported() {
        assert!(codepage_to_encoding(42).is_none());
        assert!(codepage_to_encoding(437).is_none());
        assert!(codepage_to_encoding(99999).is_none());
        // RTF text is byte oriented; UTF-16 code pages cannot carry it.
        assert!(codepage_to_encoding(1200).is_none());
        assert!(codepage_to_encoding(1201).is_none());
    }

    #[test]
    fn test_charset_to_codepage() {
        assert_eq!(charset_to_codepage(0), 1252);
        assert_eq!(charset_to_codepage(1), 0);
        assert_eq!(charset_to_codepage(128), 932);
        assert_eq!(charset_to_codepage(204), 1251);
        assert_eq!(charset_to_codepage(238), 1250);
        assert_eq!(charset_to_codepage(1000), 0);
    }

    #[test]
    fn test_fallback_encoding() {
        let (encoding, fallback) = codepage_to_encoding_or_default(437);
        assert_eq!(encoding, encoding_rs::WINDOWS_1252);
        assert!(fallback);

        let (encoding, fallback) = codepage_to_encoding_or_default(1253);
        assert_eq!(encoding, encoding_rs::WINDOWS_1253);
        assert!(!fallback);
    }
}
