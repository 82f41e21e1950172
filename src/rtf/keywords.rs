//! Control words the parser reacts to.

use phf::phf_set;

/// `\*`: marks an ignorable (extension) destination.
pub const EXTENSION_DESTINATION: &str = "*";
/// `\fonttbl`: font table destination.
pub const FONT_TABLE: &str = "fonttbl";
/// `\fN`: font selector.
pub const FONT: &str = "f";
/// `\fcharsetN`: charset of the font being defined.
pub const FONT_CHARSET: &str = "fcharset";
/// `\uN`: Unicode character.
pub const UNICODE_CHAR: &str = "u";
/// `\ucN`: number of fallback units following each `\uN`.
pub const UNICODE_SKIP_COUNT: &str = "uc";
pub const PARAGRAPH: &str = "par";
pub const TAB: &str = "tab";

pub const ENCODING_ANSI: &str = "ansi";
pub const ENCODING_MAC: &str = "mac";
pub const ENCODING_PC: &str = "pc";
pub const ENCODING_PCA: &str = "pca";
pub const ANSI_CODE_PAGE: &str = "ansicpg";

/// Theme font markers; the font selector follows as the next tag.
pub static THEME_FONTS: phf::Set<&'static str> = phf_set! {
    "flomajor",
    "fhimajor",
    "fdbmajor",
    "fbimajor",
    "flominor",
    "fhiminor",
    "fdbminor",
    "fbiminor",
};

/// Largest accepted `\ucN` argument.
pub const MAX_UNICODE_SKIP_COUNT: i32 = 10;

/// Code page selected by a document encoding tag, if `name` is one.
pub fn document_code_page(name: &str, value: Option<i32>) -> Option<u32> {
    match name {
        ENCODING_ANSI => Some(1252),
        ENCODING_MAC => Some(10000),
        ENCODING_PC => Some(437),
        ENCODING_PCA => Some(850),
        ANSI_CODE_PAGE => value.and_then(|v| u32::try_from(v).ok()),
        _ => None,
    }
}
