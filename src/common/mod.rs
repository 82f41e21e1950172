//! Utilities shared by the parser components.

pub mod encoding;

pub use encoding::{
    DEFAULT_CODE_PAGE, charset_to_codepage, codepage_to_encoding, codepage_to_encoding_or_default,
};
