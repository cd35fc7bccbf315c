//! Unicode input support: combining marks, precomposed letters and the
//! scripts accepted in text mode.

pub mod unicode_accents;
pub mod unicode_scripts;
pub mod unicode_symbols;

pub use unicode_accents::{AccentMapping, UNICODE_ACCENTS};
pub use unicode_scripts::{Script, script_from_char, supported_codepoint};
pub use unicode_symbols::UNICODE_SYMBOLS;
