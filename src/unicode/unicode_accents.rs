//! Combining marks and the accent commands they decompose into.

use phf::phf_map;

use crate::types::Mode;

/// Accent commands standing in for one combining mark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccentMapping {
    /// Command used in text mode, e.g. `\'`
    pub text: &'static str,
    /// Command used in math mode, e.g. `\acute`
    pub math: &'static str,
}

impl AccentMapping {
    /// Command for `mode`.
    #[must_use]
    pub const fn command(&self, mode: Mode) -> &'static str {
        match mode {
            Mode::Math => self.math,
            Mode::Text => self.text,
        }
    }
}

/// Combining diacritical marks that have an accent command in both modes
pub static UNICODE_ACCENTS: phf::Map<char, AccentMapping> = phf_map! {
    '\u{0301}' => AccentMapping { text: "\\'", math: "\\acute" },
    '\u{0300}' => AccentMapping { text: "\\`", math: "\\grave" },
    '\u{0308}' => AccentMapping { text: "\\\"", math: "\\ddot" },
    '\u{0303}' => AccentMapping { text: "\\~", math: "\\tilde" },
    '\u{0304}' => AccentMapping { text: "\\=", math: "\\bar" },
    '\u{0306}' => AccentMapping { text: "\\u", math: "\\breve" },
    '\u{030c}' => AccentMapping { text: "\\v", math: "\\check" },
    '\u{0302}' => AccentMapping { text: "\\^", math: "\\hat" },
    '\u{0307}' => AccentMapping { text: "\\.", math: "\\dot" },
    '\u{030a}' => AccentMapping { text: "\\r", math: "\\mathring" },
};
