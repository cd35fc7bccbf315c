//! Scripts accepted in `\text{}` without font metrics of their own.
//!
//! Characters from these blocks are measured as if they were an `M` and
//! tagged with a `<script>_fallback` class so renderers can pick a system
//! font for them.

/// A named family of Unicode blocks
#[derive(Debug, Clone, Copy)]
pub struct Script {
    /// Script name, e.g. `cyrillic`
    pub name: &'static str,
    /// Inclusive code point ranges
    pub blocks: &'static [(u32, u32)],
}

/// Scripts with fonts or fallback metrics
pub const SCRIPT_DATA: &[Script] = &[
    Script {
        // Latin Extended-A/B and the combining marks
        name: "latin",
        blocks: &[(0x0100, 0x024f), (0x0300, 0x036f)],
    },
    Script {
        name: "cyrillic",
        blocks: &[(0x0400, 0x04ff)],
    },
    Script {
        name: "armenian",
        blocks: &[(0x0530, 0x058f)],
    },
    Script {
        // Devanagari through Myanmar
        name: "brahmic",
        blocks: &[(0x0900, 0x109f)],
    },
    Script {
        name: "georgian",
        blocks: &[(0x10a0, 0x10ff)],
    },
    Script {
        name: "cjk",
        blocks: &[(0x3000, 0x30ff), (0x4e00, 0x9faf), (0xff00, 0xff60)],
    },
    Script {
        name: "hangul",
        blocks: &[(0xac00, 0xd7af)],
    },
];

/// Name of the script `ch` belongs to, if it is one of [`SCRIPT_DATA`].
#[must_use]
pub fn script_from_char(ch: char) -> Option<&'static str> {
    let codepoint = u32::from(ch);
    SCRIPT_DATA
        .iter()
        .find(|script| {
            script
                .blocks
                .iter()
                .any(|&(start, end)| (start..=end).contains(&codepoint))
        })
        .map(|script| script.name)
}

/// Whether `ch` belongs to a supported script.
#[must_use]
pub fn supported_codepoint(ch: char) -> bool {
    script_from_char(ch).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_block_edges() {
        assert_eq!(script_from_char('\u{100}'), Some("latin"));
        assert_eq!(script_from_char('\u{36f}'), Some("latin"));
        assert_eq!(script_from_char('\u{4ff}'), Some("cyrillic"));
        assert_eq!(script_from_char('\u{10ff}'), Some("georgian"));
        assert_eq!(script_from_char('\u{ac00}'), Some("hangul"));
    }

    #[test]
    fn other_characters_are_unsupported() {
        assert!(!supported_codepoint('a'));
        assert!(!supported_codepoint('\u{3b1}'));
        assert!(supported_codepoint('\u{4e2d}'));
    }
}
