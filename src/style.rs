//! The eight TeX math styles and the transitions between them.
//!
//! Each style is display, text, script or scriptscript, either cramped or
//! not. Superscripts, subscripts and fraction parts derive their style from
//! the enclosing one through fixed lookup tables (TeXbook, Appendix G).

use strum::{AsRefStr, EnumIter};

use crate::types::StyleVariant;

/// A TeX math style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter)]
pub enum Style {
    /// Display style, D
    Display,
    /// D'
    DisplayCramped,
    /// Text style, T
    Text,
    /// T'
    TextCramped,
    /// Script style, S
    Script,
    /// S'
    ScriptCramped,
    /// Scriptscript style, SS
    ScriptScript,
    /// SS'
    ScriptScriptCramped,
}

use Style::{
    Display as D, DisplayCramped as DC, Script as S, ScriptCramped as SC, ScriptScript as SS,
    ScriptScriptCramped as SSC, Text as T, TextCramped as TC,
};

const SUP: [Style; 8] = [S, SC, S, SC, SS, SSC, SS, SSC];
const SUB: [Style; 8] = [SC, SC, SC, SC, SSC, SSC, SSC, SSC];
const FRAC_NUM: [Style; 8] = [T, TC, S, SC, SS, SSC, SS, SSC];
const FRAC_DEN: [Style; 8] = [TC, TC, SC, SC, SSC, SSC, SSC, SSC];
const CRAMP: [Style; 8] = [DC, DC, TC, TC, SC, SC, SSC, SSC];
const TEXT: [Style; 8] = [D, DC, T, TC, T, TC, T, TC];

impl Style {
    const fn id(self) -> usize {
        self as usize
    }

    /// 0 for display, 1 for text, 2 for script, 3 for scriptscript
    #[must_use]
    pub const fn size(self) -> usize {
        self.id() / 2
    }

    /// Whether superscripts are lowered.
    #[must_use]
    pub const fn cramped(self) -> bool {
        self.id() % 2 == 1
    }

    /// Style of a superscript on a base in this style
    #[must_use]
    pub const fn sup(self) -> Self {
        SUP[self.id()]
    }

    /// Style of a subscript on a base in this style
    #[must_use]
    pub const fn sub(self) -> Self {
        SUB[self.id()]
    }

    /// Style of a numerator.
    #[must_use]
    pub const fn frac_num(self) -> Self {
        FRAC_NUM[self.id()]
    }

    /// Style of a denominator.
    #[must_use]
    pub const fn frac_den(self) -> Self {
        FRAC_DEN[self.id()]
    }

    /// Cramped version of this style; cramping twice changes nothing.
    #[must_use]
    pub const fn cramp(self) -> Self {
        CRAMP[self.id()]
    }

    /// Text or display version of this style
    #[must_use]
    pub const fn text(self) -> Self {
        TEXT[self.id()]
    }

    /// Script and scriptscript styles use the tight spacing table.
    #[must_use]
    pub const fn is_tight(self) -> bool {
        self.size() >= 2
    }
}

impl From<StyleVariant> for Style {
    fn from(variant: StyleVariant) -> Self {
        match variant {
            StyleVariant::Display => D,
            StyleVariant::Text => T,
            StyleVariant::Script => S,
            StyleVariant::ScriptScript => SS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn size_and_cramping_follow_the_declaration_order() {
        assert_eq!(Style::Display.size(), 0);
        assert_eq!(Style::TextCramped.size(), 1);
        assert!(Style::TextCramped.cramped());
        assert!(!Style::Script.cramped());
        assert_eq!(Style::ScriptScriptCramped.size(), 3);
    }

    #[test]
    fn cramp_is_idempotent() {
        for style in Style::iter() {
            assert_eq!(style.cramp().cramp(), style.cramp());
            assert!(style.cramp().cramped());
            assert_eq!(style.cramp().size(), style.size());
        }
    }

    #[test]
    fn transitions() {
        assert_eq!(Style::Display.sup(), Style::Script);
        assert_eq!(Style::Display.sub(), Style::ScriptCramped);
        assert_eq!(Style::Text.frac_num(), Style::Script);
        assert_eq!(Style::Text.frac_den(), Style::ScriptCramped);
        assert_eq!(Style::Script.sup().sub(), Style::ScriptScriptCramped);
        assert_eq!(Style::ScriptScript.text(), Style::Text);
        assert!(Style::Script.is_tight());
        assert!(!Style::TextCramped.is_tight());
    }

    #[test]
    fn scripts_never_grow() {
        for style in Style::iter() {
            assert!(style.sup().size() >= style.size());
            assert!(style.sub().size() >= style.size());
            assert!(style.sub().cramped());
        }
    }
}
