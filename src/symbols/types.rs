use strum::{AsRefStr, Display, EnumString};

/// Whether input is read as math or as text.
///
/// Symbol lookup, spacing and the set of allowed commands all depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// Math mode
    Math,
    /// Text mode, as inside `\text`
    Text,
}

/// Font family a symbol is drawn from, before any `\mathbf`-style override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(ascii_case_insensitive)]
pub enum Font {
    /// The Main and Math fonts
    Main,
    /// The AMS font
    Ams,
}

/// Atom classes of symbols that take part in inter-atom spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Atom {
    /// Binary operator
    Bin,
    /// Closing delimiter
    Close,
    /// Fraction-like inner atom
    Inner,
    /// Opening delimiter
    Open,
    /// Punctuation
    Punct,
    /// Relation
    Rel,
}

/// Symbol kinds that are not atoms in their own right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonAtom {
    /// Glyph used by an accent command, e.g. `\hat`
    AccentToken,
    /// Italic-by-default math letter
    MathOrd,
    /// Glyph used by a big operator, e.g. `\sum`
    OpToken,
    /// Fixed-width space
    Spacing,
    /// Upright ordinary symbol
    TextOrd,
}

/// Classification of a symbol, deciding which parse node it becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    /// Spaced by its atom class
    Atom(Atom),
    /// Not spaced as an atom
    NonAtom(NonAtom),
}

impl From<Atom> for Group {
    fn from(atom: Atom) -> Self {
        Self::Atom(atom)
    }
}

impl From<NonAtom> for Group {
    fn from(non_atom: NonAtom) -> Self {
        Self::NonAtom(non_atom)
    }
}

/// What the symbol table knows about one name in one mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharInfo {
    /// Font the glyph comes from
    pub font: Font,
    /// Symbol kind
    pub group: Group,
    /// Character to draw instead of the name itself
    pub replace: Option<char>,
}
