//! Symbol tables for math and text mode
//!
//! Maps command names and characters to the font they come from, their
//! [`Group`] and the character actually drawn. Everything the parser does not
//! find here, in the function registry or in the macro table is an undefined
//! control sequence.

mod types;
use crate::namespace::KeyMap;
use phf::phf_map;
pub use types::{Atom, CharInfo, Font, Group, Mode, NonAtom};

/// Symbol table, one map per mode.
#[derive(Debug, Default)]
pub struct Symbols {
    math: KeyMap<String, CharInfo>,
    text: KeyMap<String, CharInfo>,
}

impl Symbols {
    /// The full built-in table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` in `mode`. With `accept_unicode_char` the replacement
    /// character itself is registered too, so `α` parses like `\alpha`.
    pub fn define_symbol(
        &mut self,
        mode: Mode,
        font: Font,
        group: impl Into<Group>,
        replace: Option<char>,
        name: &str,
        accept_unicode_char: bool,
    ) {
        let info = CharInfo {
            font,
            group: group.into(),
            replace,
        };
        let table = match mode {
            Mode::Math => &mut self.math,
            Mode::Text => &mut self.text,
        };
        table.insert(name.to_owned(), info);
        if accept_unicode_char && let Some(ch) = replace {
            table.insert(ch.to_string(), info);
        }
    }

    /// What `name` means in `mode`.
    #[must_use]
    pub fn get(&self, mode: Mode, name: &str) -> Option<&CharInfo> {
        match mode {
            Mode::Math => self.math.get(name),
            Mode::Text => self.text.get(name),
        }
    }

    /// Whether `name` is a symbol in `mode`.
    #[must_use]
    pub fn contains(&self, mode: Mode, name: &str) -> bool {
        self.get(mode, name).is_some()
    }
}

/// Text-mode ligatures
pub static LIGATURES: phf::Map<&'static str, &'static str> = phf_map! {
    "--" => "\u{2013}",
    "---" => "\u{2014}",
    "``" => "\u{201c}",
    "''" => "\u{201d}",
};

type Entries = &'static [(&'static str, char)];

const MAIN_REL: Entries = &[
    ("\\equiv", '\u{2261}'),
    ("\\prec", '\u{227a}'),
    ("\\succ", '\u{227b}'),
    ("\\sim", '\u{223c}'),
    ("\\perp", '\u{22a5}'),
    ("\\preceq", '\u{2aaf}'),
    ("\\succeq", '\u{2ab0}'),
    ("\\simeq", '\u{2243}'),
    ("\\mid", '\u{2223}'),
    ("\\ll", '\u{226a}'),
    ("\\gg", '\u{226b}'),
    ("\\asymp", '\u{224d}'),
    ("\\parallel", '\u{2225}'),
    ("\\bowtie", '\u{22c8}'),
    ("\\smile", '\u{2323}'),
    ("\\sqsubseteq", '\u{2291}'),
    ("\\sqsupseteq", '\u{2292}'),
    ("\\doteq", '\u{2250}'),
    ("\\frown", '\u{2322}'),
    ("\\ni", '\u{220b}'),
    ("\\propto", '\u{221d}'),
    ("\\vdash", '\u{22a2}'),
    ("\\dashv", '\u{22a3}'),
    ("\\models", '\u{22a8}'),
    ("\\approx", '\u{2248}'),
    ("\\neq", '\u{2260}'),
    ("\\leq", '\u{2264}'),
    ("\\geq", '\u{2265}'),
    ("\\in", '\u{2208}'),
    ("\\subset", '\u{2282}'),
    ("\\supset", '\u{2283}'),
    ("\\subseteq", '\u{2286}'),
    ("\\supseteq", '\u{2287}'),
    ("\\leftarrow", '\u{2190}'),
    ("\\uparrow", '\u{2191}'),
    ("\\rightarrow", '\u{2192}'),
    ("\\downarrow", '\u{2193}'),
    ("\\leftrightarrow", '\u{2194}'),
    ("\\updownarrow", '\u{2195}'),
    ("\\mapsto", '\u{21a6}'),
    ("\\Leftarrow", '\u{21d0}'),
    ("\\Uparrow", '\u{21d1}'),
    ("\\Rightarrow", '\u{21d2}'),
    ("\\Downarrow", '\u{21d3}'),
    ("\\Leftrightarrow", '\u{21d4}'),
    ("\\Updownarrow", '\u{21d5}'),
    ("\\longleftarrow", '\u{27f5}'),
    ("\\longrightarrow", '\u{27f6}'),
    ("\\longleftrightarrow", '\u{27f7}'),
    ("\\Longleftarrow", '\u{27f8}'),
    ("\\Longrightarrow", '\u{27f9}'),
    ("\\Longleftrightarrow", '\u{27fa}'),
    ("\\longmapsto", '\u{27fc}'),
];

const MAIN_BIN: Entries = &[
    ("\\pm", '\u{00b1}'),
    ("\\mp", '\u{2213}'),
    ("\\times", '\u{00d7}'),
    ("\\div", '\u{00f7}'),
    ("\\cdot", '\u{22c5}'),
    ("\\circ", '\u{2218}'),
    ("\\bullet", '\u{2219}'),
    ("\\ast", '\u{2217}'),
    ("\\star", '\u{22c6}'),
    ("\\cap", '\u{2229}'),
    ("\\cup", '\u{222a}'),
    ("\\uplus", '\u{228e}'),
    ("\\sqcap", '\u{2293}'),
    ("\\sqcup", '\u{2294}'),
    ("\\vee", '\u{2228}'),
    ("\\lor", '\u{2228}'),
    ("\\wedge", '\u{2227}'),
    ("\\land", '\u{2227}'),
    ("\\setminus", '\u{2216}'),
    ("\\oplus", '\u{2295}'),
    ("\\ominus", '\u{2296}'),
    ("\\otimes", '\u{2297}'),
    ("\\oslash", '\u{2298}'),
    ("\\odot", '\u{2299}'),
    ("\\diamond", '\u{22c4}'),
    ("\\wr", '\u{2240}'),
    ("\\amalg", '\u{2a3f}'),
    ("\\dagger", '\u{2020}'),
    ("\\triangleleft", '\u{25c3}'),
    ("\\triangleright", '\u{25b9}'),
    ("\\bigtriangleup", '\u{25b3}'),
    ("\\bigtriangledown", '\u{25bd}'),
    ("\\bigcirc", '\u{25ef}'),
];

const MAIN_OPEN: Entries = &[
    ("(", '('),
    ("[", '['),
    ("\\lbrack", '['),
    ("\\langle", '\u{27e8}'),
    ("\\lceil", '\u{2308}'),
    ("\\lfloor", '\u{230a}'),
    ("\\lvert", '\u{2223}'),
    ("\\lVert", '\u{2225}'),
];

const MAIN_CLOSE: Entries = &[
    (")", ')'),
    ("]", ']'),
    ("\\rbrack", ']'),
    ("\\rangle", '\u{27e9}'),
    ("\\rceil", '\u{2309}'),
    ("\\rfloor", '\u{230b}'),
    ("\\rvert", '\u{2223}'),
    ("\\rVert", '\u{2225}'),
    ("!", '!'),
    ("?", '?'),
];

// Kept out of the unicode aliases: a bare brace is grouping syntax.
const MAIN_OPEN_BRACE: Entries = &[("\\{", '{'), ("\\lbrace", '{')];
const MAIN_CLOSE_BRACE: Entries = &[("\\}", '}'), ("\\rbrace", '}')];

const MAIN_INNER: Entries = &[
    ("\\ldots", '\u{2026}'),
    ("\\mathellipsis", '\u{2026}'),
    ("\\cdots", '\u{22ef}'),
    ("\\ddots", '\u{22f1}'),
];

const MAIN_TEXTORD: Entries = &[
    ("\\forall", '\u{2200}'),
    ("\\exists", '\u{2203}'),
    ("\\nabla", '\u{2207}'),
    ("\\partial", '\u{2202}'),
    ("\\infty", '\u{221e}'),
    ("\\emptyset", '\u{2205}'),
    ("\\prime", '\u{2032}'),
    ("\\angle", '\u{2220}'),
    ("\\triangle", '\u{25b3}'),
    ("\\neg", '\u{00ac}'),
    ("\\lnot", '\u{00ac}'),
    ("\\top", '\u{22a4}'),
    ("\\bot", '\u{22a5}'),
    ("\\aleph", '\u{2135}'),
    ("\\Re", '\u{211c}'),
    ("\\Im", '\u{2111}'),
    ("\\flat", '\u{266d}'),
    ("\\natural", '\u{266e}'),
    ("\\sharp", '\u{266f}'),
    ("\\spadesuit", '\u{2660}'),
    ("\\heartsuit", '\u{2661}'),
    ("\\diamondsuit", '\u{2662}'),
    ("\\clubsuit", '\u{2663}'),
    ("\\surd", '\u{221a}'),
    ("\\vdots", '\u{22ee}'),
    ("\\degree", '\u{00b0}'),
    ("|", '\u{2223}'),
    ("\\vert", '\u{2223}'),
    ("\\|", '\u{2225}'),
    ("\\Vert", '\u{2225}'),
    ("\\backslash", '\\'),
    ("\\#", '#'),
    ("\\&", '&'),
    ("\\$", '$'),
    ("\\%", '%'),
    ("\\_", '_'),
    ("\\Gamma", '\u{0393}'),
    ("\\Delta", '\u{0394}'),
    ("\\Theta", '\u{0398}'),
    ("\\Lambda", '\u{039b}'),
    ("\\Xi", '\u{039e}'),
    ("\\Pi", '\u{03a0}'),
    ("\\Sigma", '\u{03a3}'),
    ("\\Upsilon", '\u{03a5}'),
    ("\\Phi", '\u{03a6}'),
    ("\\Psi", '\u{03a8}'),
    ("\\Omega", '\u{03a9}'),
];

const MAIN_MATHORD: Entries = &[
    ("\\hbar", '\u{210f}'),
    ("\\ell", '\u{2113}'),
    ("\\wp", '\u{2118}'),
    ("\\imath", '\u{0131}'),
    ("\\jmath", '\u{0237}'),
    ("\\alpha", '\u{03b1}'),
    ("\\beta", '\u{03b2}'),
    ("\\gamma", '\u{03b3}'),
    ("\\delta", '\u{03b4}'),
    ("\\epsilon", '\u{03f5}'),
    ("\\zeta", '\u{03b6}'),
    ("\\eta", '\u{03b7}'),
    ("\\theta", '\u{03b8}'),
    ("\\iota", '\u{03b9}'),
    ("\\kappa", '\u{03ba}'),
    ("\\lambda", '\u{03bb}'),
    ("\\mu", '\u{03bc}'),
    ("\\nu", '\u{03bd}'),
    ("\\xi", '\u{03be}'),
    ("\\omicron", '\u{03bf}'),
    ("\\pi", '\u{03c0}'),
    ("\\rho", '\u{03c1}'),
    ("\\sigma", '\u{03c3}'),
    ("\\tau", '\u{03c4}'),
    ("\\upsilon", '\u{03c5}'),
    ("\\phi", '\u{03d5}'),
    ("\\chi", '\u{03c7}'),
    ("\\psi", '\u{03c8}'),
    ("\\omega", '\u{03c9}'),
    ("\\varepsilon", '\u{03b5}'),
    ("\\vartheta", '\u{03d1}'),
    ("\\varpi", '\u{03d6}'),
    ("\\varrho", '\u{03f1}'),
    ("\\varsigma", '\u{03c2}'),
    ("\\varphi", '\u{03c6}'),
];

const MAIN_ACCENT: Entries = &[
    ("\\acute", '\u{02ca}'),
    ("\\grave", '\u{02cb}'),
    ("\\ddot", '\u{00a8}'),
    ("\\tilde", '\u{02dc}'),
    ("\\bar", '\u{02c9}'),
    ("\\breve", '\u{02d8}'),
    ("\\check", '\u{02c7}'),
    ("\\hat", '\u{02c6}'),
    ("\\vec", '\u{20d7}'),
    ("\\dot", '\u{02d9}'),
    ("\\mathring", '\u{02da}'),
];

const TEXT_ACCENT: Entries = &[
    ("\\'", '\u{02ca}'),
    ("\\`", '\u{02cb}'),
    ("\\^", '\u{02c6}'),
    ("\\~", '\u{02dc}'),
    ("\\=", '\u{02c9}'),
    ("\\u", '\u{02d8}'),
    ("\\.", '\u{02d9}'),
    ("\\\"", '\u{00a8}'),
    ("\\r", '\u{02da}'),
    ("\\v", '\u{02c7}'),
];

const MAIN_OP: Entries = &[
    ("\\coprod", '\u{2210}'),
    ("\\bigvee", '\u{22c1}'),
    ("\\bigwedge", '\u{22c0}'),
    ("\\biguplus", '\u{2a04}'),
    ("\\bigcap", '\u{22c2}'),
    ("\\bigcup", '\u{22c3}'),
    ("\\int", '\u{222b}'),
    ("\\intop", '\u{222b}'),
    ("\\iint", '\u{222c}'),
    ("\\iiint", '\u{222d}'),
    ("\\prod", '\u{220f}'),
    ("\\sum", '\u{2211}'),
    ("\\bigotimes", '\u{2a02}'),
    ("\\bigoplus", '\u{2a01}'),
    ("\\bigodot", '\u{2a00}'),
    ("\\oint", '\u{222e}'),
    ("\\bigsqcup", '\u{2a06}'),
    ("\\smallint", '\u{222b}'),
];

const AMS_REL: Entries = &[
    ("\\leqslant", '\u{2a7d}'),
    ("\\geqslant", '\u{2a7e}'),
    ("\\lesssim", '\u{2272}'),
    ("\\gtrsim", '\u{2273}'),
    ("\\therefore", '\u{2234}'),
    ("\\because", '\u{2235}'),
];

const AMS_TEXTORD: Entries = &[
    ("\\square", '\u{25a1}'),
    ("\\Box", '\u{25a1}'),
    ("\\blacksquare", '\u{25a0}'),
    ("\\checkmark", '\u{2713}'),
    ("\\varnothing", '\u{2205}'),
];

const SPACING: Entries = &[
    (" ", '\u{00a0}'),
    ("\\ ", '\u{00a0}'),
    ("\\space", '\u{00a0}'),
    ("\\nobreakspace", '\u{00a0}'),
];

const TEXT_ORD: Entries = &[
    ("\\{", '{'),
    ("\\}", '}'),
    ("\\#", '#'),
    ("\\&", '&'),
    ("\\$", '$'),
    ("\\%", '%'),
    ("\\_", '_'),
    ("\\textbackslash", '\\'),
    ("\\textendash", '\u{2013}'),
    ("\\textemdash", '\u{2014}'),
    ("\\textquoteleft", '\u{2018}'),
    ("\\textquoteright", '\u{2019}'),
    ("\\textquotedblleft", '\u{201c}'),
    ("\\textquotedblright", '\u{201d}'),
    ("\\dag", '\u{2020}'),
    ("\\textdagger", '\u{2020}'),
    ("`", '\u{2018}'),
    ("'", '\u{2019}'),
    ("\u{2013}", '\u{2013}'),
    ("\u{2014}", '\u{2014}'),
    ("\u{201c}", '\u{201c}'),
    ("\u{201d}", '\u{201d}'),
];

const LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Build the full symbol table.
#[must_use]
pub fn create_symbols() -> Symbols {
    use Mode::{Math, Text};
    let mut symbols = Symbols::new();
    let mut define_all = |mode, font, group: Group, entries: Entries, accept: bool| {
        for &(name, ch) in entries {
            symbols.define_symbol(mode, font, group, Some(ch), name, accept);
        }
    };

    define_all(Math, Font::Main, Atom::Rel.into(), MAIN_REL, true);
    define_all(Math, Font::Main, Atom::Bin.into(), MAIN_BIN, true);
    define_all(Math, Font::Main, Atom::Open.into(), MAIN_OPEN, true);
    define_all(Math, Font::Main, Atom::Close.into(), MAIN_CLOSE, true);
    define_all(Math, Font::Main, Atom::Open.into(), MAIN_OPEN_BRACE, false);
    define_all(Math, Font::Main, Atom::Close.into(), MAIN_CLOSE_BRACE, false);
    define_all(Math, Font::Main, Atom::Inner.into(), MAIN_INNER, true);
    define_all(Math, Font::Main, NonAtom::TextOrd.into(), MAIN_TEXTORD, true);
    define_all(Math, Font::Main, NonAtom::MathOrd.into(), MAIN_MATHORD, true);
    define_all(Math, Font::Main, NonAtom::AccentToken.into(), MAIN_ACCENT, false);
    define_all(Math, Font::Main, NonAtom::OpToken.into(), MAIN_OP, false);
    define_all(Math, Font::Ams, Atom::Rel.into(), AMS_REL, true);
    define_all(Math, Font::Ams, NonAtom::TextOrd.into(), AMS_TEXTORD, true);
    define_all(Text, Font::Main, NonAtom::AccentToken.into(), TEXT_ACCENT, false);
    define_all(Text, Font::Main, NonAtom::TextOrd.into(), TEXT_ORD, false);
    for mode in [Math, Text] {
        define_all(mode, Font::Main, NonAtom::Spacing.into(), SPACING, false);
    }

    // Break controls: invisible, they only mark where lines may break.
    for name in ["\\nobreak", "\\allowbreak"] {
        symbols.define_symbol(Math, Font::Main, NonAtom::Spacing, None, name, false);
    }

    // Characters whose math-mode glyph differs from the ASCII one.
    symbols.define_symbol(Math, Font::Main, Atom::Bin, Some('+'), "+", false);
    symbols.define_symbol(Math, Font::Main, Atom::Bin, Some('\u{2212}'), "-", false);
    symbols.define_symbol(Math, Font::Main, Atom::Bin, Some('\u{2217}'), "*", false);
    symbols.define_symbol(Math, Font::Main, Atom::Bin, Some('\u{2212}'), "\u{2212}", false);
    for (name, ch) in [("=", '='), ("<", '<'), (">", '>'), (":", ':')] {
        symbols.define_symbol(Math, Font::Main, Atom::Rel, Some(ch), name, false);
    }
    for (name, ch) in [(",", ','), (";", ';')] {
        symbols.define_symbol(Math, Font::Main, Atom::Punct, Some(ch), name, false);
    }
    for ch in "0123456789/@.\"".chars() {
        symbols.define_symbol(Math, Font::Main, NonAtom::TextOrd, Some(ch), &ch.to_string(), false);
    }
    for ch in "0123456789!@*()-=+\";:?/.,[]<>|".chars() {
        symbols.define_symbol(Text, Font::Main, NonAtom::TextOrd, Some(ch), &ch.to_string(), false);
    }
    for ch in LETTERS.chars() {
        let name = ch.to_string();
        symbols.define_symbol(Math, Font::Main, NonAtom::MathOrd, Some(ch), &name, false);
        symbols.define_symbol(Text, Font::Main, NonAtom::TextOrd, Some(ch), &name, false);
    }

    log::debug!(
        "symbol table built: {} math, {} text entries",
        symbols.math.len(),
        symbols.text.len()
    );
    symbols
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greek_letters_are_math_ords_with_unicode_aliases() {
        let symbols = create_symbols();
        let alpha = symbols.get(Mode::Math, "\\alpha").unwrap();
        assert_eq!(alpha.group, Group::NonAtom(NonAtom::MathOrd));
        assert_eq!(alpha.replace, Some('\u{03b1}'));
        assert_eq!(symbols.get(Mode::Math, "\u{03b1}"), Some(alpha));
        assert!(symbols.get(Mode::Text, "\\alpha").is_none());
    }

    #[test]
    fn bare_braces_are_not_symbols() {
        let symbols = create_symbols();
        let open = symbols.get(Mode::Math, "\\{").unwrap();
        assert_eq!(open.group, Group::Atom(Atom::Open));
        assert_eq!(open.replace, Some('{'));
        assert!(symbols.get(Mode::Math, "\\rbrace").is_some());
        for mode in [Mode::Math, Mode::Text] {
            assert!(symbols.get(mode, "{").is_none());
            assert!(symbols.get(mode, "}").is_none());
        }
    }

    #[test]
    fn operators_carry_their_atom_class() {
        let symbols = create_symbols();
        let plus = symbols.get(Mode::Math, "+").unwrap();
        assert_eq!(plus.group, Group::Atom(Atom::Bin));
        let minus = symbols.get(Mode::Math, "-").unwrap();
        assert_eq!(minus.replace, Some('\u{2212}'));
        let eq = symbols.get(Mode::Math, "=").unwrap();
        assert_eq!(eq.group, Group::Atom(Atom::Rel));
        let semi = symbols.get(Mode::Math, ";").unwrap();
        assert_eq!(semi.group, Group::Atom(Atom::Punct));
    }

    #[test]
    fn letters_and_digits_exist_in_both_modes() {
        let symbols = create_symbols();
        for ch in LETTERS.chars().chain('0'..='9') {
            let name = ch.to_string();
            assert!(symbols.contains(Mode::Math, &name), "math {name}");
            assert!(symbols.contains(Mode::Text, &name), "text {name}");
        }
    }

    #[test]
    fn spacing_symbols_exist_in_both_modes() {
        let symbols = create_symbols();
        for mode in [Mode::Math, Mode::Text] {
            let space = symbols.get(mode, "\\ ").unwrap();
            assert_eq!(space.group, Group::NonAtom(NonAtom::Spacing));
        }
    }

    #[test]
    fn ligatures() {
        assert_eq!(LIGATURES.get("--"), Some(&"\u{2013}"));
        assert_eq!(LIGATURES.get("``"), Some(&"\u{201c}"));
        assert!(LIGATURES.get("-").is_none());
    }
}
