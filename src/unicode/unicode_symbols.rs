//! Precomposed letters and their decompositions.
//!
//! Maps each precomposed Latin letter whose marks all have accent commands
//! to its base letter followed by the combining marks, outermost last.

use phf::phf_map;

/// Precomposed character to base letter plus combining marks
pub static UNICODE_SYMBOLS: phf::Map<char, &'static str> = phf_map! {
    '\u{c0}' => "A\u{300}",
    '\u{c1}' => "A\u{301}",
    '\u{c2}' => "A\u{302}",
    '\u{c3}' => "A\u{303}",
    '\u{c4}' => "A\u{308}",
    '\u{c5}' => "A\u{30a}",
    '\u{c8}' => "E\u{300}",
    '\u{c9}' => "E\u{301}",
    '\u{ca}' => "E\u{302}",
    '\u{cb}' => "E\u{308}",
    '\u{cc}' => "I\u{300}",
    '\u{cd}' => "I\u{301}",
    '\u{ce}' => "I\u{302}",
    '\u{cf}' => "I\u{308}",
    '\u{d1}' => "N\u{303}",
    '\u{d2}' => "O\u{300}",
    '\u{d3}' => "O\u{301}",
    '\u{d4}' => "O\u{302}",
    '\u{d5}' => "O\u{303}",
    '\u{d6}' => "O\u{308}",
    '\u{d9}' => "U\u{300}",
    '\u{da}' => "U\u{301}",
    '\u{db}' => "U\u{302}",
    '\u{dc}' => "U\u{308}",
    '\u{dd}' => "Y\u{301}",
    '\u{e0}' => "a\u{300}",
    '\u{e1}' => "a\u{301}",
    '\u{e2}' => "a\u{302}",
    '\u{e3}' => "a\u{303}",
    '\u{e4}' => "a\u{308}",
    '\u{e5}' => "a\u{30a}",
    '\u{e8}' => "e\u{300}",
    '\u{e9}' => "e\u{301}",
    '\u{ea}' => "e\u{302}",
    '\u{eb}' => "e\u{308}",
    '\u{ec}' => "i\u{300}",
    '\u{ed}' => "i\u{301}",
    '\u{ee}' => "i\u{302}",
    '\u{ef}' => "i\u{308}",
    '\u{f1}' => "n\u{303}",
    '\u{f2}' => "o\u{300}",
    '\u{f3}' => "o\u{301}",
    '\u{f4}' => "o\u{302}",
    '\u{f5}' => "o\u{303}",
    '\u{f6}' => "o\u{308}",
    '\u{f9}' => "u\u{300}",
    '\u{fa}' => "u\u{301}",
    '\u{fb}' => "u\u{302}",
    '\u{fc}' => "u\u{308}",
    '\u{fd}' => "y\u{301}",
    '\u{ff}' => "y\u{308}",
    '\u{100}' => "A\u{304}",
    '\u{101}' => "a\u{304}",
    '\u{102}' => "A\u{306}",
    '\u{103}' => "a\u{306}",
    '\u{106}' => "C\u{301}",
    '\u{107}' => "c\u{301}",
    '\u{108}' => "C\u{302}",
    '\u{109}' => "c\u{302}",
    '\u{10a}' => "C\u{307}",
    '\u{10b}' => "c\u{307}",
    '\u{10c}' => "C\u{30c}",
    '\u{10d}' => "c\u{30c}",
    '\u{10e}' => "D\u{30c}",
    '\u{10f}' => "d\u{30c}",
    '\u{112}' => "E\u{304}",
    '\u{113}' => "e\u{304}",
    '\u{114}' => "E\u{306}",
    '\u{115}' => "e\u{306}",
    '\u{116}' => "E\u{307}",
    '\u{117}' => "e\u{307}",
    '\u{11a}' => "E\u{30c}",
    '\u{11b}' => "e\u{30c}",
    '\u{11c}' => "G\u{302}",
    '\u{11d}' => "g\u{302}",
    '\u{11e}' => "G\u{306}",
    '\u{11f}' => "g\u{306}",
    '\u{120}' => "G\u{307}",
    '\u{121}' => "g\u{307}",
    '\u{124}' => "H\u{302}",
    '\u{125}' => "h\u{302}",
    '\u{128}' => "I\u{303}",
    '\u{129}' => "i\u{303}",
    '\u{12a}' => "I\u{304}",
    '\u{12b}' => "i\u{304}",
    '\u{12c}' => "I\u{306}",
    '\u{12d}' => "i\u{306}",
    '\u{130}' => "I\u{307}",
    '\u{134}' => "J\u{302}",
    '\u{135}' => "j\u{302}",
    '\u{139}' => "L\u{301}",
    '\u{13a}' => "l\u{301}",
    '\u{13d}' => "L\u{30c}",
    '\u{13e}' => "l\u{30c}",
    '\u{143}' => "N\u{301}",
    '\u{144}' => "n\u{301}",
    '\u{147}' => "N\u{30c}",
    '\u{148}' => "n\u{30c}",
    '\u{14c}' => "O\u{304}",
    '\u{14d}' => "o\u{304}",
    '\u{14e}' => "O\u{306}",
    '\u{14f}' => "o\u{306}",
    '\u{154}' => "R\u{301}",
    '\u{155}' => "r\u{301}",
    '\u{158}' => "R\u{30c}",
    '\u{159}' => "r\u{30c}",
    '\u{15a}' => "S\u{301}",
    '\u{15b}' => "s\u{301}",
    '\u{15c}' => "S\u{302}",
    '\u{15d}' => "s\u{302}",
    '\u{160}' => "S\u{30c}",
    '\u{161}' => "s\u{30c}",
    '\u{164}' => "T\u{30c}",
    '\u{165}' => "t\u{30c}",
    '\u{168}' => "U\u{303}",
    '\u{169}' => "u\u{303}",
    '\u{16a}' => "U\u{304}",
    '\u{16b}' => "u\u{304}",
    '\u{16c}' => "U\u{306}",
    '\u{16d}' => "u\u{306}",
    '\u{16e}' => "U\u{30a}",
    '\u{16f}' => "u\u{30a}",
    '\u{174}' => "W\u{302}",
    '\u{175}' => "w\u{302}",
    '\u{176}' => "Y\u{302}",
    '\u{177}' => "y\u{302}",
    '\u{178}' => "Y\u{308}",
    '\u{179}' => "Z\u{301}",
    '\u{17a}' => "z\u{301}",
    '\u{17b}' => "Z\u{307}",
    '\u{17c}' => "z\u{307}",
    '\u{17d}' => "Z\u{30c}",
    '\u{17e}' => "z\u{30c}",
    '\u{1cd}' => "A\u{30c}",
    '\u{1ce}' => "a\u{30c}",
    '\u{1cf}' => "I\u{30c}",
    '\u{1d0}' => "i\u{30c}",
    '\u{1d1}' => "O\u{30c}",
    '\u{1d2}' => "o\u{30c}",
    '\u{1d3}' => "U\u{30c}",
    '\u{1d4}' => "u\u{30c}",
    '\u{1d5}' => "U\u{308}\u{304}",
    '\u{1d6}' => "u\u{308}\u{304}",
    '\u{1d7}' => "U\u{308}\u{301}",
    '\u{1d8}' => "u\u{308}\u{301}",
    '\u{1d9}' => "U\u{308}\u{30c}",
    '\u{1da}' => "u\u{308}\u{30c}",
    '\u{1db}' => "U\u{308}\u{300}",
    '\u{1dc}' => "u\u{308}\u{300}",
    '\u{1de}' => "A\u{308}\u{304}",
    '\u{1df}' => "a\u{308}\u{304}",
    '\u{1e0}' => "A\u{307}\u{304}",
    '\u{1e1}' => "a\u{307}\u{304}",
    '\u{1e6}' => "G\u{30c}",
    '\u{1e7}' => "g\u{30c}",
    '\u{1e8}' => "K\u{30c}",
    '\u{1e9}' => "k\u{30c}",
    '\u{1f0}' => "j\u{30c}",
    '\u{1f4}' => "G\u{301}",
    '\u{1f5}' => "g\u{301}",
    '\u{1f8}' => "N\u{300}",
    '\u{1f9}' => "n\u{300}",
    '\u{1fa}' => "A\u{30a}\u{301}",
    '\u{1fb}' => "a\u{30a}\u{301}",
    '\u{21e}' => "H\u{30c}",
    '\u{21f}' => "h\u{30c}",
    '\u{226}' => "A\u{307}",
    '\u{227}' => "a\u{307}",
    '\u{22a}' => "O\u{308}\u{304}",
    '\u{22b}' => "o\u{308}\u{304}",
    '\u{22c}' => "O\u{303}\u{304}",
    '\u{22d}' => "o\u{303}\u{304}",
    '\u{22e}' => "O\u{307}",
    '\u{22f}' => "o\u{307}",
    '\u{230}' => "O\u{307}\u{304}",
    '\u{231}' => "o\u{307}\u{304}",
    '\u{232}' => "Y\u{304}",
    '\u{233}' => "y\u{304}",
    '\u{1e02}' => "B\u{307}",
    '\u{1e03}' => "b\u{307}",
    '\u{1e0a}' => "D\u{307}",
    '\u{1e0b}' => "d\u{307}",
    '\u{1e14}' => "E\u{304}\u{300}",
    '\u{1e15}' => "e\u{304}\u{300}",
    '\u{1e16}' => "E\u{304}\u{301}",
    '\u{1e17}' => "e\u{304}\u{301}",
    '\u{1e1e}' => "F\u{307}",
    '\u{1e1f}' => "f\u{307}",
    '\u{1e20}' => "G\u{304}",
    '\u{1e21}' => "g\u{304}",
    '\u{1e22}' => "H\u{307}",
    '\u{1e23}' => "h\u{307}",
    '\u{1e26}' => "H\u{308}",
    '\u{1e27}' => "h\u{308}",
    '\u{1e2e}' => "I\u{308}\u{301}",
    '\u{1e2f}' => "i\u{308}\u{301}",
    '\u{1e30}' => "K\u{301}",
    '\u{1e31}' => "k\u{301}",
    '\u{1e3e}' => "M\u{301}",
    '\u{1e3f}' => "m\u{301}",
    '\u{1e40}' => "M\u{307}",
    '\u{1e41}' => "m\u{307}",
    '\u{1e44}' => "N\u{307}",
    '\u{1e45}' => "n\u{307}",
    '\u{1e4c}' => "O\u{303}\u{301}",
    '\u{1e4d}' => "o\u{303}\u{301}",
    '\u{1e4e}' => "O\u{303}\u{308}",
    '\u{1e4f}' => "o\u{303}\u{308}",
    '\u{1e50}' => "O\u{304}\u{300}",
    '\u{1e51}' => "o\u{304}\u{300}",
    '\u{1e52}' => "O\u{304}\u{301}",
    '\u{1e53}' => "o\u{304}\u{301}",
    '\u{1e54}' => "P\u{301}",
    '\u{1e55}' => "p\u{301}",
    '\u{1e56}' => "P\u{307}",
    '\u{1e57}' => "p\u{307}",
    '\u{1e58}' => "R\u{307}",
    '\u{1e59}' => "r\u{307}",
    '\u{1e60}' => "S\u{307}",
    '\u{1e61}' => "s\u{307}",
    '\u{1e64}' => "S\u{301}\u{307}",
    '\u{1e65}' => "s\u{301}\u{307}",
    '\u{1e66}' => "S\u{30c}\u{307}",
    '\u{1e67}' => "s\u{30c}\u{307}",
    '\u{1e6a}' => "T\u{307}",
    '\u{1e6b}' => "t\u{307}",
    '\u{1e78}' => "U\u{303}\u{301}",
    '\u{1e79}' => "u\u{303}\u{301}",
    '\u{1e7a}' => "U\u{304}\u{308}",
    '\u{1e7b}' => "u\u{304}\u{308}",
    '\u{1e7c}' => "V\u{303}",
    '\u{1e7d}' => "v\u{303}",
    '\u{1e80}' => "W\u{300}",
    '\u{1e81}' => "w\u{300}",
    '\u{1e82}' => "W\u{301}",
    '\u{1e83}' => "w\u{301}",
    '\u{1e84}' => "W\u{308}",
    '\u{1e85}' => "w\u{308}",
    '\u{1e86}' => "W\u{307}",
    '\u{1e87}' => "w\u{307}",
    '\u{1e8a}' => "X\u{307}",
    '\u{1e8b}' => "x\u{307}",
    '\u{1e8c}' => "X\u{308}",
    '\u{1e8d}' => "x\u{308}",
    '\u{1e8e}' => "Y\u{307}",
    '\u{1e8f}' => "y\u{307}",
    '\u{1e90}' => "Z\u{302}",
    '\u{1e91}' => "z\u{302}",
    '\u{1e97}' => "t\u{308}",
    '\u{1e98}' => "w\u{30a}",
    '\u{1e99}' => "y\u{30a}",
    '\u{1ea4}' => "A\u{302}\u{301}",
    '\u{1ea5}' => "a\u{302}\u{301}",
    '\u{1ea6}' => "A\u{302}\u{300}",
    '\u{1ea7}' => "a\u{302}\u{300}",
    '\u{1eaa}' => "A\u{302}\u{303}",
    '\u{1eab}' => "a\u{302}\u{303}",
    '\u{1eae}' => "A\u{306}\u{301}",
    '\u{1eaf}' => "a\u{306}\u{301}",
    '\u{1eb0}' => "A\u{306}\u{300}",
    '\u{1eb1}' => "a\u{306}\u{300}",
    '\u{1eb4}' => "A\u{306}\u{303}",
    '\u{1eb5}' => "a\u{306}\u{303}",
    '\u{1ebc}' => "E\u{303}",
    '\u{1ebd}' => "e\u{303}",
    '\u{1ebe}' => "E\u{302}\u{301}",
    '\u{1ebf}' => "e\u{302}\u{301}",
    '\u{1ec0}' => "E\u{302}\u{300}",
    '\u{1ec1}' => "e\u{302}\u{300}",
    '\u{1ec4}' => "E\u{302}\u{303}",
    '\u{1ec5}' => "e\u{302}\u{303}",
    '\u{1ed0}' => "O\u{302}\u{301}",
    '\u{1ed1}' => "o\u{302}\u{301}",
    '\u{1ed2}' => "O\u{302}\u{300}",
    '\u{1ed3}' => "o\u{302}\u{300}",
    '\u{1ed6}' => "O\u{302}\u{303}",
    '\u{1ed7}' => "o\u{302}\u{303}",
    '\u{1ef2}' => "Y\u{300}",
    '\u{1ef3}' => "y\u{300}",
    '\u{1ef8}' => "Y\u{303}",
    '\u{1ef9}' => "y\u{303}",
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unicode::UNICODE_ACCENTS;

    #[test]
    fn decompositions_start_with_an_ascii_letter() {
        for (ch, decomposed) in &UNICODE_SYMBOLS {
            let mut chars = decomposed.chars();
            let base = chars.next().unwrap();
            assert!(base.is_ascii_alphabetic(), "{ch:?}");
            assert!(chars.all(|mark| UNICODE_ACCENTS.contains_key(&mark)), "{ch:?}");
        }
    }

    #[test]
    fn common_letters_are_present() {
        assert_eq!(UNICODE_SYMBOLS.get(&'\u{e1}'), Some(&"a\u{301}"));
        assert_eq!(UNICODE_SYMBOLS.get(&'\u{eb}'), Some(&"e\u{308}"));
        // s with dot below and dot above: no command for the lower mark
        assert!(!UNICODE_SYMBOLS.contains_key(&'\u{1e69}'));
    }
}
