//! Font metrics
//!
//! Global TeX font parameters (the sigma and xi values of cmsy10/cmsy7/cmsy5
//! and cmex10) for each of the three size tiers, and lookup of per-character
//! metrics for the bundled fonts.
//!
//! TeX keeps one set of parameters for textstyle (size index 5 and higher,
//! >=9pt), one for scriptstyle (size index 3 and 4, 7-8pt) and one for
//! scriptscriptstyle (size index 1 and 2, 5-6pt).

use crate::font_metrics_data::FONT_METRICS_INDEX;
use crate::types::{Mode, ParseError, ParseErrorKind};
use crate::unicode::supported_codepoint;
use phf::phf_map;

/// Index into [`FONT_METRICS`]: 0 = text, 1 = script, 2 = scriptscript
pub type FontSizeIndex = usize;

/// Dimensions of a single glyph, in ems.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterMetrics {
    /// Extent below the baseline
    pub depth: f64,
    /// Extent above the baseline
    pub height: f64,
    /// Italic correction
    pub italic: f64,
    /// Accent shift
    pub skew: f64,
    /// Advance width
    pub width: f64,
}

impl CharacterMetrics {
    /// Metrics in the order the tables store them.
    #[must_use]
    pub const fn new(depth: f64, height: f64, italic: f64, skew: f64, width: f64) -> Self {
        Self {
            depth,
            height,
            italic,
            skew,
            width,
        }
    }
}

/// TeX font parameters for one size tier.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    /// sigma5
    pub x_height: f64,
    /// sigma6, one em
    pub quad: f64,
    /// sigma8, numerator shift in display style
    pub num1: f64,
    /// sigma9, numerator shift with a bar
    pub num2: f64,
    /// sigma10, numerator shift without a bar
    pub num3: f64,
    /// sigma11, denominator shift in display style
    pub denom1: f64,
    /// sigma12, denominator shift otherwise
    pub denom2: f64,
    /// sigma13, superscript shift in display style
    pub sup1: f64,
    /// sigma14, superscript shift in uncramped styles
    pub sup2: f64,
    /// sigma15, superscript shift in cramped styles
    pub sup3: f64,
    /// sigma16, subscript shift with no superscript
    pub sub1: f64,
    /// sigma17, subscript shift alongside a superscript
    pub sub2: f64,
    /// sigma18
    pub sup_drop: f64,
    /// sigma19
    pub sub_drop: f64,
    /// sigma20, delimiter size in display style
    pub delim1: f64,
    /// sigma21, delimiter size otherwise
    pub delim2: f64,
    /// sigma22, height of the math axis
    pub axis_height: f64,
    /// xi8
    pub default_rule_thickness: f64,
    /// xi9
    pub big_op_spacing1: f64,
    /// xi10
    pub big_op_spacing2: f64,
    /// xi11
    pub big_op_spacing3: f64,
    /// xi12
    pub big_op_spacing4: f64,
    /// xi13, padding above and below limits
    pub big_op_spacing5: f64,
    /// Thickness of the `\sqrt` vinculum, which TeX takes from the radical
    /// glyph rather than from `default_rule_thickness`
    pub sqrt_rule_thickness: f64,
    /// Points per em at this tier; TeX's 10pt design size
    pub pt_per_em: f64,
    /// `quad / 18`
    pub css_em_per_mu: f64,
}

#[allow(clippy::too_many_arguments)]
const fn tier(
    x_height: f64,
    quad: f64,
    [num1, num2, num3]: [f64; 3],
    [denom1, denom2]: [f64; 2],
    [sup1, sup2, sup3]: [f64; 3],
    [sub1, sub2]: [f64; 2],
    [sup_drop, sub_drop]: [f64; 2],
    [delim1, delim2]: [f64; 2],
    default_rule_thickness: f64,
    [big_op_spacing4, big_op_spacing5]: [f64; 2],
) -> FontMetrics {
    FontMetrics {
        x_height,
        quad,
        num1,
        num2,
        num3,
        denom1,
        denom2,
        sup1,
        sup2,
        sup3,
        sub1,
        sub2,
        sup_drop,
        sub_drop,
        delim1,
        delim2,
        axis_height: 0.25,
        default_rule_thickness,
        big_op_spacing1: 0.111,
        big_op_spacing2: 0.166,
        big_op_spacing3: 0.2,
        big_op_spacing4,
        big_op_spacing5,
        sqrt_rule_thickness: 0.04,
        pt_per_em: 10.0,
        css_em_per_mu: quad / 18.0,
    }
}

/// Global metrics for the text, script and scriptscript tiers, computed once.
pub static FONT_METRICS: [FontMetrics; 3] = [
    tier(
        0.431,
        1.0,
        [0.677, 0.394, 0.444],
        [0.686, 0.345],
        [0.413, 0.363, 0.289],
        [0.15, 0.247],
        [0.386, 0.05],
        [2.39, 1.01],
        0.04,
        [0.6, 0.1],
    ),
    tier(
        0.431,
        1.171,
        [0.732, 0.384, 0.471],
        [0.752, 0.344],
        [0.503, 0.431, 0.286],
        [0.143, 0.286],
        [0.353, 0.071],
        [1.7, 1.157],
        0.049,
        [0.611, 0.143],
    ),
    tier(
        0.431,
        1.472,
        [0.925, 0.387, 0.504],
        [1.025, 0.532],
        [0.504, 0.404, 0.294],
        [0.2, 0.4],
        [0.494, 0.1],
        [1.98, 1.42],
        0.049,
        [0.611, 0.143],
    ),
];

/// Tier for a size index (1 to 11).
#[must_use]
pub const fn size_index_tier(size: usize) -> FontSizeIndex {
    if size >= 5 {
        0
    } else if size >= 3 {
        1
    } else {
        2
    }
}

/// Global font metrics for a size index.
#[must_use]
pub fn get_global_metrics(size: usize) -> &'static FontMetrics {
    &FONT_METRICS[size_index_tier(size)]
}

/// Rough stand-ins for letters the bundled fonts lack. They ignore the
/// height of any accent on the letter.
const EXTRA_CHARACTER_MAP: phf::Map<char, char> = phf_map! {
    '\u{c5}' => 'A',
    '\u{c6}' => 'A',
    '\u{c7}' => 'C',
    '\u{d0}' => 'D',
    '\u{d8}' => 'O',
    '\u{de}' => 'o',
    '\u{df}' => 'B',
    '\u{e5}' => 'a',
    '\u{e6}' => 'a',
    '\u{e7}' => 'c',
    '\u{f0}' => 'd',
    '\u{f8}' => 'o',
    '\u{fe}' => 'o',
};

/// Metrics for `character` in `font` (e.g. `"Main-Regular"`).
///
/// Falls back to a stand-in letter for some Latin-1 characters, and in text
/// mode to the metrics of `M` for scripts the fonts don't cover. Returns
/// `Ok(None)` when nothing fits and an error when the font is unknown.
pub fn get_character_metrics(
    character: char,
    font: &str,
    mode: Mode,
) -> Result<Option<&'static CharacterMetrics>, ParseError> {
    let table = FONT_METRICS_INDEX.get(font).ok_or_else(|| {
        ParseError::new(ParseErrorKind::UnknownFont {
            font: font.to_owned(),
        })
    })?;

    if let Some(metrics) = table.get(&u32::from(character)) {
        return Ok(Some(metrics));
    }
    if let Some(&stand_in) = EXTRA_CHARACTER_MAP.get(&character)
        && let Some(metrics) = table.get(&u32::from(stand_in))
    {
        return Ok(Some(metrics));
    }
    if mode == Mode::Text && supported_codepoint(character) {
        return Ok(table.get(&u32::from('M')));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_follow_size_index() {
        assert_eq!(size_index_tier(6), 0);
        assert_eq!(size_index_tier(11), 0);
        assert_eq!(size_index_tier(4), 1);
        assert_eq!(size_index_tier(3), 1);
        assert_eq!(size_index_tier(1), 2);
        assert_eq!(get_global_metrics(6).sup1, 0.413);
        assert_eq!(get_global_metrics(3).num2, 0.384);
        assert_eq!(get_global_metrics(1).denom1, 1.025);
    }

    #[test]
    fn em_per_mu_is_an_eighteenth_of_a_quad() {
        for metrics in &FONT_METRICS {
            assert!((metrics.css_em_per_mu * 18.0 - metrics.quad).abs() < 1e-12);
        }
    }

    #[test]
    fn looks_up_math_italic_x() {
        let m = get_character_metrics('x', "Math-Italic", Mode::Math)
            .unwrap()
            .unwrap();
        assert_eq!(m.height, 0.43056);
        assert_eq!(m.skew, 0.02778);
        assert_eq!(m.width, 0.57153);
    }

    #[test]
    fn falls_back_for_latin1_and_foreign_text() {
        let aring = get_character_metrics('\u{e5}', "Main-Regular", Mode::Math)
            .unwrap()
            .unwrap();
        let a = get_character_metrics('a', "Main-Regular", Mode::Math)
            .unwrap()
            .unwrap();
        assert_eq!(aring, a);

        let cjk = get_character_metrics('\u{4e2d}', "Main-Regular", Mode::Text).unwrap();
        assert!(cjk.is_some());
        let cjk = get_character_metrics('\u{4e2d}', "Main-Regular", Mode::Math).unwrap();
        assert!(cjk.is_none());
    }

    #[test]
    fn unknown_font_is_an_error() {
        assert!(get_character_metrics('x', "Nope-Regular", Mode::Math).is_err());
    }
}
