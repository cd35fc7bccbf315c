//! Layout options
//!
//! An [`Options`] value describes the context a node is laid out in: style,
//! size, color and font. It is never mutated while laying out; the `having_*`
//! and `with_*` methods return adjusted copies for child nodes.

use bon::bon;
use strum::{AsRefStr, EnumString};

use crate::font_metrics::{FontMetrics, get_global_metrics};
use crate::style::Style;

/// Weight selected by `\textbf` and friends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum FontWeight {
    /// `\textbf`
    TextBf,
    /// `\textmd`
    TextMd,
    /// Inherit the font's weight
    #[default]
    #[strum(serialize = "")]
    Normal,
}

/// Shape selected by `\textit` and friends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum FontShape {
    /// `\textit`
    TextIt,
    /// `\textup`
    TextUp,
    /// Inherit the font's shape
    #[default]
    #[strum(serialize = "")]
    Normal,
}

/// Size index for each of text, script and scriptscript style, per size
/// index 1 to 11 (`\tiny` to `\Huge`)
const SIZE_STYLE_MAP: [[usize; 3]; 11] = [
    [1, 1, 1],
    [2, 1, 1],
    [3, 1, 1],
    [4, 2, 1],
    [5, 2, 1],
    [6, 3, 1],
    [7, 4, 2],
    [8, 6, 3],
    [9, 7, 6],
    [10, 8, 7],
    [11, 10, 9],
];

/// Scale of each size index relative to `\normalsize`
pub const SIZE_MULTIPLIERS: [f64; 11] = [
    0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 1.2, 1.44, 1.728, 2.074, 2.488,
];

const fn size_at_style(size: usize, style: Style) -> usize {
    if style.size() < 2 {
        size
    } else {
        SIZE_STYLE_MAP[size - 1][style.size() - 1]
    }
}

const fn multiplier(size: usize) -> f64 {
    let index = if size > SIZE_MULTIPLIERS.len() {
        SIZE_MULTIPLIERS.len()
    } else if size == 0 {
        1
    } else {
        size
    };
    SIZE_MULTIPLIERS[index - 1]
}

/// Layout context threaded through the builders.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Current math style
    pub style: Style,
    /// Color in effect, if any was set
    pub color: Option<String>,
    /// Current size index, 1 to 11
    pub size: usize,
    /// Size index of the enclosing text, before any style shrinking
    pub text_size: usize,
    /// Math font command in effect, e.g. `mathbf`; empty for the default
    pub font: String,
    /// Text font family in effect, e.g. `textsf`
    pub font_family: String,
    /// Text weight in effect
    pub font_weight: FontWeight,
    /// Text shape in effect
    pub font_shape: FontShape,
    /// Scale of `size` relative to `\normalsize`
    pub size_multiplier: f64,
    /// Upper bound, in ems, for user-specified sizes
    pub max_size: f64,
    /// Floor for rule thicknesses, in ems
    pub min_rule_thickness: f64,
}

#[bon]
impl Options {
    /// Options at `style`; size defaults to `\normalsize`.
    #[builder]
    pub fn new(
        style: Style,
        color: Option<String>,
        size: Option<usize>,
        max_size: Option<f64>,
        min_rule_thickness: Option<f64>,
    ) -> Self {
        let size = size.unwrap_or(Self::BASESIZE);
        Self {
            style,
            color,
            size,
            text_size: size,
            font: String::new(),
            font_family: String::new(),
            font_weight: FontWeight::Normal,
            font_shape: FontShape::Normal,
            size_multiplier: multiplier(size),
            max_size: max_size.unwrap_or(f64::INFINITY),
            min_rule_thickness: min_rule_thickness.unwrap_or(0.0),
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::builder().style(Style::Text).build()
    }
}

impl Options {
    /// Size index of `\normalsize`
    pub const BASESIZE: usize = 6;

    fn resized(&self, style: Style, size: usize) -> Self {
        let mut options = self.clone();
        options.style = style;
        options.size = size;
        options.size_multiplier = multiplier(size);
        options
    }

    /// Options for a child in `style`, sized relative to the text size.
    #[must_use]
    pub fn having_style(&self, style: Style) -> Self {
        if self.style == style {
            self.clone()
        } else {
            self.resized(style, size_at_style(self.text_size, style))
        }
    }

    /// Same style, cramped.
    #[must_use]
    pub fn having_cramped_style(&self) -> Self {
        self.having_style(self.style.cramp())
    }

    /// Options for a child at `style` as if the text size were `\normalsize`.
    /// Defaults to the text version of the current style.
    #[must_use]
    pub fn having_base_style(&self, style: Option<Style>) -> Self {
        let style = style.unwrap_or_else(|| self.style.text());
        let want_size = size_at_style(Self::BASESIZE, style);
        if self.size == want_size && self.text_size == Self::BASESIZE && self.style == style {
            self.clone()
        } else {
            self.resized(style, want_size)
        }
    }

    /// Options resetting the size to `\normalsize` at the current style's
    /// level, used for glyphs that carry their own size such as radicals.
    #[must_use]
    pub fn having_base_sizing(&self) -> Self {
        let size = match self.style.size() {
            2 => 3,
            3 => 1,
            _ => Self::BASESIZE,
        };
        self.resized(self.style.text(), size)
    }

    /// Copy with a color.
    #[must_use]
    pub fn with_color(&self, color: String) -> Self {
        let mut options = self.clone();
        options.color = Some(color);
        options
    }

    /// Copy with a math font command.
    #[must_use]
    pub fn with_font(&self, font: String) -> Self {
        let mut options = self.clone();
        options.font = font;
        options
    }

    /// Copy with a text family; clears the math font.
    #[must_use]
    pub fn with_text_font_family(&self, font_family: String) -> Self {
        let mut options = self.clone();
        options.font_family = font_family;
        options.font = String::new();
        options
    }

    /// Copy with a text weight; clears the math font.
    #[must_use]
    pub fn with_text_font_weight(&self, font_weight: FontWeight) -> Self {
        let mut options = self.clone();
        options.font_weight = font_weight;
        options.font = String::new();
        options
    }

    /// Copy with a text shape; clears the math font.
    #[must_use]
    pub fn with_text_font_shape(&self, font_shape: FontShape) -> Self {
        let mut options = self.clone();
        options.font_shape = font_shape;
        options.font = String::new();
        options
    }

    /// Classes marking a size change from `old` to `self`.
    #[must_use]
    pub fn sizing_classes(&self, old: &Self) -> Vec<String> {
        if old.size == self.size {
            Vec::new()
        } else {
            vec![
                "sizing".to_owned(),
                format!("reset-size{}", old.size),
                format!("size{}", self.size),
            ]
        }
    }

    /// Classes resetting the current size back to `\normalsize`.
    #[must_use]
    pub fn base_sizing_classes(&self) -> Vec<String> {
        if self.size == Self::BASESIZE {
            Vec::new()
        } else {
            vec![
                "sizing".to_owned(),
                format!("reset-size{}", self.size),
                format!("size{}", Self::BASESIZE),
            ]
        }
    }

    /// Global parameters for the current size tier.
    #[must_use]
    pub fn font_metrics(&self) -> &'static FontMetrics {
        get_global_metrics(self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_styles_shrink_the_size() {
        let options = Options::default();
        assert_eq!(options.size, 6);
        assert_eq!(options.size_multiplier, 1.0);

        let sup = options.having_style(options.style.sup());
        assert_eq!(sup.style, Style::Script);
        assert_eq!(sup.size, 3);
        assert_eq!(sup.size_multiplier, 0.7);

        let supsup = sup.having_style(sup.style.sup());
        assert_eq!(supsup.size, 1);
        assert_eq!(supsup.size_multiplier, 0.5);
    }

    #[test]
    fn base_style_ignores_text_size() {
        let options = Options::builder().style(Style::Display).size(8).build();
        let base = options.having_base_style(Some(Style::Script));
        assert_eq!(base.size, 3);
        let sizing = options.having_base_sizing();
        assert_eq!(sizing.size, 6);
        assert_eq!(sizing.style, Style::Display);
    }

    #[test]
    fn sizing_classes_only_on_change() {
        let options = Options::default();
        assert!(options.sizing_classes(&options).is_empty());
        let script = options.having_style(Style::Script);
        assert_eq!(
            script.sizing_classes(&options),
            ["sizing", "reset-size6", "size3"]
        );
        assert_eq!(script.base_sizing_classes(), ["sizing", "reset-size3", "size6"]);
    }

    #[test]
    fn text_font_changes_clear_the_math_font() {
        let options = Options::default().with_font("mathbf".to_owned());
        let text = options.with_text_font_weight(FontWeight::TextBf);
        assert!(text.font.is_empty());
        assert_eq!(text.font_weight.as_ref(), "textbf");
        assert_eq!("textit".parse::<FontShape>().unwrap(), FontShape::TextIt);
    }

    #[test]
    fn metrics_follow_the_size_tier() {
        let options = Options::default();
        assert_eq!(options.font_metrics().sup1, 0.413);
        let script = options.having_style(Style::Script);
        assert_eq!(script.font_metrics().sup1, 0.503);
    }
}
