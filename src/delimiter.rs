//! Delimiters of every size
//!
//! A delimiter is drawn in one of three ways: a Main-Regular glyph set in
//! text, script or scriptscript style; a glyph from one of the Size1 to
//! Size4 fonts; or a stack of glyph pieces (top, repeated middle sections,
//! optional center piece, bottom) as tall as needed. Which one is used comes
//! from walking a per-delimiter sequence of candidates until one is tall
//! enough. Radicals are sized the same way but drawn as named images.

use phf::{Set, phf_set};

use crate::box_tree::{PathNode, RenderNode, Span, SvgNode};
use crate::build_common::{
    VListChild, VListElem, VListParam, lookup_symbol, make_span, make_symbol, make_v_list,
};
use crate::context::TypesetContext;
use crate::font_metrics::CharacterMetrics;
use crate::options::Options;
use crate::style::Style;
use crate::symbols::Mode;
use crate::types::{ParseError, ParseErrorKind};

/// Total height of the delimiters of `\big`, `\Big`, `\bigg` and `\Bigg`,
/// by size index.
pub const SIZE_TO_MAX_HEIGHT: [f64; 5] = [0.0, 1.2, 1.8, 2.4, 3.0];

/// Padding above the surd vinculum, in image units
const VB_PAD: f64 = 80.0;

/// Padding above the surd, in ems
const EM_PAD: f64 = 0.08;

/// A way of drawing a delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimiterType {
    /// Main-Regular glyph in the given style
    Small(Style),
    /// Glyph from the Size1 to Size4 font
    Large(usize),
    /// Glyph pieces stacked to any height
    Stack,
}

impl DelimiterType {
    fn font(self) -> String {
        match self {
            Self::Small(_) => "Main-Regular".to_owned(),
            Self::Large(size) => format!("Size{size}-Regular"),
            Self::Stack => "Size4-Regular".to_owned(),
        }
    }
}

/// A radical image, with what the radical builder needs to place it.
#[derive(Debug)]
pub struct SqrtImage {
    /// The surd and vinculum image
    pub span: Span,
    /// Thickness of the vinculum
    pub rule_width: f64,
    /// Horizontal space the surd takes before the radicand
    pub advance_width: f64,
}

/// Delimiters with glyphs in every Size font and pieces to stack.
static STACK_LARGE_DELIMITERS: Set<&'static str> = phf_set!(
    "(", "\\lparen", ")", "\\rparen", "[", "\\lbrack", "]", "\\rbrack", "\\{", "\\lbrace", "\\}",
    "\\rbrace", "\\lfloor", "\\rfloor", "\u{230a}", "\u{230b}", "\\lceil", "\\rceil", "\u{2308}",
    "\u{2309}", "\\surd",
);

/// Delimiters with no large glyphs, only pieces.
static STACK_ALWAYS_DELIMITERS: Set<&'static str> = phf_set!(
    "\\uparrow",
    "\\downarrow",
    "\\updownarrow",
    "\\Uparrow",
    "\\Downarrow",
    "\\Updownarrow",
    "|",
    "\\|",
    "\\vert",
    "\\Vert",
    "\\lvert",
    "\\rvert",
    "\\lVert",
    "\\rVert",
);

/// Delimiters that cannot be stacked and stop at the Size4 glyph.
static STACK_NEVER_DELIMITERS: Set<&'static str> =
    phf_set!("<", ">", "\\langle", "\\rangle", "/", "\\backslash", "\\lt", "\\gt");

const STACK_NEVER_SEQUENCE: &[DelimiterType] = &[
    DelimiterType::Small(Style::ScriptScript),
    DelimiterType::Small(Style::Script),
    DelimiterType::Small(Style::Text),
    DelimiterType::Large(1),
    DelimiterType::Large(2),
    DelimiterType::Large(3),
    DelimiterType::Large(4),
];

const STACK_ALWAYS_SEQUENCE: &[DelimiterType] = &[
    DelimiterType::Small(Style::ScriptScript),
    DelimiterType::Small(Style::Script),
    DelimiterType::Small(Style::Text),
    DelimiterType::Stack,
];

const STACK_LARGE_SEQUENCE: &[DelimiterType] = &[
    DelimiterType::Small(Style::ScriptScript),
    DelimiterType::Small(Style::Script),
    DelimiterType::Small(Style::Text),
    DelimiterType::Large(1),
    DelimiterType::Large(2),
    DelimiterType::Large(3),
    DelimiterType::Large(4),
    DelimiterType::Stack,
];

/// Whether `delim` can be sized at all.
#[must_use]
pub fn is_sizable(delim: &str) -> bool {
    let delim = normalize(delim);
    STACK_LARGE_DELIMITERS.contains(delim)
        || STACK_ALWAYS_DELIMITERS.contains(delim)
        || STACK_NEVER_DELIMITERS.contains(delim)
}

/// `<` and `>` are angle brackets when used as delimiters.
fn normalize(delim: &str) -> &str {
    match delim {
        "<" | "\\lt" | "\u{27e8}" => "\\langle",
        ">" | "\\gt" | "\u{27e9}" => "\\rangle",
        _ => delim,
    }
}

fn get_metrics(
    ctx: &TypesetContext,
    symbol: &str,
    font: &str,
    mode: Mode,
) -> Result<CharacterMetrics, ParseError> {
    lookup_symbol(ctx, symbol, font, mode)?
        .metrics
        .copied()
        .ok_or_else(|| {
            ParseError::new(ParseErrorKind::UnsupportedSymbolFont {
                symbol: symbol.to_owned(),
                font: font.to_owned(),
            })
        })
}

/// Put a delimiter in `to_style`, scaling its extents to the outer size.
fn style_wrap(delim: RenderNode, to_style: Style, options: &Options, classes: &[String]) -> Span {
    let new_options = options.having_base_style(Some(to_style));
    let mut all = classes.to_vec();
    all.extend(new_options.sizing_classes(options));
    let mut span = make_span(all, vec![delim], Some(options), None);

    let multiplier = new_options.size_multiplier / options.size_multiplier;
    span.height *= multiplier;
    span.depth *= multiplier;
    span.max_font_size = new_options.size_multiplier;
    span
}

/// Shift a delimiter so it is centered on the math axis.
fn center_span(mut span: Span, options: &Options, style: Style) -> Span {
    let new_options = options.having_base_style(Some(style));
    let shift = (1.0 - options.size_multiplier / new_options.size_multiplier)
        * options.font_metrics().axis_height;
    span.classes.push("delimcenter".to_owned());
    span.style.top = Some(shift);
    span.height -= shift;
    span.depth += shift;
    span
}

/// A Main-Regular delimiter set in text, script or scriptscript style.
pub fn make_small_delim(
    ctx: &TypesetContext,
    delim: &str,
    style: Style,
    center: bool,
    options: &Options,
    mode: Mode,
    classes: &[String],
) -> Result<Span, ParseError> {
    let text = make_symbol(ctx, delim, "Main-Regular", mode, Some(options), classes.to_vec())?;
    let span = style_wrap(text.into(), style, options, classes);
    Ok(if center {
        center_span(span, options, style)
    } else {
        span
    })
}

/// A delimiter from the Size1 to Size4 fonts, always in text style.
pub fn make_large_delim(
    ctx: &TypesetContext,
    delim: &str,
    size: usize,
    center: bool,
    options: &Options,
    mode: Mode,
    classes: &[String],
) -> Result<Span, ParseError> {
    let inner = make_symbol(ctx, delim, &format!("Size{size}-Regular"), mode, Some(options), Vec::new())?;
    let sized = make_span(
        vec!["delimsizing".to_owned(), format!("size{size}")],
        vec![inner.into()],
        Some(options),
        None,
    );
    let span = style_wrap(sized.into(), Style::Text, options, classes);
    Ok(if center {
        center_span(span, options, Style::Text)
    } else {
        span
    })
}

fn make_glyph_span(
    ctx: &TypesetContext,
    symbol: &str,
    font: &str,
    mode: Mode,
) -> Result<VListChild, ParseError> {
    let size_class = if font == "Size1-Regular" {
        "delim-size1"
    } else {
        "delim-size4"
    };
    let glyph = make_symbol(ctx, symbol, font, mode, None, Vec::new())?;
    let corner = make_span(
        vec!["delimsizinginner".to_owned(), size_class.to_owned()],
        vec![make_span(Vec::new(), vec![glyph.into()], None, None).into()],
        None,
        None,
    );
    Ok(VListElem::plain(corner).into())
}

/// Pieces of a stacked delimiter: top, repeated section, bottom, an
/// optional center piece, and the font they come from.
struct StackPieces<'a> {
    top: &'a str,
    repeat: &'a str,
    bottom: &'a str,
    middle: Option<&'a str>,
    font: &'static str,
}

fn stack_pieces(delim: &str) -> StackPieces<'_> {
    let (top, repeat, bottom, middle, font) = match delim {
        "\\uparrow" => (delim, "\u{23d0}", "\u{23d0}", None, "Size1-Regular"),
        "\\Uparrow" => (delim, "\u{2016}", "\u{2016}", None, "Size1-Regular"),
        "\\downarrow" => ("\u{23d0}", "\u{23d0}", delim, None, "Size1-Regular"),
        "\\Downarrow" => ("\u{2016}", "\u{2016}", delim, None, "Size1-Regular"),
        "\\updownarrow" => ("\\uparrow", "\u{23d0}", "\\downarrow", None, "Size1-Regular"),
        "\\Updownarrow" => ("\\Uparrow", "\u{2016}", "\\Downarrow", None, "Size1-Regular"),
        "|" | "\\lvert" | "\\rvert" | "\\vert" => ("\u{2223}", "\u{2223}", "\u{2223}", None, "Size1-Regular"),
        "\\|" | "\\lVert" | "\\rVert" | "\\Vert" => ("\u{2225}", "\u{2225}", "\u{2225}", None, "Size1-Regular"),
        "[" | "\\lbrack" => ("\u{23a1}", "\u{23a2}", "\u{23a3}", None, "Size4-Regular"),
        "]" | "\\rbrack" => ("\u{23a4}", "\u{23a5}", "\u{23a6}", None, "Size4-Regular"),
        "\\lfloor" | "\u{230a}" => ("\u{23a2}", "\u{23a2}", "\u{23a3}", None, "Size4-Regular"),
        "\\lceil" | "\u{2308}" => ("\u{23a1}", "\u{23a2}", "\u{23a2}", None, "Size4-Regular"),
        "\\rfloor" | "\u{230b}" => ("\u{23a5}", "\u{23a5}", "\u{23a6}", None, "Size4-Regular"),
        "\\rceil" | "\u{2309}" => ("\u{23a4}", "\u{23a5}", "\u{23a5}", None, "Size4-Regular"),
        "(" | "\\lparen" => ("\u{239b}", "\u{239c}", "\u{239d}", None, "Size4-Regular"),
        ")" | "\\rparen" => ("\u{239e}", "\u{239f}", "\u{23a0}", None, "Size4-Regular"),
        "\\{" | "\\lbrace" => ("\u{23a7}", "\u{23aa}", "\u{23a9}", Some("\u{23a8}"), "Size4-Regular"),
        "\\}" | "\\rbrace" => ("\u{23ab}", "\u{23aa}", "\u{23ad}", Some("\u{23ac}"), "Size4-Regular"),
        "\\surd" => ("\u{e001}", "\u{e000}", "\u{23b7}", None, "Size4-Regular"),
        _ => (delim, delim, delim, None, "Size1-Regular"),
    };
    StackPieces {
        top,
        repeat,
        bottom,
        middle,
        font,
    }
}

fn extent(metrics: &CharacterMetrics) -> f64 {
    metrics.height + metrics.depth
}

/// A delimiter at least `height_total` tall, stacked from glyph pieces
/// (TeXbook p. 442).
///
/// The repeated section is used as few times as possible; with a center
/// piece it is repeated equally above and below it.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn make_stacked_delim(
    ctx: &TypesetContext,
    delim: &str,
    height_total: f64,
    center: bool,
    options: &Options,
    mode: Mode,
    classes: &[String],
) -> Result<Span, ParseError> {
    let pieces = stack_pieces(delim);
    let font = pieces.font;

    let top_height = extent(&get_metrics(ctx, pieces.top, font, mode)?);
    let repeat_height = extent(&get_metrics(ctx, pieces.repeat, font, mode)?);
    let bottom_height = extent(&get_metrics(ctx, pieces.bottom, font, mode)?);
    let (middle_height, middle_factor) = match pieces.middle {
        Some(middle) => (extent(&get_metrics(ctx, middle, font, mode)?), 2.0),
        None => (0.0, 1.0),
    };

    let minimal_height = top_height + bottom_height + middle_height;
    let repeat_count = ((height_total - minimal_height) / (middle_factor * repeat_height))
        .ceil()
        .max(0.0);
    let real_height_total = (repeat_count * middle_factor).mul_add(repeat_height, minimal_height);

    // A centered delimiter sits on the axis of the current size.
    let mut axis_height = options.font_metrics().axis_height;
    if center {
        axis_height *= options.size_multiplier;
    }
    let depth = real_height_total / 2.0 - axis_height;

    let repeats = repeat_count as usize;
    let mut stack = Vec::with_capacity(2 * repeats + 3);
    stack.push(make_glyph_span(ctx, pieces.bottom, font, mode)?);
    for _ in 0..repeats {
        stack.push(make_glyph_span(ctx, pieces.repeat, font, mode)?);
    }
    if let Some(middle) = pieces.middle {
        stack.push(make_glyph_span(ctx, middle, font, mode)?);
        for _ in 0..repeats {
            stack.push(make_glyph_span(ctx, pieces.repeat, font, mode)?);
        }
    }
    stack.push(make_glyph_span(ctx, pieces.top, font, mode)?);

    let new_options = options.having_base_style(Some(Style::Text));
    let inner = make_v_list(VListParam::Bottom {
        position: depth,
        children: stack,
    });
    let span = make_span(
        vec!["delimsizing".to_owned(), "mult".to_owned()],
        vec![inner.into()],
        Some(&new_options),
        None,
    );
    Ok(style_wrap(span.into(), Style::Text, options, classes))
}

fn sqrt_svg(name: &str, height: f64, view_box_height: f64, extra_vinculum: f64, options: &Options) -> Span {
    let path = PathNode {
        name: name.to_owned(),
        extra_vinculum: Some(1000.0 * extra_vinculum),
        view_box_height: Some(view_box_height),
    };
    let svg = SvgNode {
        paths: vec![path],
        width: None,
        height,
        view_box: (0.0, 0.0, 400_000.0, view_box_height),
        preserve_aspect_ratio: Some("xMinYMin slice"),
    };
    let mut span = make_span(vec!["hide-tail".to_owned()], vec![svg.into()], Some(options), None);
    span.style.min_width = Some(0.853);
    span.style.height = Some(height);
    span
}

/// A radical sign whose inside is at least `height` tall.
pub fn make_sqrt_image(
    ctx: &TypesetContext,
    height: f64,
    options: &Options,
) -> Result<SqrtImage, ParseError> {
    // Undo size changes such as \Huge; the images carry their own size.
    let new_options = options.having_base_sizing();
    let delim_type = traverse_sequence(
        ctx,
        "\\surd",
        height * new_options.size_multiplier,
        STACK_LARGE_SEQUENCE,
        &new_options,
    )?;

    let mut size_multiplier = new_options.size_multiplier;
    let extra_vinculum =
        (options.min_rule_thickness - options.font_metrics().sqrt_rule_thickness).max(0.0);

    let (mut span, tex_height, advance_width) = match delim_type {
        DelimiterType::Small(_) => {
            let view_box_height = 1000.0f64.mul_add(extra_vinculum, 1000.0) + VB_PAD;
            // Mimic the text and script font radicals.
            if height < 1.0 {
                size_multiplier = 1.0;
            } else if height < 1.4 {
                size_multiplier = 0.7;
            }
            let span_height = (1.0 + extra_vinculum + EM_PAD) / size_multiplier;
            let span = sqrt_svg("sqrtMain", span_height, view_box_height, extra_vinculum, options);
            (span, (1.0 + extra_vinculum) / size_multiplier, 0.833 / size_multiplier)
        }
        DelimiterType::Large(size) => {
            let max_height = SIZE_TO_MAX_HEIGHT[size];
            let view_box_height = (1000.0 + VB_PAD) * max_height;
            let span_height = (max_height + extra_vinculum + EM_PAD) / size_multiplier;
            let mut span = sqrt_svg(
                &format!("sqrtSize{size}"),
                span_height,
                view_box_height,
                extra_vinculum,
                options,
            );
            span.style.min_width = Some(1.02);
            (span, (max_height + extra_vinculum) / size_multiplier, 1.0 / size_multiplier)
        }
        DelimiterType::Stack => {
            let span_height = height + extra_vinculum + EM_PAD;
            let view_box_height = 1000.0f64.mul_add(height, extra_vinculum).floor() + VB_PAD;
            let mut span = sqrt_svg("sqrtTall", span_height, view_box_height, extra_vinculum, options);
            span.style.min_width = Some(0.742);
            (span, height + extra_vinculum, 1.056)
        }
    };
    span.height = tex_height;

    Ok(SqrtImage {
        span,
        rule_width: (options.font_metrics().sqrt_rule_thickness + extra_vinculum) * size_multiplier,
        advance_width,
    })
}

/// A delimiter of fixed size, 1 to 4, as drawn by `\big` and friends.
/// Never centered.
pub fn sized_delim(
    ctx: &TypesetContext,
    delim: &str,
    size: usize,
    options: &Options,
    mode: Mode,
    classes: &[String],
) -> Result<Span, ParseError> {
    let delim = normalize(delim);
    if STACK_LARGE_DELIMITERS.contains(delim) || STACK_NEVER_DELIMITERS.contains(delim) {
        make_large_delim(ctx, delim, size, false, options, mode, classes)
    } else if STACK_ALWAYS_DELIMITERS.contains(delim) {
        let height = SIZE_TO_MAX_HEIGHT.get(size).copied().unwrap_or(0.0);
        make_stacked_delim(ctx, delim, height, false, options, mode, classes)
    } else {
        Err(ParseError::new(ParseErrorKind::IllegalDelimiter {
            delimiter: delim.to_owned(),
        }))
    }
}

/// The first way of drawing `delim` that is taller than `height`.
///
/// Smaller styles start earlier in the sequence: scriptscript at its
/// first entry, script at the second, text and display at the third.
fn traverse_sequence(
    ctx: &TypesetContext,
    delim: &str,
    height: f64,
    sequence: &[DelimiterType],
    options: &Options,
) -> Result<DelimiterType, ParseError> {
    let start = (3 - options.style.size()).min(2);
    for &delim_type in sequence.iter().skip(start) {
        if delim_type == DelimiterType::Stack {
            break;
        }
        let metrics = get_metrics(ctx, delim, &delim_type.font(), Mode::Math)?;
        let mut height_depth = extent(&metrics);
        if let DelimiterType::Small(style) = delim_type {
            height_depth *= options.having_base_style(Some(style)).size_multiplier;
        }
        if height_depth > height {
            return Ok(delim_type);
        }
    }
    Ok(sequence[sequence.len() - 1])
}

/// A delimiter at least `height` tall, drawn the smallest way that fits.
pub fn custom_sized_delim(
    ctx: &TypesetContext,
    delim: &str,
    height: f64,
    center: bool,
    options: &Options,
    mode: Mode,
    classes: &[String],
) -> Result<Span, ParseError> {
    let delim = normalize(delim);
    let sequence = if STACK_NEVER_DELIMITERS.contains(delim) {
        STACK_NEVER_SEQUENCE
    } else if STACK_LARGE_DELIMITERS.contains(delim) {
        STACK_LARGE_SEQUENCE
    } else {
        STACK_ALWAYS_SEQUENCE
    };

    match traverse_sequence(ctx, delim, height, sequence, options)? {
        DelimiterType::Small(style) => {
            make_small_delim(ctx, delim, style, center, options, mode, classes)
        }
        DelimiterType::Large(size) => {
            make_large_delim(ctx, delim, size, center, options, mode, classes)
        }
        DelimiterType::Stack => {
            make_stacked_delim(ctx, delim, height, center, options, mode, classes)
        }
    }
}

/// A `\left` or `\right` delimiter for an inner list of the given height
/// and depth, centered on the axis (tex.web, `make_left_right`).
pub fn left_right_delim(
    ctx: &TypesetContext,
    delim: &str,
    height: f64,
    depth: f64,
    options: &Options,
    mode: Mode,
    classes: &[String],
) -> Result<Span, ParseError> {
    let metrics = options.font_metrics();
    let axis_height = metrics.axis_height * options.size_multiplier;
    let delimiter_factor = 901.0;
    let delimiter_extend = 5.0 / metrics.pt_per_em;

    let max_dist_from_axis = (height - axis_height).max(depth + axis_height);
    let total_height = (max_dist_from_axis / 500.0 * delimiter_factor)
        .max(2.0f64.mul_add(max_dist_from_axis, -delimiter_extend));

    custom_sized_delim(ctx, delim, total_height, true, options, mode, classes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> &'static TypesetContext {
        TypesetContext::shared()
    }

    #[test]
    fn short_content_gets_a_small_delimiter() {
        let options = Options::default();
        let span = left_right_delim(ctx(), "(", 0.5, 0.1, &options, Mode::Math, &["mopen".to_owned()])
            .unwrap();
        assert_eq!(span.classes[0], "mopen");
        assert!(span.classes.iter().any(|c| c == "delimcenter"));
        assert!((span.height - 0.75).abs() < 1e-9);
    }

    #[test]
    fn sized_delimiters_use_the_size_fonts() {
        let options = Options::default();
        let span = sized_delim(ctx(), "(", 2, &options, Mode::Math, &[]).unwrap();
        assert!(span.children[0].has_class("size2"));
        let RenderNode::Symbol(glyph) = &span.children[0].children()[0] else {
            panic!("expected a glyph");
        };
        assert_eq!(glyph.text, "(");
        assert!(glyph.height + glyph.depth > 1.7);
    }

    #[test]
    fn angle_brackets_come_from_less_than() {
        let options = Options::default();
        let span = sized_delim(ctx(), "<", 1, &options, Mode::Math, &[]).unwrap();
        let RenderNode::Symbol(glyph) = &span.children[0].children()[0] else {
            panic!("expected a glyph");
        };
        assert_eq!(glyph.text, "\u{27e8}");
    }

    #[test]
    fn vertical_bars_always_stack() {
        let options = Options::default();
        let span = sized_delim(ctx(), "|", 4, &options, Mode::Math, &[]).unwrap();
        assert!(span.children[0].has_class("mult"));
        assert!(span.height + span.depth >= 3.0 - 1e-9);
    }

    #[test]
    fn tall_braces_stack_around_a_center_piece() {
        let options = Options::default();
        let span = custom_sized_delim(ctx(), "\\{", 5.0, true, &options, Mode::Math, &[]).unwrap();
        assert!(span.children[0].has_class("mult"));
        assert!(span.height + span.depth >= 5.0);
    }

    #[test]
    fn unknown_delimiters_are_illegal() {
        let options = Options::default();
        let err = sized_delim(ctx(), "x", 1, &options, Mode::Math, &[]).unwrap_err();
        assert_eq!(err.message(), "Illegal delimiter: 'x'");
        assert!(is_sizable("\\langle"));
        assert!(!is_sizable("x"));
    }

    #[test]
    fn small_radicals_use_the_main_image() {
        let options = Options::default();
        let image = make_sqrt_image(ctx(), 0.8, &options).unwrap();
        assert!((image.advance_width - 0.833).abs() < 1e-9);
        assert!((image.span.height - 1.0).abs() < 1e-9);
        let RenderNode::Svg(svg) = &image.span.children[0] else {
            panic!("expected an image");
        };
        assert_eq!(svg.paths[0].name, "sqrtMain");
        assert_eq!(svg.view_box.3, 1080.0);
    }

    #[test]
    fn tall_radicals_stretch() {
        let options = Options::default();
        let image = make_sqrt_image(ctx(), 4.0, &options).unwrap();
        let RenderNode::Svg(svg) = &image.span.children[0] else {
            panic!("expected an image");
        };
        assert_eq!(svg.paths[0].name, "sqrtTall");
        assert!((image.span.height - 4.0).abs() < 1e-9);
    }
}
