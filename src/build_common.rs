//! Box construction helpers shared by the layout builders
//!
//! Symbols in the right font with their metrics, spans sized from their
//! children, rules, glue, and the vertical list engine that stacks boxes on
//! a common baseline.

use phf::phf_map;

use crate::box_tree::{Anchor, BoxStyle, Fragment, PathNode, RenderNode, Span, SvgNode, SymbolNode};
use crate::context::TypesetContext;
use crate::font_metrics::{CharacterMetrics, get_character_metrics};
use crate::font_metrics_data::FONT_METRICS_INDEX;
use crate::options::{FontShape, FontWeight, Options};
use crate::parser::parse_node::{NodeType, ParseNode};
use crate::symbols::{Font, LIGATURES, Mode};
use crate::types::{ParseError, ParseErrorKind};
use crate::units::{Measurement, calculate_size};

/// Font command to the font it draws from.
pub static FONT_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "mathbf" => "Main-Bold",
    "mathrm" => "Main-Regular",
    "textit" => "Main-Italic",
    "mathit" => "Main-Italic",
    "mathnormal" => "Math-Italic",
    "mathbb" => "AMS-Regular",
    "mathcal" => "Caligraphic-Regular",
    "mathsf" => "SansSerif-Regular",
    "mathtt" => "Typewriter-Regular",
};

/// A symbol after replacement, with the metrics of the glyph drawn.
#[derive(Debug, Clone)]
pub struct SymbolLookup {
    /// Character actually drawn
    pub value: char,
    /// Its metrics, when the font has them
    pub metrics: Option<&'static CharacterMetrics>,
}

/// One box of a vertical list.
#[derive(Debug, Clone, bon::Builder)]
pub struct VListElem {
    /// The box
    pub elem: RenderNode,
    /// Horizontal shift of the box
    pub margin_left: Option<f64>,
    /// Space reserved after the box
    pub margin_right: Option<f64>,
    /// Classes of the span wrapping the box
    #[builder(default)]
    pub wrapper_classes: Vec<String>,
    /// Style of the wrapping span
    #[builder(default)]
    pub wrapper_style: BoxStyle,
}

impl VListElem {
    /// A wrapper-less element.
    #[must_use]
    pub fn plain(elem: impl Into<RenderNode>) -> Self {
        Self::builder().elem(elem.into()).build()
    }

    /// Pin this element's baseline at `shift` below the list's baseline.
    #[must_use]
    pub const fn shifted(self, shift: f64) -> VListElemAndShift {
        VListElemAndShift { elem: self, shift }
    }
}

/// An element pinned to an explicit baseline offset.
#[derive(Debug, Clone)]
pub struct VListElemAndShift {
    /// The element
    pub elem: VListElem,
    /// Distance of the element's baseline below the list's baseline
    pub shift: f64,
}

/// A box or a blank space in a vertical list, listed bottom to top.
#[derive(Debug, Clone)]
pub enum VListChild {
    /// A box
    Elem(VListElem),
    /// Vertical space, in ems
    Kern(f64),
}

impl From<VListElem> for VListChild {
    fn from(elem: VListElem) -> Self {
        Self::Elem(elem)
    }
}

impl VListChild {
    fn extent(&self) -> f64 {
        match self {
            Self::Kern(size) => *size,
            Self::Elem(elem) => elem.elem.height() + elem.elem.depth(),
        }
    }
}

/// How a vertical list is anchored to the baseline.
#[derive(Debug, Clone)]
pub enum VListParam {
    /// Each element at its own shift; kerns are computed between them
    IndividualShift(Vec<VListElemAndShift>),
    /// The top of the list at `position` above the baseline
    Top {
        position: f64,
        children: Vec<VListChild>,
    },
    /// The bottom of the list at `position` below the baseline
    Bottom {
        position: f64,
        children: Vec<VListChild>,
    },
    /// The first element's baseline `position` below the list's baseline
    Shift {
        position: f64,
        children: Vec<VListChild>,
    },
    /// The first element sits on the baseline
    FirstBaseline(Vec<VListChild>),
}

fn size_from_children(children: &[RenderNode]) -> (f64, f64, f64) {
    children.iter().fold((0.0f64, 0.0f64, 0.0f64), |(h, d, m), child| {
        (
            h.max(child.height()),
            d.max(child.depth()),
            m.max(child.max_font_size()),
        )
    })
}

/// A span whose height, depth and max font size are those of its tallest
/// children.
#[must_use]
pub fn make_span(
    classes: Vec<String>,
    children: Vec<RenderNode>,
    options: Option<&Options>,
    style: Option<BoxStyle>,
) -> Span {
    let (height, depth, max_font_size) = size_from_children(&children);
    Span::builder()
        .children(children)
        .classes(classes)
        .style(style.unwrap_or_default())
        .height(height)
        .depth(depth)
        .max_font_size(max_font_size)
        .build(options)
}

/// Bottom-up children and the depth of the list's bottom edge.
fn get_v_list_children_and_depth(params: VListParam) -> (Vec<VListChild>, f64) {
    match params {
        VListParam::IndividualShift(old_children) => {
            let Some(first) = old_children.first() else {
                return (Vec::new(), 0.0);
            };
            let depth = -first.shift - first.elem.elem.depth();
            let mut curr_pos = depth;
            let mut children = Vec::with_capacity(old_children.len() * 2);
            let mut prev_extent = 0.0;
            for (i, child) in old_children.into_iter().enumerate() {
                let extent = child.elem.elem.height() + child.elem.elem.depth();
                if i > 0 {
                    let diff = -child.shift - curr_pos - child.elem.elem.depth();
                    children.push(VListChild::Kern(diff - prev_extent));
                    curr_pos += diff;
                }
                prev_extent = extent;
                children.push(VListChild::Elem(child.elem));
            }
            (children, depth)
        }
        VListParam::Top { position, children } => {
            let bottom = children.iter().fold(position, |pos, child| pos - child.extent());
            (children, bottom)
        }
        VListParam::Bottom { position, children } => (children, -position),
        VListParam::Shift { position, children } => {
            let first_depth = children.iter().find_map(|child| match child {
                VListChild::Elem(elem) => Some(elem.elem.depth()),
                VListChild::Kern(_) => None,
            });
            (children, -first_depth.unwrap_or(0.0) - position)
        }
        VListParam::FirstBaseline(children) => {
            let first_depth = children.iter().find_map(|child| match child {
                VListChild::Elem(elem) => Some(elem.elem.depth()),
                VListChild::Kern(_) => None,
            });
            (children, -first_depth.unwrap_or(0.0))
        }
    }
}

/// Stack boxes and kerns vertically.
///
/// Every element is wrapped together with a shared "pstrut", a strut taller
/// than any element, and positioned by a negative top offset measured from
/// the strut's top. The result is a `vlist-t` span with one row, or two when
/// the list reaches below the baseline; its height and depth are the extents
/// of the stack.
#[must_use]
pub fn make_v_list(params: VListParam) -> Span {
    let (children, depth) = get_v_list_children_and_depth(params);

    let pstrut_size = children
        .iter()
        .filter_map(|child| match child {
            VListChild::Elem(elem) => Some(elem.elem.max_font_size().max(elem.elem.height())),
            VListChild::Kern(_) => None,
        })
        .fold(0.0f64, f64::max)
        + 2.0;
    let pstrut = make_span(
        vec!["pstrut".to_owned()],
        Vec::new(),
        None,
        Some(BoxStyle {
            height: Some(pstrut_size),
            ..BoxStyle::default()
        }),
    );

    let mut real_children: Vec<RenderNode> = Vec::new();
    let mut min_pos = depth;
    let mut max_pos = depth;
    let mut curr_pos = depth;
    for child in children {
        match child {
            VListChild::Kern(size) => curr_pos += size,
            VListChild::Elem(child) => {
                let elem_height = child.elem.height();
                let elem_depth = child.elem.depth();
                let mut wrapper = make_span(
                    child.wrapper_classes,
                    vec![pstrut.clone().into(), child.elem],
                    None,
                    Some(child.wrapper_style),
                );
                wrapper.style.top = Some(-pstrut_size - curr_pos - elem_depth);
                if child.margin_left.is_some() {
                    wrapper.style.margin_left = child.margin_left;
                }
                if child.margin_right.is_some() {
                    wrapper.style.margin_right = child.margin_right;
                }
                real_children.push(wrapper.into());
                curr_pos += elem_height + elem_depth;
            }
        }
        min_pos = min_pos.min(curr_pos);
        max_pos = max_pos.max(curr_pos);
    }

    let mut vlist = make_span(vec!["vlist".to_owned()], real_children, None, None);
    vlist.style.height = Some(max_pos);

    let rows: Vec<RenderNode> = if min_pos < 0.0 {
        let empty = make_span(Vec::new(), Vec::new(), None, None);
        let mut depth_strut = make_span(vec!["vlist".to_owned()], vec![empty.into()], None, None);
        depth_strut.style.height = Some(-min_pos);
        // Zero-width space so the first row has a baseline.
        let top_strut = make_span(
            vec!["vlist-s".to_owned()],
            vec![SymbolNode::builder().text("\u{200b}").build().into()],
            None,
            None,
        );
        vec![
            make_span(
                vec!["vlist-r".to_owned()],
                vec![vlist.into(), top_strut.into()],
                None,
                None,
            )
            .into(),
            make_span(vec!["vlist-r".to_owned()], vec![depth_strut.into()], None, None).into(),
        ]
    } else {
        vec![make_span(vec!["vlist-r".to_owned()], vec![vlist.into()], None, None).into()]
    };

    let mut classes = vec!["vlist-t".to_owned()];
    if rows.len() == 2 {
        classes.push("vlist-t2".to_owned());
    }
    let mut vtable = make_span(classes, rows, None, None);
    vtable.height = max_pos;
    vtable.depth = -min_pos;
    vtable
}

/// Look `value` up in the symbol table and the font's metrics. The drawn
/// character is the table's replacement, or the first character of
/// `value`.
pub fn lookup_symbol(
    ctx: &TypesetContext,
    value: &str,
    font_name: &str,
    mode: Mode,
) -> Result<SymbolLookup, ParseError> {
    let replaced = ctx.symbols.get(mode, value).and_then(|info| info.replace);
    let query = match replaced {
        Some(ch) => ch,
        None => value
            .chars()
            .next()
            .ok_or_else(|| ParseError::new("Empty string passed to lookup_symbol"))?,
    };
    let metrics = get_character_metrics(query, font_name, mode)?;
    Ok(SymbolLookup {
        value: query,
        metrics,
    })
}

fn has_metrics(ctx: &TypesetContext, value: &str, font_name: &str, mode: Mode) -> Result<bool, ParseError> {
    Ok(lookup_symbol(ctx, value, font_name, mode)?.metrics.is_some())
}

/// A symbol node in `font_name`, with the table's replacement character.
///
/// Ligatures and multi-character values keep their text; metrics are those
/// of the first character. Missing metrics give a zero-sized symbol.
pub fn make_symbol(
    ctx: &TypesetContext,
    value: &str,
    font_name: &str,
    mode: Mode,
    options: Option<&Options>,
    classes: Vec<String>,
) -> Result<SymbolNode, ParseError> {
    let lookup = lookup_symbol(ctx, value, font_name, mode)?;
    let text = if value.chars().count() == 1 || ctx.symbols.contains(mode, value) {
        lookup.value.to_string()
    } else {
        LIGATURES.get(value).map_or_else(|| value.to_owned(), |l| (*l).to_owned())
    };

    let metrics = lookup.metrics.copied().unwrap_or_else(|| {
        log::warn!("No character metrics for '{value}' in font '{font_name}' and mode '{mode}'");
        CharacterMetrics::new(0.0, 0.0, 0.0, 0.0, 0.0)
    });
    let italic = if mode == Mode::Text || options.is_some_and(|o| o.font == "mathit") {
        0.0
    } else {
        metrics.italic
    };

    let mut classes = classes;
    let mut style = BoxStyle::default();
    if let Some(options) = options {
        if options.style.is_tight() {
            classes.push("mtight".to_owned());
        }
        style.color.clone_from(&options.color);
    }

    Ok(SymbolNode::builder()
        .text(&text)
        .height(metrics.height)
        .depth(metrics.depth)
        .italic(italic)
        .skew(metrics.skew)
        .width(metrics.width)
        .classes(classes)
        .style(style)
        .max_font_size(options.map_or(0.0, |o| o.size_multiplier))
        .build())
}

/// An operator or relation symbol: Main-Regular for symbols of the main
/// font, AMS-Regular otherwise.
pub fn mathsym(
    ctx: &TypesetContext,
    value: &str,
    mode: Mode,
    options: &Options,
    classes: Vec<String>,
) -> Result<SymbolNode, ParseError> {
    let in_main = value == "\\"
        || ctx
            .symbols
            .get(mode, value)
            .is_some_and(|info| info.font == Font::Main);
    if in_main {
        make_symbol(ctx, value, "Main-Regular", mode, Some(options), classes)
    } else {
        let mut classes = classes;
        classes.push("amsrm".to_owned());
        make_symbol(ctx, value, "AMS-Regular", mode, Some(options), classes)
    }
}

/// Font name for a text font family, weight and shape, e.g.
/// `("textrm", TextBf, Normal)` gives `Main-Bold`.
///
/// Variants without bundled metrics fall back to the closest one that has
/// them: bold italic to bold, anything else to regular.
#[must_use]
pub fn retrieve_text_font_name(font_family: &str, weight: FontWeight, shape: FontShape) -> String {
    let base = match font_family {
        "amsrm" => "AMS",
        "textsf" => "SansSerif",
        "texttt" => "Typewriter",
        _ => "Main",
    };
    let variants: &[&str] = match (weight, shape) {
        (FontWeight::TextBf, FontShape::TextIt) => &["BoldItalic", "Bold"],
        (FontWeight::TextBf, _) => &["Bold"],
        (_, FontShape::TextIt) => &["Italic"],
        _ => &[],
    };
    variants
        .iter()
        .map(|variant| format!("{base}-{variant}"))
        .find(|name| FONT_METRICS_INDEX.contains_key(name.as_str()))
        .unwrap_or_else(|| format!("{base}-Regular"))
}

fn push_text_font_classes(classes: &mut Vec<String>, options: &Options) {
    for class in [options.font_weight.as_ref(), options.font_shape.as_ref()] {
        if !class.is_empty() {
            classes.push(class.to_owned());
        }
    }
}

/// A math or text ordinary in the font the options select.
pub fn make_ord(
    ctx: &TypesetContext,
    node: &ParseNode,
    options: &Options,
) -> Result<RenderNode, ParseError> {
    let (mode, text, is_math_ord) = match node {
        ParseNode::MathOrd(ord) => (ord.mode, ord.text.as_str(), true),
        ParseNode::TextOrd(ord) | ParseNode::Spacing(ord) => (ord.mode, ord.text.as_str(), false),
        _ => {
            return Err(ParseError::with_token(
                ParseErrorKind::ExpectedNode {
                    expected: NodeType::MathOrd,
                },
                node,
            ));
        }
    };
    let mut classes = vec!["mord".to_owned()];

    // Math-mode font commands, and old-style \rm in text, select a font;
    // text families go through weight and shape.
    let is_font = mode == Mode::Math || !options.font.is_empty();
    let font_or_family = if is_font {
        &options.font
    } else {
        &options.font_family
    };

    if !font_or_family.is_empty() {
        let (font_name, font_classes) = if is_font {
            let font_name = FONT_MAP
                .get(font_or_family.as_str())
                .map_or_else(|| font_or_family.clone(), |name| (*name).to_owned());
            (font_name, vec![font_or_family.clone()])
        } else {
            let font_name =
                retrieve_text_font_name(font_or_family, options.font_weight, options.font_shape);
            let mut font_classes = vec![font_or_family.clone()];
            push_text_font_classes(&mut font_classes, options);
            (font_name, font_classes)
        };
        classes.extend(font_classes);

        if has_metrics(ctx, text, &font_name, mode)? {
            return Ok(make_symbol(ctx, text, &font_name, mode, Some(options), classes)?.into());
        }
        // Typewriter has no ligature glyphs: draw the pieces.
        if font_name.starts_with("Typewriter") && LIGATURES.contains_key(text) {
            let parts = text
                .chars()
                .map(|ch| {
                    make_symbol(ctx, &ch.to_string(), &font_name, mode, Some(options), classes.clone())
                        .map(RenderNode::from)
                })
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(make_fragment(parts).into());
        }
        classes.truncate(1);
    }

    if is_math_ord {
        classes.push("mathnormal".to_owned());
        return Ok(make_symbol(ctx, text, "Math-Italic", mode, Some(options), classes)?.into());
    }

    let family = match ctx.symbols.get(mode, text).map(|info| info.font) {
        Some(Font::Ams) => {
            classes.push("amsrm".to_owned());
            "amsrm"
        }
        _ => "textrm",
    };
    push_text_font_classes(&mut classes, options);
    let font_name = retrieve_text_font_name(family, options.font_weight, options.font_shape);
    Ok(make_symbol(ctx, text, &font_name, mode, Some(options), classes)?.into())
}

/// Horizontal glue of the given size.
#[must_use]
pub fn make_glue(measurement: &Measurement, options: &Options) -> Span {
    let mut rule = make_span(vec!["mspace".to_owned()], Vec::new(), Some(options), None);
    rule.style.margin_right = Some(calculate_size(measurement, options));
    rule
}

/// A rule drawn as the bottom border of an empty span, at least
/// `min_rule_thickness` thick.
#[must_use]
pub fn make_line_span(class_name: &str, options: &Options, thickness: Option<f64>) -> Span {
    let mut line = make_span(vec![class_name.to_owned()], Vec::new(), Some(options), None);
    let thickness = thickness.unwrap_or(options.font_metrics().default_rule_thickness);
    line.height = thickness.max(options.min_rule_thickness);
    line.style.border_bottom_width = Some(line.height);
    line.max_font_size = 1.0;
    line
}

/// A link around `children`, sized from them.
#[must_use]
pub fn make_anchor(
    href: &str,
    classes: Vec<String>,
    children: Vec<RenderNode>,
    options: &Options,
) -> Anchor {
    let (height, depth, max_font_size) = size_from_children(&children);
    let mut anchor = Anchor::new(href.to_owned(), classes, children, options);
    anchor.height = height;
    anchor.depth = depth;
    anchor.max_font_size = max_font_size;
    anchor
}

/// Group `children` without a box of their own.
#[must_use]
pub fn make_fragment(children: Vec<RenderNode>) -> Fragment {
    let (height, depth, max_font_size) = size_from_children(&children);
    Fragment {
        children,
        height,
        depth,
        max_font_size,
    }
}

/// Wrap a fragment in a span so it can take classes; other nodes pass
/// through.
#[must_use]
pub fn wrap_fragment(group: RenderNode, options: &Options) -> RenderNode {
    match group {
        RenderNode::Fragment(_) => make_span(Vec::new(), vec![group], Some(options), None).into(),
        other => other,
    }
}

/// Empty delimiter standing in for a missing `\left`/`\right` or fraction
/// delimiter; it takes up `\nulldelimiterspace`.
#[must_use]
pub fn make_null_delimiter(options: &Options, classes: &[&str]) -> Span {
    let mut all: Vec<String> = classes.iter().map(|c| (*c).to_owned()).collect();
    all.push("nulldelimiter".to_owned());
    all.extend(options.base_sizing_classes());
    let mut span = make_span(all, Vec::new(), None, None);
    span.width = Some(0.12);
    span
}

/// Width and height of images drawn from fixed glyph outlines.
static SVG_DATA: phf::Map<&'static str, (f64, f64)> = phf_map! {
    "vec" => (0.471, 0.714),
};

/// An image of fixed size, e.g. the `\vec` arrow. Unknown names give an
/// empty span.
#[must_use]
pub fn static_svg(path_name: &str, options: &Options) -> Span {
    let Some(&(width, height)) = SVG_DATA.get(path_name) else {
        return make_span(Vec::new(), Vec::new(), Some(options), None);
    };
    let svg = SvgNode {
        paths: vec![PathNode::named(path_name)],
        width: Some(width),
        height,
        view_box: (0.0, 0.0, 1000.0 * width, 1000.0 * height),
        preserve_aspect_ratio: Some("xMinYMin"),
    };
    let mut span = Span::builder()
        .children(vec![svg.into()])
        .classes(vec!["overlay".to_owned()])
        .build(Some(options));
    span.height = height;
    span.style.height = Some(height);
    span.style.width = Some(width);
    span.width = Some(width);
    span
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_node::ParseNodeSymbol;
    use crate::style::Style;
    use crate::units::Unit;

    fn symbol(height: f64, depth: f64) -> RenderNode {
        SymbolNode::builder()
            .text("x")
            .height(height)
            .depth(depth)
            .max_font_size(1.0)
            .build()
            .into()
    }

    fn tops(vlist: &Span) -> Vec<f64> {
        let RenderNode::Span(row) = &vlist.children[0] else {
            panic!("expected a row");
        };
        let RenderNode::Span(list) = &row.children[0] else {
            panic!("expected a list");
        };
        list.children
            .iter()
            .map(|c| c.style().and_then(|s| s.top).unwrap_or(f64::NAN))
            .collect()
    }

    #[test]
    fn spans_are_sized_from_their_children() {
        let span = make_span(Vec::new(), vec![symbol(0.5, 0.1), symbol(0.3, 0.2)], None, None);
        assert_eq!(span.height, 0.5);
        assert_eq!(span.depth, 0.2);
        assert_eq!(span.max_font_size, 1.0);
    }

    #[test]
    fn first_baseline_vlist_above_the_baseline_has_one_row() {
        let vlist = make_v_list(VListParam::FirstBaseline(vec![
            VListElem::plain(symbol(0.5, 0.0)).into(),
            VListChild::Kern(0.1),
            VListElem::plain(symbol(0.4, 0.0)).into(),
        ]));
        assert_eq!(vlist.classes, ["vlist-t"]);
        assert!((vlist.height - 1.0).abs() < 1e-12);
        assert_eq!(vlist.depth, 0.0);
        // pstrut is 1 + 2 = 3
        let tops = tops(&vlist);
        assert!((tops[0] - -3.0).abs() < 1e-12);
        assert!((tops[1] - -3.6).abs() < 1e-12);
    }

    #[test]
    fn individual_shift_vlist_reaching_below_has_two_rows() {
        let vlist = make_v_list(VListParam::IndividualShift(vec![
            VListElem::plain(symbol(0.4, 0.1)).shifted(0.3),
            VListElem::plain(symbol(0.4, 0.1)).shifted(-0.5),
        ]));
        assert_eq!(vlist.classes, ["vlist-t", "vlist-t2"]);
        assert!((vlist.depth - 0.4).abs() < 1e-12);
        assert!((vlist.height - 0.9).abs() < 1e-12);
        let tops = tops(&vlist);
        assert!((tops[0] - (-3.0 + 0.4 - 0.1)).abs() < 1e-12);
        assert!((tops[1] - (-3.0 - 0.5 - 0.1 + 0.1)).abs() < 1e-12);
    }

    #[test]
    fn top_and_bottom_anchor_the_stack() {
        let children = vec![VListElem::plain(symbol(0.5, 0.0)).into()];
        let top = make_v_list(VListParam::Top {
            position: 0.8,
            children: children.clone(),
        });
        assert!((top.height - 0.8).abs() < 1e-12);
        let bottom = make_v_list(VListParam::Bottom {
            position: 0.2,
            children,
        });
        assert!((bottom.depth - 0.2).abs() < 1e-12);
        assert!((bottom.height - 0.3).abs() < 1e-12);
    }

    #[test]
    fn line_spans_respect_the_minimum_thickness() {
        let options = Options::builder()
            .style(Style::Text)
            .min_rule_thickness(0.06)
            .build();
        let line = make_line_span("frac-line", &options, None);
        assert_eq!(line.height, 0.06);
        assert_eq!(line.style.border_bottom_width, Some(0.06));
        let thin = make_line_span("frac-line", &Options::default(), None);
        assert_eq!(thin.height, 0.04);
    }

    #[test]
    fn glue_is_an_mspace_with_a_right_margin() {
        let glue = make_glue(&Measurement::new(18.0, Unit::Mu), &Options::default());
        assert_eq!(glue.classes, ["mspace"]);
        assert_eq!(glue.style.margin_right, Some(1.0));
    }

    #[test]
    fn math_letters_default_to_math_italic() {
        let ctx = TypesetContext::shared();
        let x = ParseNode::MathOrd(ParseNodeSymbol {
            mode: Mode::Math,
            loc: None,
            text: "x".to_owned(),
        });
        let built = make_ord(ctx, &x, &Options::default()).unwrap();
        assert_eq!(built.classes(), ["mord", "mathnormal"]);
        assert_eq!(built.height(), 0.43056);

        let bold = make_ord(ctx, &x, &Options::default().with_font("mathbf".to_owned())).unwrap();
        assert_eq!(bold.classes(), ["mord", "mathbf"]);
    }

    #[test]
    fn text_fonts_follow_weight_and_shape() {
        assert_eq!(
            retrieve_text_font_name("textrm", FontWeight::TextBf, FontShape::Normal),
            "Main-Bold"
        );
        assert_eq!(
            retrieve_text_font_name("textrm", FontWeight::Normal, FontShape::TextIt),
            "Main-Italic"
        );
        // No bundled bold italic or bold sans-serif metrics
        assert_eq!(
            retrieve_text_font_name("textrm", FontWeight::TextBf, FontShape::TextIt),
            "Main-Bold"
        );
        assert_eq!(
            retrieve_text_font_name("textsf", FontWeight::TextBf, FontShape::Normal),
            "SansSerif-Regular"
        );
        assert_eq!(
            retrieve_text_font_name("amsrm", FontWeight::Normal, FontShape::Normal),
            "AMS-Regular"
        );
    }

    #[test]
    fn missing_metrics_give_a_zero_sized_symbol() {
        let ctx = TypesetContext::shared();
        let sym = make_symbol(ctx, "\u{4e2d}", "Main-Regular", Mode::Math, None, Vec::new()).unwrap();
        assert_eq!(sym.height, 0.0);
        assert_eq!(sym.width, 0.0);
    }

    #[test]
    fn null_delimiters_keep_their_classes() {
        let span = make_null_delimiter(&Options::default(), &["mopen"]);
        assert_eq!(span.classes, ["mopen", "nulldelimiter"]);
        assert_eq!(span.width, Some(0.12));
    }
}
