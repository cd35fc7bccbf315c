//! Box tree produced by the layout engine
//!
//! Every node carries its classes, height and depth above and below the
//! baseline, and the largest font size it contains. All lengths are in ems
//! of the `\normalsize` font. Renderers walk this tree; nothing here depends
//! on a drawing API.

use bon::bon;
use phf::phf_map;

use crate::options::Options;
use crate::unicode::script_from_char;

/// Positioning applied to a node, in ems. Unset fields mean "inherit".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxStyle {
    /// Offset of the node's top from its natural position
    pub top: Option<f64>,
    /// Offset of the node's bottom edge
    pub bottom: Option<f64>,
    /// Horizontal offset from the natural position
    pub left: Option<f64>,
    /// Forced height
    pub height: Option<f64>,
    /// Forced width
    pub width: Option<f64>,
    /// Width the node never shrinks below
    pub min_width: Option<f64>,
    /// Space above the node
    pub margin_top: Option<f64>,
    /// Space before the node; negative to overlap
    pub margin_left: Option<f64>,
    /// Space after the node; glue is carried here
    pub margin_right: Option<f64>,
    /// Inner space before the children
    pub padding_left: Option<f64>,
    /// Baseline shift, positive downward
    pub vertical_align: Option<f64>,
    /// Thickness of a rule drawn along the bottom edge
    pub border_bottom_width: Option<f64>,
    /// Color of the node and its children
    pub color: Option<String>,
}

/// A horizontal group of boxes.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    /// Boxes laid out left to right
    pub children: Vec<RenderNode>,
    /// Atom class first, then layout classes
    pub classes: Vec<String>,
    /// Extent above the baseline
    pub height: f64,
    /// Extent below the baseline
    pub depth: f64,
    /// Explicit width, when the span does not take its children's
    pub width: Option<f64>,
    /// Largest size multiplier of any glyph inside
    pub max_font_size: f64,
    /// Offsets and color
    pub style: BoxStyle,
    /// Italic correction of the last glyph, kept for script placement
    pub italic: Option<f64>,
}

/// Apply the classes and color every box built under `options` gets.
fn init_node(classes: &mut Vec<String>, style: &mut BoxStyle, options: &Options) {
    if options.style.is_tight() {
        classes.push("mtight".to_owned());
    }
    if let Some(color) = &options.color {
        style.color = Some(color.clone());
    }
}

#[bon]
impl Span {
    /// Start a span; finishing with `Some(options)` applies their color and tightness.
    #[builder]
    pub fn new(
        #[builder(finish_fn)] options: Option<&Options>,
        #[builder(default)] children: Vec<RenderNode>,
        #[builder(default)] classes: Vec<String>,
        #[builder(default)] height: f64,
        #[builder(default)] depth: f64,
        width: Option<f64>,
        #[builder(default)] max_font_size: f64,
        #[builder(default)] style: BoxStyle,
    ) -> Self {
        let mut span = Self {
            children,
            classes,
            height,
            depth,
            width,
            max_font_size,
            style,
            italic: None,
        };
        if let Some(options) = options {
            init_node(&mut span.classes, &mut span.style, options);
        }
        span
    }
}

/// A span that links to a URL.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    /// Link target
    pub href: String,
    /// Linked boxes
    pub children: Vec<RenderNode>,
    /// Classes of the link box
    pub classes: Vec<String>,
    /// Extent above the baseline
    pub height: f64,
    /// Extent below the baseline
    pub depth: f64,
    /// Largest size multiplier of any glyph inside
    pub max_font_size: f64,
    /// Offsets and color
    pub style: BoxStyle,
}

impl Anchor {
    /// A link around `children`, sized to fit them.
    #[must_use]
    pub fn new(href: String, classes: Vec<String>, children: Vec<RenderNode>, options: &Options) -> Self {
        let mut anchor = Self {
            href,
            children,
            classes,
            height: 0.0,
            depth: 0.0,
            max_font_size: 0.0,
            style: BoxStyle::default(),
        };
        init_node(&mut anchor.classes, &mut anchor.style, options);
        anchor
    }
}

/// Dotless i with an accent, for precomposed accented i's.
const I_COMBINATIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "\u{ee}" => "\u{131}\u{302}",
    "\u{ef}" => "\u{131}\u{308}",
    "\u{ed}" => "\u{131}\u{301}",
    "\u{ec}" => "\u{131}\u{300}",
};

/// One glyph run drawn in one font.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolNode {
    /// Glyphs to draw
    pub text: String,
    /// Extent above the baseline
    pub height: f64,
    /// Extent below the baseline
    pub depth: f64,
    /// Italic correction
    pub italic: f64,
    /// Horizontal shift for accents on this glyph
    pub skew: f64,
    /// Advance width
    pub width: f64,
    /// Size multiplier the glyph is drawn at
    pub max_font_size: f64,
    /// Font and atom classes, e.g. `mathnormal` and `mord`
    pub classes: Vec<String>,
    /// Offsets and color
    pub style: BoxStyle,
}

#[bon]
impl SymbolNode {
    /// A glyph run with explicit metrics.
    #[builder]
    pub fn new(
        text: &str,
        #[builder(default)] height: f64,
        #[builder(default)] depth: f64,
        #[builder(default)] italic: f64,
        #[builder(default)] skew: f64,
        #[builder(default)] width: f64,
        #[builder(default)] max_font_size: f64,
        #[builder(default)] classes: Vec<String>,
        #[builder(default)] style: BoxStyle,
    ) -> Self {
        let mut classes = classes;
        // Scripts without metrics get a class so renderers can pick a font.
        if let Some(script) = text.chars().next().and_then(script_from_char) {
            classes.push(format!("{script}_fallback"));
        }
        let text = I_COMBINATIONS
            .get(text)
            .map_or_else(|| text.to_owned(), |combined| (*combined).to_owned());
        Self {
            text,
            height,
            depth,
            italic,
            skew,
            width,
            max_font_size,
            classes,
            style,
        }
    }
}

/// Reference to a named vector path. Renderers own the path data.
#[derive(Debug, Clone, PartialEq)]
pub struct PathNode {
    /// Path name, e.g. `sqrtMain` or `rightarrow`
    pub name: String,
    /// Extra vinculum thickness, in thousandths of an em, for radicals
    pub extra_vinculum: Option<f64>,
    /// Height of the path's view box, for paths generated per size
    pub view_box_height: Option<f64>,
}

impl PathNode {
    /// A path with no per-size parameters.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            extra_vinculum: None,
            view_box_height: None,
        }
    }
}

/// A vector image made of named paths.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgNode {
    /// Paths drawn in order
    pub paths: Vec<PathNode>,
    /// Width in ems; `None` stretches to the container
    pub width: Option<f64>,
    /// Height in ems
    pub height: f64,
    /// `(min_x, min_y, width, height)` in path units
    pub view_box: (f64, f64, f64, f64),
    /// How the image scales when stretched, e.g. `xMinYMin slice`
    pub preserve_aspect_ratio: Option<&'static str>,
}

/// Children spliced into their parent's list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fragment {
    /// Boxes to splice in
    pub children: Vec<RenderNode>,
    /// Tallest child's height
    pub height: f64,
    /// Deepest child's depth
    pub depth: f64,
    /// Largest size multiplier among the children
    pub max_font_size: f64,
}

/// A node of the box tree.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderNode {
    /// Horizontal group
    Span(Span),
    /// Link
    Anchor(Anchor),
    /// Glyphs
    Symbol(SymbolNode),
    /// Vector image
    Svg(SvgNode),
    /// Children without a box of their own
    Fragment(Fragment),
}

impl From<Span> for RenderNode {
    fn from(span: Span) -> Self {
        Self::Span(span)
    }
}

impl From<Anchor> for RenderNode {
    fn from(anchor: Anchor) -> Self {
        Self::Anchor(anchor)
    }
}

impl From<SymbolNode> for RenderNode {
    fn from(symbol: SymbolNode) -> Self {
        Self::Symbol(symbol)
    }
}

impl From<SvgNode> for RenderNode {
    fn from(svg: SvgNode) -> Self {
        Self::Svg(svg)
    }
}

impl From<Fragment> for RenderNode {
    fn from(fragment: Fragment) -> Self {
        Self::Fragment(fragment)
    }
}

impl RenderNode {
    /// Classes of the node; empty for fragments.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        match self {
            Self::Span(span) => &span.classes,
            Self::Anchor(anchor) => &anchor.classes,
            Self::Symbol(symbol) => &symbol.classes,
            Self::Svg(_) | Self::Fragment(_) => &[],
        }
    }

    /// Mutable classes, for nodes that have them.
    pub const fn classes_mut(&mut self) -> Option<&mut Vec<String>> {
        match self {
            Self::Span(span) => Some(&mut span.classes),
            Self::Anchor(anchor) => Some(&mut anchor.classes),
            Self::Symbol(symbol) => Some(&mut symbol.classes),
            Self::Svg(_) | Self::Fragment(_) => None,
        }
    }

    /// Whether the node carries `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().iter().any(|c| c == class)
    }

    /// Extent above the baseline.
    #[must_use]
    pub const fn height(&self) -> f64 {
        match self {
            Self::Span(span) => span.height,
            Self::Anchor(anchor) => anchor.height,
            Self::Symbol(symbol) => symbol.height,
            Self::Svg(svg) => svg.height,
            Self::Fragment(fragment) => fragment.height,
        }
    }

    /// Extent below the baseline.
    #[must_use]
    pub const fn depth(&self) -> f64 {
        match self {
            Self::Span(span) => span.depth,
            Self::Anchor(anchor) => anchor.depth,
            Self::Symbol(symbol) => symbol.depth,
            Self::Svg(_) => 0.0,
            Self::Fragment(fragment) => fragment.depth,
        }
    }

    /// Largest size multiplier inside the node.
    #[must_use]
    pub const fn max_font_size(&self) -> f64 {
        match self {
            Self::Span(span) => span.max_font_size,
            Self::Anchor(anchor) => anchor.max_font_size,
            Self::Symbol(symbol) => symbol.max_font_size,
            Self::Svg(_) => 0.0,
            Self::Fragment(fragment) => fragment.max_font_size,
        }
    }

    /// Overwrite the height; images keep their own.
    pub const fn set_height(&mut self, height: f64) {
        match self {
            Self::Span(span) => span.height = height,
            Self::Anchor(anchor) => anchor.height = height,
            Self::Symbol(symbol) => symbol.height = height,
            Self::Svg(svg) => svg.height = height,
            Self::Fragment(fragment) => fragment.height = height,
        }
    }

    /// Overwrite the depth, where the node has one.
    pub const fn set_depth(&mut self, depth: f64) {
        match self {
            Self::Span(span) => span.depth = depth,
            Self::Anchor(anchor) => anchor.depth = depth,
            Self::Symbol(symbol) => symbol.depth = depth,
            Self::Svg(_) => {}
            Self::Fragment(fragment) => fragment.depth = depth,
        }
    }

    /// Advance width, for symbols and explicitly sized spans.
    #[must_use]
    pub const fn width(&self) -> Option<f64> {
        match self {
            Self::Span(span) => span.width,
            Self::Symbol(symbol) => Some(symbol.width),
            Self::Svg(svg) => svg.width,
            Self::Anchor(_) | Self::Fragment(_) => None,
        }
    }

    /// Italic correction carried by a symbol or a span wrapping one.
    #[must_use]
    pub fn italic(&self) -> f64 {
        match self {
            Self::Symbol(symbol) => symbol.italic,
            Self::Span(span) => span.italic.unwrap_or(0.0),
            Self::Anchor(_) | Self::Svg(_) | Self::Fragment(_) => 0.0,
        }
    }

    /// Offsets and color, for nodes that have them.
    #[must_use]
    pub const fn style(&self) -> Option<&BoxStyle> {
        match self {
            Self::Span(span) => Some(&span.style),
            Self::Anchor(anchor) => Some(&anchor.style),
            Self::Symbol(symbol) => Some(&symbol.style),
            Self::Svg(_) | Self::Fragment(_) => None,
        }
    }

    /// Mutable offsets and color.
    pub const fn style_mut(&mut self) -> Option<&mut BoxStyle> {
        match self {
            Self::Span(span) => Some(&mut span.style),
            Self::Anchor(anchor) => Some(&mut anchor.style),
            Self::Symbol(symbol) => Some(&mut symbol.style),
            Self::Svg(_) | Self::Fragment(_) => None,
        }
    }

    /// Child boxes; empty for glyphs and images.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Span(span) => &span.children,
            Self::Anchor(anchor) => &anchor.children,
            Self::Fragment(fragment) => &fragment.children,
            Self::Symbol(_) | Self::Svg(_) => &[],
        }
    }

    /// Visit this node and its descendants depth-first, with their depth in
    /// the tree.
    pub fn walk<F: FnMut(&Self, usize)>(&self, visit: &mut F) {
        fn go<F: FnMut(&RenderNode, usize)>(node: &RenderNode, level: usize, visit: &mut F) {
            visit(node, level);
            for child in node.children() {
                go(child, level + 1, visit);
            }
        }
        go(self, 0, visit);
    }

    /// Whether this is a glue or explicit space box.
    #[must_use]
    pub fn is_space(&self) -> bool {
        self.has_class("mspace")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Style;

    #[test]
    fn spans_pick_up_tightness_and_color() {
        let options = Options::default()
            .having_style(Style::Script)
            .with_color("blue".to_owned());
        let span = Span::builder()
            .classes(vec!["mord".to_owned()])
            .build(Some(&options));
        assert_eq!(span.classes, ["mord", "mtight"]);
        assert_eq!(span.style.color.as_deref(), Some("blue"));

        let plain = Span::builder().build(None);
        assert!(plain.classes.is_empty());
    }

    #[test]
    fn symbols_mark_fallback_scripts_and_dotless_i() {
        let cjk = SymbolNode::builder().text("\u{4e2d}").build();
        assert!(cjk.classes.iter().any(|c| c == "cjk_fallback"));
        let i_hat = SymbolNode::builder().text("\u{ee}").build();
        assert_eq!(i_hat.text, "\u{131}\u{302}");
    }

    #[test]
    fn walk_visits_every_node() {
        let leaf = RenderNode::from(SymbolNode::builder().text("x").height(0.5).build());
        let inner = RenderNode::from(Span::builder().children(vec![leaf.clone()]).build(None));
        let root = RenderNode::from(Span::builder().children(vec![inner, leaf]).build(None));
        let mut levels = Vec::new();
        root.walk(&mut |_, level| levels.push(level));
        assert_eq!(levels, [0, 1, 2, 1]);
        assert_eq!(root.children()[1].height(), 0.5);
    }
}
