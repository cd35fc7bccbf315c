//! Accents over a base: `\hat` and friends in math, `\'` and friends in
//! text, and the stretchy ones such as `\widehat` and `\overrightarrow`.

use phf::phf_set;

use crate::box_tree::RenderNode;
use crate::build_common::{VListChild, VListElem, VListParam, make_ord, make_span, make_v_list, static_svg};
use crate::build_layout::build_group;
use crate::context::TypesetContext;
use crate::define_function::{FunctionContext, FunctionDefSpec, FunctionPropSpec, normalize_argument};
use crate::options::Options;
use crate::parser::parse_node::{NodeType, ParseNode, ParseNodeAccent, ParseNodeSymbol};
use crate::stretchy::svg_span;
use crate::types::{ErrorLocationProvider, Mode, ParseError, ParseErrorKind};

static NON_STRETCHY_ACCENTS: phf::Set<&'static str> = phf_set! {
    "\\acute", "\\grave", "\\ddot", "\\tilde", "\\bar", "\\breve",
    "\\check", "\\hat", "\\vec", "\\dot", "\\mathring",
};

/// Stretchy accents that still follow the base glyph's skew.
static SHIFTY_WIDE_ACCENTS: phf::Set<&'static str> = phf_set!("\\widehat", "\\widetilde");

const MATH_ACCENTS: &[&str] = &[
    "\\acute",
    "\\grave",
    "\\ddot",
    "\\tilde",
    "\\bar",
    "\\breve",
    "\\check",
    "\\hat",
    "\\vec",
    "\\dot",
    "\\mathring",
    "\\widehat",
    "\\widetilde",
    "\\overrightarrow",
    "\\overleftarrow",
    "\\overleftrightarrow",
];

const TEXT_ACCENTS: &[&str] = &["\\'", "\\`", "\\^", "\\~", "\\=", "\\u", "\\.", "\\\"", "\\r", "\\v"];

/// Registers `\hat`, `\vec` and the other accents, math and text
pub fn define_accent(ctx: &mut TypesetContext) {
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Accent),
        names: MATH_ACCENTS,
        props: FunctionPropSpec {
            num_args: 1,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, args, _opt_args| {
            let arg = args
                .into_iter()
                .next()
                .ok_or_else(|| ParseError::new("Accent needs an argument"))?;
            let base = normalize_argument(&arg).clone();
            let is_stretchy = !NON_STRETCHY_ACCENTS.contains(context.func_name.as_str());
            let is_shifty = !is_stretchy || SHIFTY_WIDE_ACCENTS.contains(context.func_name.as_str());
            Ok(ParseNode::Accent(Box::new(ParseNodeAccent {
                mode: context.mode(),
                loc: context.loc(),
                label: context.func_name,
                is_stretchy,
                is_shifty,
                base,
            })))
        }),
        builder: Some(builder),
    });

    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Accent),
        names: TEXT_ACCENTS,
        props: FunctionPropSpec {
            num_args: 1,
            allowed_in_text: true,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, args, _opt_args| {
            let base = args
                .into_iter()
                .next()
                .ok_or_else(|| ParseError::new("Accent needs an argument"))?;
            // Text accents draw from the text font even inside math.
            if context.mode() == Mode::Math {
                context.parser.settings.report_nonstrict(
                    "mathVsTextAccents",
                    &format!("LaTeX's accent {} works only in text mode", context.func_name),
                    context.token.map(|token| token as &dyn ErrorLocationProvider),
                )?;
            }
            Ok(ParseNode::Accent(Box::new(ParseNodeAccent {
                mode: Mode::Text,
                loc: context.loc(),
                label: context.func_name,
                is_stretchy: false,
                is_shifty: true,
                base,
            })))
        }),
        builder: Some(builder),
    });
}

/// Number of atoms an accent spans, which picks the wide-accent image.
fn base_len(base: &ParseNode) -> usize {
    match base {
        ParseNode::OrdGroup(group) => group.body.len(),
        _ => 1,
    }
}

/// Lay out an accent, or a sup/sub node whose base is an accent over a
/// single character. In the latter case the scripts attach to the
/// character, as if the accent weren't there, and the accent goes on top.
pub(super) fn builder(node: &ParseNode, options: &Options, ctx: &TypesetContext) -> Result<RenderNode, ParseError> {
    let (group, supsub) = match node {
        ParseNode::Accent(accent) => (accent.as_ref(), None),
        ParseNode::SupSub(supsub) => {
            let Some(ParseNode::Accent(accent)) = supsub.base.as_deref() else {
                return Err(ParseError::with_token(
                    ParseErrorKind::ExpectedNode {
                        expected: NodeType::Accent,
                    },
                    node,
                ));
            };
            let mut inner = supsub.clone();
            inner.base = Some(Box::new(accent.base.clone()));
            let built = build_group(ctx, &ParseNode::SupSub(inner), options, None)?;
            (accent.as_ref(), Some(built))
        }
        _ => {
            return Err(ParseError::with_token(
                ParseErrorKind::ExpectedNode {
                    expected: NodeType::Accent,
                },
                node,
            ));
        }
    };
    let base = &group.base;

    let body = build_group(ctx, base, &options.having_cramped_style(), None)?;

    // Accents over a single character center on the glyph's skew.
    let skew = if group.is_shifty && base.is_character_box() {
        match build_group(ctx, base.base_elem(), &options.having_cramped_style(), None)? {
            RenderNode::Symbol(symbol) => symbol.skew,
            _ => 0.0,
        }
    } else {
        0.0
    };

    // The accent sits at x-height; taller bases push it up.
    let clearance = body.height().min(options.font_metrics().x_height);

    let accent_body = if group.is_stretchy {
        let image = svg_span(&group.label, base_len(base), options)?;
        let mut elem = VListElem::builder()
            .elem(image.into())
            .wrapper_classes(vec!["svg-align".to_owned()])
            .build();
        if skew > 0.0 {
            elem.wrapper_style.margin_left = Some(2.0 * skew);
        }
        make_v_list(VListParam::FirstBaseline(vec![VListElem::plain(body).into(), elem.into()]))
    } else {
        let (accent, width): (RenderNode, f64) = if group.label == "\\vec" {
            let image = static_svg("vec", options);
            let width = image.width.unwrap_or(0.0);
            (image.into(), width)
        } else {
            let token = ParseNode::TextOrd(ParseNodeSymbol {
                mode: group.mode,
                loc: group.loc.clone(),
                text: group.label.clone(),
            });
            let mut accent = make_ord(ctx, &token, options)?;
            if let RenderNode::Symbol(symbol) = &mut accent {
                // Accents never take an italic correction.
                symbol.italic = 0.0;
            }
            let width = accent.width().unwrap_or(0.0);
            (accent, width)
        };

        let mut accent_body = make_span(vec!["accent-body".to_owned()], vec![accent], None, None);
        accent_body.style.left = Some(skew - width / 2.0);
        make_v_list(VListParam::FirstBaseline(vec![
            VListElem::plain(body).into(),
            VListChild::Kern(-clearance),
            VListElem::plain(accent_body).into(),
        ]))
    };

    let accent_wrap: RenderNode = make_span(
        vec!["mord".to_owned(), "accent".to_owned()],
        vec![accent_body.into()],
        Some(options),
        None,
    )
    .into();

    let Some(mut supsub) = supsub else {
        return Ok(accent_wrap);
    };
    // Swap the bare character for the accented one.
    let accent_height = accent_wrap.height();
    if let RenderNode::Span(span) = &mut supsub {
        if let Some(first) = span.children.first_mut() {
            *first = accent_wrap;
        }
        span.height = span.height.max(accent_height);
        if let Some(class) = span.classes.first_mut() {
            "mord".clone_into(class);
        }
    }
    Ok(supsub)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accent(label: &str, base: &str, is_stretchy: bool) -> ParseNode {
        ParseNode::Accent(Box::new(ParseNodeAccent {
            mode: Mode::Math,
            loc: None,
            label: label.to_owned(),
            is_stretchy,
            is_shifty: !is_stretchy,
            base: ParseNode::MathOrd(ParseNodeSymbol {
                mode: Mode::Math,
                loc: None,
                text: base.to_owned(),
            }),
        }))
    }

    #[test]
    fn accents_center_on_the_skew() {
        let ctx = TypesetContext::shared();
        let built = builder(&accent("\\hat", "x", false), &Options::default(), ctx).unwrap();
        assert_eq!(built.classes(), ["mord", "accent"]);
        let mut left = None;
        built.walk(&mut |node, _| {
            if node.has_class("accent-body") {
                left = node.style().and_then(|style| style.left);
            }
        });
        // x has skew 0.02778; the hat is 0.5 wide
        assert!((left.unwrap() - (0.02778 - 0.25)).abs() < 1e-9);
    }

    #[test]
    fn stretchy_accents_use_an_image() {
        let ctx = TypesetContext::shared();
        let built = builder(&accent("\\overrightarrow", "x", true), &Options::default(), ctx).unwrap();
        let mut images = 0;
        built.walk(&mut |node, _| {
            if matches!(node, RenderNode::Svg(_)) {
                images += 1;
            }
        });
        assert_eq!(images, 1);
    }
}
