//! Operators: big symbols such as `\sum`, named operators such as `\sin`
//! and `\lim`, and `\mathop`.
//!
//! Operators with limits lay out their own scripts, above and below the
//! operator in display style; the sup/sub builder hands them the whole
//! node.

use phf::phf_map;

use crate::box_tree::RenderNode;
use crate::build_common::{make_span, make_symbol, mathsym};
use crate::build_layout::{GroupKind, build_expression};
use crate::context::TypesetContext;
use crate::define_function::{FunctionContext, FunctionDefSpec, FunctionPropSpec, ord_argument};
use crate::options::Options;
use crate::parser::parse_node::{NodeType, OpContent, ParseNode, ParseNodeOp};
use crate::style::Style;
use crate::types::{Mode, ParseError, ParseErrorKind};

use super::utils::assemble_sup_sub;

/// Unicode operator characters to the command they stand for.
static SINGLE_CHAR_OPS: phf::Map<&'static str, &'static str> = phf_map! {
    "\u{220f}" => "\\prod",
    "\u{2210}" => "\\coprod",
    "\u{2211}" => "\\sum",
    "\u{22c0}" => "\\bigwedge",
    "\u{22c1}" => "\\bigvee",
    "\u{22c2}" => "\\bigcap",
    "\u{22c3}" => "\\bigcup",
    "\u{2a00}" => "\\bigodot",
    "\u{2a01}" => "\\bigoplus",
    "\u{2a02}" => "\\bigotimes",
    "\u{2a04}" => "\\biguplus",
    "\u{2a06}" => "\\bigsqcup",
    "\u{222b}" => "\\int",
    "\u{222c}" => "\\iint",
    "\u{222d}" => "\\iiint",
    "\u{222e}" => "\\oint",
};

/// Named operators drawn as two words.
static SPACED_NAMES: phf::Map<&'static str, (&'static str, &'static str)> = phf_map! {
    "\\limsup" => ("lim", "sup"),
    "\\liminf" => ("lim", "inf"),
};

/// `\smallint` keeps its size in display style.
fn no_successor(name: &str) -> bool {
    name == "\\smallint"
}

fn op_node(context: &FunctionContext, limits: bool, content: OpContent) -> ParseNode {
    ParseNode::Op(ParseNodeOp {
        mode: context.mode(),
        loc: context.loc(),
        limits,
        always_handle_sup_sub: false,
        suppress_base_shift: false,
        content,
    })
}

/// Registers big operators
pub fn define_op(ctx: &mut TypesetContext) {
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Op),
        names: &[
            "\\coprod",
            "\\bigvee",
            "\\bigwedge",
            "\\biguplus",
            "\\bigcap",
            "\\bigcup",
            "\\intop",
            "\\prod",
            "\\sum",
            "\\bigotimes",
            "\\bigoplus",
            "\\bigodot",
            "\\bigsqcup",
            "\\smallint",
            "\u{220f}",
            "\u{2210}",
            "\u{2211}",
            "\u{22c0}",
            "\u{22c1}",
            "\u{22c2}",
            "\u{22c3}",
            "\u{2a00}",
            "\u{2a01}",
            "\u{2a02}",
            "\u{2a04}",
            "\u{2a06}",
        ],
        props: FunctionPropSpec::default(),
        handler: Some(|context: FunctionContext, _args, _opt_args| {
            let name = SINGLE_CHAR_OPS
                .get(context.func_name.as_str())
                .map_or_else(|| context.func_name.clone(), |name| (*name).to_owned());
            Ok(op_node(&context, true, OpContent::Symbol(name)))
        }),
        builder: Some(builder),
    });

    // Integrals take their scripts to the side, even in display style.
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Op),
        names: &[
            "\\int", "\\iint", "\\iiint", "\\oint", "\u{222b}", "\u{222c}", "\u{222d}", "\u{222e}",
        ],
        props: FunctionPropSpec::default(),
        handler: Some(|context: FunctionContext, _args, _opt_args| {
            let name = SINGLE_CHAR_OPS
                .get(context.func_name.as_str())
                .map_or_else(|| context.func_name.clone(), |name| (*name).to_owned());
            Ok(op_node(&context, false, OpContent::Symbol(name)))
        }),
        builder: Some(builder),
    });

    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Op),
        names: &["\\mathop"],
        props: FunctionPropSpec {
            num_args: 1,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, args, _opt_args| {
            let body = args.into_iter().next().map(ord_argument).unwrap_or_default();
            Ok(op_node(&context, false, OpContent::Body(body)))
        }),
        builder: Some(builder),
    });

    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Op),
        names: &[
            "\\arcsin", "\\arccos", "\\arctan", "\\arg", "\\cos", "\\cosh", "\\cot", "\\coth",
            "\\csc", "\\deg", "\\dim", "\\exp", "\\hom", "\\ker", "\\lg", "\\ln", "\\log", "\\sec",
            "\\sin", "\\sinh", "\\tan", "\\tanh",
        ],
        props: FunctionPropSpec::default(),
        handler: Some(|context: FunctionContext, _args, _opt_args| {
            let name = context.func_name.clone();
            Ok(op_node(&context, false, OpContent::Name(name)))
        }),
        builder: Some(builder),
    });

    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Op),
        names: &[
            "\\det", "\\gcd", "\\inf", "\\lim", "\\liminf", "\\limsup", "\\max", "\\min", "\\Pr",
            "\\sup",
        ],
        props: FunctionPropSpec::default(),
        handler: Some(|context: FunctionContext, _args, _opt_args| {
            let name = context.func_name.clone();
            Ok(op_node(&context, true, OpContent::Name(name)))
        }),
        builder: Some(builder),
    });
}

/// Letters of a named operator, upright, as one `mop` span.
fn build_name(ctx: &TypesetContext, name: &str, mode: Mode, options: &Options) -> Result<RenderNode, ParseError> {
    let letters = |word: &str| -> Result<Vec<RenderNode>, ParseError> {
        word.chars()
            .map(|ch| Ok(mathsym(ctx, &ch.to_string(), mode, options, Vec::new())?.into()))
            .collect()
    };
    let children = match SPACED_NAMES.get(name) {
        Some(&(first, second)) => {
            let mut children = letters(first)?;
            // \, between the words
            let mut thin = make_span(vec!["mspace".to_owned()], Vec::new(), Some(options), None);
            thin.style.margin_right = Some(3.0 * options.font_metrics().css_em_per_mu);
            children.push(thin.into());
            children.extend(letters(second)?);
            children
        }
        None => letters(name.trim_start_matches('\\'))?,
    };
    Ok(make_span(vec!["mop".to_owned()], children, Some(options), None).into())
}

/// Lay out an operator, or a sup/sub node whose base is one.
pub(super) fn builder(node: &ParseNode, options: &Options, ctx: &TypesetContext) -> Result<RenderNode, ParseError> {
    let (group, sup_group, sub_group, has_limits) = match node {
        ParseNode::SupSub(supsub) => match supsub.base.as_deref() {
            Some(ParseNode::Op(op)) => (op, supsub.sup.as_deref(), supsub.sub.as_deref(), true),
            _ => {
                return Err(ParseError::with_token(
                    ParseErrorKind::ExpectedNode { expected: NodeType::Op },
                    node,
                ));
            }
        },
        ParseNode::Op(op) => (op, None, None, false),
        _ => {
            return Err(ParseError::with_token(
                ParseErrorKind::ExpectedNode { expected: NodeType::Op },
                node,
            ));
        }
    };

    let style = options.style;
    let mut base = match &group.content {
        OpContent::Symbol(name) => {
            let large = style.size() == Style::Display.size() && !no_successor(name);
            let (font_name, size_class) = if large {
                ("Size2-Regular", "large-op")
            } else {
                ("Size1-Regular", "small-op")
            };
            let classes = vec!["mop".to_owned(), "op-symbol".to_owned(), size_class.to_owned()];
            make_symbol(ctx, name, font_name, Mode::Math, Some(options), classes)?.into()
        }
        OpContent::Name(name) => build_name(ctx, name, group.mode, options)?,
        OpContent::Body(body) => {
            let mut inner = build_expression(ctx, body, options, GroupKind::Real, (None, None))?;
            if let [RenderNode::Symbol(_)] = inner.as_slice() {
                let mut symbol = inner.remove(0);
                // A lone symbol becomes the operator itself.
                if let Some(first) = symbol.classes_mut().and_then(|classes| classes.first_mut()) {
                    "mop".clone_into(first);
                }
                symbol
            } else {
                make_span(vec!["mop".to_owned()], inner, Some(options), None).into()
            }
        }
    };

    // Center single glyphs on the axis.
    let (base_shift, slant) = match &base {
        RenderNode::Symbol(symbol) if !group.suppress_base_shift => (
            (symbol.height - symbol.depth) / 2.0 - options.font_metrics().axis_height,
            symbol.italic,
        ),
        _ => (0.0, 0.0),
    };

    if has_limits {
        return assemble_sup_sub(ctx, base, sup_group, sub_group, options, style, slant, base_shift);
    }
    if base_shift != 0.0
        && let Some(box_style) = base.style_mut()
    {
        box_style.top = Some(base_shift);
    }
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(limits: bool, content: OpContent) -> ParseNode {
        ParseNode::Op(ParseNodeOp {
            mode: Mode::Math,
            loc: None,
            limits,
            always_handle_sup_sub: false,
            suppress_base_shift: false,
            content,
        })
    }

    #[test]
    fn big_operators_grow_in_display_style() {
        let ctx = TypesetContext::shared();
        let sum = op(true, OpContent::Symbol("\\sum".to_owned()));
        let text = builder(&sum, &Options::default(), ctx).unwrap();
        assert_eq!(text.classes(), ["mop", "op-symbol", "small-op"]);
        let display = Options::builder().style(Style::Display).build();
        let big = builder(&sum, &display, ctx).unwrap();
        assert_eq!(big.classes(), ["mop", "op-symbol", "large-op"]);
        // Centered on the axis: (1.05 - 0.55001) / 2 - 0.25
        let top = big.style().and_then(|s| s.top).unwrap();
        assert!((top - -0.000005).abs() < 1e-9);
    }

    #[test]
    fn named_operators_are_upright_letters() {
        let ctx = TypesetContext::shared();
        let sin = builder(&op(false, OpContent::Name("\\sin".to_owned())), &Options::default(), ctx).unwrap();
        assert_eq!(sin.classes(), ["mop"]);
        assert_eq!(sin.children().len(), 3);
        let limsup = builder(&op(true, OpContent::Name("\\limsup".to_owned())), &Options::default(), ctx).unwrap();
        assert_eq!(limsup.children().len(), 7);
        assert!(limsup.children()[3].is_space());
    }
}
