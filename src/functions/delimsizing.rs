//! Sized delimiters: the `\big` family at fixed sizes, and `\left ...
//! \right` pairs that grow to fit what they enclose.

use phf::phf_map;

use crate::box_tree::RenderNode;
use crate::build_common::{make_null_delimiter, make_span};
use crate::build_layout::{AtomClass, GroupKind, build_expression};
use crate::context::TypesetContext;
use crate::define_function::{FunctionContext, FunctionDefSpec, FunctionPropSpec};
use crate::delimiter::{is_sizable, left_right_delim, sized_delim};
use crate::functions::color::CURRENT_COLOR;
use crate::options::Options;
use crate::parser::parse_node::{
    NodeType, ParseNode, ParseNodeDelimSizing, ParseNodeLeftRight, ParseNodeLeftRightRight,
    assert_node_type,
};
use crate::types::{ParseError, ParseErrorKind};

/// Atom class and size of each fixed-size command.
static DELIMITER_SIZES: phf::Map<&'static str, (&'static str, usize)> = phf_map! {
    "\\bigl" => ("mopen", 1),
    "\\Bigl" => ("mopen", 2),
    "\\biggl" => ("mopen", 3),
    "\\Biggl" => ("mopen", 4),
    "\\bigr" => ("mclose", 1),
    "\\Bigr" => ("mclose", 2),
    "\\biggr" => ("mclose", 3),
    "\\Biggr" => ("mclose", 4),
    "\\bigm" => ("mrel", 1),
    "\\Bigm" => ("mrel", 2),
    "\\biggm" => ("mrel", 3),
    "\\Biggm" => ("mrel", 4),
    "\\big" => ("mord", 1),
    "\\Big" => ("mord", 2),
    "\\bigg" => ("mord", 3),
    "\\Bigg" => ("mord", 4),
};

/// The delimiter named by `arg`: a sizable symbol, or `.` for none.
fn check_delimiter(arg: Option<ParseNode>, func_name: &str) -> Result<String, ParseError> {
    let arg = arg.ok_or_else(|| ParseError::new("Expected a delimiter"))?;
    match arg.text() {
        Some(text) if text == "." || is_sizable(text) => Ok(text.to_owned()),
        text => Err(ParseError::with_token(
            ParseErrorKind::InvalidDelimiterAfter {
                delimiter: text.map_or_else(|| NodeType::from(&arg).to_string(), str::to_owned),
                function: func_name.to_owned(),
            },
            &arg,
        )),
    }
}

/// Registers `\big` and friends plus `\left`/`\right`
pub fn define_delimsizing(ctx: &mut TypesetContext) {
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::DelimSizing),
        names: &[
            "\\bigl", "\\Bigl", "\\biggl", "\\Biggl", "\\bigr", "\\Bigr", "\\biggr", "\\Biggr",
            "\\bigm", "\\Bigm", "\\biggm", "\\Biggm", "\\big", "\\Big", "\\bigg", "\\Bigg",
        ],
        props: FunctionPropSpec {
            num_args: 1,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, args, _opt_args| {
            let delim = check_delimiter(args.into_iter().next(), &context.func_name)?;
            let &(mclass, size) = DELIMITER_SIZES
                .get(context.func_name.as_str())
                .ok_or_else(|| ParseError::new("Unknown delimiter size"))?;
            Ok(ParseNode::DelimSizing(ParseNodeDelimSizing {
                mode: context.mode(),
                loc: context.loc(),
                size,
                mclass: mclass.to_owned(),
                delim,
            }))
        }),
        builder: Some(delimsizing_builder),
    });

    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::LeftRightRight),
        names: &["\\right"],
        props: FunctionPropSpec {
            num_args: 1,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, args, _opt_args| {
            let delim = check_delimiter(args.into_iter().next(), &context.func_name)?;
            // A `\color` earlier in the group also colors the closing delimiter.
            let color = context.parser.gullet.macro_body(CURRENT_COLOR).map(str::to_owned);
            Ok(ParseNode::LeftRightRight(ParseNodeLeftRightRight {
                mode: context.mode(),
                loc: context.loc(),
                delim,
                color,
            }))
        }),
        builder: None,
    });

    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::LeftRight),
        names: &["\\left"],
        props: FunctionPropSpec {
            num_args: 1,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, args, _opt_args| {
            let left = check_delimiter(args.into_iter().next(), &context.func_name)?;
            let mode = context.mode();
            let loc = context.loc();
            let parser = context.parser;

            let body = parser.parse_expression(false, None)?;
            parser.expect("\\right", false)?;
            let Some(ParseNode::LeftRightRight(right)) = parser.parse_function(None, None, None)? else {
                return Err(ParseError::new("Expected \\right after \\left"));
            };
            Ok(ParseNode::LeftRight(ParseNodeLeftRight {
                mode,
                loc,
                body,
                left,
                right: right.delim,
                right_color: right.color,
            }))
        }),
        builder: Some(leftright_builder),
    });
}

fn delimsizing_builder(node: &ParseNode, options: &Options, ctx: &TypesetContext) -> Result<RenderNode, ParseError> {
    let ParseNode::DelimSizing(group) = node else {
        assert_node_type(node, NodeType::DelimSizing)?;
        return Err(ParseError::new("Expected DelimSizing node"));
    };
    if group.delim == "." {
        // An empty delimiter still takes part in spacing.
        return Ok(make_span(vec![group.mclass.clone()], Vec::new(), None, None).into());
    }
    Ok(sized_delim(
        ctx,
        &group.delim,
        group.size,
        options,
        group.mode,
        core::slice::from_ref(&group.mclass),
    )?
    .into())
}

fn leftright_builder(node: &ParseNode, options: &Options, ctx: &TypesetContext) -> Result<RenderNode, ParseError> {
    let ParseNode::LeftRight(group) = node else {
        assert_node_type(node, NodeType::LeftRight)?;
        return Err(ParseError::new("Expected LeftRight node"));
    };

    let mut inner = build_expression(
        ctx,
        &group.body,
        options,
        GroupKind::Real,
        (Some(AtomClass::Mopen), Some(AtomClass::Mclose)),
    )?;

    let (inner_height, inner_depth) = inner
        .iter()
        .fold((0.0f64, 0.0f64), |(h, d), item| (h.max(item.height()), d.max(item.depth())));
    let inner_height = inner_height * options.size_multiplier;
    let inner_depth = inner_depth * options.size_multiplier;

    let left = if group.left == "." {
        make_null_delimiter(options, &["mopen"])
    } else {
        left_right_delim(
            ctx,
            &group.left,
            inner_height,
            inner_depth,
            options,
            group.mode,
            &["mopen".to_owned()],
        )?
    };
    inner.insert(0, left.into());

    let right = if group.right == "." {
        make_null_delimiter(options, &["mclose"])
    } else {
        let colored;
        let right_options = match &group.right_color {
            Some(color) => {
                colored = options.with_color(color.clone());
                &colored
            }
            None => options,
        };
        left_right_delim(
            ctx,
            &group.right,
            inner_height,
            inner_depth,
            right_options,
            group.mode,
            &["mclose".to_owned()],
        )?
    };
    inner.push(right.into());

    log::trace!("\\left{} \\right{} around {} boxes", group.left, group.right, inner.len() - 2);
    Ok(make_span(vec!["minner".to_owned()], inner, Some(options), None).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_node::{ParseNodeAtom, ParseNodeSymbol};
    use crate::symbols::Atom;
    use crate::types::Mode;

    fn open_paren() -> ParseNode {
        ParseNode::Atom(ParseNodeAtom {
            mode: Mode::Math,
            loc: None,
            family: Atom::Open,
            text: "(".to_owned(),
        })
    }

    #[test]
    fn delimiters_must_be_sizable() {
        assert_eq!(check_delimiter(Some(open_paren()), "\\left").unwrap(), "(");
        let x = ParseNode::MathOrd(ParseNodeSymbol {
            mode: Mode::Math,
            loc: None,
            text: "x".to_owned(),
        });
        let err = check_delimiter(Some(x), "\\bigl").unwrap_err();
        assert_eq!(err.message(), "Invalid delimiter: 'x' after '\\bigl'");
    }

    #[test]
    fn empty_left_delimiter_is_a_null_delimiter() {
        let ctx = TypesetContext::shared();
        let node = ParseNode::LeftRight(ParseNodeLeftRight {
            mode: Mode::Math,
            loc: None,
            body: vec![ParseNode::MathOrd(ParseNodeSymbol {
                mode: Mode::Math,
                loc: None,
                text: "x".to_owned(),
            })],
            left: ".".to_owned(),
            right: ")".to_owned(),
            right_color: Some("blue".to_owned()),
        });
        let built = leftright_builder(&node, &Options::default(), ctx).unwrap();
        assert!(built.has_class("minner"));
        let children = built.children();
        assert_eq!(children.len(), 3);
        assert!(children[0].has_class("nulldelimiter"));
        assert!(children[2].has_class("mclose"));
    }

    #[test]
    fn left_right_groups_nest() {
        let settings = crate::types::Settings::default();
        let tree = crate::core::parse(
            TypesetContext::shared(),
            "\\left[ \\left( x \\right) y \\right]",
            &settings,
        )
        .unwrap();
        let [ParseNode::LeftRight(outer)] = tree.as_slice() else {
            panic!("expected one outer group");
        };
        assert_eq!((outer.left.as_str(), outer.right.as_str()), ("[", "]"));
        let [ParseNode::LeftRight(inner), _] = outer.body.as_slice() else {
            panic!("expected an inner group then y");
        };
        assert_eq!((inner.left.as_str(), inner.right.as_str()), ("(", ")"));

        let err = crate::core::parse(TypesetContext::shared(), "\\left( \\left( x \\right)", &settings)
            .unwrap_err();
        assert_eq!(err.message(), "Expected '\\right', got 'EOF'");
    }
}
