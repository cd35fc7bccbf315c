//! Explicit atom classes: `\mathord` to `\mathinner`, and the stacking
//! commands `\stackrel`, `\overset` and `\underset`.

use crate::box_tree::RenderNode;
use crate::build_common::make_span;
use crate::build_layout::{GroupKind, build_expression};
use crate::context::TypesetContext;
use crate::define_function::{FunctionContext, FunctionDefSpec, FunctionPropSpec, ord_argument};
use crate::options::Options;
use crate::parser::parse_node::{
    NodeType, OpContent, ParseNode, ParseNodeMClass, ParseNodeOp, ParseNodeSupSub, assert_node_type,
};
use crate::symbols::Atom;
use crate::types::ParseError;

/// Class a stacked construct takes from its base: binary operators and
/// relations keep theirs, anything else is an ordinary.
fn binrel_class(arg: &ParseNode) -> &'static str {
    let atom = match arg {
        ParseNode::OrdGroup(group) => group.body.first().unwrap_or(arg),
        _ => arg,
    };
    match atom {
        ParseNode::Atom(atom) if atom.family == Atom::Bin => "mbin",
        ParseNode::Atom(atom) if atom.family == Atom::Rel => "mrel",
        _ => "mord",
    }
}

/// Registers the `\mathbin`-style class overrides and `\stackrel`
pub fn define_mclass(ctx: &mut TypesetContext) {
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::MClass),
        names: &[
            "\\mathord",
            "\\mathbin",
            "\\mathrel",
            "\\mathopen",
            "\\mathclose",
            "\\mathpunct",
            "\\mathinner",
        ],
        props: FunctionPropSpec {
            num_args: 1,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, args, _opt_args| {
            let body = args
                .into_iter()
                .next()
                .ok_or_else(|| ParseError::new("Class command needs an argument"))?;
            // \mathord -> mord, \mathpunct -> mpunct
            let mclass = format!("m{}", &context.func_name[5..]);
            Ok(ParseNode::MClass(ParseNodeMClass {
                mode: context.mode(),
                loc: context.loc(),
                mclass,
                body: ord_argument(body),
            }))
        }),
        builder: Some(builder),
    });

    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::MClass),
        names: &["\\stackrel", "\\overset", "\\underset"],
        props: FunctionPropSpec {
            num_args: 2,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, args, _opt_args| {
            let mut args = args.into_iter();
            let (Some(shifted), Some(base)) = (args.next(), args.next()) else {
                return Err(ParseError::new("Stacking needs two arguments"));
            };
            let is_stackrel = context.func_name == "\\stackrel";
            let mclass = if is_stackrel { "mrel" } else { binrel_class(&base) };

            let base_op = ParseNode::Op(ParseNodeOp {
                mode: base.mode(),
                loc: context.loc(),
                limits: true,
                always_handle_sup_sub: true,
                suppress_base_shift: !is_stackrel,
                content: OpContent::Body(ord_argument(base)),
            });
            let is_under = context.func_name == "\\underset";
            let shifted_mode = shifted.mode();
            let shifted = Some(Box::new(shifted));
            let supsub = ParseNode::SupSub(ParseNodeSupSub {
                mode: shifted_mode,
                loc: context.loc(),
                base: Some(Box::new(base_op)),
                sup: if is_under { None } else { shifted.clone() },
                sub: if is_under { shifted } else { None },
            });

            Ok(ParseNode::MClass(ParseNodeMClass {
                mode: context.mode(),
                loc: context.loc(),
                mclass: mclass.to_owned(),
                body: vec![supsub],
            }))
        }),
        builder: Some(builder),
    });
}

fn builder(node: &ParseNode, options: &Options, ctx: &TypesetContext) -> Result<RenderNode, ParseError> {
    let ParseNode::MClass(group) = node else {
        assert_node_type(node, NodeType::MClass)?;
        return Err(ParseError::new("Expected MClass node"));
    };
    let elements = build_expression(ctx, &group.body, options, GroupKind::Real, (None, None))?;
    Ok(make_span(vec![group.mclass.clone()], elements, Some(options), None).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_node::{ParseNodeAtom, ParseNodeSymbol};
    use crate::types::Mode;

    #[test]
    fn stacked_bases_keep_their_class() {
        let rel = ParseNode::Atom(ParseNodeAtom {
            mode: Mode::Math,
            loc: None,
            family: Atom::Rel,
            text: "=".to_owned(),
        });
        assert_eq!(binrel_class(&rel), "mrel");
        let grouped = ParseNode::ord_group(Mode::Math, vec![rel]);
        assert_eq!(binrel_class(&grouped), "mrel");
        let letter = ParseNode::MathOrd(ParseNodeSymbol {
            mode: Mode::Math,
            loc: None,
            text: "x".to_owned(),
        });
        assert_eq!(binrel_class(&letter), "mord");
    }
}
