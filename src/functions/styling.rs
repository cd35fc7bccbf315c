//! Style declarations: `\displaystyle`, `\textstyle`, `\scriptstyle` and
//! `\scriptscriptstyle`, each running to the end of the group.

use core::str::FromStr as _;

use crate::box_tree::RenderNode;
use crate::build_common::make_fragment;
use crate::build_layout::{GroupKind, build_expression};
use crate::context::TypesetContext;
use crate::define_function::{FunctionContext, FunctionDefSpec, FunctionPropSpec};
use crate::options::Options;
use crate::parser::parse_node::{NodeType, ParseNode, ParseNodeStyling, assert_node_type};
use crate::style::Style;
use crate::types::{ParseError, ParseErrorKind, StyleVariant};

/// Registers `\displaystyle` and the other style switches
pub fn define_styling(ctx: &mut TypesetContext) {
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Styling),
        names: &["\\displaystyle", "\\textstyle", "\\scriptstyle", "\\scriptscriptstyle"],
        props: FunctionPropSpec {
            allowed_in_text: true,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, _args, _opt_args| {
            let variant = context
                .func_name
                .strip_prefix('\\')
                .and_then(|name| name.strip_suffix("style"))
                .and_then(|name| StyleVariant::from_str(name).ok())
                .ok_or_else(|| {
                    ParseError::new(ParseErrorKind::NoFunctionHandler {
                        name: context.func_name.clone(),
                    })
                })?;
            let style = Style::from(variant);
            let mode = context.mode();
            let loc = context.loc();
            let body = context.parser.parse_expression(true, context.break_on_token_text)?;
            Ok(ParseNode::Styling(ParseNodeStyling { mode, loc, style, body }))
        }),
        builder: Some(builder),
    });
}

/// Build `body` at the size of `options`, marking every box with the size
/// change from `base_options` and scaling its extent to the outer size.
fn sizing_group(
    ctx: &TypesetContext,
    body: &[ParseNode],
    options: &Options,
    base_options: &Options,
) -> Result<RenderNode, ParseError> {
    let mut inner = build_expression(ctx, body, options, GroupKind::Partial, (None, None))?;
    let multiplier = options.size_multiplier / base_options.size_multiplier;

    for item in &mut inner {
        let Some(classes) = item.classes_mut() else {
            continue;
        };
        match classes.iter().position(|c| c == "sizing") {
            // Nested change: reset from the outer size instead.
            Some(pos) if classes.get(pos + 1) == Some(&format!("reset-size{}", options.size)) => {
                classes[pos + 1] = format!("reset-size{}", base_options.size);
            }
            Some(_) => {}
            None => classes.extend(options.sizing_classes(base_options)),
        }
        item.set_height(item.height() * multiplier);
        item.set_depth(item.depth() * multiplier);
    }

    Ok(make_fragment(inner).into())
}

fn builder(node: &ParseNode, options: &Options, ctx: &TypesetContext) -> Result<RenderNode, ParseError> {
    let ParseNode::Styling(group) = node else {
        assert_node_type(node, NodeType::Styling)?;
        return Err(ParseError::new("Expected Styling node"));
    };
    let new_options = options.having_style(group.style).with_font(String::new());
    sizing_group(ctx, &group.body, &new_options, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_node::ParseNodeSymbol;
    use crate::types::Mode;

    #[test]
    fn script_style_shrinks_and_marks_its_boxes() {
        let ctx = TypesetContext::shared();
        let node = ParseNode::Styling(ParseNodeStyling {
            mode: Mode::Math,
            loc: None,
            style: Style::Script,
            body: vec![ParseNode::MathOrd(ParseNodeSymbol {
                mode: Mode::Math,
                loc: None,
                text: "x".to_owned(),
            })],
        });
        let built = builder(&node, &Options::default(), ctx).unwrap();
        let [x] = built.children() else {
            panic!("expected one box");
        };
        assert!(x.has_class("sizing"));
        assert!((x.height() - 0.43056 * 0.7).abs() < 1e-9);
    }
}
