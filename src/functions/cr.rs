//! Line breaks: `\\`, `\newline` and `\cr`, each with an optional extra
//! space such as `\\[1em]`.

use crate::box_tree::RenderNode;
use crate::build_common::make_span;
use crate::context::TypesetContext;
use crate::define_function::{FunctionContext, FunctionDefSpec, FunctionPropSpec};
use crate::options::Options;
use crate::parser::parse_node::{NodeType, ParseNode, ParseNodeCr, assert_node_type};
use crate::types::{ArgType, ParseError};
use crate::units::calculate_size;

/// Registers the line breaks `\\`, `\newline` and `\cr`
pub fn define_cr(ctx: &mut TypesetContext) {
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Cr),
        names: &["\\\\", "\\newline", "\\cr"],
        props: FunctionPropSpec {
            num_optional_args: 1,
            arg_types: Some(vec![ArgType::Size]),
            allowed_in_text: true,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, _args, opt_args| {
            let size = match opt_args.into_iter().next().flatten() {
                Some(ParseNode::Size(size)) => Some(size.value),
                _ => None,
            };
            // \cr only ends table rows; in display mode LaTeX ignores the
            // other two.
            let new_row = context.func_name == "\\cr";
            let new_line = !new_row
                && (!context.parser.settings.display_mode
                    || !context.parser.settings.use_strict_behavior(
                        "newLineInDisplayMode",
                        "In LaTeX, \\\\ or \\newline does nothing in display mode",
                    ));
            Ok(ParseNode::Cr(ParseNodeCr {
                mode: context.mode(),
                loc: context.loc(),
                new_line,
                new_row,
                size,
            }))
        }),
        builder: Some(builder),
    });
}

fn builder(node: &ParseNode, options: &Options, _ctx: &TypesetContext) -> Result<RenderNode, ParseError> {
    let ParseNode::Cr(group) = node else {
        assert_node_type(node, NodeType::Cr)?;
        return Err(ParseError::new("Expected Cr node"));
    };
    let mut span = make_span(vec!["mspace".to_owned()], Vec::new(), Some(options), None);
    if group.new_line {
        span.classes.push("newline".to_owned());
        if let Some(size) = &group.size {
            span.style.margin_top = Some(calculate_size(size, options));
        }
    }
    Ok(span.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mode;
    use crate::units::{Measurement, Unit};

    #[test]
    fn line_breaks_carry_their_extra_space() {
        let ctx = TypesetContext::shared();
        let node = ParseNode::Cr(ParseNodeCr {
            mode: Mode::Math,
            loc: None,
            new_line: true,
            new_row: false,
            size: Some(Measurement::new(1.0, Unit::Em)),
        });
        let built = builder(&node, &Options::default(), ctx).unwrap();
        assert_eq!(built.classes(), ["mspace", "newline"]);
        assert_eq!(built.style().and_then(|s| s.margin_top), Some(1.0));
    }
}
