//! Links: `\href{url}{body}` and `\url{url}`

use crate::box_tree::RenderNode;
use crate::build_common::make_anchor;
use crate::build_layout::{GroupKind, build_expression};
use crate::context::TypesetContext;
use crate::define_function::{FunctionContext, FunctionDefSpec, FunctionPropSpec, ord_argument};
use crate::options::Options;
use crate::parser::parse_node::{NodeType, ParseNode, ParseNodeHref, ParseNodeSymbol, ParseNodeText, assert_node_type};
use crate::types::{ArgType, ParseError};

fn url_of(arg: Option<ParseNode>) -> Result<String, ParseError> {
    match arg {
        Some(ParseNode::Url(url)) => Ok(url.url),
        _ => Err(ParseError::new("Expected a URL argument")),
    }
}

/// Registers `\href` and `\url`
pub fn define_href(ctx: &mut TypesetContext) {
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Href),
        names: &["\\href"],
        props: FunctionPropSpec {
            num_args: 2,
            arg_types: Some(vec![ArgType::Url, ArgType::Original]),
            allowed_in_text: true,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, args, _opt_args| {
            let mut args = args.into_iter();
            let href = url_of(args.next())?;
            let body = args.next().ok_or_else(|| ParseError::new("\\href needs a body"))?;
            Ok(ParseNode::Href(ParseNodeHref {
                mode: context.mode(),
                loc: context.loc(),
                href,
                body: ord_argument(body),
            }))
        }),
        builder: Some(builder),
    });

    // The URL doubles as the link text, in typewriter type.
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Href),
        names: &["\\url"],
        props: FunctionPropSpec {
            num_args: 1,
            arg_types: Some(vec![ArgType::Url]),
            allowed_in_text: true,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, args, _opt_args| {
            let href = url_of(args.into_iter().next())?;
            let mode = context.mode();
            let chars = href
                .chars()
                .map(|ch| {
                    ParseNode::TextOrd(ParseNodeSymbol {
                        mode,
                        loc: context.loc(),
                        text: ch.to_string(),
                    })
                })
                .collect();
            let body = ParseNode::Text(ParseNodeText {
                mode,
                loc: context.loc(),
                body: chars,
                font: Some("\\texttt".to_owned()),
            });
            Ok(ParseNode::Href(ParseNodeHref {
                mode,
                loc: context.loc(),
                href,
                body: vec![body],
            }))
        }),
        builder: Some(builder),
    });
}

/// A link is transparent to spacing, like a fragment.
fn builder(node: &ParseNode, options: &Options, ctx: &TypesetContext) -> Result<RenderNode, ParseError> {
    let ParseNode::Href(group) = node else {
        assert_node_type(node, NodeType::Href)?;
        return Err(ParseError::new("Expected Href node"));
    };
    let elements = build_expression(ctx, &group.body, options, GroupKind::Partial, (None, None))?;
    Ok(make_anchor(&group.href, Vec::new(), elements, options).into())
}
