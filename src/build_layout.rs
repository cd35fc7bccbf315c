//! Layout of parse trees into box trees
//!
//! [`build_group`] dispatches one node to the builder registered for its
//! type. [`build_expression`] builds a list of nodes and then applies TeX's
//! inter-atom rules to the result: binary operators that have nothing to
//! operate on become ordinary atoms, and glue is inserted between atoms
//! according to their classes. [`build_layout`] lays out a whole formula.

use phf::phf_set;
use strum::{AsRefStr, EnumString, IntoStaticStr};

use crate::box_tree::{RenderNode, Span};
use crate::build_common::{make_glue, make_span};
use crate::context::TypesetContext;
use crate::options::Options;
use crate::parser::parse_node::{NodeType, ParseNode};
use crate::spacing_data::{SPACINGS, TIGHT_SPACINGS};
use crate::types::{ParseError, ParseErrorKind};

// Binary atoms turn into ordinary atoms depending on their neighbors.
// TeXbook pp. 442-446, Rules 5 and 6, and the text before Rule 19.
static BIN_LEFT_CANCELLER: phf::Set<&'static str> =
    phf_set!("leftmost", "mbin", "mopen", "mrel", "mop", "mpunct");
static BIN_RIGHT_CANCELLER: phf::Set<&'static str> =
    phf_set!("rightmost", "mrel", "mclose", "mpunct");

/// TeX atom classes, as the first class of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, IntoStaticStr, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum AtomClass {
    /// Ordinary
    Mord,
    /// Large operator
    Mop,
    /// Binary operator
    Mbin,
    /// Relation
    Mrel,
    /// Opening delimiter
    Mopen,
    /// Closing delimiter
    Mclose,
    /// Punctuation
    Mpunct,
    /// Inner, such as a fraction
    Minner,
}

impl AtomClass {
    /// Class of a box, if its first class is an atom class.
    #[must_use]
    pub fn of(node: &RenderNode) -> Option<Self> {
        node.classes().first()?.parse().ok()
    }
}

/// Class of the atom at the right edge of a box, looking through
/// fragments and links.
#[must_use]
pub fn right_atom_class(node: &RenderNode) -> Option<AtomClass> {
    match partial_group(node) {
        Some(children) => right_atom_class(children.last()?),
        None => AtomClass::of(node),
    }
}

/// How an expression relates to what surrounds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// Part of an enclosing list, e.g. the body of `\color`: the parent
    /// handles spacing
    Partial,
    /// A group of its own, with nothing added on either side
    Real,
    /// The whole formula; line breaks restart spacing
    Root,
}

impl GroupKind {
    const fn is_real(self) -> bool {
        matches!(self, Self::Real | Self::Root)
    }
}

/// Children of boxes that are transparent to spacing: fragments and links.
fn partial_group(node: &RenderNode) -> Option<&[RenderNode]> {
    match node {
        RenderNode::Fragment(fragment) => Some(&fragment.children),
        RenderNode::Anchor(anchor) => Some(&anchor.children),
        _ => None,
    }
}

fn partial_group_mut(node: &mut RenderNode) -> Option<&mut Vec<RenderNode>> {
    match node {
        RenderNode::Fragment(fragment) => Some(&mut fragment.children),
        RenderNode::Anchor(anchor) => Some(&mut anchor.children),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitKind {
    Atom,
    Space,
    /// A line break at the root, which acts like the start of the formula
    LineStart,
}

/// One box seen by the spacing passes, by its index path from the list.
#[derive(Debug)]
struct Visit {
    path: Vec<usize>,
    kind: VisitKind,
}

/// Every box of `nodes` in order, descending into partial groups.
fn collect_visits(nodes: &[RenderNode], prefix: &mut Vec<usize>, is_root: bool, out: &mut Vec<Visit>) {
    for (i, node) in nodes.iter().enumerate() {
        prefix.push(i);
        if let Some(children) = partial_group(node) {
            collect_visits(children, prefix, is_root, out);
        } else {
            let kind = if !node.is_space() {
                VisitKind::Atom
            } else if is_root && node.has_class("newline") {
                VisitKind::LineStart
            } else {
                VisitKind::Space
            };
            out.push(Visit {
                path: prefix.clone(),
                kind,
            });
        }
        prefix.pop();
    }
}

fn node_at<'a>(nodes: &'a [RenderNode], path: &[usize]) -> Option<&'a RenderNode> {
    let (&first, rest) = path.split_first()?;
    let node = nodes.get(first)?;
    if rest.is_empty() {
        Some(node)
    } else {
        node_at(partial_group(node)?, rest)
    }
}

fn list_at_mut<'a>(nodes: &'a mut Vec<RenderNode>, parent: &[usize]) -> Option<&'a mut Vec<RenderNode>> {
    let Some((&first, rest)) = parent.split_first() else {
        return Some(nodes);
    };
    list_at_mut(partial_group_mut(nodes.get_mut(first)?)?, rest)
}

fn node_at_mut<'a>(nodes: &'a mut Vec<RenderNode>, path: &[usize]) -> Option<&'a mut RenderNode> {
    let (&last, parent) = path.split_last()?;
    list_at_mut(nodes, parent)?.get_mut(last)
}

fn first_class<'a>(nodes: &'a [RenderNode], path: &[usize]) -> &'a str {
    node_at(nodes, path)
        .and_then(|node| node.classes().first())
        .map_or("", String::as_str)
}

fn make_ord_at(nodes: &mut Vec<RenderNode>, path: &[usize]) {
    if let Some(classes) = node_at_mut(nodes, path).and_then(RenderNode::classes_mut)
        && let Some(first) = classes.first_mut()
    {
        "mord".clone_into(first);
    }
}

/// Turn binary atoms into ordinary ones where they have no operands.
fn cancel_bins(groups: &mut Vec<RenderNode>, visits: &[Visit], left: &str, right: &str) {
    let mut prev: Option<&[usize]> = None;
    let mut prev_class = left.to_owned();
    for visit in visits {
        match visit.kind {
            VisitKind::Atom => {
                let mut class = first_class(groups, &visit.path).to_owned();
                if prev_class == "mbin" && BIN_RIGHT_CANCELLER.contains(class.as_str()) {
                    if let Some(prev) = prev {
                        make_ord_at(groups, prev);
                    }
                } else if class == "mbin" && BIN_LEFT_CANCELLER.contains(prev_class.as_str()) {
                    make_ord_at(groups, &visit.path);
                    "mord".clone_into(&mut class);
                }
                prev = Some(&visit.path);
                prev_class = class;
            }
            VisitKind::LineStart => {
                prev = None;
                "leftmost".clone_into(&mut prev_class);
            }
            VisitKind::Space => {}
        }
    }
    if prev_class == "mbin"
        && BIN_RIGHT_CANCELLER.contains(right)
        && let Some(prev) = prev
    {
        make_ord_at(groups, prev);
    }
}

/// Insert glue between adjacent atoms. Glue goes right after the box
/// visited last, so explicit spaces stay next to the atom they follow.
fn insert_glue(
    groups: &mut Vec<RenderNode>,
    visits: &[Visit],
    left: &str,
    left_tight: bool,
    glue_options: &Options,
) {
    let mut insertions: Vec<(Option<&[usize]>, Span)> = Vec::new();
    let mut prev_class = left.to_owned();
    let mut prev_tight = left_tight;
    let mut last_visited: Option<&[usize]> = None;
    for visit in visits {
        match visit.kind {
            VisitKind::Atom => {
                let Some(node) = node_at(groups, &visit.path) else {
                    continue;
                };
                let class = node.classes().first().map_or("", String::as_str);
                // Script styles use the tight table
                let table = if prev_tight { &TIGHT_SPACINGS } else { &SPACINGS };
                if let Some(space) = table.get(prev_class.as_str()).and_then(|row| row.get(class)) {
                    insertions.push((last_visited, make_glue(space, glue_options)));
                }
                class.clone_into(&mut prev_class);
                prev_tight = node.has_class("mtight");
            }
            VisitKind::LineStart => {
                "leftmost".clone_into(&mut prev_class);
                prev_tight = false;
            }
            VisitKind::Space => {}
        }
        last_visited = Some(&visit.path);
    }

    // Later insertion points first, so earlier paths stay valid.
    for (after, glue) in insertions.into_iter().rev() {
        match after.and_then(<[usize]>::split_last) {
            Some((&index, parent)) => {
                if let Some(list) = list_at_mut(groups, parent) {
                    list.insert(index + 1, glue.into());
                }
            }
            None => groups.insert(0, glue.into()),
        }
    }
}

/// Build a list of nodes. Fragments are spliced into the result.
///
/// For real groups, binary atoms are cancelled and inter-atom glue
/// inserted; `surrounding` names the atom classes that will sit left and
/// right of the list, defaulting to the edges of a formula.
pub fn build_expression(
    ctx: &TypesetContext,
    expression: &[ParseNode],
    options: &Options,
    kind: GroupKind,
    surrounding: (Option<AtomClass>, Option<AtomClass>),
) -> Result<Vec<RenderNode>, ParseError> {
    let mut groups: Vec<RenderNode> = Vec::with_capacity(expression.len());
    for node in expression {
        match build_group(ctx, node, options, None)? {
            RenderNode::Fragment(fragment) => groups.extend(fragment.children),
            output => groups.push(output),
        }
    }

    if !kind.is_real() {
        return Ok(groups);
    }

    let glue_options = match expression {
        [ParseNode::Styling(styling)] => options.having_style(styling.style),
        _ => options.clone(),
    };
    let left = surrounding.0.map_or("leftmost", <&'static str>::from);
    let right = surrounding.1.map_or("rightmost", <&'static str>::from);

    let mut visits = Vec::new();
    collect_visits(&groups, &mut Vec::new(), kind == GroupKind::Root, &mut visits);
    cancel_bins(&mut groups, &visits, left, right);
    insert_glue(
        &mut groups,
        &visits,
        left,
        options.style.is_tight(),
        &glue_options,
    );
    Ok(groups)
}

/// Build one node with the builder registered for its type.
///
/// With `base_options` at a different size, the result is wrapped in a
/// span that switches sizes, and its height and depth are scaled to the
/// outer size.
pub fn build_group(
    ctx: &TypesetContext,
    node: &ParseNode,
    options: &Options,
    base_options: Option<&Options>,
) -> Result<RenderNode, ParseError> {
    let group_type = NodeType::from(node);
    let builder = ctx
        .builders
        .get(&group_type)
        .ok_or_else(|| ParseError::new(ParseErrorKind::UnknownGroupType { group_type }))?;
    let built = builder(node, options, ctx)?;

    match base_options {
        Some(base) if base.size != options.size => {
            let mut span = make_span(options.sizing_classes(base), vec![built], Some(options), None);
            let multiplier = options.size_multiplier / base.size_multiplier;
            span.height *= multiplier;
            span.depth *= multiplier;
            Ok(span.into())
        }
        _ => Ok(built),
    }
}

/// A `base` span for one unbreakable run, with a strut spanning its height
/// and depth in front.
fn build_unbreakable(children: Vec<RenderNode>, options: &Options) -> RenderNode {
    let mut body = make_span(vec!["base".to_owned()], children, Some(options), None);
    let mut strut = make_span(vec!["strut".to_owned()], Vec::new(), Some(options), None);
    strut.style.height = Some(body.height + body.depth);
    if body.depth > 0.0 {
        strut.style.vertical_align = Some(-body.depth);
    }
    body.children.insert(0, strut.into());
    body.into()
}

/// Lay out a whole formula.
///
/// The result is split into `base` runs after every relation and binary
/// operator at the outer level, where TeX allows a line break (TeXbook
/// p. 173). Glue after the operator stays on its line; a `\nobreak` in that
/// glue suppresses the break, and forced line breaks end the run.
pub fn build_layout(
    ctx: &TypesetContext,
    tree: &[ParseNode],
    options: &Options,
) -> Result<Span, ParseError> {
    let expression = build_expression(ctx, tree, options, GroupKind::Root, (None, None))?;

    let mut children = Vec::new();
    let mut parts = Vec::new();
    let mut nodes = expression.into_iter().peekable();
    while let Some(node) = nodes.next() {
        if node.has_class("newline") {
            if !parts.is_empty() {
                children.push(build_unbreakable(core::mem::take(&mut parts), options));
            }
            children.push(node);
            continue;
        }
        let breakable =
            node.has_class("mbin") || node.has_class("mrel") || node.has_class("allowbreak");
        parts.push(node);
        if breakable {
            let mut nobreak = false;
            while let Some(glue) =
                nodes.next_if(|next| next.is_space() && !next.has_class("newline"))
            {
                nobreak |= glue.has_class("nobreak");
                parts.push(glue);
            }
            if !nobreak {
                children.push(build_unbreakable(core::mem::take(&mut parts), options));
            }
        }
    }
    if !parts.is_empty() {
        children.push(build_unbreakable(parts, options));
    }

    Ok(make_span(vec!["katex-html".to_owned()], children, Some(options), None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::box_tree::Fragment;
    use crate::build_common::make_anchor;

    fn atom(class: &str) -> RenderNode {
        make_span(vec![class.to_owned()], Vec::new(), None, None).into()
    }

    fn classes(nodes: &[RenderNode]) -> Vec<&str> {
        nodes
            .iter()
            .map(|n| n.classes().first().map_or("", String::as_str))
            .collect()
    }

    fn run(mut groups: Vec<RenderNode>, is_root: bool) -> Vec<RenderNode> {
        let mut visits = Vec::new();
        collect_visits(&groups, &mut Vec::new(), is_root, &mut visits);
        cancel_bins(&mut groups, &visits, "leftmost", "rightmost");
        insert_glue(&mut groups, &visits, "leftmost", false, &Options::default());
        groups
    }

    #[test]
    fn leading_and_trailing_bins_become_ords() {
        let out = run(vec![atom("mbin"), atom("mord"), atom("mbin")], false);
        assert_eq!(classes(&out), ["mord", "mord", "mord"]);
    }

    #[test]
    fn bins_between_ords_keep_their_class_and_get_medium_glue() {
        let out = run(vec![atom("mord"), atom("mbin"), atom("mord")], false);
        assert_eq!(classes(&out), ["mord", "mspace", "mbin", "mspace", "mord"]);
        let glue = out[1].style().and_then(|s| s.margin_right).unwrap();
        assert!((glue - 4.0 / 18.0).abs() < 1e-12);
    }

    #[test]
    fn bin_after_rel_becomes_ord() {
        let out = run(vec![atom("mord"), atom("mrel"), atom("mbin"), atom("mord")], false);
        assert_eq!(
            classes(&out),
            ["mord", "mspace", "mrel", "mspace", "mord", "mord"]
        );
    }

    #[test]
    fn glue_goes_after_explicit_spaces() {
        let out = run(vec![atom("mord"), atom("mspace"), atom("mrel")], false);
        assert_eq!(classes(&out), ["mord", "mspace", "mspace", "mrel"]);
    }

    #[test]
    fn links_are_transparent_to_spacing() {
        let options = Options::default();
        let link = make_anchor("https://x.org", Vec::new(), vec![atom("mrel")], &options);
        let out = run(vec![atom("mord"), link.into(), atom("mord")], false);
        let RenderNode::Anchor(anchor) = &out[2] else {
            panic!("expected the link");
        };
        // Glue before the link belongs to the outer list.
        assert_eq!(classes(&out), ["mord", "mspace", "", "mord"]);
        assert_eq!(classes(&anchor.children), ["mrel", "mspace"]);
    }

    #[test]
    fn fragments_nested_in_links_are_walked() {
        let fragment = Fragment {
            children: vec![atom("mbin")],
            ..Fragment::default()
        };
        let link = make_anchor("#", Vec::new(), vec![fragment.into()], &Options::default());
        let out = run(vec![atom("mopen"), link.into()], false);
        let inner = &out[1].children()[0].children()[0];
        assert_eq!(inner.classes()[0], "mord");
    }

    #[test]
    fn line_breaks_restart_at_the_root() {
        let newline: RenderNode =
            make_span(vec!["mspace".to_owned(), "newline".to_owned()], Vec::new(), None, None).into();
        let out = run(vec![atom("mord"), newline.clone(), atom("mbin"), atom("mord")], true);
        assert_eq!(classes(&out), ["mord", "mspace", "mord", "mord"]);
        let out = run(vec![atom("mord"), newline, atom("mbin"), atom("mord")], false);
        assert_eq!(classes(&out), ["mord", "mspace", "mspace", "mbin", "mspace", "mord"]);
    }

    #[test]
    fn right_edge_class_looks_through_links() {
        let link = make_anchor("#", Vec::new(), vec![atom("mord"), atom("mrel")], &Options::default());
        assert_eq!(right_atom_class(&link.into()), Some(AtomClass::Mrel));
        assert_eq!(right_atom_class(&Fragment::default().into()), None);
    }

    #[test]
    fn atom_class_of_a_box() {
        assert_eq!(AtomClass::of(&atom("mpunct")), Some(AtomClass::Mpunct));
        assert_eq!(AtomClass::of(&atom("vlist")), None);
        assert_eq!(AtomClass::Minner.as_ref(), "minner");
    }

    #[test]
    fn surrounding_classes_decide_edge_bins() {
        let ctx = TypesetContext::shared();
        let tree = crate::core::parse(ctx, "+x+", &crate::types::Settings::default()).unwrap();
        let atoms = |surrounding: (Option<AtomClass>, Option<AtomClass>)| {
            let out = build_expression(ctx, &tree, &Options::default(), GroupKind::Real, surrounding).unwrap();
            classes(&out).into_iter().filter(|c| *c != "mspace").map(str::to_owned).collect::<Vec<_>>()
        };
        assert_eq!(atoms((None, None)), ["mord", "mord", "mord"]);
        assert_eq!(
            atoms((Some(AtomClass::Mord), Some(AtomClass::Mord))),
            ["mbin", "mord", "mbin"]
        );
    }
}
