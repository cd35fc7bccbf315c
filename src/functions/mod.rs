//! The function registry's contents
//!
//! Each submodule registers a family of commands with the
//! [`TypesetContext`]: a handler that turns the command and its arguments
//! into a [`ParseNode`](crate::parser::parse_node::ParseNode), and a builder
//! that lays that node out as boxes. Symbol node types (`mathord`, `atom`,
//! `spacing`, ...) have builders but no command.
//!
//! Registration order does not matter; every name is registered once.

mod accent;
mod accentunder;
mod arrow;
pub mod color;
mod cr;
mod delimsizing;
mod font;
mod genfrac;
mod horiz_brace;
mod href;
mod kern;
mod mclass;
mod op;
mod ordgroup;
mod overline;
mod relax;
mod sqrt;
mod styling;
mod supsub;
mod symbols_op;
mod symbols_ord;
mod symbols_spacing;
mod text;
mod underline;
pub mod utils;
mod verb;

use crate::context::TypesetContext;

/// Fractions: `\frac`, `\dfrac`, `\tfrac`, `\binom` and the infix
/// `\over`, `\choose`, `\atop`.
pub use genfrac::define_genfrac;

/// `\nonumber` and `\notag`, which leave no trace in the tree.
pub use relax::define_relax;

/// `\sqrt` with its optional index.
pub use sqrt::define_sqrt;

/// Large operators and named operators such as `\sum` and `\lim`.
pub use op::define_op;

pub use accent::define_accent;
pub use accentunder::define_accentunder;
pub use arrow::define_arrow;
pub use color::define_color;
pub use cr::define_cr;
pub use delimsizing::define_delimsizing;
pub use font::define_font;
pub use horiz_brace::define_horiz_brace;
pub use href::define_href;
pub use kern::define_kern;
pub use mclass::define_mclass;
pub use ordgroup::define_ordgroup;
pub use overline::define_overline;
pub use styling::define_styling;
pub use supsub::define_supsub;
pub use symbols_op::define_symbols_op;
pub use symbols_ord::define_symbols_ord;
pub use symbols_spacing::define_symbols_spacing;
pub use text::define_text;
pub use underline::define_underline;
pub use verb::define_verb;

pub use utils::assemble_sup_sub;

/// Register every built-in command and node builder.
pub fn define_all(ctx: &mut TypesetContext) {
    define_symbols_ord(ctx);
    define_symbols_op(ctx);
    define_symbols_spacing(ctx);
    define_ordgroup(ctx);
    define_supsub(ctx);
    define_genfrac(ctx);
    define_sqrt(ctx);
    define_op(ctx);
    define_accent(ctx);
    define_accentunder(ctx);
    define_arrow(ctx);
    define_horiz_brace(ctx);
    define_underline(ctx);
    define_overline(ctx);
    define_mclass(ctx);
    define_font(ctx);
    define_text(ctx);
    define_color(ctx);
    define_href(ctx);
    define_verb(ctx);
    define_cr(ctx);
    define_kern(ctx);
    define_styling(ctx);
    define_delimsizing(ctx);
    define_relax(ctx);
}
