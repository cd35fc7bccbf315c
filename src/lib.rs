//! TeX math typesetting core
//!
//! Parses a subset of LaTeX math into a typed parse tree, then lays the
//! tree out as a box tree following the rules of the TeXbook's Appendix G.
//! Every box carries its classes, height, depth and offsets in ems; drawing
//! the boxes is left to the caller.
//!
//! ```rust
//! use texbox::{Settings, TypesetContext, typeset};
//!
//! let ctx = TypesetContext::shared();
//! let span = typeset(ctx, r"x^2 + \frac{1}{2}", &Settings::default())?;
//! assert_eq!(span.classes, ["katex"]);
//! # Ok::<(), texbox::ParseError>(())
//! ```
#![warn(missing_docs)]
#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![warn(clippy::str_to_string)]
#![warn(clippy::non_ascii_literal)]
#![warn(clippy::pointer_format)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::absolute_paths)]
#![warn(clippy::panic)]
#![warn(clippy::expect_used)]
#![warn(clippy::unwrap_in_result)]
#![warn(clippy::if_then_some_else_none)]
#![warn(clippy::unused_trait_names)]
#![warn(clippy::get_unwrap)]
#![warn(clippy::impl_trait_in_params)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::unimplemented)]
#![warn(clippy::return_and_then)]
#![warn(clippy::needless_raw_strings)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(clippy::rc_buffer)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::map_with_unused_argument_over_ranges)]
#![warn(clippy::missing_asserts_for_indexing)]
#![warn(clippy::separated_literal_suffix)]
#![warn(clippy::ref_patterns)]
// Not sure
#![allow(clippy::indexing_slicing)]
#![allow(clippy::string_slice)]
#![allow(clippy::pub_use)]
// clippy exceptions
#![allow(clippy::float_cmp)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::default_numeric_fallback)]
#![allow(clippy::single_call_fn)]

extern crate alloc;

pub mod box_tree;
pub mod build_common;
pub mod build_layout;
pub mod build_tree;
pub mod context;
pub mod core;
pub mod define_function;
pub mod delimiter;
pub mod font_metrics;
pub mod font_metrics_data;
pub mod functions;
pub mod lexer;
pub mod macro_expander;
pub mod macros;
pub mod namespace;
pub mod options;
/// Recursive-descent parser producing [`ParseNode`](parser::parse_node::ParseNode) trees.
pub mod parser;
pub mod spacing_data;
pub mod stretchy;
pub mod style;
pub mod symbols;
pub mod types;
pub mod unicode;
pub mod units;

/// Registry of commands, layout builders and symbols.
///
/// [`TypesetContext::shared`] returns a process-wide instance built on
/// first use; [`TypesetContext::default`] builds a private one.
pub use crate::context::TypesetContext;

/// Parse and lay out a formula.
///
/// With [`Settings::throw_on_error`] unset, malformed input yields a
/// `katex-error` span holding the source in [`Settings::error_color`]
/// instead of an error.
///
/// ```rust
/// use texbox::{Settings, TypesetContext, typeset};
///
/// let settings = Settings::builder().throw_on_error(false).build();
/// let span = typeset(TypesetContext::shared(), r"\frac{a}{", &settings).unwrap();
/// assert_eq!(span.classes, ["katex-error"]);
/// ```
pub use crate::core::typeset;

/// Parse a formula into its parse tree, without laying it out.
pub use crate::core::parse;

/// Lay out a parse tree already produced by [`parse`].
pub use crate::build_tree::build_tree;

pub use crate::box_tree::{BoxStyle, RenderNode, Span, SymbolNode};
pub use crate::options::Options;
pub use crate::parser::parse_node::ParseNode;

/// Metrics of one glyph, in ems.
pub use crate::font_metrics::get_character_metrics;

/// The error type of every fallible operation.
///
/// Its message names the problem and, when the offending input is known,
/// the position with the surrounding source and the culprit underlined.
pub use crate::types::ParseError;

/// Parsing and layout configuration, built with `Settings::builder()`.
///
/// ```rust
/// use texbox::Settings;
///
/// let settings = Settings::builder().display_mode(true).max_expand(50).build();
/// assert!(settings.display_mode);
/// assert!(settings.throw_on_error);
/// ```
pub use crate::types::Settings;

pub use crate::types::{StrictFunction, StrictMode, StrictSetting};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
