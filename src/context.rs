//! Registry of commands, layout builders and symbols

use std::sync::LazyLock;

use crate::define_function::{BoxBuilder, FunctionDefSpec, FunctionSpec};
use crate::functions;
use crate::namespace::KeyMap;
use crate::parser::parse_node::NodeType;
use crate::symbols::{Symbols, create_symbols};

/// Everything the parser and the layout engine look up by name.
///
/// A context is filled once by [`TypesetContext::default`] and only read
/// afterwards, so one instance can serve any number of typesetting calls,
/// concurrently. [`TypesetContext::shared`] is the process-wide one.
pub struct TypesetContext {
    /// Commands by name, with backslash
    pub functions: KeyMap<String, FunctionSpec>,
    /// Layout builders by the node type they accept
    pub builders: KeyMap<NodeType, BoxBuilder>,
    /// Symbol table for both modes
    pub symbols: Symbols,
}

static SHARED: LazyLock<TypesetContext> = LazyLock::new(TypesetContext::default);

impl TypesetContext {
    /// The context with every builtin command, created on first use.
    #[must_use]
    pub fn shared() -> &'static Self {
        &SHARED
    }

    /// Register a command under each of its names, and its builder.
    ///
    /// # Panics
    ///
    /// When a name is already taken by a different definition. Registration
    /// happens at startup, so this is a programming error.
    #[allow(clippy::panic)]
    pub fn define_function(&mut self, spec: FunctionDefSpec) {
        let data = FunctionSpec {
            node_type: spec.node_type,
            props: spec.props,
            handler: spec.handler,
        };

        for name in spec.names {
            if let Some(existing) = self.functions.get(*name)
                && !existing.same_as(&data)
            {
                panic!("conflicting definitions for {name}");
            }
            self.functions.insert((*name).to_owned(), data.clone());
        }

        if let (Some(node_type), Some(builder)) = (spec.node_type, spec.builder) {
            self.define_builder(node_type, builder);
        }
    }

    /// Register a layout builder for nodes no command produces directly,
    /// such as symbols and groups.
    pub fn define_builder(&mut self, node_type: NodeType, builder: BoxBuilder) {
        self.builders.insert(node_type, builder);
    }
}

impl Default for TypesetContext {
    fn default() -> Self {
        let mut ctx = Self {
            functions: KeyMap::default(),
            builders: KeyMap::default(),
            symbols: create_symbols(),
        };
        functions::define_all(&mut ctx);
        log::debug!(
            "registered {} functions and {} builders",
            ctx.functions.len(),
            ctx.builders.len()
        );
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::define_function::FunctionPropSpec;

    #[test]
    fn shared_context_knows_the_core_commands() {
        let ctx = TypesetContext::shared();
        for name in ["\\frac", "\\sqrt", "\\left", "\\mathbf", "\\text", "\\hat", "\\sum"] {
            assert!(ctx.functions.contains_key(name), "{name}");
        }
        for node_type in [NodeType::MathOrd, NodeType::SupSub, NodeType::GenFrac] {
            assert!(ctx.builders.contains_key(&node_type), "{node_type}");
        }
    }

    #[test]
    fn identical_redefinition_is_allowed() {
        let mut ctx = TypesetContext::default();
        let count = ctx.functions.len();
        ctx.define_function(FunctionDefSpec {
            node_type: None,
            names: &["\\fresh"],
            props: FunctionPropSpec::default(),
            handler: None,
            builder: None,
        });
        ctx.define_function(FunctionDefSpec {
            node_type: None,
            names: &["\\fresh"],
            props: FunctionPropSpec::default(),
            handler: None,
            builder: None,
        });
        assert_eq!(ctx.functions.len(), count + 1);
    }

    #[test]
    #[should_panic(expected = "conflicting definitions")]
    fn conflicting_redefinition_panics() {
        let mut ctx = TypesetContext::default();
        ctx.define_function(FunctionDefSpec {
            node_type: None,
            names: &["\\frac"],
            props: FunctionPropSpec::default(),
            handler: None,
            builder: None,
        });
    }
}
