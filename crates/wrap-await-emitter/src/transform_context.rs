//! Transform directives recorded by the rewrite passes.
//!
//! The passes never mutate the arena. Each rewrite is recorded as a
//! [`TransformDirective`] keyed by the node it replaces, and the
//! [`Printer`](crate::printer::Printer) substitutes the directive's output for
//! that node's source range when it serializes the tree.

use rustc_hash::FxHashMap;
use wrap_await_parser::{NodeIndex, NodeList};

/// How the printer rewrites one node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransformDirective {
    /// `function f() {}` becomes `void (f = function f() {});`
    AssignFunction,

    /// `class C {}` becomes `void (C = class C {});`
    AssignClass,

    /// A variable statement becomes one `void (<target> = <init>);` per
    /// declarator, with `undefined` for a missing initializer.
    AssignDeclarations {
        declarations: NodeList,
        /// Brace the assignments when the statement is the body of a control
        /// statement rather than an element of a statement list.
        wrap_in_block: bool,
    },

    /// A `var` list in a `for` head becomes its assignments (`i = 0, j =
    /// undefined`), or just its target in `for-in`/`for-of`.
    AssignForHead {
        declarations: NodeList,
        in_for_in_of: bool,
    },

    /// A binding identifier spelled through the binding target
    /// (`a` becomes `scope.a`).
    QualifyBinding,

    /// Shorthand object pattern element `{a}` or `{a = 1}` re-targeted as
    /// `{a: scope.a}` or `{a: scope.a = 1}`.
    QualifyShorthand {
        name: NodeIndex,
        initializer: NodeIndex,
    },

    /// The trailing expression statement becomes `return <statement>`.
    ReturnCompletion,
}

impl TransformDirective {
    pub fn kind_name(&self) -> &'static str {
        match self {
            TransformDirective::AssignFunction => "AssignFunction",
            TransformDirective::AssignClass => "AssignClass",
            TransformDirective::AssignDeclarations { .. } => "AssignDeclarations",
            TransformDirective::AssignForHead { .. } => "AssignForHead",
            TransformDirective::QualifyBinding => "QualifyBinding",
            TransformDirective::QualifyShorthand { .. } => "QualifyShorthand",
            TransformDirective::ReturnCompletion => "ReturnCompletion",
        }
    }
}

/// Directives for one tree, keyed by node.
#[derive(Debug, Default)]
pub struct TransformContext {
    directives: FxHashMap<NodeIndex, TransformDirective>,
}

impl TransformContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `directive` for `node`, replacing any earlier one.
    pub fn insert(&mut self, node: NodeIndex, directive: TransformDirective) {
        self.directives.insert(node, directive);
    }

    pub fn get(&self, node: NodeIndex) -> Option<&TransformDirective> {
        self.directives.get(&node)
    }

    pub fn has_transform(&self, node: NodeIndex) -> bool {
        self.directives.contains_key(&node)
    }

    pub fn has_transforms(&self) -> bool {
        !self.directives.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    /// Directive nodes in no particular order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.directives.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &TransformDirective)> {
        self.directives.iter().map(|(&node, directive)| (node, directive))
    }
}
