//! Declaration rehoisting.
//!
//! Declarations inside the wrapper would be local to the wrapper function.
//! This pass records directives that turn them into assignments, so that the
//! names they bind land in the scope that runs the wrapped code:
//!
//! ```javascript
//! function f() {}       // void (f = function f() {});
//! class C {}            // void (C = class C {});
//! const {a, b} = o, c;  // void ({a, b} = o); void (c = undefined);
//! ```
//!
//! Function declarations are rewritten at any block depth, as are `var`
//! declarations (including `for` heads). Classes, `let` and `const` are only
//! rewritten when they are direct statements of the wrapper body; nested
//! ones keep their block scope.

use crate::scope::{is_top_level_statement, walk_enclosing_scope};
use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;
use wrap_await_emitter::{TransformContext, TransformDirective};
use wrap_await_parser::parser::{Node, VariableKind};
use wrap_await_parser::syntax::VisitResult;
use wrap_await_parser::{NodeArena, NodeData, NodeIndex};
use wrap_await_scanner::SyntaxKind;

/// Escaping binding names in first-seen order.
pub type BindingSet = IndexSet<String, FxBuildHasher>;

/// Output of the rehoisting pass.
#[derive(Debug, Default)]
pub struct Rehoisted {
    pub transforms: TransformContext,
    pub bindings: BindingSet,
}

pub struct Rehoister<'a> {
    arena: &'a NodeArena,
    /// Record per-identifier directives so that every target can be
    /// respelled as a property of a scope object.
    qualify: bool,
    transforms: TransformContext,
    bindings: BindingSet,
}

impl<'a> Rehoister<'a> {
    pub fn new(arena: &'a NodeArena, qualify: bool) -> Self {
        Rehoister {
            arena,
            qualify,
            transforms: TransformContext::new(),
            bindings: BindingSet::default(),
        }
    }

    /// Record directives for every declaration reachable from the wrapper
    /// `body` without entering a nested function.
    #[tracing::instrument(level = "debug", skip(self), fields(qualify = self.qualify))]
    pub fn run(mut self, body: NodeIndex) -> Rehoisted {
        let arena = self.arena;
        walk_enclosing_scope(arena, body, |index, node| self.visit(index, node));
        tracing::debug!(
            directives = self.transforms.len(),
            bindings = self.bindings.len(),
            "[rehoist] done"
        );
        Rehoisted {
            transforms: self.transforms,
            bindings: self.bindings,
        }
    }

    fn visit(&mut self, index: NodeIndex, node: &Node) -> VisitResult {
        let arena = self.arena;
        match &node.data {
            NodeData::FunctionDeclaration(func) => {
                self.assign_named(index, func.name, TransformDirective::AssignFunction);
                VisitResult::SkipChildren
            }
            NodeData::ClassDeclaration(class) => {
                if is_top_level_statement(arena, index) {
                    self.assign_named(index, class.name, TransformDirective::AssignClass);
                }
                VisitResult::SkipChildren
            }
            NodeData::VariableStatement { declaration_list } => {
                self.visit_variable_statement(index, *declaration_list);
                VisitResult::SkipChildren
            }
            NodeData::VariableDeclarationList { .. } => {
                self.visit_for_head(index);
                VisitResult::SkipChildren
            }
            _ => VisitResult::Continue,
        }
    }

    fn assign_named(&mut self, index: NodeIndex, name: NodeIndex, directive: TransformDirective) {
        let arena = self.arena;
        let Some(text) = arena.identifier_text(name) else {
            return;
        };
        tracing::trace!(node = index.0, name = text, "[rehoist] {}", directive.kind_name());
        self.bindings.insert(text.to_string());
        self.transforms.insert(index, directive);
    }

    fn visit_variable_statement(&mut self, index: NodeIndex, list: NodeIndex) {
        let arena = self.arena;
        let Some(NodeData::VariableDeclarationList { kind, declarations }) = arena.data(list)
        else {
            return;
        };
        if *kind != VariableKind::Var && !is_top_level_statement(arena, index) {
            return;
        }
        // Several assignments in a single-statement position (`if (x) var a, b;`)
        // need braces to stay under the same control statement.
        let parent = arena.get_parent(index);
        let wrap_in_block =
            declarations.len() > 1 && !arena.is_statement_list_container(parent);
        tracing::trace!(
            node = index.0,
            kind = kind.keyword(),
            count = declarations.len(),
            wrap_in_block,
            "[rehoist] declarations"
        );
        for declaration in declarations.iter() {
            self.record_declarator(declaration);
        }
        self.transforms.insert(
            index,
            TransformDirective::AssignDeclarations {
                declarations: declarations.clone(),
                wrap_in_block,
            },
        );
    }

    /// `var` lists in `for`, `for-in` and `for-of` heads.
    fn visit_for_head(&mut self, list: NodeIndex) {
        let arena = self.arena;
        let Some(NodeData::VariableDeclarationList {
            kind: VariableKind::Var,
            declarations,
        }) = arena.data(list)
        else {
            return;
        };
        let in_for_in_of = match arena.data(arena.get_parent(list)) {
            Some(NodeData::ForStatement { .. }) => false,
            Some(NodeData::ForInStatement { .. } | NodeData::ForOfStatement { .. }) => true,
            _ => return,
        };
        tracing::trace!(node = list.0, in_for_in_of, "[rehoist] for head");
        for declaration in declarations.iter() {
            self.record_declarator(declaration);
        }
        self.transforms.insert(
            list,
            TransformDirective::AssignForHead {
                declarations: declarations.clone(),
                in_for_in_of,
            },
        );
    }

    fn record_declarator(&mut self, declaration: NodeIndex) {
        let arena = self.arena;
        let Some(NodeData::VariableDeclaration { name, .. }) = arena.data(declaration) else {
            return;
        };
        for identifier in binding_identifiers(arena, *name) {
            if let Some(text) = arena.identifier_text(identifier) {
                self.bindings.insert(text.to_string());
            }
            if self.qualify {
                self.qualify_identifier(identifier);
            }
        }
    }

    /// Respell a binding identifier as a scope object property. Shorthand
    /// object pattern entries (`{a}`, `{a = 1}`) are expanded to
    /// `{a: <path>.a}` so that the property key stays the same.
    fn qualify_identifier(&mut self, identifier: NodeIndex) {
        let arena = self.arena;
        let element = arena.get_parent(identifier);
        if let Some(NodeData::BindingElement {
            dot_dot_dot: false,
            property_name,
            name,
            initializer,
        }) = arena.data(element)
            && property_name.is_none()
            && *name == identifier
            && matches!(
                arena.data(arena.get_parent(element)),
                Some(NodeData::ObjectBindingPattern { .. })
            )
        {
            self.transforms.insert(
                element,
                TransformDirective::QualifyShorthand {
                    name: identifier,
                    initializer: *initializer,
                },
            );
            return;
        }
        self.transforms
            .insert(identifier, TransformDirective::QualifyBinding);
    }
}

/// Identifiers bound by a declaration target or parameter, in source order.
/// Property keys and default values inside patterns are not bindings.
///
/// Arrow function parameters keep the literal form they were parsed in
/// (`({a, b: [c = 1]}) => ...`), so object and array literals are read as
/// patterns too.
pub fn binding_identifiers(arena: &NodeArena, target: NodeIndex) -> Vec<NodeIndex> {
    let mut out = Vec::new();
    let mut stack = vec![target];
    while let Some(index) = stack.pop() {
        match arena.data(index) {
            Some(NodeData::Identifier { .. }) => out.push(index),
            Some(
                NodeData::ObjectBindingPattern { elements }
                | NodeData::ArrayBindingPattern { elements }
                | NodeData::ArrayLiteralExpression { elements },
            ) => stack.extend(elements.iter().rev()),
            Some(NodeData::ObjectLiteralExpression { properties }) => {
                stack.extend(properties.iter().rev())
            }
            Some(
                NodeData::BindingElement { name, .. }
                | NodeData::Parameter { name, .. }
                | NodeData::ShorthandPropertyAssignment { name, .. },
            ) => stack.push(*name),
            Some(
                NodeData::PropertyAssignment {
                    initializer: target,
                    ..
                }
                | NodeData::SpreadAssignment { expression: target }
                | NodeData::SpreadElement { expression: target }
                | NodeData::BinaryExpression {
                    left: target,
                    operator: SyntaxKind::EqualsToken,
                    ..
                },
            ) => stack.push(*target),
            _ => {}
        }
    }
    out
}
