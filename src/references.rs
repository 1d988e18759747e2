//! Qualification of references to rehoisted bindings.
//!
//! With an object binding scope, a rehoisted declaration assigns a property
//! of the scope object instead of creating a variable. Every reference in the
//! fragment that resolved to that declaration has to follow it:
//!
//! ```javascript
//! const a = await f(); a + 1     // void (scope.a = await f()); return scope.a + 1
//! function g(a) { return a }     // the parameter shadows `a`; left alone
//! ```
//!
//! A reference is left alone when a declaration between it and the wrapper
//! body binds the same name: a parameter, a catch binding, a nested
//! function's `var`, or a block-scoped declaration that was not rehoisted.

use crate::rehoist::{BindingSet, binding_identifiers};
use rustc_hash::{FxHashMap, FxHashSet};
use wrap_await_emitter::{TransformContext, TransformDirective};
use wrap_await_parser::parser::VariableKind;
use wrap_await_parser::syntax::{VisitResult, walk};
use wrap_await_parser::{NodeArena, NodeData, NodeIndex, NodeList};

/// Record `QualifyBinding` / `QualifyShorthand` directives for every
/// unshadowed reference to a name in `bindings`. Returns the number of
/// directives added.
#[tracing::instrument(level = "debug", skip_all, fields(bindings = bindings.len()))]
pub fn qualify_references(
    arena: &NodeArena,
    body: NodeIndex,
    bindings: &BindingSet,
    transforms: &mut TransformContext,
) -> usize {
    if bindings.is_empty() {
        return 0;
    }
    let found = collect_references(arena, body, bindings, transforms);
    let count = found.len();
    for (index, directive) in found {
        tracing::trace!(node = index.0, "[references] {}", directive.kind_name());
        transforms.insert(index, directive);
    }
    tracing::debug!(count, "[references] qualified");
    count
}

fn collect_references(
    arena: &NodeArena,
    body: NodeIndex,
    bindings: &BindingSet,
    transforms: &TransformContext,
) -> Vec<(NodeIndex, TransformDirective)> {
    let mut resolver = ScopeResolver::new(arena, body, transforms);
    let mut found = Vec::new();
    walk(arena, body, |index, node| {
        match &node.data {
            NodeData::Identifier { escaped_text }
                if bindings.contains(escaped_text.as_str())
                    && is_reference(arena, index)
                    && !resolver.transforms.has_transform(index)
                    && !resolver.is_shadowed(index, escaped_text) =>
            {
                found.push((index, TransformDirective::QualifyBinding));
            }
            NodeData::ShorthandPropertyAssignment {
                name,
                object_assignment_initializer,
            } => {
                if let Some(text) = arena.identifier_text(*name)
                    && bindings.contains(text)
                    && !resolver.is_shadowed(index, text)
                {
                    found.push((
                        index,
                        TransformDirective::QualifyShorthand {
                            name: *name,
                            initializer: *object_assignment_initializer,
                        },
                    ));
                }
            }
            _ => {}
        }
        VisitResult::Continue
    });
    found
}

/// Is `identifier` read or assigned as a variable, as opposed to naming a
/// property, label or declaration?
pub fn is_reference(arena: &NodeArena, identifier: NodeIndex) -> bool {
    let parent = arena.get_parent(identifier);
    match arena.data(parent) {
        Some(
            NodeData::PropertyAccessExpression { name, .. }
            | NodeData::PropertyAssignment { name, .. }
            | NodeData::PropertyDeclaration { name, .. }
            | NodeData::ShorthandPropertyAssignment { name, .. }
            | NodeData::VariableDeclaration { name, .. }
            | NodeData::Parameter { name, .. }
            | NodeData::BindingElement { name, .. },
        ) => *name != identifier && !is_property_key(arena, parent, identifier),
        Some(NodeData::MethodDeclaration(method)) => method.name != identifier,
        Some(
            NodeData::FunctionDeclaration(func) | NodeData::FunctionExpression(func),
        ) => func.name != identifier,
        Some(NodeData::ClassDeclaration(class) | NodeData::ClassExpression(class)) => {
            class.name != identifier
        }
        Some(
            NodeData::LabeledStatement { label, .. }
            | NodeData::BreakStatement { label }
            | NodeData::ContinueStatement { label },
        ) => *label != identifier,
        Some(NodeData::CatchClause { variable, .. }) => *variable != identifier,
        Some(NodeData::MetaProperty { .. }) => false,
        _ => true,
    }
}

/// `key` in a `{ key: name }` binding element.
fn is_property_key(arena: &NodeArena, parent: NodeIndex, identifier: NodeIndex) -> bool {
    matches!(
        arena.data(parent),
        Some(NodeData::BindingElement { property_name, .. }) if *property_name == identifier
    )
}

/// Answers "does a scope between this node and the wrapper body declare
/// `name`?", caching the names each scope node declares.
struct ScopeResolver<'a> {
    arena: &'a NodeArena,
    body: NodeIndex,
    transforms: &'a TransformContext,
    declared: FxHashMap<NodeIndex, FxHashSet<String>>,
}

impl<'a> ScopeResolver<'a> {
    fn new(arena: &'a NodeArena, body: NodeIndex, transforms: &'a TransformContext) -> Self {
        ScopeResolver {
            arena,
            body,
            transforms,
            declared: FxHashMap::default(),
        }
    }

    fn is_shadowed(&mut self, index: NodeIndex, name: &str) -> bool {
        let arena = self.arena;
        let mut current = arena.get_parent(index);
        // Everything the wrapper body itself declares has been rehoisted.
        while current.is_some() && current != self.body {
            if self.declares(current, name) {
                return true;
            }
            current = arena.get_parent(current);
        }
        false
    }

    fn declares(&mut self, scope: NodeIndex, name: &str) -> bool {
        if let Some(names) = self.declared.get(&scope) {
            return names.contains(name);
        }
        let names = self.collect_declared(scope);
        let found = names.contains(name);
        self.declared.insert(scope, names);
        found
    }

    fn collect_declared(&self, scope: NodeIndex) -> FxHashSet<String> {
        let arena = self.arena;
        let mut names = FxHashSet::default();
        match arena.data(scope) {
            Some(NodeData::Block { statements }) => self.lexical_names(statements, &mut names),
            Some(NodeData::SwitchStatement { clauses, .. }) => {
                for clause in clauses.iter() {
                    if let Some(
                        NodeData::CaseClause { statements, .. }
                        | NodeData::DefaultClause { statements },
                    ) = arena.data(clause)
                    {
                        self.lexical_names(statements, &mut names);
                    }
                }
            }
            Some(NodeData::FunctionDeclaration(func) | NodeData::FunctionExpression(func)) => {
                self.insert_identifier(func.name, &mut names);
                names.insert("arguments".to_string());
                self.parameter_names(&func.parameters, &mut names);
                self.var_names(func.body, &mut names);
            }
            Some(NodeData::MethodDeclaration(method)) => {
                names.insert("arguments".to_string());
                self.parameter_names(&method.parameters, &mut names);
                self.var_names(method.body, &mut names);
            }
            Some(NodeData::ArrowFunction {
                parameters, body, ..
            }) => {
                self.parameter_names(parameters, &mut names);
                self.var_names(*body, &mut names);
            }
            Some(NodeData::ClassStaticBlockDeclaration { body }) => {
                self.var_names(*body, &mut names);
            }
            Some(NodeData::ClassDeclaration(class) | NodeData::ClassExpression(class)) => {
                self.insert_identifier(class.name, &mut names);
            }
            Some(NodeData::CatchClause { variable, .. }) => {
                self.pattern_names(*variable, &mut names);
            }
            Some(
                NodeData::ForStatement { initializer, .. }
                | NodeData::ForInStatement { initializer, .. }
                | NodeData::ForOfStatement { initializer, .. },
            ) => {
                if let Some(NodeData::VariableDeclarationList { kind, declarations }) =
                    arena.data(*initializer)
                    && *kind != VariableKind::Var
                {
                    self.declarator_names(declarations, &mut names);
                }
            }
            _ => {}
        }
        names
    }

    /// Block-scoped declarations of a statement list that kept their
    /// declaration form.
    fn lexical_names(&self, statements: &NodeList, names: &mut FxHashSet<String>) {
        let arena = self.arena;
        for statement in statements.iter() {
            if self.transforms.has_transform(statement) {
                continue;
            }
            match arena.data(statement) {
                Some(NodeData::VariableStatement { declaration_list }) => {
                    if let Some(NodeData::VariableDeclarationList { kind, declarations }) =
                        arena.data(*declaration_list)
                        && *kind != VariableKind::Var
                    {
                        self.declarator_names(declarations, names);
                    }
                }
                Some(NodeData::FunctionDeclaration(func)) => {
                    self.insert_identifier(func.name, names)
                }
                Some(NodeData::ClassDeclaration(class)) => {
                    self.insert_identifier(class.name, names)
                }
                _ => {}
            }
        }
    }

    /// `var` and function declarations anywhere in a function body, outside
    /// nested functions.
    fn var_names(&self, body: NodeIndex, names: &mut FxHashSet<String>) {
        let arena = self.arena;
        walk(arena, body, |_, node| match &node.data {
            NodeData::VariableDeclarationList {
                kind: VariableKind::Var,
                declarations,
            } => {
                self.declarator_names(declarations, names);
                VisitResult::Continue
            }
            NodeData::FunctionDeclaration(func) => {
                self.insert_identifier(func.name, names);
                VisitResult::SkipChildren
            }
            NodeData::FunctionExpression(_)
            | NodeData::ArrowFunction { .. }
            | NodeData::MethodDeclaration(_)
            | NodeData::PropertyDeclaration { .. }
            | NodeData::ClassStaticBlockDeclaration { .. } => VisitResult::SkipChildren,
            _ => VisitResult::Continue,
        });
    }

    fn declarator_names(&self, declarations: &NodeList, names: &mut FxHashSet<String>) {
        for declaration in declarations.iter() {
            if let Some(NodeData::VariableDeclaration { name, .. }) = self.arena.data(declaration) {
                self.pattern_names(*name, names);
            }
        }
    }

    fn parameter_names(&self, parameters: &NodeList, names: &mut FxHashSet<String>) {
        for parameter in parameters.iter() {
            self.pattern_names(parameter, names);
        }
    }

    fn pattern_names(&self, target: NodeIndex, names: &mut FxHashSet<String>) {
        for identifier in binding_identifiers(self.arena, target) {
            self.insert_identifier(identifier, names);
        }
    }

    fn insert_identifier(&self, identifier: NodeIndex, names: &mut FxHashSet<String>) {
        if let Some(text) = self.arena.identifier_text(identifier) {
            names.insert(text.to_string());
        }
    }
}
