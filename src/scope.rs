//! Scope classification relative to the synthetic wrapper.
//!
//! The fragment is parsed as the body of `(async () => {<fragment>\n})()`.
//! Every pass needs to know two things about a node: whether it sits directly
//! in the wrapper's body block, and whether descending into it would leave the
//! wrapper's function scope. Both are answered here from the parent links in
//! the arena.

use wrap_await_parser::parser::Node;
use wrap_await_parser::syntax::{VisitResult, walk};
use wrap_await_parser::{NodeArena, NodeData, NodeIndex};

/// Text placed before the fragment.
pub const WRAPPER_PREFIX: &str = "(async () => {";
/// Text placed after the fragment. The line break ends a trailing `//`
/// comment before the wrapper closes.
pub const WRAPPER_SUFFIX: &str = "\n})()";

/// Wrap `code` in the async arrow invocation.
pub fn wrap(code: &str) -> String {
    let mut wrapped = String::with_capacity(WRAPPER_PREFIX.len() + code.len() + WRAPPER_SUFFIX.len());
    wrapped.push_str(WRAPPER_PREFIX);
    wrapped.push_str(code);
    wrapped.push_str(WRAPPER_SUFFIX);
    wrapped
}

/// What crossing into a node means for the wrapper's scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeEdge {
    /// The node runs in the same function scope as its parent.
    Inside,
    /// The node's contents run in a function of their own.
    Function,
    /// A method or class field. Its body or initializer is a separate
    /// function, but a computed key is evaluated in the enclosing scope.
    Member { computed_key: NodeIndex },
}

/// Classify `index`, whose payload is `data`.
pub fn scope_edge(arena: &NodeArena, index: NodeIndex, data: &NodeData) -> ScopeEdge {
    match data {
        NodeData::FunctionDeclaration(_)
        | NodeData::FunctionExpression(_)
        | NodeData::ClassStaticBlockDeclaration { .. } => ScopeEdge::Function,
        NodeData::ArrowFunction { .. } if !is_wrapper_function(arena, index) => ScopeEdge::Function,
        NodeData::MethodDeclaration(method) => ScopeEdge::Member {
            computed_key: computed_key(arena, method.name),
        },
        NodeData::PropertyDeclaration { name, .. } => ScopeEdge::Member {
            computed_key: computed_key(arena, *name),
        },
        _ => ScopeEdge::Inside,
    }
}

fn computed_key(arena: &NodeArena, name: NodeIndex) -> NodeIndex {
    match arena.data(name) {
        Some(NodeData::ComputedPropertyName { expression }) => *expression,
        _ => NodeIndex::NONE,
    }
}

/// Is `arrow` the synthetic wrapper, i.e. the async arrow in
/// `(async () => {...})()` forming the only statement of the file?
pub fn is_wrapper_function(arena: &NodeArena, arrow: NodeIndex) -> bool {
    if !matches!(
        arena.data(arrow),
        Some(NodeData::ArrowFunction { is_async: true, .. })
    ) {
        return false;
    }
    let paren = arena.get_parent(arrow);
    if !matches!(
        arena.data(paren),
        Some(NodeData::ParenthesizedExpression { expression }) if *expression == arrow
    ) {
        return false;
    }
    let call = arena.get_parent(paren);
    if !matches!(
        arena.data(call),
        Some(NodeData::CallExpression { expression, .. }) if *expression == paren
    ) {
        return false;
    }
    let statement = arena.get_parent(call);
    matches!(
        arena.data(statement),
        Some(NodeData::ExpressionStatement { .. })
    ) && arena.is_source_file(arena.get_parent(statement))
}

/// Is `index` a direct statement of the wrapper's body block?
pub fn is_top_level_statement(arena: &NodeArena, index: NodeIndex) -> bool {
    let block = arena.get_parent(index);
    if !arena.is_block(block) {
        return false;
    }
    let arrow = arena.get_parent(block);
    matches!(
        arena.data(arrow),
        Some(NodeData::ArrowFunction { body, .. }) if *body == block
    ) && is_wrapper_function(arena, arrow)
}

/// Locate the wrapper's body block in the tree parsed from the wrapped text.
///
/// Returns `None` when the fragment closed the wrapper early and the tree is
/// not a single `(async () => {...})()` statement whose block spans exactly the
/// fragment.
pub fn wrapper_body(arena: &NodeArena, root: NodeIndex) -> Option<NodeIndex> {
    let Some(NodeData::SourceFile { statements }) = arena.data(root) else {
        return None;
    };
    if statements.len() != 1 {
        return None;
    }
    let Some(NodeData::ExpressionStatement { expression: call }) =
        arena.data(statements.first()?)
    else {
        return None;
    };
    let Some(NodeData::CallExpression {
        expression: paren,
        arguments,
        question_dot: false,
    }) = arena.data(*call)
    else {
        return None;
    };
    if !arguments.is_empty() {
        return None;
    }
    let Some(NodeData::ParenthesizedExpression { expression: arrow }) = arena.data(*paren) else {
        return None;
    };
    let Some(NodeData::ArrowFunction {
        is_async: true,
        parameters,
        body,
    }) = arena.data(*arrow)
    else {
        return None;
    };
    if !parameters.is_empty() || !arena.is_block(*body) {
        return None;
    }

    let block = arena.get(*body)?;
    let text_len = arena.source_text().len();
    // `{` is the last byte of the prefix; `}` is followed by `)()`.
    let spans_fragment = block.pos as usize == WRAPPER_PREFIX.len() - 1
        && block.end as usize + 3 == text_len;
    spans_fragment.then_some(*body)
}

/// Walk `root` without leaving the wrapper's function scope.
///
/// `visit` sees every node reachable from `root` in the same scope, including
/// the function, class member and static block nodes at the scope boundary
/// (so that declarations can be recognised), but never their contents. The
/// computed keys of members are visited after the main walk. Returns `true`
/// if `visit` stopped the walk.
pub fn walk_enclosing_scope(
    arena: &NodeArena,
    root: NodeIndex,
    mut visit: impl FnMut(NodeIndex, &Node) -> VisitResult,
) -> bool {
    let mut roots = vec![root];
    while let Some(start) = roots.pop() {
        let stopped = walk(arena, start, |index, node| {
            let result = visit(index, node);
            if result != VisitResult::Continue {
                return result;
            }
            match scope_edge(arena, index, &node.data) {
                ScopeEdge::Inside => VisitResult::Continue,
                ScopeEdge::Function => VisitResult::SkipChildren,
                ScopeEdge::Member { computed_key } => {
                    if computed_key.is_some() {
                        roots.push(computed_key);
                    }
                    VisitResult::SkipChildren
                }
            }
        });
        if stopped {
            return true;
        }
    }
    false
}
