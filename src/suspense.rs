//! Top-level suspend point detection.

use crate::scope::walk_enclosing_scope;
use wrap_await_parser::syntax::VisitResult;
use wrap_await_parser::{NodeArena, NodeData, NodeIndex};

/// Does `body` suspend outside any nested function?
///
/// An `await` expression or a `for await` loop counts. Nested functions,
/// non-wrapper arrows, method bodies, class field initializers and static
/// blocks are not entered; class heritage and computed member keys are.
pub fn has_top_level_suspense(arena: &NodeArena, body: NodeIndex) -> bool {
    let found = walk_enclosing_scope(arena, body, |index, node| match node.data {
        NodeData::AwaitExpression { .. }
        | NodeData::ForOfStatement {
            await_modifier: true,
            ..
        } => {
            tracing::trace!(node = index.0, kind = node.data.kind_name(), "[suspense] suspend point");
            VisitResult::Stop
        }
        _ => VisitResult::Continue,
    });
    tracing::debug!(found, "[suspense] scanned wrapper body");
    found
}
