//! Completion value.
//!
//! A script's completion value is its last evaluated expression statement.
//! The wrapper returns it instead, so awaiting the wrapper's promise yields
//! the same value.

use wrap_await_emitter::{TransformContext, TransformDirective};
use wrap_await_parser::{NodeArena, NodeData, NodeIndex};

/// Turn the last statement of `body` into a `return` when it is an expression
/// statement that no other directive rewrites. Returns whether it did.
pub fn mark_completion(arena: &NodeArena, body: NodeIndex, transforms: &mut TransformContext) -> bool {
    let Some(NodeData::Block { statements }) = arena.data(body) else {
        return false;
    };
    let Some(last) = statements.last() else {
        return false;
    };
    if transforms.has_transform(last)
        || !matches!(arena.data(last), Some(NodeData::ExpressionStatement { .. }))
    {
        tracing::debug!(kind = arena.kind_name(last), "[completion] last statement kept");
        return false;
    }
    tracing::debug!(node = last.0, "[completion] returning last expression");
    transforms.insert(last, TransformDirective::ReturnCompletion);
    true
}
