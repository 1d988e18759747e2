//! Rejection of `return` at the fragment's top level.
//!
//! Inside the wrapper a top-level `return` would parse, but it would end the
//! wrapper function early and skip the rest of the fragment. A script has no
//! such statement, so the fragment is rejected instead.

use crate::scope::walk_enclosing_scope;
use wrap_await_parser::syntax::VisitResult;
use wrap_await_parser::{NodeArena, NodeData, NodeIndex};

/// The first `return` statement in `body` that is not inside a nested
/// function, if any.
pub fn find_top_level_return(arena: &NodeArena, body: NodeIndex) -> Option<NodeIndex> {
    let mut found = NodeIndex::NONE;
    walk_enclosing_scope(arena, body, |index, node| {
        if matches!(node.data, NodeData::ReturnStatement { .. }) {
            found = index;
            VisitResult::Stop
        } else {
            VisitResult::Continue
        }
    });
    found.into_option()
}
