//! Pre-order tree traversal with descend/skip/stop control.

use crate::parser::{Node, NodeArena, NodeIndex};

/// What the walk should do after visiting a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisitResult {
    /// Visit the node's children next.
    Continue,
    /// Do not visit the node's children; carry on with its siblings.
    SkipChildren,
    /// End the walk immediately.
    Stop,
}

/// Visit `root` and its descendants in source order.
///
/// The walk keeps its own stack, so deeply nested trees do not grow the
/// native stack. Returns `true` if `visit` stopped the walk.
pub fn walk(
    arena: &NodeArena,
    root: NodeIndex,
    mut visit: impl FnMut(NodeIndex, &Node) -> VisitResult,
) -> bool {
    let mut stack = vec![root];
    while let Some(index) = stack.pop() {
        let Some(node) = arena.get(index) else {
            continue;
        };
        match visit(index, node) {
            VisitResult::Continue => {
                let children = node.data.children();
                stack.extend(children.into_iter().rev());
            }
            VisitResult::SkipChildren => {}
            VisitResult::Stop => return true,
        }
    }
    false
}
