use super::*;
use crate::syntax::{VisitResult, walk};

fn parse(text: &str) -> (NodeArena, NodeIndex) {
    match parse_script(text) {
        Ok(result) => result,
        Err(diag) => panic!("unexpected parse error for {text:?}: {diag}"),
    }
}

fn identifiers_visited(text: &str, mut decide: impl FnMut(&NodeArena, NodeIndex) -> VisitResult) -> (Vec<String>, bool) {
    let (arena, root) = parse(text);
    let mut seen = Vec::new();
    let stopped = walk(&arena, root, |index, node| {
        if let NodeData::Identifier { escaped_text } = &node.data {
            seen.push(escaped_text.clone());
        }
        decide(&arena, index)
    });
    (seen, stopped)
}

#[test]
fn test_walk_visits_in_source_order() {
    let (seen, stopped) = identifiers_visited("a(b, c.d); if (e) { f = g ? h : i }", |_, _| {
        VisitResult::Continue
    });
    assert!(!stopped);
    assert_eq!(seen, vec!["a", "b", "c", "d", "e", "f", "g", "h", "i"]);
}

#[test]
fn test_walk_skip_children() {
    let (seen, stopped) = identifiers_visited("x; function f(y) { z } w;", |arena, index| {
        if arena.function_data(index).is_some() {
            VisitResult::SkipChildren
        } else {
            VisitResult::Continue
        }
    });
    assert!(!stopped);
    assert_eq!(seen, vec!["x", "w"]);
}

#[test]
fn test_walk_stop() {
    let (seen, stopped) = identifiers_visited("a; b; c;", |arena, index| {
        if arena.identifier_text(index) == Some("b") {
            VisitResult::Stop
        } else {
            VisitResult::Continue
        }
    });
    assert!(stopped);
    assert_eq!(seen, vec!["a", "b"]);
}

#[test]
fn test_walk_from_inner_node() {
    let (arena, root) = parse("outer; { inner1; inner2 }");
    let block = arena
        .get_children(root)
        .into_iter()
        .find(|&child| arena.is_block(child))
        .unwrap_or(NodeIndex::NONE);
    let mut count = 0;
    walk(&arena, block, |_, node| {
        if matches!(node.data, NodeData::ExpressionStatement { .. }) {
            count += 1;
        }
        VisitResult::Continue
    });
    assert_eq!(count, 2);
}

#[test]
fn test_walk_handles_deep_trees_iteratively() {
    let source = "a".to_string() + &" + a".repeat(5_000);
    let (arena, root) = parse(&source);
    let mut count = 0;
    walk(&arena, root, |_, node| {
        if matches!(node.data, NodeData::Identifier { .. }) {
            count += 1;
        }
        VisitResult::Continue
    });
    assert_eq!(count, 5_001);
}

#[test]
fn test_walk_of_missing_node_is_empty() {
    let (arena, _) = parse("a");
    let mut visited = 0;
    let stopped = walk(&arena, NodeIndex::NONE, |_, _| {
        visited += 1;
        VisitResult::Continue
    });
    assert!(!stopped);
    assert_eq!(visited, 0);
}
