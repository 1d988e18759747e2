use crate::return_guard::find_top_level_return;
use crate::scope::{
    ScopeEdge, WRAPPER_PREFIX, is_top_level_statement, is_wrapper_function, scope_edge, walk_enclosing_scope,
    wrap, wrapper_body,
};
use crate::suspense::has_top_level_suspense;
use wrap_await_parser::syntax::{VisitResult, walk};
use wrap_await_parser::{NodeArena, NodeData, NodeIndex, parse_script};

fn parse_wrapped(code: &str) -> (NodeArena, NodeIndex, NodeIndex) {
    let (arena, root) = match parse_script(wrap(code)) {
        Ok(result) => result,
        Err(diag) => panic!("unexpected parse error for {code:?}: {diag}"),
    };
    let Some(body) = wrapper_body(&arena, root) else {
        panic!("no wrapper body for {code:?}");
    };
    (arena, root, body)
}

fn suspends(code: &str) -> bool {
    let (arena, _, body) = parse_wrapped(code);
    has_top_level_suspense(&arena, body)
}

fn returns(code: &str) -> bool {
    let (arena, _, body) = parse_wrapped(code);
    find_top_level_return(&arena, body).is_some()
}

/// All nodes in pre-order matching `predicate`.
fn find_all(arena: &NodeArena, root: NodeIndex, predicate: impl Fn(&NodeData) -> bool) -> Vec<NodeIndex> {
    let mut found = Vec::new();
    walk(arena, root, |index, node| {
        if predicate(&node.data) {
            found.push(index);
        }
        VisitResult::Continue
    });
    found
}

// =============================================================================
// Wrapper shape
// =============================================================================

#[test]
fn test_wrap() {
    assert_eq!(wrap("x"), "(async () => {x\n})()");
    assert_eq!(wrap(""), "(async () => {\n})()");
}

#[test]
fn test_wrapper_body_spans_fragment() {
    let (arena, _, body) = parse_wrapped("a;\nb");
    assert_eq!(arena.node_text(body), "{a;\nb\n}");
    let node = arena.get(body).map(|n| n.pos);
    assert_eq!(node, Some(WRAPPER_PREFIX.len() as u32 - 1));
}

#[test]
fn test_wrapper_body_of_empty_fragment() {
    let (arena, _, body) = parse_wrapped("");
    assert!(matches!(arena.data(body), Some(NodeData::Block { statements }) if statements.is_empty()));
}

#[test]
fn test_wrapper_body_rejects_escaping_fragments() {
    for code in [
        "}); (async () => {",
        "}, async () => {",
        "})(); (async () => {",
        "}); x; (async () => {",
    ] {
        let Ok((arena, root)) = parse_script(wrap(code)) else {
            continue;
        };
        assert_eq!(wrapper_body(&arena, root), None, "{code:?} escaped the wrapper");
    }
}

#[test]
fn test_is_wrapper_function() {
    let (arena, root, _) = parse_wrapped("const f = async () => {}; (async () => {})()");
    let arrows = find_all(&arena, root, |data| matches!(data, NodeData::ArrowFunction { .. }));
    assert_eq!(arrows.len(), 3);
    assert!(is_wrapper_function(&arena, arrows[0]));
    assert!(!is_wrapper_function(&arena, arrows[1]));
    assert!(
        !is_wrapper_function(&arena, arrows[2]),
        "an invoked arrow inside the fragment is not the wrapper"
    );
    assert!(!is_wrapper_function(&arena, root));
}

#[test]
fn test_is_top_level_statement() {
    let (arena, _, body) = parse_wrapped("let a; { let b } if (x) var c = 1");
    let Some(NodeData::Block { statements }) = arena.data(body) else {
        panic!("wrapper body is not a block");
    };
    let stmts = statements.nodes.clone();
    assert!(stmts.iter().all(|&s| is_top_level_statement(&arena, s)));

    let variable_statements = find_all(&arena, body, |data| {
        matches!(data, NodeData::VariableStatement { .. })
    });
    let flags: Vec<bool> = variable_statements
        .iter()
        .map(|&s| is_top_level_statement(&arena, s))
        .collect();
    assert_eq!(flags, vec![true, false, false]);
    assert!(!is_top_level_statement(&arena, body));
}

#[test]
fn test_scope_edges() {
    let (arena, _, body) = parse_wrapped("function f() {} class K { [k]() {} x = 1; static {} } (() => 1)");
    let edges: Vec<(&str, ScopeEdge)> = find_all(&arena, body, |_| true)
        .into_iter()
        .filter_map(|index| {
            let data = arena.data(index)?;
            let edge = scope_edge(&arena, index, data);
            (edge != ScopeEdge::Inside).then(|| (arena.kind_name(index), edge))
        })
        .collect();
    let key = find_all(&arena, body, |data| {
        matches!(data, NodeData::Identifier { escaped_text } if escaped_text == "k")
    })[0];
    assert_eq!(
        edges,
        vec![
            ("FunctionDeclaration", ScopeEdge::Function),
            ("MethodDeclaration", ScopeEdge::Member { computed_key: key }),
            (
                "PropertyDeclaration",
                ScopeEdge::Member {
                    computed_key: NodeIndex::NONE
                }
            ),
            ("ClassStaticBlockDeclaration", ScopeEdge::Function),
            ("ArrowFunction", ScopeEdge::Function),
        ]
    );
}

#[test]
fn test_walk_enclosing_scope_order() {
    let (arena, _, body) = parse_wrapped("a; function f(b) { c } class K { [k]() { m } } z");
    let mut seen = Vec::new();
    walk_enclosing_scope(&arena, body, |index, _| {
        if let Some(name) = arena.identifier_text(index) {
            seen.push(name.to_string());
        }
        VisitResult::Continue
    });
    assert_eq!(seen, vec!["a", "K", "z", "k"]);
}

// =============================================================================
// Suspense detection
// =============================================================================

#[test]
fn test_await_suspends() {
    assert!(suspends("await x"));
    assert!(suspends("f(await x)"));
    assert!(suspends("`str ${await 5}`"));
    assert!(suspends("({x: await p})"));
    assert!(suspends("if (a) { while (b) { try { await c } finally {} } }"));
    assert!(!suspends("x"));
    assert!(!suspends(""));
}

#[test]
fn test_for_await_suspends() {
    assert!(suspends("for await (const x of []) {}"));
    assert!(suspends("for (const x of [1, 2, 3]) { await x }"));
    assert!(!suspends("for (const x of xs) {}"));
}

#[test]
fn test_nested_functions_are_opaque() {
    for code in [
        "async function g() { await woke() }",
        "const h = async function () { await 0 }",
        "const i = async () => { await 0 }",
        "const j = async () => await 0",
        "class A { async m() { await x } }",
        "({ async m() { await x } })",
        "await_ = 1; function* k() {}",
    ] {
        assert!(!suspends(code), "{code:?} should not suspend");
    }
}

#[test]
fn test_class_heritage_and_computed_keys_suspend() {
    assert!(suspends("class A extends (await base) {}"));
    assert!(suspends("class A { [await k]() {} }"));
    assert!(suspends("class A { static [await k] = 1 }"));
    assert!(suspends("({ [await k]: 1 })"));
    assert!(suspends("({ async [await k]() {} })"));
}

#[test]
fn test_suspense_is_idempotent() {
    let (arena, _, body) = parse_wrapped("const a = await f(); function g() {}");
    let first = has_top_level_suspense(&arena, body);
    let second = has_top_level_suspense(&arena, body);
    assert!(first);
    assert_eq!(first, second);
}

// =============================================================================
// Return guard
// =============================================================================

#[test]
fn test_top_level_return_found() {
    assert!(returns("return await 10"));
    assert!(returns("return"));
    assert!(returns("if (x) { return 1 }"));
    assert!(returns("for (;;) { switch (x) { case 1: return } }"));
    assert!(returns("l: { return }"));
}

#[test]
fn test_nested_return_ignored() {
    for code in [
        "function f() { return 1 }",
        "const f = () => { return 1 }",
        "class A { m() { return 1 } static { (function () { return })() } }",
        "({ get x() { return 1 } })",
        "x = function () { return }",
    ] {
        assert!(!returns(code), "{code:?} has no top-level return");
    }
}

#[test]
fn test_first_top_level_return_is_reported() {
    let (arena, _, body) = parse_wrapped("if (a) return 1; return 2");
    let found = find_top_level_return(&arena, body);
    let pos = found.and_then(|index| arena.get(index)).map(|node| node.pos);
    assert_eq!(pos, Some(WRAPPER_PREFIX.len() as u32 + 7));
}
