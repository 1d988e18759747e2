use super::*;
use crate::scope::{WRAPPER_PREFIX, WRAPPER_SUFFIX, wrapper_body};
use serde_json::json;
use wrap_await_common::diagnostic_codes;
use wrap_await_parser::{NodeData, parse_script};

fn wrapped(body: &str) -> String {
    format!("{WRAPPER_PREFIX}{body}{WRAPPER_SUFFIX}")
}

fn rewrite(code: &str) -> Option<String> {
    match transform(code) {
        Ok(result) => result,
        Err(err) => panic!("unexpected error for {code:?}: {err}"),
    }
}

fn rewrite_with(code: &str, options: &TransformOptions) -> Transformed {
    match transform_with_options(code, options) {
        Ok(Some(result)) => result,
        Ok(None) => panic!("{code:?} was not wrapped"),
        Err(err) => panic!("unexpected error for {code:?}: {err}"),
    }
}

fn syntax_error(code: &str) -> SyntaxError {
    match transform(code) {
        Err(WrapError::Syntax(err)) => err,
        other => panic!("expected a syntax error for {code:?}, got {other:?}"),
    }
}

// =============================================================================
// Wrapping
// =============================================================================

#[test]
fn test_no_top_level_await_is_left_alone() {
    for code in [
        "0",
        "Promise.resolve(10)",
        "async function g() {await woke()}",
        "const i = async () => {await 0}",
        "class A { async m() { await x } }",
        "",
        "// just a comment",
    ] {
        assert_eq!(rewrite(code), None, "{code:?}");
    }
}

#[test]
fn test_expressions_are_returned() {
    let cases = [
        ("await \"fun\"", "return await \"fun\""),
        ("await Promise.resolve(1)", "return await Promise.resolve(1)"),
        (
            "({x: await Promise.resolve(1)})",
            "return ({x: await Promise.resolve(1)})",
        ),
        (
            "await Promise.all([1, 2, 3].map(async x => Promise.resolve(x * 2)))",
            "return await Promise.all([1, 2, 3].map(async x => Promise.resolve(x * 2)))",
        ),
        ("`str ${await 5}`", "return `str ${await 5}`"),
        ("d = await Promise.resolve(4)", "return d = await Promise.resolve(4)"),
        ("await x;", "return await x;"),
        ("await x // done", "return await x // done"),
    ];
    for (code, body) in cases {
        assert_eq!(rewrite(code), Some(wrapped(body)), "{code:?}");
    }
}

#[test]
fn test_loops_are_not_returned() {
    for code in [
        "for await (const x of []) {}",
        "for (const x of [1, 2, 3]) {await x}",
        "if (await true) {class p {}}",
    ] {
        assert_eq!(rewrite(code), Some(wrapped(code)), "{code:?}");
    }
}

#[test]
fn test_variable_declarations() {
    let cases = [
        (
            "const a = await Promise.resolve(1)",
            "void (a = await Promise.resolve(1));",
        ),
        (
            "let b = await Promise.resolve(2)",
            "void (b = await Promise.resolve(2));",
        ),
        (
            "var c = await Promise.resolve(3)",
            "void (c = await Promise.resolve(3));",
        ),
        (
            "const e = await Promise.resolve(5), f = 6",
            "void (e = await Promise.resolve(5)); void (f = 6);",
        ),
        (
            "let l = await 0, m",
            "void (l = await 0); void (m = undefined);",
        ),
        (
            "const n = 0, o = await 1",
            "void (n = 0); void (o = await 1);",
        ),
        (
            "const {a, b: [c]} = await o;",
            "void ({a, b: [c]} = await o);",
        ),
    ];
    for (code, body) in cases {
        assert_eq!(rewrite(code), Some(wrapped(body)), "{code:?}");
    }
}

#[test]
fn test_nested_declarations() {
    let cases = [
        (
            "if (x) { var c = await 1 }",
            "if (x) { void (c = await 1); }",
        ),
        (
            "if (await x) var a = 1, b",
            "if (await x) { void (a = 1); void (b = undefined); }",
        ),
        (
            "{ let a = await 1 }",
            "{ let a = await 1 }",
        ),
        (
            "for (var i = 0, j; i < 3; i++) await i",
            "for (i = 0, j = undefined; i < 3; i++) await i",
        ),
        (
            "for (var [k, v] of await entries()) {}",
            "for ([k, v] of await entries()) {}",
        ),
    ];
    for (code, body) in cases {
        assert_eq!(rewrite(code), Some(wrapped(body)), "{code:?}");
    }
}

#[test]
fn test_function_and_class_declarations() {
    let cases = [
        (
            "class h {}; await null",
            "void (h = class h {});; return await null",
        ),
        (
            "class j extends h {}; await null",
            "void (j = class j extends h {});; return await null",
        ),
        (
            "await 0; function* k() {}",
            "await 0; void (k = function* k() {});",
        ),
        (
            "if (await true) {function r() {}}",
            "if (await true) {void (r = function r() {});}",
        ),
        (
            "const f = async () => { await x }; await f()",
            "void (f = async () => { await x }); return await f()",
        ),
    ];
    for (code, body) in cases {
        assert_eq!(rewrite(code), Some(wrapped(body)), "{code:?}");
    }
}

#[test]
fn test_bindings_reported() {
    let result = rewrite_with(
        "const e = await p, f = 6; function g() {} class H {} { var i; let j }",
        &TransformOptions::default(),
    );
    assert_eq!(result.bindings, vec!["e", "f", "g", "H", "i"]);
}

#[test]
fn test_no_declarations_remain_at_top_level() {
    for code in [
        "const a = await 1; let b; var c = 2, d; function e() {} class F {}",
        "var {x, y: [z]} = await o; async function* g() {}",
        "class A extends (await B) { [await k]() {} }",
    ] {
        let output = rewrite(code).unwrap_or_default();
        let (arena, root) = match parse_script(output.as_str()) {
            Ok(result) => result,
            Err(diag) => panic!("output of {code:?} does not parse: {diag}\n{output}"),
        };
        let Some(body) = wrapper_body(&arena, root) else {
            panic!("output of {code:?} is not a single wrapper: {output}");
        };
        let Some(NodeData::Block { statements }) = arena.data(body) else {
            panic!("wrapper body is not a block");
        };
        for statement in statements.iter() {
            assert!(
                !matches!(
                    arena.data(statement),
                    Some(
                        NodeData::VariableStatement { .. }
                            | NodeData::FunctionDeclaration(_)
                            | NodeData::ClassDeclaration(_)
                    )
                ),
                "declaration left in {output}"
            );
        }
    }
}

// =============================================================================
// Binding scope objects
// =============================================================================

#[test]
fn test_object_binding_scope() {
    let options = TransformOptions::with_object_scope("scope");
    let result = rewrite_with(
        "const {a, b: [c], d = 1} = await o;\nfunction f() {}\nvar x = 1, y",
        &options,
    );
    assert_eq!(
        result.code,
        wrapped(
            "void ({a: scope.a, b: [scope.c], d: scope.d = 1} = await o);\n\
             void (scope.f = function f() {});\n\
             void (scope.x = 1); void (scope.y = undefined);"
        )
    );
    assert_eq!(result.bindings, vec!["a", "c", "d", "f", "x", "y"]);
}

#[test]
fn test_object_binding_scope_for_heads() {
    let options = TransformOptions::with_object_scope("globalThis.__s");
    let result = rewrite_with("for (var k in await o) {}", &options);
    assert_eq!(result.code, wrapped("for (globalThis.__s.k in await o) {}"));
}

#[test]
fn test_object_binding_scope_qualifies_references() {
    let options = TransformOptions::with_object_scope("__scope");
    let cases = [
        (
            "function f() { return 1 }\nconst a = await f()\na + 1",
            "void (__scope.f = function f() { return 1 });\n\
             void (__scope.a = await __scope.f());\n\
             return __scope.a + 1",
        ),
        (
            "class h {}; new h(); await null",
            "void (__scope.h = class h {});; new __scope.h(); return await null",
        ),
        (
            "const a = await 1\na",
            "void (__scope.a = await 1);\nreturn __scope.a",
        ),
        (
            "const a = await 1; ({a})",
            "void (__scope.a = await 1); return ({a: __scope.a})",
        ),
        (
            "const a = await 1; [1].map(a => a + 1)",
            "void (__scope.a = await 1); return [1].map(a => a + 1)",
        ),
    ];
    for (code, body) in cases {
        assert_eq!(rewrite_with(code, &options).code, wrapped(body), "{code:?}");
    }
}

#[test]
fn test_object_binding_scope_output_parses() {
    let options = TransformOptions::with_object_scope("globalThis.__scope");
    for code in [
        "const a = await 1; ({a}); ({a = 2} = o); a++",
        "var async = 1; for (var k of await xs) async + k",
        "class C { static n = C.name } function f(x = C) { return x } await f()",
    ] {
        let output = rewrite_with(code, &options).code;
        if let Err(diag) = parse_script(output.as_str()) {
            panic!("output of {code:?} does not parse: {diag}\n{output}");
        }
    }
}

#[test]
fn test_for_of_var_named_async() {
    assert_eq!(
        rewrite("for (var async of xs) {} await 0"),
        Some(wrapped("for ((async) of xs) {} return await 0"))
    );
    assert_eq!(
        rewrite("for (var async in o) {} await 0"),
        Some(wrapped("for (async in o) {} return await 0"))
    );
}

#[test]
fn test_invalid_binding_scope_path() {
    for path in ["", "1abc", "a..b", "a-b", "a.", "a b", "class", "await.x", "new.target"] {
        let options = TransformOptions::with_object_scope(path);
        let result = transform_with_options("x", &options);
        assert!(
            matches!(result, Err(WrapError::InvalidOption { .. })),
            "{path:?} accepted: {result:?}"
        );
    }
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_top_level_return_rejected() {
    for (code, offset) in [
        ("return await 10", 0),
        ("return 1", 0),
        ("if (x) { await y; return }", 18),
    ] {
        let err = transform(code);
        assert_eq!(err, Err(WrapError::TopLevelReturn { offset }), "{code:?}");
    }
    let message = transform("return await 10").map_err(|err| err.to_string());
    assert_eq!(message, Err("Top level return is not allowed".to_string()));
}

#[test]
fn test_syntax_error_location_is_relative_to_fragment() {
    let err = syntax_error("a b");
    assert_eq!(err.code, diagnostic_codes::EXPECTED);
    assert_eq!((err.offset, err.line, err.column), (2, 1, 3));

    let err = syntax_error("x\ny z");
    assert_eq!((err.offset, err.line, err.column), (4, 2, 3));
}

#[test]
fn test_syntax_error_in_suffix_points_at_fragment_end() {
    let err = syntax_error("{");
    assert_eq!(err.line, 1);
    assert!(err.offset <= 1, "offset {} past the fragment", err.offset);
}

#[test]
fn test_fragment_escaping_wrapper_rejected() {
    for code in ["}); (async () => {", "})(); (async () => {", "}); x; (async () => {"] {
        let err = syntax_error(code);
        assert_eq!(
            err.code,
            diagnostic_codes::FRAGMENT_ESCAPES_WRAPPER,
            "{code:?}"
        );
        assert_eq!((err.line, err.column), (1, 1));
    }
}

#[test]
fn test_deep_nesting_is_a_syntax_error() {
    let handle = std::thread::Builder::new()
        .stack_size(32 * 1024 * 1024)
        .spawn(|| {
            let code = "(".repeat(500) + "await 1" + &")".repeat(500);
            transform(&code)
        });
    let result = match handle.map(|h| h.join()) {
        Ok(Ok(result)) => result,
        _ => panic!("transform thread failed"),
    };
    match result {
        Err(WrapError::Syntax(err)) => assert_eq!(err.code, diagnostic_codes::NESTING_TOO_DEEP),
        other => panic!("expected nesting error, got {other:?}"),
    }
}

// =============================================================================
// Dynamic input and batches
// =============================================================================

#[test]
fn test_transform_value_rejects_non_strings() {
    let options = TransformOptions::default();
    for (value, found) in [
        (json!(123), "number"),
        (json!(1.5), "number"),
        (json!(true), "boolean"),
        (json!(null), "object"),
        (json!([1]), "object"),
        (json!({"code": "await 1"}), "object"),
    ] {
        let result = transform_value(&value, &options);
        assert_eq!(result, Err(WrapError::InvalidInput { found }), "{value}");
    }
    let message = transform_value(&json!(123), &options).map_err(|err| err.to_string());
    assert_eq!(message, Err("Expected a string, got number".to_string()));
}

#[test]
fn test_transform_value_accepts_strings() {
    let options = TransformOptions::default();
    let result = transform_value(&json!("await 1"), &options);
    assert_eq!(
        result.map(|r| r.map(|t| t.code)),
        Ok(Some(wrapped("return await 1")))
    );
    assert_eq!(transform_value(&json!("1"), &options), Ok(None));
}

#[test]
fn test_transform_batch_preserves_order() {
    let codes = ["await 1", "1", "return 1", "const a = await b"];
    let results = transform_batch(&codes, &TransformOptions::default());
    assert_eq!(results.len(), 4);
    assert_eq!(
        results[0].as_ref().map(|r| r.as_ref().map(|t| t.code.clone())),
        Ok(Some(wrapped("return await 1")))
    );
    assert_eq!(results[1], Ok(None));
    assert_eq!(results[2], Err(WrapError::TopLevelReturn { offset: 0 }));
    assert_eq!(
        results[3].as_ref().map(|r| r.as_ref().map(|t| t.bindings.clone())),
        Ok(Some(vec!["a".to_string()]))
    );
}

#[test]
fn test_transform_batch_matches_sequential() {
    let codes: Vec<String> = (0..64)
        .map(|i| format!("const v{i} = await f({i}); v{i} + {i}"))
        .collect();
    let options = TransformOptions::default();
    let parallel = transform_batch(&codes, &options);
    let sequential: Vec<_> = codes
        .iter()
        .map(|code| transform_with_options(code, &options))
        .collect();
    assert_eq!(parallel, sequential);
}
