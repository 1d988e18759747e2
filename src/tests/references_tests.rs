use crate::references::{is_reference, qualify_references};
use crate::rehoist::{Rehoisted, Rehoister};
use crate::scope::{wrap, wrapper_body};
use wrap_await_emitter::{BindingTarget, print_with_transforms};
use wrap_await_parser::syntax::{VisitResult, walk};
use wrap_await_parser::{NodeData, parse_script};

/// Rehoist `code` into scope object `s`, qualify references, and print the
/// wrapper body block.
fn qualified(code: &str) -> String {
    let (arena, root) = match parse_script(wrap(code)) {
        Ok(result) => result,
        Err(diag) => panic!("unexpected parse error for {code:?}: {diag}"),
    };
    let Some(body) = wrapper_body(&arena, root) else {
        panic!("no wrapper body for {code:?}");
    };
    let Rehoisted {
        mut transforms,
        bindings,
    } = Rehoister::new(&arena, true).run(body);
    qualify_references(&arena, body, &bindings, &mut transforms);
    let target = BindingTarget::Object {
        path: "s".to_string(),
    };
    print_with_transforms(&arena, body, &transforms, target)
}

fn block(body: &str) -> String {
    format!("{{{body}\n}}")
}

#[test]
fn test_references_follow_rehoisted_bindings() {
    assert_eq!(
        qualified("const a = await f(); a + 1; a = 2; a++; typeof a"),
        block("void (s.a = await f()); s.a + 1; s.a = 2; s.a++; typeof s.a")
    );
}

#[test]
fn test_references_in_nested_functions() {
    assert_eq!(
        qualified("var n = 1; function g() { return n } const h = () => n * 2"),
        block("void (s.n = 1); void (s.g = function g() { return s.n }); void (s.h = () => s.n * 2);")
    );
}

#[test]
fn test_block_function_references() {
    assert_eq!(
        qualified("{ function r() {} r() }"),
        block("{ void (s.r = function r() {}); s.r() }")
    );
}

#[test]
fn test_shadowed_references_are_left_alone() {
    let code = "let a = 1; \
                function g(a) { return a } \
                function k() { var a; return a } \
                const q = ({a}) => a; \
                try {} catch (a) { a } \
                { let a = 2; a } \
                for (const a of xs) a; \
                class C { m() { return a } }";
    assert_eq!(
        qualified(code),
        block(
            "void (s.a = 1); \
             void (s.g = function g(a) { return a }); \
             void (s.k = function k() { var a; return a }); \
             void (s.q = ({a}) => a); \
             try {} catch (a) { a } \
             { let a = 2; a } \
             for (const a of xs) a; \
             void (s.C = class C { m() { return s.a } });"
        )
    );
}

#[test]
fn test_shorthand_properties_are_expanded() {
    assert_eq!(
        qualified("const a = await 1; ({a}); ({a = 2} = o); ({b: a} = o)"),
        block("void (s.a = await 1); ({a: s.a}); ({a: s.a = 2} = o); ({b: s.a} = o)")
    );
}

#[test]
fn test_property_names_and_labels_are_not_references() {
    assert_eq!(
        qualified("const a = 1; o.a; ({a: 1}); class K { a = a; static a() {} } a: for (;;) break a;"),
        block(
            "void (s.a = 1); o.a; ({a: 1}); \
             void (s.K = class K { a = s.a; static a() {} }); a: for (;;) break a;"
        )
    );
}

#[test]
fn test_is_reference() {
    let (arena, root) = match parse_script("o.p; ({k: v}); l: f(x)") {
        Ok(result) => result,
        Err(diag) => panic!("unexpected parse error: {diag}"),
    };
    let mut seen = Vec::new();
    walk(&arena, root, |index, node| {
        if let NodeData::Identifier { escaped_text } = &node.data {
            seen.push((escaped_text.clone(), is_reference(&arena, index)));
        }
        VisitResult::Continue
    });
    let expected = [
        ("o", true),
        ("p", false),
        ("k", false),
        ("v", true),
        ("l", false),
        ("f", true),
        ("x", true),
    ];
    assert_eq!(
        seen,
        expected
            .iter()
            .map(|(name, reference)| (name.to_string(), *reference))
            .collect::<Vec<_>>()
    );
}
