use super::*;
use crate::tracing_config::{LogFormat, init_tracing};
use wrap_await_emitter::BindingTarget;

#[test]
fn test_default_options() {
    let options = TransformOptions::default();
    assert_eq!(options.binding_scope, BindingScope::Ambient);
    assert_eq!(options.binding_target(), Ok(BindingTarget::Ambient));
}

#[test]
fn test_options_from_json() {
    assert_eq!(TransformOptions::from_json("{}"), Ok(TransformOptions::default()));
    assert_eq!(
        TransformOptions::from_json(r#"{"bindingScope": {"kind": "ambient"}}"#),
        Ok(TransformOptions::default())
    );
    assert_eq!(
        TransformOptions::from_json(
            r#"{"bindingScope": {"kind": "object", "path": "globalThis.__scope"}}"#
        ),
        Ok(TransformOptions::with_object_scope("globalThis.__scope"))
    );
}

#[test]
fn test_options_from_json_rejects_bad_input() {
    for json in [
        r#"{"bindingScope": {"kind": "object", "path": "a-b"}}"#,
        r#"{"bindingScope": {"kind": "object"}}"#,
        r#"{"bindingScope": {"kind": "module"}}"#,
        r#"{"unknown": 1}"#,
        "not json",
    ] {
        let result = TransformOptions::from_json(json);
        assert!(
            matches!(result, Err(WrapError::InvalidOption { .. })),
            "{json} accepted: {result:?}"
        );
    }
}

#[test]
fn test_options_serialize_camel_case() {
    let json = serde_json::to_string(&TransformOptions::with_object_scope("s"));
    assert_eq!(
        json.ok().as_deref(),
        Some(r#"{"bindingScope":{"kind":"object","path":"s"}}"#)
    );
}

#[test]
fn test_binding_target_paths() {
    for path in [
        "s",
        "globalThis.__scope",
        "$ctx._vars",
        "ünï.côde",
        "this.scope",
        "s.class",
        "window.default",
    ] {
        assert_eq!(
            TransformOptions::with_object_scope(path).binding_target(),
            Ok(BindingTarget::Object {
                path: path.to_string()
            }),
            "{path:?}"
        );
    }
}

#[test]
fn test_log_format_names() {
    assert_eq!(LogFormat::from_name("tree"), LogFormat::Tree);
    assert_eq!(LogFormat::from_name(" JSON "), LogFormat::Json);
    assert_eq!(LogFormat::from_name("text"), LogFormat::Text);
    assert_eq!(LogFormat::from_name("pretty"), LogFormat::Text);
    assert_eq!(LogFormat::default(), LogFormat::Text);
}

#[test]
fn test_init_tracing_is_repeatable() {
    // A second call never replaces an installed subscriber.
    init_tracing();
    assert!(!init_tracing());
}

#[test]
fn test_binding_target_rejects_reserved_root() {
    for path in ["class", "null.x", "super.x", "typeof", "yield.s"] {
        let result = TransformOptions::with_object_scope(path).binding_target();
        assert!(
            matches!(result, Err(WrapError::InvalidOption { .. })),
            "{path:?} accepted: {result:?}"
        );
    }
}
