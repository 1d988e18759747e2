//! Transform entry points.
//!
//! A transform runs in fixed phases over one arena:
//!
//! 1. wrap the fragment and parse it, locating the wrapper body;
//! 2. reject a top-level `return`;
//! 3. stop with `None` if nothing at the top level suspends;
//! 4. record rehoisting and completion directives, and with an object
//!    binding scope, qualify references to the rehoisted names;
//! 5. print the wrapped text with the directives applied.
//!
//! The arena is never mutated after parsing; phases 2-4 only read it.

use crate::completion::mark_completion;
use crate::error::{SyntaxError, WrapError};
use crate::options::TransformOptions;
use crate::references::qualify_references;
use crate::rehoist::{Rehoisted, Rehoister};
use crate::return_guard::find_top_level_return;
use crate::scope::{WRAPPER_PREFIX, wrap, wrapper_body};
use crate::suspense::has_top_level_suspense;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use wrap_await_common::diagnostic_codes;
use wrap_await_common::limits::MAX_FRAGMENT_LEN;
use wrap_await_emitter::{BindingTarget, print_with_transforms};
use wrap_await_parser::parse_script;

/// A rewritten fragment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Transformed {
    /// The wrapped, rewritten source.
    pub code: String,
    /// Names the fragment declares that now escape the wrapper, in the order
    /// they first appear. Callers that use an object binding scope can
    /// pre-declare these.
    pub bindings: Vec<String>,
}

/// Wrap `code` in an async arrow invocation if it awaits at the top level.
///
/// Returns `Ok(None)` when the fragment has no top-level suspend point and
/// can run unchanged.
///
/// ```
/// let wrapped = wrap_await::transform("const a = await f()").unwrap();
/// assert_eq!(
///     wrapped.as_deref(),
///     Some("(async () => {void (a = await f());\n})()")
/// );
/// assert_eq!(wrap_await::transform("f()").unwrap(), None);
/// ```
pub fn transform(code: &str) -> Result<Option<String>, WrapError> {
    let transformed = transform_with_options(code, &TransformOptions::default())?;
    Ok(transformed.map(|t| t.code))
}

#[tracing::instrument(level = "debug", skip_all, fields(len = code.len()))]
pub fn transform_with_options(
    code: &str,
    options: &TransformOptions,
) -> Result<Option<Transformed>, WrapError> {
    let target = options.binding_target()?;
    if code.len() > MAX_FRAGMENT_LEN {
        return Err(SyntaxError::at(
            "",
            0,
            "Fragment is too large",
            diagnostic_codes::FRAGMENT_TOO_LARGE,
        )
        .into());
    }

    let (arena, root) =
        parse_script(wrap(code)).map_err(|diag| SyntaxError::from_wrapped(code, &diag))?;
    let Some(body) = wrapper_body(&arena, root) else {
        tracing::debug!("[transform] fragment closes the wrapper");
        return Err(SyntaxError::at(
            code,
            0,
            "Fragment closes the async wrapper",
            diagnostic_codes::FRAGMENT_ESCAPES_WRAPPER,
        )
        .into());
    };

    if let Some(ret) = find_top_level_return(&arena, body) {
        let pos = arena.get(ret).map_or(0, |node| node.pos);
        return Err(WrapError::TopLevelReturn {
            offset: pos.saturating_sub(WRAPPER_PREFIX.len() as u32),
        });
    }
    if !has_top_level_suspense(&arena, body) {
        return Ok(None);
    }

    let qualify = matches!(target, BindingTarget::Object { .. });
    let Rehoisted {
        mut transforms,
        bindings,
    } = Rehoister::new(&arena, qualify).run(body);
    if qualify {
        qualify_references(&arena, body, &bindings, &mut transforms);
    }
    mark_completion(&arena, body, &mut transforms);

    let code = print_with_transforms(&arena, root, &transforms, target);
    tracing::debug!(out_len = code.len(), "[transform] wrapped");
    Ok(Some(Transformed {
        code,
        bindings: bindings.into_iter().collect(),
    }))
}

/// Transform a dynamically typed value. Anything but a string fails with
/// [`WrapError::InvalidInput`] naming its JavaScript `typeof`.
pub fn transform_value(
    value: &Value,
    options: &TransformOptions,
) -> Result<Option<Transformed>, WrapError> {
    match value {
        Value::String(code) => transform_with_options(code, options),
        other => Err(WrapError::InvalidInput {
            found: js_typeof(other),
        }),
    }
}

fn js_typeof(value: &Value) -> &'static str {
    match value {
        Value::Null | Value::Array(_) | Value::Object(_) => "object",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
    }
}

/// Transform independent fragments in parallel. Results are in input order.
pub fn transform_batch<S>(
    codes: &[S],
    options: &TransformOptions,
) -> Vec<Result<Option<Transformed>, WrapError>>
where
    S: AsRef<str> + Sync,
{
    tracing::debug!(count = codes.len(), "[transform] batch");
    codes
        .par_iter()
        .map(|code| transform_with_options(code.as_ref(), options))
        .collect()
}
