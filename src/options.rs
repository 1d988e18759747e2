//! Transform configuration.
//!
//! Options deserialize from camelCase JSON so that they can be passed through
//! from a host environment unchanged:
//!
//! ```json
//! { "bindingScope": { "kind": "object", "path": "globalThis.__scope" } }
//! ```

use crate::error::WrapError;
use serde::{Deserialize, Serialize};
use wrap_await_emitter::BindingTarget;

/// Where the names a fragment declares end up after rewriting.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BindingScope {
    /// Plain assignments to bare names, resolved by whatever scope runs the
    /// wrapped code (the global object for a script).
    #[default]
    Ambient,
    /// Assignments to properties of the object at `path`, a dotted
    /// identifier path such as `globalThis.__scope`.
    Object { path: String },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct TransformOptions {
    pub binding_scope: BindingScope,
}

impl TransformOptions {
    /// Options that write escaping bindings onto the object at `path`.
    pub fn with_object_scope(path: impl Into<String>) -> Self {
        TransformOptions {
            binding_scope: BindingScope::Object { path: path.into() },
        }
    }

    /// Parse options from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, WrapError> {
        let options: TransformOptions =
            serde_json::from_str(json).map_err(|err| WrapError::InvalidOption {
                message: err.to_string(),
            })?;
        options.binding_target()?;
        Ok(options)
    }

    /// Validate the binding scope and turn it into the printer's target.
    pub fn binding_target(&self) -> Result<BindingTarget, WrapError> {
        match &self.binding_scope {
            BindingScope::Ambient => Ok(BindingTarget::Ambient),
            BindingScope::Object { path } => {
                if !is_identifier_path(path) {
                    return Err(WrapError::InvalidOption {
                        message: format!("binding scope path '{path}' is not a dotted identifier path"),
                    });
                }
                Ok(BindingTarget::Object { path: path.clone() })
            }
        }
    }
}

/// `a`, `a.b`, `$x._y`, `this.scope`, ... The first segment must be usable
/// as a variable name; later segments are property names and may be
/// reserved words (`s.class`).
fn is_identifier_path(path: &str) -> bool {
    let mut segments = path.split('.');
    let Some(root) = segments.next() else {
        return false;
    };
    let root_ok = root == "this" || (is_identifier_name(root) && !is_reserved_word(root));
    root_ok && segments.all(is_identifier_name)
}

fn is_identifier_name(segment: &str) -> bool {
    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let is_start = |c: char| c == '$' || c == '_' || c.is_alphabetic();
    is_start(first) && chars.all(|c| is_start(c) || c.is_alphanumeric())
}

/// Reserved words, with `await` and `yield`.
const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "import", "in", "instanceof", "new", "null", "return", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}
