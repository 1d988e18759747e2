//! Error types for the fragment rewriter.

use crate::scope::WRAPPER_PREFIX;
use serde::Serialize;
use thiserror::Error;
use wrap_await_common::{LineMap, ParseDiagnostic};

/// Failure of a transform. Nothing is printed when any of these is returned.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WrapError {
    /// The input was not a string. `found` is the JavaScript `typeof` name of
    /// what was passed instead.
    #[error("Expected a string, got {found}")]
    InvalidInput { found: &'static str },

    /// A `return` statement outside any function in the fragment.
    #[error("Top level return is not allowed")]
    TopLevelReturn {
        /// Byte offset of the `return` keyword in the fragment.
        offset: u32,
    },

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("Invalid option: {message}")]
    InvalidOption { message: String },
}

/// A parse failure located in the caller's fragment.
///
/// The parser runs over the wrapped text; offsets here have the wrapper
/// prefix removed and are clamped to the fragment, so a failure inside the
/// synthetic suffix points at the fragment's end.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize)]
#[error("{message} ({line}:{column})")]
pub struct SyntaxError {
    pub message: String,
    pub code: u32,
    /// Byte offset into the fragment.
    pub offset: u32,
    /// 1-based line.
    pub line: u32,
    /// 1-based column, in UTF-8 bytes.
    pub column: u32,
}

impl SyntaxError {
    /// Relocate a diagnostic reported against the wrapped text.
    pub fn from_wrapped(fragment: &str, diag: &ParseDiagnostic) -> Self {
        let offset = diag.start.saturating_sub(WRAPPER_PREFIX.len() as u32);
        SyntaxError::at(fragment, offset, diag.message.clone(), diag.code)
    }

    /// A diagnostic at `offset` in `fragment`.
    pub fn at(fragment: &str, offset: u32, message: impl Into<String>, code: u32) -> Self {
        let offset = offset.min(fragment.len() as u32);
        let position = LineMap::build(fragment).offset_to_position(offset);
        SyntaxError {
            message: message.into(),
            code,
            offset,
            line: position.line + 1,
            column: position.character + 1,
        }
    }
}
