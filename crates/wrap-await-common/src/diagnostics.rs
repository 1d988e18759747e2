//! Parse diagnostics.
//!
//! The scanner and the parser report problems as plain data. The first
//! diagnostic aborts the parse; callers convert it into their own error type.

use serde::Serialize;
use std::fmt;

/// Numeric codes for parse diagnostics.
///
/// The numbering follows the TypeScript compiler's diagnostic codes so that
/// messages are familiar to anyone who has read `tsc` output.
pub mod diagnostic_codes {
    pub const UNTERMINATED_STRING_LITERAL: u32 = 1002;
    pub const IDENTIFIER_EXPECTED: u32 = 1003;
    pub const EXPECTED: u32 = 1005;
    pub const ASTERISK_SLASH_EXPECTED: u32 = 1010;
    pub const UNEXPECTED_TOKEN: u32 = 1012;
    pub const DIGIT_EXPECTED: u32 = 1124;
    pub const HEXADECIMAL_DIGIT_EXPECTED: u32 = 1125;
    pub const INVALID_CHARACTER: u32 = 1127;
    pub const DECLARATION_OR_STATEMENT_EXPECTED: u32 = 1128;
    pub const EXPRESSION_EXPECTED: u32 = 1109;
    pub const UNTERMINATED_TEMPLATE_LITERAL: u32 = 1160;
    pub const UNTERMINATED_REGULAR_EXPRESSION_LITERAL: u32 = 1161;
    pub const LINE_BREAK_NOT_PERMITTED_HERE: u32 = 1142;
    pub const IDENTIFIER_CANNOT_FOLLOW_NUMERIC_LITERAL: u32 = 1351;
    pub const INVALID_DESTRUCTURING_TARGET: u32 = 2364;
    pub const NESTING_TOO_DEEP: u32 = 9001;
    pub const FRAGMENT_ESCAPES_WRAPPER: u32 = 9002;
    pub const FRAGMENT_TOO_LARGE: u32 = 9003;
}

/// A single parse error with its location in the scanned text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParseDiagnostic {
    /// Byte offset of the offending token.
    pub start: u32,
    /// Length in bytes of the offending token (may be 0 at end of input).
    pub length: u32,
    pub message: String,
    pub code: u32,
}

impl ParseDiagnostic {
    pub fn new(start: u32, length: u32, message: impl Into<String>, code: u32) -> Self {
        ParseDiagnostic {
            start,
            length,
            message: message.into(),
            code,
        }
    }

    /// End offset (exclusive) of the diagnostic span.
    pub fn end(&self) -> u32 {
        self.start.saturating_add(self.length)
    }
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JS{}: {}", self.code, self.message)
    }
}

/// Substitute `{0}`, `{1}`, ... placeholders in a message template.
pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}
