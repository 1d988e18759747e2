//! Centralized limits for the scanner, parser and rewrite passes.
//!
//! The parser is recursive descent, so the nesting depth of the input maps
//! directly onto native stack usage. These limits turn pathological input
//! into an ordinary syntax error instead of a stack overflow.

/// Maximum nesting depth for statements and expressions in the parser.
///
/// Counted once per statement, assignment expression, unary operator and
/// binding pattern level. Real-world fragments rarely nest beyond a few
/// dozen levels.
///
/// ```javascript
/// // Each parenthesis adds two levels (assignment and unary expression):
/// ((((((((((((((((((((((((((((((((1))))))))))))))))))))))))))))))));
/// ```
pub const MAX_PARSE_DEPTH: u32 = 128;

/// Maximum number of bytes accepted for a single fragment.
///
/// Node positions are stored as `u32`, so the wrapped text must fit in
/// `u32::MAX` bytes. The limit leaves headroom for the synthetic wrapper.
pub const MAX_FRAGMENT_LEN: usize = (u32::MAX as usize) - 64;

/// Initial capacity hint for the node arena, per byte of source text.
///
/// Typical script code produces roughly one node per four bytes.
pub const NODES_PER_SOURCE_BYTE_DIVISOR: usize = 4;
