//! JavaScript scanner/tokenizer for the wrap-await fragment rewriter.
//!
//! This crate provides the lexical analysis phase:
//! - `SyntaxKind` - Token types
//! - `ScannerState` - Tokenizer state machine
//! - `char_codes` - Character classification utilities

pub mod char_codes;

pub mod syntax_kind;
pub use syntax_kind::SyntaxKind;

pub mod scanner_impl;
pub use scanner_impl::{ScannerSnapshot, ScannerState};

#[cfg(test)]
#[path = "../tests/scanner_tests.rs"]
mod scanner_tests;
