//! JavaScript parser and arena syntax tree for the wrap-await fragment
//! rewriter.
//!
//! This crate provides:
//! - `NodeArena`, `NodeIndex`, `NodeData` - the syntax tree
//! - `ParserState` - recursive descent parser for ECMAScript 2022 scripts
//! - `syntax::walk` - pre-order traversal used by the rewrite passes

pub mod parser;
pub use parser::{NodeArena, NodeData, NodeIndex, NodeList, ParseResult, ParserState};

pub mod syntax;

use std::sync::Arc;
use wrap_await_common::ParseDiagnostic;

/// Parse `text` as a script, returning the arena and its `SourceFile` root.
pub fn parse_script(text: impl Into<Arc<str>>) -> Result<(NodeArena, NodeIndex), ParseDiagnostic> {
    let mut parser = ParserState::new(text);
    let root = parser.parse_source_file()?;
    Ok((parser.into_arena(), root))
}

#[cfg(test)]
#[path = "../tests/parser_tests.rs"]
mod parser_tests;

#[cfg(test)]
#[path = "../tests/walk_tests.rs"]
mod walk_tests;
