//! Common types and utilities for the wrap-await fragment rewriter.
//!
//! This crate provides foundational types used across all wrap-await crates:
//! - Parse diagnostics (`ParseDiagnostic`, `diagnostic_codes`)
//! - Line/column mapping (`LineMap`, `Position`)
//! - Recursion and size limits

// Parse diagnostics shared by the scanner and the parser
pub mod diagnostics;
pub use diagnostics::{ParseDiagnostic, diagnostic_codes, format_message};

// Centralized limits and thresholds
pub mod limits;

// Position types for line/column source locations
pub mod position;
pub use position::{LineMap, Position};

#[cfg(test)]
#[path = "../tests/position_tests.rs"]
mod position_tests;
