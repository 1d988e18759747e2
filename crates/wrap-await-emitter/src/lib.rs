//! Transform directives and source printer for the wrap-await fragment
//! rewriter.
//!
//! This crate provides:
//! - `TransformContext` / `TransformDirective` - index-keyed rewrite records
//! - `Printer` - serializes a parsed tree with directives applied
//! - `BindingTarget` - how rehoisted assignment targets are spelled

pub mod printer;
pub mod source_writer;
pub mod transform_context;

pub use printer::{BindingTarget, Printer, print_with_transforms};
pub use transform_context::{TransformContext, TransformDirective};

#[cfg(test)]
#[path = "../tests/printer_tests.rs"]
mod printer_tests;
