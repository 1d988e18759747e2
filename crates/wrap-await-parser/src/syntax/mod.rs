//! Syntax Utilities
//!
//! Helpers for working with the arena syntax tree that are shared by every
//! rewrite pass.

pub mod walk;
pub use walk::{VisitResult, walk};
