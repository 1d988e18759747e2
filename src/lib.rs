//! Run script fragments that use top-level `await`.
//!
//! A script cannot `await` outside an async function. [`transform`] rewrites a
//! fragment that does into the body of an immediately invoked async arrow
//! function, while keeping the fragment's observable behaviour as a script:
//!
//! - declarations are turned into assignments so their names still escape to
//!   the surrounding scope ([`rehoist`]), and with an object binding scope
//!   the references to them follow ([`references`]);
//! - the last expression statement is returned, so the wrapper's promise
//!   resolves to the script's completion value ([`completion`]);
//! - a top-level `return` is rejected ([`return_guard`]).
//!
//! Fragments with no top-level suspend point are left alone (`Ok(None)`).
//!
//! ```
//! let out = wrap_await::transform("class h {}; await null").unwrap();
//! assert_eq!(
//!     out.as_deref(),
//!     Some("(async () => {void (h = class h {});; return await null\n})()")
//! );
//! ```

pub mod error;
pub use error::{SyntaxError, WrapError};

pub mod options;
pub use options::{BindingScope, TransformOptions};

// Classification relative to the synthetic wrapper
pub mod scope;

// Analysis passes
pub mod return_guard;
pub mod suspense;

// Directive passes
pub mod completion;
pub mod references;
pub mod rehoist;

pub mod transform;
pub use transform::{Transformed, transform, transform_batch, transform_value, transform_with_options};

pub mod tracing_config;

#[cfg(test)]
#[path = "tests/scope_tests.rs"]
mod scope_tests;

#[cfg(test)]
#[path = "tests/rehoist_tests.rs"]
mod rehoist_tests;

#[cfg(test)]
#[path = "tests/references_tests.rs"]
mod references_tests;

#[cfg(test)]
#[path = "tests/transform_tests.rs"]
mod transform_tests;

#[cfg(test)]
#[path = "tests/options_tests.rs"]
mod options_tests;
