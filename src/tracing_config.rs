//! Tracing setup for hosts embedding the rewriter.
//!
//! Output format is chosen by `WRAP_AWAIT_LOG_FORMAT`:
//!
//! - `text` (default): flat `tracing-subscriber` lines
//! - `tree`: indented span hierarchy via `tracing-tree`
//! - `json`: one JSON object per event
//!
//! ```bash
//! WRAP_AWAIT_LOG=debug WRAP_AWAIT_LOG_FORMAT=tree my-repl
//! WRAP_AWAIT_LOG="wrap_await::rehoist=trace,wrap_await_emitter=debug" my-repl
//! ```
//!
//! Nothing is installed unless `WRAP_AWAIT_LOG` or `RUST_LOG` is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Tree,
    Json,
}

impl LogFormat {
    /// Parse a format name, case-insensitively. Unknown names fall back to
    /// [`LogFormat::Text`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "tree" => LogFormat::Tree,
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }

    fn from_env() -> Self {
        std::env::var("WRAP_AWAIT_LOG_FORMAT")
            .map(|name| LogFormat::from_name(&name))
            .unwrap_or_default()
    }
}

/// `WRAP_AWAIT_LOG` wins over `RUST_LOG`. `None` when neither is set.
fn build_filter() -> Option<EnvFilter> {
    if let Ok(directives) = std::env::var("WRAP_AWAIT_LOG") {
        return Some(EnvFilter::builder().parse_lossy(directives));
    }
    std::env::var("RUST_LOG")
        .is_ok()
        .then(EnvFilter::from_default_env)
}

/// Install a global subscriber writing to stderr.
///
/// Returns `false` if logging was not requested or a subscriber is already
/// installed.
pub fn init_tracing() -> bool {
    let Some(filter) = build_filter() else {
        return false;
    };

    let installed = match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_writer(std::io::stderr)
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_targets(true);
            Registry::default().with(filter).with(tree_layer).try_init().is_ok()
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).try_init().is_ok()
        }
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok(),
    };
    installed
}
