//! Interpreter for a small imperative language written as templated
//! English sentences.
//!
//! ```text
//! Create a variable named 'x' with value 5
//! If x is greater than 3, set y to 1, otherwise set y to 0
//! ```
//!
//! Each sentence is parsed into an [`ast::prelude::Operation`] and executed
//! by an [`interpreter::prelude::Interpreter`], which reports one
//! [`interpreter::prelude::ExecutionResult`] per instruction.

pub mod ast;
pub mod interpreter;
pub mod parser;
pub mod shared;
pub mod traits;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs a stderr subscriber filtered by `RUST_LOG`, e.g.
/// `RUST_LOG=english_lang=debug`. Does nothing when `RUST_LOG` is unset,
/// and is safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
