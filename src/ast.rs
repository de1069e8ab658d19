pub mod expr;
pub mod operation;
pub mod prelude;
pub mod span;
pub mod types;
