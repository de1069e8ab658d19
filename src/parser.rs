pub mod expression;
pub mod literal;
pub mod parser;
pub mod prelude;
pub mod split;
pub mod structs;
mod utils;
