pub use super::expression::{parse_expression, parse_path, parse_value};
pub use super::literal::parse_literal;
pub use super::parser::Rule;
pub use super::split::{split_instructions, SourceLine};
pub use super::structs::{InstructionParser, ParseError};
