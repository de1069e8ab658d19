use crate::ast::prelude::ErrorData;
use thiserror::Error;

/// Turns one sentence into an `Operation`. Grammar rules are tried in
/// declaration order and nested actions are parsed recursively up to
/// `max_depth` levels.
#[derive(Debug, Clone)]
pub struct InstructionParser {
    pub(crate) max_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("{}", .0.message)]
    UnrecognizedInstruction(ErrorData),
    #[error("{}", .0.message)]
    InvalidSyntax(ErrorData),
}

impl ParseError {
    pub fn data(&self) -> &ErrorData {
        match self {
            ParseError::UnrecognizedInstruction(data) | ParseError::InvalidSyntax(data) => data,
        }
    }

    /// Moves the error span by `offset` bytes, used when a nested action or
    /// a trimmed sentence is reported against the text it came from.
    pub fn shifted(mut self, offset: usize) -> Self {
        let data = match &mut self {
            ParseError::UnrecognizedInstruction(data) | ParseError::InvalidSyntax(data) => data,
        };
        data.location.start += offset;
        data.location.end += offset;
        self
    }
}
