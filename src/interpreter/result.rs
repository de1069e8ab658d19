use crate::interpreter::prelude::{ErrorKind, RuntimeError, Value};
use crate::traits::prelude::JsonParsable;
use serde_json::{json, Value as JsonValue};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => f.write_str("success"),
            Status::Error => f.write_str("error"),
        }
    }
}

/// What a successfully executed operation reports back.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub message: String,
    pub data: Option<Value>,
}

impl Outcome {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(message: impl Into<String>, data: Value) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }
}

/// Structured result of one top-level instruction.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub status: Status,
    pub kind: Option<ErrorKind>,
    pub message: String,
    pub data: Option<Value>,
}

impl ExecutionResult {
    pub fn success(outcome: Outcome) -> Self {
        Self {
            status: Status::Success,
            kind: None,
            message: outcome.message,
            data: outcome.data,
        }
    }

    pub fn failure(error: &RuntimeError) -> Self {
        Self {
            status: Status::Error,
            kind: Some(error.kind()),
            message: error.to_string(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    pub fn to_json(&self) -> JsonValue {
        json!({
            "status": self.status.to_string(),
            "kind": self.kind.map(|kind| kind.to_string()),
            "message": self.message,
            "data": self.data.as_ref().map(Value::to_json),
        })
    }
}

impl From<Result<Outcome, RuntimeError>> for ExecutionResult {
    fn from(result: Result<Outcome, RuntimeError>) -> Self {
        match result {
            Ok(outcome) => ExecutionResult::success(outcome),
            Err(error) => ExecutionResult::failure(&error),
        }
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Some(kind) => write!(f, "[{}] {}: {}", self.status, kind, self.message),
            None => write!(f, "[{}] {}", self.status, self.message),
        }
    }
}
