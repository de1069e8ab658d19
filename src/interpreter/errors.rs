use crate::ast::prelude::Facility;
use crate::parser::prelude::ParseError;
use std::fmt;
use thiserror::Error;

/// Flat error category reported in results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnrecognizedInstruction,
    InvalidSyntax,
    UndefinedVariable,
    UndefinedOperand,
    UndefinedFunction,
    ArityMismatch,
    DivisionByZero,
    EmptyContainer,
    ContainerNotFound,
    ClassNotFound,
    MethodNotFound,
    SuperclassNotFound,
    ContractViolation,
    TypeMismatch,
    IndexOutOfRange,
    KeyNotFound,
    ItemNotFound,
    AttributeNotFound,
    InterfaceNotFound,
    InheritanceCycle,
    Cancelled,
    FacilityUnavailable,
    FacilityFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("variable '{0}' is not defined")]
    UndefinedVariable(String),

    #[error("operand '{0}' is not a defined variable")]
    UndefinedOperand(String),

    #[error("function '{0}' is not defined")]
    UndefinedFunction(String),

    #[error("'{name}' takes {expected} argument(s) but {found} were given")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("{container} '{name}' is empty")]
    EmptyContainer {
        container: &'static str,
        name: String,
    },

    #[error("no {container} named '{name}'")]
    ContainerNotFound {
        container: &'static str,
        name: String,
    },

    #[error("class '{0}' is not defined")]
    ClassNotFound(String),

    #[error("method '{method}' is not defined on class '{class}' or its superclasses")]
    MethodNotFound { class: String, method: String },

    #[error("superclass '{0}' is not defined")]
    SuperclassNotFound(String),

    #[error("class '{class}' does not implement method '{method}' required by interface '{interface}'")]
    ContractViolation {
        interface: String,
        class: String,
        method: String,
    },

    #[error("{0}")]
    TypeMismatch(String),

    #[error("index {index} is out of range for '{name}' of length {length}")]
    IndexOutOfRange {
        name: String,
        index: i64,
        length: usize,
    },

    #[error("key '{key}' not found in '{name}'")]
    KeyNotFound { name: String, key: String },

    #[error("{item} not found in '{name}'")]
    ItemNotFound { name: String, item: String },

    #[error("'{object}' has no attribute '{attribute}'")]
    AttributeNotFound { object: String, attribute: String },

    #[error("interface '{0}' is not defined")]
    InterfaceNotFound(String),

    #[error("making '{class}' inherit from '{superclass}' would create an inheritance cycle")]
    InheritanceCycle { class: String, superclass: String },

    #[error("cancelled: {0}")]
    Cancelled(String),

    #[error("no {0} facility is installed")]
    FacilityUnavailable(Facility),

    #[error("{facility} facility failed: {message}")]
    FacilityFailure { facility: Facility, message: String },

    #[error("{context}: {source}")]
    Nested {
        context: String,
        source: Box<RuntimeError>,
    },
}

impl RuntimeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RuntimeError::Parse(ParseError::UnrecognizedInstruction(_)) => {
                ErrorKind::UnrecognizedInstruction
            }
            RuntimeError::Parse(ParseError::InvalidSyntax(_)) => ErrorKind::InvalidSyntax,
            RuntimeError::UndefinedVariable(_) => ErrorKind::UndefinedVariable,
            RuntimeError::UndefinedOperand(_) => ErrorKind::UndefinedOperand,
            RuntimeError::UndefinedFunction(_) => ErrorKind::UndefinedFunction,
            RuntimeError::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            RuntimeError::DivisionByZero => ErrorKind::DivisionByZero,
            RuntimeError::EmptyContainer { .. } => ErrorKind::EmptyContainer,
            RuntimeError::ContainerNotFound { .. } => ErrorKind::ContainerNotFound,
            RuntimeError::ClassNotFound(_) => ErrorKind::ClassNotFound,
            RuntimeError::MethodNotFound { .. } => ErrorKind::MethodNotFound,
            RuntimeError::SuperclassNotFound(_) => ErrorKind::SuperclassNotFound,
            RuntimeError::ContractViolation { .. } => ErrorKind::ContractViolation,
            RuntimeError::TypeMismatch(_) => ErrorKind::TypeMismatch,
            RuntimeError::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            RuntimeError::KeyNotFound { .. } => ErrorKind::KeyNotFound,
            RuntimeError::ItemNotFound { .. } => ErrorKind::ItemNotFound,
            RuntimeError::AttributeNotFound { .. } => ErrorKind::AttributeNotFound,
            RuntimeError::InterfaceNotFound(_) => ErrorKind::InterfaceNotFound,
            RuntimeError::InheritanceCycle { .. } => ErrorKind::InheritanceCycle,
            RuntimeError::Cancelled(_) => ErrorKind::Cancelled,
            RuntimeError::FacilityUnavailable(_) => ErrorKind::FacilityUnavailable,
            RuntimeError::FacilityFailure { .. } => ErrorKind::FacilityFailure,
            RuntimeError::Nested { source, .. } => source.kind(),
        }
    }

    /// Wraps a failure from a nested action so it surfaces one level up
    /// with the enclosing context in its message.
    pub fn nested(self, context: impl Into<String>) -> Self {
        RuntimeError::Nested {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Innermost error behind any `Nested` wrappers.
    pub fn root(&self) -> &RuntimeError {
        match self {
            RuntimeError::Nested { source, .. } => source.root(),
            other => other,
        }
    }
}
