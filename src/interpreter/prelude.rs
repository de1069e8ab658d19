pub use super::cancellation::CancellationToken;
pub use super::config::InterpreterConfig;
pub use super::errors::{ErrorKind, RuntimeError};
pub use super::result::{ExecutionResult, Outcome, Status};
pub use super::structs::{
    ClassDescriptor, Environment, Facilities, FunctionDescriptor, FunctionRegistry,
    InterfaceDescriptor, Interpreter, ObjectInstance, SharedInterner, Value,
};
