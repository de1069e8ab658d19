use crate::ast::prelude::FunctionDefinition;
use crate::interpreter::prelude::{Environment, FunctionDescriptor, RuntimeError, Value};
use std::sync::Arc;

pub trait InterpreterFunctions {
    fn define_function(&mut self, definition: &FunctionDefinition) -> Arc<FunctionDescriptor>;
    fn lookup_function(&self, name: &str) -> Result<Arc<FunctionDescriptor>, RuntimeError>;
    fn call_function(&self, name: &str, arguments: Vec<Value>) -> Result<Value, RuntimeError>;
    fn invoke(
        &self,
        function: &FunctionDescriptor,
        arguments: Vec<Value>,
        scope: Environment,
    ) -> Result<Value, RuntimeError>;
}
