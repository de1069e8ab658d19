use crate::ast::prelude::{ArithmeticOp, Operation, VariableOp};
use crate::interpreter::prelude::{Outcome, RuntimeError};

pub trait OperationExecutor {
    fn execute_operation(&mut self, operation: &Operation) -> Result<Outcome, RuntimeError>;
    fn execute_variable_op(&mut self, op: &VariableOp) -> Result<Outcome, RuntimeError>;
    fn execute_arithmetic(&mut self, op: &ArithmeticOp) -> Result<Outcome, RuntimeError>;
}
