use crate::ast::prelude::{DictOp, ListOp, QueueOp, StackOp};
use crate::interpreter::prelude::{Outcome, RuntimeError};

pub trait ContainerOperations {
    fn execute_list_op(&mut self, op: &ListOp) -> Result<Outcome, RuntimeError>;
    fn execute_dict_op(&mut self, op: &DictOp) -> Result<Outcome, RuntimeError>;
    fn execute_stack_op(&mut self, op: &StackOp) -> Result<Outcome, RuntimeError>;
    fn execute_queue_op(&mut self, op: &QueueOp) -> Result<Outcome, RuntimeError>;
}
