use crate::ast::prelude::{ControlStructure, LoopOp};
use crate::interpreter::prelude::{Outcome, RuntimeError};

pub trait ControlFlow {
    fn execute_control(&mut self, control: &ControlStructure) -> Result<Outcome, RuntimeError>;
    fn execute_loop(&mut self, op: &LoopOp) -> Result<Outcome, RuntimeError>;
    /// Polled before every loop iteration; fails with `Cancelled` once the
    /// session is cancelled, past its deadline or over the iteration cap.
    fn check_iteration(&self, iteration: u64) -> Result<(), RuntimeError>;
}
