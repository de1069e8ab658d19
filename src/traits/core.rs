use crate::interpreter::prelude::{ExecutionResult, InterpreterConfig, Outcome, RuntimeError};
use string_interner::DefaultSymbol as Symbol;

pub trait CoreOperations {
    fn new(config: InterpreterConfig) -> Self;
    fn run_instruction(&mut self, text: &str) -> ExecutionResult;
    fn run_batch(&mut self, source: &str) -> Vec<ExecutionResult>;
    fn execute(&mut self, text: &str) -> Result<Outcome, RuntimeError>;
    fn intern_string(&self, s: &str) -> Symbol;
}
