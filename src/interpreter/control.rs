use crate::ast::prelude::{ControlStructure, LoopOp, Operand, Path};
use crate::interpreter::prelude::{ErrorKind, Interpreter, Outcome, RuntimeError, Value};
use crate::traits::prelude::{ControlFlow, ExpressionEvaluator, OperationExecutor};
use std::time::Instant;

const INDEX_VARIABLE: &str = "_index";
const EXCEPTION_VARIABLE: &str = "_exception";

fn iterations(count: u64) -> Outcome {
    let noun = if count == 1 { "iteration" } else { "iterations" };
    Outcome::with_data(format!("loop ran {} {}", count, noun), Value::Int(count as i64))
}

impl ControlFlow for Interpreter {
    fn execute_control(&mut self, control: &ControlStructure) -> Result<Outcome, RuntimeError> {
        match control {
            ControlStructure::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate_condition(condition)? {
                    self.execute_operation(then_branch)
                        .map_err(|e| e.nested("then branch"))
                } else if let Some(else_branch) = else_branch {
                    self.execute_operation(else_branch)
                        .map_err(|e| e.nested("otherwise branch"))
                } else {
                    Ok(Outcome::message("condition is false; nothing to do"))
                }
            }
            ControlStructure::While { condition, body } => {
                let mut iteration = 0;
                loop {
                    self.check_iteration(iteration)?;
                    if !self.evaluate_condition(condition)? {
                        break;
                    }
                    tracing::trace!(iteration, "while iteration");
                    self.execute_operation(body)
                        .map_err(|e| e.nested(format!("iteration {}", iteration + 1)))?;
                    iteration += 1;
                }
                Ok(iterations(iteration))
            }
            ControlStructure::Try { body, handler } => match self.execute_operation(body) {
                Ok(outcome) => Ok(outcome),
                Err(error) if error.kind() == ErrorKind::Cancelled => Err(error),
                Err(error) => {
                    tracing::debug!(kind = %error.kind(), "caught failure");
                    self.assign(
                        &Path::simple(EXCEPTION_VARIABLE),
                        Value::Str(error.to_string()),
                    )?;
                    match handler {
                        Some(handler) => self
                            .execute_operation(handler)
                            .map_err(|e| e.nested("otherwise branch")),
                        None => Ok(Outcome::message(format!("ignored failure: {}", error))),
                    }
                }
            },
        }
    }

    fn execute_loop(&mut self, op: &LoopOp) -> Result<Outcome, RuntimeError> {
        match op {
            LoopOp::Range {
                variable,
                start,
                end,
                body,
            } => {
                let start = self.integer_operand(start)?;
                let end = self.integer_operand(end)?;
                let variable_path = Path::simple(variable.as_str());

                let mut iteration = 0;
                for value in start..=end {
                    self.check_iteration(iteration)?;
                    tracing::trace!(%variable, value, "range iteration");
                    self.assign(&variable_path, Value::Int(value))?;
                    self.execute_operation(body)
                        .map_err(|e| e.nested(format!("iteration {}={}", variable, value)))?;
                    iteration += 1;
                }
                Ok(iterations(iteration))
            }
            LoopOp::Repeat { count, body } => {
                let count = self.integer_operand(count)?.max(0) as u64;
                let index_path = Path::simple(INDEX_VARIABLE);

                for iteration in 0..count {
                    self.check_iteration(iteration)?;
                    tracing::trace!(iteration, "repeat iteration");
                    self.assign(&index_path, Value::Int(iteration as i64))?;
                    self.execute_operation(body)
                        .map_err(|e| e.nested(format!("repetition {}", iteration + 1)))?;
                }
                Ok(iterations(count))
            }
            LoopOp::ForEach {
                variable,
                list,
                body,
            } => {
                let items = match self.lookup(list) {
                    Ok(Value::List(items)) => items.snapshot(),
                    _ => {
                        return Err(RuntimeError::ContainerNotFound {
                            container: "list",
                            name: list.to_string(),
                        })
                    }
                };
                let variable_path = Path::simple(variable.as_str());
                let index_path = Path::simple(INDEX_VARIABLE);

                let mut iteration = 0;
                for item in items {
                    self.check_iteration(iteration)?;
                    tracing::trace!(iteration, %variable, "for-each iteration");
                    self.assign(&variable_path, item)?;
                    self.assign(&index_path, Value::Int(iteration as i64))?;
                    self.execute_operation(body)
                        .map_err(|e| e.nested(format!("item {}", iteration)))?;
                    iteration += 1;
                }
                Ok(iterations(iteration))
            }
        }
    }

    fn check_iteration(&self, iteration: u64) -> Result<(), RuntimeError> {
        if let Some(check) = &self.cancellation {
            if check.is_cancelled() {
                tracing::warn!(iteration, "loop cancelled");
                return Err(RuntimeError::Cancelled("cancellation requested".into()));
            }
        }

        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                tracing::warn!(iteration, "instruction deadline passed");
                return Err(RuntimeError::Cancelled(format!(
                    "instruction ran longer than {:?}",
                    self.config.timeout.unwrap_or_default()
                )));
            }
        }

        if iteration >= self.config.max_loop_iterations {
            tracing::warn!(iteration, "loop iteration cap reached");
            return Err(RuntimeError::Cancelled(format!(
                "loop exceeded {} iterations",
                self.config.max_loop_iterations
            )));
        }

        Ok(())
    }
}

impl Interpreter {
    fn integer_operand(&self, operand: &Operand) -> Result<i64, RuntimeError> {
        match self.resolve_operand(operand, &self.environment)? {
            Value::Int(n) => Ok(n),
            Value::Float(n) if n.fract() == 0.0 => Ok(n as i64),
            other => Err(RuntimeError::TypeMismatch(format!(
                "expected a whole number but found {} {}",
                other.type_name(),
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::prelude::{ErrorKind, InterpreterConfig, Interpreter, Value};
    use crate::traits::prelude::CoreOperations;

    #[test]
    fn range_is_inclusive() {
        let mut it = Interpreter::new(InterpreterConfig::default());
        it.run_batch("Set sum to 0\nFor i from 1 to 5, add i to sum");
        assert_eq!(it.variable("sum"), Some(Value::Int(15)));
        assert_eq!(it.variable("i"), Some(Value::Int(5)));
    }

    #[test]
    fn while_rechecks_its_condition() {
        let mut it = Interpreter::new(InterpreterConfig::default());
        let results = it.run_batch(
            "Set n to 0\nSet one to 1\nWhile n is less than 4, add one to n",
        );
        assert!(results.iter().all(|result| result.is_success()));
        assert_eq!(it.variable("n"), Some(Value::Int(4)));
    }

    #[test]
    fn runaway_loops_hit_the_iteration_cap() {
        let config = InterpreterConfig::default().with_max_loop_iterations(50);
        let mut it = Interpreter::new(config);
        let results = it.run_batch("Set n to 1\nSet one to 1\nWhile n is greater than 0, add one to n");
        assert_eq!(results[2].kind, Some(ErrorKind::Cancelled));
        assert_eq!(it.variable("n"), Some(Value::Int(51)));
    }

    #[test]
    fn repeat_and_for_each_bind_index() {
        let mut it = Interpreter::new(InterpreterConfig::default());
        it.run_batch(
            "Set count to 0\nSet one to 1\nRepeat 3 times, add one to count\n\
             Create list xs with [10, 20, 30]\nSet total to 0\nFor each x in list xs, add x to total",
        );
        assert_eq!(it.variable("count"), Some(Value::Int(3)));
        assert_eq!(it.variable("total"), Some(Value::Int(60)));
        assert_eq!(it.variable("_index"), Some(Value::Int(2)));
    }

    #[test]
    fn nested_failures_surface_one_level_up() {
        let mut it = Interpreter::new(InterpreterConfig::default());
        it.run_batch("Set x to 5\nSet zero to 0");
        let result = it.run_instruction("If x is greater than 3, set y to x divided by zero");
        assert_eq!(result.kind, Some(ErrorKind::DivisionByZero));
        assert!(result.message.starts_with("then branch: "));
    }

    #[test]
    fn try_stores_the_failure_and_runs_the_handler() {
        let mut it = Interpreter::new(InterpreterConfig::default());
        let result = it.run_instruction("Try to get ghost, otherwise set recovered to true");
        assert!(result.is_success());
        assert_eq!(it.variable("recovered"), Some(Value::Bool(true)));
        assert_eq!(
            it.variable("_exception"),
            Some(Value::Str("variable 'ghost' is not defined".into()))
        );
    }
}
