use crate::ast::prelude::{ArithmeticOp, FunctionCall, Operation, Path, VariableOp};
use crate::interpreter::prelude::{Interpreter, Outcome, RuntimeError, Value};
use crate::traits::prelude::{
    ContainerOperations, ControlFlow, ExpressionEvaluator, FacilityDispatch, InterpreterClasses,
    InterpreterFunctions, OperationExecutor, ValueOperations,
};

impl OperationExecutor for Interpreter {
    fn execute_operation(&mut self, operation: &Operation) -> Result<Outcome, RuntimeError> {
        tracing::debug!(kind = %operation.kind(), "executing operation");
        match operation {
            Operation::VariableManagement(op) => self.execute_variable_op(op),
            Operation::Arithmetic(op) => self.execute_arithmetic(op),
            Operation::ControlStructure(control) => self.execute_control(control),
            Operation::Loop(op) => self.execute_loop(op),
            Operation::FunctionDefinition(definition) => {
                let function = self.define_function(definition);
                Ok(Outcome::with_data(
                    format!("defined function '{}'", function.name),
                    Value::Function(function),
                ))
            }
            Operation::FunctionCall(call) => self.execute_call(call),
            Operation::ListOp(op) => self.execute_list_op(op),
            Operation::DictOp(op) => self.execute_dict_op(op),
            Operation::StackOp(op) => self.execute_stack_op(op),
            Operation::QueueOp(op) => self.execute_queue_op(op),
            Operation::ClassOp(op) => self.execute_class_op(op),
            Operation::ObjectOp(op) => self.execute_object_op(op),
            Operation::InheritanceOp(op) => self.execute_inheritance(op),
            Operation::InterfaceOp(op) => self.execute_interface_op(op),
            Operation::External(request) => self.execute_external(request),
        }
    }

    fn execute_variable_op(&mut self, op: &VariableOp) -> Result<Outcome, RuntimeError> {
        match op {
            VariableOp::Create { name, value } => {
                let value = self.evaluate_expression(value, &self.environment)?;
                self.assign(name, value.clone())?;
                Ok(Outcome::with_data(
                    format!("created variable '{}' = {}", name, value),
                    value,
                ))
            }
            VariableOp::Set { name, value } => {
                let value = self.evaluate_expression(value, &self.environment)?;
                self.assign(name, value.clone())?;
                Ok(Outcome::with_data(format!("set '{}' to {}", name, value), value))
            }
            VariableOp::Get { name } => {
                let value = self.lookup(name)?;
                Ok(Outcome::with_data(format!("{} = {}", name, value), value))
            }
            VariableOp::Delete { name } => {
                self.remove(name)?;
                Ok(Outcome::message(format!("deleted '{}'", name)))
            }
            VariableOp::Display { value } => {
                let value = self.evaluate_expression(value, &self.environment)?;
                Ok(Outcome::with_data(value.to_string(), value))
            }
            VariableOp::BindFunction { name, function } => {
                let function = self.lookup_function(function)?;
                self.assign(name, Value::Function(function.clone()))?;
                Ok(Outcome::with_data(
                    format!("bound '{}' to function '{}'", name, function.name),
                    Value::Function(function),
                ))
            }
        }
    }

    /// Both operands must already be variables; a missing one is reported
    /// as an undefined operand rather than an undefined variable.
    fn execute_arithmetic(&mut self, op: &ArithmeticOp) -> Result<Outcome, RuntimeError> {
        let operand = |path: &Path| {
            self.lookup(path).map_err(|error| match error {
                RuntimeError::UndefinedVariable(_) => RuntimeError::UndefinedOperand(path.to_string()),
                other => other,
            })
        };
        let left = operand(&op.left)?;
        let right = operand(&op.right)?;
        let result = self.apply_operator(op.op, left, right)?;

        self.assign(&op.target, result.clone())?;
        Ok(Outcome::with_data(format!("{} = {}", op.target, result), result))
    }
}

impl Interpreter {
    fn execute_call(&mut self, call: &FunctionCall) -> Result<Outcome, RuntimeError> {
        let arguments = call
            .arguments
            .iter()
            .map(|argument| self.resolve_operand(argument, &self.environment))
            .collect::<Result<Vec<_>, _>>()?;
        let result = self.call_function(&call.name, arguments)?;
        let message = self.store_result(call.target.as_ref(), &result)?;

        Ok(Outcome::with_data(
            format!("{} returned {}{}", call.name, result, message),
            result,
        ))
    }

    /// Stores `value` under `target` when one was given and returns a
    /// message suffix describing where it went.
    pub(crate) fn store_result(
        &self,
        target: Option<&Path>,
        value: &Value,
    ) -> Result<String, RuntimeError> {
        match target {
            Some(path) => {
                self.assign(path, value.clone())?;
                Ok(format!(" (stored in '{}')", path))
            }
            None => Ok(String::new()),
        }
    }
}
