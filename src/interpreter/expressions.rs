use crate::ast::prelude::{Condition, Expr, Operand, UnaryOperator};
use crate::interpreter::prelude::{Environment, Interpreter, RuntimeError, Value};
use crate::shared::SharedMut;
use crate::traits::prelude::{ExpressionEvaluator, ValueOperations};

impl ExpressionEvaluator for Interpreter {
    fn evaluate_expression(
        &self,
        expr: &Expr,
        scope: &SharedMut<Environment>,
    ) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(literal) => Ok(Value::from_literal(literal)),
            Expr::Variable(path) => self.lookup_in(scope, path),
            Expr::Name(path) => match self.lookup_in(scope, path) {
                Err(RuntimeError::UndefinedVariable(_)) => Ok(Value::Str(path.to_string())),
                resolved => resolved,
            },
            Expr::Unary {
                op: UnaryOperator::Negative,
                operand,
            } => {
                let value = self.evaluate_expression(operand, scope)?;
                self.negate_value(value)
            }
            Expr::Binary { op, left, right } => {
                let left = self.evaluate_expression(left, scope)?;
                let right = self.evaluate_expression(right, scope)?;
                self.apply_operator(*op, left, right)
            }
        }
    }

    fn resolve_operand(
        &self,
        operand: &Operand,
        scope: &SharedMut<Environment>,
    ) -> Result<Value, RuntimeError> {
        match operand {
            Operand::Literal(literal) => Ok(Value::from_literal(literal)),
            Operand::Variable(path) => self.lookup_in(scope, path),
        }
    }

    /// `subject comparator literal`, re-read from the environment on every
    /// call so `while` sees the effect of its own body.
    fn evaluate_condition(&self, condition: &Condition) -> Result<bool, RuntimeError> {
        let subject = self.lookup(&condition.subject)?;
        let value = Value::from_literal(&condition.value);
        self.compare_values(condition.comparator, &subject, &value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::prelude::{BinaryOperator, Literal, Path};
    use crate::interpreter::prelude::InterpreterConfig;
    use crate::parser::prelude::parse_expression;
    use crate::traits::prelude::CoreOperations;

    fn evaluate(it: &Interpreter, text: &str) -> Result<Value, RuntimeError> {
        let expr = parse_expression(text).unwrap();
        it.evaluate_expression(&expr, &it.environment)
    }

    #[test]
    fn arithmetic_over_variables() {
        let it = Interpreter::new(InterpreterConfig::default());
        it.assign(&Path::simple("a"), Value::Int(10)).unwrap();
        it.assign(&Path::simple("b"), Value::Int(3)).unwrap();

        assert_eq!(evaluate(&it, "'a' plus 'b' * 2").unwrap(), Value::Int(16));
        assert_eq!(evaluate(&it, "-a + 1").unwrap(), Value::Int(-9));
        assert_eq!(evaluate(&it, "a greater than b").unwrap(), Value::Bool(true));
        assert_eq!(
            evaluate(&it, "missing plus 1"),
            Err(RuntimeError::UndefinedVariable("missing".into()))
        );
    }

    #[test]
    fn conditions_compare_against_literals() {
        let it = Interpreter::new(InterpreterConfig::default());
        it.assign(&Path::simple("x"), Value::Int(5)).unwrap();
        let condition = Condition {
            subject: Path::simple("x"),
            comparator: BinaryOperator::Gt,
            value: Literal::Int(3),
        };
        assert!(it.evaluate_condition(&condition).unwrap());
    }
}
