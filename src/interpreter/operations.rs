use crate::ast::prelude::BinaryOperator;
use crate::interpreter::prelude::{Interpreter, RuntimeError, Value};
use crate::traits::prelude::ValueOperations;
use std::cmp::Ordering;

fn mismatch(action: &str, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::TypeMismatch(format!(
        "cannot {} {} and {}",
        action,
        left.type_name(),
        right.type_name()
    ))
}

fn overflow() -> RuntimeError {
    RuntimeError::TypeMismatch("integer overflow".into())
}

/// Applies `int_op` to two ints and `float_op` to any other numeric pair.
fn numeric(
    action: &str,
    left: Value,
    right: Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, RuntimeError> {
    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => int_op(*a, *b).map(Value::Int).ok_or_else(overflow),
        _ => match (left.as_number(), right.as_number()) {
            (Some(a), Some(b)) => Ok(Value::Float(float_op(a, b))),
            _ => Err(mismatch(action, &left, &right)),
        },
    }
}

fn is_zero(value: &Value) -> bool {
    value.as_number() == Some(0.0)
}

impl ValueOperations for Interpreter {
    fn add_values(&self, left: Value, right: Value) -> Result<Value, RuntimeError> {
        match (&left, &right) {
            (Value::Str(a), b) => Ok(Value::Str(format!("{}{}", a, b))),
            (a, Value::Str(b)) => Ok(Value::Str(format!("{}{}", a, b))),
            (Value::List(a), Value::List(b)) => {
                let mut items = a.snapshot();
                items.extend(b.snapshot());
                Ok(Value::list(items))
            }
            _ => numeric("add", left, right, i64::checked_add, |a, b| a + b),
        }
    }

    fn subtract_values(&self, left: Value, right: Value) -> Result<Value, RuntimeError> {
        numeric("subtract", left, right, i64::checked_sub, |a, b| a - b)
    }

    fn multiply_values(&self, left: Value, right: Value) -> Result<Value, RuntimeError> {
        match (&left, &right) {
            (Value::Str(s), Value::Int(n)) | (Value::Int(n), Value::Str(s)) => {
                let count = usize::try_from(*n).map_err(|_| {
                    RuntimeError::TypeMismatch("cannot repeat a string a negative number of times".into())
                })?;
                let limit = self.config.max_string_length;
                match s.len().checked_mul(count) {
                    Some(length) if length <= limit => Ok(Value::Str(s.repeat(count))),
                    _ => Err(RuntimeError::TypeMismatch(format!(
                        "repeating a string {} times exceeds the {} byte limit",
                        count, limit
                    ))),
                }
            }
            _ => numeric("multiply", left, right, i64::checked_mul, |a, b| a * b),
        }
    }

    /// Exact integer quotients stay integers; anything else is a float.
    fn divide_values(&self, left: Value, right: Value) -> Result<Value, RuntimeError> {
        if left.as_number().is_some() && is_zero(&right) {
            return Err(RuntimeError::DivisionByZero);
        }
        match (&left, &right) {
            (Value::Int(a), Value::Int(b)) if a.checked_rem(*b) == Some(0) => {
                a.checked_div(*b).map(Value::Int).ok_or_else(overflow)
            }
            _ => match (left.as_number(), right.as_number()) {
                (Some(a), Some(b)) => Ok(Value::Float(a / b)),
                _ => Err(mismatch("divide", &left, &right)),
            },
        }
    }

    fn modulo_values(&self, left: Value, right: Value) -> Result<Value, RuntimeError> {
        if left.as_number().is_some() && is_zero(&right) {
            return Err(RuntimeError::DivisionByZero);
        }
        numeric("take the remainder of", left, right, i64::checked_rem_euclid, f64::rem_euclid)
    }

    fn negate_value(&self, value: Value) -> Result<Value, RuntimeError> {
        match value {
            Value::Int(n) => n.checked_neg().map(Value::Int).ok_or_else(overflow),
            Value::Float(n) => Ok(Value::Float(-n)),
            other => Err(RuntimeError::TypeMismatch(format!(
                "cannot negate {}",
                other.type_name()
            ))),
        }
    }

    fn order_values(&self, left: &Value, right: &Value) -> Result<Ordering, RuntimeError> {
        match (left, right) {
            (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
            (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Ok(a.cmp(b)),
            _ => match (left.as_number(), right.as_number()) {
                (Some(a), Some(b)) => a
                    .partial_cmp(&b)
                    .ok_or_else(|| RuntimeError::TypeMismatch("cannot order NaN".into())),
                _ => Err(mismatch("compare", left, right)),
            },
        }
    }

    fn compare_values(
        &self,
        op: BinaryOperator,
        left: &Value,
        right: &Value,
    ) -> Result<bool, RuntimeError> {
        match op {
            BinaryOperator::Eq => Ok(left == right),
            BinaryOperator::Ne => Ok(left != right),
            BinaryOperator::Lt => Ok(self.order_values(left, right)? == Ordering::Less),
            BinaryOperator::Le => Ok(self.order_values(left, right)? != Ordering::Greater),
            BinaryOperator::Gt => Ok(self.order_values(left, right)? == Ordering::Greater),
            BinaryOperator::Ge => Ok(self.order_values(left, right)? != Ordering::Less),
            other => Err(RuntimeError::TypeMismatch(format!(
                "'{}' is not a comparison",
                other
            ))),
        }
    }

    fn apply_operator(
        &self,
        op: BinaryOperator,
        left: Value,
        right: Value,
    ) -> Result<Value, RuntimeError> {
        match op {
            BinaryOperator::Add => self.add_values(left, right),
            BinaryOperator::Sub => self.subtract_values(left, right),
            BinaryOperator::Mul => self.multiply_values(left, right),
            BinaryOperator::Div => self.divide_values(left, right),
            BinaryOperator::Mod => self.modulo_values(left, right),
            comparison => self.compare_values(comparison, &left, &right).map(Value::Bool),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::prelude::InterpreterConfig;
    use crate::traits::prelude::CoreOperations;

    fn interpreter() -> Interpreter {
        Interpreter::new(InterpreterConfig::default())
    }

    #[test]
    fn integer_arithmetic_stays_integral() {
        let it = interpreter();
        assert_eq!(it.add_values(Value::Int(10), Value::Int(3)).unwrap(), Value::Int(13));
        assert_eq!(it.divide_values(Value::Int(10), Value::Int(2)).unwrap(), Value::Int(5));
        assert_eq!(it.divide_values(Value::Int(10), Value::Int(4)).unwrap(), Value::Float(2.5));
        assert_eq!(it.modulo_values(Value::Int(-7), Value::Int(3)).unwrap(), Value::Int(2));
    }

    #[test]
    fn zero_divisors_fail() {
        let it = interpreter();
        assert_eq!(
            it.divide_values(Value::Int(1), Value::Int(0)),
            Err(RuntimeError::DivisionByZero)
        );
        assert_eq!(
            it.divide_values(Value::Float(1.0), Value::Float(0.0)),
            Err(RuntimeError::DivisionByZero)
        );
        assert_eq!(
            it.modulo_values(Value::Int(1), Value::Int(0)),
            Err(RuntimeError::DivisionByZero)
        );
    }

    #[test]
    fn strings_concatenate_and_mixed_types_fail() {
        let it = interpreter();
        assert_eq!(
            it.add_values(Value::Str("n=".into()), Value::Int(3)).unwrap(),
            Value::Str("n=3".into())
        );
        assert!(matches!(
            it.subtract_values(Value::Str("a".into()), Value::Int(1)),
            Err(RuntimeError::TypeMismatch(_))
        ));
    }

    #[test]
    fn string_repetition_is_bounded() {
        let it = Interpreter::new(InterpreterConfig::default().with_max_string_length(6));
        assert_eq!(
            it.multiply_values(Value::Str("ab".into()), Value::Int(3)).unwrap(),
            Value::Str("ababab".into())
        );
        assert!(matches!(
            it.multiply_values(Value::Str("ab".into()), Value::Int(4)),
            Err(RuntimeError::TypeMismatch(_))
        ));
        assert!(matches!(
            interpreter().multiply_values(Value::Int(i64::MAX), Value::Str("ab".into())),
            Err(RuntimeError::TypeMismatch(_))
        ));
    }

    #[test]
    fn comparisons() {
        let it = interpreter();
        assert!(it.compare_values(BinaryOperator::Gt, &Value::Int(5), &Value::Float(3.5)).unwrap());
        assert!(it.compare_values(BinaryOperator::Eq, &Value::Str("a".into()), &Value::Str("a".into())).unwrap());
        assert!(it.compare_values(BinaryOperator::Lt, &Value::Str("a".into()), &Value::Int(1)).is_err());
    }
}
