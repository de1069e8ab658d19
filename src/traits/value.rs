use crate::ast::prelude::BinaryOperator;
use crate::interpreter::prelude::{RuntimeError, Value};
use std::cmp::Ordering;

pub trait ValueOperations {
    fn add_values(&self, left: Value, right: Value) -> Result<Value, RuntimeError>;
    fn subtract_values(&self, left: Value, right: Value) -> Result<Value, RuntimeError>;
    fn multiply_values(&self, left: Value, right: Value) -> Result<Value, RuntimeError>;
    fn divide_values(&self, left: Value, right: Value) -> Result<Value, RuntimeError>;
    fn modulo_values(&self, left: Value, right: Value) -> Result<Value, RuntimeError>;
    fn negate_value(&self, value: Value) -> Result<Value, RuntimeError>;
    fn order_values(&self, left: &Value, right: &Value) -> Result<Ordering, RuntimeError>;
    fn compare_values(
        &self,
        op: BinaryOperator,
        left: &Value,
        right: &Value,
    ) -> Result<bool, RuntimeError>;
    fn apply_operator(
        &self,
        op: BinaryOperator,
        left: Value,
        right: Value,
    ) -> Result<Value, RuntimeError>;
}
