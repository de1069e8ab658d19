use crate::ast::prelude::{Condition, Expr, Operand};
use crate::interpreter::prelude::{Environment, RuntimeError, Value};
use crate::shared::SharedMut;

pub trait ExpressionEvaluator {
    fn evaluate_expression(
        &self,
        expr: &Expr,
        scope: &SharedMut<Environment>,
    ) -> Result<Value, RuntimeError>;
    fn resolve_operand(
        &self,
        operand: &Operand,
        scope: &SharedMut<Environment>,
    ) -> Result<Value, RuntimeError>;
    fn evaluate_condition(&self, condition: &Condition) -> Result<bool, RuntimeError>;
}
