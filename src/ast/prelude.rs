pub use super::expr::{Expr, Literal, Operand, Path, PathSegment};
pub use super::operation::{
    ArithmeticOp, ClassOp, Condition, ControlStructure, DictOp, ExternalRequest, Facility,
    FunctionCall, FunctionDefinition, InheritanceOp, InterfaceOp, ListOp, LoopOp, ObjectOp,
    Operation, OperationKind, QueueOp, StackOp, VariableOp,
};
pub use super::span::{ErrorData, Span};
pub use super::types::{BinaryOperator, UnaryOperator};
