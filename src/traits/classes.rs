use crate::ast::prelude::{ClassOp, InheritanceOp, InterfaceOp, ObjectOp};
use crate::interpreter::prelude::{
    ClassDescriptor, FunctionDescriptor, ObjectInstance, Outcome, RuntimeError, Value,
};
use crate::shared::SharedMut;
use std::collections::BTreeSet;
use std::sync::Arc;

pub trait InterpreterClasses {
    fn lookup_class(&self, name: &str) -> Result<SharedMut<ClassDescriptor>, RuntimeError>;
    /// The class followed by its superclasses, nearest first.
    fn class_chain(&self, name: &str) -> Result<Vec<SharedMut<ClassDescriptor>>, RuntimeError>;
    fn resolve_method(
        &self,
        class: &str,
        method: &str,
    ) -> Result<Arc<FunctionDescriptor>, RuntimeError>;
    fn resolved_methods(&self, class: &str) -> Result<BTreeSet<String>, RuntimeError>;
    fn attribute_of(
        &self,
        object: &SharedMut<ObjectInstance>,
        attribute: &str,
    ) -> Result<Value, RuntimeError>;
    fn call_method(
        &self,
        object: &SharedMut<ObjectInstance>,
        method: &str,
        arguments: Vec<Value>,
    ) -> Result<Value, RuntimeError>;

    fn execute_class_op(&mut self, op: &ClassOp) -> Result<Outcome, RuntimeError>;
    fn execute_object_op(&mut self, op: &ObjectOp) -> Result<Outcome, RuntimeError>;
    fn execute_inheritance(&mut self, op: &InheritanceOp) -> Result<Outcome, RuntimeError>;
    fn execute_interface_op(&mut self, op: &InterfaceOp) -> Result<Outcome, RuntimeError>;
}
