use crate::ast::prelude::{Expr, Literal};
use crate::interpreter::config::InterpreterConfig;
use crate::parser::prelude::InstructionParser;
use crate::shared::SharedMut;
use crate::traits::prelude::{
    CancellationCheck, IOFacility, IntentRecognizer, NetworkFacility, ProcessFacility,
    SystemCommandFacility,
};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use std::time::Instant;
use string_interner::{DefaultStringInterner, DefaultSymbol as Symbol};

/// Runtime value. Containers, classes and objects are reference-shared:
/// binding one to a second name aliases it rather than copying it.
#[derive(Clone, Debug)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    List(SharedMut<Vec<Value>>),
    Map(SharedMut<BTreeMap<String, Value>>),
    Stack(SharedMut<Vec<Value>>),
    Queue(SharedMut<VecDeque<Value>>),
    Function(Arc<FunctionDescriptor>),
    Class(SharedMut<ClassDescriptor>),
    Object(SharedMut<ObjectInstance>),
    Interface(Arc<InterfaceDescriptor>),
    Null,
}

/// A named function or method: ordered parameters and a body expression
/// evaluated against a call-local scope.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDescriptor {
    pub name: String,
    pub params: Vec<String>,
    pub body: Expr,
    pub source: String,
}

#[derive(Clone, Debug)]
pub struct ClassDescriptor {
    pub name: String,
    /// Declared attributes with their defaults, in declaration order.
    pub attributes: Vec<(String, Literal)>,
    pub methods: HashMap<String, Arc<FunctionDescriptor>>,
    pub superclass: Option<String>,
}

/// An instance keeps the class it was created from, so rebinding the class
/// name later does not change existing objects.
#[derive(Clone, Debug)]
pub struct ObjectInstance {
    pub class: SharedMut<ClassDescriptor>,
    pub attributes: BTreeMap<String, Value>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InterfaceDescriptor {
    pub name: String,
    pub methods: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct Environment {
    pub(crate) variables: HashMap<Symbol, Value>,
    pub(crate) parent: Option<SharedMut<Environment>>,
}

#[derive(Clone, Debug, Default)]
pub struct FunctionRegistry {
    pub(crate) functions: HashMap<Symbol, Arc<FunctionDescriptor>>,
}

pub type SharedInterner = SharedMut<DefaultStringInterner>;

/// Collaborators that perform real side effects. Each is optional; a
/// request for a missing one fails with `FacilityUnavailable`.
#[derive(Default)]
pub struct Facilities {
    pub io: Option<Box<dyn IOFacility>>,
    pub process: Option<Box<dyn ProcessFacility>>,
    pub network: Option<Box<dyn NetworkFacility>>,
    pub system: Option<Box<dyn SystemCommandFacility>>,
}

/// One interpreter session: a single global environment, the function
/// registry and the installed collaborators.
pub struct Interpreter {
    pub(crate) interner: SharedInterner,
    pub(crate) environment: SharedMut<Environment>,
    pub(crate) functions: FunctionRegistry,
    pub(crate) parser: InstructionParser,
    pub(crate) config: InterpreterConfig,
    pub(crate) facilities: Facilities,
    pub(crate) cancellation: Option<Arc<dyn CancellationCheck>>,
    pub(crate) intent_recognizer: Option<Box<dyn IntentRecognizer>>,
    pub(crate) deadline: Option<Instant>,
}
