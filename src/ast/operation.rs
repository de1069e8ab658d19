use crate::ast::prelude::{BinaryOperator, Expr, Literal, Operand, Path};
use std::fmt;

/// One parsed instruction. Control structures and loops own their nested
/// actions, so a sentence becomes a tree rather than a flat command.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    VariableManagement(VariableOp),
    Arithmetic(ArithmeticOp),
    ControlStructure(ControlStructure),
    Loop(LoopOp),
    FunctionDefinition(FunctionDefinition),
    FunctionCall(FunctionCall),
    ListOp(ListOp),
    DictOp(DictOp),
    StackOp(StackOp),
    QueueOp(QueueOp),
    ClassOp(ClassOp),
    ObjectOp(ObjectOp),
    InheritanceOp(InheritanceOp),
    InterfaceOp(InterfaceOp),
    External(ExternalRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    VariableManagement,
    Arithmetic,
    ControlStructure,
    Loop,
    FunctionDefinition,
    FunctionCall,
    ListOp,
    DictOp,
    StackOp,
    QueueOp,
    ClassOp,
    ObjectOp,
    InheritanceOp,
    InterfaceOp,
    External,
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::VariableManagement(_) => OperationKind::VariableManagement,
            Operation::Arithmetic(_) => OperationKind::Arithmetic,
            Operation::ControlStructure(_) => OperationKind::ControlStructure,
            Operation::Loop(_) => OperationKind::Loop,
            Operation::FunctionDefinition(_) => OperationKind::FunctionDefinition,
            Operation::FunctionCall(_) => OperationKind::FunctionCall,
            Operation::ListOp(_) => OperationKind::ListOp,
            Operation::DictOp(_) => OperationKind::DictOp,
            Operation::StackOp(_) => OperationKind::StackOp,
            Operation::QueueOp(_) => OperationKind::QueueOp,
            Operation::ClassOp(_) => OperationKind::ClassOp,
            Operation::ObjectOp(_) => OperationKind::ObjectOp,
            Operation::InheritanceOp(_) => OperationKind::InheritanceOp,
            Operation::InterfaceOp(_) => OperationKind::InterfaceOp,
            Operation::External(_) => OperationKind::External,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VariableOp {
    Create { name: Path, value: Expr },
    Set { name: Path, value: Expr },
    Get { name: Path },
    Delete { name: Path },
    Display { value: Expr },
    BindFunction { name: Path, function: String },
}

/// `Set c to a plus b` and the accumulation forms (`add i to sum`).
/// Both operands name existing variables.
#[derive(Debug, Clone, PartialEq)]
pub struct ArithmeticOp {
    pub target: Path,
    pub left: Path,
    pub op: BinaryOperator,
    pub right: Path,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub subject: Path,
    pub comparator: BinaryOperator,
    pub value: Literal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControlStructure {
    If {
        condition: Condition,
        then_branch: Box<Operation>,
        else_branch: Option<Box<Operation>>,
    },
    While {
        condition: Condition,
        body: Box<Operation>,
    },
    Try {
        body: Box<Operation>,
        handler: Option<Box<Operation>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoopOp {
    Range {
        variable: String,
        start: Operand,
        end: Operand,
        body: Box<Operation>,
    },
    Repeat {
        count: Operand,
        body: Box<Operation>,
    },
    ForEach {
        variable: String,
        list: Path,
        body: Box<Operation>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub name: String,
    pub params: Vec<String>,
    pub body: Expr,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: Vec<Operand>,
    pub target: Option<Path>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListOp {
    Create {
        name: Path,
        initial: Option<Literal>,
    },
    Append {
        name: Path,
        item: Operand,
    },
    Remove {
        name: Path,
        item: Operand,
    },
    Get {
        name: Path,
        index: Operand,
        target: Option<Path>,
    },
    Length {
        name: Path,
    },
    Sort {
        name: Path,
        descending: bool,
    },
    Search {
        name: Path,
        item: Operand,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DictOp {
    Create {
        name: Path,
    },
    Set {
        name: Path,
        key: String,
        value: Operand,
    },
    Get {
        name: Path,
        key: String,
        target: Option<Path>,
    },
    Remove {
        name: Path,
        key: String,
    },
    Keys {
        name: Path,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum StackOp {
    Create { name: Path },
    Push { name: Path, item: Operand },
    Pop { name: Path, target: Option<Path> },
    Peek { name: Path, target: Option<Path> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueueOp {
    Create { name: Path },
    Enqueue { name: Path, item: Operand },
    Dequeue { name: Path, target: Option<Path> },
    Peek { name: Path, target: Option<Path> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassOp {
    Create {
        name: String,
        attributes: Vec<String>,
        superclass: Option<String>,
    },
    AddAttribute {
        class: String,
        attribute: String,
        default: Literal,
    },
    AddMethod {
        class: String,
        method: String,
        params: Vec<String>,
        body: Expr,
        source: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectOp {
    Create {
        name: Path,
        class: String,
    },
    SetAttribute {
        object: Path,
        attribute: String,
        value: Operand,
    },
    GetAttribute {
        object: Path,
        attribute: String,
        target: Option<Path>,
    },
    CallMethod {
        object: Path,
        method: String,
        arguments: Vec<Operand>,
        target: Option<Path>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct InheritanceOp {
    pub class: String,
    pub superclass: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InterfaceOp {
    Create { name: String, methods: Vec<String> },
    Implement { interface: String, class: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facility {
    Io,
    Process,
    Network,
    SystemCommand,
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Facility::Io => "io",
            Facility::Process => "process",
            Facility::Network => "network",
            Facility::SystemCommand => "system command",
        };
        f.write_str(name)
    }
}

/// Side effect handed to an installed collaborator as (action, target, payload).
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalRequest {
    pub facility: Facility,
    pub action: String,
    pub target: String,
    pub payload: Option<Operand>,
    pub store: Option<Path>,
}
