use crate::ast::prelude::*;
use crate::parser::expression::{build_comparator, build_operator, parse_expression, parse_value};
use crate::parser::literal::{build_literal, build_operand, build_operands, try_literal};
use crate::parser::prelude::{InstructionParser, ParseError};
use crate::parser::utils::{
    ident_of, idents_of, invalid, keyword, path_of, resource_text, Parts,
};
use pest::error::{ErrorVariant, InputLocation};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "parser/grammar.pest"]
pub(crate) struct SentenceParser;

const DEFAULT_MAX_DEPTH: usize = 16;

impl Default for InstructionParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InstructionParser {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn parse(&self, text: &str) -> Result<Operation, ParseError> {
        self.parse_at_depth(text, 0)
    }

    fn parse_at_depth(&self, text: &str, depth: usize) -> Result<Operation, ParseError> {
        let lead = text.len() - text.trim_start().len();
        let sentence = text.trim().trim_end_matches('.').trim_end();

        if sentence.is_empty() {
            return Err(ParseError::UnrecognizedInstruction(ErrorData::new(
                Span::whole(text),
                "empty instruction".into(),
            )));
        }
        if depth > self.max_depth {
            return Err(invalid(
                Span::whole(sentence),
                format!("actions are nested more than {} levels deep", self.max_depth),
            )
            .shifted(lead));
        }

        let mut pairs = SentenceParser::parse(Rule::instruction, sentence).map_err(|e| {
            let message = match e.variant {
                ErrorVariant::ParsingError { .. } => {
                    format!("no instruction pattern matches \"{}\"", sentence)
                }
                ErrorVariant::CustomError { message } => message,
            };
            let (start, end) = match e.location {
                InputLocation::Pos(pos) => (pos, pos),
                InputLocation::Span((start, end)) => (start, end),
            };
            ParseError::UnrecognizedInstruction(ErrorData::new(Span::new(start, end), message))
                .shifted(lead)
        })?;

        let statement = pairs
            .next()
            .and_then(|instruction| {
                instruction
                    .into_inner()
                    .find(|pair| pair.as_rule() != Rule::EOI)
            })
            .ok_or_else(|| invalid(Span::whole(sentence), "expected an instruction".into()))
            .map_err(|e| e.shifted(lead))?;

        self.build_operation(statement, depth)
            .map_err(|e| e.shifted(lead))
    }

    /// Re-parses a captured action (`then_action`, `body_action`, ...) as a
    /// full instruction, reporting errors against the enclosing sentence.
    fn nested(&self, action: Pair<Rule>, depth: usize) -> Result<Box<Operation>, ParseError> {
        let offset = action.as_span().start();
        self.parse_at_depth(action.as_str(), depth + 1)
            .map(Box::new)
            .map_err(|e| e.shifted(offset))
    }

    fn body_expression(&self, body: Pair<Rule>) -> Result<(Expr, String), ParseError> {
        let offset = body.as_span().start();
        let source = body.as_str().trim().to_string();
        let expr = parse_expression(body.as_str()).map_err(|e| e.shifted(offset))?;
        Ok((expr, source))
    }

    fn build_operation(&self, pair: Pair<Rule>, depth: usize) -> Result<Operation, ParseError> {
        let span: Span = pair.as_span().into();
        let rule = pair.as_rule();
        let mut parts = Parts::of(pair);

        let operation = match rule {
            Rule::try_stmt => {
                let body = self.nested(parts.require(Rule::then_action, "an action")?, depth)?;
                let handler = parts
                    .take(Rule::else_action)
                    .map(|action| self.nested(action, depth))
                    .transpose()?;
                Operation::ControlStructure(ControlStructure::Try { body, handler })
            }
            Rule::if_stmt => {
                let condition = build_condition(parts.require(Rule::condition, "a condition")?)?;
                let then_branch =
                    self.nested(parts.require(Rule::then_action, "an action")?, depth)?;
                let else_branch = parts
                    .take(Rule::else_action)
                    .map(|action| self.nested(action, depth))
                    .transpose()?;
                Operation::ControlStructure(ControlStructure::If {
                    condition,
                    then_branch,
                    else_branch,
                })
            }
            Rule::while_stmt => {
                let condition = build_condition(parts.require(Rule::condition, "a condition")?)?;
                let body = self.nested(parts.require(Rule::body_action, "an action")?, depth)?;
                Operation::ControlStructure(ControlStructure::While { condition, body })
            }
            Rule::for_each_stmt => Operation::Loop(LoopOp::ForEach {
                variable: ident_of(parts.require(Rule::var_name, "a loop variable")?)?,
                list: path_of(parts.require(Rule::name, "a list")?)?,
                body: self.nested(parts.require(Rule::body_action, "an action")?, depth)?,
            }),
            Rule::for_range_stmt => Operation::Loop(LoopOp::Range {
                variable: ident_of(parts.require(Rule::var_name, "a loop variable")?)?,
                start: build_operand(parts.require(Rule::operand, "a start value")?)?,
                end: build_operand(parts.require(Rule::operand, "an end value")?)?,
                body: self.nested(parts.require(Rule::body_action, "an action")?, depth)?,
            }),
            Rule::repeat_stmt => Operation::Loop(LoopOp::Repeat {
                count: build_operand(parts.require(Rule::operand, "a count")?)?,
                body: self.nested(parts.require(Rule::body_action, "an action")?, depth)?,
            }),

            Rule::function_def => {
                let name = ident_of(parts.require(Rule::var_name, "a function name")?)?;
                let params = parts
                    .take(Rule::param_list)
                    .map(idents_of)
                    .transpose()?
                    .unwrap_or_default();
                let (body, source) =
                    self.body_expression(parts.require(Rule::body_text, "a return expression")?)?;
                Operation::FunctionDefinition(FunctionDefinition {
                    name,
                    params,
                    body,
                    source,
                })
            }
            Rule::method_call => Operation::ObjectOp(ObjectOp::CallMethod {
                method: ident_of(parts.require(Rule::var_name, "a method name")?)?,
                object: path_of(parts.require(Rule::name, "an object")?)?,
                arguments: arguments(&mut parts)?,
                target: target(&mut parts)?,
            }),
            Rule::function_call => Operation::FunctionCall(FunctionCall {
                name: ident_of(parts.require(Rule::var_name, "a function name")?)?,
                arguments: arguments(&mut parts)?,
                target: target(&mut parts)?,
            }),

            Rule::list_create => Operation::ListOp(ListOp::Create {
                name: container(&mut parts)?,
                initial: parts.take(Rule::literal).map(build_literal).transpose()?,
            }),
            Rule::list_append => Operation::ListOp(ListOp::Append {
                name: container(&mut parts)?,
                item: item(&mut parts)?,
            }),
            Rule::list_remove => Operation::ListOp(ListOp::Remove {
                name: container(&mut parts)?,
                item: item(&mut parts)?,
            }),
            Rule::list_get => Operation::ListOp(ListOp::Get {
                name: container(&mut parts)?,
                index: build_operand(parts.require(Rule::operand, "an index")?)?,
                target: target(&mut parts)?,
            }),
            Rule::list_length => Operation::ListOp(ListOp::Length {
                name: container(&mut parts)?,
            }),
            Rule::list_sort => Operation::ListOp(ListOp::Sort {
                name: container(&mut parts)?,
                descending: parts.has(Rule::descending),
            }),
            Rule::list_search => Operation::ListOp(ListOp::Search {
                name: container(&mut parts)?,
                item: item(&mut parts)?,
            }),

            Rule::dict_create => Operation::DictOp(DictOp::Create {
                name: container(&mut parts)?,
            }),
            Rule::dict_set => Operation::DictOp(DictOp::Set {
                name: container(&mut parts)?,
                key: dict_key(&mut parts)?,
                value: item(&mut parts)?,
            }),
            Rule::dict_get => Operation::DictOp(DictOp::Get {
                name: container(&mut parts)?,
                key: dict_key(&mut parts)?,
                target: target(&mut parts)?,
            }),
            Rule::dict_remove => Operation::DictOp(DictOp::Remove {
                name: container(&mut parts)?,
                key: dict_key(&mut parts)?,
            }),
            Rule::dict_keys => Operation::DictOp(DictOp::Keys {
                name: container(&mut parts)?,
            }),

            Rule::stack_create => Operation::StackOp(StackOp::Create {
                name: container(&mut parts)?,
            }),
            Rule::stack_push => Operation::StackOp(StackOp::Push {
                name: container(&mut parts)?,
                item: item(&mut parts)?,
            }),
            Rule::stack_pop => Operation::StackOp(StackOp::Pop {
                name: container(&mut parts)?,
                target: target(&mut parts)?,
            }),
            Rule::stack_peek => Operation::StackOp(StackOp::Peek {
                name: container(&mut parts)?,
                target: target(&mut parts)?,
            }),

            Rule::queue_create => Operation::QueueOp(QueueOp::Create {
                name: container(&mut parts)?,
            }),
            Rule::queue_enqueue => Operation::QueueOp(QueueOp::Enqueue {
                name: container(&mut parts)?,
                item: item(&mut parts)?,
            }),
            Rule::queue_dequeue => Operation::QueueOp(QueueOp::Dequeue {
                name: container(&mut parts)?,
                target: target(&mut parts)?,
            }),
            Rule::queue_peek => Operation::QueueOp(QueueOp::Peek {
                name: container(&mut parts)?,
                target: target(&mut parts)?,
            }),

            Rule::class_create => Operation::ClassOp(ClassOp::Create {
                name: ident_of(parts.require(Rule::var_name, "a class name")?)?,
                attributes: parts
                    .take(Rule::attribute_list)
                    .map(idents_of)
                    .transpose()?
                    .unwrap_or_default(),
                superclass: parts.take(Rule::superclass).map(ident_of).transpose()?,
            }),
            Rule::class_add_attribute => Operation::ClassOp(ClassOp::AddAttribute {
                attribute: ident_of(parts.require(Rule::var_name, "an attribute name")?)?,
                default: parts
                    .take(Rule::literal)
                    .map(build_literal)
                    .transpose()?
                    .unwrap_or(Literal::Null),
                class: class_name(&mut parts)?,
            }),
            Rule::class_add_method => {
                let method = ident_of(parts.require(Rule::var_name, "a method name")?)?;
                let class = class_name(&mut parts)?;
                let params = parts
                    .take(Rule::param_list)
                    .map(idents_of)
                    .transpose()?
                    .unwrap_or_default();
                let (body, source) = match parts.take(Rule::body_text) {
                    Some(body) => self.body_expression(body)?,
                    None => (Expr::Literal(Literal::Null), String::new()),
                };
                Operation::ClassOp(ClassOp::AddMethod {
                    class,
                    method,
                    params,
                    body,
                    source,
                })
            }

            Rule::object_create => Operation::ObjectOp(ObjectOp::Create {
                name: container(&mut parts)?,
                class: class_name(&mut parts)?,
            }),
            Rule::object_set_attribute => Operation::ObjectOp(ObjectOp::SetAttribute {
                attribute: ident_of(parts.require(Rule::var_name, "an attribute name")?)?,
                object: path_of(parts.require(Rule::name, "an object")?)?,
                value: item(&mut parts)?,
            }),
            Rule::object_get_attribute => Operation::ObjectOp(ObjectOp::GetAttribute {
                attribute: ident_of(parts.require(Rule::var_name, "an attribute name")?)?,
                object: path_of(parts.require(Rule::name, "an object")?)?,
                target: target(&mut parts)?,
            }),

            Rule::inheritance_stmt => Operation::InheritanceOp(InheritanceOp {
                class: class_name(&mut parts)?,
                superclass: ident_of(parts.require(Rule::superclass, "a superclass")?)?,
            }),
            Rule::interface_create => Operation::InterfaceOp(InterfaceOp::Create {
                name: ident_of(parts.require(Rule::var_name, "an interface name")?)?,
                methods: parts
                    .take(Rule::method_list)
                    .map(idents_of)
                    .transpose()?
                    .unwrap_or_default(),
            }),
            Rule::interface_implement => Operation::InterfaceOp(InterfaceOp::Implement {
                interface: ident_of(parts.require(Rule::interface_ref, "an interface")?)?,
                class: class_name(&mut parts)?,
            }),

            Rule::file_read => external(&mut parts, Facility::Io, "read".into())?,
            Rule::file_write => external(&mut parts, Facility::Io, "write".into())?,
            Rule::file_open => {
                let verb = keyword(&parts.require(Rule::file_verb, "open or close")?);
                external(&mut parts, Facility::Io, verb)?
            }
            Rule::file_list => external(&mut parts, Facility::Io, "list".into())?,
            Rule::process_stmt => {
                let verb = parts
                    .take(Rule::process_verb)
                    .map(|verb| keyword(&verb))
                    .unwrap_or_else(|| "list".into());
                external(&mut parts, Facility::Process, verb)?
            }
            Rule::network_stmt => {
                let verb = keyword(&parts.require(Rule::http_verb, "an HTTP verb")?).to_uppercase();
                external(&mut parts, Facility::Network, verb)?
            }
            Rule::command_stmt => {
                let command = parts.require(Rule::command_text, "a command")?;
                let command = match try_literal(command.as_str()) {
                    Some(Literal::Str(text)) => text,
                    _ => command.as_str().trim().to_string(),
                };
                Operation::External(ExternalRequest {
                    facility: Facility::SystemCommand,
                    action: "run".into(),
                    target: command,
                    payload: None,
                    store: None,
                })
            }

            Rule::arithmetic_stmt => {
                let target = path_of(parts.require(Rule::target, "a result variable")?)?;
                let left = path_of(parts.require(Rule::name, "a left operand")?)?;
                let op = parts.require(Rule::arith_op, "an operator")?;
                let op = build_operator(&op)?;
                let right = path_of(parts.require(Rule::name, "a right operand")?)?;
                Operation::Arithmetic(ArithmeticOp {
                    target,
                    left,
                    op,
                    right,
                })
            }
            Rule::accumulate_add
            | Rule::accumulate_sub
            | Rule::accumulate_mul
            | Rule::accumulate_div => {
                let first = path_of(parts.require(Rule::name, "an operand")?)?;
                let second = path_of(parts.require(Rule::name, "an operand")?)?;
                // `add i to sum` and `subtract i from sum` update the second name;
                // `multiply x by y` and `divide x by y` update the first.
                let (target, right, op) = match rule {
                    Rule::accumulate_add => (second, first, BinaryOperator::Add),
                    Rule::accumulate_sub => (second, first, BinaryOperator::Sub),
                    Rule::accumulate_mul => (first, second, BinaryOperator::Mul),
                    _ => (first, second, BinaryOperator::Div),
                };
                Operation::Arithmetic(ArithmeticOp {
                    left: target.clone(),
                    target,
                    op,
                    right,
                })
            }

            Rule::bind_function => Operation::VariableManagement(VariableOp::BindFunction {
                name: path_of(parts.require(Rule::target, "a variable")?)?,
                function: ident_of(parts.require(Rule::var_name, "a function name")?)?,
            }),
            Rule::create_var => Operation::VariableManagement(VariableOp::Create {
                name: path_of(parts.require(Rule::target, "a variable name")?)?,
                value: parts
                    .take(Rule::value_text)
                    .map(|value| parse_value(value.as_str()))
                    .unwrap_or(Expr::Literal(Literal::Null)),
            }),
            Rule::set_var => Operation::VariableManagement(VariableOp::Set {
                name: path_of(parts.require(Rule::target, "a variable name")?)?,
                value: parse_value(parts.require(Rule::value_text, "a value")?.as_str()),
            }),
            Rule::get_var => Operation::VariableManagement(VariableOp::Get {
                name: path_of(parts.require(Rule::name, "a variable name")?)?,
            }),
            Rule::delete_var => Operation::VariableManagement(VariableOp::Delete {
                name: path_of(parts.require(Rule::name, "a variable name")?)?,
            }),
            Rule::display => Operation::VariableManagement(VariableOp::Display {
                value: parse_value(parts.require(Rule::value_text, "a value")?.as_str()),
            }),

            _ => return Err(invalid(span, format!("unsupported instruction form {:?}", rule))),
        };

        tracing::trace!(kind = %operation.kind(), "built operation");
        Ok(operation)
    }
}

fn build_condition(pair: Pair<Rule>) -> Result<Condition, ParseError> {
    let mut parts = Parts::of(pair);
    let subject = path_of(parts.require(Rule::name, "a variable")?)?;
    let comparator = match parts.take(Rule::comparator) {
        Some(comparator) => build_comparator(comparator)?,
        None => {
            parts.require(Rule::is_eq, "a comparison")?;
            BinaryOperator::Eq
        }
    };
    let value = build_literal(parts.require(Rule::cond_value, "a value to compare with")?)?;
    Ok(Condition {
        subject,
        comparator,
        value,
    })
}

fn container(parts: &mut Parts) -> Result<Path, ParseError> {
    path_of(parts.require(Rule::name, "a name")?)
}

fn item(parts: &mut Parts) -> Result<Operand, ParseError> {
    build_operand(parts.require(Rule::operand, "a value")?)
}

fn target(parts: &mut Parts) -> Result<Option<Path>, ParseError> {
    parts.take(Rule::target).map(path_of).transpose()
}

fn arguments(parts: &mut Parts) -> Result<Vec<Operand>, ParseError> {
    Ok(parts
        .take(Rule::arg_list)
        .map(build_operands)
        .transpose()?
        .unwrap_or_default())
}

fn class_name(parts: &mut Parts) -> Result<String, ParseError> {
    ident_of(parts.require(Rule::class_ref, "a class name")?)
}

fn dict_key(parts: &mut Parts) -> Result<String, ParseError> {
    let key = parts.require(Rule::dict_key, "a key")?;
    match build_literal(key)? {
        Literal::Str(text) => Ok(text),
        other => Ok(format!("{:?}", other)),
    }
}

fn external(parts: &mut Parts, facility: Facility, action: String) -> Result<Operation, ParseError> {
    Ok(Operation::External(ExternalRequest {
        facility,
        action,
        target: parts.take(Rule::resource).map(resource_text).unwrap_or_default(),
        payload: parts.take(Rule::operand).map(build_operand).transpose()?,
        store: target(parts)?,
    }))
}
