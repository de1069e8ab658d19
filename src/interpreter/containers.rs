use crate::ast::prelude::{DictOp, ListOp, Literal, Operand, Path, QueueOp, StackOp};
use crate::interpreter::prelude::{Interpreter, Outcome, RuntimeError, Value};
use crate::shared::SharedMut;
use crate::traits::prelude::{ContainerOperations, ExpressionEvaluator, ValueOperations};
use std::cmp::Ordering;
use std::collections::{BTreeMap, VecDeque};

/// Looks up a container of one shape. Anything else under the name, or
/// nothing at all, counts as "no such container".
macro_rules! container_lookup {
    ($fn_name:ident, $variant:ident, $inner:ty, $label:literal) => {
        fn $fn_name(&self, name: &Path) -> Result<SharedMut<$inner>, RuntimeError> {
            match self.lookup(name) {
                Ok(Value::$variant(container)) => Ok(container),
                _ => Err(RuntimeError::ContainerNotFound {
                    container: $label,
                    name: name.to_string(),
                }),
            }
        }
    };
}

impl Interpreter {
    container_lookup!(list_named, List, Vec<Value>, "list");
    container_lookup!(dict_named, Map, BTreeMap<String, Value>, "dictionary");
    container_lookup!(stack_named, Stack, Vec<Value>, "stack");
    container_lookup!(queue_named, Queue, VecDeque<Value>, "queue");

    fn operand(&self, operand: &Operand) -> Result<Value, RuntimeError> {
        self.resolve_operand(operand, &self.environment)
    }

    fn taken(
        &self,
        container: &'static str,
        name: &Path,
        item: Option<Value>,
        verb: &str,
        target: Option<&Path>,
    ) -> Result<Outcome, RuntimeError> {
        let item = item.ok_or_else(|| RuntimeError::EmptyContainer {
            container,
            name: name.to_string(),
        })?;
        let stored = self.store_result(target, &item)?;
        Ok(Outcome::with_data(
            format!("{} {} from {} '{}'{}", verb, item, container, name, stored),
            item,
        ))
    }
}

impl ContainerOperations for Interpreter {
    fn execute_list_op(&mut self, op: &ListOp) -> Result<Outcome, RuntimeError> {
        match op {
            ListOp::Create { name, initial } => {
                let list = match initial {
                    Some(literal @ Literal::List(_)) => Value::from_literal(literal),
                    Some(literal) => Value::list(vec![Value::from_literal(literal)]),
                    None => Value::list(Vec::new()),
                };
                self.assign(name, list.clone())?;
                Ok(Outcome::with_data(format!("created list '{}' = {}", name, list), list))
            }
            ListOp::Append { name, item } => {
                let list = self.list_named(name)?;
                let item = self.operand(item)?;
                list.write(|items| items.push(item.clone()));
                Ok(Outcome::with_data(
                    format!("appended {} to list '{}'", item, name),
                    item,
                ))
            }
            ListOp::Remove { name, item } => {
                let list = self.list_named(name)?;
                let item = self.operand(item)?;
                let position = list.read(|items| items.iter().position(|existing| *existing == item));
                let removed = position.map(|position| list.write(|items| items.remove(position)));
                match removed {
                    Some(removed) => Ok(Outcome::with_data(
                        format!("removed {} from list '{}'", removed, name),
                        removed,
                    )),
                    None => Err(RuntimeError::ItemNotFound {
                        name: name.to_string(),
                        item: item.to_string(),
                    }),
                }
            }
            ListOp::Get {
                name,
                index,
                target,
            } => {
                let list = self.list_named(name)?;
                let index = match self.operand(index)? {
                    Value::Int(index) => index,
                    other => {
                        return Err(RuntimeError::TypeMismatch(format!(
                            "list index must be an int, not {} {}",
                            other.type_name(),
                            other
                        )))
                    }
                };
                let (item, length) = list.read(|items| {
                    let item = usize::try_from(index).ok().and_then(|i| items.get(i).cloned());
                    (item, items.len())
                });
                let item = item.ok_or_else(|| RuntimeError::IndexOutOfRange {
                    name: name.to_string(),
                    index,
                    length,
                })?;
                let stored = self.store_result(target.as_ref(), &item)?;
                Ok(Outcome::with_data(
                    format!("{}[{}] = {}{}", name, index, item, stored),
                    item,
                ))
            }
            ListOp::Length { name } => {
                let length = self.list_named(name)?.read(Vec::len);
                Ok(Outcome::with_data(
                    format!("list '{}' has {} item(s)", name, length),
                    Value::Int(length as i64),
                ))
            }
            ListOp::Sort { name, descending } => {
                let list = self.list_named(name)?;
                let mut items = list.snapshot();
                let mut failure = None;
                items.sort_by(|a, b| match self.order_values(a, b) {
                    Ok(ordering) => ordering,
                    Err(error) => {
                        failure.get_or_insert(error);
                        Ordering::Equal
                    }
                });
                if let Some(error) = failure {
                    return Err(error);
                }
                if *descending {
                    items.reverse();
                }

                list.write(|current| *current = items);
                let order = if *descending { "descending" } else { "ascending" };
                Ok(Outcome::with_data(
                    format!("sorted list '{}' in {} order", name, order),
                    Value::List(list),
                ))
            }
            ListOp::Search { name, item } => {
                let list = self.list_named(name)?;
                let item = self.operand(item)?;
                let position = list.read(|items| items.iter().position(|existing| *existing == item));
                let message = match position {
                    Some(index) => format!("found {} at index {} of list '{}'", item, index, name),
                    None => format!("{} is not in list '{}'", item, name),
                };
                let index = position.map_or(-1, |index| index as i64);
                Ok(Outcome::with_data(message, Value::Int(index)))
            }
        }
    }

    fn execute_dict_op(&mut self, op: &DictOp) -> Result<Outcome, RuntimeError> {
        match op {
            DictOp::Create { name } => {
                let dict = Value::map(BTreeMap::new());
                self.assign(name, dict.clone())?;
                Ok(Outcome::with_data(format!("created dictionary '{}'", name), dict))
            }
            DictOp::Set { name, key, value } => {
                let dict = self.dict_named(name)?;
                let value = self.operand(value)?;
                dict.write(|entries| entries.insert(key.clone(), value.clone()));
                Ok(Outcome::with_data(
                    format!("set '{}' in dictionary '{}' to {}", key, name, value),
                    value,
                ))
            }
            DictOp::Get { name, key, target } => {
                let dict = self.dict_named(name)?;
                let value = dict
                    .read(|entries| entries.get(key).cloned())
                    .ok_or_else(|| RuntimeError::KeyNotFound {
                        name: name.to_string(),
                        key: key.clone(),
                    })?;
                let stored = self.store_result(target.as_ref(), &value)?;
                Ok(Outcome::with_data(
                    format!("{}['{}'] = {}{}", name, key, value, stored),
                    value,
                ))
            }
            DictOp::Remove { name, key } => {
                let dict = self.dict_named(name)?;
                let removed = dict
                    .write(|entries| entries.remove(key))
                    .ok_or_else(|| RuntimeError::KeyNotFound {
                        name: name.to_string(),
                        key: key.clone(),
                    })?;
                Ok(Outcome::with_data(
                    format!("removed '{}' from dictionary '{}'", key, name),
                    removed,
                ))
            }
            DictOp::Keys { name } => {
                let keys = self
                    .dict_named(name)?
                    .read(|entries| entries.keys().cloned().map(Value::Str).collect());
                let keys = Value::list(keys);
                Ok(Outcome::with_data(format!("keys of '{}': {}", name, keys), keys))
            }
        }
    }

    fn execute_stack_op(&mut self, op: &StackOp) -> Result<Outcome, RuntimeError> {
        match op {
            StackOp::Create { name } => {
                let stack = Value::stack();
                self.assign(name, stack.clone())?;
                Ok(Outcome::with_data(format!("created stack '{}'", name), stack))
            }
            StackOp::Push { name, item } => {
                let stack = self.stack_named(name)?;
                let item = self.operand(item)?;
                stack.write(|items| items.push(item.clone()));
                Ok(Outcome::with_data(
                    format!("pushed {} onto stack '{}'", item, name),
                    item,
                ))
            }
            StackOp::Pop { name, target } => {
                let item = self.stack_named(name)?.write(Vec::pop);
                self.taken("stack", name, item, "popped", target.as_ref())
            }
            StackOp::Peek { name, target } => {
                let item = self.stack_named(name)?.read(|items| items.last().cloned());
                self.taken("stack", name, item, "peeked", target.as_ref())
            }
        }
    }

    fn execute_queue_op(&mut self, op: &QueueOp) -> Result<Outcome, RuntimeError> {
        match op {
            QueueOp::Create { name } => {
                let queue = Value::queue();
                self.assign(name, queue.clone())?;
                Ok(Outcome::with_data(format!("created queue '{}'", name), queue))
            }
            QueueOp::Enqueue { name, item } => {
                let queue = self.queue_named(name)?;
                let item = self.operand(item)?;
                queue.write(|items| items.push_back(item.clone()));
                Ok(Outcome::with_data(
                    format!("enqueued {} into queue '{}'", item, name),
                    item,
                ))
            }
            QueueOp::Dequeue { name, target } => {
                let item = self.queue_named(name)?.write(VecDeque::pop_front);
                self.taken("queue", name, item, "dequeued", target.as_ref())
            }
            QueueOp::Peek { name, target } => {
                let item = self.queue_named(name)?.read(|items| items.front().cloned());
                self.taken("queue", name, item, "peeked", target.as_ref())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::prelude::{ErrorKind, InterpreterConfig, Interpreter, Value};
    use crate::traits::prelude::CoreOperations;
    use pretty_assertions::assert_eq;

    fn data(it: &mut Interpreter, text: &str) -> Option<Value> {
        let result = it.run_instruction(text);
        assert!(result.is_success(), "{}", result);
        result.data
    }

    fn kind(it: &mut Interpreter, text: &str) -> Option<ErrorKind> {
        it.run_instruction(text).kind
    }

    #[test]
    fn list_operations() {
        let mut it = Interpreter::new(InterpreterConfig::default());
        data(&mut it, "Create list xs with [30, 10, 20]");
        data(&mut it, "Append 5 to list xs");
        assert_eq!(data(&mut it, "Get the length of list xs"), Some(Value::Int(4)));

        data(&mut it, "Sort list xs");
        assert_eq!(it.variable("xs").map(|xs| xs.to_string()), Some("[5, 10, 20, 30]".into()));
        data(&mut it, "Sort list xs in descending order");
        assert_eq!(data(&mut it, "Get from list xs at index 0 into top"), Some(Value::Int(30)));
        assert_eq!(it.variable("top"), Some(Value::Int(30)));

        assert_eq!(data(&mut it, "Search list xs for 10"), Some(Value::Int(2)));
        assert_eq!(data(&mut it, "Search list xs for 99"), Some(Value::Int(-1)));

        data(&mut it, "Remove 10 from list xs");
        assert_eq!(kind(&mut it, "Remove 10 from list xs"), Some(ErrorKind::ItemNotFound));
        assert_eq!(kind(&mut it, "Get from list xs at index 7"), Some(ErrorKind::IndexOutOfRange));
    }

    #[test]
    fn containers_require_creation_first() {
        let mut it = Interpreter::new(InterpreterConfig::default());
        assert_eq!(kind(&mut it, "Append 1 to list ys"), Some(ErrorKind::ContainerNotFound));
        assert_eq!(kind(&mut it, "Push 1 onto stack s"), Some(ErrorKind::ContainerNotFound));

        data(&mut it, "Create list s");
        assert_eq!(kind(&mut it, "Push 1 onto stack s"), Some(ErrorKind::ContainerNotFound));
    }

    #[test]
    fn dictionaries_by_key() {
        let mut it = Interpreter::new(InterpreterConfig::default());
        data(&mut it, "Create dictionary d");
        data(&mut it, "Set dictionary 'd' with key 'b' and value 2");
        data(&mut it, "Set dictionary 'd' with key 'a' and value 'one'");
        assert_eq!(
            data(&mut it, "Get from dictionary d with key a into v"),
            Some(Value::Str("one".into()))
        );
        assert_eq!(
            data(&mut it, "Get the keys of dictionary d").map(|keys| keys.to_string()),
            Some("['a', 'b']".into())
        );

        data(&mut it, "Remove from dictionary d with key a");
        assert_eq!(
            kind(&mut it, "Get from dictionary d with key a"),
            Some(ErrorKind::KeyNotFound)
        );
    }

    #[test]
    fn stack_pops_in_reverse_order() {
        let mut it = Interpreter::new(InterpreterConfig::default());
        data(&mut it, "Create stack s");
        data(&mut it, "Push 1 onto stack s");
        data(&mut it, "Push 2 onto stack s");
        assert_eq!(data(&mut it, "Peek at stack s"), Some(Value::Int(2)));
        assert_eq!(data(&mut it, "Pop from stack s into top"), Some(Value::Int(2)));
        assert_eq!(data(&mut it, "Pop from stack s"), Some(Value::Int(1)));
        assert_eq!(kind(&mut it, "Pop from stack s"), Some(ErrorKind::EmptyContainer));
        assert_eq!(it.variable("top"), Some(Value::Int(2)));
    }

    #[test]
    fn queue_is_first_in_first_out() {
        let mut it = Interpreter::new(InterpreterConfig::default());
        data(&mut it, "Create queue q");
        data(&mut it, "Enqueue 'job' into queue q");
        data(&mut it, "Enqueue 'next' into queue q");
        assert_eq!(data(&mut it, "Peek at queue q"), Some(Value::Str("job".into())));
        assert_eq!(data(&mut it, "Dequeue from queue q"), Some(Value::Str("job".into())));
        assert_eq!(data(&mut it, "Dequeue from queue q"), Some(Value::Str("next".into())));
        assert_eq!(kind(&mut it, "Peek at queue q"), Some(ErrorKind::EmptyContainer));
    }
}
