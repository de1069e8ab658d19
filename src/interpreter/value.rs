use crate::ast::prelude::Literal;
use crate::interpreter::prelude::Value;
use crate::shared::SharedMut;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

impl Value {
    /// Builds a runtime value from a literal. Container literals produce a
    /// fresh container on every call.
    pub fn from_literal(literal: &Literal) -> Value {
        match literal {
            Literal::Int(n) => Value::Int(*n),
            Literal::Float(n) => Value::Float(*n),
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Str(s) => Value::Str(s.clone()),
            Literal::List(items) => Value::list(items.iter().map(Value::from_literal).collect()),
            Literal::Map(entries) => Value::map(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), Value::from_literal(value)))
                    .collect(),
            ),
            Literal::Null => Value::Null,
        }
    }

    pub fn list(items: Vec<Value>) -> Value {
        Value::List(SharedMut::new(items))
    }

    pub fn map(entries: BTreeMap<String, Value>) -> Value {
        Value::Map(SharedMut::new(entries))
    }

    pub fn stack() -> Value {
        Value::Stack(SharedMut::new(Vec::new()))
    }

    pub fn queue() -> Value {
        Value::Queue(SharedMut::new(VecDeque::new()))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "dictionary",
            Value::Stack(_) => "stack",
            Value::Queue(_) => "queue",
            Value::Function(_) => "function",
            Value::Class(_) => "class",
            Value::Object(_) => "object",
            Value::Interface(_) => "interface",
            Value::Null => "null",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub(crate) fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Renders the value, printing a marker in place of any container that
    /// is already being rendered further up. `seen` holds those containers.
    fn render(&self, seen: &mut Vec<usize>) -> String {
        match self {
            Value::List(items) => guarded(items, seen, String::from("[...]"), |items, seen| {
                format!("[{}]", join(items.iter(), seen))
            }),
            Value::Stack(items) => guarded(items, seen, String::from("stack[...]"), |items, seen| {
                format!("stack[{}]", join(items.iter(), seen))
            }),
            Value::Queue(items) => guarded(items, seen, String::from("queue[...]"), |items, seen| {
                format!("queue[{}]", join(items.iter(), seen))
            }),
            Value::Map(entries) => guarded(entries, seen, String::from("{...}"), |entries, seen| {
                let body = entries
                    .iter()
                    .map(|(key, value)| format!("'{}': {}", key, value.nested_render(seen)))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{{{}}}", body)
            }),
            other => other.to_string(),
        }
    }

    /// Text used inside container renderings, where strings are quoted.
    fn nested_render(&self, seen: &mut Vec<usize>) -> String {
        match self {
            Value::Str(s) => format!("'{}'", s),
            other => other.render(seen),
        }
    }

    /// Structural equality. A pair of containers already under comparison
    /// is assumed equal, so self-referencing containers terminate.
    fn equals(&self, other: &Value, pending: &mut Vec<(usize, usize)>) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Int(_), Value::Float(_)) | (Value::Float(_), Value::Int(_)) => {
                self.as_number() == other.as_number()
            }
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) | (Value::Stack(a), Value::Stack(b)) => {
                both(a, b, pending, |a, b, pending| {
                    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equals(y, pending))
                })
            }
            (Value::Queue(a), Value::Queue(b)) => both(a, b, pending, |a, b, pending| {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equals(y, pending))
            }),
            (Value::Map(a), Value::Map(b)) => both(a, b, pending, |a, b, pending| {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|((ka, va), (kb, vb))| ka == kb && va.equals(vb, pending))
            }),
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Class(a), Value::Class(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Interface(a), Value::Interface(b)) => a == b,
            (Value::Null, Value::Null) => true,
            _ => false,
        }
    }
}

/// Runs `render` on the cell's contents unless the cell is already on the
/// rendering path, in which case `marker` stands in for it.
pub(crate) fn guarded<T, R>(
    cell: &SharedMut<T>,
    seen: &mut Vec<usize>,
    marker: R,
    render: impl FnOnce(&T, &mut Vec<usize>) -> R,
) -> R {
    let addr = cell.addr();
    if seen.contains(&addr) {
        return marker;
    }
    seen.push(addr);
    let rendered = cell.read(|inner| render(inner, seen));
    seen.pop();
    rendered
}

fn both<T>(
    a: &SharedMut<T>,
    b: &SharedMut<T>,
    pending: &mut Vec<(usize, usize)>,
    compare: impl FnOnce(&T, &T, &mut Vec<(usize, usize)>) -> bool,
) -> bool {
    let key = (a.addr(), b.addr());
    if a.ptr_eq(b) || pending.contains(&key) {
        return true;
    }
    pending.push(key);
    let equal = a.read(|a| b.read(|b| compare(a, b, pending)));
    pending.pop();
    equal
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, &mut Vec::new())
    }
}

fn join<'a>(items: impl Iterator<Item = &'a Value>, seen: &mut Vec<usize>) -> String {
    items.map(|item| item.nested_render(seen)).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{:?}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => f.write_str(s),
            Value::List(_) | Value::Stack(_) | Value::Queue(_) | Value::Map(_) => {
                f.write_str(&self.render(&mut Vec::new()))
            }
            Value::Function(function) => {
                write!(f, "<function {}({})>", function.name, function.params.join(", "))
            }
            Value::Class(class) => class.read(|class| write!(f, "<class {}>", class.name)),
            Value::Object(object) => {
                object.read(|object| write!(f, "<{} object>", object.class_name()))
            }
            Value::Interface(interface) => write!(f, "<interface {}>", interface.name),
            Value::Null => f.write_str("null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_become_fresh_containers() {
        let literal = Literal::List(vec![Literal::Int(1), Literal::Str("a".into())]);
        let first = Value::from_literal(&literal);
        let second = Value::from_literal(&literal);

        assert_eq!(first, second);
        if let (Value::List(a), Value::List(b)) = (&first, &second) {
            assert!(!a.ptr_eq(b));
        } else {
            panic!("expected lists");
        }
        assert_eq!(first.to_string(), "[1, 'a']");
    }

    #[test]
    fn numbers_compare_across_int_and_float() {
        assert_eq!(Value::Int(2), Value::Float(2.0));
        assert_ne!(Value::Int(2), Value::Str("2".into()));
    }

    #[test]
    fn maps_render_in_key_order() {
        let value = Value::from_literal(&Literal::Map(vec![
            ("b".into(), Literal::Int(2)),
            ("a".into(), Literal::Null),
        ]));
        assert_eq!(value.to_string(), "{'a': null, 'b': 2}");
    }

    #[test]
    fn self_containing_list_renders_a_marker() {
        let list = Value::list(vec![Value::Int(1)]);
        if let Value::List(items) = &list {
            items.write(|items| items.push(list.clone()));
        }
        assert_eq!(list.to_string(), "[1, [...]]");

        let other = Value::list(vec![Value::Int(1)]);
        if let Value::List(items) = &other {
            items.write(|items| items.push(other.clone()));
        }
        assert_eq!(list, other);
        assert_ne!(list, Value::list(vec![Value::Int(1), Value::Int(2)]));
    }

    #[test]
    fn map_holding_itself_renders_a_marker() {
        let map = Value::map(BTreeMap::new());
        if let Value::Map(entries) = &map {
            entries.write(|entries| entries.insert("me".into(), map.clone()));
        }
        assert_eq!(map.to_string(), "{'me': {...}}");
    }
}
