use crate::interpreter::prelude::Value;
use crate::interpreter::value::guarded;
use serde_json::{json, Map, Number, Value as JsonValue};
use std::collections::BTreeMap;

pub trait JsonParsable {
    fn from_json(json: JsonValue) -> Value;
    fn to_json(&self) -> JsonValue;
}

impl JsonParsable for Value {
    fn from_json(json: JsonValue) -> Value {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => Value::Str(s),
            JsonValue::Array(items) => {
                Value::list(items.into_iter().map(Value::from_json).collect())
            }
            JsonValue::Object(entries) => Value::map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Value::from_json(value)))
                    .collect::<BTreeMap<_, _>>(),
            ),
        }
    }

    fn to_json(&self) -> JsonValue {
        json_of(self, &mut Vec::new())
    }
}

/// Converts a value, emitting a marker string for a container reached again
/// through itself.
fn json_of(value: &Value, seen: &mut Vec<usize>) -> JsonValue {
    match value {
        Value::Int(n) => json!(n),
        Value::Float(n) => Number::from_f64(*n)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::Bool(b) => json!(b),
        Value::Str(s) => json!(s),
        Value::List(items) | Value::Stack(items) => {
            guarded(items, seen, json!("[...]"), |items, seen| {
                JsonValue::Array(items.iter().map(|item| json_of(item, seen)).collect())
            })
        }
        Value::Queue(items) => guarded(items, seen, json!("[...]"), |items, seen| {
            JsonValue::Array(items.iter().map(|item| json_of(item, seen)).collect())
        }),
        Value::Map(entries) => guarded(entries, seen, json!("{...}"), |entries, seen| {
            JsonValue::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), json_of(value, seen)))
                    .collect::<Map<_, _>>(),
            )
        }),
        Value::Object(object) => guarded(object, seen, json!("<object ...>"), |object, seen| {
            let attributes = object
                .attributes
                .iter()
                .map(|(key, value)| (key.clone(), json_of(value, seen)))
                .collect::<Map<_, _>>();
            json!({ "class": object.class_name(), "attributes": attributes })
        }),
        Value::Function(_) | Value::Class(_) | Value::Interface(_) => json!(value.to_string()),
        Value::Null => JsonValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn json_documents_become_values() {
        let value = Value::from_json(json!({"ok": true, "items": [1, 2.5, "x", null]}));
        assert_eq!(value.to_string(), "{'items': [1, 2.5, 'x', null], 'ok': true}");
        assert_eq!(value.to_json(), json!({"ok": true, "items": [1, 2.5, "x", null]}));
    }

    #[test]
    fn self_containing_list_becomes_a_marker() {
        let list = Value::list(vec![Value::Int(1)]);
        if let Value::List(items) = &list {
            items.write(|items| items.push(list.clone()));
        }
        assert_eq!(list.to_json(), json!([1, "[...]"]));
    }
}
