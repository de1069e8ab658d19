use crate::ast::prelude::{Path, PathSegment};
use crate::interpreter::prelude::{Environment, Interpreter, RuntimeError, Value};
use crate::shared::SharedMut;
use crate::traits::prelude::CoreOperations;
use std::collections::{BTreeMap, HashMap};
use string_interner::DefaultSymbol as Symbol;

impl Environment {
    pub(crate) fn new() -> Self {
        Environment {
            variables: HashMap::new(),
            parent: None,
        }
    }

    pub(crate) fn with_parent(parent: SharedMut<Environment>) -> Self {
        Environment {
            variables: HashMap::new(),
            parent: Some(parent),
        }
    }

    pub(crate) fn define(&mut self, name: Symbol, value: Value) {
        self.variables.insert(name, value);
    }

    pub(crate) fn get(&self, name: &Symbol) -> Option<Value> {
        if let Some(value) = self.variables.get(name) {
            return Some(value.clone());
        }

        if let Some(parent_shared) = &self.parent {
            return parent_shared.read(|parent| parent.get(name));
        }

        None
    }

    pub(crate) fn remove(&mut self, name: &Symbol) -> Option<Value> {
        self.variables.remove(name)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

fn not_a_container(container: &Value, path: &Path) -> RuntimeError {
    RuntimeError::TypeMismatch(format!(
        "cannot reach into {} while resolving '{}'",
        container.type_name(),
        path
    ))
}

/// Empty container suited to the segment that will be applied to it.
fn container_for(segment: &PathSegment) -> Value {
    match segment {
        PathSegment::Field(_) => Value::map(BTreeMap::new()),
        PathSegment::Index(_) => Value::list(Vec::new()),
    }
}

fn map_key(segment: &PathSegment) -> String {
    match segment {
        PathSegment::Field(name) => name.clone(),
        PathSegment::Index(index) => index.to_string(),
    }
}

fn child(container: &Value, segment: &PathSegment, path: &Path) -> Result<Option<Value>, RuntimeError> {
    match (container, segment) {
        (Value::Map(entries), _) => Ok(entries.read(|entries| entries.get(&map_key(segment)).cloned())),
        (Value::Object(object), PathSegment::Field(name)) => {
            Ok(object.read(|object| object.attributes.get(name).cloned()))
        }
        (Value::List(items), PathSegment::Index(index)) => {
            Ok(items.read(|items| items.get(*index).cloned()))
        }
        _ => Err(not_a_container(container, path)),
    }
}

fn store(
    container: &Value,
    segment: &PathSegment,
    value: Value,
    path: &Path,
    max_padding: usize,
) -> Result<(), RuntimeError> {
    match (container, segment) {
        (Value::Map(entries), _) => {
            entries.write(|entries| entries.insert(map_key(segment), value));
            Ok(())
        }
        (Value::Object(object), PathSegment::Field(name)) => {
            object.write(|object| object.attributes.insert(name.clone(), value));
            Ok(())
        }
        (Value::List(items), PathSegment::Index(index)) => items.write(|items| {
            if *index >= items.len() {
                if *index - items.len() > max_padding {
                    return Err(RuntimeError::IndexOutOfRange {
                        name: path.to_string(),
                        index: i64::try_from(*index).unwrap_or(i64::MAX),
                        length: items.len(),
                    });
                }
                items.resize(*index + 1, Value::Null);
            }
            items[*index] = value;
            Ok(())
        }),
        _ => Err(not_a_container(container, path)),
    }
}

/// Walks `segments` below `container`, creating a map or list for every
/// missing intermediate step, and stores `value` at the end.
fn assign_segments(
    container: &Value,
    segments: &[PathSegment],
    value: Value,
    path: &Path,
    max_padding: usize,
) -> Result<(), RuntimeError> {
    let Some((segment, rest)) = segments.split_first() else {
        return Ok(());
    };
    let Some(next) = rest.first() else {
        return store(container, segment, value, path, max_padding);
    };

    let inner = match child(container, segment, path)? {
        Some(existing) if !existing.is_null() => existing,
        _ => {
            let fresh = container_for(next);
            store(container, segment, fresh.clone(), path, max_padding)?;
            fresh
        }
    };
    assign_segments(&inner, rest, value, path, max_padding)
}

impl Interpreter {
    pub(crate) fn lookup_in(
        &self,
        scope: &SharedMut<Environment>,
        path: &Path,
    ) -> Result<Value, RuntimeError> {
        let undefined = || RuntimeError::UndefinedVariable(path.to_string());
        let symbol = self
            .interner
            .read(|interner| interner.get(&path.root))
            .ok_or_else(undefined)?;
        let mut current = scope
            .read(|env| env.get(&symbol))
            .ok_or_else(undefined)?;

        for segment in &path.segments {
            current = match (&current, segment) {
                (Value::List(items), PathSegment::Index(index)) => {
                    let length = items.read(Vec::len);
                    items
                        .read(|items| items.get(*index).cloned())
                        .ok_or_else(|| RuntimeError::IndexOutOfRange {
                            name: path.to_string(),
                            index: *index as i64,
                            length,
                        })?
                }
                _ => child(&current, segment, path)?.ok_or_else(undefined)?,
            };
        }

        Ok(current)
    }

    pub(crate) fn lookup(&self, path: &Path) -> Result<Value, RuntimeError> {
        self.lookup_in(&self.environment, path)
    }

    /// Binds `value` at `path`. A simple name is (re)defined in `scope`;
    /// a nested path auto-creates missing maps and lists and pads lists
    /// with null up to the target index.
    pub(crate) fn assign_in(
        &self,
        scope: &SharedMut<Environment>,
        path: &Path,
        value: Value,
    ) -> Result<(), RuntimeError> {
        let symbol = self.intern_string(&path.root);
        let Some(first) = path.segments.first() else {
            scope.write(|env| env.define(symbol, value));
            return Ok(());
        };

        let root = match scope.read(|env| env.get(&symbol)) {
            Some(existing) if !existing.is_null() => existing,
            _ => {
                let fresh = container_for(first);
                scope.write(|env| env.define(symbol, fresh.clone()));
                fresh
            }
        };
        assign_segments(&root, &path.segments, value, path, self.config.max_list_padding)
    }

    pub(crate) fn assign(&self, path: &Path, value: Value) -> Result<(), RuntimeError> {
        self.assign_in(&self.environment, path, value)
    }

    pub(crate) fn remove(&self, path: &Path) -> Result<Value, RuntimeError> {
        let undefined = || RuntimeError::UndefinedVariable(path.to_string());
        let Some((last, parents)) = path.segments.split_last() else {
            let symbol = self
                .interner
                .read(|interner| interner.get(&path.root))
                .ok_or_else(undefined)?;
            return self
                .environment
                .write(|env| env.remove(&symbol))
                .ok_or_else(undefined);
        };

        let parent_path = Path {
            root: path.root.clone(),
            segments: parents.to_vec(),
        };
        let removed = match (self.lookup(&parent_path)?, last) {
            (Value::Map(entries), segment) => entries.write(|entries| entries.remove(&map_key(segment))),
            (Value::Object(object), PathSegment::Field(name)) => {
                object.write(|object| object.attributes.remove(name))
            }
            (Value::List(items), PathSegment::Index(index)) => items.write(|items| {
                if *index < items.len() {
                    Some(items.remove(*index))
                } else {
                    None
                }
            }),
            (container, _) => return Err(not_a_container(&container, path)),
        };
        removed.ok_or_else(undefined)
    }

    /// Reads a variable by name, or by dotted/indexed path such as
    /// `config.ports[2]`.
    pub fn variable(&self, name: &str) -> Option<Value> {
        let path = crate::parser::prelude::parse_path(name)?;
        self.lookup(&path).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::prelude::InterpreterConfig;
    use pretty_assertions::assert_eq;

    fn path(root: &str, segments: Vec<PathSegment>) -> Path {
        Path {
            root: root.into(),
            segments,
        }
    }

    #[test]
    fn nested_assignment_creates_maps_and_pads_lists() {
        let it = Interpreter::new(InterpreterConfig::default());
        let target = path(
            "config",
            vec![PathSegment::Field("ports".into()), PathSegment::Index(2)],
        );
        it.assign(&target, Value::Int(8080)).unwrap();

        assert_eq!(it.lookup(&target).unwrap(), Value::Int(8080));
        assert_eq!(
            it.variable("config").map(|value| value.to_string()),
            Some("{'ports': [null, null, 8080]}".to_string())
        );
    }

    #[test]
    fn padding_is_bounded() {
        let it = Interpreter::new(InterpreterConfig::default().with_max_list_padding(4));
        let far = path("xs", vec![PathSegment::Index(usize::MAX)]);
        assert!(matches!(
            it.assign(&far, Value::Int(1)),
            Err(RuntimeError::IndexOutOfRange { length: 0, .. })
        ));

        it.assign(&path("xs", vec![PathSegment::Index(4)]), Value::Int(1)).unwrap();
        assert_eq!(it.variable("xs").map(|xs| xs.to_string()), Some("[null, null, null, null, 1]".into()));
        assert!(it.assign(&path("xs", vec![PathSegment::Index(10)]), Value::Int(2)).is_err());
    }

    #[test]
    fn assigning_through_a_scalar_fails() {
        let it = Interpreter::new(InterpreterConfig::default());
        it.assign(&Path::simple("n"), Value::Int(1)).unwrap();
        let error = it
            .assign(&path("n", vec![PathSegment::Field("x".into())]), Value::Int(2))
            .unwrap_err();
        assert!(matches!(error, RuntimeError::TypeMismatch(_)));
    }

    #[test]
    fn removing_missing_names_fails() {
        let it = Interpreter::new(InterpreterConfig::default());
        assert_eq!(
            it.remove(&Path::simple("ghost")),
            Err(RuntimeError::UndefinedVariable("ghost".into()))
        );

        it.assign(&path("d", vec![PathSegment::Field("k".into())]), Value::Int(1)).unwrap();
        assert_eq!(it.remove(&path("d", vec![PathSegment::Field("k".into())])), Ok(Value::Int(1)));
        assert!(it.remove(&path("d", vec![PathSegment::Field("k".into())])).is_err());
    }

    #[test]
    fn child_scopes_see_parent_bindings() {
        let it = Interpreter::new(InterpreterConfig::default());
        it.assign(&Path::simple("x"), Value::Int(1)).unwrap();

        let local = SharedMut::new(Environment::with_parent(it.environment.clone()));
        it.assign_in(&local, &Path::simple("y"), Value::Int(2)).unwrap();

        assert_eq!(it.lookup_in(&local, &Path::simple("x")).unwrap(), Value::Int(1));
        assert!(it.lookup(&Path::simple("y")).is_err());
    }
}
