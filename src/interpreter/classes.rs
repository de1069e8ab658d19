use crate::ast::prelude::{ClassOp, InheritanceOp, InterfaceOp, Literal, ObjectOp, Path};
use crate::interpreter::prelude::{
    ClassDescriptor, Environment, FunctionDescriptor, InterfaceDescriptor, Interpreter,
    ObjectInstance, Outcome, RuntimeError, Value,
};
use crate::shared::SharedMut;
use crate::traits::prelude::{
    CoreOperations, ExpressionEvaluator, InterpreterClasses, InterpreterFunctions,
};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;

impl ClassDescriptor {
    pub fn new(name: impl Into<String>, superclass: Option<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            methods: HashMap::new(),
            superclass,
        }
    }

    /// Adds an attribute, or replaces the default of an existing one.
    pub fn set_attribute_default(&mut self, name: &str, default: Literal) {
        match self.attributes.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, value)) => *value = default,
            None => self.attributes.push((name.to_string(), default)),
        }
    }

    pub fn attribute_default(&self, name: &str) -> Option<&Literal> {
        self.attributes
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, default)| default)
    }
}

impl ObjectInstance {
    pub fn class_name(&self) -> String {
        self.class.read(|class| class.name.clone())
    }
}

impl Interpreter {
    fn object_named(&self, path: &Path) -> Result<SharedMut<ObjectInstance>, RuntimeError> {
        match self.lookup(path)? {
            Value::Object(object) => Ok(object),
            other => Err(RuntimeError::TypeMismatch(format!(
                "'{}' is {} {}, not an object",
                path,
                article(other.type_name()),
                other.type_name()
            ))),
        }
    }

    fn interface_named(&self, name: &str) -> Result<Arc<InterfaceDescriptor>, RuntimeError> {
        match self.lookup(&Path::simple(name)) {
            Ok(Value::Interface(interface)) => Ok(interface),
            _ => Err(RuntimeError::InterfaceNotFound(name.to_string())),
        }
    }

    /// Instance attributes merged over the defaults of the class chain.
    fn resolved_attributes(
        &self,
        object: &SharedMut<ObjectInstance>,
    ) -> Result<BTreeMap<String, Value>, RuntimeError> {
        let (class, own) = object.read(|object| (object.class.clone(), object.attributes.clone()));
        let mut attributes = BTreeMap::new();
        for class in self.chain_from(class)?.iter().rev() {
            class.read(|class| {
                for (name, default) in &class.attributes {
                    attributes.insert(name.clone(), Value::from_literal(default));
                }
            });
        }
        attributes.extend(own);
        Ok(attributes)
    }

    /// The class followed by its ancestors, nearest first. Ancestors are
    /// found by name.
    fn chain_from(
        &self,
        class: SharedMut<ClassDescriptor>,
    ) -> Result<Vec<SharedMut<ClassDescriptor>>, RuntimeError> {
        let mut visited = HashSet::from([class.read(|class| class.name.clone())]);
        let mut chain = vec![class];

        while let Some(parent) = chain
            .last()
            .and_then(|class| class.read(|class| class.superclass.clone()))
        {
            if !visited.insert(parent.clone()) {
                break;
            }
            let class = self
                .lookup_class(&parent)
                .map_err(|_| RuntimeError::SuperclassNotFound(parent))?;
            chain.push(class);
        }

        Ok(chain)
    }

    fn method_in_chain(
        &self,
        class: SharedMut<ClassDescriptor>,
        method: &str,
    ) -> Result<Arc<FunctionDescriptor>, RuntimeError> {
        let name = class.read(|class| class.name.clone());
        for descriptor in self.chain_from(class)? {
            if let Some(found) = descriptor.read(|descriptor| descriptor.methods.get(method).cloned()) {
                return Ok(found);
            }
        }
        Err(RuntimeError::MethodNotFound {
            class: name,
            method: method.to_string(),
        })
    }
}

fn article(noun: &str) -> &'static str {
    match noun.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

impl InterpreterClasses for Interpreter {
    fn lookup_class(&self, name: &str) -> Result<SharedMut<ClassDescriptor>, RuntimeError> {
        match self.lookup(&Path::simple(name)) {
            Ok(Value::Class(class)) => Ok(class),
            _ => Err(RuntimeError::ClassNotFound(name.to_string())),
        }
    }

    fn class_chain(&self, name: &str) -> Result<Vec<SharedMut<ClassDescriptor>>, RuntimeError> {
        self.chain_from(self.lookup_class(name)?)
    }

    fn resolve_method(
        &self,
        class: &str,
        method: &str,
    ) -> Result<Arc<FunctionDescriptor>, RuntimeError> {
        self.method_in_chain(self.lookup_class(class)?, method)
    }

    fn resolved_methods(&self, class: &str) -> Result<BTreeSet<String>, RuntimeError> {
        let mut methods = BTreeSet::new();
        for descriptor in self.class_chain(class)? {
            descriptor.read(|descriptor| methods.extend(descriptor.methods.keys().cloned()));
        }
        Ok(methods)
    }

    fn attribute_of(
        &self,
        object: &SharedMut<ObjectInstance>,
        attribute: &str,
    ) -> Result<Value, RuntimeError> {
        let (class, own) = object.read(|object| {
            (object.class.clone(), object.attributes.get(attribute).cloned())
        });
        if let Some(value) = own {
            return Ok(value);
        }

        let name = class.read(|class| class.name.clone());
        for descriptor in self.chain_from(class)? {
            if let Some(default) = descriptor.read(|descriptor| descriptor.attribute_default(attribute).cloned()) {
                return Ok(Value::from_literal(&default));
            }
        }
        Err(RuntimeError::AttributeNotFound {
            object: format!("{} object", name),
            attribute: attribute.to_string(),
        })
    }

    /// Methods see `self`, every resolved attribute and their parameters,
    /// in that order of increasing precedence.
    fn call_method(
        &self,
        object: &SharedMut<ObjectInstance>,
        method: &str,
        arguments: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let class = object.read(|object| object.class.clone());
        let function = self.method_in_chain(class, method)?;

        let mut scope = Environment::with_parent(self.environment.clone());
        scope.define(self.intern_string("self"), Value::Object(object.clone()));
        for (name, value) in self.resolved_attributes(object)? {
            scope.define(self.intern_string(&name), value);
        }

        self.invoke(&function, arguments, scope)
    }

    fn execute_class_op(&mut self, op: &ClassOp) -> Result<Outcome, RuntimeError> {
        match op {
            ClassOp::Create {
                name,
                attributes,
                superclass,
            } => {
                if let Some(superclass) = superclass {
                    self.lookup_class(superclass)
                        .map_err(|_| RuntimeError::SuperclassNotFound(superclass.clone()))?;
                }
                let mut descriptor = ClassDescriptor::new(name.as_str(), superclass.clone());
                for attribute in attributes {
                    descriptor.set_attribute_default(attribute, Literal::Null);
                }

                let class = SharedMut::new(descriptor);
                self.assign(&Path::simple(name.as_str()), Value::Class(class.clone()))?;
                let message = match superclass {
                    Some(superclass) => format!("created class '{}' extending '{}'", name, superclass),
                    None => format!("created class '{}'", name),
                };
                Ok(Outcome::with_data(message, Value::Class(class)))
            }
            ClassOp::AddAttribute {
                class,
                attribute,
                default,
            } => {
                let descriptor = self.lookup_class(class)?;
                descriptor.write(|descriptor| descriptor.set_attribute_default(attribute, default.clone()));
                Ok(Outcome::message(format!(
                    "added attribute '{}' to class '{}'",
                    attribute, class
                )))
            }
            ClassOp::AddMethod {
                class,
                method,
                params,
                body,
                source,
            } => {
                let descriptor = self.lookup_class(class)?;
                let function = Arc::new(FunctionDescriptor {
                    name: method.clone(),
                    params: params.clone(),
                    body: body.clone(),
                    source: source.clone(),
                });
                descriptor.write(|descriptor| descriptor.methods.insert(method.clone(), function));
                Ok(Outcome::message(format!(
                    "added method '{}' to class '{}'",
                    method, class
                )))
            }
        }
    }

    fn execute_object_op(&mut self, op: &ObjectOp) -> Result<Outcome, RuntimeError> {
        match op {
            ObjectOp::Create { name, class } => {
                let descriptor = self.lookup_class(class)?;
                let chain = self.chain_from(descriptor.clone())?;
                let mut attributes = BTreeMap::new();
                for descriptor in chain.iter().rev() {
                    descriptor.read(|descriptor| {
                        for (attribute, default) in &descriptor.attributes {
                            attributes.insert(attribute.clone(), Value::from_literal(default));
                        }
                    });
                }

                let object = Value::Object(SharedMut::new(ObjectInstance {
                    class: descriptor,
                    attributes,
                }));
                self.assign(name, object.clone())?;
                Ok(Outcome::with_data(
                    format!("created object '{}' of class '{}'", name, class),
                    object,
                ))
            }
            ObjectOp::SetAttribute {
                object,
                attribute,
                value,
            } => {
                let instance = self.object_named(object)?;
                let value = self.resolve_operand(value, &self.environment)?;
                instance.write(|instance| instance.attributes.insert(attribute.clone(), value.clone()));
                Ok(Outcome::with_data(
                    format!("set '{}.{}' to {}", object, attribute, value),
                    value,
                ))
            }
            ObjectOp::GetAttribute {
                object,
                attribute,
                target,
            } => {
                let instance = self.object_named(object)?;
                let value = self.attribute_of(&instance, attribute)?;
                let stored = self.store_result(target.as_ref(), &value)?;
                Ok(Outcome::with_data(
                    format!("{}.{} = {}{}", object, attribute, value, stored),
                    value,
                ))
            }
            ObjectOp::CallMethod {
                object,
                method,
                arguments,
                target,
            } => {
                let instance = self.object_named(object)?;
                let arguments = arguments
                    .iter()
                    .map(|argument| self.resolve_operand(argument, &self.environment))
                    .collect::<Result<Vec<_>, _>>()?;
                let value = self.call_method(&instance, method, arguments)?;
                let stored = self.store_result(target.as_ref(), &value)?;
                Ok(Outcome::with_data(
                    format!("{}.{} returned {}{}", object, method, value, stored),
                    value,
                ))
            }
        }
    }

    fn execute_inheritance(&mut self, op: &InheritanceOp) -> Result<Outcome, RuntimeError> {
        let class = self.lookup_class(&op.class)?;
        self.lookup_class(&op.superclass)
            .map_err(|_| RuntimeError::SuperclassNotFound(op.superclass.clone()))?;

        let creates_cycle = op.class == op.superclass
            || self
                .class_chain(&op.superclass)?
                .iter()
                .any(|ancestor| ancestor.ptr_eq(&class));
        if creates_cycle {
            return Err(RuntimeError::InheritanceCycle {
                class: op.class.clone(),
                superclass: op.superclass.clone(),
            });
        }

        class.write(|class| class.superclass = Some(op.superclass.clone()));
        Ok(Outcome::message(format!(
            "class '{}' now inherits from '{}'",
            op.class, op.superclass
        )))
    }

    fn execute_interface_op(&mut self, op: &InterfaceOp) -> Result<Outcome, RuntimeError> {
        match op {
            InterfaceOp::Create { name, methods } => {
                let interface = Value::Interface(Arc::new(InterfaceDescriptor {
                    name: name.clone(),
                    methods: methods.clone(),
                }));
                self.assign(&Path::simple(name.as_str()), interface.clone())?;
                Ok(Outcome::with_data(
                    format!("created interface '{}' requiring [{}]", name, methods.join(", ")),
                    interface,
                ))
            }
            InterfaceOp::Implement { interface, class } => {
                let required = self.interface_named(interface)?;
                let available = self.resolved_methods(class)?;

                if let Some(missing) = required.methods.iter().find(|method| !available.contains(*method)) {
                    return Err(RuntimeError::ContractViolation {
                        interface: interface.clone(),
                        class: class.clone(),
                        method: missing.clone(),
                    });
                }

                Ok(Outcome::message(format!(
                    "class '{}' implements interface '{}'",
                    class, interface
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::prelude::{ErrorKind, InterpreterConfig, Interpreter, RuntimeError, Value};
    use crate::traits::prelude::CoreOperations;
    use pretty_assertions::assert_eq;

    fn session(script: &str) -> Interpreter {
        let mut it = Interpreter::new(InterpreterConfig::default());
        for result in it.run_batch(script) {
            assert!(result.is_success(), "{}", result);
        }
        it
    }

    #[test]
    fn methods_resolve_through_the_superclass_chain() {
        let mut it = session(
            "Create class Animal with attributes name and sound\n\
             Add method greet to class Animal returns \"I say \" + sound\n\
             Create class Dog that extends Animal\n\
             Add attribute sound with default 'woof' to class Dog\n\
             Create object rex of class Dog",
        );
        let result = it.run_instruction("Call method greet on rex and store the result in line");
        assert!(result.is_success(), "{}", result);
        assert_eq!(it.variable("line"), Some(Value::Str("I say woof".into())));
    }

    #[test]
    fn attributes_fall_back_to_class_defaults() {
        let mut it = session(
            "Create class Point with attributes x and y\n\
             Create object p of class Point\n\
             Set attribute x of p to 3",
        );
        assert_eq!(it.run_instruction("Get attribute x of p").data, Some(Value::Int(3)));
        assert_eq!(it.run_instruction("Get attribute y of p").data, Some(Value::Null));

        it.run_instruction("Add attribute z with default 9 to class Point");
        assert_eq!(it.run_instruction("Get attribute z of p into zz").data, Some(Value::Int(9)));
        assert_eq!(
            it.run_instruction("Get attribute w of p").kind,
            Some(ErrorKind::AttributeNotFound)
        );
    }

    #[test]
    fn interface_checks_use_inherited_methods() {
        let mut it = session(
            "Create interface Speaker with methods [speak]\n\
             Create class Base\n\
             Create class Child that extends Base",
        );
        let result = it.run_instruction("Implement Speaker in Child");
        assert_eq!(result.kind, Some(ErrorKind::ContractViolation));
        assert!(result.message.contains("'speak'"));

        it.run_instruction("Add method speak to class Base returns 'hi'");
        assert!(it.run_instruction("Implement Speaker in Child").is_success());
    }

    #[test]
    fn inheritance_rejects_missing_superclasses_and_cycles() {
        let mut it = session("Create class A\nCreate class B that extends A");
        assert_eq!(
            it.run_instruction("Make class A inherit from Z").kind,
            Some(ErrorKind::SuperclassNotFound)
        );
        assert_eq!(
            it.run_instruction("Make class A inherit from B").kind,
            Some(ErrorKind::InheritanceCycle)
        );
        assert_eq!(
            it.run_instruction("Create class C that extends Missing").kind,
            Some(ErrorKind::SuperclassNotFound)
        );
    }

    #[test]
    fn objects_keep_the_class_they_were_created_from() {
        let mut it = session(
            "Create class A\n\
             Add method m to class A returns 1\n\
             Create object o of class A\n\
             Create class A",
        );
        let result = it.run_instruction("Call method m on o");
        assert!(result.is_success(), "{}", result);
        assert_eq!(result.data, Some(Value::Int(1)));

        assert!(it.run_instruction("Create object fresh of class A").is_success());
        assert_eq!(
            it.run_instruction("Call method m on fresh").kind,
            Some(ErrorKind::MethodNotFound)
        );
    }

    #[test]
    fn unknown_classes_and_methods() {
        let mut it = session("Create class Empty\nCreate object e of class Empty");
        assert_eq!(
            it.run_instruction("Create object g of class Ghost").kind,
            Some(ErrorKind::ClassNotFound)
        );
        let result = it.run_instruction("Call method fly on e");
        assert_eq!(result.kind, Some(ErrorKind::MethodNotFound));
        assert_eq!(
            result.message,
            RuntimeError::MethodNotFound {
                class: "Empty".into(),
                method: "fly".into()
            }
            .to_string()
        );
    }
}
