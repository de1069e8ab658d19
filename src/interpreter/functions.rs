use crate::ast::prelude::{FunctionDefinition, Path};
use crate::interpreter::prelude::{
    Environment, FunctionDescriptor, FunctionRegistry, Interpreter, RuntimeError, Value,
};
use crate::shared::SharedMut;
use crate::traits::prelude::{CoreOperations, ExpressionEvaluator, InterpreterFunctions};
use std::sync::Arc;
use string_interner::DefaultSymbol as Symbol;

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `function`, returning the definition it replaced.
    pub fn define(
        &mut self,
        name: Symbol,
        function: Arc<FunctionDescriptor>,
    ) -> Option<Arc<FunctionDescriptor>> {
        self.functions.insert(name, function)
    }

    pub fn get(&self, name: &Symbol) -> Option<Arc<FunctionDescriptor>> {
        self.functions.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl InterpreterFunctions for Interpreter {
    fn define_function(&mut self, definition: &FunctionDefinition) -> Arc<FunctionDescriptor> {
        let function = Arc::new(FunctionDescriptor {
            name: definition.name.clone(),
            params: definition.params.clone(),
            body: definition.body.clone(),
            source: definition.source.clone(),
        });
        let symbol = self.intern_string(&definition.name);
        if self.functions.define(symbol, Arc::clone(&function)).is_some() {
            tracing::debug!(name = %definition.name, "function redefined");
        }
        function
    }

    /// Registry first, then a variable bound to a function value.
    fn lookup_function(&self, name: &str) -> Result<Arc<FunctionDescriptor>, RuntimeError> {
        let registered = self
            .interner
            .read(|interner| interner.get(name))
            .and_then(|symbol| self.functions.get(&symbol));
        if let Some(function) = registered {
            return Ok(function);
        }

        match self.lookup(&Path::simple(name)) {
            Ok(Value::Function(function)) => Ok(function),
            _ => Err(RuntimeError::UndefinedFunction(name.to_string())),
        }
    }

    fn call_function(&self, name: &str, arguments: Vec<Value>) -> Result<Value, RuntimeError> {
        let function = self.lookup_function(name)?;
        let scope = Environment::with_parent(self.environment.clone());
        self.invoke(&function, arguments, scope)
    }

    /// Binds `arguments` positionally into `scope` and evaluates the body
    /// there. The arity must match exactly.
    fn invoke(
        &self,
        function: &FunctionDescriptor,
        arguments: Vec<Value>,
        mut scope: Environment,
    ) -> Result<Value, RuntimeError> {
        if arguments.len() != function.params.len() {
            return Err(RuntimeError::ArityMismatch {
                name: function.name.clone(),
                expected: function.params.len(),
                found: arguments.len(),
            });
        }

        for (param, argument) in function.params.iter().zip(arguments) {
            scope.define(self.intern_string(param), argument);
        }

        let scope = SharedMut::new(scope);
        self.evaluate_expression(&function.body, &scope)
            .map_err(|e| e.nested(format!("in '{}'", function.name)))
    }
}
