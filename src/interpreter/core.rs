use crate::ast::prelude::Operation;
use crate::interpreter::prelude::{
    Environment, ExecutionResult, Facilities, FunctionRegistry, Interpreter, InterpreterConfig,
    Outcome, RuntimeError,
};
use crate::parser::prelude::{split_instructions, InstructionParser, ParseError};
use crate::shared::SharedMut;
use crate::traits::prelude::{CancellationCheck, CoreOperations, IntentRecognizer, OperationExecutor};
use std::sync::Arc;
use std::time::Instant;
use string_interner::{DefaultStringInterner, DefaultSymbol as Symbol};

const INSTRUCTION_ENTITY: &str = "instruction";

impl CoreOperations for Interpreter {
    fn new(config: InterpreterConfig) -> Self {
        Interpreter {
            interner: SharedMut::new(DefaultStringInterner::new()),
            environment: SharedMut::new(Environment::new()),
            functions: FunctionRegistry::new(),
            parser: InstructionParser::new(),
            config,
            facilities: Facilities::default(),
            cancellation: None,
            intent_recognizer: None,
            deadline: None,
        }
    }

    fn run_instruction(&mut self, text: &str) -> ExecutionResult {
        let span = tracing::debug_span!("run_instruction", instruction = %text);
        let _enter = span.enter();

        let result = ExecutionResult::from(self.execute(text));
        match result.kind {
            Some(kind) => tracing::debug!(%kind, message = %result.message, "instruction failed"),
            None => tracing::debug!("instruction succeeded"),
        }
        result
    }

    fn run_batch(&mut self, source: &str) -> Vec<ExecutionResult> {
        split_instructions(source)
            .into_iter()
            .map(|line| self.run_instruction(line.text))
            .collect()
    }

    /// Parses and runs one sentence. The per-instruction deadline starts
    /// here, so nested loops share a single budget.
    fn execute(&mut self, text: &str) -> Result<Outcome, RuntimeError> {
        self.deadline = self.config.timeout.map(|timeout| Instant::now() + timeout);
        let operation = self.parse_instruction(text)?;
        tracing::trace!(kind = %operation.kind(), "parsed instruction");
        let outcome = self.execute_operation(&operation);
        self.deadline = None;
        outcome
    }

    fn intern_string(&self, s: &str) -> Symbol {
        self.interner.write(|interner| interner.get_or_intern(s))
    }
}

impl Interpreter {
    pub fn with_cancellation(mut self, check: Arc<dyn CancellationCheck>) -> Self {
        self.cancellation = Some(check);
        self
    }

    pub fn with_intent_recognizer(mut self, recognizer: impl IntentRecognizer + 'static) -> Self {
        self.intent_recognizer = Some(Box::new(recognizer));
        self
    }

    pub fn with_parser(mut self, parser: InstructionParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Runs the instruction parser and, when it fails, offers the text to
    /// the installed intent recognizer. A rewrite is used only when it is
    /// confident enough and itself parses; otherwise the original parse
    /// error is returned.
    pub fn parse_instruction(&self, text: &str) -> Result<Operation, ParseError> {
        let error = match self.parser.parse(text) {
            Ok(operation) => return Ok(operation),
            Err(error) => error,
        };
        let Some(recognizer) = &self.intent_recognizer else {
            return Err(error);
        };

        let intent = recognizer.recognize(text);
        if intent.confidence < self.config.intent_threshold {
            tracing::debug!(
                intent = %intent.primary_intent,
                confidence = intent.confidence,
                "intent below threshold"
            );
            return Err(error);
        }

        match intent.entities.get(INSTRUCTION_ENTITY) {
            Some(rewrite) => {
                tracing::debug!(intent = %intent.primary_intent, %rewrite, "using recognized intent");
                self.parser.parse(rewrite).map_err(|_| error)
            }
            None => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::prelude::{CancellationToken, ErrorKind, Value};
    use crate::traits::prelude::Intent;
    use std::collections::HashMap;
    use std::time::Duration;

    struct Rewriter;

    impl IntentRecognizer for Rewriter {
        fn recognize(&self, text: &str) -> Intent {
            let (confidence, instruction) = match text {
                "make x five please" => (0.9, "Set x to 5"),
                "maybe y" => (0.2, "Set y to 1"),
                _ => (0.0, ""),
            };
            Intent {
                primary_intent: "assign".into(),
                confidence,
                entities: HashMap::from([(INSTRUCTION_ENTITY.to_string(), instruction.to_string())]),
            }
        }
    }

    #[test]
    fn batches_continue_after_failures() {
        let mut it = Interpreter::new(InterpreterConfig::default());
        let results = it.run_batch("Set a to 1\nGet ghost\n# comment\n\nSet b to 2; Get b");

        assert_eq!(results.len(), 4);
        assert_eq!(results[1].kind, Some(ErrorKind::UndefinedVariable));
        assert_eq!(results[3].data, Some(Value::Int(2)));
    }

    #[test]
    fn gibberish_is_unrecognized() {
        let mut it = Interpreter::new(InterpreterConfig::default());
        let result = it.run_instruction("Frobnicate the widget");
        assert_eq!(result.kind, Some(ErrorKind::UnrecognizedInstruction));
    }

    #[test]
    fn confident_intents_rewrite_unparsed_text() {
        let mut it = Interpreter::new(InterpreterConfig::default()).with_intent_recognizer(Rewriter);

        assert!(it.run_instruction("make x five please").is_success());
        assert_eq!(it.variable("x"), Some(Value::Int(5)));

        let result = it.run_instruction("maybe y");
        assert_eq!(result.kind, Some(ErrorKind::UnrecognizedInstruction));
        assert_eq!(it.variable("y"), None);
    }

    #[test]
    fn cancelled_token_stops_loops() {
        let token = CancellationToken::new();
        let mut it = Interpreter::new(InterpreterConfig::default())
            .with_cancellation(Arc::new(token.clone()));
        it.run_batch("Set n to 0\nSet one to 1");

        token.cancel();
        let result = it.run_instruction("While n is less than 10, add one to n");
        assert_eq!(result.kind, Some(ErrorKind::Cancelled));
        assert_eq!(it.variable("n"), Some(Value::Int(0)));

        token.reset();
        assert!(it.run_instruction("While n is less than 10, add one to n").is_success());
        assert_eq!(it.variable("n"), Some(Value::Int(10)));
    }

    #[test]
    fn deadline_bounds_each_instruction() {
        let config = InterpreterConfig::default()
            .with_max_loop_iterations(u64::MAX)
            .with_timeout(Duration::from_millis(20));
        let mut it = Interpreter::new(config);
        it.run_batch("Set n to 1\nSet one to 1");

        let result = it.run_instruction("While n is greater than 0, add one to n");
        assert_eq!(result.kind, Some(ErrorKind::Cancelled));
        assert!(it.run_instruction("Get n").is_success());
    }
}
