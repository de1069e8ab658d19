use std::time::Duration;

const DEFAULT_MAX_LOOP_ITERATIONS: u64 = 100_000;
const DEFAULT_INTENT_THRESHOLD: f64 = 0.5;
const DEFAULT_MAX_LIST_PADDING: usize = 10_000;
const DEFAULT_MAX_STRING_LENGTH: usize = 1 << 24;

/// Limits and thresholds for one interpreter session.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpreterConfig {
    /// Iterations a single loop may run before it is cancelled.
    pub max_loop_iterations: u64,
    /// Wall-clock budget for one top-level instruction.
    pub timeout: Option<Duration>,
    /// Minimum confidence for an intent recognizer's rewrite to be used.
    pub intent_threshold: f64,
    /// Null slots an indexed assignment may add past the end of a list.
    pub max_list_padding: usize,
    /// Largest string, in bytes, that repeating a string may produce.
    pub max_string_length: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_loop_iterations: DEFAULT_MAX_LOOP_ITERATIONS,
            timeout: None,
            intent_threshold: DEFAULT_INTENT_THRESHOLD,
            max_list_padding: DEFAULT_MAX_LIST_PADDING,
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
        }
    }
}

impl InterpreterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_loop_iterations(mut self, max_loop_iterations: u64) -> Self {
        self.max_loop_iterations = max_loop_iterations;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_intent_threshold(mut self, threshold: f64) -> Self {
        self.intent_threshold = threshold;
        self
    }

    pub fn with_max_list_padding(mut self, max_list_padding: usize) -> Self {
        self.max_list_padding = max_list_padding;
        self
    }

    pub fn with_max_string_length(mut self, max_string_length: usize) -> Self {
        self.max_string_length = max_string_length;
        self
    }
}
