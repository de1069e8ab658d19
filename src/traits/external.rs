//! Collaborators the interpreter talks to but never implements itself.
//! The interpreter only builds a request and forwards it; permission
//! checks and sandboxing are the implementor's job.

use crate::interpreter::prelude::Value;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{0}")]
pub struct FacilityError(pub String);

impl FacilityError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub trait IOFacility {
    fn open(&self, path: &str) -> Result<Value, FacilityError>;
    fn read(&self, path: &str) -> Result<Value, FacilityError>;
    fn write(&self, path: &str, content: &Value) -> Result<Value, FacilityError>;
    fn close(&self, path: &str) -> Result<Value, FacilityError>;
    fn list(&self, directory: &str) -> Result<Value, FacilityError>;
}

pub trait ProcessFacility {
    fn start(&self, name: &str) -> Result<Value, FacilityError>;
    fn stop(&self, name: &str) -> Result<Value, FacilityError>;
    fn list(&self) -> Result<Value, FacilityError>;
}

pub trait NetworkFacility {
    /// Performs `method` (`GET`, `POST`, `PUT`, `DELETE`) against `url` and
    /// returns the decoded response body.
    fn request(
        &self,
        method: &str,
        url: &str,
        payload: Option<JsonValue>,
    ) -> Result<JsonValue, FacilityError>;
}

pub trait SystemCommandFacility {
    fn run(&self, command: &str) -> Result<Value, FacilityError>;
}

/// Output of a free-form text classifier.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Intent {
    pub primary_intent: String,
    pub confidence: f64,
    pub entities: HashMap<String, String>,
}

pub trait IntentRecognizer {
    fn recognize(&self, text: &str) -> Intent;
}

pub trait CancellationCheck: Send + Sync {
    fn is_cancelled(&self) -> bool;
}
