use crate::ast::prelude::{ExternalRequest, Facility};
use crate::interpreter::prelude::{Interpreter, Outcome, RuntimeError, Value};
use crate::traits::prelude::{
    ExpressionEvaluator, FacilityDispatch, FacilityError, IOFacility, JsonParsable,
    NetworkFacility, ProcessFacility, SystemCommandFacility,
};

fn unsupported(facility: Facility, action: &str) -> FacilityError {
    FacilityError::new(format!("{} does not support '{}'", facility, action))
}

impl Interpreter {
    pub fn with_io(mut self, io: impl IOFacility + 'static) -> Self {
        self.facilities.io = Some(Box::new(io));
        self
    }

    pub fn with_process(mut self, process: impl ProcessFacility + 'static) -> Self {
        self.facilities.process = Some(Box::new(process));
        self
    }

    pub fn with_network(mut self, network: impl NetworkFacility + 'static) -> Self {
        self.facilities.network = Some(Box::new(network));
        self
    }

    pub fn with_system_commands(mut self, system: impl SystemCommandFacility + 'static) -> Self {
        self.facilities.system = Some(Box::new(system));
        self
    }

    fn forward(
        &self,
        request: &ExternalRequest,
        payload: Option<Value>,
    ) -> Result<Result<Value, FacilityError>, RuntimeError> {
        let missing = || RuntimeError::FacilityUnavailable(request.facility);
        let target = request.target.as_str();
        let action = request.action.as_str();

        let answer = match request.facility {
            Facility::Io => {
                let io = self.facilities.io.as_ref().ok_or_else(missing)?;
                match action {
                    "open" => io.open(target),
                    "read" => io.read(target),
                    "write" => io.write(target, payload.as_ref().unwrap_or(&Value::Null)),
                    "close" => io.close(target),
                    "list" => io.list(target),
                    other => Err(unsupported(request.facility, other)),
                }
            }
            Facility::Process => {
                let process = self.facilities.process.as_ref().ok_or_else(missing)?;
                match action {
                    "start" => process.start(target),
                    "stop" => process.stop(target),
                    "list" => process.list(),
                    other => Err(unsupported(request.facility, other)),
                }
            }
            Facility::Network => {
                let network = self.facilities.network.as_ref().ok_or_else(missing)?;
                network
                    .request(action, target, payload.as_ref().map(Value::to_json))
                    .map(Value::from_json)
            }
            Facility::SystemCommand => {
                let system = self.facilities.system.as_ref().ok_or_else(missing)?;
                match action {
                    "run" => system.run(target),
                    other => Err(unsupported(request.facility, other)),
                }
            }
        };
        Ok(answer)
    }
}

impl FacilityDispatch for Interpreter {
    fn execute_external(&mut self, request: &ExternalRequest) -> Result<Outcome, RuntimeError> {
        let payload = request
            .payload
            .as_ref()
            .map(|payload| self.resolve_operand(payload, &self.environment))
            .transpose()?;

        tracing::debug!(
            facility = %request.facility,
            action = %request.action,
            target = %request.target,
            "forwarding request"
        );
        let value = self.forward(request, payload)?.map_err(|error| {
            tracing::warn!(facility = %request.facility, %error, "facility request failed");
            RuntimeError::FacilityFailure {
                facility: request.facility,
                message: error.to_string(),
            }
        })?;

        let stored = self.store_result(request.store.as_ref(), &value)?;
        let message = if request.target.is_empty() {
            format!("{} {}{}", request.facility, request.action, stored)
        } else {
            format!("{} {} {}{}", request.facility, request.action, request.target, stored)
        };
        Ok(Outcome::with_data(message, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::prelude::{ErrorKind, InterpreterConfig};
    use crate::traits::prelude::CoreOperations;
    use serde_json::{json, Value as JsonValue};

    struct Echo;

    impl SystemCommandFacility for Echo {
        fn run(&self, command: &str) -> Result<Value, FacilityError> {
            match command {
                "fail" => Err(FacilityError::new("exit status 1")),
                _ => Ok(Value::Str(format!("ran {}", command))),
            }
        }
    }

    struct Api;

    impl NetworkFacility for Api {
        fn request(
            &self,
            method: &str,
            url: &str,
            payload: Option<JsonValue>,
        ) -> Result<JsonValue, FacilityError> {
            Ok(json!({ "method": method, "url": url, "sent": payload }))
        }
    }

    #[test]
    fn missing_facilities_are_reported() {
        let mut it = Interpreter::new(InterpreterConfig::default());
        let result = it.run_instruction("Read file notes.txt");
        assert_eq!(result.kind, Some(ErrorKind::FacilityUnavailable));
        assert_eq!(result.message, "no io facility is installed");
    }

    #[test]
    fn commands_are_forwarded_verbatim() {
        let mut it = Interpreter::new(InterpreterConfig::default()).with_system_commands(Echo);
        let result = it.run_instruction("Run command 'ls -la'");
        assert_eq!(result.data, Some(Value::Str("ran ls -la".into())));

        let result = it.run_instruction("Run command 'fail'");
        assert_eq!(result.kind, Some(ErrorKind::FacilityFailure));
        assert!(result.message.ends_with("exit status 1"));
    }

    #[test]
    fn network_payloads_travel_as_json() {
        let mut it = Interpreter::new(InterpreterConfig::default()).with_network(Api);
        it.run_instruction("Create list body with [1, 2]");
        let result = it.run_instruction(
            "Send POST request to http://localhost/items with payload body into reply",
        );
        assert!(result.is_success(), "{}", result);
        assert_eq!(
            it.variable("reply").map(|reply| reply.to_json()),
            Some(json!({ "method": "POST", "url": "http://localhost/items", "sent": [1, 2] }))
        );
    }
}
