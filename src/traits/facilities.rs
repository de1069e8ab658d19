use crate::ast::prelude::ExternalRequest;
use crate::interpreter::prelude::{Outcome, RuntimeError};

pub trait FacilityDispatch {
    /// Forwards a side-effect request to the installed collaborator and
    /// stores its answer when the request names a variable.
    fn execute_external(&mut self, request: &ExternalRequest) -> Result<Outcome, RuntimeError>;
}
