pub use super::classes::InterpreterClasses;
pub use super::containers::ContainerOperations;
pub use super::control::ControlFlow;
pub use super::core::CoreOperations;
pub use super::expression::ExpressionEvaluator;
pub use super::external::{
    CancellationCheck, FacilityError, IOFacility, Intent, IntentRecognizer, NetworkFacility,
    ProcessFacility, SystemCommandFacility,
};
pub use super::facilities::FacilityDispatch;
pub use super::functions::InterpreterFunctions;
pub use super::json::JsonParsable;
pub use super::statement::OperationExecutor;
pub use super::value::ValueOperations;
