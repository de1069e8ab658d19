pub mod prelude;
pub mod value;
pub mod statement;
pub mod expression;
pub mod control;
pub mod core;
pub mod functions;
pub mod classes;
pub mod containers;
pub mod external;
pub mod facilities;
pub mod json;
