pub mod cancellation;
pub mod classes;
pub mod config;
pub mod containers;
pub mod control;
pub mod core;
pub mod environment;
pub mod errors;
pub mod expressions;
pub mod facilities;
pub mod functions;
pub mod operations;
pub mod prelude;
pub mod result;
pub mod statements;
pub mod structs;
pub mod value;
