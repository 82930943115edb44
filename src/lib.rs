//! fieldguard - request-data validation with declarative schemas
//!
//! Required paths, optional exemptions, schema rules and custom validator
//! functions, merged into one normalized error list.

pub mod cli;
pub mod core;
pub mod schema;
pub mod validation;
