//! Schema subsystem
//!
//! Declarative field rules, the engine that checks data against them, and a
//! loader for schema files.
//!
//! # Design Principles
//!
//! - Schemas are plain data, deserialized from JSON
//! - The engine is a trait; `DocumentEngine` is the default backend
//! - Schemas are passed to the engine anonymously, never registered globally
//! - Validation is deterministic

mod engine;
mod errors;
mod loader;
mod types;

pub use engine::{DocumentEngine, EngineFuture, SchemaEngine};
pub use errors::{EngineError, EngineResult, LoaderError, LoaderResult};
pub use loader::SchemaLoader;
pub use types::{FieldRule, FieldType, Schema, ValidatorRef};
