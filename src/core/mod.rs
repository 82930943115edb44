//! # Core Module
//!
//! Operation pipeline used to run validation in front of an executor,
//! the way a request-handling stack would.
//!
//! ## Design Principles
//!
//! - Single operation model for all requests
//! - Middleware-based execution pipeline
//! - Validation results bound to the request context

pub mod context;
pub mod error;
pub mod middleware;
pub mod operation;
pub mod pipeline;

pub use context::RequestContext;
pub use error::{CoreError, CoreResult};
pub use middleware::{Middleware, ValidationMiddleware, ValidationRules};
pub use operation::Operation;
pub use pipeline::{Next, OperationExecutor, OperationResult, Pipeline, StageFuture};
