//! Pipeline middleware
//!
//! A stage sees the operation before the executor does. It either rejects
//! it or calls `next.run` to continue.

use super::context::RequestContext;
use super::operation::Operation;
use super::pipeline::{Next, StageFuture};

/// One pipeline stage
pub trait Middleware: Send + Sync {
    fn process<'a>(
        &'a self,
        op: &'a Operation,
        ctx: &'a mut RequestContext,
        next: Next<'a>,
    ) -> StageFuture<'a>;
}

pub mod validate;

pub use validate::{ValidationMiddleware, ValidationRules};
