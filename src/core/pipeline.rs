//! Operation Pipeline
//!
//! Stages run in registration order. A stage either rejects the operation
//! or hands it on through `Next`; the executor only sees operations every
//! stage let through.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::context::RequestContext;
use super::error::CoreResult;
use super::middleware::Middleware;
use super::operation::Operation;

/// Result of an operation
pub type OperationResult = CoreResult<Value>;

/// Future returned by pipeline stages and executors
pub type StageFuture<'a> = Pin<Box<dyn Future<Output = OperationResult> + Send + 'a>>;

/// Final stage: stores or otherwise applies an accepted operation
pub trait OperationExecutor: Send + Sync {
    fn execute<'a>(&'a self, op: &'a Operation, ctx: &'a RequestContext) -> StageFuture<'a>;
}

/// Remaining stages of one pipeline run
pub struct Next<'a> {
    stages: &'a [Arc<dyn Middleware>],
    executor: &'a dyn OperationExecutor,
}

impl<'a> Next<'a> {
    /// Hand the operation to the next stage, or to the executor after the last one
    pub fn run(self, op: &'a Operation, ctx: &'a mut RequestContext) -> StageFuture<'a> {
        match self.stages.split_first() {
            Some((stage, rest)) => {
                let next = Next {
                    stages: rest,
                    executor: self.executor,
                };
                stage.process(op, ctx, next)
            }
            None => self.executor.execute(op, ctx),
        }
    }
}

/// Middleware stages in front of an executor
pub struct Pipeline {
    stages: Vec<Arc<dyn Middleware>>,
    executor: Arc<dyn OperationExecutor>,
}

impl Pipeline {
    pub fn new(executor: impl OperationExecutor + 'static) -> Self {
        Self {
            stages: Vec::new(),
            executor: Arc::new(executor),
        }
    }

    /// Append a stage; stages run in the order they were added
    pub fn with_middleware(mut self, stage: impl Middleware + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    /// Run `op` through every stage.
    ///
    /// The context stays with the caller, so errors bound by the validation
    /// stage can be read after a rejection.
    pub async fn execute(&self, op: &Operation, ctx: &mut RequestContext) -> OperationResult {
        debug!(
            request_id = %ctx.request_id,
            op = op.name(),
            collection = op.collection(),
            stages = self.stages.len(),
            "running pipeline"
        );
        let next = Next {
            stages: &self.stages,
            executor: self.executor.as_ref(),
        };
        next.run(op, ctx).await
    }
}
