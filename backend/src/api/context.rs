use crate::layouts::{Backend, ExecutionContext};

/// Creation and destruction of execution contexts.
pub trait ContextCreate<B: Backend> {
    fn create_context(&self) -> ExecutionContext<B>;

    fn destroy_context(&self, ctx: ExecutionContext<B>);
}

/// Blocks until all work submitted on `ctx` has completed.
pub trait ContextSynchronize<B: Backend> {
    fn synchronize(&self, ctx: &ExecutionContext<B>);
}

/// Runs two independent pieces of work on two contexts and waits for both.
///
/// Both contexts are synchronized before `join` returns, so the caller may
/// consume the results on any context afterwards.
pub trait ContextJoin<B: Backend> {
    fn join<FA, FB, RA, RB>(&self, ctx_a: &ExecutionContext<B>, ctx_b: &ExecutionContext<B>, fa: FA, fb: FB) -> (RA, RB)
    where
        FA: FnOnce(&ExecutionContext<B>) -> RA + Send,
        FB: FnOnce(&ExecutionContext<B>) -> RB + Send,
        RA: Send,
        RB: Send;
}
