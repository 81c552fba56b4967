use crate::layouts::{Backend, ExecutionContext, Module};

/// # THIS TRAIT IS AN OPEN EXTENSION POINT (unsafe)
/// * See [crate::api::ContextCreate] for corresponding public API.
/// * `id` has already been recorded in the module ledger and must be carried
///   by the returned context.
/// * Destruction must wait for pending work on the context.
pub unsafe trait ContextCreateImpl<B: Backend> {
    fn create_context_impl(module: &Module<B>, id: u64) -> ExecutionContext<B>;
    fn destroy_context_impl(module: &Module<B>, ctx: ExecutionContext<B>);
}

/// # THIS TRAIT IS AN OPEN EXTENSION POINT (unsafe)
/// * See [crate::api::ContextSynchronize] for corresponding public API.
pub unsafe trait ContextSynchronizeImpl<B: Backend> {
    fn synchronize_impl(module: &Module<B>, ctx: &ExecutionContext<B>);
}

/// # THIS TRAIT IS AN OPEN EXTENSION POINT (unsafe)
/// * See [crate::api::ContextJoin] for corresponding public API.
/// * Both contexts must be synchronized before returning.
pub unsafe trait ContextJoinImpl<B: Backend> {
    fn join_impl<FA, FB, RA, RB>(
        module: &Module<B>,
        ctx_a: &ExecutionContext<B>,
        ctx_b: &ExecutionContext<B>,
        fa: FA,
        fb: FB,
    ) -> (RA, RB)
    where
        FA: FnOnce(&ExecutionContext<B>) -> RA + Send,
        FB: FnOnce(&ExecutionContext<B>) -> RB + Send,
        RA: Send,
        RB: Send;
}
