use crate::{
    implementation::cpu_ref::CpuRef,
    layouts::{ExecutionContext, Module},
    oep::{ContextCreateImpl, ContextJoinImpl, ContextSynchronizeImpl},
};

unsafe impl ContextCreateImpl<Self> for CpuRef {
    fn create_context_impl(module: &Module<Self>, id: u64) -> ExecutionContext<Self> {
        ExecutionContext::from_parts(id, module.device_id())
    }

    fn destroy_context_impl(_module: &Module<Self>, ctx: ExecutionContext<Self>) {
        tracing::trace!(ctx = ctx.id(), "context destroyed");
    }
}

// Kernels complete before returning, so there is never pending work.
unsafe impl ContextSynchronizeImpl<Self> for CpuRef {
    fn synchronize_impl(_module: &Module<Self>, _ctx: &ExecutionContext<Self>) {}
}

unsafe impl ContextJoinImpl<Self> for CpuRef {
    fn join_impl<FA, FB, RA, RB>(
        _module: &Module<Self>,
        ctx_a: &ExecutionContext<Self>,
        ctx_b: &ExecutionContext<Self>,
        fa: FA,
        fb: FB,
    ) -> (RA, RB)
    where
        FA: FnOnce(&ExecutionContext<Self>) -> RA + Send,
        FB: FnOnce(&ExecutionContext<Self>) -> RB + Send,
        RA: Send,
        RB: Send,
    {
        rayon::join(|| fa(ctx_a), || fb(ctx_b))
    }
}
