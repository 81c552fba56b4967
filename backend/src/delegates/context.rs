use crate::{
    api::{ContextCreate, ContextJoin, ContextSynchronize},
    layouts::{Backend, ExecutionContext, Module},
    oep::{ContextCreateImpl, ContextJoinImpl, ContextSynchronizeImpl},
};

impl<B> ContextCreate<B> for Module<B>
where
    B: Backend + ContextCreateImpl<B>,
{
    fn create_context(&self) -> ExecutionContext<B> {
        let id: u64 = self.register_context();
        B::create_context_impl(self, id)
    }

    fn destroy_context(&self, ctx: ExecutionContext<B>) {
        assert_eq!(ctx.device_id(), self.device_id(), "context belongs to another device");
        self.unregister_context();
        B::destroy_context_impl(self, ctx)
    }
}

impl<B> ContextSynchronize<B> for Module<B>
where
    B: Backend + ContextSynchronizeImpl<B>,
{
    fn synchronize(&self, ctx: &ExecutionContext<B>) {
        B::synchronize_impl(self, ctx)
    }
}

impl<B> ContextJoin<B> for Module<B>
where
    B: Backend + ContextJoinImpl<B>,
{
    fn join<FA, FB, RA, RB>(&self, ctx_a: &ExecutionContext<B>, ctx_b: &ExecutionContext<B>, fa: FA, fb: FB) -> (RA, RB)
    where
        FA: FnOnce(&ExecutionContext<B>) -> RA + Send,
        FB: FnOnce(&ExecutionContext<B>) -> RB + Send,
        RA: Send,
        RB: Send,
    {
        assert_ne!(ctx_a.id(), ctx_b.id(), "join requires two distinct contexts");
        B::join_impl(self, ctx_a, ctx_b, fa, fb)
    }
}
