use backend::{
    api::{ContextCreate, ContextJoin, ContextSynchronize, LweAdd, LweArrayAlloc},
    layouts::{
        Backend, DataMut, DataRef, DeviceBuf, ExecutionContext, LweArray, Module, SchemeParameters, ServerKeys, Torus,
    },
};

use crate::{
    RadixCiphertext, RadixModule, WORD_BYTES,
    lut::{Owned, RadixLut},
    parameters::assert_bivariate_capacity,
};

/// Scratch of [`RadixCiphertext::cmux`].
///
/// Each branch is masked by its own bootstrap on its own execution context;
/// both contexts belong to the buffer.
pub struct CmuxBuffer<B: Backend> {
    num_blocks: usize,
    keep: RadixLut<B>,
    discard: RadixLut<B>,
    true_out: LweArray<DeviceBuf<B>>,
    false_out: LweArray<DeviceBuf<B>>,
    true_ctx: ExecutionContext<B>,
    false_ctx: ExecutionContext<B>,
}

impl<B: Backend> CmuxBuffer<B> {
    /// `predicate` decides, from the plaintext of the condition block, whether
    /// the true branch is selected. The condition must stay below `M`.
    pub fn alloc<P>(
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        params: &SchemeParameters,
        num_blocks: usize,
        predicate: P,
    ) -> Self
    where
        Module<B>: RadixModule<B>,
        P: Fn(u64) -> bool,
    {
        assert!(num_blocks > 0, "cmux over zero blocks");
        params.assert_valid();
        assert_bivariate_capacity(params);
        let mut keep: RadixLut<B> = RadixLut::alloc(module, ctx, params, 1, num_blocks);
        keep.generate_bivariate(module, ctx, 0, |block, cond| if predicate(cond) { block } else { 0 });

        let mut discard: RadixLut<B> = RadixLut::alloc(module, ctx, params, 1, num_blocks);
        discard.generate_bivariate(module, ctx, 0, |block, cond| if predicate(cond) { 0 } else { block });

        tracing::debug!(num_blocks, "cmux buffer");
        Self {
            num_blocks,
            keep,
            discard,
            true_out: module.lwe_array_alloc(params.big_lwe_dimension(), num_blocks),
            false_out: module.lwe_array_alloc(params.big_lwe_dimension(), num_blocks),
            true_ctx: module.create_context(),
            false_ctx: module.create_context(),
        }
    }

    pub fn alloc_bytes(module: &Module<B>, params: &SchemeParameters, num_blocks: usize) -> usize
    where
        Module<B>: RadixModule<B>,
    {
        2 * RadixLut::<B, Owned<B>>::alloc_bytes(module, params, 1, num_blocks)
            + 2 * LweArray::<Vec<Torus>>::alloc_words(params.big_lwe_dimension(), num_blocks) * WORD_BYTES
    }

    pub fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    pub fn release(self, module: &Module<B>)
    where
        Module<B>: RadixModule<B>,
    {
        self.keep.release(module);
        self.discard.release(module);
        module.lwe_array_release(self.true_out);
        module.lwe_array_release(self.false_out);
        module.destroy_context(self.true_ctx);
        module.destroy_context(self.false_ctx);
    }
}

impl<D: DataMut> RadixCiphertext<D> {
    /// `self = if predicate(condition) { if_true } else { if_false }`, block by
    /// block, with `condition` a single block. Both branches must be
    /// canonical; the sum of the masked branches then is too.
    #[tracing::instrument(skip_all, fields(num_blocks = self.num_blocks()))]
    #[allow(clippy::too_many_arguments)]
    pub fn cmux<B, C, T, F>(
        &mut self,
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        condition: &LweArray<C>,
        if_true: &RadixCiphertext<T>,
        if_false: &RadixCiphertext<F>,
        keys: &ServerKeys<B>,
        buf: &mut CmuxBuffer<B>,
    ) where
        B: Backend,
        Module<B>: RadixModule<B>,
        C: DataRef,
        T: DataRef,
        F: DataRef,
    {
        let n: usize = buf.num_blocks;
        assert_eq!(condition.count(), 1, "the condition is a single block");
        assert_eq!(self.num_blocks(), n, "buffer sized for {n} blocks");
        assert_eq!(if_true.num_blocks(), n, "true branch holds {} blocks", if_true.num_blocks());
        assert_eq!(if_false.num_blocks(), n, "false branch holds {} blocks", if_false.num_blocks());

        let CmuxBuffer {
            keep,
            discard,
            true_out,
            false_out,
            true_ctx,
            false_ctx,
            ..
        } = buf;

        // inputs may still be in flight on the caller's context
        module.synchronize(ctx);
        module.join(
            true_ctx,
            false_ctx,
            |c| keep.apply_bivariate(module, c, &mut *true_out, &if_true.blocks, condition, keys),
            |c| discard.apply_bivariate(module, c, &mut *false_out, &if_false.blocks, condition, keys),
        );

        // one side of every block is zero
        module.lwe_add(ctx, &mut self.blocks, true_out, false_out);
    }
}
