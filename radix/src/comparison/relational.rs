use backend::{
    api::{ContextCreate, ContextJoin, ContextSynchronize, LweAddEncodedInplace, LweArrayAlloc, LwePackPairs, LweSub},
    layouts::{
        Backend, DataMut, DataRef, DeviceBuf, ExecutionContext, LweArray, Module, SchemeParameters, ServerKeys, Torus,
    },
};

use crate::{
    RadixModule, WORD_BYTES,
    ciphertext::scalar_digits,
    comparison::BlockOrdering,
    lut::{Owned, RadixLut, Reused, ScalarDigit},
    parameters::assert_bivariate_capacity,
    reduction::{CombineRule, TreeReductionBuffer},
};

/// Per-block ordering of two operands, folded from the most significant
/// difference.
///
/// Digits are first packed two per block (`x[2i+1] * M + x[2i]`), halving the
/// number of bootstraps. The difference of two packed blocks goes through a
/// sign table; negative differences cross the padding bit and come back
/// negated, so `sign + 1` lands in `{INFERIOR, EQUAL, SUPERIOR}`.
pub struct DifferenceBuffer<B: Backend> {
    params: SchemeParameters,
    num_blocks: usize,
    packed: LweArray<DeviceBuf<B>>,
    cleaned: LweArray<DeviceBuf<B>>,
    clean_lhs: RadixLut<B>,
    clean_rhs: RadixLut<B>,
    sign: RadixLut<B, Reused>,
    scalar_sign: RadixLut<B, Reused>,
    states: LweArray<DeviceBuf<B>>,
    ones: Vec<Torus>,
    reduction: TreeReductionBuffer<B>,
    lhs_ctx: ExecutionContext<B>,
    rhs_ctx: ExecutionContext<B>,
}

fn ordering_of(x: u64, y: u64) -> u64 {
    match x.cmp(&y) {
        std::cmp::Ordering::Less => BlockOrdering::Inferior as u64,
        std::cmp::Ordering::Equal => BlockOrdering::Equal as u64,
        std::cmp::Ordering::Greater => BlockOrdering::Superior as u64,
    }
}

/// Scalar digits packed two per block, as the operand blocks are.
fn packed_scalar_digits(params: &SchemeParameters, scalar: u128, num_blocks: usize) -> Vec<ScalarDigit> {
    let m: u64 = params.message_modulus.0;
    scalar_digits(params, scalar, num_blocks)
        .chunks(2)
        .map(|pair| ScalarDigit(pair.get(1).map_or(0, |msb| msb * m) + pair[0]))
        .collect()
}

impl<B: Backend> DifferenceBuffer<B> {
    /// `finish` maps the folded ordering to the value written to the output.
    pub fn alloc<F>(
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        params: &SchemeParameters,
        num_blocks: usize,
        finish: F,
    ) -> Self
    where
        Module<B>: RadixModule<B>,
        F: Fn(u64) -> u64,
    {
        assert!(num_blocks > 0, "comparison over zero blocks");
        assert_bivariate_capacity(params);
        let m: u64 = params.message_modulus.0;
        let pairs: usize = num_blocks.div_ceil(2);
        let dim: usize = params.big_lwe_dimension();

        let mut clean_lhs: RadixLut<B> = RadixLut::alloc(module, ctx, params, 1, pairs);
        clean_lhs.generate_univariate(module, ctx, 0, |x| x);
        let mut clean_rhs: RadixLut<B> = RadixLut::alloc(module, ctx, params, 1, pairs);
        clean_rhs.generate_univariate(module, ctx, 0, |x| x);

        let mut sign: RadixLut<B, Reused> = RadixLut::alloc_reusing(module, ctx, params, 1, pairs, &clean_lhs);
        sign.generate_univariate(module, ctx, 0, |x| (x != 0) as u64);

        let scalars: u64 = m * m;
        let mut scalar_sign: RadixLut<B, Reused> =
            RadixLut::alloc_reusing(module, ctx, params, scalars as usize, pairs, &clean_lhs);
        for s in 0..scalars {
            scalar_sign.generate_univariate(module, ctx, ScalarDigit(s), |x| ordering_of(x, s));
        }

        tracing::debug!(num_blocks, pairs, "difference buffer");
        Self {
            params: *params,
            num_blocks,
            packed: module.lwe_array_alloc(dim, 2 * pairs),
            cleaned: module.lwe_array_alloc(dim, 2 * pairs),
            clean_lhs,
            clean_rhs,
            sign,
            scalar_sign,
            states: module.lwe_array_alloc(dim, pairs),
            ones: vec![params.encode(1); pairs],
            reduction: TreeReductionBuffer::alloc(module, ctx, params, pairs, CombineRule::ORDERING, finish),
            lhs_ctx: module.create_context(),
            rhs_ctx: module.create_context(),
        }
    }

    pub fn alloc_bytes(module: &Module<B>, params: &SchemeParameters, num_blocks: usize) -> usize
    where
        Module<B>: RadixModule<B>,
    {
        let m: usize = params.message_modulus.0 as usize;
        let pairs: usize = num_blocks.div_ceil(2);
        2 * RadixLut::<B, Owned<B>>::alloc_bytes(module, params, 1, pairs)
            + RadixLut::<B, Reused>::alloc_reusing_bytes(params, 1, pairs)
            + RadixLut::<B, Reused>::alloc_reusing_bytes(params, m * m, pairs)
            + LweArray::<Vec<Torus>>::alloc_words(params.big_lwe_dimension(), 5 * pairs) * WORD_BYTES
            + TreeReductionBuffer::alloc_bytes(module, params, pairs)
    }

    pub fn params(&self) -> &SchemeParameters {
        &self.params
    }

    pub fn release(self, module: &Module<B>)
    where
        Module<B>: RadixModule<B>,
    {
        self.sign.release(module);
        self.scalar_sign.release(module);
        self.clean_lhs.release(module);
        self.clean_rhs.release(module);
        for array in [self.packed, self.cleaned, self.states] {
            module.lwe_array_release(array);
        }
        self.reduction.release(module);
        module.destroy_context(self.lhs_ctx);
        module.destroy_context(self.rhs_ctx);
    }

    /// Writes `finish(ordering(lhs, rhs))` into the single block of `res`.
    pub fn ordering<R, A, C>(
        &mut self,
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        res: &mut LweArray<R>,
        lhs: &LweArray<A>,
        rhs: &LweArray<C>,
        keys: &ServerKeys<B>,
    ) where
        Module<B>: RadixModule<B>,
        R: DataMut,
        A: DataRef,
        C: DataRef,
    {
        assert_eq!(lhs.count(), self.num_blocks, "lhs holds {} blocks", lhs.count());
        assert_eq!(rhs.count(), self.num_blocks, "rhs holds {} blocks", rhs.count());

        let m: u64 = self.params.message_modulus.0;
        let pairs: usize = self.states.count();
        let DifferenceBuffer {
            packed,
            cleaned,
            clean_lhs,
            clean_rhs,
            sign,
            states,
            ones,
            reduction,
            lhs_ctx,
            rhs_ctx,
            ..
        } = self;

        let (mut packed_lhs, mut packed_rhs) = packed.split_at_mut(pairs);
        let (mut cleaned_lhs, mut cleaned_rhs) = cleaned.split_at_mut(pairs);

        // the operands are prepared independently
        module.synchronize(ctx);
        module.join(
            lhs_ctx,
            rhs_ctx,
            |c| {
                module.lwe_pack_pairs(c, &mut packed_lhs, lhs, m);
                clean_lhs.apply_univariate(module, c, &mut cleaned_lhs, &packed_lhs, keys);
            },
            |c| {
                module.lwe_pack_pairs(c, &mut packed_rhs, rhs, m);
                clean_rhs.apply_univariate(module, c, &mut cleaned_rhs, &packed_rhs, keys);
            },
        );

        module.lwe_sub(ctx, states, &cleaned_lhs, &cleaned_rhs);
        sign.apply_univariate_inplace_with(module, ctx, clean_lhs.workspace_mut(), states, keys);
        module.lwe_add_encoded_inplace(ctx, states, ones);
        reduction.reduce(module, ctx, res, states, keys);
    }

    /// Writes `finish(ordering(lhs, scalar))` into the single block of `res`.
    pub fn ordering_scalar<R, A>(
        &mut self,
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        res: &mut LweArray<R>,
        lhs: &LweArray<A>,
        scalar: u128,
        keys: &ServerKeys<B>,
    ) where
        Module<B>: RadixModule<B>,
        R: DataMut,
        A: DataRef,
    {
        assert_eq!(lhs.count(), self.num_blocks, "lhs holds {} blocks", lhs.count());

        let m: u64 = self.params.message_modulus.0;
        let pairs: usize = self.states.count();
        let digits: Vec<ScalarDigit> = packed_scalar_digits(&self.params, scalar, self.num_blocks);
        self.scalar_sign.set_selectors(module, ctx, &digits);

        let mut packed_lhs: LweArray<&mut [Torus]> = self.packed.range_mut(0, pairs);
        module.lwe_pack_pairs(ctx, &mut packed_lhs, lhs, m);
        // the table already holds the ordering against each packed scalar digit
        self.scalar_sign.apply_univariate_with(
            module,
            ctx,
            self.clean_lhs.workspace_mut(),
            &mut self.states,
            &packed_lhs,
            keys,
        );
        self.reduction.reduce(module, ctx, res, &mut self.states, keys);
    }
}
