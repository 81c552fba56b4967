use backend::{
    api::LweArrayAlloc,
    layouts::{
        Backend, DataMut, DataRef, DeviceBuf, ExecutionContext, LweArray, Module, SchemeParameters, ServerKeys, Torus,
    },
};

use crate::{
    RadixModule, WORD_BYTES,
    ciphertext::scalar_digits,
    comparison::{AreAllBlocksTrueBuffer, BooleanFold},
    lut::{Owned, RadixLut, Reused, ScalarDigit},
    parameters::assert_bivariate_capacity,
};

/// Block-wise `==` (or `!=`) followed by a boolean fold.
pub struct EqualityBuffer<B: Backend> {
    num_blocks: usize,
    operator: RadixLut<B>,
    scalar: RadixLut<B, Reused>,
    states: LweArray<DeviceBuf<B>>,
    fold: AreAllBlocksTrueBuffer<B>,
}

impl<B: Backend> EqualityBuffer<B> {
    /// `equal` selects `==` with an all-true fold, otherwise `!=` with an
    /// any-true fold.
    pub fn alloc(
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        params: &SchemeParameters,
        num_blocks: usize,
        equal: bool,
    ) -> Self
    where
        Module<B>: RadixModule<B>,
    {
        assert!(num_blocks > 0, "equality over zero blocks");
        assert_bivariate_capacity(params);
        let m: u64 = params.message_modulus.0;

        let mut operator: RadixLut<B> = RadixLut::alloc(module, ctx, params, 1, num_blocks);
        operator.generate_bivariate(module, ctx, 0, |x, y| ((x == y) == equal) as u64);

        let mut scalar: RadixLut<B, Reused> =
            RadixLut::alloc_reusing(module, ctx, params, m as usize, num_blocks, &operator);
        for d in 0..m {
            scalar.generate_univariate(module, ctx, ScalarDigit(d), |x| ((x == d) == equal) as u64);
        }

        let fold: BooleanFold = if equal { BooleanFold::All } else { BooleanFold::Any };
        Self {
            num_blocks,
            operator,
            scalar,
            states: module.lwe_array_alloc(params.big_lwe_dimension(), num_blocks),
            fold: AreAllBlocksTrueBuffer::alloc(module, ctx, params, num_blocks, fold),
        }
    }

    pub fn alloc_bytes(module: &Module<B>, params: &SchemeParameters, num_blocks: usize, equal: bool) -> usize
    where
        Module<B>: RadixModule<B>,
    {
        let fold: BooleanFold = if equal { BooleanFold::All } else { BooleanFold::Any };
        RadixLut::<B, Owned<B>>::alloc_bytes(module, params, 1, num_blocks)
            + RadixLut::<B, Reused>::alloc_reusing_bytes(params, params.message_modulus.0 as usize, num_blocks)
            + LweArray::<Vec<Torus>>::alloc_words(params.big_lwe_dimension(), num_blocks) * WORD_BYTES
            + AreAllBlocksTrueBuffer::alloc_bytes(module, params, num_blocks, fold)
    }

    pub fn release(self, module: &Module<B>)
    where
        Module<B>: RadixModule<B>,
    {
        self.scalar.release(module);
        self.operator.release(module);
        module.lwe_array_release(self.states);
        self.fold.release(module);
    }

    pub fn equal<R, A, C>(
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
        self.operator
            .apply_bivariate(module, ctx, &mut self.states, lhs, rhs, keys);
        self.fold.reduce(module, ctx, res, &mut self.states, keys);
    }

    pub fn equal_scalar<R, A>(
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
        let digits: Vec<ScalarDigit> = scalar_digits(self.scalar.params(), scalar, self.num_blocks)
            .into_iter()
            .map(ScalarDigit)
            .collect();
        self.scalar.set_selectors(module, ctx, &digits);
        self.scalar
            .apply_univariate_with(module, ctx, self.operator.workspace_mut(), &mut self.states, lhs, keys);
        self.fold.reduce(module, ctx, res, &mut self.states, keys);
    }
}
