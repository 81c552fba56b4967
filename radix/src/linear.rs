use backend::{
    api::{LweAdd, LweAddEncodedInplace, LweAddInplace, LweMulScalarInplace, LweNegateInplace},
    layouts::{Backend, DataMut, DataRef, ExecutionContext, Module, SchemeParameters, ServerKeys, Torus},
};

use crate::{CarryPropagationBuffer, RadixCiphertext, RadixModule, scalar_digits};

/// Bodies added by a radix negation: `M - a_0` on block 0, `M - 1 - a_i` above.
fn negation_offsets(params: &SchemeParameters, num_blocks: usize) -> Vec<Torus> {
    let m: u64 = params.message_modulus.0;
    (0..num_blocks)
        .map(|i| params.encode(if i == 0 { m } else { m - 1 }))
        .collect()
}

/// Block-wise operations without bootstrapping. Results may leave digits above
/// `M - 1`; the caller propagates carries before the headroom runs out.
impl<D: DataMut> RadixCiphertext<D> {
    /// `self = lhs + rhs`, digit by digit.
    pub fn add<B, A, C>(
        &mut self,
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        lhs: &RadixCiphertext<A>,
        rhs: &RadixCiphertext<C>,
    ) where
        B: Backend,
        Module<B>: RadixModule<B>,
        A: DataRef,
        C: DataRef,
    {
        assert_eq!(lhs.num_blocks(), rhs.num_blocks(), "operands hold {} and {} blocks", lhs.num_blocks(), rhs.num_blocks());
        assert_eq!(self.num_blocks(), lhs.num_blocks(), "output holds {} blocks", self.num_blocks());
        module.lwe_add(ctx, &mut self.blocks, &lhs.blocks, &rhs.blocks);
    }

    pub fn add_assign<B, A>(&mut self, module: &Module<B>, ctx: &ExecutionContext<B>, rhs: &RadixCiphertext<A>)
    where
        B: Backend,
        Module<B>: RadixModule<B>,
        A: DataRef,
    {
        assert_eq!(self.num_blocks(), rhs.num_blocks(), "operands hold {} and {} blocks", self.num_blocks(), rhs.num_blocks());
        module.lwe_add_inplace(ctx, &mut self.blocks, &rhs.blocks);
    }

    /// Adds the digits of `scalar` to the bodies.
    pub fn add_scalar_inplace<B>(
        &mut self,
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        params: &SchemeParameters,
        scalar: u128,
    ) where
        B: Backend,
        Module<B>: RadixModule<B>,
    {
        let encoded: Vec<Torus> = scalar_digits(params, scalar, self.num_blocks())
            .into_iter()
            .map(|d| params.encode(d))
            .collect();
        module.lwe_add_encoded_inplace(ctx, &mut self.blocks, &encoded);
    }

    /// Multiplies every digit by `scalar`. Clean digits times `scalar` must
    /// stay below `M * C`.
    pub fn mul_small_scalar_inplace<B>(
        &mut self,
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        params: &SchemeParameters,
        scalar: u64,
    ) where
        B: Backend,
        Module<B>: RadixModule<B>,
    {
        let max_digit: u64 = params.message_modulus.0 - 1;
        assert!(
            scalar.saturating_mul(max_digit) < params.total_modulus(),
            "scalar {scalar} overflows the carry space of modulus {}",
            params.total_modulus()
        );
        module.lwe_mul_scalar_inplace(ctx, &mut self.blocks, scalar);
    }

    /// `self = -self mod M^n`, as digits awaiting carry propagation.
    pub fn negate_inplace<B>(&mut self, module: &Module<B>, ctx: &ExecutionContext<B>, params: &SchemeParameters)
    where
        B: Backend,
        Module<B>: RadixModule<B>,
    {
        let offsets: Vec<Torus> = negation_offsets(params, self.num_blocks());
        module.lwe_negate_inplace(ctx, &mut self.blocks);
        module.lwe_add_encoded_inplace(ctx, &mut self.blocks, &offsets);
    }

    /// `self = self - rhs mod M^n`, carries propagated.
    #[tracing::instrument(skip_all, fields(num_blocks = self.num_blocks()))]
    #[allow(clippy::too_many_arguments)]
    pub fn sub_assign<B, A>(
        &mut self,
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        params: &SchemeParameters,
        rhs: &RadixCiphertext<A>,
        keys: &ServerKeys<B>,
        buf: &mut CarryPropagationBuffer<B>,
    ) where
        B: Backend,
        Module<B>: RadixModule<B>,
        A: DataRef,
    {
        assert_eq!(self.num_blocks(), rhs.num_blocks(), "operands hold {} and {} blocks", self.num_blocks(), rhs.num_blocks());
        // -(-a + b) = a - b, then the negation offsets make every digit non-negative
        module.lwe_negate_inplace(ctx, &mut self.blocks);
        module.lwe_add_inplace(ctx, &mut self.blocks, &rhs.blocks);
        self.negate_inplace(module, ctx, params);
        self.propagate_carries_inplace(module, ctx, keys, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::PARAMS_MESSAGE_2_CARRY_2_KS_PBS;

    #[test]
    fn negation_offsets_sum_to_modulus() {
        let params: SchemeParameters = PARAMS_MESSAGE_2_CARRY_2_KS_PBS;
        let offsets: Vec<u64> = negation_offsets(&params, 4)
            .iter()
            .map(|o| params.decode(*o))
            .collect();
        assert_eq!(offsets, vec![4, 3, 3, 3]);
        // 4 + 3 * 4 + 3 * 16 + 3 * 64 = 256
        let total: u64 = offsets.iter().rev().fold(0, |acc, d| acc * 4 + d);
        assert_eq!(total, 256);
    }
}
