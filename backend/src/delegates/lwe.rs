use crate::{
    api::{
        LweAccumulate, LweAdd, LweAddEncodedInplace, LweAddInplace, LweMulScalarInplace, LweNegateInplace, LwePackBivariate,
        LwePackPairs, LweSub,
    },
    layouts::{Backend, DataMut, DataRef, ExecutionContext, LweArray, Module, Torus},
    oep::{
        LweAccumulateImpl, LweAddEncodedInplaceImpl, LweAddImpl, LweAddInplaceImpl, LweMulScalarInplaceImpl,
        LweNegateInplaceImpl, LwePackBivariateImpl, LwePackPairsImpl, LweSubImpl,
    },
};

fn assert_operand<R: DataMut, A: DataRef>(res: &LweArray<R>, a: &LweArray<A>) {
    assert_eq!(a.lwe_dimension(), res.lwe_dimension(), "lwe dimension mismatch");
    assert!(
        a.count() >= res.count(),
        "operand holds {} blocks, {} required",
        a.count(),
        res.count()
    );
}

impl<B> LweAdd<B> for Module<B>
where
    B: Backend + LweAddImpl<B>,
{
    fn lwe_add<R, A, C>(&self, ctx: &ExecutionContext<B>, res: &mut LweArray<R>, a: &LweArray<A>, b: &LweArray<C>)
    where
        R: DataMut,
        A: DataRef,
        C: DataRef,
    {
        assert_operand(res, a);
        assert_operand(res, b);
        B::lwe_add_impl(self, ctx, res, a, b)
    }
}

impl<B> LweAddInplace<B> for Module<B>
where
    B: Backend + LweAddInplaceImpl<B>,
{
    fn lwe_add_inplace<R, A>(&self, ctx: &ExecutionContext<B>, res: &mut LweArray<R>, a: &LweArray<A>)
    where
        R: DataMut,
        A: DataRef,
    {
        assert_operand(res, a);
        B::lwe_add_inplace_impl(self, ctx, res, a)
    }
}

impl<B> LweSub<B> for Module<B>
where
    B: Backend + LweSubImpl<B>,
{
    fn lwe_sub<R, A, C>(&self, ctx: &ExecutionContext<B>, res: &mut LweArray<R>, a: &LweArray<A>, b: &LweArray<C>)
    where
        R: DataMut,
        A: DataRef,
        C: DataRef,
    {
        assert_operand(res, a);
        assert_operand(res, b);
        B::lwe_sub_impl(self, ctx, res, a, b)
    }
}

impl<B> LweNegateInplace<B> for Module<B>
where
    B: Backend + LweNegateInplaceImpl<B>,
{
    fn lwe_negate_inplace<R>(&self, ctx: &ExecutionContext<B>, res: &mut LweArray<R>)
    where
        R: DataMut,
    {
        B::lwe_negate_inplace_impl(self, ctx, res)
    }
}

impl<B> LweMulScalarInplace<B> for Module<B>
where
    B: Backend + LweMulScalarInplaceImpl<B>,
{
    fn lwe_mul_scalar_inplace<R>(&self, ctx: &ExecutionContext<B>, res: &mut LweArray<R>, scalar: u64)
    where
        R: DataMut,
    {
        B::lwe_mul_scalar_inplace_impl(self, ctx, res, scalar)
    }
}

impl<B> LweAddEncodedInplace<B> for Module<B>
where
    B: Backend + LweAddEncodedInplaceImpl<B>,
{
    fn lwe_add_encoded_inplace<R>(&self, ctx: &ExecutionContext<B>, res: &mut LweArray<R>, encoded: &[Torus])
    where
        R: DataMut,
    {
        assert!(
            encoded.len() >= res.count(),
            "{} encoded constants for {} blocks",
            encoded.len(),
            res.count()
        );
        B::lwe_add_encoded_inplace_impl(self, ctx, res, encoded)
    }
}

impl<B> LwePackBivariate<B> for Module<B>
where
    B: Backend + LwePackBivariateImpl<B>,
{
    fn lwe_pack_bivariate<R, A, C>(
        &self,
        ctx: &ExecutionContext<B>,
        res: &mut LweArray<R>,
        msb: &LweArray<A>,
        lsb: &LweArray<C>,
        factor: u64,
    ) where
        R: DataMut,
        A: DataRef,
        C: DataRef,
    {
        assert_operand(res, msb);
        assert_eq!(lsb.lwe_dimension(), res.lwe_dimension(), "lwe dimension mismatch");
        assert!(
            lsb.count() == 1 || lsb.count() >= res.count(),
            "lsb operand holds {} blocks, expected 1 or at least {}",
            lsb.count(),
            res.count()
        );
        B::lwe_pack_bivariate_impl(self, ctx, res, msb, lsb, factor)
    }
}

impl<B> LwePackPairs<B> for Module<B>
where
    B: Backend + LwePackPairsImpl<B>,
{
    fn lwe_pack_pairs<R, A>(&self, ctx: &ExecutionContext<B>, res: &mut LweArray<R>, a: &LweArray<A>, factor: u64)
    where
        R: DataMut,
        A: DataRef,
    {
        assert_eq!(a.lwe_dimension(), res.lwe_dimension(), "lwe dimension mismatch");
        assert_eq!(
            res.count(),
            a.count().div_ceil(2),
            "packing {} blocks yields {} pairs, not {}",
            a.count(),
            a.count().div_ceil(2),
            res.count()
        );
        B::lwe_pack_pairs_impl(self, ctx, res, a, factor)
    }
}

impl<B> LweAccumulate<B> for Module<B>
where
    B: Backend + LweAccumulateImpl<B>,
{
    fn lwe_accumulate<R, A>(&self, ctx: &ExecutionContext<B>, res: &mut LweArray<R>, a: &LweArray<A>)
    where
        R: DataMut,
        A: DataRef,
    {
        assert_eq!(a.lwe_dimension(), res.lwe_dimension(), "lwe dimension mismatch");
        assert_eq!(res.count(), 1, "accumulation writes a single block");
        B::lwe_accumulate_impl(self, ctx, res, a)
    }
}
