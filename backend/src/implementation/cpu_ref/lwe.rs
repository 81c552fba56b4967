use crate::{
    implementation::cpu_ref::{CpuRef, assert_same_device},
    layouts::{DataMut, DataRef, ExecutionContext, LweArray, Module, Torus},
    oep::{
        LweAccumulateImpl, LweAddEncodedInplaceImpl, LweAddImpl, LweAddInplaceImpl, LweMulScalarInplaceImpl,
        LweNegateInplaceImpl, LwePackBivariateImpl, LwePackPairsImpl, LweSubImpl,
    },
    reference::lwe::{
        lwe_accumulate_ref, lwe_add_encoded_inplace_ref, lwe_add_inplace_ref, lwe_add_ref, lwe_mul_scalar_inplace_ref,
        lwe_negate_inplace_ref, lwe_pack_bivariate_ref, lwe_pack_pairs_ref, lwe_sub_ref,
    },
};

unsafe impl LweAddImpl<Self> for CpuRef {
    fn lwe_add_impl<R, A, C>(module: &Module<Self>, ctx: &ExecutionContext<Self>, res: &mut LweArray<R>, a: &LweArray<A>, b: &LweArray<C>)
    where
        R: DataMut,
        A: DataRef,
        C: DataRef,
    {
        assert_same_device(module, ctx);
        lwe_add_ref(res, a, b);
    }
}

unsafe impl LweAddInplaceImpl<Self> for CpuRef {
    fn lwe_add_inplace_impl<R, A>(module: &Module<Self>, ctx: &ExecutionContext<Self>, res: &mut LweArray<R>, a: &LweArray<A>)
    where
        R: DataMut,
        A: DataRef,
    {
        assert_same_device(module, ctx);
        lwe_add_inplace_ref(res, a);
    }
}

unsafe impl LweSubImpl<Self> for CpuRef {
    fn lwe_sub_impl<R, A, C>(module: &Module<Self>, ctx: &ExecutionContext<Self>, res: &mut LweArray<R>, a: &LweArray<A>, b: &LweArray<C>)
    where
        R: DataMut,
        A: DataRef,
        C: DataRef,
    {
        assert_same_device(module, ctx);
        lwe_sub_ref(res, a, b);
    }
}

unsafe impl LweNegateInplaceImpl<Self> for CpuRef {
    fn lwe_negate_inplace_impl<R>(module: &Module<Self>, ctx: &ExecutionContext<Self>, res: &mut LweArray<R>)
    where
        R: DataMut,
    {
        assert_same_device(module, ctx);
        lwe_negate_inplace_ref(res);
    }
}

unsafe impl LweMulScalarInplaceImpl<Self> for CpuRef {
    fn lwe_mul_scalar_inplace_impl<R>(module: &Module<Self>, ctx: &ExecutionContext<Self>, res: &mut LweArray<R>, scalar: u64)
    where
        R: DataMut,
    {
        assert_same_device(module, ctx);
        lwe_mul_scalar_inplace_ref(res, scalar);
    }
}

unsafe impl LweAddEncodedInplaceImpl<Self> for CpuRef {
    fn lwe_add_encoded_inplace_impl<R>(module: &Module<Self>, ctx: &ExecutionContext<Self>, res: &mut LweArray<R>, encoded: &[Torus])
    where
        R: DataMut,
    {
        assert_same_device(module, ctx);
        lwe_add_encoded_inplace_ref(res, encoded);
    }
}

unsafe impl LwePackBivariateImpl<Self> for CpuRef {
    fn lwe_pack_bivariate_impl<R, A, C>(
        module: &Module<Self>,
        ctx: &ExecutionContext<Self>,
        res: &mut LweArray<R>,
        msb: &LweArray<A>,
        lsb: &LweArray<C>,
        factor: u64,
    ) where
        R: DataMut,
        A: DataRef,
        C: DataRef,
    {
        assert_same_device(module, ctx);
        lwe_pack_bivariate_ref(res, msb, lsb, factor);
    }
}

unsafe impl LwePackPairsImpl<Self> for CpuRef {
    fn lwe_pack_pairs_impl<R, A>(module: &Module<Self>, ctx: &ExecutionContext<Self>, res: &mut LweArray<R>, a: &LweArray<A>, factor: u64)
    where
        R: DataMut,
        A: DataRef,
    {
        assert_same_device(module, ctx);
        lwe_pack_pairs_ref(res, a, factor);
    }
}

unsafe impl LweAccumulateImpl<Self> for CpuRef {
    fn lwe_accumulate_impl<R, A>(module: &Module<Self>, ctx: &ExecutionContext<Self>, res: &mut LweArray<R>, a: &LweArray<A>)
    where
        R: DataMut,
        A: DataRef,
    {
        assert_same_device(module, ctx);
        lwe_accumulate_ref(res, a);
    }
}
