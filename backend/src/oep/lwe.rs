use crate::layouts::{Backend, DataMut, DataRef, ExecutionContext, LweArray, Module, Torus};

/// # THIS TRAIT IS AN OPEN EXTENSION POINT (unsafe)
/// * See [crate::reference::lwe::lwe_add_ref] for reference code.
/// * See [crate::api::LweAdd] for corresponding public API.
pub unsafe trait LweAddImpl<B: Backend> {
    fn lwe_add_impl<R, A, C>(module: &Module<B>, ctx: &ExecutionContext<B>, res: &mut LweArray<R>, a: &LweArray<A>, b: &LweArray<C>)
    where
        R: DataMut,
        A: DataRef,
        C: DataRef;
}

/// # THIS TRAIT IS AN OPEN EXTENSION POINT (unsafe)
/// * See [crate::reference::lwe::lwe_add_inplace_ref] for reference code.
/// * See [crate::api::LweAddInplace] for corresponding public API.
pub unsafe trait LweAddInplaceImpl<B: Backend> {
    fn lwe_add_inplace_impl<R, A>(module: &Module<B>, ctx: &ExecutionContext<B>, res: &mut LweArray<R>, a: &LweArray<A>)
    where
        R: DataMut,
        A: DataRef;
}

/// # THIS TRAIT IS AN OPEN EXTENSION POINT (unsafe)
/// * See [crate::reference::lwe::lwe_sub_ref] for reference code.
/// * See [crate::api::LweSub] for corresponding public API.
pub unsafe trait LweSubImpl<B: Backend> {
    fn lwe_sub_impl<R, A, C>(module: &Module<B>, ctx: &ExecutionContext<B>, res: &mut LweArray<R>, a: &LweArray<A>, b: &LweArray<C>)
    where
        R: DataMut,
        A: DataRef,
        C: DataRef;
}

/// # THIS TRAIT IS AN OPEN EXTENSION POINT (unsafe)
/// * See [crate::reference::lwe::lwe_negate_inplace_ref] for reference code.
/// * See [crate::api::LweNegateInplace] for corresponding public API.
pub unsafe trait LweNegateInplaceImpl<B: Backend> {
    fn lwe_negate_inplace_impl<R>(module: &Module<B>, ctx: &ExecutionContext<B>, res: &mut LweArray<R>)
    where
        R: DataMut;
}

/// # THIS TRAIT IS AN OPEN EXTENSION POINT (unsafe)
/// * See [crate::reference::lwe::lwe_mul_scalar_inplace_ref] for reference code.
/// * See [crate::api::LweMulScalarInplace] for corresponding public API.
pub unsafe trait LweMulScalarInplaceImpl<B: Backend> {
    fn lwe_mul_scalar_inplace_impl<R>(module: &Module<B>, ctx: &ExecutionContext<B>, res: &mut LweArray<R>, scalar: u64)
    where
        R: DataMut;
}

/// # THIS TRAIT IS AN OPEN EXTENSION POINT (unsafe)
/// * See [crate::reference::lwe::lwe_add_encoded_inplace_ref] for reference code.
/// * See [crate::api::LweAddEncodedInplace] for corresponding public API.
pub unsafe trait LweAddEncodedInplaceImpl<B: Backend> {
    fn lwe_add_encoded_inplace_impl<R>(module: &Module<B>, ctx: &ExecutionContext<B>, res: &mut LweArray<R>, encoded: &[Torus])
    where
        R: DataMut;
}

/// # THIS TRAIT IS AN OPEN EXTENSION POINT (unsafe)
/// * See [crate::reference::lwe::lwe_pack_bivariate_ref] for reference code.
/// * See [crate::api::LwePackBivariate] for corresponding public API.
pub unsafe trait LwePackBivariateImpl<B: Backend> {
    fn lwe_pack_bivariate_impl<R, A, C>(
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        res: &mut LweArray<R>,
        msb: &LweArray<A>,
        lsb: &LweArray<C>,
        factor: u64,
    ) where
        R: DataMut,
        A: DataRef,
        C: DataRef;
}

/// # THIS TRAIT IS AN OPEN EXTENSION POINT (unsafe)
/// * See [crate::reference::lwe::lwe_pack_pairs_ref] for reference code.
/// * See [crate::api::LwePackPairs] for corresponding public API.
pub unsafe trait LwePackPairsImpl<B: Backend> {
    fn lwe_pack_pairs_impl<R, A>(module: &Module<B>, ctx: &ExecutionContext<B>, res: &mut LweArray<R>, a: &LweArray<A>, factor: u64)
    where
        R: DataMut,
        A: DataRef;
}

/// # THIS TRAIT IS AN OPEN EXTENSION POINT (unsafe)
/// * See [crate::reference::lwe::lwe_accumulate_ref] for reference code.
/// * See [crate::api::LweAccumulate] for corresponding public API.
pub unsafe trait LweAccumulateImpl<B: Backend> {
    fn lwe_accumulate_impl<R, A>(module: &Module<B>, ctx: &ExecutionContext<B>, res: &mut LweArray<R>, a: &LweArray<A>)
    where
        R: DataMut,
        A: DataRef;
}
