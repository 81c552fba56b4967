use crate::layouts::{Backend, DataMut, DataRef, ExecutionContext, LutRef, LweArray, Module, SchemeParameters, Torus};

/// # THIS TRAIT IS AN OPEN EXTENSION POINT (unsafe)
/// * See [crate::api::EvaluateLutTmpWords] for corresponding public API.
pub unsafe trait EvaluateLutTmpWordsImpl<B: Backend> {
    fn evaluate_lut_tmp_words_impl(module: &Module<B>, params: &SchemeParameters, count: usize) -> usize;
}

/// # THIS TRAIT IS AN OPEN EXTENSION POINT (unsafe)
/// * See [crate::reference::pbs::evaluate_lut_trivial_ref] for reference code.
/// * See [crate::api::EvaluateLut] for corresponding public API.
pub unsafe trait EvaluateLutImpl<B: Backend> {
    fn evaluate_lut_impl<R, A>(
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        res: &mut LweArray<R>,
        a: &LweArray<A>,
        lut: &LutRef<'_>,
        bsk: &B::BootstrapKey,
        scratch: &mut [Torus],
    ) where
        R: DataMut,
        A: DataRef;
}

/// # THIS TRAIT IS AN OPEN EXTENSION POINT (unsafe)
/// * See [crate::reference::pbs::keyswitch_trivial_ref] for reference code.
/// * See [crate::api::Keyswitch] for corresponding public API.
pub unsafe trait KeyswitchImpl<B: Backend> {
    fn keyswitch_impl<R, A>(
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        res: &mut LweArray<R>,
        a: &LweArray<A>,
        ksk: &B::KeyswitchKey,
    ) where
        R: DataMut,
        A: DataRef;
}
