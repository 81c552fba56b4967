use crate::layouts::{Backend, DataMut, DataRef, ExecutionContext, LutRef, LweArray, SchemeParameters, Torus};

/// Scratch words needed by [EvaluateLut] for `count` blocks.
pub trait EvaluateLutTmpWords {
    fn evaluate_lut_tmp_words(&self, params: &SchemeParameters, count: usize) -> usize;
}

/// Batched programmable bootstrapping.
///
/// For every `i < res.count()`, writes into `res[i]` the big-LWE bootstrap of
/// `a[lut.input_indexes[i]]` (small LWE) through table `lut.selectors[i]`.
pub trait EvaluateLut<B: Backend> {
    fn evaluate_lut<R, A>(
        &self,
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

/// Batched keyswitch from big LWE to small LWE, `res.count()` blocks.
pub trait Keyswitch<B: Backend> {
    fn keyswitch<R, A>(&self, ctx: &ExecutionContext<B>, res: &mut LweArray<R>, a: &LweArray<A>, ksk: &B::KeyswitchKey)
    where
        R: DataMut,
        A: DataRef;
}
