use crate::{
    api::{EvaluateLut, EvaluateLutTmpWords, Keyswitch},
    layouts::{Backend, DataMut, DataRef, ExecutionContext, LutRef, LweArray, Module, SchemeParameters, Torus},
    oep::{EvaluateLutImpl, EvaluateLutTmpWordsImpl, KeyswitchImpl},
};

impl<B> EvaluateLutTmpWords for Module<B>
where
    B: Backend + EvaluateLutTmpWordsImpl<B>,
{
    fn evaluate_lut_tmp_words(&self, params: &SchemeParameters, count: usize) -> usize {
        B::evaluate_lut_tmp_words_impl(self, params, count)
    }
}

impl<B> EvaluateLut<B> for Module<B>
where
    B: Backend + EvaluateLutImpl<B>,
{
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
        A: DataRef,
    {
        B::evaluate_lut_impl(self, ctx, res, a, lut, bsk, scratch)
    }
}

impl<B> Keyswitch<B> for Module<B>
where
    B: Backend + KeyswitchImpl<B>,
{
    fn keyswitch<R, A>(&self, ctx: &ExecutionContext<B>, res: &mut LweArray<R>, a: &LweArray<A>, ksk: &B::KeyswitchKey)
    where
        R: DataMut,
        A: DataRef,
    {
        B::keyswitch_impl(self, ctx, res, a, ksk)
    }
}
