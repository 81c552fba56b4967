use crate::layouts::{Backend, DataMut, DataRef, ExecutionContext, LweArray, Torus};

// Linear kernels. Every kernel processes `res.count()` blocks; operands must
// hold at least that many blocks of the same dimension.

/// `res[i] = a[i] + b[i]`
pub trait LweAdd<B: Backend> {
    fn lwe_add<R, A, C>(&self, ctx: &ExecutionContext<B>, res: &mut LweArray<R>, a: &LweArray<A>, b: &LweArray<C>)
    where
        R: DataMut,
        A: DataRef,
        C: DataRef;
}

/// `res[i] += a[i]`
pub trait LweAddInplace<B: Backend> {
    fn lwe_add_inplace<R, A>(&self, ctx: &ExecutionContext<B>, res: &mut LweArray<R>, a: &LweArray<A>)
    where
        R: DataMut,
        A: DataRef;
}

/// `res[i] = a[i] - b[i]`
pub trait LweSub<B: Backend> {
    fn lwe_sub<R, A, C>(&self, ctx: &ExecutionContext<B>, res: &mut LweArray<R>, a: &LweArray<A>, b: &LweArray<C>)
    where
        R: DataMut,
        A: DataRef,
        C: DataRef;
}

/// `res[i] = -res[i]`
pub trait LweNegateInplace<B: Backend> {
    fn lwe_negate_inplace<R>(&self, ctx: &ExecutionContext<B>, res: &mut LweArray<R>)
    where
        R: DataMut;
}

/// `res[i] *= scalar`
pub trait LweMulScalarInplace<B: Backend> {
    fn lwe_mul_scalar_inplace<R>(&self, ctx: &ExecutionContext<B>, res: &mut LweArray<R>, scalar: u64)
    where
        R: DataMut;
}

/// `body(res[i]) += encoded[i]`
pub trait LweAddEncodedInplace<B: Backend> {
    fn lwe_add_encoded_inplace<R>(&self, ctx: &ExecutionContext<B>, res: &mut LweArray<R>, encoded: &[Torus])
    where
        R: DataMut;
}

/// `res[i] = msb[i] * factor + lsb[i]`; a single-block `lsb` is broadcast.
pub trait LwePackBivariate<B: Backend> {
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
        C: DataRef;
}

/// `res[i] = a[2i+1] * factor + a[2i]`; when `a` has an odd number of
/// blocks its last block is copied unchanged into the last output.
///
/// `res.count()` must equal `a.count().div_ceil(2)`.
pub trait LwePackPairs<B: Backend> {
    fn lwe_pack_pairs<R, A>(&self, ctx: &ExecutionContext<B>, res: &mut LweArray<R>, a: &LweArray<A>, factor: u64)
    where
        R: DataMut,
        A: DataRef;
}

/// `res[0] = sum_i a[i]`
pub trait LweAccumulate<B: Backend> {
    fn lwe_accumulate<R, A>(&self, ctx: &ExecutionContext<B>, res: &mut LweArray<R>, a: &LweArray<A>)
    where
        R: DataMut,
        A: DataRef;
}
