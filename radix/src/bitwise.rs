use backend::layouts::{Backend, DataMut, DataRef, ExecutionContext, Module, SchemeParameters, ServerKeys};

use crate::{
    RadixCiphertext, RadixModule,
    ciphertext::scalar_digits,
    lut::{Owned, RadixLut, ScalarDigit},
    parameters::assert_bivariate_capacity,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitOp {
    And,
    Or,
    Xor,
}

impl BitOp {
    pub fn eval(self, x: u64, y: u64) -> u64 {
        match self {
            BitOp::And => x & y,
            BitOp::Or => x | y,
            BitOp::Xor => x ^ y,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitwiseKind {
    /// Two encrypted operands.
    Binary(BitOp),
    Not,
    /// An encrypted operand and a plaintext scalar.
    Scalar(BitOp),
}

/// Scratch of the bitwise operations; built for one [`BitwiseKind`].
pub enum BitwiseBuffer<B: Backend> {
    Binary { op: BitOp, lut: RadixLut<B> },
    Not { lut: RadixLut<B> },
    /// One table per scalar digit value, picked per block at call time.
    Scalar { op: BitOp, lut: RadixLut<B> },
}

fn num_luts(params: &SchemeParameters, kind: BitwiseKind) -> usize {
    match kind {
        BitwiseKind::Binary(_) | BitwiseKind::Not => 1,
        BitwiseKind::Scalar(_) => params.message_modulus.0 as usize,
    }
}

impl<B: Backend> BitwiseBuffer<B> {
    pub fn alloc(
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        params: &SchemeParameters,
        num_blocks: usize,
        kind: BitwiseKind,
    ) -> Self
    where
        Module<B>: RadixModule<B>,
    {
        assert!(num_blocks > 0, "bitwise operation over zero blocks");
        params.assert_valid();
        let m: u64 = params.message_modulus.0;
        let mut lut: RadixLut<B> = RadixLut::alloc(module, ctx, params, num_luts(params, kind), num_blocks);

        tracing::debug!(num_blocks, ?kind, "bitwise buffer");
        match kind {
            BitwiseKind::Binary(op) => {
                assert_bivariate_capacity(params);
                lut.generate_bivariate(module, ctx, 0, |x, y| op.eval(x, y));
                BitwiseBuffer::Binary { op, lut }
            }
            BitwiseKind::Not => {
                lut.generate_univariate(module, ctx, 0, |x| !x % m);
                BitwiseBuffer::Not { lut }
            }
            BitwiseKind::Scalar(op) => {
                for d in 0..m {
                    lut.generate_univariate(module, ctx, ScalarDigit(d), |x| op.eval(x, d) % m);
                }
                BitwiseBuffer::Scalar { op, lut }
            }
        }
    }

    pub fn alloc_bytes(module: &Module<B>, params: &SchemeParameters, num_blocks: usize, kind: BitwiseKind) -> usize
    where
        Module<B>: RadixModule<B>,
    {
        RadixLut::<B, Owned<B>>::alloc_bytes(module, params, num_luts(params, kind), num_blocks)
    }

    pub fn kind(&self) -> BitwiseKind {
        match self {
            BitwiseBuffer::Binary { op, .. } => BitwiseKind::Binary(*op),
            BitwiseBuffer::Not { .. } => BitwiseKind::Not,
            BitwiseBuffer::Scalar { op, .. } => BitwiseKind::Scalar(*op),
        }
    }

    fn lut(&self) -> &RadixLut<B> {
        match self {
            BitwiseBuffer::Binary { lut, .. } | BitwiseBuffer::Not { lut } | BitwiseBuffer::Scalar { lut, .. } => lut,
        }
    }

    pub fn num_blocks(&self) -> usize {
        self.lut().num_blocks()
    }

    pub fn release(self, module: &Module<B>)
    where
        Module<B>: RadixModule<B>,
    {
        match self {
            BitwiseBuffer::Binary { lut, .. } | BitwiseBuffer::Not { lut } | BitwiseBuffer::Scalar { lut, .. } => {
                lut.release(module)
            }
        }
    }
}

impl<D: DataMut> RadixCiphertext<D> {
    /// `self = lhs op rhs`, digit by digit.
    #[tracing::instrument(skip_all, fields(num_blocks = self.num_blocks()))]
    pub fn bitop<B, A, C>(
        &mut self,
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        lhs: &RadixCiphertext<A>,
        rhs: &RadixCiphertext<C>,
        keys: &ServerKeys<B>,
        buf: &mut BitwiseBuffer<B>,
    ) where
        B: Backend,
        Module<B>: RadixModule<B>,
        A: DataRef,
        C: DataRef,
    {
        let kind: BitwiseKind = buf.kind();
        let BitwiseBuffer::Binary { lut, .. } = buf else {
            panic!("bitwise buffer built for {kind:?}, not a binary operation");
        };
        let n: usize = lut.num_blocks();
        assert_eq!(self.num_blocks(), n, "buffer sized for {n} blocks");
        assert_eq!(lhs.num_blocks(), n, "lhs holds {} blocks", lhs.num_blocks());
        assert_eq!(rhs.num_blocks(), n, "rhs holds {} blocks", rhs.num_blocks());
        lut.apply_bivariate(module, ctx, &mut self.blocks, &lhs.blocks, &rhs.blocks, keys);
    }

    /// `self = !a`, digit by digit.
    #[tracing::instrument(skip_all, fields(num_blocks = self.num_blocks()))]
    pub fn bitnot<B, A>(
        &mut self,
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        a: &RadixCiphertext<A>,
        keys: &ServerKeys<B>,
        buf: &mut BitwiseBuffer<B>,
    ) where
        B: Backend,
        Module<B>: RadixModule<B>,
        A: DataRef,
    {
        let kind: BitwiseKind = buf.kind();
        let BitwiseBuffer::Not { lut } = buf else {
            panic!("bitwise buffer built for {kind:?}, not a negation");
        };
        let n: usize = lut.num_blocks();
        assert_eq!(self.num_blocks(), n, "buffer sized for {n} blocks");
        assert_eq!(a.num_blocks(), n, "operand holds {} blocks", a.num_blocks());
        lut.apply_univariate(module, ctx, &mut self.blocks, &a.blocks, keys);
    }

    /// `self = a op scalar`, digit by digit. `scalar` must fit on `n` digits.
    #[tracing::instrument(skip_all, fields(num_blocks = self.num_blocks()))]
    pub fn scalar_bitop<B, A>(
        &mut self,
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        a: &RadixCiphertext<A>,
        scalar: u128,
        keys: &ServerKeys<B>,
        buf: &mut BitwiseBuffer<B>,
    ) where
        B: Backend,
        Module<B>: RadixModule<B>,
        A: DataRef,
    {
        let kind: BitwiseKind = buf.kind();
        let BitwiseBuffer::Scalar { lut, .. } = buf else {
            panic!("bitwise buffer built for {kind:?}, not a scalar operation");
        };
        let n: usize = lut.num_blocks();
        assert_eq!(self.num_blocks(), n, "buffer sized for {n} blocks");
        assert_eq!(a.num_blocks(), n, "operand holds {} blocks", a.num_blocks());

        let digits: Vec<ScalarDigit> = scalar_digits(lut.params(), scalar, n)
            .into_iter()
            .map(ScalarDigit)
            .collect();
        lut.set_selectors(module, ctx, &digits);
        lut.apply_univariate(module, ctx, &mut self.blocks, &a.blocks, keys);
    }
}
