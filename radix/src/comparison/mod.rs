//! Comparison family: `==`, `!=`, `>`, `>=`, `<`, `<=`, `max` and `min`,
//! against a radix operand or a clear scalar.
//!
//! Predicates write their boolean into block 0 of the output and clear the
//! other blocks. `max` and `min` write the selected operand.

mod all_true;
mod equality;
mod relational;

pub use all_true::*;
pub use equality::*;
pub use relational::*;

use backend::{
    api::{DeviceCopy, DeviceFill, LweArrayAlloc},
    layouts::{
        Backend, DataMut, DataRef, DeviceBuf, ExecutionContext, LweArray, Module, SchemeParameters, ServerKeys, Torus,
    },
};

use crate::{CmuxBuffer, RadixCiphertext, RadixModule, WORD_BYTES};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Max,
    Min,
}

impl ComparisonOp {
    pub const ALL: [ComparisonOp; 8] = [
        ComparisonOp::Eq,
        ComparisonOp::Ne,
        ComparisonOp::Gt,
        ComparisonOp::Ge,
        ComparisonOp::Lt,
        ComparisonOp::Le,
        ComparisonOp::Max,
        ComparisonOp::Min,
    ];

    /// Plaintext result: `0`/`1` for predicates, the selected operand otherwise.
    pub fn eval(self, lhs: u128, rhs: u128) -> u128 {
        match self {
            ComparisonOp::Eq => (lhs == rhs) as u128,
            ComparisonOp::Ne => (lhs != rhs) as u128,
            ComparisonOp::Gt => (lhs > rhs) as u128,
            ComparisonOp::Ge => (lhs >= rhs) as u128,
            ComparisonOp::Lt => (lhs < rhs) as u128,
            ComparisonOp::Le => (lhs <= rhs) as u128,
            ComparisonOp::Max => lhs.max(rhs),
            ComparisonOp::Min => lhs.min(rhs),
        }
    }

    pub fn is_predicate(self) -> bool {
        !matches!(self, ComparisonOp::Max | ComparisonOp::Min)
    }

    /// Boolean written for a folded ordering; identity for `max` and `min`.
    fn finish(self, ordering: u64) -> u64 {
        let sup: u64 = BlockOrdering::Superior as u64;
        let inf: u64 = BlockOrdering::Inferior as u64;
        match self {
            ComparisonOp::Gt => (ordering == sup) as u64,
            ComparisonOp::Ge => (ordering != inf) as u64,
            ComparisonOp::Lt => (ordering == inf) as u64,
            ComparisonOp::Le => (ordering != sup) as u64,
            _ => ordering,
        }
    }

    /// Whether `lhs` is selected for a folded ordering.
    fn selects_lhs(self, ordering: u64) -> bool {
        match self {
            ComparisonOp::Max => ordering == BlockOrdering::Superior as u64,
            _ => ordering == BlockOrdering::Inferior as u64,
        }
    }
}

/// Ordering of two blocks, as produced by the sign bootstrap.
#[repr(u64)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockOrdering {
    Inferior = 0,
    Equal = 1,
    Superior = 2,
}

/// Scratch of [`RadixCiphertext::compare`] and
/// [`RadixCiphertext::compare_scalar`], shaped for one operator.
pub enum ComparisonBuffer<B: Backend> {
    Equality {
        op: ComparisonOp,
        eq: EqualityBuffer<B>,
    },
    Relational {
        op: ComparisonOp,
        diff: DifferenceBuffer<B>,
    },
    Extremum {
        op: ComparisonOp,
        diff: DifferenceBuffer<B>,
        cmux: CmuxBuffer<B>,
        ordering: LweArray<DeviceBuf<B>>,
        scalar: LweArray<DeviceBuf<B>>,
    },
}

fn assert_extremum_params(params: &SchemeParameters) {
    assert!(
        params.message_modulus.0 > BlockOrdering::Superior as u64,
        "max/min select on an ordering block, which needs a message modulus of at least 4, got {}",
        params.message_modulus.0
    );
}

impl<B: Backend> ComparisonBuffer<B> {
    pub fn alloc(
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        params: &SchemeParameters,
        num_blocks: usize,
        op: ComparisonOp,
    ) -> Self
    where
        Module<B>: RadixModule<B>,
    {
        params.assert_valid();
        tracing::debug!(num_blocks, ?op, "comparison buffer");
        match op {
            ComparisonOp::Eq | ComparisonOp::Ne => ComparisonBuffer::Equality {
                op,
                eq: EqualityBuffer::alloc(module, ctx, params, num_blocks, op == ComparisonOp::Eq),
            },
            ComparisonOp::Gt | ComparisonOp::Ge | ComparisonOp::Lt | ComparisonOp::Le => ComparisonBuffer::Relational {
                op,
                diff: DifferenceBuffer::alloc(module, ctx, params, num_blocks, |x| op.finish(x)),
            },
            ComparisonOp::Max | ComparisonOp::Min => {
                assert_extremum_params(params);
                let dim: usize = params.big_lwe_dimension();
                ComparisonBuffer::Extremum {
                    op,
                    diff: DifferenceBuffer::alloc(module, ctx, params, num_blocks, |x| op.finish(x)),
                    cmux: CmuxBuffer::alloc(module, ctx, params, num_blocks, |x| op.selects_lhs(x)),
                    ordering: module.lwe_array_alloc(dim, 1),
                    scalar: module.lwe_array_alloc(dim, num_blocks),
                }
            }
        }
    }

    pub fn alloc_bytes(module: &Module<B>, params: &SchemeParameters, num_blocks: usize, op: ComparisonOp) -> usize
    where
        Module<B>: RadixModule<B>,
    {
        match op {
            ComparisonOp::Eq | ComparisonOp::Ne => {
                EqualityBuffer::alloc_bytes(module, params, num_blocks, op == ComparisonOp::Eq)
            }
            ComparisonOp::Gt | ComparisonOp::Ge | ComparisonOp::Lt | ComparisonOp::Le => {
                DifferenceBuffer::alloc_bytes(module, params, num_blocks)
            }
            ComparisonOp::Max | ComparisonOp::Min => {
                DifferenceBuffer::alloc_bytes(module, params, num_blocks)
                    + CmuxBuffer::alloc_bytes(module, params, num_blocks)
                    + LweArray::<Vec<Torus>>::alloc_words(params.big_lwe_dimension(), 1 + num_blocks) * WORD_BYTES
            }
        }
    }

    pub fn op(&self) -> ComparisonOp {
        match self {
            ComparisonBuffer::Equality { op, .. }
            | ComparisonBuffer::Relational { op, .. }
            | ComparisonBuffer::Extremum { op, .. } => *op,
        }
    }

    pub fn release(self, module: &Module<B>)
    where
        Module<B>: RadixModule<B>,
    {
        match self {
            ComparisonBuffer::Equality { eq, .. } => eq.release(module),
            ComparisonBuffer::Relational { diff, .. } => diff.release(module),
            ComparisonBuffer::Extremum {
                diff,
                cmux,
                ordering,
                scalar,
                ..
            } => {
                diff.release(module);
                cmux.release(module);
                module.lwe_array_release(ordering);
                module.lwe_array_release(scalar);
            }
        }
    }
}

fn clear_high_blocks<B, R>(module: &Module<B>, ctx: &ExecutionContext<B>, res: &mut LweArray<R>)
where
    B: Backend,
    Module<B>: RadixModule<B>,
    R: DataMut,
{
    let n: usize = res.count();
    if n > 1 {
        module.device_fill(ctx, res.range_mut(1, n).raw_mut(), 0);
    }
}

impl<D: DataMut> RadixCiphertext<D> {
    /// `self = op(lhs, rhs)`. `self` must not alias an operand.
    #[tracing::instrument(skip_all, fields(num_blocks = self.num_blocks(), op = ?buf.op()))]
    #[allow(clippy::too_many_arguments)]
    pub fn compare<B, A, C>(
        &mut self,
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        lhs: &RadixCiphertext<A>,
        rhs: &RadixCiphertext<C>,
        keys: &ServerKeys<B>,
        buf: &mut ComparisonBuffer<B>,
    ) where
        B: Backend,
        Module<B>: RadixModule<B>,
        A: DataRef,
        C: DataRef,
    {
        let n: usize = lhs.num_blocks();
        assert_eq!(rhs.num_blocks(), n, "operands hold {n} and {} blocks", rhs.num_blocks());
        assert_eq!(self.num_blocks(), n, "output holds {} blocks, operands {n}", self.num_blocks());

        match buf {
            ComparisonBuffer::Equality { eq, .. } => {
                eq.equal(module, ctx, &mut self.blocks.range_mut(0, 1), &lhs.blocks, &rhs.blocks, keys);
                clear_high_blocks(module, ctx, &mut self.blocks);
            }
            ComparisonBuffer::Relational { diff, .. } => {
                diff.ordering(module, ctx, &mut self.blocks.range_mut(0, 1), &lhs.blocks, &rhs.blocks, keys);
                clear_high_blocks(module, ctx, &mut self.blocks);
            }
            ComparisonBuffer::Extremum {
                diff, cmux, ordering, ..
            } => {
                diff.ordering(module, ctx, ordering, &lhs.blocks, &rhs.blocks, keys);
                self.cmux(module, ctx, ordering, lhs, rhs, keys, cmux);
            }
        }
    }

    /// `self = op(lhs, scalar)`; `scalar` must fit on the operand's digits.
    #[tracing::instrument(skip_all, fields(num_blocks = self.num_blocks(), op = ?buf.op()))]
    #[allow(clippy::too_many_arguments)]
    pub fn compare_scalar<B, A>(
        &mut self,
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        lhs: &RadixCiphertext<A>,
        scalar: u128,
        keys: &ServerKeys<B>,
        buf: &mut ComparisonBuffer<B>,
    ) where
        B: Backend,
        Module<B>: RadixModule<B>,
        A: DataRef,
    {
        let n: usize = lhs.num_blocks();
        assert_eq!(self.num_blocks(), n, "output holds {} blocks, operand {n}", self.num_blocks());

        match buf {
            ComparisonBuffer::Equality { eq, .. } => {
                eq.equal_scalar(module, ctx, &mut self.blocks.range_mut(0, 1), &lhs.blocks, scalar, keys);
                clear_high_blocks(module, ctx, &mut self.blocks);
            }
            ComparisonBuffer::Relational { diff, .. } => {
                diff.ordering_scalar(module, ctx, &mut self.blocks.range_mut(0, 1), &lhs.blocks, scalar, keys);
                clear_high_blocks(module, ctx, &mut self.blocks);
            }
            ComparisonBuffer::Extremum {
                diff,
                cmux,
                ordering,
                scalar: encoded,
                ..
            } => {
                diff.ordering_scalar(module, ctx, ordering, &lhs.blocks, scalar, keys);

                // the unselected branch is the scalar itself, encoded without noise
                let mut host: RadixCiphertext<Vec<Torus>> = RadixCiphertext::alloc(diff.params(), n);
                host.encode_trivial(diff.params(), scalar);
                module.device_upload(ctx, encoded.raw_mut(), host.blocks.raw());

                let rhs: RadixCiphertext<&[Torus]> = RadixCiphertext::from_blocks(encoded.to_ref());
                self.cmux(module, ctx, ordering, lhs, &rhs, keys, cmux);
            }
        }
    }
}
