use std::ops::Range;

use backend::{
    api::{DeviceCopy, DeviceFill, LweArrayAlloc},
    layouts::{
        Backend, DataMut, DataRef, DeviceBuf, ExecutionContext, LweArray, Module, SchemeParameters, ServerKeys, Torus,
    },
};

use crate::{
    RadixCiphertext, RadixModule, WORD_BYTES,
    lut::{LutSlot, Owned, RadixLut, Reused},
    parameters::assert_bivariate_capacity,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftDirection {
    /// Towards the most significant block.
    Left,
    Right,
}

/// Table of the bit shift `s`, for `s` in `[1, bits_per_block)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct BitShift(usize);

impl LutSlot for BitShift {
    fn index(self) -> usize {
        self.0 - 1
    }
}

struct BitShiftLuts<B: Backend> {
    /// `f(block, neighbour)`: the block shifted by `s` with the bits it
    /// borrows from its neighbour.
    mixing: RadixLut<B>,
    /// The block with no neighbour in a non-wrapping shift.
    edge: RadixLut<B, Reused>,
}

/// Scratch of [`RadixCiphertext::shift_inplace`] and
/// [`RadixCiphertext::rotate_inplace`] in one direction.
pub struct ShiftBuffer<B: Backend> {
    num_blocks: usize,
    bits: usize,
    direction: ShiftDirection,
    moved: LweArray<DeviceBuf<B>>,
    neighbours: LweArray<DeviceBuf<B>>,
    luts: Option<BitShiftLuts<B>>,
}

impl<B: Backend> ShiftBuffer<B> {
    pub fn alloc(
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        params: &SchemeParameters,
        num_blocks: usize,
        direction: ShiftDirection,
    ) -> Self
    where
        Module<B>: RadixModule<B>,
    {
        assert!(num_blocks > 0, "shift over zero blocks");
        params.assert_valid();
        assert_bivariate_capacity(params);

        let m: u64 = params.message_modulus.0;
        let bits: usize = params.bits_per_block();

        // one-bit blocks only ever move whole blocks
        let luts: Option<BitShiftLuts<B>> = (bits > 1).then(|| {
            let mut mixing: RadixLut<B> = RadixLut::alloc(module, ctx, params, bits - 1, num_blocks);
            let mut edge: RadixLut<B, Reused> = RadixLut::alloc_reusing(module, ctx, params, bits - 1, 1, &mixing);
            for s in 1..bits {
                match direction {
                    ShiftDirection::Left => {
                        mixing.generate_bivariate(module, ctx, BitShift(s), |cur, prev| ((cur << s) % m) + ((prev << s) / m));
                        edge.generate_univariate(module, ctx, BitShift(s), |x| (x << s) % m);
                    }
                    ShiftDirection::Right => {
                        mixing.generate_bivariate(module, ctx, BitShift(s), |cur, next| (cur >> s) + (((next << bits) >> s) % m));
                        edge.generate_univariate(module, ctx, BitShift(s), |x| x >> s);
                    }
                }
            }
            BitShiftLuts { mixing, edge }
        });

        tracing::debug!(num_blocks, ?direction, "shift buffer");
        Self {
            num_blocks,
            bits,
            direction,
            moved: module.lwe_array_alloc(params.big_lwe_dimension(), num_blocks),
            neighbours: module.lwe_array_alloc(params.big_lwe_dimension(), num_blocks),
            luts,
        }
    }

    pub fn alloc_bytes(module: &Module<B>, params: &SchemeParameters, num_blocks: usize) -> usize
    where
        Module<B>: RadixModule<B>,
    {
        let bits: usize = params.bits_per_block();
        let luts: usize = if bits > 1 {
            RadixLut::<B, Owned<B>>::alloc_bytes(module, params, bits - 1, num_blocks)
                + RadixLut::<B, Reused>::alloc_reusing_bytes(params, bits - 1, 1)
        } else {
            0
        };
        luts + 2 * LweArray::<Vec<Torus>>::alloc_words(params.big_lwe_dimension(), num_blocks) * WORD_BYTES
    }

    pub fn direction(&self) -> ShiftDirection {
        self.direction
    }

    pub fn release(self, module: &Module<B>)
    where
        Module<B>: RadixModule<B>,
    {
        if let Some(luts) = self.luts {
            luts.edge.release(module);
            luts.mixing.release(module);
        }
        module.lwe_array_release(self.moved);
        module.lwe_array_release(self.neighbours);
    }
}

fn copy_blocks<B, R, A>(
    module: &Module<B>,
    ctx: &ExecutionContext<B>,
    dst: &mut LweArray<R>,
    dst_start: usize,
    src: &LweArray<A>,
    src_blocks: Range<usize>,
) where
    B: Backend,
    Module<B>: RadixModule<B>,
    R: DataMut,
    A: DataRef,
{
    let count: usize = src_blocks.len();
    module.device_copy(
        ctx,
        dst.range_mut(dst_start, dst_start + count).raw_mut(),
        src.range(src_blocks.start, src_blocks.end).raw(),
    );
}

fn zero_blocks<B, R>(module: &Module<B>, ctx: &ExecutionContext<B>, dst: &mut LweArray<R>, blocks: Range<usize>)
where
    B: Backend,
    Module<B>: RadixModule<B>,
    R: DataMut,
{
    module.device_fill(ctx, dst.range_mut(blocks.start, blocks.end).raw_mut(), 0);
}

impl<D: DataMut> RadixCiphertext<D> {
    /// Logical shift by `amount` bits in the buffer's direction. Amounts of
    /// `n * bits_per_block` or more clear every block.
    #[tracing::instrument(skip_all, fields(num_blocks = self.num_blocks(), amount = amount))]
    pub fn shift_inplace<B: Backend>(
        &mut self,
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        amount: usize,
        keys: &ServerKeys<B>,
        buf: &mut ShiftBuffer<B>,
    ) where
        Module<B>: RadixModule<B>,
    {
        let n: usize = buf.num_blocks;
        assert_eq!(self.num_blocks(), n, "buffer sized for {n} blocks");
        if amount >= n * buf.bits {
            zero_blocks(module, ctx, &mut self.blocks, 0..n);
            return;
        }
        if amount == 0 {
            return;
        }

        let block_shift: usize = amount / buf.bits;
        let bit_shift: usize = amount % buf.bits;

        match buf.direction {
            ShiftDirection::Left => {
                zero_blocks(module, ctx, &mut buf.moved, 0..block_shift);
                copy_blocks(module, ctx, &mut buf.moved, block_shift, &self.blocks, 0..n - block_shift);
            }
            ShiftDirection::Right => {
                copy_blocks(module, ctx, &mut buf.moved, 0, &self.blocks, block_shift..n);
                zero_blocks(module, ctx, &mut buf.moved, n - block_shift..n);
            }
        }

        let Some(luts) = buf.luts.as_mut().filter(|_| bit_shift > 0) else {
            copy_blocks(module, ctx, &mut self.blocks, 0, &buf.moved, 0..n);
            return;
        };

        // interior blocks mix with their neighbour, the edge block has none
        let (interior, neighbour, edge): (Range<usize>, Range<usize>, usize) = match buf.direction {
            ShiftDirection::Left => (1..n, 0..n - 1, 0),
            ShiftDirection::Right => (0..n - 1, 1..n, n - 1),
        };
        if n > 1 {
            luts.mixing.set_selector(module, ctx, 0..n - 1, BitShift(bit_shift));
            luts.mixing.apply_bivariate(
                module,
                ctx,
                &mut self.blocks.range_mut(interior.start, interior.end),
                &buf.moved.range(interior.start, interior.end),
                &buf.moved.range(neighbour.start, neighbour.end),
                keys,
            );
        }
        luts.edge.set_selector(module, ctx, 0..1, BitShift(bit_shift));
        luts.edge.apply_univariate_with(
            module,
            ctx,
            luts.mixing.workspace_mut(),
            &mut self.blocks.range_mut(edge, edge + 1),
            &buf.moved.range(edge, edge + 1),
            keys,
        );
    }

    /// Circular shift by `amount` bits (taken modulo `n * bits_per_block`) in
    /// the buffer's direction.
    #[tracing::instrument(skip_all, fields(num_blocks = self.num_blocks(), amount = amount))]
    pub fn rotate_inplace<B: Backend>(
        &mut self,
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        amount: usize,
        keys: &ServerKeys<B>,
        buf: &mut ShiftBuffer<B>,
    ) where
        Module<B>: RadixModule<B>,
    {
        let n: usize = buf.num_blocks;
        assert_eq!(self.num_blocks(), n, "buffer sized for {n} blocks");
        let amount: usize = amount % (n * buf.bits);
        if amount == 0 {
            return;
        }

        let block_shift: usize = amount / buf.bits;
        let bit_shift: usize = amount % buf.bits;

        match buf.direction {
            ShiftDirection::Left => {
                copy_blocks(module, ctx, &mut buf.moved, block_shift, &self.blocks, 0..n - block_shift);
                copy_blocks(module, ctx, &mut buf.moved, 0, &self.blocks, n - block_shift..n);
            }
            ShiftDirection::Right => {
                copy_blocks(module, ctx, &mut buf.moved, 0, &self.blocks, block_shift..n);
                copy_blocks(module, ctx, &mut buf.moved, n - block_shift, &self.blocks, 0..block_shift);
            }
        }

        let Some(luts) = buf.luts.as_mut().filter(|_| bit_shift > 0) else {
            copy_blocks(module, ctx, &mut self.blocks, 0, &buf.moved, 0..n);
            return;
        };

        // every block has a neighbour once the boundary wraps
        match buf.direction {
            ShiftDirection::Left => {
                copy_blocks(module, ctx, &mut buf.neighbours, 1, &buf.moved, 0..n - 1);
                copy_blocks(module, ctx, &mut buf.neighbours, 0, &buf.moved, n - 1..n);
            }
            ShiftDirection::Right => {
                copy_blocks(module, ctx, &mut buf.neighbours, 0, &buf.moved, 1..n);
                copy_blocks(module, ctx, &mut buf.neighbours, n - 1, &buf.moved, 0..1);
            }
        }
        luts.mixing.set_selector(module, ctx, 0..n, BitShift(bit_shift));
        luts.mixing
            .apply_bivariate(module, ctx, &mut self.blocks, &buf.moved, &buf.neighbours, keys);
    }
}
