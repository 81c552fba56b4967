use backend::{
    api::{DeviceCopy, LweAddInplace, LweArrayAlloc},
    layouts::{Backend, DataMut, DeviceBuf, ExecutionContext, LweArray, Module, SchemeParameters, ServerKeys, Torus},
};

use crate::{
    RadixCiphertext, RadixModule, WORD_BYTES,
    lut::{LutSlot, Owned, RadixLut, Reused},
    reduction::{CombineRule, PrefixScanBuffer},
};

/// Carry behaviour of one block, as seen by the block above it.
#[repr(u64)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CarryState {
    None = 0,
    Generated = 1,
    /// The block emits a carry iff it receives one.
    Propagated = 2,
}

#[derive(Clone, Copy, Debug)]
enum ClassifySlot {
    /// Block 0 never receives a carry.
    GenerateOnly,
    GenerateOrPropagate,
}

impl LutSlot for ClassifySlot {
    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug)]
enum SplitSlot {
    Message,
    Carry,
}

impl LutSlot for SplitSlot {
    fn index(self) -> usize {
        self as usize
    }
}

/// Message/carry split rounds bringing any digit below `M * C` under the
/// `2M - 1` bound the generate/propagate classification handles.
fn split_rounds(params: &SchemeParameters) -> usize {
    let m: u64 = params.message_modulus.0;
    let mut bound: u64 = params.total_modulus() - 1;
    let mut rounds: usize = 0;
    while bound > 2 * m - 2 {
        bound = (m - 1) + bound / m;
        rounds += 1;
    }
    rounds
}

/// Scratch of [`RadixCiphertext::propagate_carries_inplace`].
///
/// Blocks `[0, n)` of `parts` receive the message of every digit, blocks
/// `[n, 2n)` its carry.
pub struct CarryPropagationBuffer<B: Backend> {
    num_blocks: usize,
    split_rounds: usize,
    split: RadixLut<B>,
    parts: LweArray<DeviceBuf<B>>,
    classify: RadixLut<B, Reused>,
    extract: RadixLut<B, Reused>,
    scan: PrefixScanBuffer<B>,
    states: LweArray<DeviceBuf<B>>,
}

impl<B: Backend> CarryPropagationBuffer<B> {
    pub fn alloc(module: &Module<B>, ctx: &ExecutionContext<B>, params: &SchemeParameters, num_blocks: usize) -> Self
    where
        Module<B>: RadixModule<B>,
    {
        assert!(num_blocks > 0, "carry propagation over zero blocks");
        params.assert_valid();
        let m: u64 = params.message_modulus.0;

        let mut split: RadixLut<B> = RadixLut::alloc(module, ctx, params, 2, 2 * num_blocks);
        split.generate_univariate(module, ctx, SplitSlot::Message, |x| x % m);
        split.generate_univariate(module, ctx, SplitSlot::Carry, |x| x / m);
        split.set_selector(module, ctx, 0..num_blocks, SplitSlot::Message);
        split.set_selector(module, ctx, num_blocks..2 * num_blocks, SplitSlot::Carry);
        let sources: Vec<usize> = (0..num_blocks).chain(0..num_blocks).collect();
        split.set_input_indexes(module, ctx, &sources);

        let mut classify: RadixLut<B, Reused> = RadixLut::alloc_reusing(module, ctx, params, 2, num_blocks, &split);
        classify.generate_univariate(module, ctx, ClassifySlot::GenerateOnly, |x| {
            if x >= m { CarryState::Generated as u64 } else { CarryState::None as u64 }
        });
        classify.generate_univariate(module, ctx, ClassifySlot::GenerateOrPropagate, |x| {
            if x >= m {
                CarryState::Generated as u64
            } else if x == m - 1 {
                CarryState::Propagated as u64
            } else {
                CarryState::None as u64
            }
        });
        classify.set_selector(module, ctx, 0..1, ClassifySlot::GenerateOnly);
        classify.set_selector(module, ctx, 1..num_blocks, ClassifySlot::GenerateOrPropagate);

        let mut extract: RadixLut<B, Reused> = RadixLut::alloc_reusing(module, ctx, params, 1, num_blocks, &split);
        extract.generate_univariate(module, ctx, 0, |x| x % m);

        let split_rounds: usize = split_rounds(params);
        tracing::debug!(num_blocks, split_rounds, "carry propagation buffer");
        Self {
            num_blocks,
            split_rounds,
            split,
            parts: module.lwe_array_alloc(params.big_lwe_dimension(), 2 * num_blocks),
            classify,
            extract,
            scan: PrefixScanBuffer::alloc(module, ctx, params, num_blocks, CombineRule::CARRY),
            states: module.lwe_array_alloc(params.big_lwe_dimension(), num_blocks),
        }
    }

    pub fn alloc_bytes(module: &Module<B>, params: &SchemeParameters, num_blocks: usize) -> usize
    where
        Module<B>: RadixModule<B>,
    {
        RadixLut::<B, Owned<B>>::alloc_bytes(module, params, 2, 2 * num_blocks)
            + RadixLut::<B, Reused>::alloc_reusing_bytes(params, 2, num_blocks)
            + RadixLut::<B, Reused>::alloc_reusing_bytes(params, 1, num_blocks)
            + PrefixScanBuffer::alloc_bytes(module, params, num_blocks)
            + LweArray::<Vec<Torus>>::alloc_words(params.big_lwe_dimension(), 3 * num_blocks) * WORD_BYTES
    }

    pub fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    pub fn release(self, module: &Module<B>)
    where
        Module<B>: RadixModule<B>,
    {
        self.extract.release(module);
        self.classify.release(module);
        self.split.release(module);
        self.scan.release(module);
        module.lwe_array_release(self.parts);
        module.lwe_array_release(self.states);
    }
}

impl<D: DataMut> RadixCiphertext<D> {
    /// Folds every carry into the block above it and reduces each block
    /// modulo `M`. Every digit may hold up to `M * C - 1`; the carry out of
    /// the top block is dropped.
    #[tracing::instrument(skip_all, fields(num_blocks = self.num_blocks()))]
    pub fn propagate_carries_inplace<B: Backend>(
        &mut self,
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        keys: &ServerKeys<B>,
        buf: &mut CarryPropagationBuffer<B>,
    ) where
        Module<B>: RadixModule<B>,
    {
        let n: usize = self.num_blocks();
        assert_eq!(n, buf.num_blocks, "buffer sized for {} blocks", buf.num_blocks);

        let CarryPropagationBuffer {
            split_rounds,
            split,
            parts,
            classify,
            extract,
            scan,
            states,
            ..
        } = buf;

        if n == 1 {
            extract.apply_univariate_inplace_with(module, ctx, split.workspace_mut(), &mut self.blocks, keys);
            return;
        }

        for _ in 0..*split_rounds {
            split.apply_univariate(module, ctx, &mut *parts, &self.blocks, keys);
            module.device_copy(ctx, self.blocks.raw_mut(), parts.range(0, n).raw());
            module.lwe_add_inplace(ctx, &mut self.blocks.range_mut(1, n), &parts.range(n, 2 * n - 1));
        }

        classify.apply_univariate_with(module, ctx, split.workspace_mut(), &mut *states, &self.blocks, keys);
        scan.scan_inplace(module, ctx, &mut *states, keys);
        // the scan leaves the carry out of block i in state i
        module.lwe_add_inplace(ctx, &mut self.blocks.range_mut(1, n), &states.range(0, n - 1));

        extract.apply_univariate_inplace_with(module, ctx, split.workspace_mut(), &mut self.blocks, keys);
    }
}
