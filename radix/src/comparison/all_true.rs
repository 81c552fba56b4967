use std::ops::Range;

use backend::{
    api::{DeviceCopy, LweAccumulate, LweArrayAlloc},
    layouts::{
        Backend, DataMut, DataRef, DeviceBuf, ExecutionContext, LweArray, Module, SchemeParameters, ServerKeys, Torus,
    },
};
use itertools::Itertools;
use utils::Map;

use crate::{
    RadixModule, WORD_BYTES,
    lut::{LutWorkspace, Owned, RadixLut, Reused},
};

/// How a vector of boolean blocks is folded into one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BooleanFold {
    /// Every block is true.
    All,
    /// At least one block is true.
    Any,
}

struct FoldLevel<B: Backend, W: LutWorkspace<B>> {
    chunks: Vec<Range<usize>>,
    lut: RadixLut<B, W>,
}

/// Chunks of each level, until a single block remains.
fn plan_levels(num_blocks: usize, max_chunk: usize) -> Vec<Vec<Range<usize>>> {
    let mut levels: Vec<Vec<Range<usize>>> = Vec::new();
    let mut remaining: usize = num_blocks;
    while remaining > 1 {
        let chunks: Vec<Range<usize>> = (0..remaining)
            .step_by(max_chunk)
            .map(|start| start..(start + max_chunk).min(remaining))
            .collect();
        remaining = chunks.len();
        levels.push(chunks);
    }
    levels
}

fn max_chunk(params: &SchemeParameters) -> usize {
    (params.total_modulus() - 1) as usize
}

fn fold_level<B, W>(
    module: &Module<B>,
    ctx: &ExecutionContext<B>,
    chunks: Vec<Range<usize>>,
    fold: BooleanFold,
    mut lut: RadixLut<B, W>,
) -> FoldLevel<B, W>
where
    B: Backend,
    Module<B>: RadixModule<B>,
    W: LutWorkspace<B>,
{
    match fold {
        BooleanFold::All => {
            // one table per distinct chunk length
            let mut slots: Map<usize, usize> = Map::new();
            let selectors: Vec<usize> = chunks
                .iter()
                .map(|chunk| {
                    let len: usize = chunk.len();
                    if let Some(slot) = slots.get(&len).copied() {
                        return slot;
                    }
                    let slot: usize = slots.len();
                    slots.insert(len, slot);
                    lut.generate_univariate(module, ctx, slot, |x| (x == len as u64) as u64);
                    slot
                })
                .collect();
            lut.set_selectors(module, ctx, &selectors);
        }
        BooleanFold::Any => {
            lut.generate_univariate(module, ctx, 0, |x| (x != 0) as u64);
        }
    }
    FoldLevel { chunks, lut }
}

fn num_luts(chunks: &[Range<usize>], fold: BooleanFold) -> usize {
    match fold {
        BooleanFold::All => chunks.iter().map(|c| c.len()).unique().count(),
        BooleanFold::Any => 1,
    }
}

/// Folds boolean blocks by summing chunks of up to `M * C - 1` of them into
/// one block and testing the sum, level after level.
pub struct AreAllBlocksTrueBuffer<B: Backend> {
    num_blocks: usize,
    fold: BooleanFold,
    first: Option<FoldLevel<B, Owned<B>>>,
    rest: Vec<FoldLevel<B, Reused>>,
    sums: LweArray<DeviceBuf<B>>,
}

impl<B: Backend> AreAllBlocksTrueBuffer<B> {
    pub fn alloc(
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        params: &SchemeParameters,
        num_blocks: usize,
        fold: BooleanFold,
    ) -> Self
    where
        Module<B>: RadixModule<B>,
    {
        assert!(num_blocks > 0, "boolean fold over zero blocks");
        let mut levels: std::vec::IntoIter<Vec<Range<usize>>> = plan_levels(num_blocks, max_chunk(params)).into_iter();

        let first: Option<FoldLevel<B, Owned<B>>> = levels.next().map(|chunks| {
            let lut: RadixLut<B> = RadixLut::alloc(module, ctx, params, num_luts(&chunks, fold), chunks.len());
            fold_level(module, ctx, chunks, fold, lut)
        });

        let rest: Vec<FoldLevel<B, Reused>> = match &first {
            Some(base) => levels
                .map(|chunks| {
                    let lut: RadixLut<B, Reused> =
                        RadixLut::alloc_reusing(module, ctx, params, num_luts(&chunks, fold), chunks.len(), &base.lut);
                    fold_level(module, ctx, chunks, fold, lut)
                })
                .collect(),
            None => Vec::new(),
        };

        let max_sums: usize = first.as_ref().map(|l| l.chunks.len()).unwrap_or(1);
        tracing::debug!(num_blocks, ?fold, levels = rest.len() + first.is_some() as usize, "boolean fold buffer");
        Self {
            num_blocks,
            fold,
            first,
            rest,
            sums: module.lwe_array_alloc(params.big_lwe_dimension(), max_sums),
        }
    }

    pub fn alloc_bytes(module: &Module<B>, params: &SchemeParameters, num_blocks: usize, fold: BooleanFold) -> usize
    where
        Module<B>: RadixModule<B>,
    {
        let levels: Vec<Vec<Range<usize>>> = plan_levels(num_blocks, max_chunk(params));
        let luts: usize = levels
            .iter()
            .enumerate()
            .map(|(l, chunks)| {
                if l == 0 {
                    RadixLut::<B, Owned<B>>::alloc_bytes(module, params, num_luts(chunks, fold), chunks.len())
                } else {
                    RadixLut::<B, Reused>::alloc_reusing_bytes(params, num_luts(chunks, fold), chunks.len())
                }
            })
            .sum();
        let max_sums: usize = levels.first().map(|c| c.len()).unwrap_or(1);
        luts + LweArray::<Vec<Torus>>::alloc_words(params.big_lwe_dimension(), max_sums) * WORD_BYTES
    }

    pub fn fold(&self) -> BooleanFold {
        self.fold
    }

    pub fn release(self, module: &Module<B>)
    where
        Module<B>: RadixModule<B>,
    {
        for level in self.rest {
            level.lut.release(module);
        }
        if let Some(level) = self.first {
            level.lut.release(module);
        }
        module.lwe_array_release(self.sums);
    }

    /// Writes the fold of the boolean blocks `states` into the single block of
    /// `res`. `states` is used as scratch.
    pub fn reduce<R, S>(
        &mut self,
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        res: &mut LweArray<R>,
        states: &mut LweArray<S>,
        keys: &ServerKeys<B>,
    ) where
        Module<B>: RadixModule<B>,
        R: DataMut,
        S: DataMut,
    {
        assert_eq!(res.count(), 1, "boolean fold writes one block");
        assert_eq!(states.count(), self.num_blocks, "fold sized for {} blocks", self.num_blocks);

        let Some(first) = self.first.as_mut() else {
            module.device_copy(ctx, res.raw_mut(), states.at(0));
            return;
        };

        accumulate_chunks(module, ctx, &mut self.sums, states, &first.chunks);
        let count: usize = first.chunks.len();
        if self.rest.is_empty() {
            first.lut.apply_univariate(module, ctx, res, &self.sums.range(0, count), keys);
            return;
        }
        first
            .lut
            .apply_univariate(module, ctx, &mut states.range_mut(0, count), &self.sums.range(0, count), keys);

        let last: usize = self.rest.len() - 1;
        for (l, level) in self.rest.iter().enumerate() {
            accumulate_chunks(module, ctx, &mut self.sums, states, &level.chunks);
            let count: usize = level.chunks.len();
            let ws = first.lut.workspace_mut();
            if l == last {
                level.lut.apply_univariate_with(module, ctx, ws, res, &self.sums.range(0, count), keys);
            } else {
                level.lut.apply_univariate_with(
                    module,
                    ctx,
                    ws,
                    &mut states.range_mut(0, count),
                    &self.sums.range(0, count),
                    keys,
                );
            }
        }
    }
}

fn accumulate_chunks<B, S>(
    module: &Module<B>,
    ctx: &ExecutionContext<B>,
    sums: &mut LweArray<DeviceBuf<B>>,
    states: &LweArray<S>,
    chunks: &[Range<usize>],
) where
    B: Backend,
    Module<B>: RadixModule<B>,
    S: DataRef,
{
    for (k, chunk) in chunks.iter().enumerate() {
        module.lwe_accumulate(ctx, &mut sums.range_mut(k, k + 1), &states.range(chunk.start, chunk.end));
    }
}
