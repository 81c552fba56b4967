//! Associative scan and tree reduction of small per-block states.
//!
//! Carry propagation and relational comparison both fold a vector of
//! three-valued states with the same rule: the more significant state wins
//! unless it is the pass-through value, in which case the less significant
//! one is kept. [`PrefixScanBuffer`] evaluates every prefix of that fold
//! (Hillis-Steele, depth `ceil(log2 n)`), [`TreeReductionBuffer`] only the
//! full fold (pairwise tree, depth `ceil(log2 n)`, half the bootstraps).
//!
//! States are packed two per block as `msb * 4 + lsb`, so both buffers need
//! `M * C >= 16`.

use backend::{
    api::{DeviceCopy, LweArrayAlloc, LwePackPairs},
    layouts::{Backend, DataMut, DeviceBuf, ExecutionContext, LweArray, Module, SchemeParameters, ServerKeys, Torus},
};

use crate::{
    CarryState, RadixModule, WORD_BYTES,
    comparison::BlockOrdering,
    lut::{Owned, RadixLut, Reused},
};

/// Factor states are packed with before a combining bootstrap.
pub const STATE_PACK_FACTOR: u64 = 4;

/// `combine(msb, lsb) = if msb == pass_through { lsb } else { msb }`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CombineRule {
    pub pass_through: u64,
}

impl CombineRule {
    pub const CARRY: Self = Self {
        pass_through: CarryState::Propagated as u64,
    };

    pub const ORDERING: Self = Self {
        pass_through: BlockOrdering::Equal as u64,
    };

    pub fn combine(&self, msb: u64, lsb: u64) -> u64 {
        if msb == self.pass_through { lsb } else { msb }
    }

    /// Host fold of `states`, least significant first.
    pub fn fold(&self, states: &[u64]) -> Option<u64> {
        states.iter().copied().reduce(|lsb, msb| self.combine(msb, lsb))
    }
}

fn assert_state_capacity(params: &SchemeParameters) {
    assert!(
        params.total_modulus() >= STATE_PACK_FACTOR * STATE_PACK_FACTOR,
        "packing two states needs M * C >= {}, got {}",
        STATE_PACK_FACTOR * STATE_PACK_FACTOR,
        params.total_modulus()
    );
}

fn combine_lut<B: Backend>(
    module: &Module<B>,
    ctx: &ExecutionContext<B>,
    params: &SchemeParameters,
    capacity: usize,
    rule: CombineRule,
) -> RadixLut<B>
where
    Module<B>: RadixModule<B>,
{
    let mut lut: RadixLut<B> = RadixLut::alloc(module, ctx, params, 1, capacity).with_pack_factor(STATE_PACK_FACTOR);
    lut.generate_bivariate(module, ctx, 0, |msb, lsb| rule.combine(msb, lsb));
    lut
}

/// Inclusive prefix fold: block `i` ends up holding the fold of blocks `0..=i`.
pub struct PrefixScanBuffer<B: Backend> {
    num_blocks: usize,
    combine: Option<RadixLut<B>>,
    tmp: LweArray<DeviceBuf<B>>,
}

impl<B: Backend> PrefixScanBuffer<B> {
    pub fn alloc(
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        params: &SchemeParameters,
        num_blocks: usize,
        rule: CombineRule,
    ) -> Self
    where
        Module<B>: RadixModule<B>,
    {
        assert!(num_blocks > 0, "scan over zero blocks");
        assert_state_capacity(params);
        Self {
            num_blocks,
            combine: (num_blocks > 1).then(|| combine_lut(module, ctx, params, num_blocks - 1, rule)),
            tmp: module.lwe_array_alloc(params.big_lwe_dimension(), num_blocks),
        }
    }

    pub fn alloc_bytes(module: &Module<B>, params: &SchemeParameters, num_blocks: usize) -> usize
    where
        Module<B>: RadixModule<B>,
    {
        let lut: usize = if num_blocks > 1 {
            RadixLut::<B, Owned<B>>::alloc_bytes(module, params, 1, num_blocks - 1)
        } else {
            0
        };
        lut + LweArray::<Vec<Torus>>::alloc_words(params.big_lwe_dimension(), num_blocks) * WORD_BYTES
    }

    pub fn release(self, module: &Module<B>)
    where
        Module<B>: RadixModule<B>,
    {
        if let Some(lut) = self.combine {
            lut.release(module);
        }
        module.lwe_array_release(self.tmp);
    }

    pub fn scan_inplace<R: DataMut>(
        &mut self,
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        states: &mut LweArray<R>,
        keys: &ServerKeys<B>,
    ) where
        Module<B>: RadixModule<B>,
    {
        let n: usize = self.num_blocks;
        assert_eq!(states.count(), n, "scan sized for {n} blocks");
        let Some(combine) = self.combine.as_mut() else {
            return;
        };

        let mut distance: usize = 1;
        while distance < n {
            module.device_copy(ctx, self.tmp.raw_mut(), states.raw());
            combine.apply_bivariate(
                module,
                ctx,
                &mut states.range_mut(distance, n),
                &self.tmp.range(distance, n),
                &self.tmp.range(0, n - distance),
                keys,
            );
            distance <<= 1;
        }
    }
}

/// Full fold of `n` states through a pairwise tree, followed by a final map.
pub struct TreeReductionBuffer<B: Backend> {
    num_blocks: usize,
    combine: RadixLut<B>,
    last: RadixLut<B, Reused>,
    packed: LweArray<DeviceBuf<B>>,
}

impl<B: Backend> TreeReductionBuffer<B> {
    /// `finish` maps the folded state to the value written to the output.
    pub fn alloc<F>(
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        params: &SchemeParameters,
        num_blocks: usize,
        rule: CombineRule,
        finish: F,
    ) -> Self
    where
        Module<B>: RadixModule<B>,
        F: Fn(u64) -> u64,
    {
        assert!(num_blocks > 0, "reduction over zero blocks");
        assert_state_capacity(params);

        let combine: RadixLut<B> = combine_lut(module, ctx, params, (num_blocks / 2).max(1), rule);

        // the last bootstrap folds the final pair, or maps the only state
        let mut last: RadixLut<B, Reused> =
            RadixLut::alloc_reusing(module, ctx, params, 1, 1, &combine).with_pack_factor(STATE_PACK_FACTOR);
        if num_blocks == 1 {
            last.generate_univariate(module, ctx, 0, &finish);
        } else {
            last.generate_bivariate(module, ctx, 0, |msb, lsb| finish(rule.combine(msb, lsb)));
        }

        tracing::debug!(num_blocks, ?rule, "tree reduction buffer");
        Self {
            num_blocks,
            combine,
            last,
            packed: module.lwe_array_alloc(params.big_lwe_dimension(), num_blocks.div_ceil(2)),
        }
    }

    pub fn alloc_bytes(module: &Module<B>, params: &SchemeParameters, num_blocks: usize) -> usize
    where
        Module<B>: RadixModule<B>,
    {
        RadixLut::<B, Owned<B>>::alloc_bytes(module, params, 1, (num_blocks / 2).max(1))
            + RadixLut::<B, Reused>::alloc_reusing_bytes(params, 1, 1)
            + LweArray::<Vec<Torus>>::alloc_words(params.big_lwe_dimension(), num_blocks.div_ceil(2)) * WORD_BYTES
    }

    pub fn release(self, module: &Module<B>)
    where
        Module<B>: RadixModule<B>,
    {
        self.last.release(module);
        self.combine.release(module);
        module.lwe_array_release(self.packed);
    }

    /// Writes `finish(fold(states))` into the single block of `res`.
    /// `states` is used as scratch.
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
        assert_eq!(res.count(), 1, "reduction writes one block");
        assert_eq!(states.count(), self.num_blocks, "reduction sized for {} blocks", self.num_blocks);

        let mut remaining: usize = self.num_blocks;
        while remaining > 2 {
            let pairs: usize = remaining / 2;
            let packed_count: usize = remaining.div_ceil(2);
            module.lwe_pack_pairs(
                ctx,
                &mut self.packed.range_mut(0, packed_count),
                &states.range(0, remaining),
                STATE_PACK_FACTOR,
            );
            self.combine
                .apply_univariate(module, ctx, &mut states.range_mut(0, pairs), &self.packed.range(0, pairs), keys);
            if remaining % 2 == 1 {
                module.device_copy(ctx, states.at_mut(pairs), self.packed.at(pairs));
            }
            remaining = packed_count;
        }

        let ws = self.combine.workspace_mut();
        if remaining == 2 {
            module.lwe_pack_pairs(ctx, &mut self.packed.range_mut(0, 1), &states.range(0, 2), STATE_PACK_FACTOR);
            self.last
                .apply_univariate_with(module, ctx, ws, res, &self.packed.range(0, 1), keys);
        } else {
            self.last
                .apply_univariate_with(module, ctx, ws, res, &states.range(0, 1), keys);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carry_rule_folds_like_a_lookahead_adder() {
        let rule: CombineRule = CombineRule::CARRY;
        let none: u64 = CarryState::None as u64;
        let generated: u64 = CarryState::Generated as u64;
        let propagated: u64 = CarryState::Propagated as u64;
        assert_eq!(rule.fold(&[generated, propagated, propagated]), Some(generated));
        assert_eq!(rule.fold(&[none, propagated]), Some(none));
        assert_eq!(rule.fold(&[generated, none]), Some(none));
    }

    #[test]
    fn ordering_rule_keeps_most_significant_difference() {
        let rule: CombineRule = CombineRule::ORDERING;
        let inf: u64 = BlockOrdering::Inferior as u64;
        let eq: u64 = BlockOrdering::Equal as u64;
        let sup: u64 = BlockOrdering::Superior as u64;
        assert_eq!(rule.fold(&[sup, eq, inf]), Some(inf));
        assert_eq!(rule.fold(&[sup, eq, eq]), Some(sup));
        assert_eq!(rule.fold(&[eq, eq]), Some(eq));
        assert_eq!(rule.fold(&[]), None);
    }
}
