use std::ops::Range;

use backend::{
    api::{DeviceCopy, DeviceFill, LweAccumulate, LweAdd, LweArrayAlloc, LwePackBivariate},
    layouts::{
        Backend, DataMut, DataRef, DeviceBuf, ExecutionContext, LweArray, Module, SchemeParameters, ServerKeys, Torus,
    },
};

use crate::{
    CarryPropagationBuffer, RadixCiphertext, RadixModule, WORD_BYTES,
    lut::{LutSlot, Owned, RadixLut, Reused},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PartialSlot {
    /// `x * y mod M`, lands in column `i + j`.
    Low,
    /// `x * y div M`, lands in column `i + j + 1`.
    High,
}

impl LutSlot for PartialSlot {
    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ColumnSlot {
    Message,
    Carry,
}

impl LutSlot for ColumnSlot {
    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TermSource {
    /// A term of the current array carried over unchanged.
    Kept(usize),
    /// An output of the round's message/carry bootstrap.
    Extracted(usize),
}

/// One column-sum round: chunks of terms are summed, each sum is split into
/// its message (same column) and carry (next column).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct RoundPlan {
    chunks: Vec<Range<usize>>,
    extract_inputs: Vec<usize>,
    extract_slots: Vec<ColumnSlot>,
    next: Vec<TermSource>,
}

/// Static schedule of a schoolbook product truncated to `n` blocks.
///
/// Terms are kept sorted by output column; `columns[c]` is the range of the
/// terms of column `c` once every round has run.
#[derive(Clone, Debug, PartialEq, Eq)]
struct MulPlan {
    /// `(lhs block, rhs block)` of every pair with `i + j < n`, by column.
    pairs: Vec<(usize, usize)>,
    partial_inputs: Vec<usize>,
    partial_slots: Vec<PartialSlot>,
    rounds: Vec<RoundPlan>,
    columns: Vec<Range<usize>>,
}

impl MulPlan {
    fn new(num_blocks: usize, chunk_size: usize) -> Self {
        assert!(chunk_size >= 3, "chunks of {chunk_size} terms cannot shrink a column");
        let n: usize = num_blocks;
        let column_pairs = |c: usize| c * (c + 1) / 2..(c + 1) * (c + 2) / 2;

        let pairs: Vec<(usize, usize)> = (0..n).flat_map(|c| (0..=c).map(move |i| (c - i, i))).collect();

        let mut partial_inputs: Vec<usize> = Vec::with_capacity(n * n);
        let mut partial_slots: Vec<PartialSlot> = Vec::with_capacity(n * n);
        let mut columns: Vec<Range<usize>> = Vec::with_capacity(n);
        for c in 0..n {
            let start: usize = partial_inputs.len();
            for p in column_pairs(c) {
                partial_inputs.push(p);
                partial_slots.push(PartialSlot::Low);
            }
            if c > 0 {
                for p in column_pairs(c - 1) {
                    partial_inputs.push(p);
                    partial_slots.push(PartialSlot::High);
                }
            }
            columns.push(start..partial_inputs.len());
        }

        let mut rounds: Vec<RoundPlan> = Vec::new();
        while columns.iter().any(|col| col.len() > 2) {
            let mut round: RoundPlan = RoundPlan::default();
            let mut next_columns: Vec<Vec<TermSource>> = vec![Vec::new(); n];

            for (c, col) in columns.iter().enumerate() {
                if col.len() <= 2 {
                    next_columns[c].extend(col.clone().map(TermSource::Kept));
                    continue;
                }
                let mut start: usize = col.start;
                while start < col.end {
                    let end: usize = (start + chunk_size).min(col.end);
                    if end - start == 1 {
                        next_columns[c].push(TermSource::Kept(start));
                    } else {
                        let sum: usize = round.chunks.len();
                        round.chunks.push(start..end);
                        next_columns[c].push(TermSource::Extracted(round.extract_inputs.len()));
                        round.extract_inputs.push(sum);
                        round.extract_slots.push(ColumnSlot::Message);
                        // carries out of the top column are dropped
                        if c + 1 < n {
                            next_columns[c + 1].push(TermSource::Extracted(round.extract_inputs.len()));
                            round.extract_inputs.push(sum);
                            round.extract_slots.push(ColumnSlot::Carry);
                        }
                    }
                    start = end;
                }
            }

            columns.clear();
            for terms in next_columns {
                let start: usize = round.next.len();
                round.next.extend(terms);
                columns.push(start..round.next.len());
            }
            rounds.push(round);
        }

        Self {
            pairs,
            partial_inputs,
            partial_slots,
            rounds,
            columns,
        }
    }

    fn num_terms(&self) -> usize {
        self.partial_inputs.len()
    }

    fn max_sums(&self) -> usize {
        self.rounds.iter().map(|r| r.chunks.len()).max().unwrap_or(0).max(1)
    }

    fn max_extracted(&self) -> usize {
        self.rounds.iter().map(|r| r.extract_inputs.len()).max().unwrap_or(0).max(1)
    }
}

fn chunk_size(params: &SchemeParameters) -> usize {
    ((params.total_modulus() - 1) / (params.message_modulus.0 - 1)) as usize
}

fn assert_mul_params(params: &SchemeParameters) {
    params.assert_valid();
    assert_eq!(
        params.carry_modulus.0, params.message_modulus.0,
        "multiplication needs C == M, got M={} C={}",
        params.message_modulus.0, params.carry_modulus.0
    );
}

/// Scratch of [`RadixCiphertext::mul`].
pub struct MulBuffer<B: Backend> {
    params: SchemeParameters,
    num_blocks: usize,
    plan: MulPlan,
    lhs_pairs: LweArray<DeviceBuf<B>>,
    rhs_pairs: LweArray<DeviceBuf<B>>,
    packed: LweArray<DeviceBuf<B>>,
    partial: RadixLut<B>,
    round_luts: Vec<RadixLut<B, Reused>>,
    sums: LweArray<DeviceBuf<B>>,
    extracted: LweArray<DeviceBuf<B>>,
    terms: [LweArray<DeviceBuf<B>>; 2],
    carry: CarryPropagationBuffer<B>,
}

impl<B: Backend> MulBuffer<B> {
    pub fn alloc(module: &Module<B>, ctx: &ExecutionContext<B>, params: &SchemeParameters, num_blocks: usize) -> Self
    where
        Module<B>: RadixModule<B>,
    {
        assert!(num_blocks > 0, "multiplication over zero blocks");
        assert_mul_params(params);

        let m: u64 = params.message_modulus.0;
        let plan: MulPlan = MulPlan::new(num_blocks, chunk_size(params));
        let num_pairs: usize = plan.pairs.len();
        let num_terms: usize = plan.num_terms();
        let dim: usize = params.big_lwe_dimension();

        let mut partial: RadixLut<B> = RadixLut::alloc(module, ctx, params, 2, num_terms);
        partial.generate_bivariate(module, ctx, PartialSlot::Low, |x, y| (x * y) % m);
        partial.generate_bivariate(module, ctx, PartialSlot::High, |x, y| (x * y) / m);
        partial.set_selectors(module, ctx, &plan.partial_slots);
        partial.set_input_indexes(module, ctx, &plan.partial_inputs);

        let round_luts: Vec<RadixLut<B, Reused>> = plan
            .rounds
            .iter()
            .map(|round| {
                let mut lut: RadixLut<B, Reused> =
                    RadixLut::alloc_reusing(module, ctx, params, 2, round.extract_inputs.len(), &partial);
                lut.generate_univariate(module, ctx, ColumnSlot::Message, |x| x % m);
                lut.generate_univariate(module, ctx, ColumnSlot::Carry, |x| x / m);
                lut.set_selectors(module, ctx, &round.extract_slots);
                lut.set_input_indexes(module, ctx, &round.extract_inputs);
                lut
            })
            .collect();

        tracing::debug!(
            num_blocks,
            num_pairs,
            num_terms,
            rounds = plan.rounds.len(),
            "multiplication buffer"
        );

        Self {
            params: *params,
            num_blocks,
            lhs_pairs: module.lwe_array_alloc(dim, num_pairs),
            rhs_pairs: module.lwe_array_alloc(dim, num_pairs),
            packed: module.lwe_array_alloc(dim, num_pairs),
            partial,
            round_luts,
            sums: module.lwe_array_alloc(dim, plan.max_sums()),
            extracted: module.lwe_array_alloc(dim, plan.max_extracted()),
            terms: [
                module.lwe_array_alloc(dim, num_terms),
                module.lwe_array_alloc(dim, num_terms),
            ],
            carry: CarryPropagationBuffer::alloc(module, ctx, params, num_blocks),
            plan,
        }
    }

    pub fn alloc_bytes(module: &Module<B>, params: &SchemeParameters, num_blocks: usize) -> usize
    where
        Module<B>: RadixModule<B>,
    {
        assert_mul_params(params);
        let plan: MulPlan = MulPlan::new(num_blocks, chunk_size(params));
        let dim: usize = params.big_lwe_dimension();
        let arrays: usize = 3 * plan.pairs.len() + plan.max_sums() + plan.max_extracted() + 2 * plan.num_terms();
        let round_luts: usize = plan
            .rounds
            .iter()
            .map(|round| RadixLut::<B, Reused>::alloc_reusing_bytes(params, 2, round.extract_inputs.len()))
            .sum();
        LweArray::<Vec<Torus>>::alloc_words(dim, arrays) * WORD_BYTES
            + RadixLut::<B, Owned<B>>::alloc_bytes(module, params, 2, plan.num_terms())
            + round_luts
            + CarryPropagationBuffer::alloc_bytes(module, params, num_blocks)
    }

    pub fn release(self, module: &Module<B>)
    where
        Module<B>: RadixModule<B>,
    {
        for lut in self.round_luts {
            lut.release(module);
        }
        self.partial.release(module);
        for array in [self.lhs_pairs, self.rhs_pairs, self.packed, self.sums, self.extracted] {
            module.lwe_array_release(array);
        }
        let [even, odd] = self.terms;
        module.lwe_array_release(even);
        module.lwe_array_release(odd);
        self.carry.release(module);
    }
}

impl<D: DataMut> RadixCiphertext<D> {
    /// `self = lhs * rhs mod M^n`, for canonical operands.
    #[tracing::instrument(skip_all, fields(num_blocks = self.num_blocks()))]
    pub fn mul<B, A, C>(
        &mut self,
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        lhs: &RadixCiphertext<A>,
        rhs: &RadixCiphertext<C>,
        keys: &ServerKeys<B>,
        buf: &mut MulBuffer<B>,
    ) where
        B: Backend,
        Module<B>: RadixModule<B>,
        A: DataRef,
        C: DataRef,
    {
        let n: usize = buf.num_blocks;
        assert_eq!(self.num_blocks(), n, "buffer sized for {n} blocks");
        assert_eq!(lhs.num_blocks(), n, "lhs holds {} blocks, {n} expected", lhs.num_blocks());
        assert_eq!(rhs.num_blocks(), n, "rhs holds {} blocks, {n} expected", rhs.num_blocks());

        let MulBuffer {
            params,
            plan,
            lhs_pairs,
            rhs_pairs,
            packed,
            partial,
            round_luts,
            sums,
            extracted,
            terms: [even, odd],
            carry,
            ..
        } = buf;

        for (p, (j, i)) in plan.pairs.iter().enumerate() {
            module.device_copy(ctx, lhs_pairs.at_mut(p), lhs.blocks.at(*j));
            module.device_copy(ctx, rhs_pairs.at_mut(p), rhs.blocks.at(*i));
        }
        module.lwe_pack_bivariate(ctx, packed, lhs_pairs, rhs_pairs, params.message_modulus.0);

        // every low and high digit in one batch, already sorted by column
        partial.apply_univariate(module, ctx, &mut *even, packed, keys);

        for (r, (round, lut)) in plan.rounds.iter().zip(round_luts.iter()).enumerate() {
            let (cur, next): (&LweArray<DeviceBuf<B>>, &mut LweArray<DeviceBuf<B>>) =
                if r % 2 == 0 { (&*even, &mut *odd) } else { (&*odd, &mut *even) };

            for (k, chunk) in round.chunks.iter().enumerate() {
                module.lwe_accumulate(ctx, &mut sums.range_mut(k, k + 1), &cur.range(chunk.start, chunk.end));
            }
            lut.apply_univariate_with(
                module,
                ctx,
                partial.workspace_mut(),
                &mut extracted.range_mut(0, round.extract_inputs.len()),
                &sums.range(0, round.chunks.len()),
                keys,
            );
            for (dst, src) in round.next.iter().enumerate() {
                match src {
                    TermSource::Kept(t) => module.device_copy(ctx, next.at_mut(dst), cur.at(*t)),
                    TermSource::Extracted(e) => module.device_copy(ctx, next.at_mut(dst), extracted.at(*e)),
                }
            }
        }

        let last: &LweArray<DeviceBuf<B>> = if plan.rounds.len() % 2 == 0 { &*even } else { &*odd };
        for (c, col) in plan.columns.iter().enumerate() {
            match col.len() {
                0 => module.device_fill(ctx, self.blocks.at_mut(c), 0),
                1 => module.device_copy(ctx, self.blocks.at_mut(c), last.at(col.start)),
                _ => module.lwe_add(
                    ctx,
                    &mut self.blocks.range_mut(c, c + 1),
                    &last.range(col.start, col.start + 1),
                    &last.range(col.start + 1, col.end),
                ),
            }
        }

        self.propagate_carries_inplace(module, ctx, keys, carry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Runs the schedule on plaintext digits.
    fn simulate(plan: &MulPlan, a: &[u64], b: &[u64], m: u64) -> Vec<u64> {
        let n: usize = a.len();
        let mut terms: Vec<u64> = plan
            .partial_inputs
            .iter()
            .zip(&plan.partial_slots)
            .map(|(p, slot)| {
                let (j, i) = plan.pairs[*p];
                match slot {
                    PartialSlot::Low => (a[j] * b[i]) % m,
                    PartialSlot::High => (a[j] * b[i]) / m,
                }
            })
            .collect();

        for round in &plan.rounds {
            let sums: Vec<u64> = round.chunks.iter().map(|c| terms[c.clone()].iter().sum()).collect();
            sums.iter().for_each(|s| assert!(*s < m * m, "chunk sum {s} overflows the block"));
            let extracted: Vec<u64> = round
                .extract_inputs
                .iter()
                .zip(&round.extract_slots)
                .map(|(s, slot)| match slot {
                    ColumnSlot::Message => sums[*s] % m,
                    ColumnSlot::Carry => sums[*s] / m,
                })
                .collect();
            terms = round
                .next
                .iter()
                .map(|src| match src {
                    TermSource::Kept(t) => terms[*t],
                    TermSource::Extracted(e) => extracted[*e],
                })
                .collect();
        }

        let mut carry: u64 = 0;
        (0..n)
            .map(|c| {
                let v: u64 = terms[plan.columns[c].clone()].iter().sum::<u64>() + carry;
                carry = v / m;
                v % m
            })
            .collect()
    }

    fn digits(mut x: u64, m: u64, n: usize) -> Vec<u64> {
        (0..n)
            .map(|_| {
                let d: u64 = x % m;
                x /= m;
                d
            })
            .collect()
    }

    #[test]
    fn plan_shape() {
        let n: usize = 4;
        let plan: MulPlan = MulPlan::new(n, 5);
        assert_eq!(plan.pairs.len(), n * (n + 1) / 2);
        assert_eq!(plan.partial_slots.iter().filter(|s| **s == PartialSlot::High).count(), n * (n - 1) / 2);
        assert_eq!(plan.num_terms(), n * n);
        assert!(plan.columns.iter().all(|c| !c.is_empty() && c.len() <= 2));
        assert_eq!(plan.rounds.len(), 2);
    }

    #[test]
    fn single_block_plan_has_no_rounds() {
        let plan: MulPlan = MulPlan::new(1, 5);
        assert_eq!(plan.pairs, vec![(0, 0)]);
        assert!(plan.rounds.is_empty());
        assert_eq!(plan.columns, vec![0..1]);
    }

    #[test]
    fn plan_computes_truncated_products() {
        let m: u64 = 4;
        for n in 1..=6 {
            let plan: MulPlan = MulPlan::new(n, 5);
            let modulus: u64 = m.pow(n as u32);
            for (a, b) in [(179u64, 37u64), (255, 255), (0, 77), (1023, 3), (4095, 4095)] {
                let (a, b) = (a % modulus, b % modulus);
                let expected: Vec<u64> = digits((a * b) % modulus, m, n);
                assert_eq!(simulate(&plan, &digits(a, m, n), &digits(b, m, n), m), expected, "n={n} a={a} b={b}");
            }
        }
    }
}
