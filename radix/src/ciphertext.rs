use backend::layouts::{Data, DataMut, DataRef, LweArray, SchemeParameters, Torus};

/// An unsigned integer as `n` big-LWE blocks, least significant digit first.
///
/// The plaintext is `sum_i digit_i * M^i`. Blocks may temporarily hold digits
/// above `M - 1` between a linear operation and the carry propagation that
/// normalizes them.
pub struct RadixCiphertext<D: Data> {
    pub(crate) blocks: LweArray<D>,
}

impl RadixCiphertext<Vec<Torus>> {
    pub fn alloc(params: &SchemeParameters, num_blocks: usize) -> Self {
        Self {
            blocks: LweArray::alloc(params.big_lwe_dimension(), num_blocks),
        }
    }
}

impl<D: Data> RadixCiphertext<D> {
    pub fn from_blocks(blocks: LweArray<D>) -> Self {
        Self { blocks }
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks.count()
    }

    pub fn blocks(&self) -> &LweArray<D> {
        &self.blocks
    }

    pub fn into_blocks(self) -> LweArray<D> {
        self.blocks
    }
}

impl<D: DataRef> RadixCiphertext<D> {
    pub fn to_ref(&self) -> RadixCiphertext<&[Torus]> {
        RadixCiphertext {
            blocks: self.blocks.to_ref(),
        }
    }

    /// Block `i` as a one-block array.
    pub fn block(&self, i: usize) -> LweArray<&[Torus]> {
        self.blocks.range(i, i + 1)
    }

    /// Digits of a trivial (zero-mask) ciphertext, in `[0, 2 * M * C)`.
    pub fn digits_trivial(&self, params: &SchemeParameters) -> Vec<u64> {
        (0..self.num_blocks())
            .map(|i| params.decode(self.blocks.body(i)))
            .collect()
    }

    /// Plaintext of a trivial ciphertext, `sum_i digit_i * M^i`.
    pub fn decode_trivial(&self, params: &SchemeParameters) -> u128 {
        let base: u128 = params.message_modulus.0 as u128;
        self.digits_trivial(params)
            .iter()
            .rev()
            .fold(0u128, |acc, d| acc.wrapping_mul(base).wrapping_add(*d as u128))
    }
}

impl<D: DataMut> RadixCiphertext<D> {
    pub fn blocks_mut(&mut self) -> &mut LweArray<D> {
        &mut self.blocks
    }

    pub fn to_mut(&mut self) -> RadixCiphertext<&mut [Torus]> {
        RadixCiphertext {
            blocks: self.blocks.to_mut(),
        }
    }

    /// Overwrites `self` with the noiseless encryption of `value`.
    pub fn encode_trivial(&mut self, params: &SchemeParameters, value: u128) {
        let digits: Vec<u64> = scalar_digits(params, value, self.num_blocks());
        self.blocks.raw_mut().fill(0);
        for (i, d) in digits.iter().enumerate() {
            *self.blocks.body_mut(i) = params.encode(*d);
        }
    }
}

/// `M^n`, or `None` when it does not fit in a `u128`.
pub fn radix_modulus(params: &SchemeParameters, num_blocks: usize) -> Option<u128> {
    let bits: usize = params.bits_per_block() * num_blocks;
    if bits < 128 { Some(1u128 << bits) } else { None }
}

/// Base-`M` decomposition of `scalar` on `num_blocks` digits.
///
/// Panics if `scalar` does not fit on `num_blocks` digits.
pub fn scalar_digits(params: &SchemeParameters, scalar: u128, num_blocks: usize) -> Vec<u64> {
    if let Some(modulus) = radix_modulus(params, num_blocks) {
        assert!(
            scalar < modulus,
            "scalar {scalar} does not fit on {num_blocks} digits of modulus {}",
            params.message_modulus.0
        );
    }
    let bits: usize = params.bits_per_block();
    let mask: u128 = (params.message_modulus.0 - 1) as u128;
    (0..num_blocks)
        .map(|i| {
            let shift: usize = i * bits;
            if shift < 128 { ((scalar >> shift) & mask) as u64 } else { 0 }
        })
        .collect()
}
