mod bitwise;
mod carry;
mod cmux;
mod comparison;
mod lifecycle;
mod linear;
mod mul;
mod shift;

pub use bitwise::*;
pub use carry::*;
pub use cmux::*;
pub use comparison::*;
pub use lifecycle::*;
pub use linear::*;
pub use mul::*;
pub use shift::*;

use backend::{
    api::{DeviceCopy, LweArrayAlloc},
    layouts::{
        Backend, CarryModulus, DataRef, DecompBaseLog, DecompLevel, DeviceBuf, ExecutionContext, GlweDimension,
        LweArray, LweDimension, MessageModulus, Module, PbsVariant, PolynomialSize, SchemeParameters, ServerKeys, Torus,
    },
};
use sampling::source::Source;

use crate::{RadixCiphertext, RadixModule, radix_modulus};

/// Small ring, `M = C = 4`: every engine accepts it.
pub const TEST_PARAMS: SchemeParameters = SchemeParameters {
    pbs_variant: PbsVariant::Classic,
    glwe_dimension: GlweDimension(1),
    polynomial_size: PolynomialSize(256),
    small_lwe_dimension: LweDimension(16),
    ks_base_log: DecompBaseLog(3),
    ks_level: DecompLevel(5),
    pbs_base_log: DecompBaseLog(23),
    pbs_level: DecompLevel(1),
    message_modulus: MessageModulus(4),
    carry_modulus: CarryModulus(4),
};

/// `M = C = 8`: three-bit digits, multiplication chunks of nine terms.
pub const TEST_PARAMS_MESSAGE_3_CARRY_3: SchemeParameters = SchemeParameters {
    pbs_variant: PbsVariant::Classic,
    glwe_dimension: GlweDimension(1),
    polynomial_size: PolynomialSize(1024),
    small_lwe_dimension: LweDimension(16),
    ks_base_log: DecompBaseLog(3),
    ks_level: DecompLevel(6),
    pbs_base_log: DecompBaseLog(15),
    pbs_level: DecompLevel(2),
    message_modulus: MessageModulus(8),
    carry_modulus: CarryModulus(8),
};

pub const TEST_NUM_BLOCKS: usize = 4;

/// Operand draws per scenario.
pub const TEST_TRIALS: usize = 4;

pub struct TestContext<BE: Backend> {
    pub module: Module<BE>,
    pub keys: ServerKeys<BE>,
    pub params: SchemeParameters,
}

impl<BE: Backend> TestContext<BE> {
    pub fn new(module: Module<BE>, keys: ServerKeys<BE>, params: SchemeParameters) -> Self {
        params.assert_valid();
        Self { module, keys, params }
    }

    /// `M^n`.
    pub fn modulus(&self, num_blocks: usize) -> u128 {
        match radix_modulus(&self.params, num_blocks) {
            Some(modulus) => modulus,
            None => panic!("{num_blocks} blocks overflow a u128"),
        }
    }

    pub fn sample(&self, source: &mut Source, num_blocks: usize) -> u128 {
        source.next_u128_bits(self.params.bits_per_block() * num_blocks)
    }

    /// Device radix ciphertext holding the noiseless encoding of `value`.
    pub fn encrypt(&self, ctx: &ExecutionContext<BE>, value: u128, num_blocks: usize) -> RadixCiphertext<DeviceBuf<BE>>
    where
        Module<BE>: RadixModule<BE>,
    {
        let mut host: RadixCiphertext<Vec<Torus>> = RadixCiphertext::alloc(&self.params, num_blocks);
        host.encode_trivial(&self.params, value);
        let mut ct: RadixCiphertext<DeviceBuf<BE>> = self.zero(num_blocks);
        self.module
            .device_upload(ctx, ct.blocks_mut().raw_mut(), host.blocks().raw());
        ct
    }

    /// Device radix ciphertext whose block `i` holds `digits[i]`, which may
    /// exceed `M - 1`.
    pub fn encrypt_digits(&self, ctx: &ExecutionContext<BE>, digits: &[u64]) -> RadixCiphertext<DeviceBuf<BE>>
    where
        Module<BE>: RadixModule<BE>,
    {
        let mut host: LweArray<Vec<Torus>> = LweArray::alloc(self.params.big_lwe_dimension(), digits.len());
        for (i, d) in digits.iter().enumerate() {
            assert!(*d < self.params.total_modulus(), "digit {d} exceeds the block");
            *host.body_mut(i) = self.params.encode(*d);
        }
        let mut ct: RadixCiphertext<DeviceBuf<BE>> = self.zero(digits.len());
        self.module.device_upload(ctx, ct.blocks_mut().raw_mut(), host.raw());
        ct
    }

    /// `sum_i digits[i] * M^i mod M^n`.
    pub fn digits_value(&self, digits: &[u64]) -> u128 {
        let base: u128 = self.params.message_modulus.0 as u128;
        let value: u128 = digits.iter().rev().fold(0u128, |acc, d| acc * base + *d as u128);
        value % self.modulus(digits.len())
    }

    pub fn zero(&self, num_blocks: usize) -> RadixCiphertext<DeviceBuf<BE>>
    where
        Module<BE>: RadixModule<BE>,
    {
        RadixCiphertext::from_blocks(
            self.module
                .lwe_array_alloc(self.params.big_lwe_dimension(), num_blocks),
        )
    }

    /// Single block holding `value`, as a condition for `cmux`.
    pub fn encrypt_block(&self, ctx: &ExecutionContext<BE>, value: u64) -> LweArray<DeviceBuf<BE>>
    where
        Module<BE>: RadixModule<BE>,
    {
        let mut host: LweArray<Vec<Torus>> = LweArray::alloc(self.params.big_lwe_dimension(), 1);
        *host.body_mut(0) = self.params.encode(value);
        let mut block: LweArray<DeviceBuf<BE>> = self.module.lwe_array_alloc(self.params.big_lwe_dimension(), 1);
        self.module.device_upload(ctx, block.raw_mut(), host.raw());
        block
    }

    pub fn decrypt<D: DataRef>(&self, ct: &RadixCiphertext<D>) -> u128 {
        ct.decode_trivial(&self.params)
    }

    /// Asserts every digit is canonical, i.e. below `M`.
    pub fn assert_canonical<D: DataRef>(&self, ct: &RadixCiphertext<D>) {
        let m: u64 = self.params.message_modulus.0;
        for (i, d) in ct.digits_trivial(&self.params).iter().enumerate() {
            assert!(*d < m, "digit {i} = {d} is not below {m}");
        }
    }

    pub fn release(&self, ct: RadixCiphertext<DeviceBuf<BE>>)
    where
        Module<BE>: RadixModule<BE>,
    {
        self.module.lwe_array_release(ct.into_blocks());
    }
}
