//! # radix
//!
//! Integer arithmetic on radix ciphertexts: an integer is split into `n`
//! base-`M` digits, each encrypted in its own LWE block with `log2(C)` bits of
//! headroom for carries. Programmable bootstrapping evaluates one lookup
//! function per block; the engines here compose batched bootstraps into
//! carry-correct integer operations.
//!
//! | Engine | Buffer | Entry points on [`RadixCiphertext`] |
//! |--------|--------|-------------------------------------|
//! | carry propagation | [`CarryPropagationBuffer`] | `propagate_carries_inplace` |
//! | multiplication | [`MulBuffer`] | `mul` |
//! | shift / rotate | [`ShiftBuffer`] | `shift_inplace`, `rotate_inplace` |
//! | comparison | [`comparison::ComparisonBuffer`] | `compare`, `compare_scalar` |
//! | select | [`CmuxBuffer`] | `cmux` |
//! | bitwise | [`BitwiseBuffer`] | `bitop`, `bitnot`, `scalar_bitop` |
//!
//! Every buffer follows the same lifecycle: `alloc` reserves its device
//! memory and uploads its lookup tables, `alloc_bytes` reports the device
//! footprint without allocating, and `release` consumes the buffer and
//! returns every allocation and execution context it owns. A buffer is
//! reusable across calls but serves one operation at a time.
//!
//! Preconditions are asserted; a violation panics.

mod bitwise;
mod carry;
mod ciphertext;
mod cmux;
pub mod comparison;
mod linear;
pub mod lut;
mod mul;
pub mod parameters;
pub mod reduction;
mod shift;
pub mod tests;

pub use bitwise::*;
pub use carry::*;
pub use ciphertext::*;
pub use cmux::*;
pub use mul::*;
pub use shift::*;

use backend::{
    api::{
        ContextCreate, ContextJoin, ContextSynchronize, DeviceAlloc, DeviceCopy, DeviceFill, EvaluateLut, EvaluateLutTmpWords,
        Keyswitch, LweAccumulate, LweAdd, LweAddEncodedInplace, LweAddInplace, LweArrayAlloc, LweMulScalarInplace,
        LweNegateInplace, LwePackBivariate, LwePackPairs, LweSub,
    },
    layouts::Backend,
};

/// Every backend capability the engines use.
pub trait RadixModule<B: Backend>:
    DeviceAlloc<B>
    + DeviceCopy<B>
    + DeviceFill<B>
    + LweArrayAlloc<B>
    + ContextCreate<B>
    + ContextSynchronize<B>
    + ContextJoin<B>
    + EvaluateLut<B>
    + EvaluateLutTmpWords
    + Keyswitch<B>
    + LweAdd<B>
    + LweAddInplace<B>
    + LweSub<B>
    + LweNegateInplace<B>
    + LweMulScalarInplace<B>
    + LweAddEncodedInplace<B>
    + LwePackBivariate<B>
    + LwePackPairs<B>
    + LweAccumulate<B>
    + Sync
{
}

impl<B: Backend, M> RadixModule<B> for M where
    M: DeviceAlloc<B>
        + DeviceCopy<B>
        + DeviceFill<B>
        + LweArrayAlloc<B>
        + ContextCreate<B>
        + ContextSynchronize<B>
        + ContextJoin<B>
        + EvaluateLut<B>
        + EvaluateLutTmpWords
        + Keyswitch<B>
        + LweAdd<B>
        + LweAddInplace<B>
        + LweSub<B>
        + LweNegateInplace<B>
        + LweMulScalarInplace<B>
        + LweAddEncodedInplace<B>
        + LwePackBivariate<B>
        + LwePackPairs<B>
        + LweAccumulate<B>
        + Sync
{
}

/// Bytes of one device word.
pub(crate) const WORD_BYTES: usize = size_of::<backend::layouts::Torus>();
