//! # backend
//!
//! Hardware abstraction layer for radix-integer arithmetic over
//! programmable bootstrapping.
//!
//! The crate follows a four-layer stack:
//!
//! 1. **[`api`]** -- safe traits implemented by [`layouts::Module`]: device
//!    arena, execution contexts, batched bootstrapping/keyswitching and the
//!    linear LWE kernels. Engines are written against these.
//! 2. **[`oep`]** -- unsafe extension points mirroring the API, implemented
//!    by backends.
//! 3. **[`delegates`]** -- blanket glue from [`api`] to [`oep`]; it also keeps
//!    the module ledger of live allocations and contexts.
//! 4. **[`reference`]** -- pure-Rust kernels defining the expected semantics.
//!
//! [`implementation::cpu_ref::CpuRef`] is the portable backend built on the
//! reference kernels.
//!
//! All layouts are generic over a word container (`Vec<u64>`, `&[u64]`,
//! `&mut [u64]` or a device allocation [`layouts::DeviceBuf`]).

pub mod api;
pub mod delegates;
pub mod implementation;
pub mod layouts;
pub mod oep;
pub mod reference;
