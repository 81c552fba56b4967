//! Pure-Rust reference kernels.
//!
//! They define the semantics of the extension points in [crate::oep] and are
//! what [crate::implementation::cpu_ref::CpuRef] runs.

pub mod lwe;
pub mod pbs;
