//! Open extension points.
//!
//! Backends implement these `unsafe` traits; [crate::delegates] wires them to
//! the safe [crate::api] traits on [crate::layouts::Module]. Implementations
//! must honour the contract documented on the matching api trait: kernels run
//! in submission order on the given context, write exactly the requested
//! blocks, and never retain references past the call.

mod context;
mod device;
mod lwe;
mod module;
mod pbs;

pub use context::*;
pub use device::*;
pub use lwe::*;
pub use module::*;
pub use pbs::*;
