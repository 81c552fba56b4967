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
