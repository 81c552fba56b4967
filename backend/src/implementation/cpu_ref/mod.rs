//! Portable CPU backend.
//!
//! Device memory is host memory, every [ExecutionContext] completes its work
//! before returning, and [crate::api::ContextJoin] runs both branches on the
//! `rayon` pool. Bootstrapping is evaluated on trivial ciphertexts (see
//! [crate::reference::pbs]), which makes this backend the correctness oracle
//! for circuits built on top of the HAL.

mod context;
mod device;
mod lwe;
mod pbs;

pub use pbs::{TrivialBootstrapKey, TrivialKeyswitchKey};

use crate::{
    layouts::{Backend, ExecutionContext, Module, SchemeParameters, ServerKeys},
    oep::ModuleNewImpl,
};

pub struct CpuRef;

impl Backend for CpuRef {
    type BootstrapKey = TrivialBootstrapKey;
    type KeyswitchKey = TrivialKeyswitchKey;

    fn name() -> &'static str {
        "cpu-ref"
    }
}

unsafe impl ModuleNewImpl<Self> for CpuRef {
    fn new_impl(device_id: u32) -> Module<Self> {
        tracing::debug!(device_id, backend = Self::name(), "module created");
        Module::from_device_id(device_id)
    }
}

impl CpuRef {
    /// Geometry-only evaluation keys for `params`.
    pub fn trivial_keys(params: &SchemeParameters) -> ServerKeys<CpuRef> {
        params.assert_valid();
        ServerKeys::new(TrivialBootstrapKey::new(params), TrivialKeyswitchKey::new(params))
    }
}

pub(crate) fn assert_same_device(module: &Module<CpuRef>, ctx: &ExecutionContext<CpuRef>) {
    debug_assert_eq!(module.device_id(), ctx.device_id(), "context used on another device");
}
