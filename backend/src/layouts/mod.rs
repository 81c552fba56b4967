mod context;
mod device;
mod keys;
mod lut;
mod lwe;
mod module;
mod parameters;

pub use context::*;
pub use device::*;
pub use keys::*;
pub use lut::*;
pub use lwe::*;
pub use module::*;
pub use parameters::*;

/// Torus word used by every ciphertext and table in this crate.
pub type Torus = u64;

/// Marker for a data container backing a layout.
pub trait Data: Sized {}
impl<T: Sized> Data for T {}

/// Read access to the words of a layout.
pub trait DataRef: Data + AsRef<[Torus]> + Sync {}
impl<T: Data + AsRef<[Torus]> + Sync> DataRef for T {}

/// Write access to the words of a layout.
pub trait DataMut: DataRef + AsMut<[Torus]> + Send {}
impl<T: DataRef + AsMut<[Torus]> + Send> DataMut for T {}

/// A compute backend.
///
/// The associated key types hold whatever the backend needs to run
/// bootstrapping and keyswitching (prepared Fourier-domain keys on an
/// accelerator, plain geometry for [`crate::implementation::cpu_ref::CpuRef`]).
pub trait Backend: Sized + Send + Sync + 'static {
    type BootstrapKey: Send + Sync;
    type KeyswitchKey: Send + Sync;

    /// Human readable backend name, used in trace events.
    fn name() -> &'static str;
}
