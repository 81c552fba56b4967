use crate::layouts::Backend;

/// Instantiate a new [crate::layouts::Module] bound to one device.
pub trait ModuleNew<B: Backend> {
    fn new(device_id: u32) -> Self;
}
