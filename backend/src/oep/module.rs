use crate::layouts::{Backend, Module};

/// # THIS TRAIT IS AN OPEN EXTENSION POINT (unsafe)
/// * See [crate::api::ModuleNew] for corresponding public API.
pub unsafe trait ModuleNewImpl<B: Backend> {
    fn new_impl(device_id: u32) -> Module<B>;
}
