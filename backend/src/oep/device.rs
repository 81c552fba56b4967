use crate::layouts::{AllocId, Backend, DeviceBuf, ExecutionContext, Module, Torus};

/// # THIS TRAIT IS AN OPEN EXTENSION POINT (unsafe)
/// * See [crate::api::DeviceAlloc] for corresponding public API.
/// * `id` has already been recorded in the module ledger and must be carried
///   by the returned buffer.
pub unsafe trait DeviceAllocImpl<B: Backend> {
    fn device_alloc_impl(module: &Module<B>, id: AllocId, words: usize) -> DeviceBuf<B>;
    fn device_release_impl(module: &Module<B>, buf: DeviceBuf<B>);
}

/// # THIS TRAIT IS AN OPEN EXTENSION POINT (unsafe)
/// * See [crate::api::DeviceCopy] for corresponding public API.
pub unsafe trait DeviceCopyImpl<B: Backend> {
    fn device_copy_impl(module: &Module<B>, ctx: &ExecutionContext<B>, dst: &mut [Torus], src: &[Torus]);
    fn device_upload_impl(module: &Module<B>, ctx: &ExecutionContext<B>, dst: &mut [Torus], src: &[Torus]);
}

/// # THIS TRAIT IS AN OPEN EXTENSION POINT (unsafe)
/// * See [crate::api::DeviceFill] for corresponding public API.
pub unsafe trait DeviceFillImpl<B: Backend> {
    fn device_fill_impl(module: &Module<B>, ctx: &ExecutionContext<B>, dst: &mut [Torus], value: Torus);
}
