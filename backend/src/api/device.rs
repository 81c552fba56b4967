use crate::layouts::{Backend, DeviceBuf, ExecutionContext, LweArray, Torus};

/// Device arena allocation.
pub trait DeviceAlloc<B: Backend> {
    /// Allocates `words` zeroed words. Allocation failure is fatal.
    fn device_alloc(&self, words: usize) -> DeviceBuf<B>;

    /// Returns an allocation to the arena.
    fn device_release(&self, buf: DeviceBuf<B>);
}

/// Copies between device buffers, or from the host into a device buffer.
pub trait DeviceCopy<B: Backend> {
    fn device_copy(&self, ctx: &ExecutionContext<B>, dst: &mut [Torus], src: &[Torus]);

    fn device_upload(&self, ctx: &ExecutionContext<B>, dst: &mut [Torus], src: &[Torus]);
}

/// Fills a device buffer with one word.
pub trait DeviceFill<B: Backend> {
    fn device_fill(&self, ctx: &ExecutionContext<B>, dst: &mut [Torus], value: Torus);
}

/// Allocation of [LweArray] layouts in the device arena.
pub trait LweArrayAlloc<B: Backend> {
    fn lwe_array_alloc(&self, lwe_dimension: usize, count: usize) -> LweArray<DeviceBuf<B>>;

    fn lwe_array_release(&self, array: LweArray<DeviceBuf<B>>);
}
