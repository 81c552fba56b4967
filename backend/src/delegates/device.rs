use crate::{
    api::{DeviceAlloc, DeviceCopy, DeviceFill, LweArrayAlloc},
    layouts::{AllocId, Backend, DeviceBuf, ExecutionContext, LweArray, Module, Torus},
    oep::{DeviceAllocImpl, DeviceCopyImpl, DeviceFillImpl},
};

impl<B> DeviceAlloc<B> for Module<B>
where
    B: Backend + DeviceAllocImpl<B>,
{
    fn device_alloc(&self, words: usize) -> DeviceBuf<B> {
        let id: AllocId = self.register_allocation(words);
        B::device_alloc_impl(self, id, words)
    }

    fn device_release(&self, buf: DeviceBuf<B>) {
        self.unregister_allocation(buf.id());
        B::device_release_impl(self, buf)
    }
}

impl<B> DeviceCopy<B> for Module<B>
where
    B: Backend + DeviceCopyImpl<B>,
{
    fn device_copy(&self, ctx: &ExecutionContext<B>, dst: &mut [Torus], src: &[Torus]) {
        assert_eq!(dst.len(), src.len(), "device copy length mismatch");
        B::device_copy_impl(self, ctx, dst, src)
    }

    fn device_upload(&self, ctx: &ExecutionContext<B>, dst: &mut [Torus], src: &[Torus]) {
        assert_eq!(dst.len(), src.len(), "device upload length mismatch");
        B::device_upload_impl(self, ctx, dst, src)
    }
}

impl<B> DeviceFill<B> for Module<B>
where
    B: Backend + DeviceFillImpl<B>,
{
    fn device_fill(&self, ctx: &ExecutionContext<B>, dst: &mut [Torus], value: Torus) {
        B::device_fill_impl(self, ctx, dst, value)
    }
}

impl<B> LweArrayAlloc<B> for Module<B>
where
    B: Backend + DeviceAllocImpl<B>,
{
    fn lwe_array_alloc(&self, lwe_dimension: usize, count: usize) -> LweArray<DeviceBuf<B>> {
        let buf: DeviceBuf<B> = self.device_alloc(LweArray::<DeviceBuf<B>>::alloc_words(lwe_dimension, count));
        LweArray::from_data(buf, lwe_dimension, count)
    }

    fn lwe_array_release(&self, array: LweArray<DeviceBuf<B>>) {
        self.device_release(array.into_data())
    }
}
