use crate::{
    implementation::cpu_ref::{CpuRef, assert_same_device},
    layouts::{AllocId, DeviceBuf, ExecutionContext, Module, Torus},
    oep::{DeviceAllocImpl, DeviceCopyImpl, DeviceFillImpl},
};

unsafe impl DeviceAllocImpl<Self> for CpuRef {
    fn device_alloc_impl(_module: &Module<Self>, id: AllocId, words: usize) -> DeviceBuf<Self> {
        DeviceBuf::from_parts(vec![0; words], id)
    }

    fn device_release_impl(_module: &Module<Self>, buf: DeviceBuf<Self>) {
        drop(buf.into_parts());
    }
}

unsafe impl DeviceCopyImpl<Self> for CpuRef {
    fn device_copy_impl(module: &Module<Self>, ctx: &ExecutionContext<Self>, dst: &mut [Torus], src: &[Torus]) {
        assert_same_device(module, ctx);
        dst.copy_from_slice(src);
    }

    fn device_upload_impl(module: &Module<Self>, ctx: &ExecutionContext<Self>, dst: &mut [Torus], src: &[Torus]) {
        assert_same_device(module, ctx);
        dst.copy_from_slice(src);
    }
}

unsafe impl DeviceFillImpl<Self> for CpuRef {
    fn device_fill_impl(module: &Module<Self>, ctx: &ExecutionContext<Self>, dst: &mut [Torus], value: Torus) {
        assert_same_device(module, ctx);
        dst.fill(value);
    }
}
