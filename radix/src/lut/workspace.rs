use backend::{
    api::{DeviceAlloc, EvaluateLutTmpWords, LweArrayAlloc},
    layouts::{Backend, DeviceBuf, LweArray, Module, SchemeParameters, Torus},
};

use crate::{RadixModule, WORD_BYTES};

/// Device scratch of one batched bootstrap of up to `capacity` blocks.
///
/// `before_ks` holds packed big-LWE inputs, `after_ks` their keyswitched
/// small-LWE images, `pbs` the scratch of the bootstrap itself.
pub struct PbsWorkspace<B: Backend> {
    capacity: usize,
    pub(crate) pbs: DeviceBuf<B>,
    pub(crate) before_ks: LweArray<DeviceBuf<B>>,
    pub(crate) after_ks: LweArray<DeviceBuf<B>>,
}

impl<B: Backend> PbsWorkspace<B> {
    pub fn alloc(module: &Module<B>, params: &SchemeParameters, capacity: usize) -> Self
    where
        Module<B>: RadixModule<B>,
    {
        assert!(capacity > 0, "bootstrap workspace of zero blocks");
        Self {
            capacity,
            pbs: module.device_alloc(module.evaluate_lut_tmp_words(params, capacity)),
            before_ks: module.lwe_array_alloc(params.big_lwe_dimension(), capacity),
            after_ks: module.lwe_array_alloc(params.small_lwe_dimension.0, capacity),
        }
    }

    pub fn alloc_bytes(module: &Module<B>, params: &SchemeParameters, capacity: usize) -> usize
    where
        Module<B>: RadixModule<B>,
    {
        let words: usize = module.evaluate_lut_tmp_words(params, capacity)
            + LweArray::<Vec<Torus>>::alloc_words(params.big_lwe_dimension(), capacity)
            + LweArray::<Vec<Torus>>::alloc_words(params.small_lwe_dimension.0, capacity);
        words * WORD_BYTES
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn release(self, module: &Module<B>)
    where
        Module<B>: RadixModule<B>,
    {
        module.device_release(self.pbs);
        module.lwe_array_release(self.before_ks);
        module.lwe_array_release(self.after_ks);
    }
}
