use std::marker::PhantomData;

use crate::layouts::{Backend, Torus};

/// Identifier of a live device allocation, unique per [`crate::layouts::Module`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AllocId(pub u64);

/// An allocation in the device arena of backend `B`.
///
/// Obtained from [`crate::api::DeviceAlloc::device_alloc`] and returned with
/// [`crate::api::DeviceAlloc::device_release`], which consumes it. The words
/// are addressable by the backend's kernels through the [`AsRef`]/[`AsMut`]
/// views, so layouts such as [`crate::layouts::LweArray`] can be built over it.
pub struct DeviceBuf<B: Backend> {
    data: Vec<Torus>,
    id: AllocId,
    _phantom: PhantomData<B>,
}

impl<B: Backend> DeviceBuf<B> {
    /// Wraps backend storage. Only backend implementations should call this.
    pub fn from_parts(data: Vec<Torus>, id: AllocId) -> Self {
        Self {
            data,
            id,
            _phantom: PhantomData,
        }
    }

    pub fn into_parts(self) -> (Vec<Torus>, AllocId) {
        (self.data, self.id)
    }

    pub fn id(&self) -> AllocId {
        self.id
    }

    pub fn words(&self) -> usize {
        self.data.len()
    }

    pub fn bytes(&self) -> usize {
        self.data.len() * size_of::<Torus>()
    }
}

impl<B: Backend> AsRef<[Torus]> for DeviceBuf<B> {
    fn as_ref(&self) -> &[Torus] {
        &self.data
    }
}

impl<B: Backend> AsMut<[Torus]> for DeviceBuf<B> {
    fn as_mut(&mut self) -> &mut [Torus] {
        &mut self.data
    }
}
