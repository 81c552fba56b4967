use std::marker::PhantomData;

use crate::layouts::Backend;

/// An ordered command queue on one device.
///
/// Work submitted on the same context executes in submission order. Work on
/// distinct contexts may overlap until it is synchronized or joined.
#[derive(Debug)]
pub struct ExecutionContext<B: Backend> {
    id: u64,
    device_id: u32,
    _phantom: PhantomData<B>,
}

impl<B: Backend> ExecutionContext<B> {
    /// Only backend implementations should call this.
    pub fn from_parts(id: u64, device_id: u32) -> Self {
        Self {
            id,
            device_id,
            _phantom: PhantomData,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn device_id(&self) -> u32 {
        self.device_id
    }
}
