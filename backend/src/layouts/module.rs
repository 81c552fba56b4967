use std::{
    marker::PhantomData,
    sync::{Mutex, MutexGuard, PoisonError},
};

use utils::Map;

use crate::layouts::{AllocId, Backend};

/// Bookkeeping of what is live on a device.
#[derive(Debug, Default)]
struct DeviceLedger {
    next_id: u64,
    allocations: Map<AllocId, usize>,
    contexts: usize,
}

/// Handle on one device of backend `B`.
///
/// Every device-side resource (allocation, execution context) is created and
/// returned through the module, which keeps a ledger of what is live. The
/// ledger lets callers check that a setup/cleanup pair leaves the device as
/// it found it.
pub struct Module<B: Backend> {
    device_id: u32,
    ledger: Mutex<DeviceLedger>,
    _phantom: PhantomData<B>,
}

impl<B: Backend> Module<B> {
    /// Only backend implementations should call this; use
    /// [`crate::api::ModuleNew::new`] instead.
    pub fn from_device_id(device_id: u32) -> Self {
        Self {
            device_id,
            ledger: Mutex::new(DeviceLedger::default()),
            _phantom: PhantomData,
        }
    }

    pub fn device_id(&self) -> u32 {
        self.device_id
    }

    fn ledger(&self) -> MutexGuard<'_, DeviceLedger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a new allocation of `words` words and returns its id.
    pub fn register_allocation(&self, words: usize) -> AllocId {
        let mut ledger: MutexGuard<'_, DeviceLedger> = self.ledger();
        let id: AllocId = AllocId(ledger.next_id);
        ledger.next_id += 1;
        ledger.allocations.insert(id, words);
        id
    }

    /// Forgets a live allocation. Panics if `id` is not live on this device.
    pub fn unregister_allocation(&self, id: AllocId) -> usize {
        match self.ledger().allocations.remove(&id) {
            Some(words) => words,
            None => panic!("release of {id:?} which is not live on device {}", self.device_id),
        }
    }

    /// Records a new execution context and returns its id.
    pub fn register_context(&self) -> u64 {
        let mut ledger: MutexGuard<'_, DeviceLedger> = self.ledger();
        let id: u64 = ledger.next_id;
        ledger.next_id += 1;
        ledger.contexts += 1;
        id
    }

    pub fn unregister_context(&self) {
        let mut ledger: MutexGuard<'_, DeviceLedger> = self.ledger();
        assert!(ledger.contexts > 0, "context destroyed twice on device {}", self.device_id);
        ledger.contexts -= 1;
    }

    pub fn live_allocations(&self) -> usize {
        self.ledger().allocations.len()
    }

    pub fn live_words(&self) -> usize {
        self.ledger().allocations.values().sum()
    }

    pub fn live_contexts(&self) -> usize {
        self.ledger().contexts
    }
}
