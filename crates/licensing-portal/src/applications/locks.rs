use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::domain::ApplicationId;

/// Per-application mutual exclusion for read-modify-write sequences against the store.
///
/// Slots are created on demand and dropped again once no caller holds them, so the map
/// only tracks applications with work in flight.
#[derive(Debug, Default)]
pub struct ApplicationLocks {
    slots: Mutex<HashMap<ApplicationId, Arc<Mutex<()>>>>,
}

impl ApplicationLocks {
    pub fn with_lock<T>(&self, id: &ApplicationId, work: impl FnOnce() -> T) -> T {
        let slot = self.slot(id);
        let outcome = {
            let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
            work()
        };
        self.release(id, slot);
        outcome
    }

    fn slot(&self, id: &ApplicationId) -> Arc<Mutex<()>> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.entry(id.clone()).or_default().clone()
    }

    fn release(&self, id: &ApplicationId, slot: Arc<Mutex<()>>) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference in the map plus ours means nobody else is waiting.
        if Arc::strong_count(&slot) == 2 {
            slots.remove(id);
        }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
