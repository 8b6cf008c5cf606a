use parking_lot::Mutex;
use std::{collections::HashSet, sync::Arc};
use uuid::Uuid;

/// Strategy ids with a submission attempt in progress.
#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    ids: Arc<Mutex<HashSet<Uuid>>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` if an attempt for `id` is already running.
    pub fn try_acquire(&self, id: Uuid) -> Option<InFlightGuard> {
        if !self.ids.lock().insert(id) {
            return None;
        }

        Some(InFlightGuard {
            id,
            ids: self.ids.clone(),
        })
    }

    pub fn is_running(&self, id: Uuid) -> bool {
        self.ids.lock().contains(&id)
    }
}

/// Releases the id when dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    id: Uuid,
    ids: Arc<Mutex<HashSet<Uuid>>>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.ids.lock().remove(&self.id);
    }
}
