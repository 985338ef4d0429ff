use crate::fs::CVFS;

use std::sync::{Arc, Mutex, MutexGuard};

/// A file system that can be handed to several threads. Every call goes
/// through one lock around the whole `CVFS`, so each operation stays a single
/// atomic step for its caller.
#[derive(Clone, Default)]
pub struct SharedCVFS {
    inner: Arc<Mutex<CVFS>>,
}

impl From<CVFS> for SharedCVFS {
    fn from(fs: CVFS) -> Self {
        Self {
            inner: Arc::new(Mutex::new(fs)),
        }
    }
}

impl SharedCVFS {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` with exclusive access to the file system.
    pub fn with<R>(&self, f: impl FnOnce(&mut CVFS) -> R) -> R {
        f(&mut self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, CVFS> {
        // Operations never leave the file system half updated, so a panic in
        // another holder leaves nothing to repair.
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("Recovering file system lock poisoned by a panicked thread.");
            poisoned.into_inner()
        })
    }
}
