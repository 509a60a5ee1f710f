use std::collections::HashMap;
use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::lifecycle::handle::{AuditRecordHandle, HandleOptions};
use crate::lifecycle::types::{CloseReport, LifecycleError, StreamKey};

pub type SharedHandle = Arc<Mutex<AuditRecordHandle>>;

// Per-key placeholder; empty until the container has been created.
type Slot = Arc<Mutex<Option<SharedHandle>>>;

/// Keyed table of open containers.
///
/// The table lock only covers slot lookup. Creating a container (directory,
/// file, header) happens under that key's slot lock, so first sight of one
/// key never stalls appends or lookups for the others.
pub struct HandleRegistry {
    opts: HandleOptions,
    slots: Mutex<HashMap<StreamKey, Slot>>,
    closed: AtomicBool,
}

// A panic while holding a lock leaves a writer that can still be closed.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl HandleRegistry {
    pub fn new(opts: HandleOptions) -> Self {
        Self { opts, slots: Mutex::new(HashMap::new()), closed: AtomicBool::new(false) }
    }

    /// Cached handle for `key`, creating the container on first sight.
    /// The flag is `true` when this call created it.
    pub fn get_or_create(&self, key: &StreamKey, contains_payloads: bool) -> Result<(SharedHandle, bool), LifecycleError> {
        let slot = {
            let mut slots = lock(&self.slots);
            if self.closed.load(Ordering::Acquire) {
                return Err(LifecycleError::RegistryClosed);
            }
            Arc::clone(slots.entry(key.clone()).or_default())
        };

        let mut entry = lock(&slot);
        if let Some(handle) = entry.as_ref() {
            return Ok((Arc::clone(handle), false));
        }
        // close_all may have drained this slot while we waited on it.
        if self.closed.load(Ordering::Acquire) {
            return Err(LifecycleError::RegistryClosed);
        }

        let handle = AuditRecordHandle::create(key.clone(), &self.opts, contains_payloads)?;
        log::info!(
            "[REGISTRY] opened {} -> {}",
            key,
            handle.path().map(|p| p.display().to_string()).unwrap_or_default()
        );
        let shared = Arc::new(Mutex::new(handle));
        *entry = Some(Arc::clone(&shared));
        Ok((shared, true))
    }

    fn open_handles(&self) -> Vec<(StreamKey, SharedHandle)> {
        let slots: Vec<_> = lock(&self.slots).iter().map(|(k, s)| (k.clone(), Arc::clone(s))).collect();
        slots
            .into_iter()
            .filter_map(|(key, slot)| {
                let handle = lock(&slot).clone();
                handle.map(|h| (key, h))
            })
            .collect()
    }

    /// Serialized append to one handle.
    pub fn append(&self, handle: &Mutex<AuditRecordHandle>, data: &[u8], frames: u64) -> Result<(), LifecycleError> {
        lock(handle).append(data, frames)
    }

    pub fn len(&self) -> usize {
        self.open_handles().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> Vec<StreamKey> {
        let mut keys: Vec<_> = self.open_handles().into_iter().map(|(k, _)| k).collect();
        keys.sort();
        keys
    }

    /// Flush every handle so its container is readable as-is.
    pub fn flush_all(&self) -> Vec<(StreamKey, LifecycleError)> {
        self.open_handles()
            .into_iter()
            .filter_map(|(key, h)| {
                let flushed = lock(&h).flush();
                flushed.err().map(|e| (key, e))
            })
            .collect()
    }

    /// Close every handle: gzip finish, buffer drain, file sync.
    ///
    /// Never stops at the first failure. Later `get_or_create` calls fail with
    /// `RegistryClosed`.
    pub fn close_all(&self) -> CloseReport {
        let slots = {
            let mut slots = lock(&self.slots);
            self.closed.store(true, Ordering::Release);
            mem::take(&mut *slots)
        };

        // Waits for a creation in progress on each slot.
        let mut ordered: Vec<_> = slots
            .into_iter()
            .filter_map(|(key, slot)| {
                let handle = lock(&slot).take();
                handle.map(|h| (key, h))
            })
            .collect();
        ordered.sort_by(|a, b| a.0.cmp(&b.0));

        let mut report = CloseReport::default();
        for (key, handle) in ordered {
            // Waits for an in-flight append on this handle to finish.
            match lock(&handle).close() {
                Ok(summary) => {
                    log::debug!("[REGISTRY] closed {} ({} records)", key, summary.records);
                    report.closed.push((key, summary));
                }
                Err(e) => {
                    log::error!("[REGISTRY] close {} failed: {}", key, e);
                    report.failed.push((key, e));
                }
            }
        }
        report
    }
}

impl Drop for HandleRegistry {
    fn drop(&mut self) {
        let open = self.len();
        if open > 0 {
            let report = self.close_all();
            log::warn!("[REGISTRY] dropped with {} open handles: {}", open, report);
        }
    }
}
