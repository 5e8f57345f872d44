/*!
 * Slot Handles
 * Exclusive writer capability for one claimed slot
 */

use super::record::{PreparedStmt, Record};
use super::stats::ExecutionSample;
use super::RecordPool;
use crate::core::sync::WriteGuard;
use crate::scan::Position;
use std::ops::{Deref, DerefMut};
use tracing::debug;

/// Owner of a claimed slot
///
/// Exactly one handle exists per claimed slot, which is what serializes
/// writers. Dropping the handle releases the slot for recycling.
pub struct SlotHandle<'a, T: Record> {
    pool: &'a RecordPool<T>,
    index: usize,
}

impl<'a, T: Record> SlotHandle<'a, T> {
    pub(crate) fn new(pool: &'a RecordPool<T>, index: usize) -> Self {
        Self { pool, index }
    }

    /// Position of the owned slot, as seen by scanners
    #[inline]
    pub fn position(&self) -> Position {
        Position::from_index(self.index)
    }

    /// Whether scanners can currently see the slot
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.pool.at(self.index).is_populated()
    }

    /// Mutate the payload inside a write window
    pub fn update<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut guard = self.write();
        f(&mut *guard)
    }

    /// Open a write window; readers see the slot as dirty until the guard drops
    pub fn write(&mut self) -> SlotWriteGuard<'_, T> {
        let slot = self.pool.at(self.index);
        let lock = slot.lock().write();
        // SAFETY: this handle is the unique owner and the write window is open.
        let payload = unsafe { slot.payload_mut() };
        SlotWriteGuard {
            payload,
            _lock: lock,
        }
    }

    /// Release the slot explicitly
    pub fn release(self) {
        // Drop does the work
    }
}

impl SlotHandle<'_, PreparedStmt> {
    pub fn record_prepare(&mut self, timer_wait: u64) {
        self.update(|stmt| stmt.record_prepare(timer_wait));
    }

    pub fn record_execute(&mut self, sample: &ExecutionSample) {
        self.update(|stmt| stmt.record_execute(sample));
    }
}

impl<T: Record> Drop for SlotHandle<'_, T> {
    fn drop(&mut self) {
        let slot = self.pool.at(self.index);
        {
            let _window = slot.lock().write();
            slot.set_populated(false);
        }
        slot.disown();
        debug!(index = self.index, "slot released");
    }
}

/// Mutable payload view; publishes the write when dropped
pub struct SlotWriteGuard<'h, T: Record> {
    payload: &'h mut T,
    _lock: WriteGuard<'h>,
}

impl<T: Record> Deref for SlotWriteGuard<'_, T> {
    type Target = T;

    #[inline(always)]
    fn deref(&self) -> &T {
        self.payload
    }
}

impl<T: Record> DerefMut for SlotWriteGuard<'_, T> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut T {
        self.payload
    }
}
