/*!
 * Pool Slot
 * One fixed-position record: optimistic lock, ownership and visibility flags, payload
 */

use super::record::Record;
use crate::core::sync::OptimisticLock;
use std::cell::UnsafeCell;
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};

/// A single record slot
///
/// `claimed` tracks writer ownership, `populated` tracks scan visibility.
/// The owner flips `populated` only inside a write window, so a reader that
/// overlaps a claim or release fails its sequence check. Truncate clears
/// `populated` without owning the slot; readers re-check the flag before
/// validating instead.
pub struct Slot<T: Record> {
    lock: OptimisticLock,
    claimed: AtomicBool,
    populated: AtomicBool,
    payload: UnsafeCell<T>,
}

// SAFETY: the payload is only mutated through the single owning SlotHandle,
// inside a begin_write/end_write window. Concurrent readers take volatile
// copies and validate them against the sequence counter; `Record` guarantees
// a torn copy is still a valid value of T.
unsafe impl<T: Record> Sync for Slot<T> {}

impl<T: Record> Slot<T> {
    pub(crate) fn new() -> Self {
        Self {
            lock: OptimisticLock::new(),
            claimed: AtomicBool::new(false),
            populated: AtomicBool::new(false),
            payload: UnsafeCell::new(T::default()),
        }
    }

    #[inline]
    pub fn lock(&self) -> &OptimisticLock {
        &self.lock
    }

    /// Whether the slot currently represents a live, visible record
    #[inline]
    pub fn is_populated(&self) -> bool {
        self.populated.load(Ordering::Acquire)
    }

    /// Whether a writer owns the slot
    #[inline]
    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::Acquire)
    }

    /// Take ownership if the slot is free
    #[inline]
    pub(crate) fn try_claim(&self) -> bool {
        self.claimed
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    /// Must run inside a write window unless clearing the flag for truncate
    #[inline]
    pub(crate) fn set_populated(&self, populated: bool) {
        self.populated.store(populated, Ordering::Release);
    }

    /// Give up ownership; the slot must already be hidden
    #[inline]
    pub(crate) fn disown(&self) {
        self.claimed.store(false, Ordering::Release);
    }

    /// Unvalidated copy of the payload
    ///
    /// Must be bracketed by `begin_read`/`end_read` on [`Slot::lock`]; the
    /// result is meaningless unless `end_read` returns true.
    #[inline]
    pub(crate) fn copy_payload(&self) -> T {
        // SAFETY: the cell is always initialised and T is valid for any bits.
        unsafe { ptr::read_volatile(self.payload.get()) }
    }

    /// Mutable payload access for the owning writer
    ///
    /// # Safety
    ///
    /// Caller must own the slot (hold its `SlotHandle`) and be inside a write
    /// window on [`Slot::lock`], with no other live reference from this call.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    pub(crate) unsafe fn payload_mut(&self) -> &mut T {
        &mut *self.payload.get()
    }

    /// Consistent copy of the payload, or `None` if a write raced the read
    pub fn snapshot(&self) -> Option<T> {
        let token = self.lock.begin_read();
        let copy = self.copy_payload();
        self.lock.end_read(token).then_some(copy)
    }
}
