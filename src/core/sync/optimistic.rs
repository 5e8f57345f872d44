/*!
 * Optimistic Sequence Lock
 *
 * Sequence-counter protocol guarding one in-place record.
 *
 * **Write path** (single owner, serialized externally):
 * 1. Increment sequence (odd value signals "writing")
 * 2. Update data
 * 3. Increment sequence again (even value signals "complete"), release store
 *
 * **Read path** (lock-free, single attempt):
 * 1. Read sequence number (acquire)
 * 2. Copy data
 * 3. Re-read sequence number; the copy is valid only if it is unchanged and even
 *
 * Unlike a classic seqlock the read side does not loop. A contested read
 * yields `false` from [`OptimisticLock::end_read`] and the copy is dropped.
 */

use std::sync::atomic::{fence, AtomicU64, Ordering};

/// Sequence value captured at the start of a read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a read token must be passed to end_read to validate the copy"]
pub struct ReadToken(u64);

impl ReadToken {
    /// Raw sequence value observed by `begin_read`
    #[inline]
    pub fn sequence(self) -> u64 {
        self.0
    }

    /// Whether a writer was active when the read began
    #[inline]
    pub fn is_dirty(self) -> bool {
        self.0 & 1 == 1
    }
}

/// Per-record optimistic lock
///
/// # Performance
/// - Cache-line aligned to prevent false sharing between neighbouring slots
/// - Readers issue two loads and one fence, writers two stores
#[repr(C, align(64))]
#[derive(Debug, Default)]
pub struct OptimisticLock {
    sequence: AtomicU64,
}

impl OptimisticLock {
    /// Create a lock in the stable state
    #[inline]
    pub const fn new() -> Self {
        Self {
            sequence: AtomicU64::new(0),
        }
    }

    /// Current sequence value
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::Acquire)
    }

    /// Whether a write is in progress
    #[inline]
    pub fn is_writing(&self) -> bool {
        self.sequence() & 1 == 1
    }

    /// Capture the sequence before copying the record
    #[inline(always)]
    pub fn begin_read(&self) -> ReadToken {
        ReadToken(self.sequence.load(Ordering::Acquire))
    }

    /// Validate a copy taken since `begin_read`
    ///
    /// Returns true iff no write began or completed during the read window.
    #[inline(always)]
    pub fn end_read(&self, token: ReadToken) -> bool {
        // Orders the data loads before the second sequence load
        fence(Ordering::Acquire);
        let current = self.sequence.load(Ordering::Relaxed);
        !token.is_dirty() && current == token.0
    }

    /// Mark the record as being written
    ///
    /// Only one writer per record may be active; callers serialize writers.
    #[inline]
    pub fn begin_write(&self) {
        let seq = self.sequence.load(Ordering::Relaxed);
        debug_assert!(seq & 1 == 0, "nested begin_write on sequence {seq}");
        if seq & 1 == 0 {
            self.sequence.store(seq + 1, Ordering::Relaxed);
        }
        // Orders the odd store before the data stores that follow
        fence(Ordering::Release);
    }

    /// Publish the written record
    #[inline]
    pub fn end_write(&self) {
        let seq = self.sequence.load(Ordering::Relaxed);
        debug_assert!(seq & 1 == 1, "end_write without begin_write on sequence {seq}");
        self.sequence.store((seq | 1) + 1, Ordering::Release);
    }

    /// Scoped write: `end_write` runs when the guard drops
    #[inline]
    pub fn write(&self) -> WriteGuard<'_> {
        self.begin_write();
        WriteGuard { lock: self }
    }
}

/// RAII guard publishing a write on drop
#[must_use = "dropping the guard immediately publishes an empty write"]
pub struct WriteGuard<'a> {
    lock: &'a OptimisticLock,
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        self.lock.end_write();
    }
}
