/*!
 * Record Pool
 *
 * Preallocated, fixed-capacity array of slots shared by writers and scanners.
 * Slots are never relocated: an index identifies the same slot for the whole
 * lifetime of the pool, only ownership, visibility and payload change.
 */

mod handle;
mod record;
mod slot;
mod stats;

pub use handle::{SlotHandle, SlotWriteGuard};
pub use record::{PreparedStmt, Record};
pub use slot::Slot;
pub use stats::{
    ExecutionSample, StatAggregate, StatementCounter, StatementStat, StatementStatRow, TimerStat,
    TimerStatRow,
};

use crate::core::config::PoolConfig;
use crate::core::errors::{ConfigError, PoolError};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tracing::{debug, info, warn};

/// Pool of prepared statement instances
pub type StmtPool = RecordPool<PreparedStmt>;

/// Point-in-time pool occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    pub capacity: usize,
    pub claimed: usize,
    pub populated: usize,
    /// Claims refused because every slot was taken
    pub lost: u64,
}

/// Fixed-capacity slot pool
pub struct RecordPool<T: Record> {
    slots: Box<[Slot<T>]>,
    claim_hint: AtomicUsize,
    lost: AtomicU64,
}

impl<T: Record> RecordPool<T> {
    /// Allocate every slot up front
    pub fn new(config: PoolConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let slots = (0..config.capacity).map(|_| Slot::new()).collect();
        info!(capacity = config.capacity, "record pool allocated");
        Ok(Self {
            slots,
            claim_hint: AtomicUsize::new(0),
            lost: AtomicU64::new(0),
        })
    }

    /// Fixed capacity
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// Slot at `index`
    ///
    /// # Panics
    /// Panics if `index >= size()`; that is a caller bug, not a runtime condition.
    #[inline]
    pub fn at(&self, index: usize) -> &Slot<T> {
        match self.slots.get(index) {
            Some(slot) => slot,
            None => panic!(
                "slot index {index} out of range for pool of {}",
                self.slots.len()
            ),
        }
    }

    #[inline]
    pub fn is_populated(&self, index: usize) -> bool {
        self.at(index).is_populated()
    }

    /// Claim a free slot, initialise it and make it visible
    pub fn claim_with<F>(&self, init: F) -> Result<SlotHandle<'_, T>, PoolError>
    where
        F: FnOnce(&mut T),
    {
        let capacity = self.size();
        let start = self.claim_hint.load(Ordering::Relaxed) % capacity;

        for offset in 0..capacity {
            let index = (start + offset) % capacity;
            let slot = &self.slots[index];
            if slot.is_claimed() || !slot.try_claim() {
                continue;
            }

            self.claim_hint.store(index + 1, Ordering::Relaxed);
            let mut handle = SlotHandle::new(self, index);
            {
                let mut payload = handle.write();
                init(&mut *payload);
                slot.set_populated(true);
            }
            debug!(index, "slot claimed");
            return Ok(handle);
        }

        self.lost.fetch_add(1, Ordering::Relaxed);
        warn!(capacity, "record pool exhausted, instance not tracked");
        Err(PoolError::Exhausted { capacity })
    }

    /// Hide every slot from scanners
    ///
    /// Ownership is untouched: a writer holding a handle keeps it, and the
    /// slot becomes claimable again only once that handle is released.
    /// Sequences are not touched either, since only owners write them; a
    /// read that overlaps the truncate sees the cleared flag when it
    /// validates.
    pub fn truncate(&self) {
        let mut cleared = 0usize;
        for slot in self.slots.iter() {
            if slot.is_populated() {
                slot.set_populated(false);
                cleared += 1;
            }
        }
        debug!(cleared, "record pool truncated");
    }

    /// Occupancy snapshot; counts are approximate under concurrent claims
    pub fn stats(&self) -> PoolStats {
        let (claimed, populated) = self.slots.iter().fold((0, 0), |(c, p), slot| {
            (
                c + slot.is_claimed() as usize,
                p + slot.is_populated() as usize,
            )
        });
        PoolStats {
            capacity: self.size(),
            claimed,
            populated,
            lost: self.lost.load(Ordering::Relaxed),
        }
    }
}

impl RecordPool<PreparedStmt> {
    /// Track a newly prepared statement
    pub fn claim(&self, sql_text: &[u8]) -> Result<SlotHandle<'_, PreparedStmt>, PoolError> {
        self.claim_with(|stmt| stmt.reset(sql_text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(capacity: usize) -> StmtPool {
        RecordPool::new(PoolConfig::default().with_capacity(capacity)).unwrap()
    }

    #[test]
    fn test_claims_fill_in_index_order() {
        let pool = pool(3);
        let a = pool.claim(b"a").unwrap();
        let b = pool.claim(b"b").unwrap();
        assert_eq!(a.position().get(), 0);
        assert_eq!(b.position().get(), 1);
        assert!(pool.is_populated(0));
        assert!(pool.is_populated(1));
        assert!(!pool.is_populated(2));
    }

    #[test]
    fn test_exhaustion_counts_lost() {
        let pool = pool(1);
        let _held = pool.claim(b"a").unwrap();
        assert_eq!(
            pool.claim(b"b").err(),
            Some(PoolError::Exhausted { capacity: 1 })
        );
        assert_eq!(pool.stats().lost, 1);
    }

    #[test]
    fn test_release_recycles_slot() {
        let pool = pool(1);
        let handle = pool.claim(b"a").unwrap();
        handle.release();
        assert!(!pool.is_populated(0));

        let again = pool.claim(b"b").unwrap();
        assert_eq!(again.position().get(), 0);
        assert_eq!(pool.at(0).snapshot().unwrap().sql_text(), b"b");
    }

    #[test]
    fn test_truncate_hides_but_keeps_ownership() {
        let pool = pool(2);
        let handle = pool.claim(b"a").unwrap();
        pool.truncate();

        assert!(!handle.is_visible());
        let stats = pool.stats();
        assert_eq!(stats.claimed, 1);
        assert_eq!(stats.populated, 0);

        // The truncated slot is still owned, so the next claim goes elsewhere
        let other = pool.claim(b"b").unwrap();
        assert_eq!(other.position().get(), 1);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_at_out_of_range_panics() {
        let pool = pool(2);
        let _ = pool.at(2);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = RecordPool::<PreparedStmt>::new(PoolConfig::default().with_capacity(0));
        assert!(matches!(err, Err(ConfigError::InvalidCapacity(0))));
    }
}
