/*!
 * Synchronization Primitives
 *
 * Per-slot optimistic locking for records that are mutated in place by one
 * owner and copied concurrently by any number of readers.
 *
 * Readers never block and never retry: a read that overlapped a write is
 * reported as invalid and the caller decides what to do with it.
 */

mod optimistic;

pub use optimistic::{OptimisticLock, ReadToken, WriteGuard};
