/*!
 * Row Materializer
 * Point-in-time copies of statement slots
 */

use crate::core::limits::SQL_TEXT_MAX;
use crate::pool::{PreparedStmt, Slot, StatAggregate, StatementStatRow, TimerStatRow};
use std::fmt;
use tracing::trace;

/// Materialized statement row
///
/// `valid == false` means the data must be treated as absent: the slot was
/// caught mid-write, or was free or hidden when the copy was validated. The
/// other fields are then unspecified.
#[derive(Clone, Copy, PartialEq)]
pub struct Row {
    valid: bool,
    sql_text_length: usize,
    sql_text: [u8; SQL_TEXT_MAX],
    pub prepare: TimerStatRow,
    pub execute: StatementStatRow,
}

impl Default for Row {
    fn default() -> Self {
        Self {
            valid: false,
            sql_text_length: 0,
            sql_text: [0; SQL_TEXT_MAX],
            prepare: TimerStatRow::default(),
            execute: StatementStatRow::default(),
        }
    }
}

impl Row {
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    #[inline]
    pub fn sql_text(&self) -> &[u8] {
        &self.sql_text[..self.sql_text_length]
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row")
            .field("valid", &self.valid)
            .field("sql_text", &String::from_utf8_lossy(self.sql_text()))
            .field("prepare", &self.prepare)
            .field("execute", &self.execute)
            .finish()
    }
}

/// Copy a slot under its optimistic lock
///
/// Single attempt: a concurrent write, release or truncate yields an invalid
/// row, never a retry.
pub fn materialize(slot: &Slot<PreparedStmt>) -> Row {
    let mut row = Row::default();

    let token = slot.lock().begin_read();
    let stmt = slot.copy_payload();

    let text = stmt.sql_text();
    row.sql_text_length = text.len();
    row.sql_text[..text.len()].copy_from_slice(text);

    stmt.prepare.copy_into(&mut row.prepare);
    stmt.execute.copy_into(&mut row.execute);

    // Loaded inside the read window: a truncate never moves the sequence
    let populated = slot.is_populated();

    if !slot.lock().end_read(token) {
        trace!(sequence = token.sequence(), "snapshot invalidated by concurrent write");
        return row;
    }

    if !populated {
        trace!(sequence = token.sequence(), "slot hidden during snapshot");
        return row;
    }

    row.valid = true;
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PoolConfig;
    use crate::pool::{ExecutionSample, StatementCounter, StmtPool};
    use pretty_assertions::assert_eq;

    fn pool() -> StmtPool {
        StmtPool::new(PoolConfig::small()).unwrap()
    }

    #[test]
    fn test_uncontended_copy_is_exact() {
        let pool = pool();
        let mut handle = pool.claim(b"SELECT * FROM t WHERE id = ?").unwrap();
        handle.record_prepare(500);
        handle.record_execute(&ExecutionSample::new(1_000).with(StatementCounter::RowsSent, 1));

        let row = materialize(pool.at(0));
        assert!(row.is_valid());
        assert_eq!(row.sql_text(), b"SELECT * FROM t WHERE id = ?");
        assert_eq!(row.prepare.count, 1);
        assert_eq!(row.prepare.sum, 500);
        assert_eq!(row.execute.timer.max, 1_000);
        assert_eq!(row.execute.counter(StatementCounter::RowsSent), 1);
    }

    #[test]
    fn test_write_in_progress_invalidates() {
        let pool = pool();
        let mut handle = pool.claim(b"SELECT 1").unwrap();

        let guard = handle.write();
        let row = materialize(pool.at(0));
        assert!(!row.is_valid());
        drop(guard);

        assert!(materialize(pool.at(0)).is_valid());
    }

    #[test]
    fn test_oversized_declared_length_is_truncated() {
        let pool = pool();
        let mut handle = pool.claim(b"SELECT 1").unwrap();
        handle.update(|stmt| stmt.sql_text_length = (SQL_TEXT_MAX * 4) as u32);

        let row = materialize(pool.at(0));
        assert!(row.is_valid());
        assert_eq!(row.sql_text().len(), SQL_TEXT_MAX);
        assert_eq!(&row.sql_text()[..8], b"SELECT 1");
    }

    #[test]
    fn test_free_slot_is_not_a_row() {
        let pool = pool();
        let row = materialize(pool.at(3));
        assert!(!row.is_valid());
        assert!(row.sql_text().is_empty());
        assert_eq!(row.execute, StatementStatRow::default());
    }

    #[test]
    fn test_release_inside_read_window_invalidates() {
        let pool = pool();
        let handle = pool.claim(b"SELECT 1").unwrap();
        let slot = pool.at(0);

        let token = slot.lock().begin_read();
        drop(handle);
        assert!(!slot.lock().end_read(token));
        assert!(!slot.is_populated());
        assert!(!slot.is_claimed());
    }

    #[test]
    fn test_claim_inside_read_window_invalidates() {
        let pool = pool();
        let slot = pool.at(0);

        let token = slot.lock().begin_read();
        let _handle = pool.claim(b"SELECT 1").unwrap();
        assert!(!slot.lock().end_read(token));
        assert!(materialize(slot).is_valid());
    }

    #[test]
    fn test_truncate_during_copy_invalidates() {
        let pool = pool();
        let _handle = pool.claim(b"SELECT 1").unwrap();
        let slot = pool.at(0);

        let sequence = slot.lock().sequence();
        let token = slot.lock().begin_read();
        pool.truncate();
        // Truncate leaves the sequence alone, so the lock alone still validates
        assert_eq!(slot.lock().sequence(), sequence);
        assert!(slot.lock().end_read(token));

        let row = materialize(slot);
        assert!(!row.is_valid());
    }
}
