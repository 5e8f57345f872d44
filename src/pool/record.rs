/*!
 * Slot Payloads
 * Fixed-size records stored in place inside pool slots
 */

use super::stats::{ExecutionSample, StatementStat, TimerStat};
use crate::core::limits::SQL_TEXT_MAX;
use std::fmt;

/// Plain-old-data payload that can live in a pool slot
///
/// # Safety
///
/// Readers copy the payload while a writer may be mutating it and discard the
/// copy afterwards if the sequence check fails. Implementors must therefore be
/// valid for every bit pattern: integers and arrays of integers only, no
/// references, `bool`, enums or pointers.
pub unsafe trait Record: Copy + Default + Send + 'static {}

/// One prepared statement instance
#[repr(C)]
#[derive(Clone, Copy)]
pub struct PreparedStmt {
    /// Declared length; readers clamp it to `SQL_TEXT_MAX`
    pub(crate) sql_text_length: u32,
    pub(crate) sql_text: [u8; SQL_TEXT_MAX],
    pub(crate) prepare: TimerStat,
    pub(crate) execute: StatementStat,
}

// SAFETY: only integers, integer arrays and aggregates built from them.
unsafe impl Record for PreparedStmt {}

impl Default for PreparedStmt {
    fn default() -> Self {
        Self {
            sql_text_length: 0,
            sql_text: [0; SQL_TEXT_MAX],
            prepare: TimerStat::default(),
            execute: StatementStat::default(),
        }
    }
}

impl PreparedStmt {
    /// Fresh record for a newly prepared statement
    pub fn new(sql_text: &[u8]) -> Self {
        let mut stmt = Self::default();
        stmt.set_sql_text(sql_text);
        stmt
    }

    /// Replace the text, truncating to `SQL_TEXT_MAX`
    pub fn set_sql_text(&mut self, sql_text: &[u8]) {
        let len = sql_text.len().min(SQL_TEXT_MAX);
        self.sql_text[..len].copy_from_slice(&sql_text[..len]);
        self.sql_text_length = len as u32;
    }

    /// Captured text, never longer than `SQL_TEXT_MAX`
    pub fn sql_text(&self) -> &[u8] {
        let len = (self.sql_text_length as usize).min(SQL_TEXT_MAX);
        &self.sql_text[..len]
    }

    /// Reset to the state of a freshly prepared statement
    pub fn reset(&mut self, sql_text: &[u8]) {
        *self = Self::new(sql_text);
    }

    pub fn record_prepare(&mut self, timer_wait: u64) {
        self.prepare.record(timer_wait);
    }

    pub fn record_execute(&mut self, sample: &ExecutionSample) {
        self.execute.record(sample);
    }

    pub fn prepare_stat(&self) -> &TimerStat {
        &self.prepare
    }

    pub fn execute_stat(&self) -> &StatementStat {
        &self.execute
    }
}

impl fmt::Debug for PreparedStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedStmt")
            .field("sql_text", &String::from_utf8_lossy(self.sql_text()))
            .field("prepare", &self.prepare)
            .field("execute", &self.execute)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_truncated_to_max() {
        let long = vec![b'x'; SQL_TEXT_MAX + 100];
        let stmt = PreparedStmt::new(&long);
        assert_eq!(stmt.sql_text().len(), SQL_TEXT_MAX);
    }

    #[test]
    fn test_corrupt_length_is_clamped() {
        let mut stmt = PreparedStmt::new(b"SELECT 1");
        stmt.sql_text_length = u32::MAX;
        assert_eq!(stmt.sql_text().len(), SQL_TEXT_MAX);
    }

    #[test]
    fn test_reset_clears_stats() {
        let mut stmt = PreparedStmt::new(b"SELECT 1");
        stmt.record_prepare(10);
        stmt.record_execute(&ExecutionSample::new(20));
        stmt.reset(b"SELECT 2");
        assert_eq!(stmt.sql_text(), b"SELECT 2");
        assert_eq!(stmt.prepare_stat().count(), 0);
        assert_eq!(stmt.execute_stat().count(), 0);
    }
}
