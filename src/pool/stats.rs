/*!
 * Statement Statistics Aggregates
 *
 * Raw in-slot accumulators and the exported row form they copy into.
 * Writers update the raw form under the slot's write lock; readers only
 * ever see it through `copy_into`.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Aggregate stored inside a slot and exported by value
pub trait StatAggregate: Copy + Default + Send + 'static {
    /// Exported form
    type Row: Copy + Default + fmt::Debug + PartialEq + Serialize;

    /// Copy this aggregate into its exported form
    fn copy_into(&self, row: &mut Self::Row);
}

// ============================================================================
// Timer
// ============================================================================

/// Count/sum/min/max accumulator for timed events
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerStat {
    count: u64,
    sum: u64,
    min: u64,
    max: u64,
}

impl Default for TimerStat {
    fn default() -> Self {
        Self {
            count: 0,
            sum: 0,
            min: u64::MAX,
            max: 0,
        }
    }
}

impl TimerStat {
    /// Record one timed event
    #[inline]
    pub fn record(&mut self, wait: u64) {
        self.count += 1;
        self.sum = self.sum.saturating_add(wait);
        self.min = self.min.min(wait);
        self.max = self.max.max(wait);
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }
}

/// Exported timer columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerStatRow {
    pub count: u64,
    pub sum: u64,
    pub min: u64,
    pub avg: u64,
    pub max: u64,
}

impl StatAggregate for TimerStat {
    type Row = TimerStatRow;

    fn copy_into(&self, row: &mut TimerStatRow) {
        if self.count == 0 {
            *row = TimerStatRow::default();
            return;
        }
        *row = TimerStatRow {
            count: self.count,
            sum: self.sum,
            min: self.min,
            avg: self.sum / self.count,
            max: self.max,
        };
    }
}

// ============================================================================
// Statement execution
// ============================================================================

/// Per-execution counters summed by [`StatementStat`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum StatementCounter {
    LockTime,
    Errors,
    Warnings,
    RowsAffected,
    RowsSent,
    RowsExamined,
    CreatedTmpDiskTables,
    CreatedTmpTables,
    SelectFullJoin,
    SelectFullRangeJoin,
    SelectRange,
    SelectRangeCheck,
    SelectScan,
    SortMergePasses,
    SortRange,
    SortRows,
    SortScan,
    NoIndexUsed,
    NoGoodIndexUsed,
}

impl StatementCounter {
    pub const COUNT: usize = 19;

    pub const ALL: [StatementCounter; Self::COUNT] = [
        Self::LockTime,
        Self::Errors,
        Self::Warnings,
        Self::RowsAffected,
        Self::RowsSent,
        Self::RowsExamined,
        Self::CreatedTmpDiskTables,
        Self::CreatedTmpTables,
        Self::SelectFullJoin,
        Self::SelectFullRangeJoin,
        Self::SelectRange,
        Self::SelectRangeCheck,
        Self::SelectScan,
        Self::SortMergePasses,
        Self::SortRange,
        Self::SortRows,
        Self::SortScan,
        Self::NoIndexUsed,
        Self::NoGoodIndexUsed,
    ];
}

/// Measurements from a single statement execution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionSample {
    pub timer_wait: u64,
    counters: [u64; StatementCounter::COUNT],
}

impl ExecutionSample {
    pub fn new(timer_wait: u64) -> Self {
        Self {
            timer_wait,
            ..Default::default()
        }
    }

    /// Set one counter (builder style)
    pub fn with(mut self, counter: StatementCounter, value: u64) -> Self {
        self.counters[counter as usize] = value;
        self
    }
}

/// Execution aggregate: a timer plus summed counters
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatementStat {
    timer: TimerStat,
    counters: [u64; StatementCounter::COUNT],
}

impl StatementStat {
    /// Fold one execution into the aggregate
    pub fn record(&mut self, sample: &ExecutionSample) {
        self.timer.record(sample.timer_wait);
        for (sum, value) in self.counters.iter_mut().zip(sample.counters.iter()) {
            *sum = sum.saturating_add(*value);
        }
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.timer.count()
    }
}

/// Exported execution columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementStatRow {
    pub timer: TimerStatRow,
    pub counters: [u64; StatementCounter::COUNT],
}

impl StatementStatRow {
    /// Number of exported values: five timer columns then the counters
    pub const WIDTH: usize = 5 + StatementCounter::COUNT;

    /// Value at `offset` within the execution column group
    pub fn value(&self, offset: usize) -> Option<u64> {
        match offset {
            0 => Some(self.timer.count),
            1 => Some(self.timer.sum),
            2 => Some(self.timer.min),
            3 => Some(self.timer.avg),
            4 => Some(self.timer.max),
            n => self.counters.get(n - 5).copied(),
        }
    }

    pub fn counter(&self, counter: StatementCounter) -> u64 {
        self.counters[counter as usize]
    }
}

impl StatAggregate for StatementStat {
    type Row = StatementStatRow;

    fn copy_into(&self, row: &mut StatementStatRow) {
        self.timer.copy_into(&mut row.timer);
        row.counters = self.counters;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_timer_exports_zeroes() {
        let mut row = TimerStatRow {
            count: 9,
            sum: 9,
            min: 9,
            avg: 9,
            max: 9,
        };
        TimerStat::default().copy_into(&mut row);
        assert_eq!(row, TimerStatRow::default());
    }

    #[test]
    fn test_timer_min_avg_max() {
        let mut stat = TimerStat::default();
        for wait in [30, 10, 20] {
            stat.record(wait);
        }
        let mut row = TimerStatRow::default();
        stat.copy_into(&mut row);
        assert_eq!(
            row,
            TimerStatRow {
                count: 3,
                sum: 60,
                min: 10,
                avg: 20,
                max: 30,
            }
        );
    }

    #[test]
    fn test_statement_counters_sum() {
        let mut stat = StatementStat::default();
        stat.record(&ExecutionSample::new(100).with(StatementCounter::RowsSent, 5));
        stat.record(
            &ExecutionSample::new(300)
                .with(StatementCounter::RowsSent, 2)
                .with(StatementCounter::Errors, 1),
        );

        let mut row = StatementStatRow::default();
        stat.copy_into(&mut row);
        assert_eq!(row.timer.count, 2);
        assert_eq!(row.timer.avg, 200);
        assert_eq!(row.counter(StatementCounter::RowsSent), 7);
        assert_eq!(row.counter(StatementCounter::Errors), 1);
        assert_eq!(row.counter(StatementCounter::Warnings), 0);
    }

    #[test]
    fn test_value_offsets() {
        let mut stat = StatementStat::default();
        stat.record(&ExecutionSample::new(40).with(StatementCounter::NoGoodIndexUsed, 3));
        let mut row = StatementStatRow::default();
        stat.copy_into(&mut row);

        assert_eq!(row.value(0), Some(1));
        assert_eq!(row.value(4), Some(40));
        assert_eq!(row.value(5), Some(0));
        assert_eq!(row.value(StatementStatRow::WIDTH - 1), Some(3));
        assert_eq!(row.value(StatementStatRow::WIDTH), None);
    }
}
