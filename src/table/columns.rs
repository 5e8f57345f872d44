/*!
 * Column Catalog
 * Exported columns of the prepared statement instances table, in field order
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Exported column, discriminant is the field index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Column {
    ObjectInstanceBegin = 0,
    SqlText,
    OwnerThreadId,
    OwnerEventId,
    OwnerObjectType,
    OwnerObjectSchema,
    OwnerObjectName,
    TimerPrepare,
    CountExecute,
    SumTimerExecute,
    MinTimerExecute,
    AvgTimerExecute,
    MaxTimerExecute,
    SumLockTime,
    SumErrors,
    SumWarnings,
    SumRowsAffected,
    SumRowsSent,
    SumRowsExamined,
    SumCreatedTmpDiskTables,
    SumCreatedTmpTables,
    SumSelectFullJoin,
    SumSelectFullRangeJoin,
    SumSelectRange,
    SumSelectRangeCheck,
    SumSelectScan,
    SumSortMergePasses,
    SumSortRange,
    SumSortRows,
    SumSortScan,
    SumNoIndexUsed,
    SumNoGoodIndexUsed,
}

/// Column definition as registered with the query layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub column: Column,
    pub name: &'static str,
    pub sql_type: &'static str,
}

const BIGINT: &str = "bigint(20)";

/// Field definitions in index order
pub static COLUMNS: [ColumnDef; Column::COUNT] = [
    def(Column::ObjectInstanceBegin, "OBJECT_INSTANCE_BEGIN", BIGINT),
    def(Column::SqlText, "SQL_TEXT", "longtext"),
    def(Column::OwnerThreadId, "OWNER_THREAD_ID", BIGINT),
    def(Column::OwnerEventId, "OWNER_EVENT_ID", BIGINT),
    def(
        Column::OwnerObjectType,
        "OWNER_OBJECT_TYPE",
        "enum('EVENT','FUNCTION','PROCEDURE','TABLE','TRIGGER')",
    ),
    def(Column::OwnerObjectSchema, "OWNER_OBJECT_SCHEMA", "varchar(64)"),
    def(Column::OwnerObjectName, "OWNER_OBJECT_NAME", "varchar(64)"),
    def(Column::TimerPrepare, "TIMER_PREPARE", BIGINT),
    def(Column::CountExecute, "COUNT_EXECUTE", BIGINT),
    def(Column::SumTimerExecute, "SUM_TIMER_EXECUTE", BIGINT),
    def(Column::MinTimerExecute, "MIN_TIMER_EXECUTE", BIGINT),
    def(Column::AvgTimerExecute, "AVG_TIMER_EXECUTE", BIGINT),
    def(Column::MaxTimerExecute, "MAX_TIMER_EXECUTE", BIGINT),
    def(Column::SumLockTime, "SUM_LOCK_TIME", BIGINT),
    def(Column::SumErrors, "SUM_ERRORS", BIGINT),
    def(Column::SumWarnings, "SUM_WARNINGS", BIGINT),
    def(Column::SumRowsAffected, "SUM_ROWS_AFFECTED", BIGINT),
    def(Column::SumRowsSent, "SUM_ROWS_SENT", BIGINT),
    def(Column::SumRowsExamined, "SUM_ROWS_EXAMINED", BIGINT),
    def(Column::SumCreatedTmpDiskTables, "SUM_CREATED_TMP_DISK_TABLES", BIGINT),
    def(Column::SumCreatedTmpTables, "SUM_CREATED_TMP_TABLES", BIGINT),
    def(Column::SumSelectFullJoin, "SUM_SELECT_FULL_JOIN", BIGINT),
    def(Column::SumSelectFullRangeJoin, "SUM_SELECT_FULL_RANGE_JOIN", BIGINT),
    def(Column::SumSelectRange, "SUM_SELECT_RANGE", BIGINT),
    def(Column::SumSelectRangeCheck, "SUM_SELECT_RANGE_CHECK", BIGINT),
    def(Column::SumSelectScan, "SUM_SELECT_SCAN", BIGINT),
    def(Column::SumSortMergePasses, "SUM_SORT_MERGE_PASSES", BIGINT),
    def(Column::SumSortRange, "SUM_SORT_RANGE", BIGINT),
    def(Column::SumSortRows, "SUM_SORT_ROWS", BIGINT),
    def(Column::SumSortScan, "SUM_SORT_SCAN", BIGINT),
    def(Column::SumNoIndexUsed, "SUM_NO_INDEX_USED", BIGINT),
    def(Column::SumNoGoodIndexUsed, "SUM_NO_GOOD_INDEX_USED", BIGINT),
];

const fn def(column: Column, name: &'static str, sql_type: &'static str) -> ColumnDef {
    ColumnDef {
        column,
        name,
        sql_type,
    }
}

impl Column {
    pub const COUNT: usize = 32;

    /// First column of the execution statistics group
    pub const FIRST_EXECUTE: Column = Column::CountExecute;

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(index: usize) -> Option<Column> {
        COLUMNS.get(index).map(|def| def.column)
    }

    #[inline]
    pub fn def(self) -> &'static ColumnDef {
        &COLUMNS[self.index()]
    }

    #[inline]
    pub fn name(self) -> &'static str {
        self.def().name
    }

    /// Columns with no data source yet; always exported as NULL
    #[inline]
    pub const fn is_unimplemented(self) -> bool {
        matches!(
            self,
            Column::ObjectInstanceBegin
                | Column::OwnerThreadId
                | Column::OwnerEventId
                | Column::OwnerObjectType
                | Column::OwnerObjectSchema
                | Column::OwnerObjectName
                | Column::TimerPrepare
        )
    }

    pub fn all() -> impl Iterator<Item = Column> {
        COLUMNS.iter().map(|def| def.column)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
