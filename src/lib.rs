/*!
 * Prepared Statement Instance Monitor
 * Live, read-only view over a fixed pool of per-statement statistics records
 */

pub mod core;
pub mod monitoring;
pub mod pool;
pub mod scan;
pub mod table;

// Re-exports
pub use crate::core::{
    ConfigError, MonitorError, MonitorResult, PoolConfig, PoolError, PositionError,
};
pub use monitoring::init_tracing;
pub use pool::{ExecutionSample, PoolStats, PreparedStmt, RecordPool, SlotHandle, StmtPool};
pub use scan::{Lookup, Position, PositionToken, Row, ScanStep, Scanner};
pub use table::{Column, Fetch, PreparedStmtTable, ProjectedRow, ReadSet, Value};
