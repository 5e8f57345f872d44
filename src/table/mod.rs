/*!
 * Table Module
 * Column catalog, projection and the query-facing table handle
 */

mod columns;
mod projection;
mod table;

pub use columns::{Column, ColumnDef, COLUMNS};
pub use projection::{project, ProjectedRow, ReadSet, Value};
pub use table::{Fetch, PreparedStmtTable, TableShare};
