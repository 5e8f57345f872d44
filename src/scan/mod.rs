/*!
 * Scan Module
 * Positions, row snapshots and the resumable pool scanner
 */

mod position;
mod row;
mod scanner;

pub use position::{Position, PositionToken};
pub use row::{materialize, Row};
pub use scanner::{Lookup, ScanStep, Scanner};
