/*!
 * Prepared Statement Instances Table
 * Query-layer commands mapped onto the pool scanner
 */

use super::columns::Column;
use super::projection::{project, ProjectedRow, ReadSet};
use crate::core::errors::PositionError;
use crate::core::limits::POSITION_TOKEN_LEN;
use crate::pool::StmtPool;
use crate::scan::{Lookup, Position, PositionToken, ScanStep, Scanner};
use tracing::{debug, info};

/// Static description of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableShare {
    pub name: &'static str,
    /// Row estimate advertised to the planner
    pub estimated_rows: usize,
    /// Width of a position token
    pub ref_length: usize,
    pub truncatable: bool,
}

/// Result of a fetch command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch {
    Row(ProjectedRow),
    /// No record, or one caught mid-write
    NoSuchRow,
    /// Scan complete
    EndOfScan,
}

/// Table handle; one per query
pub struct PreparedStmtTable<'a> {
    pool: &'a StmtPool,
    scanner: Scanner<'a>,
    read_set: ReadSet,
}

impl<'a> PreparedStmtTable<'a> {
    pub const NAME: &'static str = "prepared_statement_instances";

    pub fn open(pool: &'a StmtPool) -> Self {
        Self {
            pool,
            scanner: Scanner::new(pool),
            read_set: ReadSet::all(),
        }
    }

    pub fn share(&self) -> TableShare {
        TableShare {
            name: Self::NAME,
            estimated_rows: self.pool.size(),
            ref_length: POSITION_TOKEN_LEN,
            truncatable: true,
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = Column> {
        Column::all()
    }

    /// Restrict subsequent fetches to `read_set`
    pub fn set_read_set(&mut self, read_set: ReadSet) {
        self.read_set = read_set;
    }

    pub fn reset_scan(&mut self) {
        self.scanner.reset();
    }

    /// Next row of the scan
    ///
    /// A slot caught mid-write still advances the scan and reports
    /// `NoSuchRow`; the caller moves on with the next fetch.
    pub fn fetch_next(&mut self) -> Fetch {
        match self.scanner.next() {
            ScanStep::EndOfScan => Fetch::EndOfScan,
            ScanStep::Row { row, .. } => match project(&row, self.read_set) {
                Some(projected) => Fetch::Row(projected),
                None => Fetch::NoSuchRow,
            },
        }
    }

    /// Token for the row returned by the last fetch
    pub fn position_token(&self) -> Result<PositionToken, PositionError> {
        self.scanner.position().encode()
    }

    /// Re-read a row by a token from [`PreparedStmtTable::position_token`]
    pub fn fetch_by_position(&mut self, token: &[u8]) -> Result<Fetch, PositionError> {
        let position = Position::decode(token, self.pool.size())?;
        let fetch = match self.scanner.seek(position) {
            Lookup::NotFound => Fetch::NoSuchRow,
            Lookup::Row(row) => match project(&row, self.read_set) {
                Some(projected) => Fetch::Row(projected),
                None => Fetch::NoSuchRow,
            },
        };
        debug!(%position, found = matches!(fetch, Fetch::Row(_)), "fetch by position");
        Ok(fetch)
    }

    /// Hide every current instance
    pub fn truncate(&mut self) {
        self.pool.truncate();
        info!(table = Self::NAME, "table truncated");
    }
}

impl Iterator for PreparedStmtTable<'_> {
    type Item = ProjectedRow;

    /// Remaining valid rows of the current scan
    fn next(&mut self) -> Option<ProjectedRow> {
        loop {
            match self.fetch_next() {
                Fetch::Row(row) => return Some(row),
                Fetch::NoSuchRow => continue,
                Fetch::EndOfScan => return None,
            }
        }
    }
}
