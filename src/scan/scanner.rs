/*!
 * Pool Scanner
 *
 * Cursor-driven walk over the statement pool. Visits populated slots in
 * strictly increasing index order and never rewinds within a scan; slots
 * populated behind the cursor are picked up by the next scan.
 */

use super::position::Position;
use super::row::{materialize, Row};
use crate::pool::StmtPool;

/// Outcome of [`Scanner::next`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScanStep {
    /// A populated slot; the row carries its own validity
    Row { position: Position, row: Row },
    /// No populated slot remains
    EndOfScan,
}

/// Outcome of [`Scanner::seek`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup {
    Row(Row),
    /// Nothing lives at the position
    NotFound,
}

/// Resumable pool scanner
///
/// Holds nothing but the pool reference and two positions: the last visited
/// slot and where the next call resumes.
pub struct Scanner<'a> {
    pool: &'a StmtPool,
    pos: Position,
    next_pos: Position,
}

impl<'a> Scanner<'a> {
    pub fn new(pool: &'a StmtPool) -> Self {
        Self {
            pool,
            pos: Position::START,
            next_pos: Position::START,
        }
    }

    /// Restart from the first slot
    pub fn reset(&mut self) {
        self.pos = Position::START;
        self.next_pos = Position::START;
    }

    /// Last position visited or sought
    #[inline]
    pub fn position(&self) -> Position {
        self.pos
    }

    /// Where the next call to [`Scanner::next`] starts looking
    #[inline]
    pub fn resume_position(&self) -> Position {
        self.next_pos
    }

    /// Advance to the next populated slot
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> ScanStep {
        let size = self.pool.size();
        let mut index = self.next_pos.index();

        while index < size {
            if self.pool.is_populated(index) {
                self.pos = Position::from_index(index);
                self.next_pos = self.pos.successor();
                let row = materialize(self.pool.at(index));
                return ScanStep::Row {
                    position: self.pos,
                    row,
                };
            }
            index += 1;
        }

        self.pos = Position::from_index(size);
        self.next_pos = self.pos;
        ScanStep::EndOfScan
    }

    /// Direct lookup; does not move the resume position
    ///
    /// # Panics
    /// Panics if `position` is outside the pool. Decode external tokens with
    /// [`Position::decode`], which rejects such positions.
    pub fn seek(&mut self, position: Position) -> Lookup {
        self.pos = position;
        if !self.pool.is_populated(position.index()) {
            return Lookup::NotFound;
        }
        Lookup::Row(materialize(self.pool.at(position.index())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PoolConfig;

    fn pool(capacity: usize) -> StmtPool {
        StmtPool::new(PoolConfig::default().with_capacity(capacity)).unwrap()
    }

    #[test]
    fn test_empty_pool_ends_immediately() {
        let pool = pool(8);
        let mut scanner = Scanner::new(&pool);
        assert_eq!(scanner.next(), ScanStep::EndOfScan);
        assert_eq!(scanner.next(), ScanStep::EndOfScan);
    }

    #[test]
    fn test_skips_empty_slots() {
        let pool = pool(4);
        let mut handles = (0..4)
            .map(|i| pool.claim(format!("q{i}").as_bytes()).unwrap())
            .collect::<Vec<_>>()
            .into_iter();
        let _h0 = handles.next();
        drop(handles.next());
        let _h2 = handles.next();
        drop(handles.next());

        let mut scanner = Scanner::new(&pool);
        let mut seen = vec![];
        while let ScanStep::Row { position, row } = scanner.next() {
            assert!(row.is_valid());
            seen.push((position.get(), row.sql_text().to_vec()));
        }
        assert_eq!(seen, vec![(0, b"q0".to_vec()), (2, b"q2".to_vec())]);
    }

    #[test]
    fn test_no_rewind_within_scan() {
        let pool = pool(3);
        let _h0 = pool.claim(b"a").unwrap();
        let h1 = pool.claim(b"b").unwrap();
        let _h2 = pool.claim(b"c").unwrap();

        let mut scanner = Scanner::new(&pool);
        assert!(matches!(scanner.next(), ScanStep::Row { position, .. } if position.get() == 0));
        assert!(matches!(scanner.next(), ScanStep::Row { position, .. } if position.get() == 1));

        // Slot 1 is recycled behind the cursor
        drop(h1);
        let _again = pool.claim(b"d").unwrap();

        assert!(matches!(scanner.next(), ScanStep::Row { position, .. } if position.get() == 2));
        assert_eq!(scanner.next(), ScanStep::EndOfScan);
    }

    #[test]
    fn test_seek_does_not_move_resume_position() {
        let pool = pool(4);
        let _h0 = pool.claim(b"a").unwrap();
        let _h1 = pool.claim(b"b").unwrap();

        let mut scanner = Scanner::new(&pool);
        scanner.next();
        assert_eq!(scanner.resume_position(), Position::new(1));

        assert!(matches!(scanner.seek(Position::new(0)), Lookup::Row(_)));
        assert_eq!(scanner.seek(Position::new(3)), Lookup::NotFound);
        assert_eq!(scanner.position(), Position::new(3));
        assert_eq!(scanner.resume_position(), Position::new(1));
    }

    #[test]
    fn test_reset_restarts_from_zero() {
        let pool = pool(2);
        let _h = pool.claim(b"a").unwrap();

        let mut scanner = Scanner::new(&pool);
        scanner.next();
        assert_eq!(scanner.next(), ScanStep::EndOfScan);

        scanner.reset();
        assert!(matches!(scanner.next(), ScanStep::Row { .. }));
    }
}
