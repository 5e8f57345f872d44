/*!
 * Scan Positions
 * Pool cursors and their fixed-width opaque tokens
 */

use crate::core::errors::PositionError;
use crate::core::limits::POSITION_TOKEN_LEN;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cursor into the pool
///
/// Holds the slot index only, so a position taken from one scan can be
/// replayed by any other scan over the same pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(u32);

impl Position {
    /// First slot
    pub const START: Position = Position(0);

    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Capacity is validated to fit in 32 bits, so every slot index does too
    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize);
        Self(index as u32)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    /// Position right after this one
    #[inline]
    pub(crate) fn successor(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Encode into an opaque token
    pub fn encode(self) -> Result<PositionToken, PositionError> {
        let encoded = bincode::serialize(&self).map_err(|source| PositionError::Codec {
            context: "position token",
            source,
        })?;

        let bytes: [u8; POSITION_TOKEN_LEN] =
            encoded
                .as_slice()
                .try_into()
                .map_err(|_| PositionError::InvalidLength {
                    expected: POSITION_TOKEN_LEN,
                    actual: encoded.len(),
                })?;
        Ok(PositionToken(bytes))
    }

    /// Decode a token and check it addresses a slot of a pool with `capacity` slots
    pub fn decode(token: &[u8], capacity: usize) -> Result<Self, PositionError> {
        if token.len() != POSITION_TOKEN_LEN {
            return Err(PositionError::InvalidLength {
                expected: POSITION_TOKEN_LEN,
                actual: token.len(),
            });
        }

        let position: Position =
            bincode::deserialize(token).map_err(|source| PositionError::Codec {
                context: "position token",
                source,
            })?;

        if position.index() >= capacity {
            return Err(PositionError::OutOfRange {
                index: position.0,
                capacity,
            });
        }

        Ok(position)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque fixed-size position token handed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionToken([u8; POSITION_TOKEN_LEN]);

impl PositionToken {
    #[inline]
    pub fn as_bytes(&self) -> &[u8; POSITION_TOKEN_LEN] {
        &self.0
    }
}

impl AsRef<[u8]> for PositionToken {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
