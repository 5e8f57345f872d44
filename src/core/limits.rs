/*!
 * Pool Limits and Constants
 *
 * Centralized location for sizing constants of the statement instance pool.
 * Values mirror the defaults of the instrumentation they describe.
 */

// =============================================================================
// POOL SIZING
// =============================================================================

/// Default number of prepared statement slots
/// Matches the advertised row estimate of the instances table
pub const DEFAULT_POOL_CAPACITY: usize = 1000;

/// Upper bound for a configured capacity
/// Positions are encoded as 32-bit indexes, one value is reserved for end-of-scan
pub const MAX_POOL_CAPACITY: usize = u32::MAX as usize;

/// Environment variable overriding the pool capacity
pub const POOL_CAPACITY_ENV: &str = "STMT_POOL_CAPACITY";

// =============================================================================
// RECORD LAYOUT
// =============================================================================

/// Maximum captured SQL text length in bytes
/// Longer statements are truncated at claim time
pub const SQL_TEXT_MAX: usize = 1024;

// =============================================================================
// POSITION TOKENS
// =============================================================================

/// Width of an encoded position token in bytes
pub const POSITION_TOKEN_LEN: usize = 4;
