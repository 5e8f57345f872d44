/*!
 * Core Module
 * Limits, configuration, error types and synchronization primitives
 */

pub mod config;
pub mod errors;
pub mod limits;
pub mod sync;

// Re-export for convenience
pub use config::PoolConfig;
pub use errors::*;
pub use limits::*;
