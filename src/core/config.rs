/*!
 * Pool Configuration
 *
 * Startup sizing for the statement instance pool
 */

use super::errors::ConfigError;
use super::limits::{DEFAULT_POOL_CAPACITY, MAX_POOL_CAPACITY, POOL_CAPACITY_ENV};
use serde::{Deserialize, Serialize};

/// Pool configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of preallocated slots, fixed for the pool lifetime
    pub capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_POOL_CAPACITY,
        }
    }
}

impl PoolConfig {
    /// Small pool for tests and embedded use
    pub const fn small() -> Self {
        Self { capacity: 16 }
    }

    /// Override the capacity
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Check the configured values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 || self.capacity > MAX_POOL_CAPACITY {
            return Err(ConfigError::InvalidCapacity(self.capacity));
        }
        Ok(())
    }

    /// Load from environment, falling back to defaults
    ///
    /// Environment variables:
    /// - STMT_POOL_CAPACITY: number of slots (default: 1000)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(POOL_CAPACITY_ENV) {
            config.capacity = raw.trim().parse().map_err(|_| ConfigError::Parse {
                var: POOL_CAPACITY_ENV.to_string(),
                value: raw.clone(),
            })?;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        let config = PoolConfig::default();
        assert_eq!(config.capacity, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = PoolConfig::default().with_capacity(0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidCapacity(0)));
    }

    #[test]
    fn test_lookup_override() {
        let config = PoolConfig::from_lookup(|_| Some(" 64 ".to_string())).unwrap();
        assert_eq!(config.capacity, 64);
    }

    #[test]
    fn test_lookup_missing_uses_default() {
        let config = PoolConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, PoolConfig::default());
    }

    #[test]
    fn test_lookup_garbage() {
        let err = PoolConfig::from_lookup(|_| Some("lots".to_string())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
