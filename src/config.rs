//! Construction-time configuration for `HashTable`.

use thiserror::Error;

/// Number of buckets a table starts with unless configured otherwise.
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Ratio of live entries to buckets above which the bucket array doubles.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("initial capacity must be at least one bucket")]
    ZeroCapacity,
    #[error("load factor must be finite and greater than zero, got {0}")]
    InvalidLoadFactor(f64),
}

/// Initial bucket count and load factor of a table.
///
/// Growth is always by doubling; only the starting point and the
/// resize trigger are configurable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    pub initial_capacity: usize,
    pub load_factor: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_capacity(mut self, buckets: usize) -> Self {
        self.initial_capacity = buckets;
        self
    }

    pub fn load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !self.load_factor.is_finite() || self.load_factor <= 0.0 {
            return Err(ConfigError::InvalidLoadFactor(self.load_factor));
        }
        Ok(())
    }

    /// `floor(capacity * load_factor)`.
    pub(crate) fn threshold_for(&self, capacity: usize) -> usize {
        (capacity as f64 * self.load_factor).floor() as usize
    }
}
