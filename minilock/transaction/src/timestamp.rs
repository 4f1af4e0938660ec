//! Registration timestamps.
//!
//! A timestamp records the order in which transactions were first seen by a scheduler. It is
//! only ever used to pick a deadlock victim: of two transactions, the one with the larger
//! timestamp is the younger one.

use serde::{Deserialize, Serialize};

use crate::error::TimestampError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create timestamp by a given raw value.
    #[inline]
    pub fn with_ts(timestamp: u64) -> Self {
        Self(timestamp)
    }

    /// Returns the raw value of the timestamp.
    #[inline]
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Hands out strictly increasing timestamps.
///
/// Every generator starts from its own counter, so two schedulers never influence each other.
#[derive(Debug, Clone)]
pub struct TimestampGenerator {
    counter: u64,
}

impl TimestampGenerator {
    /// Create a new timestamp generator starting at zero.
    #[inline]
    pub fn new() -> Self {
        Self::with_start(0)
    }

    /// Create a new timestamp generator with a starting value
    #[inline]
    pub fn with_start(start: u64) -> Self {
        Self { counter: start }
    }

    /// Generate the next timestamp
    pub fn next(&mut self) -> Result<Timestamp, TimestampError> {
        let cur = self.counter;
        self.counter = cur
            .checked_add(1)
            .ok_or(TimestampError::Overflow(cur))?;
        Ok(Timestamp::with_ts(cur))
    }

    /// Get the current timestamp without incrementing
    #[inline]
    pub fn current(&self) -> Timestamp {
        Timestamp::with_ts(self.counter)
    }
}

impl Default for TimestampGenerator {
    fn default() -> Self {
        Self::new()
    }
}
