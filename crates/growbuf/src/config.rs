//! Growth policy configuration.
//!
//! [`GrowthPolicy`] holds the tuning constants that decide how much a
//! buffer grows when an append or insert finds it full. The constants
//! affect performance only; every policy that passes
//! [`GrowthPolicy::validate`] keeps the buffer's size/capacity invariants.

use std::error::Error;
use std::fmt;

/// Growth tuning for a [`GrowableBuffer`](crate::GrowableBuffer).
///
/// When a mutation needs one more slot than the buffer has, the new
/// capacity is
///
/// ```text
/// max(floor(capacity * scale_factor) + bias, required)
/// ```
///
/// An unallocated buffer first grows to `max(initial_capacity, required)`.
/// Validated by every constructor that accepts a policy; immutable once
/// attached to a buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrowthPolicy {
    /// Slots allocated on the first growth of an empty buffer.
    ///
    /// Default: 1. Must be at least 1.
    pub initial_capacity: usize,

    /// Multiplicative growth factor applied to the current capacity.
    ///
    /// Default: 1.5. Must be finite and strictly greater than 1.
    pub scale_factor: f32,

    /// Additive slots on top of the scaled capacity.
    ///
    /// Default: 1. Keeps tiny buffers from growing by less than one
    /// whole slot per reallocation.
    pub bias: usize,
}

impl GrowthPolicy {
    /// Default slot count for the first allocation.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 1;

    /// Default multiplicative growth factor.
    pub const DEFAULT_SCALE_FACTOR: f32 = 1.5;

    /// Default additive growth bias.
    pub const DEFAULT_BIAS: usize = 1;

    /// Create a policy with the default constants.
    pub const fn new() -> Self {
        Self {
            initial_capacity: Self::DEFAULT_INITIAL_CAPACITY,
            scale_factor: Self::DEFAULT_SCALE_FACTOR,
            bias: Self::DEFAULT_BIAS,
        }
    }

    /// Check the structural invariants of this policy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capacity == 0 {
            return Err(ConfigError::ZeroInitialCapacity);
        }
        if !self.scale_factor.is_finite() || self.scale_factor <= 1.0 {
            return Err(ConfigError::InvalidScaleFactor {
                value: self.scale_factor,
            });
        }
        Ok(())
    }

    /// Compute the capacity to grow to from `capacity` so that at least
    /// `required` slots are available.
    ///
    /// Returns `None` if the computation overflows `usize`. The result is
    /// always strictly greater than `capacity` and at least `required`.
    pub fn next_capacity(&self, capacity: usize, required: usize) -> Option<usize> {
        let grown = if capacity == 0 {
            self.initial_capacity
        } else {
            // Float-to-int casts saturate, so an absurd product lands on
            // usize::MAX and the bias add below reports the overflow.
            let scaled = (capacity as f64 * self.scale_factor as f64) as usize;
            scaled.checked_add(self.bias)?
        };
        let floor = capacity.checked_add(1)?;
        Some(grown.max(required).max(floor))
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors detected by [`GrowthPolicy::validate`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// `initial_capacity` is zero.
    ZeroInitialCapacity,
    /// `scale_factor` is NaN, infinite, or not greater than one.
    InvalidScaleFactor {
        /// The rejected value.
        value: f32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroInitialCapacity => write!(f, "initial_capacity must be at least 1"),
            Self::InvalidScaleFactor { value } => {
                write!(f, "scale_factor must be finite and greater than 1, got {value}")
            }
        }
    }
}

impl Error for ConfigError {}
