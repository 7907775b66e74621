//! UnitScalar - a floating-point value constrained to [0, 1].
//!
//! Activation levels, connection weights and signal strengths are all read as
//! probabilities or strengths, so the engine stores them as `UnitScalar`.
//! Construction outside the interval fails; callers that want saturation ask
//! for it explicitly with [`UnitScalar::clamped`] or
//! [`UnitScalar::saturating_add`].
//!
//! # Examples
//!
//! ```
//! use selnet::UnitScalar;
//!
//! let w = UnitScalar::new(0.25).unwrap();
//! assert_eq!(w.value(), 0.25);
//! assert!(UnitScalar::new(1.5).is_err());
//! assert_eq!(UnitScalar::clamped(1.5), UnitScalar::ONE);
//! ```

use crate::error::{Result, SelnetError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A value in the closed unit interval.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct UnitScalar(f64);

impl UnitScalar {
    /// Lower bound of the interval.
    pub const ZERO: UnitScalar = UnitScalar(0.0);

    /// Upper bound of the interval.
    pub const ONE: UnitScalar = UnitScalar(1.0);

    /// Create a new value, failing with `OutOfRange` outside [0, 1] or on NaN.
    pub fn new(value: f64) -> Result<Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(UnitScalar(value))
        } else {
            Err(SelnetError::OutOfRange { value })
        }
    }

    /// Create a value by clamping into [0, 1]. NaN maps to zero.
    #[inline]
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            UnitScalar::ZERO
        } else {
            UnitScalar(value.clamp(0.0, 1.0))
        }
    }

    /// Get the raw value.
    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// `1 - self`.
    #[inline]
    pub fn complement(self) -> Self {
        UnitScalar(1.0 - self.0)
    }

    /// Add `delta`, failing if the sum leaves the interval.
    pub fn checked_add(self, delta: f64) -> Result<Self> {
        UnitScalar::new(self.0 + delta)
    }

    /// Add `delta`, clamping the sum into the interval.
    #[inline]
    pub fn saturating_add(self, delta: f64) -> Self {
        UnitScalar::clamped(self.0 + delta)
    }
}

impl TryFrom<f64> for UnitScalar {
    type Error = SelnetError;

    fn try_from(value: f64) -> Result<Self> {
        UnitScalar::new(value)
    }
}

impl From<UnitScalar> for f64 {
    fn from(value: UnitScalar) -> f64 {
        value.0
    }
}

impl fmt::Display for UnitScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
