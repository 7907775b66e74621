//! Logistic squashing function used by every neuron's activation.
//!
//! `L(x) = 1 / (1 + e^{-(x - mean) / sd})`, with `mean = 0.5` and `sd = 0.1`
//! by default. The value at zero net input is the resting (baseline)
//! activation that `reset_activation()` restores.

use crate::error::{Result, SelnetError};
use crate::unit_scalar::UnitScalar;
use serde::{Deserialize, Serialize};

/// Default logistic midpoint.
pub const DEFAULT_MEAN: f64 = 0.5;

/// Default logistic spread.
pub const DEFAULT_SD: f64 = 0.1;

/// Logistic activation function.
///
/// # Examples
///
/// ```
/// use selnet::Logistic;
///
/// let l = Logistic::default();
/// assert!((l.raw(0.5) - 0.5).abs() < 1e-12);
/// assert!(l.baseline().value() < 0.01);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Logistic {
    mean: f64,
    sd: f64,
}

impl Logistic {
    /// Create a logistic function; `sd` must be finite and positive.
    pub fn new(mean: f64, sd: f64) -> Result<Self> {
        let logistic = Logistic { mean, sd };
        logistic.validate()?;
        Ok(logistic)
    }

    /// Check the parameters (used after deserialization).
    pub fn validate(&self) -> Result<()> {
        if !self.mean.is_finite() {
            return Err(SelnetError::InvalidParameter(format!(
                "logistic mean must be finite, got {}",
                self.mean
            )));
        }
        if !(self.sd.is_finite() && self.sd > 0.0) {
            return Err(SelnetError::InvalidParameter(format!(
                "logistic sd must be finite and positive, got {}",
                self.sd
            )));
        }
        Ok(())
    }

    /// Midpoint.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Spread.
    pub fn sd(&self) -> f64 {
        self.sd
    }

    /// Unclamped function value.
    #[inline]
    pub fn raw(&self, x: f64) -> f64 {
        1.0 / (1.0 + (-(x - self.mean) / self.sd).exp())
    }

    /// Function value as a unit scalar.
    #[inline]
    pub fn apply(&self, x: f64) -> UnitScalar {
        UnitScalar::clamped(self.raw(x))
    }

    /// Activation at zero net input.
    #[inline]
    pub fn baseline(&self) -> UnitScalar {
        self.apply(0.0)
    }
}

impl Default for Logistic {
    fn default() -> Self {
        Logistic {
            mean: DEFAULT_MEAN,
            sd: DEFAULT_SD,
        }
    }
}
