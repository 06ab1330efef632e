//! Grid spacing

use crate::error::GridError;
use serde::{Deserialize, Serialize};

/// Uniform spacing `(dx, dy)` of a structured grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpacing {
    dx: f64,
    dy: f64,
}

impl GridSpacing {
    /// Create a spacing, rejecting zero, negative and non-finite values
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidSpacing`] unless both values are finite and positive.
    pub fn new(dx: f64, dy: f64) -> Result<Self, GridError> {
        let spacing = Self { dx, dy };
        spacing.validate()?;
        Ok(spacing)
    }

    /// Same spacing along both axes
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidSpacing`] unless `h` is finite and positive.
    pub fn uniform(h: f64) -> Result<Self, GridError> {
        Self::new(h, h)
    }

    /// Re-check the invariant (used after deserialization)
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidSpacing`] unless both values are finite and positive.
    pub fn validate(&self) -> Result<(), GridError> {
        let valid = |h: f64| h.is_finite() && h > 0.0;
        if valid(self.dx) && valid(self.dy) {
            Ok(())
        } else {
            Err(GridError::InvalidSpacing {
                dx: self.dx,
                dy: self.dy,
            })
        }
    }

    #[inline]
    pub fn dx(&self) -> f64 {
        self.dx
    }

    #[inline]
    pub fn dy(&self) -> f64 {
        self.dy
    }

    /// Finest spacing, the length scale of the subcell relaxation
    #[inline]
    pub fn min_spacing(&self) -> f64 {
        self.dx.min(self.dy)
    }
}
