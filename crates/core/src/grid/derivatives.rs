//! One-sided spatial derivatives
//!
//! The reinitialization kernels consume forward ("plus") and backward ("minus")
//! differences of φ and ψ but never compute them: higher-order ENO/WENO
//! derivatives are the driver's business. This module provides the first-order
//! differences for drivers that do not need more, and for tests.
//!
//! ```text
//! x_plus(i, j)  = (f(i+1, j) - f(i, j)) / dx
//! x_minus(i, j) = (f(i, j) - f(i-1, j)) / dx
//! ```

use super::field::sweep_fill_box;
use super::{Field, GridRange, GridSpacing, IndexBox};
use crate::error::GridError;
use tracing::debug;

/// Borrowed set of the four one-sided derivatives of one field
///
/// All four buffers share the ghost box of the [`GridRange`] they are used with.
#[derive(Debug, Clone, Copy)]
pub struct GradientComponents<'a> {
    pub x_plus: &'a [f64],
    pub x_minus: &'a [f64],
    pub y_plus: &'a [f64],
    pub y_minus: &'a [f64],
}

/// Validated views over [`GradientComponents`]
#[derive(Debug, Clone, Copy)]
pub(crate) struct GradientFields<'a> {
    pub x_plus: Field<'a>,
    pub x_minus: Field<'a>,
    pub y_plus: Field<'a>,
    pub y_minus: Field<'a>,
}

impl<'a> GradientComponents<'a> {
    pub(crate) fn fields(&self, ghost: IndexBox) -> Result<GradientFields<'a>, GridError> {
        Ok(GradientFields {
            x_plus: Field::new(self.x_plus, ghost)?,
            x_minus: Field::new(self.x_minus, ghost)?,
            y_plus: Field::new(self.y_plus, ghost)?,
            y_minus: Field::new(self.y_minus, ghost)?,
        })
    }
}

impl GradientFields<'_> {
    /// `([x_plus, y_plus], [x_minus, y_minus])` at `(i, j)`
    #[inline(always)]
    pub fn at(&self, i: i64, j: i64) -> ([f64; 2], [f64; 2]) {
        (
            [self.x_plus.at(i, j), self.y_plus.at(i, j)],
            [self.x_minus.at(i, j), self.y_minus.at(i, j)],
        )
    }
}

/// Owned one-sided derivatives over a ghost box
///
/// Only the fill box the derivatives were computed on holds meaningful values;
/// the rest of each buffer is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct OneSidedDerivatives {
    ghost: IndexBox,
    pub x_plus: Vec<f64>,
    pub x_minus: Vec<f64>,
    pub y_plus: Vec<f64>,
    pub y_minus: Vec<f64>,
}

impl OneSidedDerivatives {
    /// Zeroed derivative buffers over `ghost`
    pub fn zeros(ghost: IndexBox) -> Self {
        let len = ghost.cell_count();
        Self {
            ghost,
            x_plus: vec![0.0; len],
            x_minus: vec![0.0; len],
            y_plus: vec![0.0; len],
            y_minus: vec![0.0; len],
        }
    }

    pub fn ghost(&self) -> IndexBox {
        self.ghost
    }

    /// Borrow all four components for a kernel call
    pub fn components(&self) -> GradientComponents<'_> {
        GradientComponents {
            x_plus: &self.x_plus,
            x_minus: &self.x_minus,
            y_plus: &self.y_plus,
            y_minus: &self.y_minus,
        }
    }
}

/// First-order forward and backward differences of `field` on the fill box
///
/// # Arguments
///
/// * `field` - Samples over `range.ghost()`
/// * `range` - Ghost box of `field` and the fill box to differentiate on
/// * `spacing` - Grid spacing
///
/// # Errors
///
/// - [`GridError::InsufficientHalo`] if the ghost box leaves no halo on some side
/// - [`GridError::BufferTooSmall`] if `field` does not cover the ghost box
/// - [`GridError::InvalidSpacing`] for a degenerate spacing
pub fn compute_one_sided_derivatives(
    field: &[f64],
    range: &GridRange,
    spacing: GridSpacing,
) -> Result<OneSidedDerivatives, GridError> {
    range.validate()?;
    range.require_halo(1)?;
    spacing.validate()?;

    let ghost = range.ghost();
    let fill = range.fill();
    let f = Field::new(field, ghost)?;
    let (dx, dy) = (spacing.dx(), spacing.dy());

    debug!(%fill, "computing one-sided derivatives");

    let mut out = OneSidedDerivatives::zeros(ghost);
    sweep_fill_box(&mut out.x_plus, &ghost, &fill, |i, j| {
        (f.at(i + 1, j) - f.at(i, j)) / dx
    });
    sweep_fill_box(&mut out.x_minus, &ghost, &fill, |i, j| {
        (f.at(i, j) - f.at(i - 1, j)) / dx
    });
    sweep_fill_box(&mut out.y_plus, &ghost, &fill, |i, j| {
        (f.at(i, j + 1) - f.at(i, j)) / dy
    });
    sweep_fill_box(&mut out.y_minus, &ghost, &fill, |i, j| {
        (f.at(i, j) - f.at(i, j - 1)) / dy
    });
    Ok(out)
}
