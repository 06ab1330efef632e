//! Right-hand side of the reinitialization equation
//!
//! ∂φ/∂τ = −sgn(s)(|∇φ| − 1), with |∇φ| from the Godunov selection and `s`
//! either φ or φ0 according to the [`SignPolicy`].

use super::godunov::upwind_gradient_norm;
use super::sign::{sgn, SignPolicy};
use crate::error::GridError;
use crate::grid::{Field, FieldMut, GradientComponents, GradientFields, GridRange};
use tracing::debug;

/// Buffers read by the reinitialization kernels
///
/// Every buffer covers the ghost box of the [`GridRange`] passed alongside.
#[derive(Debug, Clone, Copy)]
pub struct ReinitInputs<'a> {
    /// Current iterate φ
    pub phi: &'a [f64],
    /// Initial condition φ0 the iteration started from
    pub phi0: &'a [f64],
    /// One-sided derivatives of φ
    pub grad_phi: GradientComponents<'a>,
}

/// Validated views over [`ReinitInputs`]
#[derive(Debug, Clone, Copy)]
pub(crate) struct ReinitFields<'a> {
    pub phi: Field<'a>,
    pub phi0: Field<'a>,
    pub grad_phi: GradientFields<'a>,
}

impl<'a> ReinitInputs<'a> {
    pub(crate) fn fields(&self, range: &GridRange) -> Result<ReinitFields<'a>, GridError> {
        range.validate()?;
        let ghost = range.ghost();
        Ok(ReinitFields {
            phi: Field::new(self.phi, ghost)?,
            phi0: Field::new(self.phi0, ghost)?,
            grad_phi: self.grad_phi.fields(ghost)?,
        })
    }
}

impl ReinitFields<'_> {
    /// Godunov reinitialization RHS at one point
    #[inline(always)]
    pub fn godunov_rhs(&self, policy: SignPolicy, i: i64, j: i64) -> f64 {
        let s = policy.reference(self.phi.at(i, j), self.phi0.at(i, j));
        let (plus, minus) = self.grad_phi.at(i, j);
        let norm = upwind_gradient_norm(plus, minus, s);
        -sgn(s) * (norm - 1.0)
    }
}

/// Compute the reinitialization RHS on the fill box
///
/// Writes `rhs` only inside `range.fill()`; ghost cells keep whatever the
/// caller left there.
///
/// # Arguments
///
/// * `rhs` - Output over `range.ghost()`
/// * `inputs` - φ, φ0 and the one-sided derivatives of φ
/// * `range` - Ghost box shared by all buffers, and the fill box to update
/// * `policy` - Whether sgn(φ) or sgn(φ0) drives the upwinding
///
/// # Errors
///
/// Returns a [`GridError`] if the range is inconsistent or a buffer is shorter
/// than the ghost box. Nothing is written in that case.
pub fn compute_reinitialization_rhs(
    rhs: &mut [f64],
    inputs: &ReinitInputs<'_>,
    range: &GridRange,
    policy: SignPolicy,
) -> Result<(), GridError> {
    let fields = inputs.fields(range)?;
    let fill = range.fill();
    let mut out = FieldMut::new(rhs, range.ghost())?;

    debug!(%fill, ?policy, "computing reinitialization rhs");

    out.sweep(&fill, |i, j| fields.godunov_rhs(policy, i, j));
    Ok(())
}
