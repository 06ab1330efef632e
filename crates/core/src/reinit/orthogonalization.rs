//! Right-hand side of the orthogonalization equation
//!
//! ```text
//! φ_τ + ∇φ · (sgn(ψ) ∇ψ / |∇ψ|) = 0
//! ```
//!
//! Evolving φ under this equation makes its level sets cross those of ψ at right
//! angles. ∇ψ is the average of its one-sided differences; ∇φ is upwinded
//! against the advection direction `n = sgn(ψ) ∇ψ / |∇ψ|`.
//!
//! Unlike the reinitialization kernels, every input carries its own ghost box:
//! callers commonly keep φ's and ψ's derivatives with different halo widths.

use super::sign::sgn;
use super::GRADIENT_TOLERANCE;
use crate::error::GridError;
use crate::grid::{Field, FieldMut, IndexBox};
use nalgebra::Vector2;
use tracing::debug;

/// x and y components of one one-sided gradient over a shared ghost box
#[derive(Debug, Clone, Copy)]
pub struct GradientPair<'a> {
    pub x: Field<'a>,
    pub y: Field<'a>,
}

impl<'a> GradientPair<'a> {
    /// Wrap two component buffers stored over `ghost`
    ///
    /// # Errors
    ///
    /// Returns a [`GridError`] if `ghost` is inverted or a buffer is too short.
    pub fn new(x: &'a [f64], y: &'a [f64], ghost: IndexBox) -> Result<Self, GridError> {
        Ok(Self {
            x: Field::new(x, ghost)?,
            y: Field::new(y, ghost)?,
        })
    }

    fn require_covers(&self, fill: &IndexBox) -> Result<(), GridError> {
        self.x.require_covers(fill)?;
        self.y.require_covers(fill)
    }

    #[inline(always)]
    fn at(&self, i: i64, j: i64) -> Vector2<f64> {
        Vector2::new(self.x.at(i, j), self.y.at(i, j))
    }
}

/// Buffers read by [`compute_orthogonalization_rhs`]
#[derive(Debug, Clone, Copy)]
pub struct OrthogonalizationInputs<'a> {
    /// Field whose gradient sets the advection direction
    pub psi: Field<'a>,
    /// Forward differences of φ
    pub grad_phi_plus: GradientPair<'a>,
    /// Backward differences of φ
    pub grad_phi_minus: GradientPair<'a>,
    /// Forward differences of ψ
    pub grad_psi_plus: GradientPair<'a>,
    /// Backward differences of ψ
    pub grad_psi_minus: GradientPair<'a>,
}

impl OrthogonalizationInputs<'_> {
    fn require_covers(&self, fill: &IndexBox) -> Result<(), GridError> {
        self.psi.require_covers(fill)?;
        self.grad_phi_plus.require_covers(fill)?;
        self.grad_phi_minus.require_covers(fill)?;
        self.grad_psi_plus.require_covers(fill)?;
        self.grad_psi_minus.require_covers(fill)
    }

    /// Orthogonalization RHS at one point
    #[inline(always)]
    fn rhs_at(&self, i: i64, j: i64) -> f64 {
        let psi_plus = self.grad_psi_plus.at(i, j);
        let psi_minus = self.grad_psi_minus.at(i, j);
        let grad_psi = 0.5 * (psi_plus + psi_minus);
        let norm = grad_psi.norm();
        // zero direction when the average cancels the one-sided differences
        let scale = psi_plus.amax().max(psi_minus.amax());
        let sign_psi = sgn(self.psi.at(i, j));
        if norm <= GRADIENT_TOLERANCE * scale || sign_psi == 0.0 {
            return 0.0;
        }
        let direction = grad_psi * (sign_psi / norm);

        let plus = self.grad_phi_plus.at(i, j);
        let minus = self.grad_phi_minus.at(i, j);
        let upwind = Vector2::new(
            if direction.x > 0.0 { minus.x } else { plus.x },
            if direction.y > 0.0 { minus.y } else { plus.y },
        );
        -upwind.dot(&direction)
    }
}

/// Compute the orthogonalization RHS on the fill box
///
/// A point where ∇ψ vanishes, or is lost in the rounding of its one-sided
/// differences, has no advection direction and gets a zero RHS.
///
/// # Arguments
///
/// * `rhs` - Output field; only `fill` is written
/// * `inputs` - ψ and the one-sided derivatives of φ and ψ, each with its own ghost box
/// * `fill` - Region to update
///
/// # Errors
///
/// Returns [`GridError::FillOutsideGhost`] if `fill` is not covered by the ghost
/// box of the output or of any input, [`GridError::EmptyBox`] if `fill` is
/// inverted. Nothing is written in that case.
pub fn compute_orthogonalization_rhs(
    rhs: &mut FieldMut<'_>,
    inputs: &OrthogonalizationInputs<'_>,
    fill: IndexBox,
) -> Result<(), GridError> {
    fill.validate()?;
    rhs.require_covers(&fill)?;
    inputs.require_covers(&fill)?;

    debug!(%fill, "computing orthogonalization rhs");

    rhs.sweep(&fill, |i, j| inputs.rhs_at(i, j));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{
        compute_one_sided_derivatives, GridRange, GridSpacing, OneSidedDerivatives, ScalarField,
    };
    use approx::assert_relative_eq;

    fn fill() -> IndexBox {
        IndexBox::new(0, 4, 0, 4).unwrap()
    }

    struct Setup {
        ghost: IndexBox,
        psi: ScalarField,
        phi_d: OneSidedDerivatives,
        psi_d: OneSidedDerivatives,
    }

    impl Setup {
        fn new(phi: impl Fn(i64, i64) -> f64, psi: impl Fn(i64, i64) -> f64) -> Self {
            let range = GridRange::with_halo(fill(), 1).unwrap();
            let spacing = GridSpacing::uniform(1.0).unwrap();
            let phi = ScalarField::from_fn(range.ghost(), phi);
            let psi = ScalarField::from_fn(range.ghost(), psi);
            let phi_d = compute_one_sided_derivatives(phi.as_slice(), &range, spacing).unwrap();
            let psi_d = compute_one_sided_derivatives(psi.as_slice(), &range, spacing).unwrap();
            Self {
                ghost: range.ghost(),
                psi,
                phi_d,
                psi_d,
            }
        }

        fn inputs(&self) -> OrthogonalizationInputs<'_> {
            let g = self.ghost;
            OrthogonalizationInputs {
                psi: self.psi.view(),
                grad_phi_plus: GradientPair::new(&self.phi_d.x_plus, &self.phi_d.y_plus, g).unwrap(),
                grad_phi_minus: GradientPair::new(&self.phi_d.x_minus, &self.phi_d.y_minus, g)
                    .unwrap(),
                grad_psi_plus: GradientPair::new(&self.psi_d.x_plus, &self.psi_d.y_plus, g).unwrap(),
                grad_psi_minus: GradientPair::new(&self.psi_d.x_minus, &self.psi_d.y_minus, g)
                    .unwrap(),
            }
        }

        fn run(&self) -> ScalarField {
            let mut rhs = ScalarField::new(self.ghost);
            compute_orthogonalization_rhs(&mut rhs.view_mut(), &self.inputs(), fill()).unwrap();
            rhs
        }
    }

    #[test]
    fn test_orthogonal_fields_are_stationary() {
        // φ varies along y only, ψ along x only: ∇φ · ∇ψ = 0
        let setup = Setup::new(|_, j| j as f64 - 2.0, |i, _| i as f64 - 2.5);
        let rhs = setup.run();
        for j in 0..=4 {
            for i in 0..=4 {
                assert_eq!(rhs.get(i, j), 0.0);
            }
        }
    }

    #[test]
    fn test_parallel_gradients_hand_values() {
        // φ = 3x, ψ = x - 2.5: n = sgn(ψ) e_x
        let setup = Setup::new(|i, _| 3.0 * i as f64, |i, _| i as f64 - 2.5);
        let rhs = setup.run();
        // ψ > 0 → n = +e_x, backward difference 3 → rhs = -3
        assert_relative_eq!(rhs.get(4, 2), -3.0, epsilon = 1e-12);
        // ψ < 0 → n = -e_x, forward difference 3 → rhs = +3
        assert_relative_eq!(rhs.get(1, 2), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_upwinding_picks_side_by_direction() {
        // φ = x² has distinct one-sided differences; ψ = x + y - 10 < 0 everywhere
        let setup = Setup::new(|i, _| (i * i) as f64, |i, j| (i + j) as f64 - 10.0);
        let rhs = setup.run();
        // n = -(1, 1)/√2: both components negative → forward differences
        // at (2, 2): φ_x⁺ = 9 - 4 = 5, φ_y⁺ = 0
        let expected = 5.0 / 2.0_f64.sqrt();
        assert_relative_eq!(rhs.get(2, 2), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_psi_gradient_gives_zero() {
        let setup = Setup::new(|i, j| (i * 7 - j * 3) as f64, |_, _| 1.0);
        let rhs = setup.run();
        for j in 0..=4 {
            for i in 0..=4 {
                let v = rhs.get(i, j);
                assert!(!v.is_nan());
                assert_eq!(v, 0.0);
            }
        }
    }

    #[test]
    fn test_small_but_resolved_psi_gradient_sets_direction() {
        // ψ stays clear of the sign dead zone while its slope is 1e-14
        let setup = Setup::new(|i, _| 3.0 * i as f64, |i, _| 1.0e-12 + 1.0e-14 * i as f64);
        let rhs = setup.run();
        for j in 0..=4 {
            for i in 0..=4 {
                assert_relative_eq!(rhs.get(i, j), -3.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_cancelling_psi_differences_give_zero() {
        // |x - 2| has D⁺ = 1, D⁻ = -1 at its kink, so the averaged gradient vanishes
        let setup = Setup::new(|i, j| (i + 2 * j) as f64, |i, _| (i as f64 - 2.0).abs() + 1.0);
        let rhs = setup.run();
        assert_eq!(rhs.get(2, 3), 0.0);
        assert_relative_eq!(rhs.get(4, 3), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_independent_ghost_boxes() {
        // ψ stored with a 2-cell halo, everything else with 1
        let setup = Setup::new(|i, _| 3.0 * i as f64, |i, _| i as f64 - 2.5);
        let wide = fill().grow(2);
        let psi_wide = ScalarField::from_fn(wide, |i, _| i as f64 - 2.5);
        let inputs = OrthogonalizationInputs {
            psi: psi_wide.view(),
            ..setup.inputs()
        };
        let mut rhs = ScalarField::new(fill());
        compute_orthogonalization_rhs(&mut rhs.view_mut(), &inputs, fill()).unwrap();

        let expected = setup.run();
        for j in 0..=4 {
            for i in 0..=4 {
                assert_eq!(rhs.get(i, j), expected.get(i, j), "at ({i}, {j})");
            }
        }
    }

    #[test]
    fn test_fill_outside_input_rejected() {
        let setup = Setup::new(|i, _| i as f64, |i, _| i as f64);
        let narrow = IndexBox::new(0, 3, 0, 4).unwrap();
        let psi_narrow = ScalarField::new(narrow);
        let inputs = OrthogonalizationInputs {
            psi: psi_narrow.view(),
            ..setup.inputs()
        };
        let mut rhs = ScalarField::with_value(setup.ghost, 5.0);
        let err = compute_orthogonalization_rhs(&mut rhs.view_mut(), &inputs, fill());
        assert!(matches!(err, Err(GridError::FillOutsideGhost { .. })));
        assert!(rhs.as_slice().iter().all(|&v| v == 5.0));
    }
}
