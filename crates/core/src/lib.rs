//! QSS Reinitialization Core Library
//!
//! Right-hand-side kernels for level-set reinitialization on 2D structured grids,
//! as used by quasi-static, constant-curvature interface models (e.g. capillary
//! imbibition into porous media).
//!
//! ## Kernels
//!
//! - Reinitialization: ∂φ/∂τ = −sgn(φ)(|∇φ| − 1) with Godunov upwinding
//! - Orthogonalization: ∂φ/∂τ = −∇φ · (sgn(ψ)∇ψ/|∇ψ|)
//! - Russo–Smereka subcell fix: a one-time distance estimate from φ0 and a
//!   reinitialization RHS that keeps the zero level set in place
//!
//! Every kernel reads caller-owned buffers laid out over a *ghost box* and
//! writes only the *fill box* of its output. Time integration, convergence
//! checks and boundary conditions belong to the caller.
//!
//! # Example
//!
//! ```rust
//! use qss_reinit_core::grid::{compute_one_sided_derivatives, GridRange, GridSpacing, IndexBox, ScalarField};
//! use qss_reinit_core::reinit::{compute_reinitialization_rhs, ReinitInputs, SignPolicy};
//!
//! let range = GridRange::with_halo(IndexBox::new(0, 9, 0, 9)?, 1)?;
//! let spacing = GridSpacing::uniform(0.1)?;
//! let phi = ScalarField::from_fn(range.ghost(), |i, _| 0.1 * i as f64 - 0.45);
//! let grad = compute_one_sided_derivatives(phi.as_slice(), &range, spacing)?;
//!
//! let inputs = ReinitInputs {
//!     phi: phi.as_slice(),
//!     phi0: phi.as_slice(),
//!     grad_phi: grad.components(),
//! };
//! let mut rhs = vec![0.0; range.ghost().cell_count()];
//! compute_reinitialization_rhs(&mut rhs, &inputs, &range, SignPolicy::Phi0)?;
//! # Ok::<(), qss_reinit_core::GridError>(())
//! ```

pub mod error;
pub mod grid;
pub mod reinit;

pub use error::GridError;
pub use grid::{
    compute_one_sided_derivatives, Field, FieldMut, GradientComponents, GridRange, GridSpacing,
    IndexBox, OneSidedDerivatives, ScalarField,
};
pub use reinit::{
    compute_orthogonalization_rhs, compute_reinitialization_rhs,
    compute_reinitialization_rhs_subcell_fix, compute_subcell_distance, upwind_gradient_norm,
    GradientPair, OrthogonalizationInputs, ReinitInputs, SignPolicy, FAR_FROM_INTERFACE,
};

#[cfg(test)]
#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
