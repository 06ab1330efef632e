//! Reinitialization and orthogonalization right-hand sides
//!
//! All kernels are pure stencil sweeps over caller-owned buffers: they read the
//! ghost boxes, write the fill box of the output and keep no state between calls.
//! A reinitialization run looks like
//!
//! ```text
//! distance = compute_subcell_distance(φ0)          once
//! loop {
//!     derivatives of φ                             driver
//!     rhs = compute_reinitialization_rhs_subcell_fix(φ, φ0, distance, …)
//!     φ  += Δτ · rhs                               driver (e.g. TVD Runge–Kutta)
//! }
//! ```

mod godunov;
mod orthogonalization;
mod rhs;
mod sign;
mod subcell;

pub use godunov::upwind_gradient_norm;
pub use orthogonalization::{compute_orthogonalization_rhs, GradientPair, OrthogonalizationInputs};
pub use rhs::{compute_reinitialization_rhs, ReinitInputs};
pub use sign::{sgn, SignPolicy, SIGN_TOLERANCE};
pub use subcell::{
    compute_reinitialization_rhs_subcell_fix, compute_subcell_distance, is_near_interface,
    FAR_FROM_INTERFACE,
};

/// Gradient size treated as zero when a direction or slope is needed
///
/// Subcell slopes use it as an absolute floor. The orthogonalization direction
/// uses it relative to the largest one-sided difference of ψ, so a ψ with small
/// but resolved gradients still gets a direction.
pub const GRADIENT_TOLERANCE: f64 = 1.0e-13;
