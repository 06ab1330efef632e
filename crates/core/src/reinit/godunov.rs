//! Godunov upwind selection of |∇φ|
//!
//! For the Hamiltonian sgn(s)|∇φ| the characteristics leave the zero level set,
//! so on each axis the scheme keeps only the one-sided difference whose
//! information travels away from the interface:
//!
//! - `s ≥ 0`: `max(max(D⁻, 0)², min(D⁺, 0)²)`
//! - `s < 0`: `max(min(D⁻, 0)², max(D⁺, 0)²)`
//!
//! summed over axes and square-rooted.

/// Godunov approximation of |∇φ| from per-axis one-sided derivatives
///
/// Works for any spatial dimension `D`; the 2D kernels call it with `D = 2`.
///
/// # Arguments
///
/// * `plus` - Forward differences, one per axis
/// * `minus` - Backward differences, one per axis
/// * `sign_reference` - Value whose sign selects the upwind direction (φ or φ0)
#[inline(always)]
pub fn upwind_gradient_norm<const D: usize>(
    plus: [f64; D],
    minus: [f64; D],
    sign_reference: f64,
) -> f64 {
    let squared: f64 = if sign_reference >= 0.0 {
        plus.iter()
            .zip(&minus)
            .map(|(&p, &m)| {
                let backward = m.max(0.0);
                let forward = p.min(0.0);
                (backward * backward).max(forward * forward)
            })
            .sum()
    } else {
        plus.iter()
            .zip(&minus)
            .map(|(&p, &m)| {
                let backward = m.min(0.0);
                let forward = p.max(0.0);
                (backward * backward).max(forward * forward)
            })
            .sum()
    };
    squared.sqrt()
}
