//! C entry points for the 2D reinitialization kernels
//!
//! Every buffer is an x-fastest array covering the ghost box passed next to
//! it. Only the fill box of the output is written; on a non-`Ok` return the
//! output is left untouched.

use crate::error::{DefaultQssError, QssErrorCode};
use crate::helpers::{handle_ffi_result, input, output, spacing, QssBox2d};
use qss_reinit_core::{
    compute_orthogonalization_rhs, compute_reinitialization_rhs,
    compute_reinitialization_rhs_subcell_fix, compute_subcell_distance, Field, FieldMut,
    GradientComponents, GradientPair, GridRange, OrthogonalizationInputs, ReinitInputs, SignPolicy,
};

fn grid_range(ghost_box: QssBox2d, fill_box: QssBox2d) -> Result<GridRange, DefaultQssError> {
    let ghost = ghost_box.to_index_box("ghost_box")?;
    let fill = fill_box.to_index_box("fill_box")?;
    GridRange::new(ghost, fill).map_err(|e| DefaultQssError::grid("fill_box", &e))
}

/// # Safety
/// As for [`input`], with both pointers over `ghost_box`.
unsafe fn gradient_pair<'a>(
    x: *const f64,
    y: *const f64,
    ghost_box: QssBox2d,
    names: [&str; 3],
) -> Result<GradientPair<'a>, DefaultQssError> {
    let ghost = ghost_box.to_index_box(names[2])?;
    GradientPair::new(input(x, &ghost, names[0])?, input(y, &ghost, names[1])?, ghost)
        .map_err(|e| DefaultQssError::grid(names[2], &e))
}

/// Computes the right-hand side of the reinitialization equation
/// `φ_τ + sgn(φ)(|∇φ| - 1) = 0` with Godunov upwinding.
///
/// # Arguments
/// * `reinit_rhs` - Output over `ghost_box`; only `fill_box` is written
/// * `phi` - Level set at the current pseudo-time iterate
/// * `phi0` - Level set at the start of reinitialization
/// * `phi_x_plus`, `phi_y_plus` - Forward differences of `phi`
/// * `phi_x_minus`, `phi_y_minus` - Backward differences of `phi`
/// * `ghost_box` - Index range shared by every buffer
/// * `fill_box` - Index range to compute, contained in `ghost_box`
/// * `dx`, `dy` - Grid spacing; the differences are already divided by it
/// * `use_phi0_for_sgn` - 1 takes the sign from `phi0`, anything else from `phi`
///
/// # Returns
/// `QssErrorCode::Ok` on success. See `qss_get_last_error()` otherwise.
///
/// # Safety
/// Every pointer must be null or point to `(ihi-ilo+1)*(jhi-jlo+1)` values of
/// `ghost_box`. `reinit_rhs` must not overlap any input.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn qss2d_compute_reinitialization_eqn_rhs(
    reinit_rhs: *mut f64,
    phi: *const f64,
    phi0: *const f64,
    phi_x_plus: *const f64,
    phi_y_plus: *const f64,
    phi_x_minus: *const f64,
    phi_y_minus: *const f64,
    ghost_box: QssBox2d,
    fill_box: QssBox2d,
    dx: f64,
    dy: f64,
    use_phi0_for_sgn: i32,
) -> QssErrorCode {
    handle_ffi_result(|| {
        let range = grid_range(ghost_box, fill_box)?;
        spacing(dx, dy)?;
        let ghost = range.ghost();
        let inputs = ReinitInputs {
            phi: input(phi, &ghost, "phi")?,
            phi0: input(phi0, &ghost, "phi0")?,
            grad_phi: GradientComponents {
                x_plus: input(phi_x_plus, &ghost, "phi_x_plus")?,
                x_minus: input(phi_x_minus, &ghost, "phi_x_minus")?,
                y_plus: input(phi_y_plus, &ghost, "phi_y_plus")?,
                y_minus: input(phi_y_minus, &ghost, "phi_y_minus")?,
            },
        };
        let rhs = output(reinit_rhs, &ghost, "reinit_rhs")?;
        compute_reinitialization_rhs(rhs, &inputs, &range, SignPolicy::from_flag(use_phi0_for_sgn))
            .map_err(|e| DefaultQssError::grid("reinit_rhs", &e))
    })
}

/// Computes the right-hand side of the orthogonalization equation
/// `φ_τ + ∇φ · (sgn(ψ) ∇ψ / |∇ψ|) = 0`.
///
/// `∇φ` is upwinded along `sgn(ψ) ∇ψ`; `∇ψ` is the average of its forward
/// and backward differences. Where `|∇ψ|` vanishes the result is 0.
///
/// Each buffer group carries its own ghost box; `fill_box` must lie inside
/// all of them.
///
/// # Returns
/// `QssErrorCode::Ok` on success. See `qss_get_last_error()` otherwise.
///
/// # Safety
/// Every pointer must be null or point to a full array over the ghost box
/// passed with it. `ortho_rhs` must not overlap any input.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn qss2d_compute_orthogonalization_eqn_rhs(
    ortho_rhs: *mut f64,
    rhs_ghost_box: QssBox2d,
    phi_x_plus: *const f64,
    phi_y_plus: *const f64,
    grad_phi_plus_ghost_box: QssBox2d,
    phi_x_minus: *const f64,
    phi_y_minus: *const f64,
    grad_phi_minus_ghost_box: QssBox2d,
    psi: *const f64,
    psi_ghost_box: QssBox2d,
    psi_x_plus: *const f64,
    psi_y_plus: *const f64,
    grad_psi_plus_ghost_box: QssBox2d,
    psi_x_minus: *const f64,
    psi_y_minus: *const f64,
    grad_psi_minus_ghost_box: QssBox2d,
    fill_box: QssBox2d,
    dx: f64,
    dy: f64,
) -> QssErrorCode {
    handle_ffi_result(|| {
        let fill = fill_box.to_index_box("fill_box")?;
        spacing(dx, dy)?;

        let psi_ghost = psi_ghost_box.to_index_box("psi_ghost_box")?;
        let inputs = OrthogonalizationInputs {
            psi: Field::new(input(psi, &psi_ghost, "psi")?, psi_ghost)
                .map_err(|e| DefaultQssError::grid("psi", &e))?,
            grad_phi_plus: gradient_pair(
                phi_x_plus,
                phi_y_plus,
                grad_phi_plus_ghost_box,
                ["phi_x_plus", "phi_y_plus", "grad_phi_plus_ghost_box"],
            )?,
            grad_phi_minus: gradient_pair(
                phi_x_minus,
                phi_y_minus,
                grad_phi_minus_ghost_box,
                ["phi_x_minus", "phi_y_minus", "grad_phi_minus_ghost_box"],
            )?,
            grad_psi_plus: gradient_pair(
                psi_x_plus,
                psi_y_plus,
                grad_psi_plus_ghost_box,
                ["psi_x_plus", "psi_y_plus", "grad_psi_plus_ghost_box"],
            )?,
            grad_psi_minus: gradient_pair(
                psi_x_minus,
                psi_y_minus,
                grad_psi_minus_ghost_box,
                ["psi_x_minus", "psi_y_minus", "grad_psi_minus_ghost_box"],
            )?,
        };

        let rhs_ghost = rhs_ghost_box.to_index_box("rhs_ghost_box")?;
        let mut rhs = FieldMut::new(output(ortho_rhs, &rhs_ghost, "ortho_rhs")?, rhs_ghost)
            .map_err(|e| DefaultQssError::grid("ortho_rhs", &e))?;
        compute_orthogonalization_rhs(&mut rhs, &inputs, fill)
            .map_err(|e| DefaultQssError::grid("fill_box", &e))
    })
}

/// Computes the Russo–Smereka distance estimate for the subcell fix.
///
/// Call once per reinitialization, on `phi0`. Points adjacent to the
/// interface receive a signed distance; every other fill-box point receives
/// `-1.0e20`.
///
/// # Returns
/// `QssErrorCode::Ok` on success. See `qss_get_last_error()` otherwise.
///
/// # Safety
/// `distance0` and `phi0` must be null or point to full arrays over
/// `ghost_box`, which needs one cell of padding around `fill_box`. They must
/// not overlap.
#[no_mangle]
pub unsafe extern "C" fn qss2d_compute_distance_for_subcell_fix(
    distance0: *mut f64,
    phi0: *const f64,
    ghost_box: QssBox2d,
    fill_box: QssBox2d,
    dx: f64,
    dy: f64,
) -> QssErrorCode {
    handle_ffi_result(|| {
        let range = grid_range(ghost_box, fill_box)?;
        let spacing = spacing(dx, dy)?;
        let ghost = range.ghost();
        let phi0 = input(phi0, &ghost, "phi0")?;
        let distance = output(distance0, &ghost, "distance0")?;
        compute_subcell_distance(distance, phi0, &range, spacing)
            .map_err(|e| DefaultQssError::grid("ghost_box", &e))
    })
}

/// Computes the reinitialization right-hand side with the first-order
/// Russo–Smereka subcell fix.
///
/// Away from the interface (where `distance0` holds `-1.0e20`) the result is
/// identical to `qss2d_compute_reinitialization_eqn_rhs`. Next to it the
/// value relaxes `|phi|` toward `|distance0|` without reading across the
/// interface.
///
/// # Returns
/// `QssErrorCode::Ok` on success. See `qss_get_last_error()` otherwise.
///
/// # Safety
/// Every pointer must be null or point to a full array over `ghost_box`.
/// `reinit_rhs` must not overlap any input.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn qss2d_compute_reinitialization_eqn_rhs_subcell_fix_order1(
    reinit_rhs: *mut f64,
    phi: *const f64,
    phi0: *const f64,
    distance0: *const f64,
    phi_x_plus: *const f64,
    phi_y_plus: *const f64,
    phi_x_minus: *const f64,
    phi_y_minus: *const f64,
    ghost_box: QssBox2d,
    fill_box: QssBox2d,
    dx: f64,
    dy: f64,
    use_phi0_for_sgn: i32,
) -> QssErrorCode {
    handle_ffi_result(|| {
        let range = grid_range(ghost_box, fill_box)?;
        let spacing = spacing(dx, dy)?;
        let ghost = range.ghost();
        let inputs = ReinitInputs {
            phi: input(phi, &ghost, "phi")?,
            phi0: input(phi0, &ghost, "phi0")?,
            grad_phi: GradientComponents {
                x_plus: input(phi_x_plus, &ghost, "phi_x_plus")?,
                x_minus: input(phi_x_minus, &ghost, "phi_x_minus")?,
                y_plus: input(phi_y_plus, &ghost, "phi_y_plus")?,
                y_minus: input(phi_y_minus, &ghost, "phi_y_minus")?,
            },
        };
        let distance = input(distance0, &ghost, "distance0")?;
        let rhs = output(reinit_rhs, &ghost, "reinit_rhs")?;
        compute_reinitialization_rhs_subcell_fix(
            rhs,
            &inputs,
            distance,
            &range,
            spacing,
            SignPolicy::from_flag(use_phi0_for_sgn),
        )
        .map_err(|e| DefaultQssError::grid("reinit_rhs", &e))
    })
}
