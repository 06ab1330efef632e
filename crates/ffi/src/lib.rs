//! C ABI for the QSS reinitialization kernels
//!
//! Thin wrappers over `qss_reinit_core` for Fortran/C drivers. Each entry point
//! takes raw buffers plus inclusive index boxes, returns a [`QssErrorCode`]
//! and records a message for [`qss_get_last_error`] on failure.
//!
//! The header `QssReinitFFI.h` is generated at the workspace root by
//! `build.rs`.

mod error;
mod helpers;
mod kernels;

pub use error::{qss_get_last_error, qss_get_last_error_code, QssErrorCode};
pub use helpers::QssBox2d;
pub use kernels::{
    qss2d_compute_distance_for_subcell_fix, qss2d_compute_orthogonalization_eqn_rhs,
    qss2d_compute_reinitialization_eqn_rhs,
    qss2d_compute_reinitialization_eqn_rhs_subcell_fix_order1,
};
