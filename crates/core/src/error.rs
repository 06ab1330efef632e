//! Layout errors reported by the stencil kernels
//!
//! The kernels themselves never fail on field values (degenerate gradients are
//! handled analytically). What can go wrong is the caller's description of the
//! grid: boxes that are empty, fill boxes that leak out of a ghost box, buffers
//! shorter than the box they claim to cover, or a spacing that is not a length.

use crate::grid::IndexBox;

/// Errors that can occur while validating a kernel's grid layout
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// Box with `hi < lo` on at least one axis
    EmptyBox {
        /// Lower corner as given
        lo: [i64; 2],
        /// Upper corner as given
        hi: [i64; 2],
    },
    /// Box holds more points than a single buffer can address
    BoxTooLarge {
        /// Lower corner as given
        lo: [i64; 2],
        /// Upper corner as given
        hi: [i64; 2],
    },
    /// Fill box is not contained in the ghost box of one of the buffers
    FillOutsideGhost {
        /// Region the kernel was asked to write
        fill: IndexBox,
        /// Storage extent of the offending buffer
        ghost: IndexBox,
    },
    /// Buffer holds fewer samples than its ghost box covers
    BufferTooSmall {
        /// Samples required by the ghost box
        expected: usize,
        /// Samples actually supplied
        actual: usize,
    },
    /// Ghost box does not leave enough halo around the fill box for the stencil
    InsufficientHalo {
        /// Halo width the stencil reads
        required: i64,
        /// Narrowest halo found on any side
        available: i64,
    },
    /// Grid spacing is not a finite positive length
    InvalidSpacing {
        /// Spacing along x
        dx: f64,
        /// Spacing along y
        dy: f64,
    },
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::EmptyBox { lo, hi } => write!(
                f,
                "Empty index box: [{}, {}] x [{}, {}]",
                lo[0], hi[0], lo[1], hi[1]
            ),
            GridError::BoxTooLarge { lo, hi } => write!(
                f,
                "Index box [{}, {}] x [{}, {}] holds too many points for one buffer",
                lo[0], hi[0], lo[1], hi[1]
            ),
            GridError::FillOutsideGhost { fill, ghost } => {
                write!(f, "Fill box {fill} is not contained in ghost box {ghost}")
            }
            GridError::BufferTooSmall { expected, actual } => write!(
                f,
                "Buffer too small for ghost box: expected {expected} samples, got {actual}"
            ),
            GridError::InsufficientHalo {
                required,
                available,
            } => write!(
                f,
                "Stencil needs a halo of {required} cell(s), ghost box leaves {available}"
            ),
            GridError::InvalidSpacing { dx, dy } => write!(
                f,
                "Grid spacing must be finite and positive, got dx = {dx}, dy = {dy}"
            ),
        }
    }
}

impl std::error::Error for GridError {}
