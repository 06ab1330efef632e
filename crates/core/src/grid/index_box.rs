//! Inclusive index boxes and the ghost-box / fill-box pairing
//!
//! Every buffer handed to a kernel covers a *ghost box*: its full storage extent,
//! halo included. A kernel call updates only the *fill box*, which must sit inside
//! each ghost box it touches. Storage is x-fastest:
//!
//! ```text
//! offset(i, j) = (i - ilo) + (j - jlo) * nx
//! ```

use crate::error::GridError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest number of points a box may hold: the `f64` count of the largest
/// possible allocation
pub const MAX_CELLS: usize = isize::MAX as usize / std::mem::size_of::<f64>();

/// Inclusive 2D index range `[ilo, ihi] × [jlo, jhi]`
///
/// Indices are signed so that boxes may start below zero, as they do when a
/// halo is grown around a fill box anchored at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexBox {
    lo: [i64; 2],
    hi: [i64; 2],
}

impl IndexBox {
    /// Create a box from inclusive bounds
    ///
    /// # Errors
    ///
    /// Returns [`GridError::EmptyBox`] if `ihi < ilo` or `jhi < jlo`.
    pub fn new(ilo: i64, ihi: i64, jlo: i64, jhi: i64) -> Result<Self, GridError> {
        let boxed = Self {
            lo: [ilo, jlo],
            hi: [ihi, jhi],
        };
        boxed.validate()?;
        Ok(boxed)
    }

    /// Box `[0, nx - 1] × [0, ny - 1]`
    ///
    /// # Errors
    ///
    /// Returns [`GridError::EmptyBox`] if either extent is zero.
    pub fn from_extent(nx: usize, ny: usize) -> Result<Self, GridError> {
        Self::new(0, nx as i64 - 1, 0, ny as i64 - 1)
    }

    /// Check `lo <= hi` on both axes and that the box fits in one `f64` slice
    ///
    /// Boxes built through [`IndexBox::new`] always pass; deserialized boxes are
    /// re-checked by every kernel through this method.
    ///
    /// # Errors
    ///
    /// - [`GridError::EmptyBox`] for an inverted box
    /// - [`GridError::BoxTooLarge`] if the point count overflows or exceeds
    ///   [`MAX_CELLS`]
    pub fn validate(&self) -> Result<(), GridError> {
        if self.hi[0] < self.lo[0] || self.hi[1] < self.lo[1] {
            return Err(GridError::EmptyBox {
                lo: self.lo,
                hi: self.hi,
            });
        }
        if self.checked_cell_count().is_none() {
            return Err(GridError::BoxTooLarge {
                lo: self.lo,
                hi: self.hi,
            });
        }
        Ok(())
    }

    fn checked_cell_count(&self) -> Option<usize> {
        let extent = |axis: usize| {
            let n = self.hi[axis].checked_sub(self.lo[axis])?.checked_add(1)?;
            usize::try_from(n).ok()
        };
        extent(0)?
            .checked_mul(extent(1)?)
            .filter(|&count| count <= MAX_CELLS)
    }

    /// Lower corner `[ilo, jlo]`
    #[inline]
    pub fn lo(&self) -> [i64; 2] {
        self.lo
    }

    /// Upper corner `[ihi, jhi]`
    #[inline]
    pub fn hi(&self) -> [i64; 2] {
        self.hi
    }

    /// Number of points along each axis
    #[inline]
    pub fn shape(&self) -> [usize; 2] {
        [
            (self.hi[0] - self.lo[0] + 1) as usize,
            (self.hi[1] - self.lo[1] + 1) as usize,
        ]
    }

    /// Total number of points in the box
    ///
    /// Only meaningful for boxes that pass [`IndexBox::validate`].
    #[inline]
    pub fn cell_count(&self) -> usize {
        let [nx, ny] = self.shape();
        nx * ny
    }

    /// Distance in storage between two consecutive rows (`nx`)
    #[inline]
    pub fn stride(&self) -> usize {
        self.shape()[0]
    }

    /// Whether `(i, j)` lies inside the box
    #[inline]
    pub fn contains(&self, i: i64, j: i64) -> bool {
        (self.lo[0]..=self.hi[0]).contains(&i) && (self.lo[1]..=self.hi[1]).contains(&j)
    }

    /// Whether `other` lies entirely inside this box
    #[inline]
    pub fn contains_box(&self, other: &IndexBox) -> bool {
        self.contains(other.lo[0], other.lo[1]) && self.contains(other.hi[0], other.hi[1])
    }

    /// Storage offset of `(i, j)`
    ///
    /// Callers must only pass points inside the box.
    #[inline(always)]
    pub fn offset(&self, i: i64, j: i64) -> usize {
        debug_assert!(self.contains(i, j), "({i}, {j}) outside {self}");
        (i - self.lo[0]) as usize + (j - self.lo[1]) as usize * self.stride()
    }

    /// Box enlarged by `halo` cells on every side
    pub fn grow(&self, halo: i64) -> Self {
        Self {
            lo: [self.lo[0] - halo, self.lo[1] - halo],
            hi: [self.hi[0] + halo, self.hi[1] + halo],
        }
    }
}

impl fmt::Display for IndexBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}] x [{}, {}]",
            self.lo[0], self.hi[0], self.lo[1], self.hi[1]
        )
    }
}

/// Ghost box plus the fill box a kernel call writes
///
/// Constructed once per call and shared by every buffer that uses the same
/// storage extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridRange {
    ghost: IndexBox,
    fill: IndexBox,
}

impl GridRange {
    /// Pair a ghost box with a fill box
    ///
    /// # Errors
    ///
    /// - [`GridError::EmptyBox`] if either box is inverted
    /// - [`GridError::FillOutsideGhost`] if `fill` leaks out of `ghost`
    pub fn new(ghost: IndexBox, fill: IndexBox) -> Result<Self, GridError> {
        let range = Self { ghost, fill };
        range.validate()?;
        Ok(range)
    }

    /// Fill box surrounded by a uniform halo of `halo` cells
    ///
    /// # Errors
    ///
    /// Returns [`GridError::EmptyBox`] if `fill` is inverted.
    pub fn with_halo(fill: IndexBox, halo: usize) -> Result<Self, GridError> {
        Self::new(fill.grow(halo as i64), fill)
    }

    /// Re-check both boxes and their containment
    ///
    /// # Errors
    ///
    /// Same as [`GridRange::new`].
    pub fn validate(&self) -> Result<(), GridError> {
        self.ghost.validate()?;
        self.fill.validate()?;
        if !self.ghost.contains_box(&self.fill) {
            return Err(GridError::FillOutsideGhost {
                fill: self.fill,
                ghost: self.ghost,
            });
        }
        Ok(())
    }

    /// Storage extent including halo
    #[inline]
    pub fn ghost(&self) -> IndexBox {
        self.ghost
    }

    /// Region written by a kernel
    #[inline]
    pub fn fill(&self) -> IndexBox {
        self.fill
    }

    /// Narrowest halo between the fill box and the ghost box on any side
    pub fn min_halo(&self) -> i64 {
        (0..2)
            .flat_map(|axis| {
                [
                    self.fill.lo[axis] - self.ghost.lo[axis],
                    self.ghost.hi[axis] - self.fill.hi[axis],
                ]
            })
            .min()
            .unwrap_or(0)
    }

    /// Fail unless every side leaves at least `required` halo cells
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InsufficientHalo`] with the narrowest halo found.
    pub fn require_halo(&self, required: i64) -> Result<(), GridError> {
        let available = self.min_halo();
        if available < required {
            return Err(GridError::InsufficientHalo {
                required,
                available,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_and_offsets() {
        let ghost = IndexBox::new(-1, 5, -1, 5).unwrap();
        assert_eq!(ghost.shape(), [7, 7]);
        assert_eq!(ghost.cell_count(), 49);
        assert_eq!(ghost.offset(-1, -1), 0);
        assert_eq!(ghost.offset(0, -1), 1);
        assert_eq!(ghost.offset(-1, 0), 7);
        assert_eq!(ghost.offset(5, 5), 48);
    }

    #[test]
    fn test_inverted_box_rejected() {
        let err = IndexBox::new(3, 2, 0, 4).unwrap_err();
        assert_eq!(
            err,
            GridError::EmptyBox {
                lo: [3, 0],
                hi: [2, 4]
            }
        );
        assert!(IndexBox::from_extent(0, 4).is_err());
    }

    #[test]
    fn test_oversized_box_rejected() {
        let (lo, hi) = (i64::from(i32::MIN), i64::from(i32::MAX));
        assert_eq!(
            IndexBox::new(lo, hi, lo, hi),
            Err(GridError::BoxTooLarge {
                lo: [lo, lo],
                hi: [hi, hi]
            })
        );
        // extent itself overflows i64
        assert!(matches!(
            IndexBox::new(i64::MIN, i64::MAX, 0, 0),
            Err(GridError::BoxTooLarge { .. })
        ));
        // a long thin box is fine
        let thin = IndexBox::new(lo, hi, 0, 0).unwrap();
        assert_eq!(thin.cell_count() as u64, 1_u64 << 32);
    }

    #[test]
    fn test_fill_must_sit_inside_ghost() {
        let ghost = IndexBox::new(0, 6, 0, 6).unwrap();
        let fill = IndexBox::new(1, 7, 1, 5).unwrap();
        assert!(matches!(
            GridRange::new(ghost, fill),
            Err(GridError::FillOutsideGhost { .. })
        ));
    }

    #[test]
    fn test_halo_accounting() {
        let fill = IndexBox::new(1, 5, 1, 5).unwrap();
        let range = GridRange::with_halo(fill, 1).unwrap();
        assert_eq!(range.ghost(), IndexBox::new(0, 6, 0, 6).unwrap());
        assert_eq!(range.min_halo(), 1);
        assert!(range.require_halo(1).is_ok());

        let flush = GridRange::new(IndexBox::new(1, 6, 0, 6).unwrap(), fill).unwrap();
        assert_eq!(flush.min_halo(), 0);
        assert_eq!(
            flush.require_halo(1),
            Err(GridError::InsufficientHalo {
                required: 1,
                available: 0
            })
        );
    }
}
