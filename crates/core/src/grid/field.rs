//! Scalar field storage and borrowed views
//!
//! Kernels work on caller-owned buffers. A [`Field`] pairs a read-only slice with
//! the ghost box it covers, a [`FieldMut`] does the same for an output, and
//! [`ScalarField`] is an owned buffer for drivers and tests.

use super::IndexBox;
use crate::error::GridError;
use rayon::prelude::*;

fn check_len(len: usize, ghost: &IndexBox) -> Result<(), GridError> {
    ghost.validate()?;
    let expected = ghost.cell_count();
    if len < expected {
        return Err(GridError::BufferTooSmall {
            expected,
            actual: len,
        });
    }
    Ok(())
}

fn check_covers(ghost: &IndexBox, fill: &IndexBox) -> Result<(), GridError> {
    if ghost.contains_box(fill) {
        Ok(())
    } else {
        Err(GridError::FillOutsideGhost {
            fill: *fill,
            ghost: *ghost,
        })
    }
}

/// Evaluate `stencil(i, j)` at every fill-box point and store it in `out`
///
/// Rows of the fill box are processed in parallel. Samples of `out` outside the
/// fill box are never written.
pub(crate) fn sweep_fill_box<F>(out: &mut [f64], out_box: &IndexBox, fill: &IndexBox, stencil: F)
where
    F: Fn(i64, i64) -> f64 + Sync,
{
    let first_row = (fill.lo()[1] - out_box.lo()[1]) as usize;
    let first_col = (fill.lo()[0] - out_box.lo()[0]) as usize;
    let [cols, rows] = fill.shape();

    out[..out_box.cell_count()]
        .par_chunks_mut(out_box.stride())
        .skip(first_row)
        .take(rows)
        .enumerate()
        .for_each(|(row, samples)| {
            let j = fill.lo()[1] + row as i64;
            for (col, value) in samples[first_col..first_col + cols]
                .iter_mut()
                .enumerate()
            {
                *value = stencil(fill.lo()[0] + col as i64, j);
            }
        });
}

/// Read-only scalar field over a ghost box
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    data: &'a [f64],
    ghost: IndexBox,
}

impl<'a> Field<'a> {
    /// Wrap a buffer that stores `ghost` in x-fastest order
    ///
    /// # Errors
    ///
    /// - [`GridError::EmptyBox`] if `ghost` is inverted
    /// - [`GridError::BufferTooSmall`] if `data` is shorter than the box
    pub fn new(data: &'a [f64], ghost: IndexBox) -> Result<Self, GridError> {
        check_len(data.len(), &ghost)?;
        Ok(Self { data, ghost })
    }

    /// Sample at `(i, j)`
    #[inline(always)]
    pub fn at(&self, i: i64, j: i64) -> f64 {
        self.data[self.ghost.offset(i, j)]
    }

    pub fn ghost(&self) -> IndexBox {
        self.ghost
    }

    pub fn as_slice(&self) -> &'a [f64] {
        self.data
    }

    /// Fail unless the ghost box covers `fill`
    ///
    /// # Errors
    ///
    /// Returns [`GridError::FillOutsideGhost`].
    pub fn require_covers(&self, fill: &IndexBox) -> Result<(), GridError> {
        check_covers(&self.ghost, fill)
    }
}

/// Writable scalar field over a ghost box
#[derive(Debug)]
pub struct FieldMut<'a> {
    data: &'a mut [f64],
    ghost: IndexBox,
}

impl<'a> FieldMut<'a> {
    /// Wrap an output buffer that stores `ghost` in x-fastest order
    ///
    /// # Errors
    ///
    /// - [`GridError::EmptyBox`] if `ghost` is inverted
    /// - [`GridError::BufferTooSmall`] if `data` is shorter than the box
    pub fn new(data: &'a mut [f64], ghost: IndexBox) -> Result<Self, GridError> {
        check_len(data.len(), &ghost)?;
        Ok(Self { data, ghost })
    }

    pub fn ghost(&self) -> IndexBox {
        self.ghost
    }

    /// Fail unless the ghost box covers `fill`
    ///
    /// # Errors
    ///
    /// Returns [`GridError::FillOutsideGhost`].
    pub fn require_covers(&self, fill: &IndexBox) -> Result<(), GridError> {
        check_covers(&self.ghost, fill)
    }

    pub(crate) fn sweep<F>(&mut self, fill: &IndexBox, stencil: F)
    where
        F: Fn(i64, i64) -> f64 + Sync,
    {
        sweep_fill_box(self.data, &self.ghost, fill, stencil);
    }
}

/// Owned scalar field over a ghost box
///
/// Stores samples in x-fastest order (`(i - ilo) + (j - jlo) * nx`).
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    data: Vec<f64>,
    ghost: IndexBox,
}

impl ScalarField {
    /// Field over `ghost`, initialized to zero
    pub fn new(ghost: IndexBox) -> Self {
        Self::with_value(ghost, 0.0)
    }

    /// Field over `ghost`, initialized to `value`
    pub fn with_value(ghost: IndexBox, value: f64) -> Self {
        Self {
            data: vec![value; ghost.cell_count()],
            ghost,
        }
    }

    /// Field sampled from `f(i, j)` at every ghost-box point
    pub fn from_fn<F>(ghost: IndexBox, f: F) -> Self
    where
        F: Fn(i64, i64) -> f64,
    {
        let [nx, ny] = ghost.shape();
        let [ilo, jlo] = ghost.lo();
        let data = (0..ny as i64)
            .flat_map(|dj| (0..nx as i64).map(move |di| (ilo + di, jlo + dj)))
            .map(|(i, j)| f(i, j))
            .collect();
        Self { data, ghost }
    }

    pub fn ghost(&self) -> IndexBox {
        self.ghost
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Value at `(i, j)`
    ///
    /// # Panics
    ///
    /// Panics if `(i, j)` is outside the ghost box
    pub fn get(&self, i: i64, j: i64) -> f64 {
        assert!(self.ghost.contains(i, j), "Index out of ghost box");
        self.data[self.ghost.offset(i, j)]
    }

    /// Set value at `(i, j)`
    ///
    /// # Panics
    ///
    /// Panics if `(i, j)` is outside the ghost box
    pub fn set(&mut self, i: i64, j: i64, value: f64) {
        assert!(self.ghost.contains(i, j), "Index out of ghost box");
        let offset = self.ghost.offset(i, j);
        self.data[offset] = value;
    }

    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Borrow as a kernel input
    pub fn view(&self) -> Field<'_> {
        Field {
            data: &self.data,
            ghost: self.ghost,
        }
    }

    /// Borrow as a kernel output
    pub fn view_mut(&mut self) -> FieldMut<'_> {
        FieldMut {
            data: &mut self.data,
            ghost: self.ghost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ghost() -> IndexBox {
        IndexBox::new(-1, 3, -1, 2).unwrap()
    }

    #[test]
    fn test_field_creation() {
        let field = ScalarField::new(ghost());
        assert_eq!(field.as_slice().len(), 20);
        assert!(field.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_from_fn_is_x_fastest() {
        let field = ScalarField::from_fn(ghost(), |i, j| (10 * j + i) as f64);
        assert_eq!(field.as_slice()[0], -11.0);
        assert_eq!(field.as_slice()[1], -10.0);
        assert_eq!(field.as_slice()[5], -1.0);
        assert_eq!(field.get(3, 2), 23.0);
    }

    #[test]
    fn test_field_get_set() {
        let mut field = ScalarField::new(ghost());
        field.set(2, 1, 123.45);
        assert_eq!(field.get(2, 1), 123.45);
        assert_eq!(field.as_slice()[3 + 2 * 5], 123.45);
    }

    #[test]
    #[should_panic(expected = "Index out of ghost box")]
    fn test_field_bounds_check() {
        let field = ScalarField::new(ghost());
        let _ = field.get(4, 0);
    }

    #[test]
    fn test_view_rejects_short_buffer() {
        let data = vec![0.0; 19];
        assert_eq!(
            Field::new(&data, ghost()).unwrap_err(),
            GridError::BufferTooSmall {
                expected: 20,
                actual: 19
            }
        );
    }

    #[test]
    fn test_sweep_leaves_ghost_cells_alone() {
        let mut field = ScalarField::with_value(ghost(), -7.0);
        let fill = IndexBox::new(0, 2, 0, 1).unwrap();
        field.view_mut().sweep(&fill, |i, j| (i + j) as f64);

        for j in -1..=2 {
            for i in -1..=3 {
                let expected = if fill.contains(i, j) {
                    (i + j) as f64
                } else {
                    -7.0
                };
                assert_eq!(field.get(i, j), expected, "at ({i}, {j})");
            }
        }
    }
}
