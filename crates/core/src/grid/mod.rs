//! Structured-grid layout: index boxes, spacing, field storage, derivatives

pub mod derivatives;
pub mod field;
pub mod index_box;
pub mod spacing;

pub use derivatives::{compute_one_sided_derivatives, GradientComponents, OneSidedDerivatives};
pub(crate) use derivatives::GradientFields;
pub use field::{Field, FieldMut, ScalarField};
pub use index_box::{GridRange, IndexBox, MAX_CELLS};
pub use spacing::GridSpacing;
