use crate::error::{with_last_error_mut, DefaultQssError, QssError, QssErrorCode};
use qss_reinit_core::{GridSpacing, IndexBox};
use std::ffi::CString;
use std::slice;
use tracing::debug;

/// Set the thread-local error message and code.
/// Internal helper for FFI functions to record failure details.
/// Accepts any type implementing `QssError` trait.
pub(crate) fn set_last_error(error: &impl QssError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl QssError) -> QssErrorCode {
    debug!(code = ?error.code(), msg = error.msg(), "kernel call rejected");
    set_last_error(error);
    error.code()
}

/// Clear the thread-local error message and code.
/// Internal helper called on successful operations.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = QssErrorCode::Ok;
    });
}

/// Run a kernel call and turn its outcome into the code returned across the boundary.
///
/// Clears the stored error on success and records it on failure.
pub(crate) fn handle_ffi_result<F>(call: F) -> QssErrorCode
where
    F: FnOnce() -> Result<(), DefaultQssError>,
{
    match call() {
        Ok(()) => {
            clear_last_error();
            QssErrorCode::Ok
        }
        Err(error) => track_error(&error),
    }
}

/// Inclusive 2D index box as passed from C.
///
/// Mirrors the `ilo, ihi, jlo, jhi` argument quadruples of the Fortran-era
/// interface.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QssBox2d {
    pub ilo: i32,
    pub ihi: i32,
    pub jlo: i32,
    pub jhi: i32,
}

impl QssBox2d {
    pub(crate) fn to_index_box(self, param_name: &str) -> Result<IndexBox, DefaultQssError> {
        IndexBox::new(
            i64::from(self.ilo),
            i64::from(self.ihi),
            i64::from(self.jlo),
            i64::from(self.jhi),
        )
        .map_err(|e| DefaultQssError::grid(param_name, &e))
    }
}

impl From<IndexBox> for QssBox2d {
    fn from(b: IndexBox) -> Self {
        Self {
            ilo: b.lo()[0] as i32,
            ihi: b.hi()[0] as i32,
            jlo: b.lo()[1] as i32,
            jhi: b.hi()[1] as i32,
        }
    }
}

pub(crate) fn spacing(dx: f64, dy: f64) -> Result<GridSpacing, DefaultQssError> {
    GridSpacing::new(dx, dy).map_err(|e| DefaultQssError::grid("dx/dy", &e))
}

/// Borrow a C buffer covering `ghost` as a slice.
///
/// # Safety
/// If non-null, `ptr` must point to at least `ghost.cell_count()` initialized
/// `f64` values that stay valid and unmodified for `'a`.
pub(crate) unsafe fn input<'a>(
    ptr: *const f64,
    ghost: &IndexBox,
    param_name: &str,
) -> Result<&'a [f64], DefaultQssError> {
    if ptr.is_null() {
        return Err(DefaultQssError::null_pointer(param_name));
    }
    Ok(slice::from_raw_parts(ptr, ghost.cell_count()))
}

/// Borrow a C output buffer covering `ghost` as a mutable slice.
///
/// # Safety
/// If non-null, `ptr` must point to at least `ghost.cell_count()` `f64` values
/// that no other slice aliases for `'a`.
pub(crate) unsafe fn output<'a>(
    ptr: *mut f64,
    ghost: &IndexBox,
    param_name: &str,
) -> Result<&'a mut [f64], DefaultQssError> {
    if ptr.is_null() {
        return Err(DefaultQssError::null_pointer(param_name));
    }
    Ok(slice::from_raw_parts_mut(ptr, ghost.cell_count()))
}
