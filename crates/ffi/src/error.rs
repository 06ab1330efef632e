use qss_reinit_core::GridError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for FFI error types.
///
/// This trait provides a unified way to handle errors across the FFI boundary,
/// allowing both simple error codes and custom error messages.
///
/// # Design
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait QssError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> QssErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `QssError` for the kernel entry points.
///
/// Wraps a `QssErrorCode` with a message describing which argument was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultQssError {
    code: QssErrorCode,
    msg: String,
}

impl DefaultQssError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"phi"`, `"reinit_rhs"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: QssErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for a rejected grid layout, naming the argument it came from.
    ///
    /// # Arguments
    /// * `param_name` - The argument whose box or buffer was rejected (e.g., `"ghost_box"`)
    /// * `error` - The layout error reported by the core crate
    pub fn grid(param_name: &str, error: &GridError) -> Self {
        let code = match error {
            GridError::EmptyBox { .. }
            | GridError::BoxTooLarge { .. }
            | GridError::FillOutsideGhost { .. }
            | GridError::InsufficientHalo { .. } => QssErrorCode::InvalidBox,
            GridError::BufferTooSmall { .. } => QssErrorCode::BufferTooSmall,
            GridError::InvalidSpacing { .. } => QssErrorCode::InvalidSpacing,
        };
        Self {
            code,
            msg: format!("{param_name}: {error}"),
        }
    }
}

impl QssError for DefaultQssError {
    fn code(&self) -> QssErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by the kernel entry points.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QssErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Invalid index box: inverted bounds, more points than one buffer can
    /// hold, a fill box outside a ghost box, or a ghost box without the halo
    /// the stencil reads.
    InvalidBox = 2,

    /// Invalid grid spacing: dx and dy must be finite and positive.
    InvalidSpacing = 3,

    /// Buffer shorter than the ghost box it is declared over.
    BufferTooSmall = 4,
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The CString is stored to prevent memory leaks when returning raw pointers via FFI.
    static LAST_ERROR: RefCell<(Option<CString>, QssErrorCode)> = const { RefCell::new((None, QssErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, QssErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, QssErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if the last call on this thread failed.
/// - `null` if the last call succeeded or the message cannot be converted to a C string.
///
/// # Thread Safety
/// Error messages are stored per-thread (thread-local storage), so this is thread-safe.
///
/// # Lifetime
/// The returned pointer is valid until the next kernel call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```c
/// QssErrorCode err = qss2d_compute_distance_for_subcell_fix(d0, phi0, gb, fb, dx, dy);
/// if (err != Ok) {
///     const char* error = qss_get_last_error();
///     if (error) {
///         fprintf(stderr, "subcell distance failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn qss_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns:
/// - `QssErrorCode::Ok` (0) if the last call on this thread succeeded
/// - The specific error code from the last failed call
#[no_mangle]
pub extern "C" fn qss_get_last_error_code() -> QssErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
