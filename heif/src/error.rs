use crate::sys;
use std::error::Error as StdError;
use std::ffi::CStr;
use std::fmt;

/// Error code categories reported by libheif.
pub type ErrorCode = sys::heif_error_code;
/// Finer-grained cause within an [`ErrorCode`] category.
pub type SubErrorCode = sys::heif_suberror_code;

/// Error produced by the safe wrappers around libheif.
///
/// Every native call that returns a `heif_error` status struct is converted
/// through [`check`] at the call site; the message is copied into an owned
/// string so it outlives the native call.
#[derive(Debug, Clone)]
pub struct Error {
    /// Error category reported by libheif.
    pub code: ErrorCode,
    /// Finer-grained cause within the category.
    pub subcode: SubErrorCode,
    /// Human-readable detail string, owned copy of the library's message.
    pub message: String,
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn alloc(msg: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::heif_error_Memory_allocation_error,
            subcode: SubErrorCode::heif_suberror_Unspecified,
            message: msg.into(),
        }
    }

    pub(crate) fn usage(msg: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::heif_error_Usage_error,
            subcode: SubErrorCode::heif_suberror_Unspecified,
            message: msg.into(),
        }
    }

    /// True when this value describes the Ok outcome. A stored `Error`
    /// normally never is, but values round-tripped from a status struct can
    /// carry the Ok code.
    pub fn is_ok(&self) -> bool {
        self.code == ErrorCode::heif_error_Ok
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "libheif error {}.{}", self.code.0, self.subcode.0)
        } else {
            write!(f, "libheif error {}.{}: {}", self.code.0, self.subcode.0, self.message)
        }
    }
}

impl StdError for Error {}

/// Convert a native status struct into `Result`, copying the message out of
/// library-owned storage.
pub(crate) fn check(err: sys::heif_error) -> Result<()> {
    if err.code == ErrorCode::heif_error_Ok {
        return Ok(());
    }
    let message = if err.message.is_null() {
        String::new()
    } else {
        // SAFETY: libheif error messages are null-terminated strings valid
        // at least until the next call on the same object.
        unsafe { CStr::from_ptr(err.message) }
            .to_string_lossy()
            .into_owned()
    };
    Err(Error {
        code: err.code,
        subcode: err.subcode,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_status_converts_to_ok() {
        let status = sys::heif_error {
            code: ErrorCode::heif_error_Ok,
            subcode: SubErrorCode::heif_suberror_Unspecified,
            message: c"Success".as_ptr(),
        };
        assert!(check(status).is_ok());
    }

    #[test]
    fn failure_status_copies_message() {
        let status = sys::heif_error {
            code: ErrorCode::heif_error_Invalid_input,
            subcode: SubErrorCode::heif_suberror_No_ftyp_box,
            message: c"No 'ftyp' box".as_ptr(),
        };
        let err = check(status).unwrap_err();
        assert_eq!(err.code, ErrorCode::heif_error_Invalid_input);
        assert_eq!(err.subcode, SubErrorCode::heif_suberror_No_ftyp_box);
        assert_eq!(err.message, "No 'ftyp' box");
        assert!(!err.is_ok());
    }

    #[test]
    fn codes_from_newer_libheif_are_preserved() {
        // The linked library may postdate the named constant set; check()
        // must carry unknown codes through unchanged instead of relying on
        // a closed value range.
        let status = sys::heif_error {
            code: sys::heif_error_code(11),
            subcode: sys::heif_suberror_code(6001),
            message: c"plugin is not loaded".as_ptr(),
        };
        let err = check(status).unwrap_err();
        assert_eq!(err.code, sys::heif_error_code(11));
        assert_eq!(err.subcode, sys::heif_suberror_code(6001));
        assert!(!err.is_ok());
    }

    #[test]
    fn null_message_is_tolerated() {
        let status = sys::heif_error {
            code: ErrorCode::heif_error_Usage_error,
            subcode: SubErrorCode::heif_suberror_Null_pointer_argument,
            message: std::ptr::null(),
        };
        let err = check(status).unwrap_err();
        assert!(err.message.is_empty());
        assert!(err.to_string().contains("5.2001"));
    }
}
