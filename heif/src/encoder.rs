use crate::error::{Error, Result, check};
use crate::handle::SharedHandle;
use crate::sys;
use core::ffi::c_int;
use std::ffi::CStr;

/// Codec an encoder or decoder plugin implements.
pub type CompressionFormat = sys::heif_compression_format;

/// Whether a decoder plugin for `format` is loaded.
pub fn decoder_available(format: CompressionFormat) -> bool {
    unsafe { sys::heif_have_decoder_for_format(format) != 0 }
}

/// Whether an encoder plugin for `format` is loaded. Plugin-less installs
/// can read containers but not produce them; probe before encoding.
pub fn encoder_available(format: CompressionFormat) -> bool {
    unsafe { sys::heif_have_encoder_for_format(format) != 0 }
}

/// One configured encoder plugin instance, obtained from
/// [`crate::Context::encoder_for_format`] and consumed by
/// [`crate::Context::encode_image`].
#[derive(Clone)]
pub struct Encoder {
    handle: SharedHandle<sys::heif_encoder>,
}

impl Encoder {
    pub(crate) fn from_owned_ptr(raw: *mut sys::heif_encoder) -> Result<Self> {
        // SAFETY: `raw` comes from a native call that reported success and
        // transferred ownership to us.
        let handle = unsafe { SharedHandle::acquire(raw, sys::heif_encoder_release) }
            .ok_or_else(|| Error::alloc("native call returned a null encoder"))?;
        Ok(Self { handle })
    }

    /// Descriptive plugin name, e.g. `x265 HEVC encoder`.
    pub fn name(&self) -> String {
        let ptr = unsafe { sys::heif_encoder_get_name(self.handle.as_ptr()) };
        if ptr.is_null() {
            return String::new();
        }
        // SAFETY: plugin names are static null-terminated strings.
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
    }

    /// Set lossy quality in `0..=100`.
    pub fn set_lossy_quality(&mut self, quality: u8) -> Result<()> {
        let err = unsafe {
            sys::heif_encoder_set_lossy_quality(self.handle.as_ptr(), quality as c_int)
        };
        check(err)
    }

    pub fn set_lossless(&mut self, enable: bool) -> Result<()> {
        let err =
            unsafe { sys::heif_encoder_set_lossless(self.handle.as_ptr(), enable as c_int) };
        check(err)
    }

    pub(crate) fn as_ptr(&self) -> *mut sys::heif_encoder {
        self.handle.as_ptr()
    }
}
