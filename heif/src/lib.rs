//! Safe Rust bindings for [`libheif`](https://github.com/strukturag/libheif),
//! the reference implementation of the HEIF/AVIF container formats.
//!
//! The crate exposes a small API that mirrors the C library while handling
//! handle lifetimes and status-struct checking for you:
//! - [`Context`] parses containers from files or bytes, enumerates stored
//!   image items, and serializes containers to a file or to any [`Writer`].
//! - [`ImageHandle`] is one stored image item: metadata queries, thumbnail
//!   traversal, and decoding.
//! - [`Image`] is a decoded (or caller-built) pixel buffer with per-channel
//!   plane access, used for reading pixels and for encode workflows together
//!   with [`Encoder`].
//!
//! Every native handle is reference-counted and released exactly once when
//! its last clone drops; every native status struct becomes an [`Error`]
//! propagated through [`Result`]. The wrappers are deliberately `!Send`:
//! libheif makes no thread-safety promises for concurrent use of one handle.
//!
//! For a runnable walkthrough, see `examples/heif_info.rs`.

/// Low-level bindings to libheif. Most users should favor the safe wrappers
/// re-exported from this crate.
pub use heif_sys as sys;

mod context;
mod encoder;
mod error;
mod handle;
mod image;
mod image_handle;

pub use context::{Context, EncodingOptions, ItemId, ReadingOptions, Writer};
pub use encoder::{CompressionFormat, Encoder, decoder_available, encoder_available};
pub use error::{Error, ErrorCode, Result, SubErrorCode};
pub use image::{Channel, Chroma, ColorSpace, Image, Plane, PlaneMut, ScalingOptions};
pub use image_handle::{DecodingOptions, ImageHandle};

/// Runtime version string of the linked libheif.
pub fn version() -> String {
    let ptr = unsafe { sys::heif_get_version() };
    if ptr.is_null() {
        return String::new();
    }
    // SAFETY: heif_get_version returns a static null-terminated string.
    unsafe { std::ffi::CStr::from_ptr(ptr) }
        .to_string_lossy()
        .into_owned()
}
