use crate::context::ItemId;
use crate::error::{Error, Result, check};
use crate::handle::SharedHandle;
use crate::image::{Chroma, ColorSpace, Image};
use crate::sys;
use std::ptr;

/// Options for [`ImageHandle::decode`]. The native option surface is not
/// finalized yet; this stays an empty record until it is.
#[derive(Debug, Default, Clone, Copy)]
#[non_exhaustive]
pub struct DecodingOptions;

/// Reference to one image item stored in a container.
///
/// Obtained from [`crate::Context::primary_image_handle`] or
/// [`ImageHandle::thumbnail`]. Cloning shares the native handle; it is
/// released once the last clone is dropped, independently of the `Context`
/// it came from.
#[derive(Clone)]
pub struct ImageHandle {
    handle: SharedHandle<sys::heif_image_handle>,
}

impl ImageHandle {
    pub(crate) fn from_owned_ptr(raw: *mut sys::heif_image_handle) -> Result<Self> {
        // SAFETY: `raw` comes from a native call that reported success and
        // transferred ownership to us.
        let handle = unsafe { SharedHandle::acquire(raw, sys::heif_image_handle_release) }
            .ok_or_else(|| Error::alloc("native call returned a null image handle"))?;
        Ok(Self { handle })
    }

    /// Whether this item is the container's designated primary image.
    pub fn is_primary_image(&self) -> bool {
        unsafe { sys::heif_image_handle_is_primary_image(self.handle.as_ptr()) != 0 }
    }

    /// Nominal width of the coded image, before any decode.
    pub fn width(&self) -> u32 {
        unsafe { sys::heif_image_handle_get_width(self.handle.as_ptr()) as u32 }
    }

    /// Nominal height of the coded image, before any decode.
    pub fn height(&self) -> u32 {
        unsafe { sys::heif_image_handle_get_height(self.handle.as_ptr()) as u32 }
    }

    pub fn has_alpha_channel(&self) -> bool {
        unsafe { sys::heif_image_handle_has_alpha_channel(self.handle.as_ptr()) != 0 }
    }

    /// Number of thumbnail items attached to this image. Zero is a normal
    /// answer, not an error.
    pub fn number_of_thumbnails(&self) -> usize {
        let n = unsafe { sys::heif_image_handle_get_number_of_thumbnails(self.handle.as_ptr()) };
        n.max(0) as usize
    }

    /// Ids of all thumbnails of this image. Count-then-fill: the count is a
    /// snapshot, so the result is truncated to what the fill call reports.
    pub fn thumbnail_ids(&self) -> Vec<ItemId> {
        let count = self.number_of_thumbnails();
        let mut ids: Vec<ItemId> = vec![0; count];
        let filled = unsafe {
            sys::heif_image_handle_get_list_of_thumbnail_IDs(
                self.handle.as_ptr(),
                ids.as_mut_ptr(),
                count as core::ffi::c_int,
            )
        };
        ids.truncate(filled.max(0) as usize);
        ids
    }

    /// Resolve one thumbnail id to its own handle. Fails if `id` is not a
    /// thumbnail of this item.
    pub fn thumbnail(&self, id: ItemId) -> Result<ImageHandle> {
        let mut raw = ptr::null_mut();
        let err =
            unsafe { sys::heif_image_handle_get_thumbnail(self.handle.as_ptr(), id, &mut raw) };
        check(err)?;
        ImageHandle::from_owned_ptr(raw)
    }

    /// Decode this item into a pixel buffer.
    ///
    /// The single expensive operation in the crate; the work happens
    /// entirely inside the native decoder. Each call yields an independent
    /// [`Image`]. Fails on malformed or unsupported coded content.
    pub fn decode(
        &self,
        colorspace: ColorSpace,
        chroma: Chroma,
        _options: &DecodingOptions,
    ) -> Result<Image> {
        let mut raw = ptr::null_mut();
        let err = unsafe {
            sys::heif_decode_image(self.handle.as_ptr(), &mut raw, colorspace, chroma, ptr::null())
        };
        check(err)?;
        Image::from_owned_ptr(raw, false)
    }

    pub(crate) fn as_ptr(&self) -> *mut sys::heif_image_handle {
        self.handle.as_ptr()
    }
}
