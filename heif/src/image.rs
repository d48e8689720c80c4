use crate::error::{Error, Result, check};
use crate::handle::SharedHandle;
use crate::sys;
use core::ffi::c_int;
use std::ptr;

// Re-export the pixel-layout enums so callers don't need `sys` directly.
pub type ColorSpace = sys::heif_colorspace;
pub type Chroma = sys::heif_chroma;
pub type Channel = sys::heif_channel;

/// Options for [`Image::scale`]. The native option surface is not finalized
/// yet; this stays an empty record until it is.
#[derive(Debug, Default, Clone, Copy)]
#[non_exhaustive]
pub struct ScalingOptions;

/// Read-only view of one plane inside a decoded image.
pub struct Plane<'a> {
    /// Plane bytes, `stride * height` long, row-major.
    pub data: &'a [u8],
    /// Bytes per row; at least as large as a packed row.
    pub stride: usize,
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u8,
}

/// Mutable view of one plane, only available for caller-created images.
#[derive(Debug)]
pub struct PlaneMut<'a> {
    pub data: &'a mut [u8],
    pub stride: usize,
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u8,
}

/// A pixel buffer holding one or more planes.
///
/// Produced by [`crate::ImageHandle::decode`], [`Image::scale`], or built
/// plane-by-plane via [`Image::create`] + [`Image::add_plane`] for encode
/// workflows. Cloning shares the underlying native buffer; the native
/// release runs once the last clone is dropped.
#[derive(Clone, Debug)]
pub struct Image {
    handle: SharedHandle<sys::heif_image>,
    // Decoder/scaler output must not be mutated in place; only images built
    // through `create` hand out mutable planes.
    writable: bool,
}

impl Image {
    /// Allocate an empty image with the given geometry and pixel layout.
    /// Planes are added separately with [`Image::add_plane`].
    pub fn create(width: u32, height: u32, colorspace: ColorSpace, chroma: Chroma) -> Result<Self> {
        let width = to_dim(width)?;
        let height = to_dim(height)?;
        let mut raw = ptr::null_mut();
        let err =
            unsafe { sys::heif_image_create(width, height, colorspace, chroma, &mut raw) };
        check(err)?;
        Self::from_owned_ptr(raw, true)
    }

    /// Wrap an image pointer freshly returned by a native call, binding its
    /// release function.
    pub(crate) fn from_owned_ptr(raw: *mut sys::heif_image, writable: bool) -> Result<Self> {
        // SAFETY: `raw` comes from a native call that reported success and
        // transferred ownership to us.
        let handle = unsafe { SharedHandle::acquire(raw, sys::heif_image_release) }
            .ok_or_else(|| Error::alloc("native call returned a null image"))?;
        Ok(Self { handle, writable })
    }

    /// Allocate storage for one channel. Fails if the channel does not fit
    /// the image's colorspace/chroma or if allocation fails.
    pub fn add_plane(
        &mut self,
        channel: Channel,
        width: u32,
        height: u32,
        bit_depth: u8,
    ) -> Result<()> {
        let width = to_dim(width)?;
        let height = to_dim(height)?;
        let err = unsafe {
            sys::heif_image_add_plane(
                self.handle.as_ptr(),
                channel,
                width,
                height,
                bit_depth as c_int,
            )
        };
        check(err)
    }

    pub fn colorspace(&self) -> ColorSpace {
        unsafe { sys::heif_image_get_colorspace(self.handle.as_ptr()) }
    }

    pub fn chroma_format(&self) -> Chroma {
        unsafe { sys::heif_image_get_chroma_format(self.handle.as_ptr()) }
    }

    pub fn has_channel(&self, channel: Channel) -> bool {
        unsafe { sys::heif_image_has_channel(self.handle.as_ptr(), channel) != 0 }
    }

    /// Width of one channel's plane, or `None` if the channel is absent.
    pub fn width(&self, channel: Channel) -> Option<u32> {
        self.has_channel(channel)
            .then(|| unsafe { sys::heif_image_get_width(self.handle.as_ptr(), channel) } as u32)
    }

    /// Height of one channel's plane, or `None` if the channel is absent.
    pub fn height(&self, channel: Channel) -> Option<u32> {
        self.has_channel(channel)
            .then(|| unsafe { sys::heif_image_get_height(self.handle.as_ptr(), channel) } as u32)
    }

    /// Bits per pixel of one channel's plane, or `None` if absent.
    pub fn bits_per_pixel(&self, channel: Channel) -> Option<u8> {
        self.has_channel(channel).then(|| {
            (unsafe { sys::heif_image_get_bits_per_pixel(self.handle.as_ptr(), channel) }) as u8
        })
    }

    /// Read-only view of one plane.
    pub fn plane(&self, channel: Channel) -> Result<Plane<'_>> {
        let (width, height, bits_per_pixel) = self.plane_geometry(channel)?;
        let mut stride: c_int = 0;
        let data =
            unsafe { sys::heif_image_get_plane_readonly(self.handle.as_ptr(), channel, &mut stride) };
        if data.is_null() || stride <= 0 {
            return Err(missing_channel());
        }
        let stride = stride as usize;
        // SAFETY: the plane buffer is `stride * height` bytes, owned by the
        // native image, which outlives the returned borrow of `self`.
        let data = unsafe { std::slice::from_raw_parts(data, stride * height as usize) };
        Ok(Plane {
            data,
            stride,
            width,
            height,
            bits_per_pixel,
        })
    }

    /// Mutable view of one plane.
    ///
    /// Only valid for images built via [`Image::create`]; the native library
    /// forbids mutating decoder or scaler output in place, so this fails
    /// with a usage error for such images.
    pub fn plane_mut(&mut self, channel: Channel) -> Result<PlaneMut<'_>> {
        if !self.writable {
            return Err(Error::usage(
                "plane_mut is only valid for images built with Image::create",
            ));
        }
        let (width, height, bits_per_pixel) = self.plane_geometry(channel)?;
        let mut stride: c_int = 0;
        let data = unsafe { sys::heif_image_get_plane(self.handle.as_ptr(), channel, &mut stride) };
        if data.is_null() || stride <= 0 {
            return Err(missing_channel());
        }
        let stride = stride as usize;
        // SAFETY: as in `plane`; `&mut self` plus the `writable` gate keeps
        // this the only live mutable view through this value.
        let data = unsafe { std::slice::from_raw_parts_mut(data, stride * height as usize) };
        Ok(PlaneMut {
            data,
            stride,
            width,
            height,
            bits_per_pixel,
        })
    }

    /// Produce a new, independent image scaled to `width` x `height`.
    pub fn scale(&self, width: u32, height: u32, _options: &ScalingOptions) -> Result<Image> {
        let width = to_dim(width)?;
        let height = to_dim(height)?;
        let mut raw = ptr::null_mut();
        let err = unsafe {
            sys::heif_image_scale_image(self.handle.as_ptr(), &mut raw, width, height, ptr::null())
        };
        check(err)?;
        Image::from_owned_ptr(raw, false)
    }

    pub(crate) fn as_ptr(&self) -> *mut sys::heif_image {
        self.handle.as_ptr()
    }

    fn plane_geometry(&self, channel: Channel) -> Result<(u32, u32, u8)> {
        match (
            self.width(channel),
            self.height(channel),
            self.bits_per_pixel(channel),
        ) {
            (Some(w), Some(h), Some(bpp)) => Ok((w, h, bpp)),
            _ => Err(missing_channel()),
        }
    }
}

fn missing_channel() -> Error {
    Error {
        code: sys::heif_error_code::heif_error_Usage_error,
        subcode: sys::heif_suberror_code::heif_suberror_Nonexisting_image_channel_referenced,
        message: "image has no plane for the requested channel".to_string(),
    }
}

/// Convert a dimension to the native `int` width without silent wrapping.
fn to_dim(value: u32) -> Result<c_int> {
    c_int::try_from(value)
        .map_err(|_| Error::usage("dimension exceeds the native signed-int limit"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn oversized_dimensions_are_rejected_before_the_native_call() {
        // u32 values above i32::MAX must surface as a usage error instead
        // of wrapping into a negative native dimension.
        let err = Image::create(
            u32::MAX,
            1,
            ColorSpace::heif_colorspace_YCbCr,
            Chroma::heif_chroma_420,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::heif_error_Usage_error);

        let err = Image::create(
            1,
            1 + i32::MAX as u32,
            ColorSpace::heif_colorspace_YCbCr,
            Chroma::heif_chroma_420,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::heif_error_Usage_error);
    }
}
