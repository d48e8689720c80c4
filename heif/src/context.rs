use crate::encoder::{CompressionFormat, Encoder};
use crate::error::{Error, Result, check};
use crate::handle::SharedHandle;
use crate::image::Image;
use crate::image_handle::ImageHandle;
use crate::sys;
use core::ffi::{CStr, c_int, c_void};
use std::ffi::CString;
use std::path::Path;
use std::ptr;

/// Identifier of one image item inside a container.
pub type ItemId = sys::heif_item_id;

/// Options for [`Context::read_from_file`] / [`Context::read_from_bytes`].
/// The native option surface is not finalized yet; this stays an empty
/// record until it is.
#[derive(Debug, Default, Clone, Copy)]
#[non_exhaustive]
pub struct ReadingOptions;

/// Options for [`Context::encode_image`]; empty for the same reason.
#[derive(Debug, Default, Clone, Copy)]
#[non_exhaustive]
pub struct EncodingOptions;

/// Caller-supplied sink for streaming container output.
///
/// [`Context::write`] routes every chunk the native muxer produces through
/// this trait, in production order, synchronously on the calling thread.
/// Returning an error aborts the write; the error surfaces from
/// [`Context::write`] itself.
pub trait Writer {
    /// Consume one output chunk. `ctx` is a borrowed view of the container
    /// being written; it must not be stored past this call.
    fn write(&mut self, ctx: &Context, data: &[u8]) -> Result<()>;
}

/// A HEIF/AVIF container: zero or more image items plus their relationships.
///
/// Freshly constructed it is empty; populate it with one of the read
/// operations or by encoding images into it. Cloning shares the native
/// context, which is freed once the last clone is dropped.
#[derive(Clone)]
pub struct Context {
    handle: SharedHandle<sys::heif_context>,
}

impl Context {
    /// Allocate an empty container context.
    pub fn new() -> Result<Self> {
        let raw = unsafe { sys::heif_context_alloc() };
        // SAFETY: a non-null result of heif_context_alloc is ours to free.
        let handle = unsafe { SharedHandle::acquire(raw, sys::heif_context_free) }
            .ok_or_else(|| Error::alloc("heif_context_alloc returned null"))?;
        Ok(Self { handle })
    }

    /// Wrap the context pointer handed to the writer callback without taking
    /// a second release obligation; the owning `Context` is alive further up
    /// the call stack for the whole synchronous write.
    ///
    /// # Safety
    ///
    /// `raw` must stay live for the lifetime of the returned value.
    pub(crate) unsafe fn from_ptr_non_owning(raw: *mut sys::heif_context) -> Option<Self> {
        // SAFETY: liveness is the caller's contract, see above.
        unsafe { SharedHandle::acquire_non_owning(raw) }.map(|handle| Self { handle })
    }

    /// Parse a container from a file on disk.
    pub fn read_from_file(
        &mut self,
        path: impl AsRef<Path>,
        _options: &ReadingOptions,
    ) -> Result<()> {
        let path = path_to_cstring(path.as_ref())?;
        let err = unsafe {
            sys::heif_context_read_from_file(self.handle.as_ptr(), path.as_ptr(), ptr::null())
        };
        check(err)
    }

    /// Parse a container from an in-memory byte buffer. The bytes are copied
    /// by the native side, so the buffer only needs to live for this call.
    pub fn read_from_bytes(&mut self, data: &[u8], _options: &ReadingOptions) -> Result<()> {
        let err = unsafe {
            sys::heif_context_read_from_memory(
                self.handle.as_ptr(),
                data.as_ptr() as *const c_void,
                data.len(),
                ptr::null(),
            )
        };
        check(err)
    }

    /// Number of top-level (non-thumbnail, non-auxiliary) image items.
    pub fn number_of_top_level_images(&self) -> usize {
        let n = unsafe { sys::heif_context_get_number_of_top_level_images(self.handle.as_ptr()) };
        n.max(0) as usize
    }

    pub fn is_top_level_image_id(&self, id: ItemId) -> bool {
        unsafe { sys::heif_context_is_top_level_image_ID(self.handle.as_ptr(), id) != 0 }
    }

    /// Ids of all top-level image items. Count-then-fill: the count is a
    /// snapshot, so the result is truncated to what the fill call reports.
    pub fn top_level_image_ids(&self) -> Vec<ItemId> {
        let count = self.number_of_top_level_images();
        let mut ids: Vec<ItemId> = vec![0; count];
        let filled = unsafe {
            sys::heif_context_get_list_of_top_level_image_IDs(
                self.handle.as_ptr(),
                ids.as_mut_ptr(),
                count as c_int,
            )
        };
        ids.truncate(filled.max(0) as usize);
        ids
    }

    /// Id of the designated primary image. Fails with a usage error when
    /// nothing was loaded or no primary item is designated.
    pub fn primary_image_id(&self) -> Result<ItemId> {
        let mut id: ItemId = 0;
        let err =
            unsafe { sys::heif_context_get_primary_image_ID(self.handle.as_ptr(), &mut id) };
        check(err)?;
        Ok(id)
    }

    /// Resolve the primary image straight to a handle.
    pub fn primary_image_handle(&self) -> Result<ImageHandle> {
        let mut raw = ptr::null_mut();
        let err =
            unsafe { sys::heif_context_get_primary_image_handle(self.handle.as_ptr(), &mut raw) };
        check(err)?;
        ImageHandle::from_owned_ptr(raw)
    }

    /// Obtain an encoder plugin instance for `format`. Fails when no such
    /// plugin is loaded; probe with [`crate::encoder_available`] first.
    pub fn encoder_for_format(&self, format: CompressionFormat) -> Result<Encoder> {
        let mut raw = ptr::null_mut();
        let err = unsafe {
            sys::heif_context_get_encoder_for_format(self.handle.as_ptr(), format, &mut raw)
        };
        check(err)?;
        Encoder::from_owned_ptr(raw)
    }

    /// Compress `image` with `encoder` and store the result as a new item in
    /// this container, returning its handle. The first encoded item becomes
    /// the primary image unless [`Context::set_primary_image`] overrides it.
    pub fn encode_image(
        &mut self,
        image: &Image,
        encoder: &mut Encoder,
        _options: &EncodingOptions,
    ) -> Result<ImageHandle> {
        let mut raw = ptr::null_mut();
        let err = unsafe {
            sys::heif_context_encode_image(
                self.handle.as_ptr(),
                image.as_ptr(),
                encoder.as_ptr(),
                ptr::null(),
                &mut raw,
            )
        };
        check(err)?;
        ImageHandle::from_owned_ptr(raw)
    }

    pub fn set_primary_image(&mut self, handle: &ImageHandle) -> Result<()> {
        let err =
            unsafe { sys::heif_context_set_primary_image(self.handle.as_ptr(), handle.as_ptr()) };
        check(err)
    }

    /// Serialize the container straight to a file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path_to_cstring(path.as_ref())?;
        let err =
            unsafe { sys::heif_context_write_to_file(self.handle.as_ptr(), path.as_ptr()) };
        check(err)
    }

    /// Serialize the container through a caller-supplied [`Writer`].
    ///
    /// Chunks arrive at the writer in production order; a writer error
    /// aborts the native muxer and is returned from this call.
    pub fn write(&self, writer: &mut dyn Writer) -> Result<()> {
        // Fat reference on the stack; the trampoline recovers it from the
        // thin userdata pointer for the duration of this synchronous call.
        let mut sink: &mut dyn Writer = writer;
        let mut native = sys::heif_writer {
            writer_api_version: 1,
            write: Some(writer_trampoline),
        };
        let err = unsafe {
            sys::heif_context_write(
                self.handle.as_ptr(),
                &mut native,
                (&mut sink as *mut &mut dyn Writer).cast::<c_void>(),
            )
        };
        check(err)
    }
}

static OK_MESSAGE: &CStr = c"Success";
static NULL_CONTEXT_MESSAGE: &CStr = c"writer callback received a null context";
static WRITE_FAILED_MESSAGE: &CStr = c"writer rejected output chunk";

/// The one fixed function registered with `heif_context_write`. Recovers the
/// polymorphic sink from `userdata`, rebuilds a non-owning context view, and
/// translates the sink's outcome back into the native status-struct shape.
/// Error messages are static strings because the returned pointer crosses
/// the FFI boundary after our frame unwinds.
unsafe extern "C" fn writer_trampoline(
    raw_ctx: *mut sys::heif_context,
    data: *const c_void,
    size: usize,
    userdata: *mut c_void,
) -> sys::heif_error {
    // SAFETY: `userdata` is the stack slot holding the `&mut dyn Writer`
    // that `Context::write` passed in; it outlives this synchronous call.
    let sink = unsafe { &mut *userdata.cast::<&mut dyn Writer>() };

    // SAFETY: `raw_ctx` is the context the outer write call runs on, owned
    // further up the stack. Non-owning: no second release obligation.
    let Some(ctx) = (unsafe { Context::from_ptr_non_owning(raw_ctx) }) else {
        return sys::heif_error {
            code: sys::heif_error_code::heif_error_Usage_error,
            subcode: sys::heif_suberror_code::heif_suberror_Null_pointer_argument,
            message: NULL_CONTEXT_MESSAGE.as_ptr(),
        };
    };

    let chunk: &[u8] = if data.is_null() || size == 0 {
        &[]
    } else {
        // SAFETY: the muxer hands us `size` readable bytes, valid for the
        // duration of this call.
        unsafe { std::slice::from_raw_parts(data.cast::<u8>(), size) }
    };

    match sink.write(&ctx, chunk) {
        Ok(()) => sys::heif_error {
            code: sys::heif_error_code::heif_error_Ok,
            subcode: sys::heif_suberror_code::heif_suberror_Unspecified,
            message: OK_MESSAGE.as_ptr(),
        },
        Err(err) => {
            // A sink must not abort the write with an Ok-coded error.
            let code = if err.is_ok() {
                sys::heif_error_code::heif_error_Encoding_error
            } else {
                err.code
            };
            sys::heif_error {
                code,
                subcode: err.subcode,
                message: WRITE_FAILED_MESSAGE.as_ptr(),
            }
        }
    }
}

fn path_to_cstring(path: &Path) -> Result<CString> {
    let utf8 = path
        .to_str()
        .ok_or_else(|| Error::usage("path is not valid UTF-8"))?;
    CString::new(utf8).map_err(|_| Error::usage("path contains an interior NUL byte"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    struct RecordingSink {
        chunks: Vec<Vec<u8>>,
        fail_from: Option<usize>,
    }

    impl Writer for RecordingSink {
        fn write(&mut self, _ctx: &Context, data: &[u8]) -> Result<()> {
            if self.fail_from.is_some_and(|n| self.chunks.len() >= n) {
                return Err(Error {
                    code: ErrorCode::heif_error_Encoding_error,
                    subcode: sys::heif_suberror_code::heif_suberror_Cannot_write_output_data,
                    message: "sink full".to_string(),
                });
            }
            self.chunks.push(data.to_vec());
            Ok(())
        }
    }

    // Drive the trampoline directly, without the native muxer: the context
    // pointer is never dereferenced unless the sink calls back into it.
    fn call_trampoline(sink: &mut dyn Writer, chunk: &[u8]) -> sys::heif_error {
        let mut ctx_stub = 0u8;
        let mut sink_ref: &mut dyn Writer = sink;
        unsafe {
            writer_trampoline(
                (&mut ctx_stub as *mut u8).cast(),
                chunk.as_ptr().cast(),
                chunk.len(),
                (&mut sink_ref as *mut &mut dyn Writer).cast(),
            )
        }
    }

    #[test]
    fn trampoline_forwards_chunks_in_order() {
        let mut sink = RecordingSink {
            chunks: Vec::new(),
            fail_from: None,
        };
        for chunk in [b"ftyp".as_slice(), b"meta".as_slice(), b"mdat".as_slice()] {
            let status = call_trampoline(&mut sink, chunk);
            assert_eq!(status.code, ErrorCode::heif_error_Ok);
        }
        assert_eq!(sink.chunks, vec![b"ftyp".to_vec(), b"meta".to_vec(), b"mdat".to_vec()]);
    }

    #[test]
    fn trampoline_translates_sink_failure() {
        let mut sink = RecordingSink {
            chunks: Vec::new(),
            fail_from: Some(1),
        };
        assert_eq!(
            call_trampoline(&mut sink, b"first").code,
            ErrorCode::heif_error_Ok
        );
        let status = call_trampoline(&mut sink, b"second");
        assert_eq!(status.code, ErrorCode::heif_error_Encoding_error);
        assert_eq!(
            status.subcode,
            sys::heif_suberror_code::heif_suberror_Cannot_write_output_data
        );
        assert!(!status.message.is_null());
        assert_eq!(sink.chunks.len(), 1);
    }

    #[test]
    fn trampoline_rejects_null_context() {
        let mut sink = RecordingSink {
            chunks: Vec::new(),
            fail_from: None,
        };
        let mut sink_ref: &mut dyn Writer = &mut sink;
        let status = unsafe {
            writer_trampoline(
                ptr::null_mut(),
                ptr::null(),
                0,
                (&mut sink_ref as *mut &mut dyn Writer).cast(),
            )
        };
        assert_eq!(status.code, ErrorCode::heif_error_Usage_error);
        assert!(sink.chunks.is_empty());
    }

    #[test]
    fn empty_chunk_is_delivered_as_empty_slice() {
        let mut sink = RecordingSink {
            chunks: Vec::new(),
            fail_from: None,
        };
        let status = call_trampoline(&mut sink, &[]);
        assert_eq!(status.code, ErrorCode::heif_error_Ok);
        assert_eq!(sink.chunks, vec![Vec::<u8>::new()]);
    }
}
