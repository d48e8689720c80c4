//! Raw FFI declarations for the libheif C API.
//!
//! Only the surface consumed by the safe `heif` crate is declared here:
//! context lifecycle and enumeration, image handles, decoded images and
//! their planes, encoders, and the streaming writer entry point. The
//! declarations track the stable `libheif/heif.h` API (>= 1.12).
//!
//! Everything in this crate is `unsafe`; use the `heif` crate unless you
//! need the raw calls.

#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(non_upper_case_globals)]

use core::ffi::{c_char, c_int, c_void};

/// Item identifier of one image stored in a container.
pub type heif_item_id = u32;

// Opaque native types. Allocation and release stay on the C side.

#[repr(C)]
pub struct heif_context {
    _unused: [u8; 0],
}

#[repr(C)]
pub struct heif_image_handle {
    _unused: [u8; 0],
}

#[repr(C)]
pub struct heif_image {
    _unused: [u8; 0],
}

#[repr(C)]
pub struct heif_encoder {
    _unused: [u8; 0],
}

// Option structs are passed as null pointers; their layout is not needed.

#[repr(C)]
pub struct heif_reading_options {
    _unused: [u8; 0],
}

#[repr(C)]
pub struct heif_decoding_options {
    _unused: [u8; 0],
}

#[repr(C)]
pub struct heif_encoding_options {
    _unused: [u8; 0],
}

#[repr(C)]
pub struct heif_scaling_options {
    _unused: [u8; 0],
}

// Values produced by the native side are declared as open newtypes over the
// C enum width, never as Rust enums: the linked libheif may be newer than
// this list and return codes outside it, which a fieldless enum cannot hold.

/// Error category reported in [`heif_error`].
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct heif_error_code(pub c_int);

impl heif_error_code {
    pub const heif_error_Ok: Self = Self(0);
    pub const heif_error_Input_does_not_exist: Self = Self(1);
    pub const heif_error_Invalid_input: Self = Self(2);
    pub const heif_error_Unsupported_filetype: Self = Self(3);
    pub const heif_error_Unsupported_feature: Self = Self(4);
    pub const heif_error_Usage_error: Self = Self(5);
    pub const heif_error_Memory_allocation_error: Self = Self(6);
    pub const heif_error_Decoder_plugin_error: Self = Self(7);
    pub const heif_error_Encoder_plugin_error: Self = Self(8);
    pub const heif_error_Encoding_error: Self = Self(9);
    pub const heif_error_Color_profile_does_not_exist: Self = Self(10);
    pub const heif_error_Plugin_loading_error: Self = Self(11);
}

/// Finer-grained cause within a [`heif_error_code`] category.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct heif_suberror_code(pub c_int);

impl heif_suberror_code {
    pub const heif_suberror_Unspecified: Self = Self(0);

    // heif_error_Invalid_input
    pub const heif_suberror_End_of_data: Self = Self(100);
    pub const heif_suberror_Invalid_box_size: Self = Self(101);
    pub const heif_suberror_No_ftyp_box: Self = Self(102);
    pub const heif_suberror_No_idat_box: Self = Self(103);
    pub const heif_suberror_No_meta_box: Self = Self(104);
    pub const heif_suberror_No_hdlr_box: Self = Self(105);
    pub const heif_suberror_No_hvcC_box: Self = Self(106);
    pub const heif_suberror_No_pitm_box: Self = Self(107);
    pub const heif_suberror_No_ipco_box: Self = Self(108);
    pub const heif_suberror_No_ipma_box: Self = Self(109);
    pub const heif_suberror_No_iloc_box: Self = Self(110);
    pub const heif_suberror_No_iinf_box: Self = Self(111);
    pub const heif_suberror_No_iprp_box: Self = Self(112);
    pub const heif_suberror_No_iref_box: Self = Self(113);
    pub const heif_suberror_No_pict_handler: Self = Self(114);
    pub const heif_suberror_Ipma_box_references_nonexisting_property: Self = Self(115);
    pub const heif_suberror_No_properties_assigned_to_item: Self = Self(116);
    pub const heif_suberror_No_item_data: Self = Self(117);
    pub const heif_suberror_Invalid_grid_data: Self = Self(118);
    pub const heif_suberror_Missing_grid_images: Self = Self(119);
    pub const heif_suberror_Invalid_clean_aperture: Self = Self(120);
    pub const heif_suberror_Invalid_overlay_data: Self = Self(121);
    pub const heif_suberror_Overlay_image_outside_of_canvas: Self = Self(122);
    pub const heif_suberror_Auxiliary_image_type_unspecified: Self = Self(123);
    pub const heif_suberror_No_or_invalid_primary_item: Self = Self(124);
    pub const heif_suberror_No_infe_box: Self = Self(125);
    pub const heif_suberror_Unknown_color_profile_type: Self = Self(126);
    pub const heif_suberror_Wrong_tile_image_chroma_format: Self = Self(127);
    pub const heif_suberror_Invalid_fractional_number: Self = Self(128);
    pub const heif_suberror_Invalid_image_size: Self = Self(129);
    pub const heif_suberror_Invalid_pixi_box: Self = Self(130);
    pub const heif_suberror_No_av1C_box: Self = Self(131);
    pub const heif_suberror_Wrong_tile_image_pixel_depth: Self = Self(132);
    pub const heif_suberror_Unknown_NCLX_color_primaries: Self = Self(133);
    pub const heif_suberror_Unknown_NCLX_transfer_characteristics: Self = Self(134);
    pub const heif_suberror_Unknown_NCLX_matrix_coefficients: Self = Self(135);

    // heif_error_Memory_allocation_error
    pub const heif_suberror_Security_limit_exceeded: Self = Self(1000);

    // heif_error_Usage_error
    pub const heif_suberror_Nonexisting_item_referenced: Self = Self(2000);
    pub const heif_suberror_Null_pointer_argument: Self = Self(2001);
    pub const heif_suberror_Nonexisting_image_channel_referenced: Self = Self(2002);
    pub const heif_suberror_Unsupported_plugin_version: Self = Self(2003);
    pub const heif_suberror_Unsupported_writer_version: Self = Self(2004);
    pub const heif_suberror_Unsupported_parameter: Self = Self(2005);
    pub const heif_suberror_Invalid_parameter_value: Self = Self(2006);

    // heif_error_Unsupported_feature
    pub const heif_suberror_Unsupported_codec: Self = Self(3000);
    pub const heif_suberror_Unsupported_image_type: Self = Self(3001);
    pub const heif_suberror_Unsupported_data_version: Self = Self(3002);
    pub const heif_suberror_Unsupported_color_conversion: Self = Self(3003);
    pub const heif_suberror_Unsupported_item_construction_method: Self = Self(3004);

    // heif_error_Encoder_plugin_error
    pub const heif_suberror_Unsupported_bit_depth: Self = Self(4000);

    // heif_error_Encoding_error
    pub const heif_suberror_Cannot_write_output_data: Self = Self(5000);

    // heif_error_Plugin_loading_error
    pub const heif_suberror_Plugin_loading_error: Self = Self(6000);
    pub const heif_suberror_Plugin_is_not_loaded: Self = Self(6001);
    pub const heif_suberror_Cannot_read_plugin_directory: Self = Self(6002);
}

/// Status struct returned by value from every fallible libheif call.
///
/// `message` points at a static or library-owned string and stays valid
/// until the next call on the same object; copy it out before that.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct heif_error {
    pub code: heif_error_code,
    pub subcode: heif_suberror_code,
    pub message: *const c_char,
}

/// Colorspace of a decoded image; also read back from the native side, so
/// open for the same reason as the status codes.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct heif_colorspace(pub c_int);

impl heif_colorspace {
    pub const heif_colorspace_YCbCr: Self = Self(0);
    pub const heif_colorspace_RGB: Self = Self(1);
    pub const heif_colorspace_monochrome: Self = Self(2);
    pub const heif_colorspace_undefined: Self = Self(99);
}

/// Chroma layout of a decoded image; read back from the native side.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct heif_chroma(pub c_int);

impl heif_chroma {
    pub const heif_chroma_monochrome: Self = Self(0);
    pub const heif_chroma_420: Self = Self(1);
    pub const heif_chroma_422: Self = Self(2);
    pub const heif_chroma_444: Self = Self(3);
    pub const heif_chroma_interleaved_RGB: Self = Self(10);
    pub const heif_chroma_interleaved_RGBA: Self = Self(11);
    pub const heif_chroma_interleaved_RRGGBB_BE: Self = Self(12);
    pub const heif_chroma_interleaved_RRGGBBAA_BE: Self = Self(13);
    pub const heif_chroma_interleaved_RRGGBB_LE: Self = Self(14);
    pub const heif_chroma_interleaved_RRGGBBAA_LE: Self = Self(15);
    pub const heif_chroma_undefined: Self = Self(99);
}

// heif_channel and heif_compression_format are only passed into the library,
// never produced by it, so a closed Rust enum is sound for them.

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum heif_channel {
    heif_channel_Y = 0,
    heif_channel_Cb = 1,
    heif_channel_Cr = 2,
    heif_channel_R = 3,
    heif_channel_G = 4,
    heif_channel_B = 5,
    heif_channel_Alpha = 6,
    heif_channel_interleaved = 10,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum heif_compression_format {
    heif_compression_undefined = 0,
    heif_compression_HEVC = 1,
    heif_compression_AVC = 2,
    heif_compression_JPEG = 3,
    heif_compression_AV1 = 4,
}

/// Chunk callback invoked by `heif_context_write` for each produced block.
pub type heif_writer_write_fn = unsafe extern "C" fn(
    ctx: *mut heif_context,
    data: *const c_void,
    size: usize,
    userdata: *mut c_void,
) -> heif_error;

/// Writer vtable passed to `heif_context_write`.
///
/// `writer_api_version` must be 1 for this struct shape.
#[repr(C)]
pub struct heif_writer {
    pub writer_api_version: c_int,
    pub write: Option<heif_writer_write_fn>,
}

unsafe extern "C" {
    pub fn heif_get_version() -> *const c_char;

    pub fn heif_have_decoder_for_format(format: heif_compression_format) -> c_int;
    pub fn heif_have_encoder_for_format(format: heif_compression_format) -> c_int;

    // ---- context lifecycle and enumeration ----

    pub fn heif_context_alloc() -> *mut heif_context;
    pub fn heif_context_free(ctx: *mut heif_context);

    pub fn heif_context_read_from_file(
        ctx: *mut heif_context,
        filename: *const c_char,
        options: *const heif_reading_options,
    ) -> heif_error;
    pub fn heif_context_read_from_memory(
        ctx: *mut heif_context,
        mem: *const c_void,
        size: usize,
        options: *const heif_reading_options,
    ) -> heif_error;

    pub fn heif_context_get_number_of_top_level_images(ctx: *mut heif_context) -> c_int;
    pub fn heif_context_is_top_level_image_ID(ctx: *mut heif_context, id: heif_item_id) -> c_int;
    pub fn heif_context_get_list_of_top_level_image_IDs(
        ctx: *mut heif_context,
        ids: *mut heif_item_id,
        count: c_int,
    ) -> c_int;
    pub fn heif_context_get_primary_image_ID(
        ctx: *mut heif_context,
        id: *mut heif_item_id,
    ) -> heif_error;
    pub fn heif_context_get_primary_image_handle(
        ctx: *mut heif_context,
        handle: *mut *mut heif_image_handle,
    ) -> heif_error;

    pub fn heif_context_write_to_file(
        ctx: *mut heif_context,
        filename: *const c_char,
    ) -> heif_error;
    pub fn heif_context_write(
        ctx: *mut heif_context,
        writer: *mut heif_writer,
        userdata: *mut c_void,
    ) -> heif_error;

    // ---- encoding ----

    pub fn heif_context_get_encoder_for_format(
        ctx: *mut heif_context,
        format: heif_compression_format,
        encoder: *mut *mut heif_encoder,
    ) -> heif_error;
    pub fn heif_encoder_release(encoder: *mut heif_encoder);
    pub fn heif_encoder_get_name(encoder: *const heif_encoder) -> *const c_char;
    pub fn heif_encoder_set_lossy_quality(encoder: *mut heif_encoder, quality: c_int)
    -> heif_error;
    pub fn heif_encoder_set_lossless(encoder: *mut heif_encoder, enable: c_int) -> heif_error;
    pub fn heif_context_encode_image(
        ctx: *mut heif_context,
        image: *const heif_image,
        encoder: *mut heif_encoder,
        options: *const heif_encoding_options,
        out_handle: *mut *mut heif_image_handle,
    ) -> heif_error;
    pub fn heif_context_set_primary_image(
        ctx: *mut heif_context,
        handle: *mut heif_image_handle,
    ) -> heif_error;

    // ---- image handles ----

    pub fn heif_image_handle_release(handle: *mut heif_image_handle);
    pub fn heif_image_handle_is_primary_image(handle: *const heif_image_handle) -> c_int;
    pub fn heif_image_handle_get_width(handle: *const heif_image_handle) -> c_int;
    pub fn heif_image_handle_get_height(handle: *const heif_image_handle) -> c_int;
    pub fn heif_image_handle_has_alpha_channel(handle: *const heif_image_handle) -> c_int;
    pub fn heif_image_handle_get_number_of_thumbnails(handle: *const heif_image_handle) -> c_int;
    pub fn heif_image_handle_get_list_of_thumbnail_IDs(
        handle: *const heif_image_handle,
        ids: *mut heif_item_id,
        count: c_int,
    ) -> c_int;
    pub fn heif_image_handle_get_thumbnail(
        handle: *const heif_image_handle,
        id: heif_item_id,
        out_thumbnail: *mut *mut heif_image_handle,
    ) -> heif_error;

    pub fn heif_decode_image(
        handle: *const heif_image_handle,
        out_img: *mut *mut heif_image,
        colorspace: heif_colorspace,
        chroma: heif_chroma,
        options: *const heif_decoding_options,
    ) -> heif_error;

    // ---- decoded images ----

    pub fn heif_image_release(img: *mut heif_image);
    pub fn heif_image_create(
        width: c_int,
        height: c_int,
        colorspace: heif_colorspace,
        chroma: heif_chroma,
        out_image: *mut *mut heif_image,
    ) -> heif_error;
    pub fn heif_image_add_plane(
        img: *mut heif_image,
        channel: heif_channel,
        width: c_int,
        height: c_int,
        bit_depth: c_int,
    ) -> heif_error;
    pub fn heif_image_get_colorspace(img: *const heif_image) -> heif_colorspace;
    pub fn heif_image_get_chroma_format(img: *const heif_image) -> heif_chroma;
    pub fn heif_image_has_channel(img: *const heif_image, channel: heif_channel) -> c_int;
    pub fn heif_image_get_width(img: *const heif_image, channel: heif_channel) -> c_int;
    pub fn heif_image_get_height(img: *const heif_image, channel: heif_channel) -> c_int;
    pub fn heif_image_get_bits_per_pixel(img: *const heif_image, channel: heif_channel) -> c_int;
    pub fn heif_image_get_plane_readonly(
        img: *const heif_image,
        channel: heif_channel,
        out_stride: *mut c_int,
    ) -> *const u8;
    pub fn heif_image_get_plane(
        img: *mut heif_image,
        channel: heif_channel,
        out_stride: *mut c_int,
    ) -> *mut u8;
    pub fn heif_image_scale_image(
        input: *const heif_image,
        out_img: *mut *mut heif_image,
        width: c_int,
        height: c_int,
        options: *const heif_scaling_options,
    ) -> heif_error;
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem;

    #[test]
    fn error_struct_layout() {
        // Two C enums plus a pointer; libheif returns this by value.
        assert_eq!(
            mem::size_of::<heif_error>(),
            2 * mem::size_of::<c_int>() + mem::size_of::<*const c_char>()
        );
    }

    #[test]
    fn open_code_types_are_c_int_wide() {
        assert_eq!(mem::size_of::<heif_error_code>(), mem::size_of::<c_int>());
        assert_eq!(mem::size_of::<heif_suberror_code>(), mem::size_of::<c_int>());
        assert_eq!(mem::size_of::<heif_colorspace>(), mem::size_of::<c_int>());
        assert_eq!(mem::size_of::<heif_chroma>(), mem::size_of::<c_int>());
    }

    #[test]
    fn code_types_hold_values_beyond_the_known_set() {
        // Newer libheif versions return codes this crate does not name yet.
        let future = heif_error_code(42);
        assert_ne!(future, heif_error_code::heif_error_Ok);
        assert_eq!(future.0, 42);
    }

    #[test]
    fn writer_struct_layout() {
        // version + one function pointer (pointer-aligned).
        assert_eq!(
            mem::size_of::<heif_writer>(),
            2 * mem::size_of::<*const c_void>()
        );
    }
}
