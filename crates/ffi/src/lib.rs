// ABOUTME: C FFI bindings for the zimcat catalog parser.
// ABOUTME: Exposes arena-allocated catalog parse results to Swift/Kotlin consumers.

use std::panic;
use std::ptr;

use bumpalo::Bump;
use zimcat_opds::{parse_catalog_bytes, Catalog, OpdsError, ZimFileMeta};

/// FFI version constant for ABI compatibility checking.
pub const ZIMCAT_FFI_VERSION: u32 = 1;

/// Returns the FFI ABI version number.
/// Consumers should check this matches their expected version.
#[no_mangle]
pub extern "C" fn zimcat_ffi_version() -> u32 {
    ZIMCAT_FFI_VERSION
}

// ----------------------------------------------------------------------------
// Error handling
// ----------------------------------------------------------------------------

/// Error codes matching the C ABI ZErrorCode enum.
#[repr(u32)]
pub enum ZErrorCode {
    Ok = 0,
    Malformed = 1,
    MissingRoot = 2,
    Invalid = 3,
    Internal = 255,
}

/// UTF-8 string slice for FFI. Not null-terminated.
/// Consumer must not mutate or free; memory is owned by the result arena
/// (catalog fields) or static storage (error messages).
#[derive(Copy, Clone)]
#[repr(C)]
pub struct ZString {
    pub data: *const u8,
    pub len: usize,
}

impl ZString {
    /// Creates an empty ZString with null pointer and zero length.
    pub const fn empty() -> Self {
        ZString {
            data: ptr::null(),
            len: 0,
        }
    }
}

impl Default for ZString {
    fn default() -> Self {
        Self::empty()
    }
}

/// FFI error struct matching the C ABI ZError.
#[repr(C)]
pub struct ZError {
    pub code: u32,
    pub message: ZString,
}

impl ZError {
    /// Creates a success (Z_OK) error with empty message.
    pub const fn ok() -> Self {
        ZError {
            code: ZErrorCode::Ok as u32,
            message: ZString::empty(),
        }
    }
}

// ----------------------------------------------------------------------------
// ZZimFile / ZCatalog - match the C ABI structs
// ----------------------------------------------------------------------------

#[derive(Copy, Clone)]
#[repr(C)]
pub struct ZZimFile {
    pub id: ZString,
    pub name: ZString,
    pub title: ZString,
    pub description: ZString,
    pub language_code: ZString,
    pub creation_date: ZString,
    pub creator: ZString,
    pub publisher: ZString,
    pub category: ZString,
    pub url: ZString,
    pub icon_url: ZString,
    pub size: u64,
    pub article_count: u64,
    pub media_count: u64,
    pub has_pictures: bool,
    pub has_videos: bool,
    pub has_index: bool,
    pub has_details: bool,
}

/// Parallel id/record slices in catalog document order.
#[derive(Copy, Clone)]
#[repr(C)]
pub struct ZCatalog {
    pub ids: *const ZString,
    pub files: *const ZZimFile,
    pub len: usize,
}

// ----------------------------------------------------------------------------
// Arena type
// ----------------------------------------------------------------------------

/// Arena holding one catalog parse result.
/// All allocations for ids + records live in the bump allocator.
pub struct ZCatalogArena {
    #[allow(dead_code)]
    bump: Bump,
    catalog: *const ZCatalog,
}

// ----------------------------------------------------------------------------
// Helper functions
// ----------------------------------------------------------------------------

/// Copies a string into the arena and returns a ZString pointing to it.
fn copy_str_to_arena(bump: &Bump, s: &str) -> ZString {
    if s.is_empty() {
        return ZString::empty();
    }
    let bytes = bump.alloc_slice_copy(s.as_bytes());
    ZString {
        data: bytes.as_ptr(),
        len: bytes.len(),
    }
}

/// Creates a ZZimFile in the arena from a ZimFileMeta.
fn make_zim_file(bump: &Bump, meta: &ZimFileMeta) -> ZZimFile {
    ZZimFile {
        id: copy_str_to_arena(bump, &meta.id),
        name: copy_str_to_arena(bump, &meta.name),
        title: copy_str_to_arena(bump, &meta.title),
        description: copy_str_to_arena(bump, &meta.description),
        language_code: copy_str_to_arena(bump, &meta.language_code),
        creation_date: copy_str_to_arena(bump, &meta.creation_date),
        creator: copy_str_to_arena(bump, &meta.creator),
        publisher: copy_str_to_arena(bump, &meta.publisher),
        category: copy_str_to_arena(bump, &meta.category),
        url: copy_str_to_arena(bump, &meta.url),
        icon_url: copy_str_to_arena(bump, &meta.icon_url),
        size: meta.size,
        article_count: meta.article_count,
        media_count: meta.media_count,
        has_pictures: meta.has_pictures,
        has_videos: meta.has_videos,
        has_index: meta.has_index,
        has_details: meta.has_details,
    }
}

/// Creates a ZCatalog in the arena from a Catalog, document order preserved.
fn make_catalog_view(bump: &Bump, catalog: &Catalog) -> *const ZCatalog {
    let id_iter = catalog.ids().iter().map(|id| copy_str_to_arena(bump, id));
    let id_slice = bump.alloc_slice_fill_iter(id_iter);

    let files: Vec<ZZimFile> = catalog
        .iter()
        .map(|meta| make_zim_file(bump, meta))
        .collect();
    let file_slice = bump.alloc_slice_fill_iter(files.into_iter());

    let view = bump.alloc(ZCatalog {
        ids: id_slice.as_ptr(),
        files: file_slice.as_ptr(),
        len: id_slice.len(),
    });
    view as *const ZCatalog
}

/// Maps an OpdsError to a ZErrorCode.
fn map_error_code(err: &OpdsError) -> u32 {
    match err {
        OpdsError::MalformedXml(_) => ZErrorCode::Malformed as u32,
        OpdsError::MissingFeedRoot => ZErrorCode::MissingRoot as u32,
    }
}

/// Static message for the C side. No arena survives a failed parse, so the
/// message must outlive the call on its own; the detailed reason stays on
/// the Rust side.
fn error_message(err: &OpdsError) -> &'static str {
    match err {
        OpdsError::MalformedXml(_) => "malformed catalog XML",
        OpdsError::MissingFeedRoot => "catalog has no Atom feed root",
    }
}

/// Sets the out_err with the given code and message.
/// The message must point at static storage, valid for the program lifetime.
/// If out_err is null, this is a no-op.
unsafe fn set_error(out_err: *mut ZError, code: u32, message: &'static str) {
    if !out_err.is_null() {
        (*out_err).code = code;
        (*out_err).message = ZString {
            data: message.as_ptr(),
            len: message.len(),
        };
    }
}

/// Sets out_err to success (Z_OK with empty message).
/// If out_err is null, this is a no-op.
unsafe fn set_success(out_err: *mut ZError) {
    if !out_err.is_null() {
        (*out_err).code = ZErrorCode::Ok as u32;
        (*out_err).message = ZString::empty();
    }
}

// ----------------------------------------------------------------------------
// Catalog FFI functions
// ----------------------------------------------------------------------------

/// Parses OPDS catalog bytes. Returns an arena-allocated catalog view.
///
/// # Arguments
/// * `data` - Catalog XML bytes
/// * `data_len` - Length of the data in bytes
/// * `out_err` - Output error struct (may be null)
///
/// # Returns
/// Pointer to ZCatalogArena on success, null on failure.
/// On failure, out_err (if non-null) contains error details.
///
/// # Safety
/// Caller must free the returned arena via zimcat_free_catalog.
#[no_mangle]
pub unsafe extern "C" fn zimcat_parse_catalog(
    data: *const u8,
    data_len: usize,
    out_err: *mut ZError,
) -> *mut ZCatalogArena {
    if data.is_null() {
        set_error(out_err, ZErrorCode::Invalid as u32, "data is null");
        return ptr::null_mut();
    }

    // Empty input is accepted at the boundary; the parse itself rejects it.
    let bytes: &[u8] = if data_len == 0 {
        &[]
    } else {
        std::slice::from_raw_parts(data, data_len)
    };

    // Catch panics to avoid unwinding across the FFI boundary
    let result = panic::catch_unwind(|| parse_catalog_bytes(bytes));

    match result {
        Ok(Ok(catalog)) => {
            let bump = Bump::new();
            let view = make_catalog_view(&bump, &catalog);
            let arena = Box::new(ZCatalogArena {
                bump,
                catalog: view,
            });
            set_success(out_err);
            Box::into_raw(arena)
        }
        Ok(Err(parse_err)) => {
            set_error(
                out_err,
                map_error_code(&parse_err),
                error_message(&parse_err),
            );
            ptr::null_mut()
        }
        Err(_) => {
            set_error(
                out_err,
                ZErrorCode::Internal as u32,
                "internal panic during catalog parse",
            );
            ptr::null_mut()
        }
    }
}

/// Returns a pointer to the ZCatalog inside the arena.
///
/// # Safety
/// The arena pointer must be valid and non-null.
/// The returned pointer is valid until zimcat_free_catalog is called.
#[no_mangle]
pub unsafe extern "C" fn zimcat_catalog_result(arena: *const ZCatalogArena) -> *const ZCatalog {
    if arena.is_null() {
        return ptr::null();
    }
    (*arena).catalog
}

/// Looks up one record by exact identifier match.
///
/// # Arguments
/// * `arena` - Catalog arena returned by zimcat_parse_catalog
/// * `id` - Identifier bytes (UTF-8)
/// * `id_len` - Length of the identifier in bytes
///
/// # Returns
/// Pointer to the matching ZZimFile, or null when the identifier is unknown.
/// An unknown identifier is an expected case, not an error.
///
/// # Safety
/// The arena pointer must be valid; the returned pointer is valid until
/// zimcat_free_catalog is called.
#[no_mangle]
pub unsafe extern "C" fn zimcat_catalog_get(
    arena: *const ZCatalogArena,
    id: *const u8,
    id_len: usize,
) -> *const ZZimFile {
    if arena.is_null() || id.is_null() || id_len == 0 {
        return ptr::null();
    }

    let wanted = std::slice::from_raw_parts(id, id_len);
    let catalog = (*arena).catalog;
    if catalog.is_null() {
        return ptr::null();
    }

    let files = std::slice::from_raw_parts((*catalog).files, (*catalog).len);
    for file in files {
        if file.id.len == wanted.len()
            && std::slice::from_raw_parts(file.id.data, file.id.len) == wanted
        {
            return file as *const ZZimFile;
        }
    }
    ptr::null()
}

/// Frees the catalog arena and all associated allocations.
///
/// # Safety
/// The arena pointer must be valid and must have been returned by
/// zimcat_parse_catalog. After this call, the arena pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn zimcat_free_catalog(arena: *mut ZCatalogArena) {
    if !arena.is_null() {
        drop(Box::from_raw(arena));
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
