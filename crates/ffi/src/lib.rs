// ABOUTME: C FFI bindings for the HTML component module loader.
// ABOUTME: Exposes a single transform call that reports through a completion callback with arena-backed strings.

use std::ffi::c_void;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

use bumpalo::Bump;
use html_module_loader::{decode_source, run, ErrorCode, LoaderContext, LoaderError, Options};

/// FFI version constant for ABI compatibility checking.
pub const HML_FFI_VERSION: u32 = 1;

/// Returns the FFI ABI version number.
/// Consumers should check this matches their expected version.
#[no_mangle]
pub extern "C" fn hml_ffi_version() -> u32 {
    HML_FFI_VERSION
}

// ----------------------------------------------------------------------------
// Error handling
// ----------------------------------------------------------------------------

/// Error codes matching the C ABI HErrorCode enum.
#[repr(u32)]
pub enum HErrorCode {
    Ok = 0,
    Parse = 1,
    Minify = 2,
    Invalid = 3,
    Io = 4,
    Internal = 255,
}

/// UTF-8 string slice for FFI. Not null-terminated.
/// Consumer must not mutate or free; memory owned by arena.
#[derive(Copy, Clone)]
#[repr(C)]
pub struct HString {
    pub data: *const u8,
    pub len: usize,
}

impl HString {
    /// Creates an empty HString with null pointer and zero length.
    pub const fn empty() -> Self {
        HString {
            data: ptr::null(),
            len: 0,
        }
    }
}

impl Default for HString {
    fn default() -> Self {
        Self::empty()
    }
}

/// FFI error struct matching C ABI HError.
#[repr(C)]
pub struct HError {
    pub code: u32,
    pub message: HString,
}

/// Completion callback: `(user_data, error, source, source_map)`.
///
/// `error` is null on success. All strings are valid only until the callback
/// returns; copy them out if they are needed later.
pub type HCompletion =
    unsafe extern "C" fn(user_data: *mut c_void, error: *const HError, source: HString, source_map: HString);

/// Copies a string into the arena, returning an HString view.
fn copy_str_to_arena(bump: &Bump, s: &str) -> HString {
    if s.is_empty() {
        return HString::empty();
    }
    let copied = bump.alloc_str(s);
    HString {
        data: copied.as_ptr(),
        len: copied.len(),
    }
}

/// Maps a LoaderError code to an HErrorCode.
fn map_error_code(code: ErrorCode) -> u32 {
    match code {
        ErrorCode::Parse => HErrorCode::Parse as u32,
        ErrorCode::Minify => HErrorCode::Minify as u32,
        ErrorCode::Options => HErrorCode::Invalid as u32,
        ErrorCode::Io => HErrorCode::Io as u32,
    }
}

/// Reads `len` bytes at `data` as UTF-8. A null pointer reads as "" when `len` is 0.
unsafe fn read_str<'a>(data: *const u8, len: usize, what: &str) -> Result<&'a str, String> {
    if data.is_null() {
        if len == 0 {
            return Ok("");
        }
        return Err(format!("{} is null", what));
    }
    let slice = std::slice::from_raw_parts(data, len);
    std::str::from_utf8(slice).map_err(|_| format!("{} is not valid UTF-8", what))
}

// ----------------------------------------------------------------------------
// Host context
// ----------------------------------------------------------------------------

struct FfiContext<'a> {
    resource_path: &'a str,
    options_json: &'a str,
    done: HCompletion,
    user_data: *mut c_void,
    status: Option<u32>,
}

impl FfiContext<'_> {
    /// Deliver an outcome unless one was already delivered.
    unsafe fn complete(&mut self, code: u32, message: &str, source: &str, source_map: &str) {
        if self.status.is_some() {
            return;
        }
        self.status = Some(code);

        let bump = Bump::new();
        let source = copy_str_to_arena(&bump, source);
        let source_map = copy_str_to_arena(&bump, source_map);
        if code == HErrorCode::Ok as u32 {
            (self.done)(self.user_data, ptr::null(), source, source_map);
        } else {
            let err = HError {
                code,
                message: copy_str_to_arena(&bump, message),
            };
            (self.done)(self.user_data, &err, source, source_map);
        }
    }
}

impl LoaderContext for FfiContext<'_> {
    fn resource_path(&self) -> &str {
        self.resource_path
    }

    fn options(&self) -> Result<Options, LoaderError> {
        Options::from_json(self.options_json)
    }

    fn callback(
        &mut self,
        error: Option<LoaderError>,
        source: Option<String>,
        source_map: Option<String>,
    ) {
        let source = source.unwrap_or_default();
        let source_map = source_map.unwrap_or_default();
        // SAFETY: `done` and `user_data` were supplied together by the caller of hml_transform.
        unsafe {
            match error {
                Some(err) => self.complete(map_error_code(err.code), &err.to_string(), "", ""),
                None => self.complete(HErrorCode::Ok as u32, "", &source, &source_map),
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Transform
// ----------------------------------------------------------------------------

/// Transforms component HTML into module source.
///
/// # Arguments
/// * `content` / `content_len` - HTML bytes (UTF-8, or UTF-16 with BOM)
/// * `resource_path` / `resource_path_len` - path of the file, used in error messages (UTF-8)
/// * `options_json` / `options_json_len` - loader options as a JSON object; may be null
/// * `callback` - completion callback, invoked exactly once unless it is null
/// * `user_data` - passed through to `callback`
///
/// # Returns
/// The HErrorCode that was reported to the callback.
///
/// # Safety
/// Every non-null pointer must reference at least the given number of readable bytes.
#[no_mangle]
pub unsafe extern "C" fn hml_transform(
    content: *const u8,
    content_len: usize,
    resource_path: *const u8,
    resource_path_len: usize,
    options_json: *const u8,
    options_json_len: usize,
    callback: Option<HCompletion>,
    user_data: *mut c_void,
) -> u32 {
    let Some(done) = callback else {
        return HErrorCode::Invalid as u32;
    };

    let mut ctx = FfiContext {
        resource_path: "",
        options_json: "",
        done,
        user_data,
        status: None,
    };

    let inputs = read_str(resource_path, resource_path_len, "resource path").and_then(|path| {
        read_str(options_json, options_json_len, "options").map(|opts| (path, opts))
    });
    match inputs {
        Ok((path, opts)) => {
            ctx.resource_path = path;
            ctx.options_json = opts;
        }
        Err(msg) => {
            ctx.complete(HErrorCode::Invalid as u32, &msg, "", "");
            return HErrorCode::Invalid as u32;
        }
    }

    if content.is_null() && content_len != 0 {
        ctx.complete(HErrorCode::Invalid as u32, "content is null", "", "");
        return HErrorCode::Invalid as u32;
    }
    let bytes: &[u8] = if content.is_null() {
        &[]
    } else {
        std::slice::from_raw_parts(content, content_len)
    };

    // Catch panics to avoid unwinding across FFI boundary
    let result = panic::catch_unwind(AssertUnwindSafe(|| match decode_source(bytes) {
        Ok(text) => run(&mut ctx, &text),
        Err(err) => {
            let err = err.with_resource(ctx.resource_path);
            ctx.callback(Some(err), None, None);
        }
    }));

    if result.is_err() {
        ctx.complete(
            HErrorCode::Internal as u32,
            "internal panic during transform",
            "",
            "",
        );
    }

    ctx.status.unwrap_or(HErrorCode::Internal as u32)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
