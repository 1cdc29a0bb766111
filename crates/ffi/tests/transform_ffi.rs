// ABOUTME: Integration tests for the loader FFI transform call.
// ABOUTME: Drives hml_transform through a C callback that records what it receives.

use std::ffi::c_void;
use std::ptr;
use std::slice;
use std::str;

use html_module_loader_ffi::{hml_transform, HError, HErrorCode, HString};

#[derive(Default)]
struct Received {
    calls: usize,
    code: u32,
    message: String,
    source: String,
    source_map: String,
}

/// Helper to convert an HString to an owned String for assertions.
unsafe fn hstring_to_string(hs: &HString) -> String {
    if hs.data.is_null() || hs.len == 0 {
        return String::new();
    }
    let slice = slice::from_raw_parts(hs.data, hs.len);
    str::from_utf8(slice).unwrap_or("").to_string()
}

unsafe extern "C" fn record(
    user_data: *mut c_void,
    error: *const HError,
    source: HString,
    source_map: HString,
) {
    let received = &mut *(user_data as *mut Received);
    received.calls += 1;
    if error.is_null() {
        received.code = HErrorCode::Ok as u32;
    } else {
        received.code = (*error).code;
        received.message = hstring_to_string(&(*error).message);
    }
    received.source = hstring_to_string(&source);
    received.source_map = hstring_to_string(&source_map);
}

fn transform(html: &[u8], options: Option<&str>) -> (u32, Received) {
    let path = "src/x-app.html";
    let mut received = Received::default();
    let (opts_ptr, opts_len) = match options {
        Some(o) => (o.as_ptr(), o.len()),
        None => (ptr::null(), 0),
    };
    let status = unsafe {
        hml_transform(
            html.as_ptr(),
            html.len(),
            path.as_ptr(),
            path.len(),
            opts_ptr,
            opts_len,
            Some(record),
            &mut received as *mut Received as *mut c_void,
        )
    };
    (status, received)
}

#[test]
fn test_transform_success() {
    let html = br#"<link href="foo/foo.html"><dom-module><script>console.log(1)</script></dom-module>"#;
    let (status, received) = transform(html, None);

    assert_eq!(status, HErrorCode::Ok as u32);
    assert_eq!(received.calls, 1);
    assert_eq!(received.code, HErrorCode::Ok as u32);
    assert!(received.source.starts_with("\nimport './foo/foo.html';\n"));
    assert!(received.source.ends_with("\nconsole.log(1)\n"));
    assert_eq!(received.source_map, "");
}

#[test]
fn test_transform_with_options() {
    let html = br#"<link href="a.html"><link href="b.html">"#;
    let (status, received) = transform(html, Some(r#"{"ignoreLinks": ["a.html"]}"#));

    assert_eq!(status, HErrorCode::Ok as u32);
    assert_eq!(received.source, "\nimport './b.html';\n");
}

#[test]
fn test_invalid_options_reported() {
    let (status, received) = transform(b"<div></div>", Some("{not json"));

    assert_eq!(status, HErrorCode::Invalid as u32);
    assert_eq!(received.calls, 1);
    assert_eq!(received.code, HErrorCode::Invalid as u32);
    assert!(received.message.contains("src/x-app.html"));
    assert_eq!(received.source, "");
}

#[test]
fn test_undecodable_content_is_parse_error() {
    let (status, received) = transform(b"<p>\xFF\xFE\xFD</p>", None);

    assert_eq!(status, HErrorCode::Parse as u32);
    assert_eq!(received.calls, 1);
    assert!(received.message.contains("parse error"));
}

#[test]
fn test_null_callback_is_rejected() {
    let html = "<div></div>";
    let status = unsafe {
        hml_transform(
            html.as_ptr(),
            html.len(),
            ptr::null(),
            0,
            ptr::null(),
            0,
            None,
            ptr::null_mut(),
        )
    };
    assert_eq!(status, HErrorCode::Invalid as u32);
}

#[test]
fn test_null_content_with_length_is_invalid() {
    let mut received = Received::default();
    let status = unsafe {
        hml_transform(
            ptr::null(),
            10,
            ptr::null(),
            0,
            ptr::null(),
            0,
            Some(record),
            &mut received as *mut Received as *mut c_void,
        )
    };
    assert_eq!(status, HErrorCode::Invalid as u32);
    assert_eq!(received.calls, 1);
    assert_eq!(received.message, "content is null");
}
