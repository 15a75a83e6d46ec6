//! C ABI for non-Rust presentation layers.
//!
//! Scenario JSON goes in as a NUL-terminated string; an `ApiResponse` JSON
//! string comes back. Returned strings are owned by Rust and must be released
//! with `deadlock_string_free`, never with the caller's own `free`.
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use serde::Serialize;

use crate::analysis::Analyzer;
use crate::rest_api::{ApiResponse, ValidationResponse};
use crate::scenario::Scenario;

fn into_c_string(json: String) -> *mut c_char {
    // serde_json escapes control characters, so an interior NUL cannot occur
    CString::new(json).map_or(ptr::null_mut(), CString::into_raw)
}

fn respond<T: Serialize>(response: &ApiResponse<T>) -> *mut c_char {
    match serde_json::to_string(response) {
        Ok(json) => into_c_string(json),
        Err(_) => ptr::null_mut(),
    }
}

unsafe fn read_input<'a>(input: *const c_char) -> Result<&'a str, String> {
    if input.is_null() {
        return Err("null scenario pointer".to_string());
    }
    CStr::from_ptr(input)
        .to_str()
        .map_err(|e| format!("scenario is not valid UTF-8: {}", e))
}

// ============================================================================
// Analysis FFI
// ============================================================================

/// Run deadlock detection on a scenario.
///
/// # Safety
/// `scenario` must be null or point to a NUL-terminated string that stays
/// valid for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn deadlock_analyze_json(scenario: *const c_char) -> *mut c_char {
    let json = match read_input(scenario) {
        Ok(json) => json,
        Err(message) => return respond(&ApiResponse::<()>::err(message)),
    };

    match Analyzer::default().analyze_json(json) {
        Ok(report) => respond(&ApiResponse::ok(report)),
        Err(e) => respond(&ApiResponse::<()>::err(e.to_string())),
    }
}

/// Validate a scenario without running detection. Size limits apply as in
/// `deadlock_analyze_json`.
///
/// # Safety
/// Same contract as `deadlock_analyze_json`.
#[no_mangle]
pub unsafe extern "C" fn deadlock_validate_json(scenario: *const c_char) -> *mut c_char {
    let json = match read_input(scenario) {
        Ok(json) => json,
        Err(message) => return respond(&ApiResponse::<()>::err(message)),
    };

    let error = Scenario::from_json(json)
        .and_then(|scenario| Analyzer::default().validate(&scenario))
        .err()
        .map(|e| e.to_string());

    respond(&ApiResponse::ok(ValidationResponse {
        valid: error.is_none(),
        error,
    }))
}

/// Release a string returned by this library.
///
/// # Safety
/// `ptr` must be null or a pointer previously returned by this library that
/// has not been freed yet.
#[no_mangle]
pub unsafe extern "C" fn deadlock_string_free(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

/// Get version information
#[no_mangle]
pub extern "C" fn deadlock_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}
