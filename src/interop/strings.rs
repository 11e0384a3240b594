//! Text crossing the boundary as NUL-terminated UTF-8 buffers

use std::ffi::{CStr, CString};

use super::types::NativeChars;
use crate::error::{InteropError, InteropResult};

/// Decode a native character buffer. Null and empty buffers decode to `None`;
/// invalid UTF-8 is replaced lossily.
///
/// # Safety
/// `chars` must be null or point to a NUL-terminated buffer that stays alive
/// for the duration of the call.
pub unsafe fn decode_native_chars(chars: NativeChars) -> Option<String> {
    if chars.is_null() {
        return None;
    }

    let text = CStr::from_ptr(chars.as_raw());
    if text.to_bytes().is_empty() {
        None
    } else {
        Some(text.to_string_lossy().into_owned())
    }
}

/// Managed text prepared for a native call. Keeps the buffer alive while the
/// call borrows it.
#[derive(Debug, Default)]
pub struct ManagedText {
    buffer: Option<CString>,
}

impl ManagedText {
    /// `None` becomes a null pointer on the wire
    pub fn new(text: Option<&str>) -> InteropResult<Self> {
        let buffer = text
            .map(|text| CString::new(text).map_err(|_| InteropError::InvalidText))
            .transpose()?;
        Ok(Self { buffer })
    }

    pub fn as_native(&self) -> NativeChars {
        match &self.buffer {
            Some(buffer) => NativeChars::from_raw(buffer.as_ptr() as *mut _),
            None => NativeChars::null(),
        }
    }
}
