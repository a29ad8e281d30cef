//! Scoped ownership guards for engine-allocated memory.
//!
//! Each guard adopts exactly one foreign allocation together with the
//! engine's matching release function and frees it on drop, on every exit
//! path. The pointer is never handed back out, so an allocation can neither
//! be read after release nor released twice.

use std::ffi::{CStr, c_char};

use super::api::{FreeArrayFn, FreeStringFn};

/// Exclusive, short-lived ownership of an engine-allocated `f64` buffer.
pub(crate) struct ForeignBuffer {
    ptr: *mut f64,
    len: usize,
    release: FreeArrayFn,
}

impl ForeignBuffer {
    /// Adopt a buffer of `len` elements returned by the engine.
    ///
    /// Returns `None` for a null pointer (nothing to release).
    ///
    /// # Safety
    /// `ptr` must either be null or point to an engine allocation of at
    /// least `len` `f64` values that `release` accepts, and ownership must
    /// not be held anywhere else.
    pub(crate) unsafe fn adopt(ptr: *mut f64, len: usize, release: FreeArrayFn) -> Option<Self> {
        if ptr.is_null() {
            return None;
        }
        Some(Self { ptr, len, release })
    }

    /// Copy the contents into locally owned memory.
    pub(crate) fn to_vec(&self) -> Vec<f64> {
        // Pointer and length were validated at adoption.
        unsafe { std::slice::from_raw_parts(self.ptr, self.len) }.to_vec()
    }
}

impl Drop for ForeignBuffer {
    fn drop(&mut self) {
        unsafe { (self.release)(self.ptr) };
    }
}

/// Exclusive, short-lived ownership of an engine-allocated C string.
pub(crate) struct ForeignString {
    ptr: *mut c_char,
    release: FreeStringFn,
}

impl ForeignString {
    /// Adopt a string returned by the engine; `None` for a null pointer.
    ///
    /// # Safety
    /// `ptr` must either be null or point to a nul-terminated engine
    /// allocation that `release` accepts, with no other owner.
    pub(crate) unsafe fn adopt(ptr: *mut c_char, release: FreeStringFn) -> Option<Self> {
        if ptr.is_null() {
            return None;
        }
        Some(Self { ptr, release })
    }

    /// Copy the contents into an owned `String`, lossily for invalid UTF-8.
    pub(crate) fn to_string_copy(&self) -> String {
        unsafe { CStr::from_ptr(self.ptr) }
            .to_string_lossy()
            .into_owned()
    }
}

impl Drop for ForeignString {
    fn drop(&mut self) {
        unsafe { (self.release)(self.ptr) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static BUFFER_RELEASES: AtomicUsize = AtomicUsize::new(0);
    static STRING_RELEASES: AtomicUsize = AtomicUsize::new(0);

    unsafe extern "C" fn release_buffer(ptr: *mut f64) {
        if !ptr.is_null() {
            BUFFER_RELEASES.fetch_add(1, Ordering::SeqCst);
            drop(unsafe { Box::from_raw(std::slice::from_raw_parts_mut(ptr, 3)) });
        }
    }

    unsafe extern "C" fn release_string(ptr: *mut c_char) {
        if !ptr.is_null() {
            STRING_RELEASES.fetch_add(1, Ordering::SeqCst);
            drop(unsafe { CString::from_raw(ptr) });
        }
    }

    fn leak_buffer() -> *mut f64 {
        Box::into_raw(vec![0.25, 0.5, 0.75].into_boxed_slice()) as *mut f64
    }

    #[test]
    fn adopt_refuses_null_without_releasing() {
        let before = BUFFER_RELEASES.load(Ordering::SeqCst);
        assert!(unsafe { ForeignBuffer::adopt(std::ptr::null_mut(), 3, release_buffer) }.is_none());
        assert_eq!(BUFFER_RELEASES.load(Ordering::SeqCst), before);
    }

    #[test]
    fn buffer_is_copied_then_released_exactly_once() {
        let before = BUFFER_RELEASES.load(Ordering::SeqCst);
        let guard = unsafe { ForeignBuffer::adopt(leak_buffer(), 3, release_buffer) }.unwrap();
        assert_eq!(guard.to_vec(), vec![0.25, 0.5, 0.75]);
        assert_eq!(BUFFER_RELEASES.load(Ordering::SeqCst), before);
        drop(guard);
        assert_eq!(BUFFER_RELEASES.load(Ordering::SeqCst), before + 1);
    }

    #[test]
    fn string_is_copied_then_released_exactly_once() {
        let before = STRING_RELEASES.load(Ordering::SeqCst);
        let raw = CString::new("apple").unwrap().into_raw();
        let guard = unsafe { ForeignString::adopt(raw, release_string) }.unwrap();
        assert_eq!(guard.to_string_copy(), "apple");
        drop(guard);
        assert_eq!(STRING_RELEASES.load(Ordering::SeqCst), before + 1);
    }
}
